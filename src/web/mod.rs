//! Web服务器模块
//!
//! 提供检测端点、配置表单页面和HTTP服务器管理

use crate::check::CheckRunner;
use crate::config::{ConfigManager, ConfigStore};
use std::sync::Arc;

pub mod handlers;
pub mod server;

pub use server::{create_router, WebServer};

/// Web应用共享状态
///
/// 所有字段都是引用计数的共享句柄，克隆成本低，
/// 每个请求处理函数持有一份克隆。
#[derive(Clone)]
pub struct AppState {
    /// 配置管理器，提供当前配置快照
    pub manager: Arc<ConfigManager>,
    /// 配置存储，表单提交后持久化
    pub store: Arc<dyn ConfigStore>,
    /// 检测运行器
    pub runner: Arc<CheckRunner>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(manager: Arc<ConfigManager>, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            manager,
            store,
            runner: Arc::new(CheckRunner::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CheckConfig, TomlConfigStore};

    #[tokio::test]
    async fn test_app_state_clone_shares_manager() {
        let config = CheckConfig {
            command: "echo hello".to_string(),
            ..Default::default()
        };
        let manager = Arc::new(ConfigManager::new(config));
        let store = Arc::new(TomlConfigStore::new("config.toml"));
        let state = AppState::new(manager, store);

        // 克隆共享同一个配置管理器
        let cloned = state.clone();
        let updated = CheckConfig {
            command: "echo changed".to_string(),
            ..Default::default()
        };
        state.manager.replace(updated).await;

        let snapshot = cloned.manager.snapshot().await;
        assert_eq!(snapshot.command, "echo changed");
    }
}

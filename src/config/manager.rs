//! 配置管理器模块
//!
//! 提供线程安全的配置快照管理

use crate::config::types::CheckConfig;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// 配置管理器
///
/// 以读取-复制-更新方式持有当前配置：每个探测请求在入口处
/// 克隆一次 `Arc` 快照，请求期间只读取该快照；更新方在写锁内
/// 换入新构建的 `Arc`。并发读写永远不会观察到半旧半新的配置。
pub struct ConfigManager {
    /// 当前配置快照
    current: RwLock<Arc<CheckConfig>>,
    /// 配置版本号
    version: RwLock<u64>,
}

impl ConfigManager {
    /// 创建新的配置管理器
    ///
    /// # 参数
    /// * `initial_config` - 初始配置
    pub fn new(initial_config: CheckConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial_config)),
            version: RwLock::new(1),
        }
    }

    /// 获取当前配置快照
    ///
    /// 返回的 `Arc` 在持有期间保持不变，后续的配置更新
    /// 不影响已取得的快照。
    pub async fn snapshot(&self) -> Arc<CheckConfig> {
        Arc::clone(&*self.current.read().await)
    }

    /// 获取当前版本号
    pub async fn version(&self) -> u64 {
        *self.version.read().await
    }

    /// 替换当前配置
    ///
    /// 配置无变更时跳过替换并保持版本号。
    ///
    /// # 参数
    /// * `new_config` - 新配置
    ///
    /// # 返回
    /// * `u64` - 替换后的版本号
    pub async fn replace(&self, new_config: CheckConfig) -> u64 {
        {
            let current = self.current.read().await;
            if **current == new_config {
                debug!("配置无变更，跳过更新");
                return *self.version.read().await;
            }

            if current.port != new_config.port || current.bind_address != new_config.bind_address {
                warn!(
                    "监听地址由 {}:{} 变更为 {}:{}，下次启动生效",
                    current.bind_address, current.port, new_config.bind_address, new_config.port
                );
            }
        }

        {
            let mut current = self.current.write().await;
            *current = Arc::new(new_config);
        }

        let new_version = {
            let mut ver = self.version.write().await;
            *ver += 1;
            *ver
        };

        info!("配置更新完成，版本: {new_version}");
        new_version
    }
}

//! 配置文件监控模块
//!
//! 提供配置文件的实时监控和热重载功能

use crate::config::manager::ConfigManager;
use crate::config::store::ConfigStore;
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// 配置文件监控器
///
/// 监控配置文件所在目录，文件变更后经防抖动延迟重新加载，
/// 加载成功则替换管理器中的快照；加载或验证失败时保留旧快照
/// 并记录警告。监听地址的变更不会重新绑定端口。
pub struct ConfigWatcher {
    /// 配置文件路径
    config_path: PathBuf,
    /// 文件系统监控器
    watcher: Option<RecommendedWatcher>,
    /// 配置存储
    store: Arc<dyn ConfigStore>,
    /// 配置管理器
    manager: Arc<ConfigManager>,
    /// 防抖动延迟
    debounce_delay: Duration,
}

impl ConfigWatcher {
    /// 创建新的配置监控器
    ///
    /// # 参数
    /// * `store` - 配置存储，提供文件路径和重载能力
    /// * `manager` - 接收新快照的配置管理器
    /// * `debounce_delay` - 防抖动延迟时间
    ///
    /// # 返回
    /// * `Result<Self>` - 监控器实例
    pub fn new(
        store: Arc<dyn ConfigStore>,
        manager: Arc<ConfigManager>,
        debounce_delay: Duration,
    ) -> Result<Self> {
        let config_path = store.path().to_path_buf();

        Self::validate_config_path(&config_path)?;

        Ok(Self {
            config_path,
            watcher: None,
            store,
            manager,
            debounce_delay,
        })
    }

    /// 验证配置文件路径
    fn validate_config_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(anyhow::anyhow!("配置文件不存在: {}", path.display()));
        }

        if !path.is_file() {
            return Err(anyhow::anyhow!("路径不是文件: {}", path.display()));
        }

        if let Some(extension) = path.extension() {
            if extension != "toml" {
                warn!("配置文件扩展名不是.toml: {}", path.display());
            }
        }

        match std::fs::File::open(path) {
            Ok(_) => {
                debug!("配置文件权限验证通过: {}", path.display());
                Ok(())
            }
            Err(e) => Err(anyhow::anyhow!("无法读取配置文件 {}: {}", path.display(), e)),
        }
    }

    /// 启动配置文件监控
    ///
    /// # 返回
    /// * `Result<()>` - 启动结果
    pub fn start(&mut self) -> Result<()> {
        info!("启动配置文件监控: {}", self.config_path.display());

        // notify的回调在独立线程中触发，通过通道转发到异步任务
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            notify::Config::default().with_poll_interval(Duration::from_secs(1)),
        )
        .context("创建文件监控器失败")?;

        // 监控配置文件所在目录，编辑器的原子替换会改变文件inode
        let watch_path = self.config_path.parent().unwrap_or(&self.config_path);
        watcher
            .watch(watch_path, RecursiveMode::NonRecursive)
            .with_context(|| format!("监控目录失败: {}", watch_path.display()))?;

        self.watcher = Some(watcher);

        let config_path = self.config_path.clone();
        let store = Arc::clone(&self.store);
        let manager = Arc::clone(&self.manager);
        let debounce_delay = self.debounce_delay;

        tokio::spawn(async move {
            Self::handle_file_events(rx, config_path, store, manager, debounce_delay).await;
        });

        info!("配置文件监控已启动");
        Ok(())
    }

    /// 处理文件系统事件
    async fn handle_file_events(
        mut rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
        config_path: PathBuf,
        store: Arc<dyn ConfigStore>,
        manager: Arc<ConfigManager>,
        debounce_delay: Duration,
    ) {
        let mut last_event_time: Option<Instant> = None;

        while let Some(res) = rx.recv().await {
            match res {
                Ok(event) => {
                    if !Self::is_target_file_event(&event, &config_path) {
                        continue;
                    }

                    debug!("检测到配置文件变更事件: {:?}", event);

                    // 防抖动处理
                    let now = Instant::now();
                    if let Some(last_time) = last_event_time {
                        if now.duration_since(last_time) < debounce_delay {
                            debug!("跳过重复事件（防抖动）");
                            continue;
                        }
                    }
                    last_event_time = Some(now);

                    // 延迟处理，确保文件写入完成
                    tokio::time::sleep(debounce_delay).await;

                    // 重新加载配置，失败时保留旧快照
                    match store.load().await {
                        Ok(new_config) => {
                            let version = manager.replace(new_config).await;
                            info!("配置重载成功，版本: {version}");
                        }
                        Err(e) => {
                            warn!("配置重载失败，保留当前配置: {e}");
                        }
                    }
                }
                Err(e) => {
                    error!("文件监控事件错误: {e}");
                }
            }
        }
    }

    /// 检查是否是目标文件的事件
    fn is_target_file_event(event: &Event, target_path: &Path) -> bool {
        match &event.kind {
            EventKind::Modify(_) | EventKind::Create(_) => {
                event.paths.iter().any(|path| path == target_path)
            }
            _ => false,
        }
    }

    /// 停止监控
    pub fn stop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            drop(watcher);
            info!("配置文件监控已停止");
        }
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::TomlConfigStore;
    use crate::config::types::CheckConfig;
    use notify::event::ModifyKind;
    use tempfile::TempDir;

    fn create_test_store(dir: &TempDir) -> Arc<TomlConfigStore> {
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "command = \"echo hello\"\nmatch_type = \"exact\"\nmatch_value = \"hello\"\n",
        )
        .unwrap();
        Arc::new(TomlConfigStore::new(path))
    }

    #[tokio::test]
    async fn test_watcher_creation() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir);
        let manager = Arc::new(ConfigManager::new(CheckConfig::default()));

        let result = ConfigWatcher::new(store, manager, Duration::from_millis(100));
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_watcher_rejects_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(TomlConfigStore::new(dir.path().join("missing.toml")));
        let manager = Arc::new(ConfigManager::new(CheckConfig::default()));

        let result = ConfigWatcher::new(store, manager, Duration::from_millis(100));
        assert!(result.is_err());
    }

    #[test]
    fn test_is_target_file_event() {
        let target = Path::new("/tmp/config.toml");

        let modify = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(target.to_path_buf());
        assert!(ConfigWatcher::is_target_file_event(&modify, target));

        let other_file = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/other.toml"));
        assert!(!ConfigWatcher::is_target_file_event(&other_file, target));

        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(target.to_path_buf());
        assert!(!ConfigWatcher::is_target_file_event(&access, target));
    }
}

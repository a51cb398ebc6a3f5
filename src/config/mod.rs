//! 配置管理模块
//!
//! 提供配置文件解析、验证和热重载功能

pub mod manager;
pub mod store;
pub mod types;
pub mod watcher;

// 重新导出主要类型
pub use manager::ConfigManager;
pub use store::{default_config_path, ConfigStore, TomlConfigStore, DEFAULT_CONFIG_TEMPLATE};
pub use types::{validate_config, CheckConfig, MatchMode};
pub use watcher::ConfigWatcher;

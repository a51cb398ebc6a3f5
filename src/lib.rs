//! Command Vitals - 单命令健康检测探针
//!
//! 这是一个用Rust编写的命令探测工具，支持：
//! - shell命令执行与输出匹配（精确/正则/整数）
//! - JSON/XML/状态令牌三种HTTP响应格式
//! - Web配置表单与配置热重载
//! - 结构化日志记录

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod web;

// 重新导出主要类型
pub use check::{CheckResult, CheckRunner, MatchVerdict};
pub use config::{CheckConfig, MatchMode};
pub use error::CommandVitalsError;

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

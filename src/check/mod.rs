//! 检测模块
//!
//! 提供命令执行、输出匹配判定和结果渲染功能

pub mod executor;
pub mod matcher;
pub mod result;
pub mod runner;

// 重新导出主要类型
pub use executor::{CommandExecutor, ExecOutput, ShellExecutor};
pub use matcher::{evaluate, MatchVerdict};
pub use result::CheckResult;
pub use runner::CheckRunner;

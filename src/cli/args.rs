//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command Vitals - 单命令健康检测探针
#[derive(Parser, Debug, Clone)]
#[command(
    name = "command-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "COMMAND_VITALS_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "COMMAND_VITALS_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 是否以JSON格式输出日志
    #[arg(long, help = "以JSON格式输出日志", env = "COMMAND_VITALS_LOG_JSON")]
    pub log_json: bool,

    /// 是否启用详细输出
    #[arg(short, long, help = "启用详细输出")]
    pub verbose: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 启动HTTP检测服务
    Serve {
        /// 覆盖配置文件中的监听端口
        #[arg(
            short,
            long,
            value_name = "PORT",
            help = "覆盖配置文件中的监听端口",
            env = "COMMAND_VITALS_PORT"
        )]
        port: Option<u16>,
    },

    /// 执行一次检测并输出结果
    Check {
        /// 输出格式
        #[arg(
            short,
            long,
            value_enum,
            default_value = "status",
            help = "输出格式"
        )]
        format: OutputFormat,
    },

    /// 初始化配置文件
    Init {
        /// 配置文件路径
        #[arg(
            value_name = "FILE",
            help = "配置文件路径",
            default_value = "config.toml"
        )]
        config_path: PathBuf,

        /// 是否覆盖现有文件
        #[arg(short, long, help = "覆盖现有文件")]
        force: bool,
    },

    /// 验证配置文件
    Validate {
        /// 配置文件路径
        #[arg(value_name = "FILE", help = "配置文件路径")]
        config_path: Option<PathBuf>,

        /// 是否显示详细信息
        #[arg(short, long, help = "显示详细信息")]
        verbose: bool,
    },
}

/// 检测结果输出格式
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// JSON格式
    Json,
    /// XML格式
    Xml,
    /// 状态令牌（success/failed）
    Status,
}

impl Args {
    /// 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 获取配置文件路径
    pub fn get_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::default_config_path)
    }

    /// 是否启用详细输出
    pub fn is_verbose(&self) -> bool {
        self.verbose || matches!(self.log_level, LogLevel::Debug)
    }

    /// 生效的日志级别（--verbose 优先）
    pub fn effective_log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            self.log_level.clone().into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_port() {
        let args = Args::parse_from(["command-vitals", "serve", "--port", "9000"]);
        assert!(matches!(
            args.command,
            Commands::Serve { port: Some(9000) }
        ));
    }

    #[test]
    fn test_parse_check_default_format() {
        let args = Args::parse_from(["command-vitals", "check"]);
        if let Commands::Check { format } = args.command {
            assert_eq!(format, OutputFormat::Status);
        } else {
            panic!("应解析为check子命令");
        }
    }

    #[test]
    fn test_parse_check_json_format() {
        let args = Args::parse_from(["command-vitals", "check", "--format", "json"]);
        if let Commands::Check { format } = args.command {
            assert_eq!(format, OutputFormat::Json);
        } else {
            panic!("应解析为check子命令");
        }
    }

    #[test]
    fn test_config_path_override() {
        let args = Args::parse_from(["command-vitals", "--config", "/tmp/probe.toml", "check"]);
        assert_eq!(args.get_config_path(), PathBuf::from("/tmp/probe.toml"));
    }

    #[test]
    fn test_effective_log_level_verbose_wins() {
        let args = Args::parse_from(["command-vitals", "--verbose", "check"]);
        assert_eq!(args.effective_log_level(), log::LevelFilter::Debug);
        assert!(args.is_verbose());
    }
}

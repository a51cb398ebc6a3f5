//! 日志系统模块
//!
//! 提供结构化日志配置和初始化功能

use log::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 是否使用JSON格式
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// 根据详细模式创建日志配置
    ///
    /// # 参数
    /// * `verbose` - 是否启用详细输出（debug级别）
    pub fn from_verbose(verbose: bool) -> Self {
        Self {
            level: if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
            json_format: false,
        }
    }
}

/// 初始化日志系统
///
/// 安装 log crate 到 tracing 的桥接，并根据配置构建
/// tracing subscriber。环境变量 `RUST_LOG` 优先于配置中的级别。
/// 重复调用是安全的：已初始化时直接返回成功。
///
/// # 参数
/// * `config` - 日志配置
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    init_log_tracer()?;
    init_tracing_subscriber(config)
}

/// 初始化 LogTracer（log crate 到 tracing 的桥接）
fn init_log_tracer() -> anyhow::Result<()> {
    use tracing_log::LogTracer;

    match LogTracer::init() {
        Ok(()) => Ok(()),
        // 已经安装过桥接，视为成功
        Err(_) => Ok(()),
    }
}

/// 初始化 tracing subscriber
fn init_tracing_subscriber(config: &LogConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_directive(config.level)));

    // 日志写到stderr，stdout留给check子命令的结果输出
    let result = if config.json_format {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_timer(fmt::time::ChronoUtc::rfc_3339());
        registry().with(env_filter).with(fmt_layer).try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(fmt::time::ChronoUtc::rfc_3339())
            .with_target(true);
        registry().with(env_filter).with(fmt_layer).try_init()
    };

    match result {
        Ok(()) => {
            tracing::debug!("日志系统初始化完成: {:?}", config);
            Ok(())
        }
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("already been set") || msg.contains("already initialized") {
                // 测试或重复调用场景，保留首次安装的subscriber
                Ok(())
            } else {
                Err(anyhow::anyhow!("tracing subscriber初始化失败: {}", msg))
            }
        }
    }
}

/// 将 log::LevelFilter 转换为过滤指令字符串
fn level_to_directive(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}

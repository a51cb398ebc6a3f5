//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use std::time::Duration;

use thiserror::Error;

/// Command Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum CommandVitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 命令执行相关错误
    #[error("命令执行错误: {0}")]
    Execution(#[from] ExecutionError),

    /// Web服务相关错误
    #[error("Web服务错误: {0}")]
    Web(#[from] WebError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置序列化错误
    #[error("配置序列化失败: {0}")]
    SerializeError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 配置文件读写错误
    #[error("配置文件读写失败: {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 命令执行错误类型
///
/// 区分"命令无法运行"与"命令运行了但输出不匹配"：
/// 后者不是错误，而是检测结果中的 `success: false`。
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// 命令启动失败
    #[error("命令启动失败: {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// 命令以非零状态码退出
    #[error("命令异常退出: {command}: 退出码 {code}")]
    NonZeroExit { command: String, code: i32 },

    /// 命令被信号终止，没有退出码
    #[error("命令被信号终止: {command}")]
    Signaled { command: String },

    /// 命令执行超时
    #[error("命令执行超时: {command}: 超过 {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// 等待命令结束失败
    #[error("等待命令结束失败: {command}: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Web服务错误类型
#[derive(Error, Debug)]
pub enum WebError {
    /// 监听地址绑定失败
    #[error("监听地址绑定失败: {addr}: {source}")]
    BindError {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, CommandVitalsError>;

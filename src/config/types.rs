//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 输出匹配模式
///
/// 决定如何把命令输出与配置的期望值进行比较。
/// 配置文件和表单中使用小写拼写：`exact`、`regex`、`integer`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// 去除输出首尾空白后逐字节比较
    Exact,
    /// 在未修剪的输出中搜索正则表达式
    Regex,
    /// 双方按十进制有符号整数解析后比较
    Integer,
}

impl MatchMode {
    /// 全部受支持的模式拼写
    pub const ACCEPTED: [&'static str; 3] = ["exact", "regex", "integer"];

    /// 返回模式的小写拼写
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Regex => "regex",
            MatchMode::Integer => "integer",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(MatchMode::Exact),
            "regex" => Ok(MatchMode::Regex),
            "integer" => Ok(MatchMode::Integer),
            other => Err(format!(
                "无效的匹配模式: {other}，支持的模式: {:?}",
                Self::ACCEPTED
            )),
        }
    }
}

/// 检测配置结构
///
/// 每次探测请求开始时获取一份不可变快照，请求期间不会观察到部分更新。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckConfig {
    /// 要执行的shell命令行（由 `sh -c` 解释，允许管道和重定向）
    pub command: String,
    /// 输出匹配模式
    pub match_type: MatchMode,
    /// 期望值，按匹配模式解释
    pub match_value: String,
    /// HTTP监听端口（修改后下次启动生效）
    #[serde(default = "default_port")]
    pub port: u16,
    /// HTTP绑定地址
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// 单次命令执行超时（秒）
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            command: "echo hello".to_string(),
            match_type: MatchMode::Exact,
            match_value: "hello".to_string(),
            port: default_port(),
            bind_address: default_bind_address(),
            timeout_seconds: default_timeout(),
        }
    }
}

// 默认值函数
fn default_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_timeout() -> u64 {
    10
}

/// 配置验证函数
///
/// 匹配期望值本身不在这里校验：写错的正则表达式按原样保存，
/// 探测时产生 `invalid` 判定而不是加载失败。
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &CheckConfig) -> Result<(), String> {
    if config.command.trim().is_empty() {
        return Err("检测命令不能为空".to_string());
    }

    if config.port == 0 {
        return Err(format!("无效的监听端口: {}，端口不能为0", config.port));
    }

    if config.bind_address.trim().is_empty() {
        return Err("绑定地址不能为空".to_string());
    }

    if config.timeout_seconds == 0 {
        return Err("命令执行超时不能为0秒".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> CheckConfig {
        CheckConfig {
            command: "echo hello".to_string(),
            match_type: MatchMode::Exact,
            match_value: "hello".to_string(),
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
            timeout_seconds: 10,
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = create_test_config();

        // 测试序列化
        let serialized = toml::to_string(&config).expect("序列化失败");
        assert!(serialized.contains("match_type = \"exact\""));

        // 测试反序列化
        let deserialized: CheckConfig = toml::from_str(&serialized).expect("反序列化失败");
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_config_defaults_applied() {
        let minimal = r#"
            command = "uptime"
            match_type = "regex"
            match_value = "load average"
        "#;

        let config: CheckConfig = toml::from_str(minimal).expect("反序列化失败");
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.timeout_seconds, 10);
    }

    #[test]
    fn test_match_mode_from_str() {
        assert_eq!("exact".parse::<MatchMode>().unwrap(), MatchMode::Exact);
        assert_eq!("regex".parse::<MatchMode>().unwrap(), MatchMode::Regex);
        assert_eq!("integer".parse::<MatchMode>().unwrap(), MatchMode::Integer);

        let err = "fuzzy".parse::<MatchMode>().unwrap_err();
        assert!(err.contains("fuzzy"));
        assert!(err.contains("exact"));

        // 大写拼写同样被拒绝
        assert!("Exact".parse::<MatchMode>().is_err());
    }

    #[test]
    fn test_match_mode_display() {
        assert_eq!(MatchMode::Integer.to_string(), "integer");
    }

    #[test]
    fn test_config_validation() {
        let config = create_test_config();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_config_validation_empty_command() {
        let mut config = create_test_config();
        config.command = "   ".to_string();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("检测命令不能为空"));
    }

    #[test]
    fn test_config_validation_invalid_port() {
        let mut config = create_test_config();
        config.port = 0;

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("端口不能为0"));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = create_test_config();
        config.timeout_seconds = 0;

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("超时不能为0"));
    }

    #[test]
    fn test_config_validation_accepts_malformed_regex_value() {
        // 写错的正则表达式留给探测阶段判定，验证不拒绝
        let mut config = create_test_config();
        config.match_type = MatchMode::Regex;
        config.match_value = "[unclosed".to_string();

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_default_config() {
        let config = CheckConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.timeout_seconds, 10);
        assert!(validate_config(&config).is_ok());
    }
}

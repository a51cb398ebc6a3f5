//! 配置存储实现
//!
//! 提供TOML配置文件的加载、验证和持久化功能

use crate::config::types::{validate_config, CheckConfig};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// 初始化配置模板，由 `init` 子命令写入
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Command Vitals 配置文件
#
# command: 要执行的shell命令行，由 `sh -c` 解释，
#          允许管道、重定向和变量替换
# match_type: 输出匹配模式，可选 "exact"、"regex"、"integer"
# match_value: 期望值，按匹配模式解释
command = "echo hello"
match_type = "exact"
match_value = "hello"

# HTTP监听端口（通过表单修改后下次启动生效）
port = 8080

# HTTP绑定地址
bind_address = "0.0.0.0"

# 单次命令执行超时（秒）
timeout_seconds = 10
"#;

/// 配置存储trait，定义配置的加载和持久化接口
///
/// 存储实例持有配置文件路径，调用方无需关心文件位置。
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// 加载并验证配置
    ///
    /// # 返回
    /// * `Result<CheckConfig>` - 加载的配置或错误
    async fn load(&self) -> Result<CheckConfig>;

    /// 持久化配置
    ///
    /// # 参数
    /// * `config` - 要保存的配置
    ///
    /// # 返回
    /// * `Result<()>` - 保存结果
    async fn save(&self, config: &CheckConfig) -> Result<()>;

    /// 配置文件路径
    fn path(&self) -> &Path;
}

/// TOML配置存储实现
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    /// 配置文件路径
    path: PathBuf,
}

impl TomlConfigStore {
    /// 创建新的TOML配置存储
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// 解析TOML内容并验证
    ///
    /// # 参数
    /// * `content` - TOML内容
    ///
    /// # 返回
    /// * `Result<CheckConfig>` - 解析的配置或错误
    pub fn parse(content: &str) -> Result<CheckConfig> {
        let config: CheckConfig = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {e}")))?;

        validate_config(&config).map_err(ConfigError::ValidationError)?;

        Ok(config)
    }
}

#[async_trait]
impl ConfigStore for TomlConfigStore {
    async fn load(&self) -> Result<CheckConfig> {
        if !self.path.exists() {
            return Err(ConfigError::FileNotFound {
                path: self.path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| ConfigError::IoError {
                    path: self.path.to_string_lossy().to_string(),
                    source: e,
                })?;

        let config = Self::parse(&content)?;

        log::info!("成功加载配置文件: {}", self.path.display());
        log::debug!("配置内容: {config:?}");

        Ok(config)
    }

    async fn save(&self, config: &CheckConfig) -> Result<()> {
        let content = toml::to_string_pretty(config)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ConfigError::IoError {
                        path: parent.to_string_lossy().to_string(),
                        source: e,
                    })?;
            }
        }

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| ConfigError::IoError {
                path: self.path.to_string_lossy().to_string(),
                source: e,
            })?;

        log::info!("配置已保存到: {}", self.path.display());

        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// 获取默认配置文件路径
///
/// 优先使用当前目录下的config.toml，否则回退到用户配置目录。
pub fn default_config_path() -> PathBuf {
    if Path::new("config.toml").exists() {
        PathBuf::from("config.toml")
    } else {
        dirs::config_dir()
            .map(|config_dir| config_dir.join("command-vitals").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::check::CheckRunner;
use crate::cli::args::{Args, Commands, OutputFormat};
use crate::config::{
    ConfigManager, ConfigStore, ConfigWatcher, TomlConfigStore, DEFAULT_CONFIG_TEMPLATE,
};
use crate::error::{CommandVitalsError, Result};
use crate::web::{AppState, WebServer};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

/// 检测成功退出码
pub const EXIT_SUCCESS: i32 = 0;
/// 检测判定失败退出码
pub const EXIT_CHECK_FAILED: i32 = 1;
/// 命令执行错误退出码
pub const EXIT_EXECUTION_ERROR: i32 = 2;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令，返回进程退出码
    async fn execute(&self, args: &Args) -> Result<i32>;
}

/// 配置文件不存在时的统一错误，附带init提示
fn config_not_found(config_path: &Path) -> CommandVitalsError {
    CommandVitalsError::Other(anyhow::anyhow!(
        "配置文件不存在: {}\n提示：请运行 'command-vitals init' 创建默认配置文件",
        config_path.display()
    ))
}

/// 服务启动命令
pub struct ServeCommand;

#[async_trait]
impl Command for ServeCommand {
    async fn execute(&self, args: &Args) -> Result<i32> {
        if let Commands::Serve { port } = &args.command {
            self.run_server(args, *port).await
        } else {
            Ok(EXIT_SUCCESS)
        }
    }
}

impl ServeCommand {
    /// 启动HTTP检测服务并阻塞到收到中断信号
    async fn run_server(&self, args: &Args, port_override: Option<u16>) -> Result<i32> {
        // 1. 加载配置
        let config_path = args.get_config_path();
        if !config_path.exists() {
            return Err(config_not_found(&config_path));
        }

        let store = TomlConfigStore::new(config_path);
        let mut config = store.load().await?;

        // 命令行端口覆盖只影响本次监听，不写回配置文件
        if let Some(port) = port_override {
            info!("使用命令行端口覆盖: {}", port);
            config.port = port;
        }

        // 2. 初始化共享组件
        let manager = Arc::new(ConfigManager::new(config.clone()));
        let store: Arc<dyn ConfigStore> = Arc::new(store);

        // 3. 启动配置文件热重载
        let mut config_watcher = ConfigWatcher::new(
            store.clone(),
            manager.clone(),
            Duration::from_millis(500),
        )?;
        config_watcher.start()?;

        // 4. 设置Ctrl+C信号处理
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let shutdown_tx_clone = shutdown_tx.clone();
        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("收到中断信号，正在停止服务...");
                    let _ = shutdown_tx_clone.send(());
                }
                Err(err) => {
                    error!("监听中断信号失败: {}", err);
                }
            }
        });

        // 5. 启动Web服务器并等待关闭
        let state = AppState::new(manager, store);
        let mut server = WebServer::new(
            config.bind_address.clone(),
            config.port,
            state,
            shutdown_rx,
        );
        server.start().await?;

        config_watcher.stop();
        info!("服务已停止");

        Ok(EXIT_SUCCESS)
    }
}

/// 一次性检测命令
pub struct CheckCommand;

#[async_trait]
impl Command for CheckCommand {
    async fn execute(&self, args: &Args) -> Result<i32> {
        if let Commands::Check { format } = &args.command {
            self.run_once(args, format).await
        } else {
            Ok(EXIT_SUCCESS)
        }
    }
}

impl CheckCommand {
    /// 执行一次检测并按指定格式输出结果
    ///
    /// 退出码：0 检测成功，1 输出不匹配，2 命令执行失败。
    async fn run_once(&self, args: &Args, format: &OutputFormat) -> Result<i32> {
        let config_path = args.get_config_path();
        if !config_path.exists() {
            return Err(config_not_found(&config_path));
        }

        let store = TomlConfigStore::new(config_path);
        let config = store.load().await?;

        let runner = CheckRunner::new();
        let result = match runner.run_check(&config).await {
            Ok(result) => result,
            Err(e) => {
                eprintln!("命令执行失败: {e}");
                return Ok(EXIT_EXECUTION_ERROR);
            }
        };

        match format {
            OutputFormat::Json => {
                println!("{}", result.to_json()?);
            }
            OutputFormat::Xml => {
                let xml = result
                    .to_xml()
                    .map_err(|e| anyhow::anyhow!("XML序列化失败: {}", e))?;
                println!("{xml}");
            }
            OutputFormat::Status => {
                // 状态令牌自带换行
                print!("{}", result.to_status_line());
            }
        }

        Ok(if result.success {
            EXIT_SUCCESS
        } else {
            EXIT_CHECK_FAILED
        })
    }
}

/// 初始化命令
pub struct InitCommand;

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, args: &Args) -> Result<i32> {
        if let Commands::Init { config_path, force } = &args.command {
            self.create_config_file(config_path, *force).await
        } else {
            Ok(EXIT_SUCCESS)
        }
    }
}

impl InitCommand {
    /// 创建配置文件
    async fn create_config_file(&self, config_path: &Path, force: bool) -> Result<i32> {
        // 检查文件是否已存在
        if config_path.exists() && !force {
            eprintln!("配置文件已存在: {}", config_path.display());
            eprintln!("使用 --force 参数覆盖现有文件");
            return Ok(EXIT_SUCCESS);
        }

        // 创建目录（如果不存在）
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // 写入配置模板
        tokio::fs::write(config_path, DEFAULT_CONFIG_TEMPLATE).await?;

        println!("配置文件已创建: {}", config_path.display());
        println!("请编辑配置文件设置检测命令和匹配规则");

        Ok(EXIT_SUCCESS)
    }
}

/// 验证命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<i32> {
        if let Commands::Validate {
            config_path,
            verbose,
        } = &args.command
        {
            let config_file = config_path
                .clone()
                .unwrap_or_else(|| args.get_config_path());

            self.validate_config_file(&config_file, *verbose).await
        } else {
            Ok(EXIT_SUCCESS)
        }
    }
}

impl ValidateCommand {
    /// 验证配置文件
    async fn validate_config_file(&self, config_path: &Path, verbose: bool) -> Result<i32> {
        println!("验证配置文件: {}", config_path.display());

        let store = TomlConfigStore::new(config_path);
        let config = store.load().await?;

        if verbose {
            println!("配置验证通过！");
            println!("  检测命令: {}", config.command);
            println!("  匹配模式: {}", config.match_type);
            println!("  匹配值: {}", config.match_value);
            println!("  监听地址: {}:{}", config.bind_address, config.port);
            println!("  执行超时: {}秒", config.timeout_seconds);
        } else {
            println!("✓ 配置文件验证通过");
        }

        // 正则模式额外预检：无法编译的模式是合法配置，
        // 但每次检测都会判定为参数无效
        if config.match_type == crate::config::MatchMode::Regex {
            if let Err(e) = regex::Regex::new(&config.match_value) {
                println!("⚠️  正则表达式无法编译: {e}");
                println!("   该配置仍可保存，但检测判定将始终为失败");
            }
        }

        Ok(EXIT_SUCCESS)
    }
}

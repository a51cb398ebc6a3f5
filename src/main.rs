//! Command Vitals 主程序入口
//!
//! 单命令健康检测探针

use anyhow::{Context, Result};
use clap::Parser;
use command_vitals::cli::args::{Args, Commands};
use command_vitals::cli::commands::{
    CheckCommand, Command, InitCommand, ServeCommand, ValidateCommand,
};
use command_vitals::logging::{init_logging, LogConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.effective_log_level(),
        json_format: args.log_json,
    };
    init_logging(&log_config).context("初始化日志系统失败")?;

    info!("Command Vitals v{} 启动", command_vitals::VERSION);

    // 执行命令
    match execute_command(&args).await {
        Ok(0) => Ok(()),
        Ok(code) => {
            // 非零退出码承载检测结果语义（1 不匹配，2 执行失败）
            std::process::exit(code);
        }
        Err(e) => {
            error!("命令执行失败: {}", e);
            eprintln!("错误: {e}");
            std::process::exit(2);
        }
    }
}

/// 执行CLI命令
async fn execute_command(args: &Args) -> Result<i32> {
    match &args.command {
        Commands::Serve { .. } => {
            let command = ServeCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Check { .. } => {
            let command = CheckCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Init { .. } => {
            let command = InitCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Validate { .. } => {
            let command = ValidateCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
    }
}

//! 命令执行模块
//!
//! 通过POSIX shell执行配置的命令行并捕获输出

use crate::error::ExecutionError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// 一次命令执行的捕获结果
///
/// 只有正常退出（状态码0）才会产生该结果，非零退出和
/// 启动失败走 `ExecutionError` 路径。
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// 标准输出，按UTF-8有损解码，保留尾部换行
    pub stdout: String,
    /// 标准错误，仅用于诊断日志，不参与匹配判定
    pub stderr: String,
    /// 执行耗时
    pub duration: Duration,
}

/// 命令执行器trait，定义命令执行接口
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// 执行shell命令行并捕获标准输出
    ///
    /// # 参数
    /// * `command` - 完整的shell命令行
    /// * `deadline` - 执行超时时间
    ///
    /// # 返回
    /// * `Result<ExecOutput, ExecutionError>` - 捕获结果或执行错误
    async fn execute(
        &self,
        command: &str,
        deadline: Duration,
    ) -> std::result::Result<ExecOutput, ExecutionError>;
}

/// 基于 `sh -c` 的命令执行器
///
/// 命令行作为单个字符串交给POSIX shell解释，管道、重定向和
/// 变量替换都按操作员书写的原样生效。命令内容来自可信的操作员
/// 配置，这里不做任何转义或过滤。
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    /// 创建新的shell执行器
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn execute(
        &self,
        command: &str,
        deadline: Duration,
    ) -> std::result::Result<ExecOutput, ExecutionError> {
        debug!("执行检测命令: {command}");
        let start = Instant::now();

        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // 超时丢弃子进程句柄时同时终止进程
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutionError::Spawn {
                command: command.to_string(),
                source: e,
            })?;

        let output = match timeout(deadline, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ExecutionError::Wait {
                    command: command.to_string(),
                    source: e,
                })
            }
            Err(_) => {
                warn!("检测命令超时，已终止: {command}");
                return Err(ExecutionError::Timeout {
                    command: command.to_string(),
                    timeout: deadline,
                });
            }
        };

        let duration = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        match output.status.code() {
            Some(0) => {
                debug!("检测命令完成，耗时 {duration:?}，输出 {} 字节", stdout.len());
                Ok(ExecOutput {
                    stdout,
                    stderr,
                    duration,
                })
            }
            Some(code) => {
                if !stderr.trim().is_empty() {
                    warn!("检测命令stderr: {}", stderr.trim());
                }
                Err(ExecutionError::NonZeroExit {
                    command: command.to_string(),
                    code,
                })
            }
            None => Err(ExecutionError::Signaled {
                command: command.to_string(),
            }),
        }
    }
}

//! 检测编排模块
//!
//! 串联命令执行、输出匹配和结果组装，完成一次探测

use crate::check::executor::{CommandExecutor, ShellExecutor};
use crate::check::matcher::evaluate;
use crate::check::result::CheckResult;
use crate::config::CheckConfig;
use crate::error::ExecutionError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// 检测编排器
///
/// 每次探测对一份配置快照执行：运行命令、判定输出、组装结果。
/// 命令无法运行（启动失败、非零退出、超时）作为错误向上传播，
/// 与"输出不匹配"的失败判定严格分开。
pub struct CheckRunner {
    /// 命令执行器
    executor: Arc<dyn CommandExecutor>,
}

impl CheckRunner {
    /// 创建使用shell执行器的检测编排器
    pub fn new() -> Self {
        Self {
            executor: Arc::new(ShellExecutor::new()),
        }
    }

    /// 创建使用指定执行器的检测编排器
    ///
    /// # 参数
    /// * `executor` - 命令执行器实现
    pub fn with_executor(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// 执行一次探测
    ///
    /// # 参数
    /// * `config` - 当次使用的配置快照
    ///
    /// # 返回
    /// * `Result<CheckResult, ExecutionError>` - 检测结果或执行错误
    pub async fn run_check(
        &self,
        config: &CheckConfig,
    ) -> std::result::Result<CheckResult, ExecutionError> {
        let deadline = Duration::from_secs(config.timeout_seconds);

        let exec = match self.executor.execute(&config.command, deadline).await {
            Ok(exec) => exec,
            Err(e) => {
                error!("检测命令执行失败: {e}");
                return Err(e);
            }
        };

        let verdict = evaluate(&exec.stdout, config.match_type, &config.match_value);
        info!(
            "检测完成: 命令 {:?}, 判定 {}, 耗时 {:?}",
            config.command, verdict, exec.duration
        );

        Ok(CheckResult::new(config, exec.stdout, verdict))
    }
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::executor::ExecOutput;
    use crate::check::matcher::MatchVerdict;
    use crate::config::MatchMode;
    use async_trait::async_trait;

    fn create_test_config(command: &str, match_type: MatchMode, match_value: &str) -> CheckConfig {
        CheckConfig {
            command: command.to_string(),
            match_type,
            match_value: match_value.to_string(),
            ..CheckConfig::default()
        }
    }

    #[tokio::test]
    async fn test_exact_check_passes() {
        let runner = CheckRunner::new();
        let config = create_test_config("echo hello", MatchMode::Exact, "hello");

        let result = runner.run_check(&config).await.unwrap();
        assert!(result.success);
        assert_eq!(result.verdict, MatchVerdict::Match);
        assert_eq!(result.output, "hello\n");
        assert_eq!(result.command, "echo hello");
    }

    #[tokio::test]
    async fn test_integer_check_passes() {
        let runner = CheckRunner::new();
        let config = create_test_config("echo 42", MatchMode::Integer, "42");

        let result = runner.run_check(&config).await.unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_unparsable_output_fails_without_error() {
        let runner = CheckRunner::new();
        let config = create_test_config("echo abc", MatchMode::Integer, "42");

        // 解析失败是失败判定，不是执行错误
        let result = runner.run_check(&config).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.verdict, MatchVerdict::NoMatch);
    }

    #[tokio::test]
    async fn test_regex_check_on_multiline_output() {
        let runner = CheckRunner::new();
        let config = create_test_config(
            "printf 'line one\\nstatus: ok\\n'",
            MatchMode::Regex,
            r"status: ok",
        );

        let result = runner.run_check(&config).await.unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_malformed_regex_yields_invalid_verdict() {
        let runner = CheckRunner::new();
        let config = create_test_config("echo hello", MatchMode::Regex, "[unclosed");

        let result = runner.run_check(&config).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.verdict, MatchVerdict::Invalid);
    }

    #[tokio::test]
    async fn test_failing_command_is_execution_error() {
        let runner = CheckRunner::new();
        let config = create_test_config("exit 1", MatchMode::Exact, "hello");

        let result = runner.run_check(&config).await;
        assert!(matches!(result, Err(ExecutionError::NonZeroExit { .. })));
    }

    #[tokio::test]
    async fn test_hung_command_is_timeout_error() {
        let runner = CheckRunner::new();
        let mut config = create_test_config("sleep 30", MatchMode::Exact, "hello");
        config.timeout_seconds = 1;

        let result = runner.run_check(&config).await;
        assert!(matches!(result, Err(ExecutionError::Timeout { .. })));
    }

    /// 返回固定输出的执行器，用于隔离编排逻辑
    struct FixedExecutor {
        stdout: String,
    }

    #[async_trait]
    impl CommandExecutor for FixedExecutor {
        async fn execute(
            &self,
            _command: &str,
            _deadline: Duration,
        ) -> std::result::Result<ExecOutput, ExecutionError> {
            Ok(ExecOutput {
                stdout: self.stdout.clone(),
                stderr: String::new(),
                duration: Duration::from_millis(1),
            })
        }
    }

    #[tokio::test]
    async fn test_runner_uses_injected_executor() {
        let executor = Arc::new(FixedExecutor {
            stdout: "ok\n".to_string(),
        });
        let runner = CheckRunner::with_executor(executor);
        let config = create_test_config("ignored", MatchMode::Exact, "ok");

        let result = runner.run_check(&config).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "ok\n");
    }
}

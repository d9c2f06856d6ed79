//! 进程检查
//!
//! 执行外部客户端（如 `mysqladmin ping`）并根据其结果判断健康状态。

use crate::Probe;
use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug)]
pub struct ProcessProbe<'a> {
    command: &'a str,
    args: &'a [String],
    expect_stdout: Option<&'a str>,
}

impl<'a> ProcessProbe<'a> {
    pub fn new(command: &'a str, args: &'a [String], expect_stdout: Option<&'a str>) -> Self {
        Self {
            command,
            args,
            expect_stdout,
        }
    }
}

#[async_trait]
impl Probe for ProcessProbe<'_> {
    /// 退出码为 0 即健康；配置了 `expect_stdout` 时只看标准输出
    /// 是否包含该字面量（忽略退出码）
    async fn run(&self) -> Result<()> {
        // 超时会丢弃该 future，kill_on_drop 保证子进程随之结束
        let output = Command::new(self.command)
            .args(self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProbeError::Spawn {
                command: self.command.to_string(),
                source,
            })?;

        match self.expect_stdout {
            Some(expected) => {
                if contains(&output.stdout, expected.as_bytes()) {
                    Ok(())
                } else {
                    Err(ProbeError::MissingOutput {
                        expected: expected.to_string(),
                    })
                }
            }
            None if output.status.success() => Ok(()),
            None => Err(ProbeError::ExitStatus {
                code: output.status.code(),
            }),
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_exit_code_zero_is_healthy() {
        let no_args = Vec::new();
        assert!(ProcessProbe::new("true", &no_args, None).run().await.is_ok());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_unhealthy() {
        let no_args = Vec::new();
        let err = ProcessProbe::new("false", &no_args, None)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::ExitStatus { code: Some(1) }));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let no_args = Vec::new();
        let err = ProcessProbe::new("svcmon-definitely-missing-binary", &no_args, None)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_expected_stdout() {
        let pong = args(&["-c", "echo PONG; exit 3"]);
        assert!(ProcessProbe::new("sh", &pong, Some("PONG")).run().await.is_ok());

        let loading = args(&["-c", "echo LOADING"]);
        let err = ProcessProbe::new("sh", &loading, Some("PONG"))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::MissingOutput { .. }));
    }
}

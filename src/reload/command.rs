//! Reload by running an external command (`docker restart <container>`).

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::PodsyncConfig;
use crate::reload::{ReloadError, ServiceReloader};

/// Restarts the dependent service with a command, bounded by a timeout.
#[derive(Debug, Clone)]
pub struct CommandReloader {
    program: String,
    args: Vec<String>,
    target: String,
    timeout: Duration,
}

impl CommandReloader {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        target: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            target: target.into(),
            timeout,
        }
    }

    /// `docker restart <container_name>` with the configured timeout.
    pub fn docker(config: &PodsyncConfig) -> Self {
        Self::new(
            "docker",
            vec!["restart".to_string(), config.container_name.clone()],
            config.container_name.clone(),
            Duration::from_secs(config.reload_timeout_secs),
        )
    }
}

#[async_trait]
impl ServiceReloader for CommandReloader {
    fn target(&self) -> &str {
        &self.target
    }

    async fn reload(&self) -> Result<(), ReloadError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ReloadError::Timeout(self.timeout))?
            .map_err(|source| ReloadError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(ReloadError::Failed {
            status: output.status.to_string(),
            output: combined.trim().to_string(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, timeout: Duration) -> CommandReloader {
        CommandReloader::new("sh", vec!["-c".into(), script.into()], "test", timeout)
    }

    #[tokio::test]
    async fn test_success() {
        assert!(sh("exit 0", Duration::from_secs(5)).reload().await.is_ok());
    }

    #[tokio::test]
    async fn test_failure_captures_output() {
        let err = sh("echo no such container >&2; exit 1", Duration::from_secs(5))
            .reload()
            .await
            .unwrap_err();
        match err {
            ReloadError::Failed { output, .. } => assert!(output.contains("no such container")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let err = sh("sleep 5", Duration::from_millis(100)).reload().await.unwrap_err();
        assert!(matches!(err, ReloadError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let reloader = CommandReloader::new(
            "podconfig-definitely-missing-binary",
            vec![],
            "x",
            Duration::from_secs(1),
        );
        assert!(matches!(reloader.reload().await, Err(ReloadError::Spawn { .. })));
    }
}

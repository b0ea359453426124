use crate::adapter::ToolAdapter;
use async_trait::async_trait;
use overseer_core::{OverseerError, OverseerResult};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT_SECS: u64 = 600;
const MAX_STDOUT_BYTES: usize = 50_000;
const MAX_STDERR_BYTES: usize = 10_000;

/// Shell execution with a bounded timeout.
///
/// Arguments: `{command, timeout_secs?}`. A completed process — even one
/// exiting non-zero — is a successful invocation whose result carries
/// `{returncode, stdout, stderr}`; only a timeout or a spawn failure
/// surfaces as a tool error.
pub struct CommandRunner {
    cwd: Option<PathBuf>,
    timeout: Duration,
}

impl CommandRunner {
    /// Registry name for this adapter.
    pub const NAME: &'static str = "command_runner";

    /// Creates a runner with the default timeout, inheriting the process cwd.
    pub fn new() -> Self {
        Self {
            cwd: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Runs commands from `cwd` instead of the process working directory.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Overrides the default execution timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolAdapter for CommandRunner {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn invoke(&self, args: Value) -> OverseerResult<Value> {
        let command = args["command"]
            .as_str()
            .ok_or_else(|| OverseerError::Tool("command_runner: missing 'command'".to_string()))?;
        let timeout = args["timeout_secs"]
            .as_u64()
            .map(Duration::from_secs)
            .unwrap_or(self.timeout)
            .min(self.timeout);
        debug!(command, timeout_secs = timeout.as_secs(), "Running command");

        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(command);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => Ok(json!({
                "returncode": output.status.code().unwrap_or(-1),
                "stdout": truncate(&String::from_utf8_lossy(&output.stdout), MAX_STDOUT_BYTES),
                "stderr": truncate(&String::from_utf8_lossy(&output.stderr), MAX_STDERR_BYTES),
            })),
            Ok(Err(e)) => Err(OverseerError::Tool(format!(
                "command_runner: failed to spawn '{command}': {e}"
            ))),
            Err(_) => Err(OverseerError::Tool(format!(
                "command_runner: '{command}' timed out after {}s",
                timeout.as_secs()
            ))),
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}... [truncated, {} total bytes]", &s[..max_len], s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_captures_stdout() {
        let runner = CommandRunner::new();
        let result = runner
            .invoke(json!({"command": "echo hello"}))
            .await
            .unwrap();
        assert_eq!(result["returncode"], 0);
        assert!(result["stdout"].as_str().unwrap().contains("hello"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_captured_not_error() {
        let runner = CommandRunner::new();
        let result = runner
            .invoke(json!({"command": "sh -c 'exit 3'"}))
            .await
            .unwrap();
        assert_eq!(result["returncode"], 3);
    }

    #[tokio::test]
    async fn test_stderr_captured() {
        let runner = CommandRunner::new();
        let result = runner
            .invoke(json!({"command": "echo oops >&2"}))
            .await
            .unwrap();
        assert!(result["stderr"].as_str().unwrap().contains("oops"));
    }

    #[tokio::test]
    async fn test_timeout_is_tool_error() {
        let runner = CommandRunner::new();
        let err = runner
            .invoke(json!({"command": "sleep 5", "timeout_secs": 1}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_missing_command_is_tool_error() {
        let runner = CommandRunner::new();
        let err = runner.invoke(json!({})).await.unwrap_err();
        assert!(matches!(err, OverseerError::Tool(_)));
    }

    #[tokio::test]
    async fn test_cwd_applies() {
        let dir = tempfile::tempdir().unwrap();
        let runner = CommandRunner::new().with_cwd(dir.path());
        let result = runner.invoke(json!({"command": "pwd"})).await.unwrap();
        let stdout = result["stdout"].as_str().unwrap();
        assert!(stdout.trim_end().ends_with(
            dir.path()
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
        ));
    }

    #[test]
    fn test_truncate_long_output() {
        let long = "x".repeat(100);
        let out = truncate(&long, 10);
        assert!(out.starts_with("xxxxxxxxxx..."));
        assert!(out.contains("100 total bytes"));
    }
}

use crate::agent::Agent;
use async_trait::async_trait;
use overseer_core::{AgentMessage, OverseerResult};
use overseer_tools::{CommandRunner, ToolAdapter, ToolRegistry};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

/// Runs the caller-declared validation command and classifies the outcome
/// by exit code. The pass/fail verdict lives in the task result; it does
/// not change the task's status.
pub struct EvaluationAgent {
    name: String,
    tools: Arc<ToolRegistry>,
    default_command: String,
}

impl EvaluationAgent {
    /// Creates an evaluator; `default_command` runs when a task declares none.
    pub fn new(
        name: impl Into<String>,
        tools: Arc<ToolRegistry>,
        default_command: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tools,
            default_command: default_command.into(),
        }
    }
}

#[async_trait]
impl Agent for EvaluationAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, inbound: AgentMessage) -> OverseerResult<AgentMessage> {
        let command = inbound
            .metadata_str("command")
            .unwrap_or(self.default_command.as_str())
            .to_string();
        info!(command = %command, "Evaluation agent running check");

        let runner = self.tools.require(CommandRunner::NAME)?;
        let result = runner.invoke(json!({"command": &command})).await?;

        let returncode = result["returncode"].as_i64().unwrap_or(-1);
        let status = if returncode == 0 { "passed" } else { "failed" };
        info!(command = %command, returncode, status, "Evaluation finished");

        let mut metadata = Map::new();
        metadata.insert(
            "task_id".to_string(),
            json!(inbound.metadata_str("task_id").unwrap_or_default()),
        );
        metadata.insert(
            "description".to_string(),
            json!(inbound.metadata_str("description").unwrap_or_default()),
        );
        metadata.insert("command".to_string(), Value::String(command));
        metadata.insert("status".to_string(), json!(status));
        metadata.insert("stdout".to_string(), result["stdout"].clone());
        metadata.insert("stderr".to_string(), result["stderr"].clone());
        metadata.insert("returncode".to_string(), json!(returncode));
        Ok(AgentMessage::new(&self.name, "evaluation-result").with_metadata(metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CommandRunner::new()));
        Arc::new(registry)
    }

    fn message(command: &str) -> AgentMessage {
        let mut metadata = Map::new();
        metadata.insert("task_id".to_string(), json!("qa-1"));
        metadata.insert("command".to_string(), json!(command));
        AgentMessage::new("orchestrator", "validate").with_metadata(metadata)
    }

    #[tokio::test]
    async fn test_zero_exit_classified_passed() {
        let agent = EvaluationAgent::new("evaluator", registry(), "true");
        let reply = agent.handle(message("echo all good")).await.unwrap();
        assert_eq!(reply.content, "evaluation-result");
        assert_eq!(reply.metadata_str("status"), Some("passed"));
        assert_eq!(reply.metadata["returncode"], 0);
        assert!(reply.metadata_str("stdout").unwrap().contains("all good"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_classified_failed() {
        let agent = EvaluationAgent::new("evaluator", registry(), "true");
        let reply = agent.handle(message("sh -c 'exit 2'")).await.unwrap();
        assert_eq!(reply.metadata_str("status"), Some("failed"));
        assert_eq!(reply.metadata["returncode"], 2);
    }

    #[tokio::test]
    async fn test_missing_command_uses_default() {
        let agent = EvaluationAgent::new("evaluator", registry(), "echo default-check");
        let reply = agent
            .handle(AgentMessage::new("orchestrator", "validate"))
            .await
            .unwrap();
        assert_eq!(reply.metadata_str("command"), Some("echo default-check"));
        assert_eq!(reply.metadata_str("status"), Some("passed"));
    }
}

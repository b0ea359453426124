use crate::actions::Action;
use crate::agent::Agent;
use async_trait::async_trait;
use overseer_core::{AgentMessage, OverseerResult};
use overseer_tools::{CommandRunner, FileStore, TextGenerator, ToolAdapter, ToolRegistry};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Executes the workspace-mutating actions carried in a task's metadata.
///
/// Tool failures are contained per action: a failed generation call runs
/// the declared fallback command, a failed file or script action is
/// recorded as a warning, and in every case the task still reports
/// completion with whatever partial results were produced. This agent
/// never fails the task itself; only a missing tool registration escapes
/// `handle` and aborts the run.
pub struct GenerationAgent {
    name: String,
    tools: Arc<ToolRegistry>,
}

impl GenerationAgent {
    /// Creates an agent drawing its capabilities from `tools`.
    pub fn new(name: impl Into<String>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            name: name.into(),
            tools,
        }
    }
}

#[async_trait]
impl Agent for GenerationAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, inbound: AgentMessage) -> OverseerResult<AgentMessage> {
        let task_id = inbound.metadata_str("task_id").unwrap_or_default().to_string();
        info!(task = %task_id, "Generation agent handling task");

        // Resolve every capability up front: an unknown tool is a
        // configuration error and must abort before any side effect.
        let files = self.tools.require(FileStore::NAME)?;
        let runner = self.tools.require(CommandRunner::NAME)?;
        let generator = self.tools.require(TextGenerator::NAME)?;

        let actions = inbound
            .metadata
            .get("actions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let mut files_touched: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        for raw in &actions {
            let action = match serde_json::from_value::<Action>(raw.clone()) {
                Ok(action) => action,
                Err(e) => {
                    warn!(action = %raw, error = %e, "Skipping malformed action");
                    warnings.push(format!("skipped malformed action: {e}"));
                    continue;
                }
            };

            match action {
                Action::Write { path, content } => {
                    match files
                        .invoke(json!({"operation": "write", "path": &path, "content": &content}))
                        .await
                    {
                        Ok(result) => {
                            info!(path = %path, result = %result, "Applied write");
                            files_touched.push(path);
                        }
                        Err(e) => {
                            warn!(path = %path, error = %e, "File action failed");
                            warnings.push(format!("write '{path}' failed: {e}"));
                        }
                    }
                }
                Action::Append { path, content } => {
                    match files
                        .invoke(json!({"operation": "append", "path": &path, "content": &content}))
                        .await
                    {
                        Ok(result) => {
                            info!(path = %path, result = %result, "Applied append");
                            files_touched.push(path);
                        }
                        Err(e) => {
                            warn!(path = %path, error = %e, "File action failed");
                            warnings.push(format!("append '{path}' failed: {e}"));
                        }
                    }
                }
                Action::Script {
                    command,
                    description,
                } => match runner.invoke(json!({"command": &command})).await {
                    Ok(result) => {
                        info!(command = %command, returncode = %result["returncode"], "Executed script");
                        files_touched.push(description.unwrap_or(command));
                    }
                    Err(e) => {
                        warn!(command = %command, error = %e, "Script action failed");
                        warnings.push(format!("script '{command}' failed: {e}"));
                    }
                },
                Action::Generate {
                    prompt,
                    path,
                    fallback_command,
                } => match generator.invoke(json!({"prompt": &prompt})).await {
                    Ok(output) => {
                        let raw_text = output["text"].as_str().unwrap_or_default();
                        let persisted = clean_generated(raw_text);
                        match files
                            .invoke(json!({
                                "operation": "write",
                                "path": &path,
                                "content": &persisted,
                            }))
                            .await
                        {
                            Ok(_) => {
                                info!(path = %path, "Generated content written");
                                files_touched.push(path);
                            }
                            Err(e) => {
                                warn!(path = %path, error = %e, "Persisting generated content failed");
                                warnings.push(format!("write '{path}' failed: {e}"));
                            }
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Generation call failed, falling back");
                        match fallback_command {
                            Some(command) => {
                                match runner.invoke(json!({"command": &command})).await {
                                    Ok(result) => {
                                        info!(
                                            command = %command,
                                            returncode = %result["returncode"],
                                            "Fallback command executed"
                                        );
                                        files_touched.push(command);
                                    }
                                    Err(e2) => {
                                        warn!(command = %command, error = %e2, "Fallback command failed");
                                        warnings.push(format!("fallback '{command}' failed: {e2}"));
                                    }
                                }
                            }
                            None => {
                                error!(path = %path, "No fallback command declared for failed generation");
                                warnings.push(format!(
                                    "generation for '{path}' failed with no fallback: {e}"
                                ));
                            }
                        }
                    }
                },
            }
        }

        let notes = if actions.is_empty() {
            "No actions provided; task recorded only."
        } else {
            "Executed scripted actions"
        };
        let mut metadata = Map::new();
        metadata.insert("task_id".to_string(), Value::String(task_id));
        metadata.insert("status".to_string(), json!("completed"));
        metadata.insert("notes".to_string(), json!(notes));
        metadata.insert("files_touched".to_string(), json!(files_touched));
        metadata.insert("warnings".to_string(), json!(warnings));
        Ok(AgentMessage::new(&self.name, "task-complete").with_metadata(metadata))
    }
}

/// Strips surrounding markdown code-fence markup, if present.
fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let mut lines: Vec<&str> = trimmed.lines().collect();
    if lines.first().is_some_and(|l| l.starts_with("```")) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.trim() == "```") {
        lines.pop();
    }
    lines.join("\n")
}

/// Drops records whose `(id, title)` pair was already seen, first-seen wins.
/// Records missing either field are dropped outright.
fn dedupe_records(records: Vec<Value>) -> Vec<Value> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut unique = Vec::new();
    for record in records {
        let key = match (
            record.get("id").and_then(Value::as_str),
            record.get("title").and_then(Value::as_str),
        ) {
            (Some(id), Some(title)) if !id.is_empty() && !title.is_empty() => {
                (id.to_string(), title.to_string())
            }
            _ => continue,
        };
        if seen.insert(key) {
            unique.push(record);
        }
    }
    unique
}

/// Normalizes a raw generation result: strip fences, then parse as an array
/// of records and deduplicate; on parse failure keep the stripped text.
fn clean_generated(raw: &str) -> String {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<Vec<Value>>(&cleaned) {
        Ok(records) => {
            let before = records.len();
            let unique = dedupe_records(records);
            if unique.len() < before {
                info!(removed = before - unique.len(), "Removed duplicate records");
            }
            serde_json::to_string_pretty(&unique).unwrap_or(cleaned)
        }
        Err(e) => {
            warn!(error = %e, "Structured parse failed, keeping raw text");
            cleaned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overseer_core::OverseerError;
    use overseer_tools::ToolAdapter;

    struct StubGenerator {
        response: Option<String>,
    }

    #[async_trait]
    impl ToolAdapter for StubGenerator {
        fn name(&self) -> &str {
            TextGenerator::NAME
        }

        async fn invoke(&self, _args: Value) -> OverseerResult<Value> {
            match &self.response {
                Some(text) => Ok(json!({ "text": text })),
                None => Err(OverseerError::Http("generation unavailable".to_string())),
            }
        }
    }

    fn registry(root: &std::path::Path, generator: StubGenerator) -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FileStore::new(root)));
        registry.register(Arc::new(CommandRunner::new().with_cwd(root)));
        registry.register(Arc::new(generator));
        Arc::new(registry)
    }

    fn message_with_actions(actions: Value) -> AgentMessage {
        let mut metadata = Map::new();
        metadata.insert("task_id".to_string(), json!("t-1"));
        metadata.insert("actions".to_string(), actions);
        AgentMessage::new("orchestrator", "do the work").with_metadata(metadata)
    }

    #[test]
    fn test_strip_code_fences_json_block() {
        let fenced = "```json\n[{\"id\": 1}]\n```";
        assert_eq!(strip_code_fences(fenced), "[{\"id\": 1}]");
    }

    #[test]
    fn test_strip_code_fences_plain_text_unchanged() {
        assert_eq!(strip_code_fences("  plain text  "), "plain text");
    }

    #[test]
    fn test_dedupe_first_seen_wins() {
        let records = vec![
            json!({"id": "a", "title": "First", "rank": 1}),
            json!({"id": "b", "title": "Second"}),
            json!({"id": "a", "title": "First", "rank": 99}),
        ];
        let unique = dedupe_records(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0]["rank"], 1);
    }

    #[test]
    fn test_dedupe_drops_keyless_records() {
        let records = vec![
            json!({"id": "a", "title": "Keep"}),
            json!({"title": "No id"}),
            json!({"id": "", "title": "Empty id"}),
        ];
        assert_eq!(dedupe_records(records).len(), 1);
    }

    #[tokio::test]
    async fn test_generate_action_dedupes_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let fenced = "```json\n[\
            {\"id\": \"e1\", \"title\": \"Alpha\"},\
            {\"id\": \"e2\", \"title\": \"Beta\"},\
            {\"id\": \"e1\", \"title\": \"Alpha\"}]\n```";
        let agent = GenerationAgent::new(
            "builder",
            registry(
                dir.path(),
                StubGenerator {
                    response: Some(fenced.to_string()),
                },
            ),
        );

        let reply = agent
            .handle(message_with_actions(json!([
                {"operation": "generate", "prompt": "entries", "path": "data/entries.json"}
            ])))
            .await
            .unwrap();

        assert_eq!(reply.metadata_str("status"), Some("completed"));
        let written = std::fs::read_to_string(dir.path().join("data/entries.json")).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["id"], "e1");
        assert_eq!(parsed[1]["id"], "e2");
    }

    #[tokio::test]
    async fn test_generate_unparseable_output_persisted_raw() {
        let dir = tempfile::tempdir().unwrap();
        let agent = GenerationAgent::new(
            "builder",
            registry(
                dir.path(),
                StubGenerator {
                    response: Some("not structured at all".to_string()),
                },
            ),
        );

        agent
            .handle(message_with_actions(json!([
                {"operation": "generate", "prompt": "entries", "path": "data/raw.txt"}
            ])))
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("data/raw.txt")).unwrap();
        assert_eq!(written, "not structured at all");
    }

    #[tokio::test]
    async fn test_generate_failure_runs_fallback_once() {
        let dir = tempfile::tempdir().unwrap();
        let agent = GenerationAgent::new(
            "builder",
            registry(dir.path(), StubGenerator { response: None }),
        );

        let reply = agent
            .handle(message_with_actions(json!([{
                "operation": "generate",
                "prompt": "entries",
                "path": "data/entries.json",
                "fallback_command": "echo ran >> marker.txt",
            }])))
            .await
            .unwrap();

        assert_eq!(reply.metadata_str("status"), Some("completed"));
        let marker = std::fs::read_to_string(dir.path().join("marker.txt")).unwrap();
        assert_eq!(marker.lines().count(), 1, "fallback must run exactly once");
        assert!(!dir.path().join("data/entries.json").exists());
    }

    #[tokio::test]
    async fn test_generate_failure_without_fallback_still_completes() {
        let dir = tempfile::tempdir().unwrap();
        let agent = GenerationAgent::new(
            "builder",
            registry(dir.path(), StubGenerator { response: None }),
        );

        let reply = agent
            .handle(message_with_actions(json!([
                {"operation": "generate", "prompt": "entries", "path": "data/entries.json"}
            ])))
            .await
            .unwrap();

        assert_eq!(reply.metadata_str("status"), Some("completed"));
        assert!(!dir.path().join("data/entries.json").exists());
        let warnings = reply.metadata["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_action_skipped_rest_applied() {
        let dir = tempfile::tempdir().unwrap();
        let agent = GenerationAgent::new(
            "builder",
            registry(dir.path(), StubGenerator { response: None }),
        );

        let reply = agent
            .handle(message_with_actions(json!([
                {"operation": "write"},
                {"operation": "write", "path": "ok.txt", "content": "fine"},
            ])))
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("ok.txt")).unwrap(),
            "fine"
        );
        let warnings = reply.metadata["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
        let touched = reply.metadata["files_touched"].as_array().unwrap();
        assert_eq!(touched.len(), 1);
    }

    #[tokio::test]
    async fn test_no_actions_reports_recorded_only() {
        let dir = tempfile::tempdir().unwrap();
        let agent = GenerationAgent::new(
            "builder",
            registry(dir.path(), StubGenerator { response: None }),
        );

        let reply = agent
            .handle(AgentMessage::new("orchestrator", "nothing to do"))
            .await
            .unwrap();
        assert_eq!(
            reply.metadata_str("notes"),
            Some("No actions provided; task recorded only.")
        );
    }

    #[tokio::test]
    async fn test_missing_tool_registration_is_fatal() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StubGenerator { response: None }));
        let agent = GenerationAgent::new("builder", Arc::new(registry));

        let err = agent
            .handle(AgentMessage::new("orchestrator", "anything"))
            .await
            .unwrap_err();
        assert!(matches!(err, OverseerError::UnknownTool(_)));
    }
}

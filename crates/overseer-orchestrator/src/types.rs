use chrono::{DateTime, Utc};
use overseer_agents::PlannedTask;
use overseer_core::AgentRole;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status of a task in the graph.
///
/// Transitions are monotonic: `Pending → InProgress → {Completed | Failed}`
/// and never reverse. `Failed` is reachable only when a dispatch error
/// aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet dispatched.
    Pending,
    /// Currently being handled by its owning agent.
    InProgress,
    /// Dispatch finished and the result was recorded.
    Completed,
    /// Dispatch raised an unrecoverable error.
    Failed {
        /// The error that aborted the dispatch.
        reason: String,
    },
}

/// One unit of work in the orchestration graph.
///
/// Owned exclusively by the orchestrator for its lifetime: created at
/// plan-ingestion time, mutated only by the scheduling loop, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique id within the graph, chosen by the plan author.
    pub id: String,
    /// Short human-readable title.
    pub title: String,
    /// What the owning agent should do.
    pub description: String,
    /// Role whose agent executes this task.
    pub owner: AgentRole,
    /// Ids of tasks that must be `Completed` before this one is ready.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Opaque payload interpreted by the owning agent.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// The agent's reply metadata, recorded on completion.
    #[serde(default)]
    pub result: Option<Map<String, Value>>,
    /// When the task entered the graph.
    pub created_at: DateTime<Utc>,
    /// When the task completed, if it has.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a pending task with no dependencies or metadata.
    pub fn new(id: impl Into<String>, title: impl Into<String>, owner: AgentRole) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            owner,
            depends_on: Vec::new(),
            status: TaskStatus::Pending,
            metadata: Map::new(),
            result: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declares the tasks this one depends on.
    #[must_use]
    pub fn with_dependencies(mut self, deps: Vec<String>) -> Self {
        self.depends_on = deps;
        self
    }

    /// Attaches the agent-facing payload.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

impl From<PlannedTask> for Task {
    fn from(planned: PlannedTask) -> Self {
        Self {
            id: planned.id,
            title: planned.title,
            description: planned.description,
            owner: planned.owner,
            depends_on: planned.depends_on,
            status: TaskStatus::Pending,
            metadata: planned.metadata,
            result: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// Per-task status line exposed by [`crate::Orchestrator::summary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task id.
    pub id: String,
    /// Current status.
    pub status: TaskStatus,
    /// Owning role.
    pub owner: AgentRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation_defaults() {
        let task = Task::new("t-1", "First", AgentRole::Generation);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.depends_on.is_empty());
        assert!(task.result.is_none());
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_status_serialization() {
        let status = TaskStatus::Failed {
            reason: "timeout".to_string(),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("timeout"));
        let parsed: TaskStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, status);
    }

    #[test]
    fn test_from_planned_task() {
        let planned: PlannedTask = serde_json::from_value(serde_json::json!({
            "id": "plan-a",
            "title": "A",
            "description": "do a",
            "owner": "evaluation",
            "depends_on": ["plan-b"],
        }))
        .unwrap();
        let task = Task::from(planned);
        assert_eq!(task.id, "plan-a");
        assert_eq!(task.owner, AgentRole::Evaluation);
        assert_eq!(task.depends_on, vec!["plan-b".to_string()]);
        assert_eq!(task.status, TaskStatus::Pending);
    }
}

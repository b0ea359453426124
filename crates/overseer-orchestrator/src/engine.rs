use crate::graph::TaskGraph;
use crate::types::{Task, TaskStatus, TaskSummary};
use overseer_agents::{Agent, PlannedTask};
use overseer_core::{AgentMessage, AgentRole, OverseerError, OverseerResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// The orchestration engine: plan ingestion, dependency-gated dispatch,
/// and status reporting.
///
/// External callers drive it through three entry points — [`bootstrap`],
/// [`run`] and [`summary`] — whether they are a CLI, an HTTP handler or a
/// cron trigger. The engine has no timeout or cancellation concept of its
/// own; a hung tool call blocks the run.
///
/// [`bootstrap`]: Orchestrator::bootstrap
/// [`run`]: Orchestrator::run
/// [`summary`]: Orchestrator::summary
pub struct Orchestrator {
    planner: Arc<dyn Agent>,
    routes: HashMap<AgentRole, Arc<dyn Agent>>,
    graph: TaskGraph,
    run_id: Option<Uuid>,
}

impl Orchestrator {
    /// Creates an engine around a planning agent; task owners are wired
    /// with [`Orchestrator::with_route`].
    pub fn new(planner: Arc<dyn Agent>) -> Self {
        Self {
            planner,
            routes: HashMap::new(),
            graph: TaskGraph::new(),
            run_id: None,
        }
    }

    /// Routes tasks owned by `role` to `agent`.
    #[must_use]
    pub fn with_route(mut self, role: AgentRole, agent: Arc<dyn Agent>) -> Self {
        self.routes.insert(role, agent);
        self
    }

    /// Id of the current orchestration run, once bootstrapped.
    pub fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    /// Read access to the task graph.
    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    /// Builds a fresh task graph for `requirement`.
    ///
    /// Sends a synthetic inbound message to the planner, ingests its
    /// `metadata["tasks"]` payload, and computes the initial ready-queue.
    /// Any previous run's graph is discarded. Returns the task count.
    pub async fn bootstrap(&mut self, requirement: &str) -> OverseerResult<usize> {
        let run_id = Uuid::new_v4();
        self.run_id = Some(run_id);
        info!(run_id = %run_id, requirement, "Bootstrapping orchestration run");

        let inbound = AgentMessage::new("caller", requirement);
        let plan = self.planner.handle(inbound).await?;
        let payload = plan
            .metadata
            .get("tasks")
            .cloned()
            .ok_or_else(|| OverseerError::Plan("planner reply missing 'tasks'".to_string()))?;
        let planned: Vec<PlannedTask> = serde_json::from_value(payload)
            .map_err(|e| OverseerError::Plan(format!("planner payload malformed: {e}")))?;

        self.graph = TaskGraph::new();
        self.graph
            .ingest(planned.into_iter().map(Task::from).collect())?;
        self.graph.refresh_queue();
        info!(tasks = self.graph.len(), "Planner populated task graph");
        Ok(self.graph.len())
    }

    /// Drains the ready-queue, dispatching one task at a time.
    ///
    /// Each pop transitions the task to `InProgress`, routes it to the
    /// agent owning its role, records the reply metadata as the result,
    /// marks it `Completed`, and rebuilds the queue. A dispatch error marks
    /// the task `Failed` and aborts the run with that error. Tasks caught
    /// in a dependency cycle are never enqueued and remain `Pending` when
    /// the run terminates. Calling `run` on a drained graph is a no-op.
    pub async fn run(&mut self) -> OverseerResult<()> {
        while let Some(id) = self.graph.pop_ready() {
            self.dispatch(&id).await?;
            self.graph.refresh_queue();
        }
        Ok(())
    }

    async fn dispatch(&mut self, id: &str) -> OverseerResult<()> {
        self.graph.mark(id, TaskStatus::InProgress)?;
        match self.dispatch_inner(id).await {
            Ok(result) => {
                self.graph.set_result(id, result)?;
                self.graph.mark(id, TaskStatus::Completed)?;
                info!(task = %id, "Task completed");
                Ok(())
            }
            Err(e) => {
                error!(task = %id, error = %e, "Dispatch failed, aborting run");
                let failed = TaskStatus::Failed {
                    reason: e.to_string(),
                };
                // InProgress → Failed is always legal here.
                let _ = self.graph.mark(id, failed);
                Err(e)
            }
        }
    }

    async fn dispatch_inner(&self, id: &str) -> OverseerResult<Map<String, Value>> {
        let task = self
            .graph
            .task(id)
            .ok_or_else(|| OverseerError::Task(format!("unknown task id '{id}'")))?;
        let agent = self
            .routes
            .get(&task.owner)
            .cloned()
            .ok_or_else(|| OverseerError::UnknownRole(task.owner.to_string()))?;
        info!(task = %id, owner = %task.owner, "Dispatching task");

        let mut metadata = task.metadata.clone();
        metadata.insert("task_id".to_string(), Value::String(id.to_string()));
        let outbound = AgentMessage::new("orchestrator", &task.description).with_metadata(metadata);

        let reply = agent.handle(outbound).await?;
        Ok(reply.metadata)
    }

    /// Per-task `{id, status, owner}` report in insertion order.
    pub fn summary(&self) -> Vec<TaskSummary> {
        self.graph.summaries()
    }
}

use crate::types::{Task, TaskStatus, TaskSummary};
use chrono::Utc;
use overseer_core::{OverseerError, OverseerResult};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet, VecDeque};

/// Insertion-ordered task store plus the FIFO ready-queue.
///
/// The queue holds a task id at most once and only while that task is
/// `Pending`; both invariants hold because the queue is rebuilt from
/// scratch by a single insertion-order scan after every completion.
pub struct TaskGraph {
    tasks: HashMap<String, Task>,
    order: Vec<String>,
    queue: VecDeque<String>,
}

impl TaskGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            order: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Inserts a batch of tasks, preserving their order.
    ///
    /// Rejects duplicate ids and dependencies that reference ids unknown to
    /// both the existing graph and the incoming batch — a dangling
    /// dependency is a construction error, never silently ignored.
    pub fn ingest(&mut self, incoming: Vec<Task>) -> OverseerResult<()> {
        let mut known: HashSet<&str> = self.order.iter().map(String::as_str).collect();
        for task in &incoming {
            if !known.insert(task.id.as_str()) {
                return Err(OverseerError::Plan(format!(
                    "duplicate task id '{}'",
                    task.id
                )));
            }
        }
        for task in &incoming {
            for dep in &task.depends_on {
                if !known.contains(dep.as_str()) {
                    return Err(OverseerError::Plan(format!(
                        "task '{}' depends on unknown task '{}'",
                        task.id, dep
                    )));
                }
            }
        }
        for task in incoming {
            self.order.push(task.id.clone());
            self.tasks.insert(task.id.clone(), task);
        }
        Ok(())
    }

    /// Looks up a task by id.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.order.iter().filter_map(|id| self.tasks.get(id))
    }

    /// Number of tasks in the graph.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the graph holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn dependencies_met(&self, task: &Task) -> bool {
        task.depends_on.iter().all(|dep| {
            self.tasks
                .get(dep)
                .is_some_and(|t| t.status == TaskStatus::Completed)
        })
    }

    /// Pending tasks whose every dependency is `Completed`, insertion order.
    pub fn ready_set(&self) -> Vec<&Task> {
        self.tasks()
            .filter(|t| t.status == TaskStatus::Pending && self.dependencies_met(t))
            .collect()
    }

    /// Rebuilds the ready-queue from scratch.
    ///
    /// Tasks become newly ready only as a result of a completion, so a full
    /// insertion-order rescan after each completion is correct; it also
    /// fixes the dispatch tie-break to original plan order.
    pub fn refresh_queue(&mut self) {
        let ready: Vec<String> = self.ready_set().iter().map(|t| t.id.clone()).collect();
        self.queue = ready.into();
    }

    /// Pops the front of the ready-queue.
    pub fn pop_ready(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Current length of the ready-queue.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Applies a status transition, enforcing monotonicity.
    ///
    /// Legal transitions: `Pending→InProgress`, `InProgress→Completed`,
    /// `InProgress→Failed`. Completion stamps `completed_at`.
    pub fn mark(&mut self, id: &str, status: TaskStatus) -> OverseerResult<()> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| OverseerError::Task(format!("unknown task id '{id}'")))?;
        let legal = matches!(
            (&task.status, &status),
            (TaskStatus::Pending, TaskStatus::InProgress)
                | (TaskStatus::InProgress, TaskStatus::Completed)
                | (TaskStatus::InProgress, TaskStatus::Failed { .. })
        );
        if !legal {
            return Err(OverseerError::Task(format!(
                "illegal status transition for '{id}': {:?} -> {status:?}",
                task.status
            )));
        }
        if status == TaskStatus::Completed {
            task.completed_at = Some(Utc::now());
        }
        task.status = status;
        Ok(())
    }

    /// Records an agent's reply metadata as the task result.
    pub fn set_result(&mut self, id: &str, result: Map<String, Value>) -> OverseerResult<()> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| OverseerError::Task(format!("unknown task id '{id}'")))?;
        task.result = Some(result);
        Ok(())
    }

    /// Per-task `{id, status, owner}` lines in insertion order.
    pub fn summaries(&self) -> Vec<TaskSummary> {
        self.tasks()
            .map(|t| TaskSummary {
                id: t.id.clone(),
                status: t.status.clone(),
                owner: t.owner,
            })
            .collect()
    }
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self::new()
    }
}

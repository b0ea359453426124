//! Worker agents: role-specific logic between the orchestrator and the tools.
//!
//! Each agent exposes one operation — `handle(message) -> message` — and
//! holds no state between calls; every side effect flows through a tool
//! adapter resolved by name from the shared registry.
//!
//! # Main types
//!
//! - [`Agent`] — The single-capability trait all agents implement.
//! - [`Action`] — Typed action records carried in generation task metadata.
//! - [`PlanningAgent`] — Deterministic requirement → task-list expansion.
//! - [`GenerationAgent`] — Executes write/append/script/generate actions.
//! - [`EvaluationAgent`] — Runs a validation command and classifies pass/fail.

/// Typed action records.
pub mod actions;
/// The agent trait.
pub mod agent;
/// Evaluation agent.
pub mod evaluation;
/// Generation agent.
pub mod generation;
/// Planning agent.
pub mod planning;

pub use actions::Action;
pub use agent::Agent;
pub use evaluation::EvaluationAgent;
pub use generation::GenerationAgent;
pub use planning::{PlannedTask, PlanningAgent};

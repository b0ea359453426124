//! Core types and error definitions for the Overseer engine.
//!
//! This crate provides the foundational types shared across all Overseer
//! crates: the unified error enum, the agent message envelope, and the
//! closed set of agent roles used for task routing.
//!
//! # Main types
//!
//! - [`OverseerError`] — Unified error enum for all Overseer subsystems.
//! - [`OverseerResult`] — Convenience alias for `Result<T, OverseerError>`.
//! - [`AgentMessage`] — The sole unit of communication between orchestrator and agents.
//! - [`AgentRole`] — Closed enum of worker roles used as routing keys.

/// Error enum and result alias.
pub mod error;
/// The agent message envelope.
pub mod message;
/// Agent roles used for task routing.
pub mod role;

pub use error::{OverseerError, OverseerResult};
pub use message::AgentMessage;
pub use role::AgentRole;

//! Tool adapters: the side-effecting capabilities agents invoke.
//!
//! Every capability — filesystem access, shell execution, text generation —
//! is wrapped behind the [`ToolAdapter`] trait and registered by name in a
//! [`ToolRegistry`]. Agents resolve adapters by name; an unknown name is a
//! typed configuration error rather than a generic fault. Timeouts, retries
//! and other safety policies live inside the adapters, never in the engine.
//!
//! # Main types
//!
//! - [`ToolAdapter`] — Uniform `name()` / `invoke(args)` capability interface.
//! - [`ToolRegistry`] — Name → adapter mapping with typed lookup failure.
//! - [`FileStore`] — Workspace-rooted file read/write/append.
//! - [`CommandRunner`] — Shell execution with a bounded timeout.
//! - [`TextGenerator`] — OpenAI-compatible chat-completions client.
//! - [`WebSearch`] — Placeholder search adapter, not yet wired to a provider.

/// The tool adapter trait.
pub mod adapter;
/// Shell command execution.
pub mod command_runner;
/// Workspace-rooted file operations.
pub mod file_store;
/// Text-generation API client.
pub mod generator;
/// Name-keyed adapter registry.
pub mod registry;
/// Placeholder web search adapter.
pub mod web_search;

pub use adapter::ToolAdapter;
pub use command_runner::CommandRunner;
pub use file_store::FileStore;
pub use generator::{GeneratorConfig, TextGenerator};
pub use registry::ToolRegistry;
pub use web_search::WebSearch;

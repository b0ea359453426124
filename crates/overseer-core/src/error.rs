use thiserror::Error;

/// A convenience `Result` alias using [`OverseerError`].
pub type OverseerResult<T> = Result<T, OverseerError>;

/// Top-level error type for the Overseer workspace.
///
/// Variants split along the recovery boundary the engine cares about:
/// `UnknownTool` and `UnknownRole` are configuration errors that abort a
/// run, while `Tool` and `Http` errors are contained by the agent layer.
#[derive(Error, Debug)]
pub enum OverseerError {
    /// An agent requested a tool name that is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A task declared an owner role with no routed agent.
    #[error("Unknown agent role: {0}")]
    UnknownRole(String),

    /// A tool adapter failed while executing (timeout, spawn failure, …).
    #[error("Tool error: {0}")]
    Tool(String),

    /// A plan payload could not be ingested into the task graph.
    #[error("Plan error: {0}")]
    Plan(String),

    /// An illegal task operation (unknown id, invalid status transition).
    #[error("Task error: {0}")]
    Task(String),

    /// An outbound HTTP request failed (e.g. the generation API).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration parsing or validation failed.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_display() {
        let err = OverseerError::UnknownTool("web_search".to_string());
        assert_eq!(err.to_string(), "Unknown tool: web_search");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: OverseerError = parse_err.into();
        assert!(matches!(err, OverseerError::Json(_)));
    }
}

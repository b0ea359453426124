use serde::{Deserialize, Serialize};

/// Role of each worker agent in the system.
///
/// Tasks declare their owner as one of these roles and the orchestrator
/// routes dispatches through a role→agent map, so routing stays typed
/// instead of keying on free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Expands a requirement into an ordered, dependency-annotated task list.
    Planning,
    /// Executes workspace-mutating actions (files, scripts, generation calls).
    Generation,
    /// Runs validation commands and classifies pass/fail.
    Evaluation,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRole::Planning => write!(f, "planning"),
            AgentRole::Generation => write!(f, "generation"),
            AgentRole::Evaluation => write!(f, "evaluation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(AgentRole::Planning.to_string(), "planning");
        assert_eq!(AgentRole::Generation.to_string(), "generation");
        assert_eq!(AgentRole::Evaluation.to_string(), "evaluation");
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&AgentRole::Generation).unwrap();
        assert_eq!(json, "\"generation\"");
        let parsed: AgentRole = serde_json::from_str("\"evaluation\"").unwrap();
        assert_eq!(parsed, AgentRole::Evaluation);
    }
}

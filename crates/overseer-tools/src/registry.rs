use crate::adapter::ToolAdapter;
use overseer_core::{OverseerError, OverseerResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Central registry mapping tool names to adapter implementations.
///
/// Lookup failure is a typed [`OverseerError::UnknownTool`] — a
/// configuration-class error that aborts the run it occurs in.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolAdapter>>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers an adapter under its advertised name.
    pub fn register(&mut self, tool: Arc<dyn ToolAdapter>) {
        let name = tool.name().to_string();
        info!(tool = %name, "Registered tool");
        self.tools.insert(name, tool);
    }

    /// Looks up an adapter by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolAdapter>> {
        self.tools.get(name)
    }

    /// Looks up an adapter by name, failing with a typed error when absent.
    pub fn require(&self, name: &str) -> OverseerResult<Arc<dyn ToolAdapter>> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| OverseerError::UnknownTool(name.to_string()))
    }

    /// Resolves `name` and invokes it with `args` in one step.
    pub async fn invoke(&self, name: &str, args: Value) -> OverseerResult<Value> {
        self.require(name)?.invoke(args).await
    }

    /// Number of registered adapters.
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Names of all registered adapters, unordered.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl ToolAdapter for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke(&self, args: Value) -> OverseerResult<Value> {
            Ok(json!({ "echoed": args }))
        }
    }

    #[tokio::test]
    async fn test_register_and_invoke() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.tool_count(), 1);

        let result = registry.invoke("echo", json!({"x": 1})).await.unwrap();
        assert_eq!(result["echoed"]["x"], 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_typed_error() {
        let registry = ToolRegistry::new();
        let err = registry.invoke("missing", json!({})).await.unwrap_err();
        assert!(matches!(err, OverseerError::UnknownTool(name) if name == "missing"));
    }

    #[test]
    fn test_require_found() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        assert!(registry.require("echo").is_ok());
        assert!(registry.get("echo").is_some());
    }
}

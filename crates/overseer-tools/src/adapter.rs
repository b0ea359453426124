use async_trait::async_trait;
use overseer_core::OverseerResult;
use serde_json::Value;

/// Uniform interface over a named, side-effecting capability.
///
/// Arguments and results are untyped JSON maps: each adapter documents its
/// own shape (e.g. `{returncode, stdout, stderr}` for command execution)
/// and the invoking agent is responsible for interpreting it. The engine
/// treats both ends opaquely.
#[async_trait]
pub trait ToolAdapter: Send + Sync {
    /// Stable name used for capability lookup in a registry.
    fn name(&self) -> &str;

    /// Performs the side effect described by `args`.
    async fn invoke(&self, args: Value) -> OverseerResult<Value>;
}

use async_trait::async_trait;
use overseer_core::{AgentMessage, OverseerResult};

/// A named worker polymorphic over a single capability.
///
/// `handle` consumes the inbound message and produces a fresh reply; the
/// returned message's metadata becomes the dispatching task's result. An
/// error escaping `handle` is treated by the orchestrator as an
/// unrecoverable dispatch failure.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The agent's display name, used as the reply sender.
    fn name(&self) -> &str;

    /// Performs this agent's role-specific work for one message.
    async fn handle(&self, inbound: AgentMessage) -> OverseerResult<AgentMessage>;
}

use crate::adapter::ToolAdapter;
use async_trait::async_trait;
use overseer_core::{OverseerError, OverseerResult};
use serde_json::{json, Value};
use tracing::warn;

/// Placeholder search adapter.
///
/// Not yet wired to a provider; returns a canned result so plans that
/// reference it keep flowing. Arguments: `{query, top_k?}`.
pub struct WebSearch {
    provider: String,
}

impl WebSearch {
    /// Registry name for this adapter.
    pub const NAME: &'static str = "web_search";

    /// Creates a search adapter labelled with a provider name.
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }
}

#[async_trait]
impl ToolAdapter for WebSearch {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn invoke(&self, args: Value) -> OverseerResult<Value> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| OverseerError::Tool("web_search: missing 'query'".to_string()))?;
        let top_k = args["top_k"].as_u64().unwrap_or(3);
        warn!(query, provider = %self.provider, "Web search not yet wired up");

        let results: Vec<Value> = (0..top_k)
            .map(|_| {
                json!({
                    "title": "placeholder result",
                    "snippet": "Replace with a real search integration.",
                    "url": "",
                })
            })
            .collect();
        Ok(json!({ "results": results }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_placeholder_results() {
        let search = WebSearch::new("brave");
        let result = search
            .invoke(json!({"query": "rust schedulers", "top_k": 2}))
            .await
            .unwrap();
        assert_eq!(result["results"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_query_is_error() {
        let search = WebSearch::new("brave");
        assert!(search.invoke(json!({})).await.is_err());
    }
}

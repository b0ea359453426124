use crate::adapter::ToolAdapter;
use async_trait::async_trait;
use overseer_core::{OverseerError, OverseerResult};
use serde_json::{json, Value};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// File operations rooted at a workspace directory.
///
/// Arguments: `{operation: "read" | "write" | "append", path, content?}`
/// where `path` is relative to the configured root. `write` and `append`
/// create missing parent directories. Paths that are absolute or climb
/// above the root are rejected.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Registry name for this adapter.
    pub const NAME: &'static str = "file_store";

    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, relative: &str) -> OverseerResult<PathBuf> {
        let path = Path::new(relative);
        let escapes = path.is_absolute()
            || path
                .components()
                .any(|c| matches!(c, Component::ParentDir));
        if escapes {
            return Err(OverseerError::Tool(format!(
                "file_store: path escapes workspace root: '{relative}'"
            )));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl ToolAdapter for FileStore {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn invoke(&self, args: Value) -> OverseerResult<Value> {
        let operation = args["operation"]
            .as_str()
            .ok_or_else(|| OverseerError::Tool("file_store: missing 'operation'".to_string()))?;
        let relative = args["path"]
            .as_str()
            .ok_or_else(|| OverseerError::Tool("file_store: missing 'path'".to_string()))?;
        let target = self.resolve(relative)?;
        debug!(operation, path = %target.display(), "FileStore invocation");

        match operation {
            "read" => {
                let content = tokio::fs::read_to_string(&target).await?;
                Ok(json!({ "path": relative, "content": content }))
            }
            "write" | "append" => {
                let content = args["content"].as_str().unwrap_or_default();
                if let Some(parent) = target.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                if operation == "write" {
                    tokio::fs::write(&target, content).await?;
                } else {
                    use tokio::io::AsyncWriteExt;
                    let mut file = tokio::fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(&target)
                        .await?;
                    file.write_all(content.as_bytes()).await?;
                }
                Ok(json!({
                    "path": relative,
                    "status": if operation == "write" { "written" } else { "appended" },
                    "bytes": content.len(),
                }))
            }
            other => Err(OverseerError::Tool(format!(
                "file_store: unsupported operation '{other}'"
            ))),
        }
    }
}

use serde::{Deserialize, Serialize};

/// One delegated operation inside a generation task's `metadata["actions"]`.
///
/// Records are parsed element by element so that a malformed entry (missing
/// a required field, unknown operation tag) is skipped with a warning while
/// the rest of the batch still runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum Action {
    /// Overwrite a workspace file with `content`.
    Write {
        /// Target path, relative to the workspace root.
        path: String,
        /// Content to write; defaults to empty.
        #[serde(default)]
        content: String,
    },
    /// Append `content` to a workspace file.
    Append {
        /// Target path, relative to the workspace root.
        path: String,
        /// Content to append; defaults to empty.
        #[serde(default)]
        content: String,
    },
    /// Run a shell command through the command runner.
    Script {
        /// Command string passed to the execution tool.
        command: String,
        /// Human-readable label recorded instead of the raw command.
        #[serde(default)]
        description: Option<String>,
    },
    /// Call the text-generation tool and persist the (cleaned) output.
    Generate {
        /// Prompt sent to the generation tool.
        prompt: String,
        /// File that receives the generated content.
        path: String,
        /// Command to run instead when the generation call fails.
        #[serde(default)]
        fallback_command: Option<String>,
    },
}

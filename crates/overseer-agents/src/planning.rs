use crate::actions::Action;
use crate::agent::Agent;
use async_trait::async_trait;
use chrono::Utc;
use overseer_core::{AgentMessage, AgentRole, OverseerResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

fn default_owner() -> AgentRole {
    AgentRole::Generation
}

/// One planned unit of work, convertible to an engine task.
///
/// The serialized list of these records under `metadata["tasks"]` is the
/// wire contract between plan authoring and the orchestration engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedTask {
    /// Unique task id within the plan.
    pub id: String,
    /// Short human-readable title.
    pub title: String,
    /// What the owning agent should do.
    pub description: String,
    /// Role that executes this task.
    #[serde(default = "default_owner")]
    pub owner: AgentRole,
    /// Ids of tasks that must complete first.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Opaque payload interpreted by the owning agent.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Deterministic planner: expands a requirement into an ordered,
/// dependency-annotated task list.
///
/// The plan structure itself involves no generation call; the default
/// blueprint covers the daily refresh pipeline and callers can substitute
/// their own via [`PlanningAgent::with_blueprint`].
pub struct PlanningAgent {
    name: String,
    blueprint: Vec<PlannedTask>,
}

impl PlanningAgent {
    /// Creates a planner holding the built-in daily-refresh blueprint.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blueprint: default_blueprint(),
        }
    }

    /// Creates a planner that emits the given blueprint verbatim.
    pub fn with_blueprint(name: impl Into<String>, blueprint: Vec<PlannedTask>) -> Self {
        Self {
            name: name.into(),
            blueprint,
        }
    }
}

#[async_trait]
impl Agent for PlanningAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, inbound: AgentMessage) -> OverseerResult<AgentMessage> {
        info!(sender = %inbound.sender, brief = %inbound.content, "Planning agent received brief");
        let mut metadata = Map::new();
        metadata.insert("tasks".to_string(), serde_json::to_value(&self.blueprint)?);
        debug!(count = self.blueprint.len(), "Planner produced tasks");
        Ok(AgentMessage::new(&self.name, "generated-plan").with_metadata(metadata))
    }
}

fn actions_metadata(actions: &[Action]) -> Map<String, Value> {
    let mut metadata = Map::new();
    // Blueprint actions are plain data; serialization cannot fail for them.
    metadata.insert(
        "actions".to_string(),
        serde_json::to_value(actions).unwrap_or_default(),
    );
    metadata
}

fn dataset_prompt(today: &str) -> String {
    format!(
        "Generate a JSON array of 15 unique daily digest entries. Each object must have: \
         id (unique short slug), title (unique, no duplicates), authors (array of 1-4 names), \
         publishedAt (YYYY-MM-DD; at least two entries dated {today}, the rest within the last \
         three months), summary (2-3 sentences), tags (array of 1-3 short topic tags), and \
         link (an https URL). Ensure all entries are unique with different titles and ids. \
         Return ONLY the JSON array, no markdown code fences."
    )
}

/// The built-in daily-refresh plan: layout notes, dataset generation with a
/// scripted fallback, detail-page render, then a build check.
fn default_blueprint() -> Vec<PlannedTask> {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    vec![
        PlannedTask {
            id: "plan-layout".to_string(),
            title: "Draft feed layout notes".to_string(),
            description: "Record the navigation, hero, category and feed sections the site needs."
                .to_string(),
            owner: AgentRole::Generation,
            depends_on: vec![],
            metadata: actions_metadata(&[Action::Write {
                path: "logs/plan-layout.md".to_string(),
                content: "Drafted feed structure with navigation, hero, categories, and entry list."
                    .to_string(),
            }]),
        },
        PlannedTask {
            id: "plan-dataset".to_string(),
            title: "Refresh the entry dataset".to_string(),
            description: "Generate the JSON dataset that hydrates the feed and detail pages."
                .to_string(),
            owner: AgentRole::Generation,
            depends_on: vec!["plan-layout".to_string()],
            metadata: actions_metadata(&[Action::Generate {
                prompt: dataset_prompt(&today),
                path: "site/src/data/entries.json".to_string(),
                fallback_command: Some("python scripts/generate_fallback_entries.py".to_string()),
            }]),
        },
        PlannedTask {
            id: "plan-detail".to_string(),
            title: "Render the entry detail page".to_string(),
            description: "Regenerate the detail page component from the refreshed dataset."
                .to_string(),
            owner: AgentRole::Generation,
            depends_on: vec!["plan-dataset".to_string()],
            metadata: actions_metadata(&[Action::Script {
                command: "python scripts/render_detail_page.py".to_string(),
                description: Some("Render the entry detail page component".to_string()),
            }]),
        },
        PlannedTask {
            id: "plan-verify".to_string(),
            title: "Validation & QA".to_string(),
            description: "Run the automated build check over the refreshed site.".to_string(),
            owner: AgentRole::Evaluation,
            depends_on: vec!["plan-detail".to_string()],
            metadata: {
                let mut m = Map::new();
                m.insert(
                    "command".to_string(),
                    Value::String("npm run build --prefix site".to_string()),
                );
                m.insert(
                    "description".to_string(),
                    Value::String("Ensure the site builds successfully".to_string()),
                );
                m
            },
        },
    ]
}

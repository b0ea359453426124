use crate::engine::Orchestrator;
use chrono::{DateTime, Utc};
use cron::Schedule;
use overseer_core::{OverseerError, OverseerResult};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Cron-driven periodic orchestration runs.
///
/// The trigger calls `bootstrap` + `run` through the same entry points a
/// manual caller uses and shares the engine behind one async mutex with
/// any other caller (e.g. the HTTP gateway). Overlap protection is
/// explicit: a firing that finds the engine locked is skipped with a
/// warning rather than queued, so two runs never interleave over shared
/// workspace artifacts.
pub struct RunTrigger {
    cron_expression: String,
    requirement: String,
    orchestrator: Arc<Mutex<Orchestrator>>,
}

impl RunTrigger {
    /// Creates a trigger firing `requirement` runs on `cron_expression`.
    pub fn new(
        cron_expression: impl Into<String>,
        requirement: impl Into<String>,
        orchestrator: Arc<Mutex<Orchestrator>>,
    ) -> Self {
        Self {
            cron_expression: cron_expression.into(),
            requirement: requirement.into(),
            orchestrator,
        }
    }

    /// Parses a cron expression (7-field format: sec min hour dom mon dow year).
    pub fn parse_cron(cron_expr: &str) -> OverseerResult<Schedule> {
        Schedule::from_str(cron_expr).map_err(|e| {
            OverseerError::Config(format!("Invalid cron expression '{cron_expr}': {e}"))
        })
    }

    /// Computes the next fire time after now for `cron_expr`.
    pub fn next_fire_time(cron_expr: &str) -> OverseerResult<DateTime<Utc>> {
        let schedule = Self::parse_cron(cron_expr)?;
        schedule.upcoming(Utc).next().ok_or_else(|| {
            OverseerError::Config(format!(
                "Cron expression '{cron_expr}' has no upcoming fire times"
            ))
        })
    }

    /// Starts the trigger loop on a background task.
    ///
    /// Returns the `JoinHandle` so the caller can abort or await it. The
    /// loop exits if the cron expression is invalid.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let next = match Self::next_fire_time(&self.cron_expression) {
                    Ok(next) => next,
                    Err(e) => {
                        error!(error = %e, "Run trigger stopping: bad cron expression");
                        break;
                    }
                };
                let now = Utc::now();
                if next > now {
                    let wait = (next - now).to_std().unwrap_or_default();
                    info!(wait_secs = wait.as_secs(), "Run trigger sleeping until next firing");
                    tokio::time::sleep(wait).await;
                }

                match self.orchestrator.try_lock() {
                    Ok(mut engine) => {
                        info!(requirement = %self.requirement, "Run trigger firing");
                        if let Err(e) = engine.bootstrap(&self.requirement).await {
                            error!(error = %e, "Triggered bootstrap failed");
                            continue;
                        }
                        match engine.run().await {
                            Ok(()) => {
                                info!(tasks = engine.summary().len(), "Triggered run completed");
                            }
                            Err(e) => error!(error = %e, "Triggered run aborted"),
                        }
                    }
                    Err(_) => {
                        warn!("Previous orchestration run still in progress, skipping this firing");
                    }
                }
            }
        })
    }
}

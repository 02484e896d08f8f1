//! Readiness advisor. Turns recent training and recovery history into an
//! `AiInsight` via the inference service.
//!
//! Never fails: a missing credential or any inference failure maps to one of
//! two fixed insights. Never touches persisted state.
//!
//! `AppState` holds the advisor; the inference backend sits behind the
//! `InsightSource` trait so tests can script it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, warn};

use crate::llm_client::prompts::{BREVITY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::{AiInsight, RecoveryLog, WorkoutLog};

pub mod prompts;
pub mod tracker;

pub use tracker::InsightTracker;

use prompts::{readiness_schema, READINESS_PROMPT, READINESS_SYSTEM};

pub const MAX_RECENT_WORKOUTS: usize = 5;
pub const MAX_RECENT_RECOVERY_LOGS: usize = 7;

/// Returned without any call when no credential is configured.
pub fn unconfigured_insight() -> AiInsight {
    AiInsight::new(
        0,
        "API Key not configured.",
        "Please configure your Gemini API key.",
    )
}

/// Returned when the inference call fails for any reason.
pub fn failure_insight() -> AiInsight {
    AiInsight::new(
        50,
        "Could not fetch AI insights.",
        "Check your API key and connection.",
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Backend seam
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait InsightSource: Send + Sync {
    /// Assesses readiness from already-windowed history (newest first).
    async fn assess(
        &self,
        workouts: &[WorkoutLog],
        recovery_logs: &[RecoveryLog],
    ) -> Result<AiInsight, LlmError>;
}

/// Wire shape of the model's answer. Exactly these three fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct InsightPayload {
    readiness_score: i64,
    analysis: String,
    suggestion: String,
}

impl TryFrom<InsightPayload> for AiInsight {
    type Error = LlmError;

    fn try_from(payload: InsightPayload) -> Result<Self, Self::Error> {
        if !(0..=100).contains(&payload.readiness_score) {
            return Err(LlmError::Schema(format!(
                "readinessScore {} outside 0-100",
                payload.readiness_score
            )));
        }
        Ok(AiInsight {
            readiness_score: payload.readiness_score,
            analysis: payload.analysis,
            suggestion: payload.suggestion,
        })
    }
}

fn build_readiness_prompt(
    workouts: &[WorkoutLog],
    recovery_logs: &[RecoveryLog],
) -> Result<String, LlmError> {
    Ok(READINESS_PROMPT
        .replace("{workouts}", &serde_json::to_string_pretty(workouts)?)
        .replace("{recovery}", &serde_json::to_string_pretty(recovery_logs)?))
}

#[async_trait]
impl InsightSource for LlmClient {
    async fn assess(
        &self,
        workouts: &[WorkoutLog],
        recovery_logs: &[RecoveryLog],
    ) -> Result<AiInsight, LlmError> {
        let prompt = build_readiness_prompt(workouts, recovery_logs)?;
        let system = format!("{READINESS_SYSTEM} {BREVITY_INSTRUCTION} {JSON_ONLY_SYSTEM}");
        let payload: InsightPayload = self
            .call_json(&prompt, &system, &readiness_schema())
            .await?;
        AiInsight::try_from(payload)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Advisor
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct ReadinessAdvisor {
    source: Option<Arc<dyn InsightSource>>,
}

impl ReadinessAdvisor {
    pub fn new(source: Arc<dyn InsightSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// Advisor with no credential; every call yields the unconfigured insight.
    pub fn unconfigured() -> Self {
        Self { source: None }
    }

    /// Builds the Gemini-backed advisor, or an unconfigured one when no key is set.
    pub fn from_api_key(api_key: Option<String>) -> Self {
        match api_key.map(LlmClient::new) {
            Some(Ok(client)) => Self::new(Arc::new(client)),
            Some(Err(e)) => {
                error!("Failed to build LLM client, readiness insights disabled: {e}");
                Self::unconfigured()
            }
            None => Self::unconfigured(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    /// Sends the 5 newest workouts and 7 newest recovery logs for assessment.
    pub async fn get_readiness(
        &self,
        workouts: &[WorkoutLog],
        recovery_logs: &[RecoveryLog],
    ) -> AiInsight {
        let Some(source) = &self.source else {
            warn!("GEMINI_API_KEY not set; skipping readiness analysis");
            return unconfigured_insight();
        };

        let workouts = &workouts[..workouts.len().min(MAX_RECENT_WORKOUTS)];
        let recovery_logs = &recovery_logs[..recovery_logs.len().min(MAX_RECENT_RECOVERY_LOGS)];

        match source.assess(workouts, recovery_logs).await {
            Ok(insight) => insight,
            Err(e) => {
                error!("Error fetching readiness insight: {e}");
                failure_insight()
            }
        }
    }

    /// Runs `get_readiness` under a tracker ticket. The result becomes visible
    /// only if no newer request was issued meanwhile.
    pub async fn refresh(
        &self,
        tracker: &InsightTracker,
        workouts: &[WorkoutLog],
        recovery_logs: &[RecoveryLog],
    ) -> bool {
        let ticket = tracker.begin();
        let insight = self.get_readiness(workouts, recovery_logs).await;
        tracker.resolve(ticket, insight)
    }
}

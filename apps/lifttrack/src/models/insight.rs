use serde::{Deserialize, Serialize};

/// Readiness assessment. Derived on every dashboard view, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    /// 0 – 100
    pub readiness_score: i64,
    pub analysis: String,
    pub suggestion: String,
}

impl AiInsight {
    pub fn new(readiness_score: i64, analysis: &str, suggestion: &str) -> Self {
        Self {
            readiness_score,
            analysis: analysis.to_string(),
            suggestion: suggestion.to_string(),
        }
    }
}

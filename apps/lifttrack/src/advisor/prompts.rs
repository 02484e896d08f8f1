// Readiness Advisor LLM prompt templates.

use serde_json::{json, Value};

pub const READINESS_SYSTEM: &str = "\
You are a sports science expert for advanced strength lifters. \
You give concise, no-nonsense readiness assessments from logged training and recovery data.";

pub const READINESS_PROMPT: &str = r#"Analyze the following training and recovery data.

RECENT WORKOUTS (up to the last 5, newest first):
{workouts}

RECENT RECOVERY LOGS (up to the last 7, newest first):
{recovery}

Return a JSON object with exactly three keys:
1. "readinessScore": an integer from 0 to 100 for the lifter's readiness for a demanding session. Weigh training volume, intensity (RPE), frequency, soreness (1 = low, 5 = high) and sleep.
2. "analysis": one sentence on the current training state, e.g. "High training volume is accumulating fatigue."
3. "suggestion": one actionable suggestion for today or the next session, e.g. "Consider reducing volume by 1-2 sets on main lifts."
"#;

/// Response schema in the Gemini OpenAPI subset. All three fields are required.
pub fn readiness_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "readinessScore": {
                "type": "INTEGER",
                "description": "Lifter's readiness score from 0-100"
            },
            "analysis": {
                "type": "STRING",
                "description": "A short analysis of training state."
            },
            "suggestion": {
                "type": "STRING",
                "description": "An actionable training suggestion."
            }
        },
        "required": ["readinessScore", "analysis", "suggestion"],
        "propertyOrdering": ["readinessScore", "analysis", "suggestion"]
    })
}

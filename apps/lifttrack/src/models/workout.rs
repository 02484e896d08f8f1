use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One performed set. Weight is unit-agnostic (kg or lbs, used consistently).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLog {
    pub id: String,
    pub weight: f64,
    pub reps: u32,
    pub rpe: f64,
    /// Rest after the set, in seconds.
    pub rest_time: u32,
}

impl SetLog {
    pub fn volume(&self) -> f64 {
        self.weight * self.reps as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub id: String,
    /// Free text, user-defined.
    pub name: String,
    pub sets: Vec<SetLog>,
}

impl ExerciseLog {
    /// Only exercises with a name and at least one set are saved with a workout.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.sets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    pub date: DateTime<Utc>,
    pub name: String,
    pub exercises: Vec<ExerciseLog>,
}

impl WorkoutLog {
    /// First exercise with exactly this name, if any.
    pub fn exercise(&self, name: &str) -> Option<&ExerciseLog> {
        self.exercises.iter().find(|e| e.name == name)
    }
}

use chrono::NaiveDate;

use crate::advisor::{InsightTracker, ReadinessAdvisor};
use crate::models::{AiInsight, RecoveryLog, WorkoutLog};

const LAST_WORKOUT_EXERCISES: usize = 3;

/// Shown instead of calling the advisor when nothing has been logged yet.
pub fn welcome_insight() -> AiInsight {
    AiInsight::new(
        75,
        "Ready to go! Log a workout and recovery data to get personalized insights.",
        "Start with a solid warm-up and your main compound lift.",
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessBand {
    High,
    Moderate,
    Low,
}

impl ReadinessBand {
    pub fn from_score(score: i64) -> Self {
        if score > 75 {
            ReadinessBand::High
        } else if score > 50 {
            ReadinessBand::Moderate
        } else {
            ReadinessBand::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSummary {
    pub name: String,
    pub set_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LastWorkoutCard {
    pub name: String,
    pub date_label: String,
    pub exercises: Vec<ExerciseSummary>,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub insight: Option<AiInsight>,
    pub band: Option<ReadinessBand>,
    pub has_logged_recovery_today: bool,
    pub last_workout: Option<LastWorkoutCard>,
}

/// Requests a fresh insight under a tracker ticket and returns whatever is
/// visible afterwards.
pub async fn load_insight(
    advisor: &ReadinessAdvisor,
    tracker: &InsightTracker,
    workouts: &[WorkoutLog],
    recovery_logs: &[RecoveryLog],
) -> Option<AiInsight> {
    if workouts.is_empty() && recovery_logs.is_empty() {
        let ticket = tracker.begin();
        tracker.resolve(ticket, welcome_insight());
    } else {
        advisor.refresh(tracker, workouts, recovery_logs).await;
    }
    tracker.current()
}

pub fn summarize(
    insight: Option<AiInsight>,
    workouts: &[WorkoutLog],
    recovery_logs: &[RecoveryLog],
    today: NaiveDate,
) -> DashboardView {
    DashboardView {
        band: insight
            .as_ref()
            .map(|i| ReadinessBand::from_score(i.readiness_score)),
        insight,
        has_logged_recovery_today: recovery_logs.iter().any(|r| r.date == today),
        last_workout: workouts.first().map(|w| LastWorkoutCard {
            name: w.name.clone(),
            date_label: w.date.format("%-m/%-d/%Y").to_string(),
            exercises: w
                .exercises
                .iter()
                .take(LAST_WORKOUT_EXERCISES)
                .map(|e| ExerciseSummary {
                    name: e.name.clone(),
                    set_count: e.sets.len(),
                })
                .collect(),
            has_more: w.exercises.len() > LAST_WORKOUT_EXERCISES,
        }),
    }
}

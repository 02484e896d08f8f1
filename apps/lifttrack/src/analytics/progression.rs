//! Progression analytics: estimated one-rep max, best sets, and per-exercise
//! series across a newest-first workout history. Pure functions, no I/O.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::models::{SetLog, WorkoutLog};

/// Fewer points than this and there is no progression to chart.
pub const MIN_CHART_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Estimated one-rep max of the best set.
    #[default]
    E1rm,
    /// Heaviest weight lifted in any set.
    MaxWeight,
    /// Sum of weight × reps over all sets.
    TotalVolume,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::E1rm => "Est. 1RM",
            Metric::MaxWeight => "Max Weight",
            Metric::TotalVolume => "Total Volume",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::E1rm => write!(f, "e1rm"),
            Metric::MaxWeight => write!(f, "max-weight"),
            Metric::TotalVolume => write!(f, "total-volume"),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "e1rm" => Ok(Metric::E1rm),
            "max-weight" | "maxweight" => Ok(Metric::MaxWeight),
            "total-volume" | "totalvolume" | "volume" => Ok(Metric::TotalVolume),
            other => Err(format!(
                "unknown metric '{other}' (expected e1rm, max-weight or total-volume)"
            )),
        }
    }
}

/// Estimated one-rep max via the Brzycki formula, rounded to the nearest integer.
///
/// Non-positive weight gives 0. A single rep gives the weight itself. Reps
/// beyond 10 still compute but the estimate gets rough.
pub fn estimated_one_rep_max(weight: f64, reps: u32) -> f64 {
    if weight <= 0.0 {
        return 0.0;
    }
    if reps == 1 {
        return weight;
    }
    (weight / (1.0278 - 0.0278 * reps as f64)).round()
}

fn set_e1rm(set: &SetLog) -> f64 {
    estimated_one_rep_max(set.weight, set.reps)
}

/// Set with the highest e1RM. Ties go to the earliest set.
pub fn best_set(sets: &[SetLog]) -> Option<&SetLog> {
    sets.iter().fold(None, |best: Option<&SetLog>, current| match best {
        Some(b) if set_e1rm(current) <= set_e1rm(b) => Some(b),
        _ => Some(current),
    })
}

/// The metric for `exercise` in one workout. `None` when the exercise is
/// absent or has no sets.
pub fn metric_value(workout: &WorkoutLog, exercise: &str, metric: Metric) -> Option<f64> {
    let sets = &workout.exercise(exercise)?.sets;
    if sets.is_empty() {
        return None;
    }

    let value = match metric {
        Metric::E1rm => best_set(sets).map(set_e1rm).unwrap_or(0.0),
        Metric::MaxWeight => sets.iter().map(|s| s.weight).fold(0.0, f64::max),
        Metric::TotalVolume => sets.iter().map(SetLog::volume).sum(),
    };
    Some(value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Short label such as "Jan 5".
    pub label: String,
    pub date: DateTime<Utc>,
    pub value: f64,
}

/// Every positive data point for `exercise`, oldest-first.
pub fn progression_points(
    workouts: &[WorkoutLog],
    exercise: &str,
    metric: Metric,
) -> Vec<ChartPoint> {
    if exercise.is_empty() {
        return Vec::new();
    }

    workouts
        .iter()
        .rev()
        .filter_map(|w| {
            let value = metric_value(w, exercise, metric)?;
            (value > 0.0).then(|| ChartPoint {
                label: w.date.format("%b %-d").to_string(),
                date: w.date,
                value,
            })
        })
        .collect()
}

/// Chronological series for charting. Empty when there are fewer than
/// `MIN_CHART_POINTS` points to draw.
pub fn chart_series(workouts: &[WorkoutLog], exercise: &str, metric: Metric) -> Vec<ChartPoint> {
    let points = progression_points(workouts, exercise, metric);
    if points.len() < MIN_CHART_POINTS {
        return Vec::new();
    }
    points
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionHighlight {
    /// Display date such as "1/5/2024".
    pub date_label: String,
    pub workout_name: String,
    pub set: SetLog,
    pub e1rm: f64,
}

/// Best set of every session containing `exercise`, oldest-first.
pub fn session_highlights(workouts: &[WorkoutLog], exercise: &str) -> Vec<SessionHighlight> {
    if exercise.is_empty() {
        return Vec::new();
    }

    workouts
        .iter()
        .rev()
        .filter_map(|w| {
            let best = best_set(&w.exercise(exercise)?.sets)?;
            Some(SessionHighlight {
                date_label: w.date.format("%-m/%-d/%Y").to_string(),
                workout_name: w.name.clone(),
                e1rm: set_e1rm(best),
                set: best.clone(),
            })
        })
        .collect()
}

/// Distinct exercise names across the history, sorted.
pub fn unique_exercises(workouts: &[WorkoutLog]) -> Vec<String> {
    workouts
        .iter()
        .flat_map(|w| w.exercises.iter().map(|e| e.name.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// Built-in sample data shown to a fresh owner installation.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{ExerciseLog, RecoveryLog, SetLog, WorkoutLog};

fn set(id: &str, weight: f64, reps: u32, rpe: f64, rest_time: u32) -> SetLog {
    SetLog {
        id: id.to_string(),
        weight,
        reps,
        rpe,
        rest_time,
    }
}

fn exercise(id: &str, name: &str, sets: Vec<SetLog>) -> ExerciseLog {
    ExerciseLog {
        id: id.to_string(),
        name: name.to_string(),
        sets,
    }
}

/// Three workouts, newest-first, dated 1, 3 and 5 days before `now`.
pub fn sample_workouts(now: DateTime<Utc>) -> Vec<WorkoutLog> {
    vec![
        WorkoutLog {
            id: "w3".to_string(),
            date: now - Duration::days(1),
            name: "Leg Day".to_string(),
            exercises: vec![
                exercise(
                    "e31",
                    "Squat",
                    vec![
                        set("s311", 275.0, 5, 8.0, 180),
                        set("s312", 275.0, 5, 8.0, 180),
                        set("s313", 275.0, 5, 9.0, 180),
                    ],
                ),
                exercise(
                    "e32",
                    "Romanian Deadlift",
                    vec![
                        set("s321", 225.0, 8, 7.0, 120),
                        set("s322", 225.0, 8, 8.0, 120),
                    ],
                ),
            ],
        },
        WorkoutLog {
            id: "w2".to_string(),
            date: now - Duration::days(3),
            name: "Push Day".to_string(),
            exercises: vec![
                exercise(
                    "e21",
                    "Bench Press",
                    vec![
                        set("s211", 205.0, 6, 8.0, 120),
                        set("s212", 205.0, 6, 8.0, 120),
                        set("s213", 205.0, 5, 9.0, 120),
                    ],
                ),
                exercise(
                    "e22",
                    "Overhead Press",
                    vec![
                        set("s221", 135.0, 5, 8.0, 120),
                        set("s222", 135.0, 5, 8.0, 120),
                    ],
                ),
            ],
        },
        WorkoutLog {
            id: "w1".to_string(),
            date: now - Duration::days(5),
            name: "Pull Day".to_string(),
            exercises: vec![
                exercise(
                    "e11",
                    "Deadlift",
                    vec![
                        set("s111", 315.0, 5, 8.0, 180),
                        set("s112", 315.0, 5, 9.0, 180),
                    ],
                ),
                exercise(
                    "e12",
                    "Pull Ups",
                    vec![set("s121", 0.0, 8, 7.0, 90), set("s122", 0.0, 7, 8.0, 90)],
                ),
            ],
        },
    ]
}

/// Four check-ins, newest-first, for `today` and the three days before it.
pub fn sample_recovery_logs(today: NaiveDate) -> Vec<RecoveryLog> {
    [
        ("r4", 0, 7.0, 4, 2),
        ("r3", 1, 6.5, 2, 3),
        ("r2", 2, 8.0, 1, 5),
        ("r1", 3, 7.5, 3, 4),
    ]
    .into_iter()
    .map(|(id, days_ago, sleep_hours, soreness, readiness)| RecoveryLog {
        id: id.to_string(),
        date: today - Duration::days(days_ago),
        sleep_hours,
        soreness,
        readiness,
    })
    .collect()
}

//! Command-line surface. Handlers return the text to print so they can be
//! exercised against an in-memory store.
//!
//! Usage:
//! ```bash
//! lifttrack whoami
//! lifttrack log-workout --name "Leg Day" --exercise "Squat=275x5@8,275x5@9"
//! lifttrack log-recovery --sleep 7.5 --soreness 2 --readiness 4
//! lifttrack history --exercise Squat --metric total-volume
//! lifttrack --client 3f2b... dashboard
//! lifttrack coach 3f2b...
//! lifttrack coach --exit
//! ```

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::analytics::{chart_series, session_highlights, unique_exercises, Metric};
use crate::dashboard::{load_insight, summarize, ReadinessBand};
use crate::drafts::recovery::{scale_label, READINESS_LABELS, SORENESS_LABELS};
use crate::drafts::{RecoveryDraft, SetField, WorkoutDraft};
use crate::errors::AppError;
use crate::identity::{remember_session, short_id};
use crate::models::{RecoveryLog, WorkoutLog};
use crate::repository::{RecoveryRepository, WorkoutRepository};
use crate::state::AppState;
use crate::storage::KvBackend;

#[derive(Parser)]
#[command(
    name = "lifttrack",
    about = "Strength training and recovery log",
    long_about = "Logs strength sessions and daily recovery, charts e1RM progression, and asks an AI model for a readiness score."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// View another identity's log (coach mode)
    #[arg(long, global = true)]
    pub client: Option<String>,

    /// Use a throwaway in-memory store; nothing is saved
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print this installation's client ID
    Whoami,
    /// List logged workouts, newest first
    Workouts,
    /// List every exercise name in the log
    Exercises,
    /// List recovery check-ins, newest first
    Recovery,
    /// Log a finished workout
    LogWorkout {
        /// Workout name (defaults to "Workout - <date>")
        #[arg(long)]
        name: Option<String>,
        /// NAME=WEIGHTxREPS[@RPE],... (repeatable)
        #[arg(long = "exercise", required = true)]
        exercises: Vec<ExerciseSpec>,
    },
    /// Log today's recovery (replaces any entry for the same date)
    LogRecovery {
        #[arg(long, default_value_t = 8.0)]
        sleep: f64,
        /// 1 (none) – 5 (severe)
        #[arg(long, default_value_t = 2)]
        soreness: u8,
        /// 1 (very poor) – 5 (excellent)
        #[arg(long, default_value_t = 3)]
        readiness: u8,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show progression for one exercise
    History {
        /// Defaults to the first exercise alphabetically
        #[arg(long)]
        exercise: Option<String>,
        /// e1rm, max-weight or total-volume
        #[arg(long, default_value_t = Metric::E1rm)]
        metric: Metric,
    },
    /// Readiness analysis, recovery status and last workout
    Dashboard,
    /// Show, enter or leave coach mode; the choice is remembered
    Coach {
        /// Client ID to view from now on
        id: Option<String>,
        /// Go back to your own log
        #[arg(long, conflicts_with = "id")]
        exit: bool,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Set specs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SetSpec {
    pub weight: f64,
    pub reps: u32,
    pub rpe: Option<f64>,
}

impl FromStr for SetSpec {
    type Err = String;

    /// `WEIGHTxREPS[@RPE]`, e.g. `100x5` or `102.5x3@8.5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (load, rpe) = match s.split_once('@') {
            Some((load, rpe)) => (load, Some(rpe)),
            None => (s, None),
        };
        let (weight, reps) = load
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("'{s}' is not WEIGHTxREPS[@RPE]"))?;

        Ok(SetSpec {
            weight: parse_amount(weight)
                .ok_or_else(|| format!("bad weight in '{s}'"))?,
            reps: reps
                .trim()
                .parse()
                .map_err(|_| format!("bad reps in '{s}'"))?,
            rpe: rpe
                .map(|r| parse_amount(r).ok_or_else(|| format!("bad RPE in '{s}'")))
                .transpose()?,
        })
    }
}

/// A finite, non-negative number. `f64::from_str` also accepts `NaN` and `inf`.
fn parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSpec {
    pub name: String,
    pub sets: Vec<SetSpec>,
}

impl FromStr for ExerciseSpec {
    type Err = String;

    /// `NAME=SET,SET,...`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, sets) = s
            .split_once('=')
            .ok_or_else(|| format!("'{s}' is not NAME=WEIGHTxREPS[@RPE],..."))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing exercise name in '{s}'"));
        }
        let sets = sets
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(SetSpec::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ExerciseSpec {
            name: name.to_string(),
            sets,
        })
    }
}

fn build_workout(name: Option<String>, specs: &[ExerciseSpec]) -> Result<WorkoutLog, AppError> {
    let now = Utc::now();
    let mut draft = WorkoutDraft::new(now);
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        draft.name = name;
    }

    for spec in specs {
        let exercise = draft.add_exercise();
        draft.rename_exercise(exercise, &spec.name)?;
        for set in &spec.sets {
            let idx = draft.add_set(exercise)?;
            draft.update_set(exercise, idx, SetField::Weight, set.weight)?;
            draft.update_set(exercise, idx, SetField::Reps, set.reps as f64)?;
            if let Some(rpe) = set.rpe {
                draft.update_set(exercise, idx, SetField::Rpe, rpe)?;
            }
        }
    }

    draft.finish(now)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

pub async fn run<B: KvBackend>(
    state: &mut AppState<B>,
    command: Command,
) -> Result<String, AppError> {
    let mut out = String::new();
    if state.session.is_coach_mode() && !matches!(command, Command::Coach { .. }) {
        out.push_str(&coach_status(state));
    }

    match command {
        Command::Whoami => {
            out.push_str(&format!("Client ID: {}\n", state.session.owner_id()));
            out.push_str(&format!("Data: {}\n", state.config.data_dir.display()));
        }
        Command::Workouts => render_workouts(&mut out, &load_workouts(state)),
        Command::Exercises => {
            for name in unique_exercises(&load_workouts(state)) {
                out.push_str(&format!("{name}\n"));
            }
        }
        Command::Recovery => render_recovery(&mut out, &load_recovery(state)),
        Command::LogWorkout { name, exercises } => {
            let workout = build_workout(name, &exercises)?;
            let mut repo = WorkoutRepository::new(&state.storage, state.session.owner_id());
            repo.load(state.session.active_id());
            repo.ensure_writable()?;
            let total = repo.append(workout.clone()).len();
            info!("Logged workout {} ({} in log)", workout.id, total);
            out.push_str(&format!(
                "Saved '{}' with {} exercise(s). {} workout(s) logged.\n",
                workout.name,
                workout.exercises.len(),
                total
            ));
        }
        Command::LogRecovery {
            sleep,
            soreness,
            readiness,
            date,
        } => {
            let draft = RecoveryDraft {
                sleep_hours: sleep,
                soreness,
                readiness,
            };
            let log = draft.build(date.unwrap_or_else(|| Utc::now().date_naive()))?;
            let mut repo = RecoveryRepository::new(&state.storage, state.session.owner_id());
            repo.load(state.session.active_id());
            repo.ensure_writable()?;
            repo.append(log.clone());
            out.push_str(&format!(
                "Saved recovery for {}: sleep {}h, soreness {}, readiness {}.\n",
                log.date,
                log.sleep_hours,
                draft.soreness_label().unwrap_or("?"),
                draft.readiness_label().unwrap_or("?")
            ));
        }
        Command::History { exercise, metric } => {
            render_history(&mut out, &load_workouts(state), exercise, metric)
        }
        Command::Dashboard => {
            let workouts = load_workouts(state);
            let recovery = load_recovery(state);
            let insight = load_insight(&state.advisor, &state.tracker, &workouts, &recovery).await;
            let view = summarize(insight, &workouts, &recovery, Utc::now().date_naive());

            match &view.insight {
                Some(insight) => out.push_str(&format!(
                    "Readiness Score: {} ({:?})\nAnalysis: {}\nSuggestion: {}\n",
                    insight.readiness_score,
                    view.band.unwrap_or(ReadinessBand::Low),
                    insight.analysis,
                    insight.suggestion
                )),
                None => out.push_str("No insights available. Log some data to get started.\n"),
            }
            if !view.has_logged_recovery_today {
                out.push_str("Today's recovery is not logged yet (lifttrack log-recovery).\n");
            }
            if let Some(card) = view.last_workout {
                out.push_str(&format!("\nLast Workout: {} ({})\n", card.name, card.date_label));
                for ex in card.exercises {
                    out.push_str(&format!("  {}: {} sets\n", ex.name, ex.set_count));
                }
                if card.has_more {
                    out.push_str("  ...and more\n");
                }
            }
        }
        Command::Coach { id, exit } => {
            if exit {
                state.session.exit_coach_mode();
                remember_session(&state.storage, &state.session);
                out.push_str("Coach mode off. Viewing your own log.\n");
            } else if let Some(id) = id {
                if !state.session.load_client(&id) {
                    return Err(AppError::Validation("Client ID must not be blank".to_string()));
                }
                remember_session(&state.storage, &state.session);
                out.push_str(&coach_status(state));
            } else {
                out.push_str(&coach_status(state));
            }
        }
    }

    Ok(out)
}

fn coach_status<B: KvBackend>(state: &AppState<B>) -> String {
    if state.session.is_coach_mode() {
        format!(
            "Coach Mode: viewing client {}...\n",
            short_id(state.session.active_id())
        )
    } else {
        "Viewing your own log.\n".to_string()
    }
}

fn load_workouts<B: KvBackend>(state: &AppState<B>) -> Vec<WorkoutLog> {
    let mut repo = WorkoutRepository::new(&state.storage, state.session.owner_id());
    repo.load(state.session.active_id()).to_vec()
}

fn load_recovery<B: KvBackend>(state: &AppState<B>) -> Vec<RecoveryLog> {
    let mut repo = RecoveryRepository::new(&state.storage, state.session.owner_id());
    repo.load(state.session.active_id()).to_vec()
}

fn render_workouts(out: &mut String, workouts: &[WorkoutLog]) {
    if workouts.is_empty() {
        out.push_str("No workouts logged yet.\n");
        return;
    }
    for w in workouts {
        out.push_str(&format!("{}  {}\n", w.date.format("%-m/%-d/%Y"), w.name));
        for ex in &w.exercises {
            let sets: Vec<_> = ex
                .sets
                .iter()
                .map(|s| format!("{}x{}@{}", s.weight, s.reps, s.rpe))
                .collect();
            out.push_str(&format!("    {}: {}\n", ex.name, sets.join(", ")));
        }
    }
}

fn render_recovery(out: &mut String, logs: &[RecoveryLog]) {
    if logs.is_empty() {
        out.push_str("No recovery logged yet.\n");
        return;
    }
    for log in logs {
        out.push_str(&format!(
            "{}  sleep {}h  soreness {}  readiness {}\n",
            log.date,
            log.sleep_hours,
            scale_label(&SORENESS_LABELS, log.soreness).unwrap_or("?"),
            scale_label(&READINESS_LABELS, log.readiness).unwrap_or("?")
        ));
    }
}

fn render_history(
    out: &mut String,
    workouts: &[WorkoutLog],
    exercise: Option<String>,
    metric: Metric,
) {
    if workouts.is_empty() {
        out.push_str("No workouts logged yet.\nComplete a workout to see your progression here.\n");
        return;
    }
    let exercise = match exercise.or_else(|| unique_exercises(workouts).into_iter().next()) {
        Some(e) => e,
        None => return,
    };

    out.push_str(&format!("{} Progression: {exercise}\n", metric.label()));
    let series = chart_series(workouts, &exercise, metric);
    if series.is_empty() {
        out.push_str("Not enough data to show a chart for this exercise.\n");
        out.push_str("Log at least two sessions to see your progress.\n");
    }
    for point in &series {
        out.push_str(&format!("  {:>7}  {}\n", point.label, point.value));
    }

    let highlights = session_highlights(workouts, &exercise);
    if !highlights.is_empty() {
        out.push_str("\nSession Highlights\n");
    }
    for h in highlights {
        out.push_str(&format!(
            "  {}  {} x {} reps @ RPE {}  (e1RM {})\n",
            h.date_label, h.set.weight, h.set.reps, h.set.rpe, h.e1rm
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::ReadinessAdvisor;
    use crate::config::Config;
    use crate::identity::ACTIVE_CLIENT_KEY;
    use crate::repository::RecordKind;
    use crate::storage::{FileStore, MemoryStore, Storage};

    fn config() -> Config {
        Config {
            gemini_api_key: None,
            data_dir: std::env::temp_dir(),
            rust_log: "info".to_string(),
        }
    }

    fn state() -> AppState<MemoryStore> {
        AppState::new(
            Storage::new(MemoryStore::default()),
            ReadinessAdvisor::unconfigured(),
            config(),
        )
    }

    fn squat(weight: f64) -> Command {
        Command::LogWorkout {
            name: Some("Mine".to_string()),
            exercises: vec![ExerciseSpec {
                name: "Squat".to_string(),
                sets: vec![SetSpec {
                    weight,
                    reps: 5,
                    rpe: None,
                }],
            }],
        }
    }

    #[test]
    fn test_set_spec_parsing() {
        assert_eq!(
            "102.5x3@8.5".parse::<SetSpec>(),
            Ok(SetSpec {
                weight: 102.5,
                reps: 3,
                rpe: Some(8.5)
            })
        );
        assert_eq!("100X5".parse::<SetSpec>().unwrap().rpe, None);
        assert!("100".parse::<SetSpec>().is_err());
        assert!("100x-1".parse::<SetSpec>().is_err());
        assert!("100x5@hard".parse::<SetSpec>().is_err());
    }

    #[test]
    fn test_set_spec_rejects_non_finite_numbers() {
        for bad in ["NaNx5", "infx5", "-infx5", "-20x5", "100x5@nan", "100x5@inf"] {
            assert!(bad.parse::<SetSpec>().is_err(), "{bad} should not parse");
        }
        assert!(
            Cli::try_parse_from(["lifttrack", "log-workout", "--exercise", "Squat=NaNx5"]).is_err()
        );
    }

    #[test]
    fn test_exercise_spec_parsing() {
        let spec: ExerciseSpec = "Bench Press = 205x6, 205x5@9,".parse().unwrap();
        assert_eq!(spec.name, "Bench Press");
        assert_eq!(spec.sets.len(), 2);
        assert!("=100x5".parse::<ExerciseSpec>().is_err());
        assert!("Squat".parse::<ExerciseSpec>().is_err());
    }

    #[test]
    fn test_cli_parses_log_workout() {
        let cli = Cli::try_parse_from([
            "lifttrack",
            "--client",
            "abc",
            "log-workout",
            "--exercise",
            "Squat=100x5",
            "--exercise",
            "Row=60x10@7",
        ])
        .unwrap();
        assert_eq!(cli.client.as_deref(), Some("abc"));
        match cli.command {
            Command::LogWorkout { exercises, .. } => assert_eq!(exercises.len(), 2),
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_cli_parses_metric() {
        let cli =
            Cli::try_parse_from(["lifttrack", "history", "--metric", "total-volume"]).unwrap();
        match cli.command {
            Command::History { metric, exercise } => {
                assert_eq!(metric, Metric::TotalVolume);
                assert!(exercise.is_none());
            }
            _ => panic!("wrong command"),
        }
    }

    #[tokio::test]
    async fn test_whoami_prints_owner() {
        let mut state = state();
        let out = run(&mut state, Command::Whoami).await.unwrap();
        assert!(out.contains(state.session.owner_id()));
    }

    #[tokio::test]
    async fn test_log_workout_then_history() {
        let mut state = state();
        state.session.load_client("client-1");

        for weight in [100.0, 110.0] {
            let cmd = Command::LogWorkout {
                name: Some("Legs".to_string()),
                exercises: vec![ExerciseSpec {
                    name: "Squat".to_string(),
                    sets: vec![SetSpec {
                        weight,
                        reps: 5,
                        rpe: None,
                    }],
                }],
            };
            run(&mut state, cmd).await.unwrap();
        }

        let out = run(
            &mut state,
            Command::History {
                exercise: None,
                metric: Metric::MaxWeight,
            },
        )
        .await
        .unwrap();
        assert!(out.starts_with("Coach Mode"));
        assert!(out.contains("Max Weight Progression: Squat"));
        assert!(out.contains("100"));
        assert!(out.contains("110"));
        assert!(out.contains("Session Highlights"));
    }

    #[tokio::test]
    async fn test_history_for_unknown_client() {
        let mut state = state();
        state.session.load_client("client-2");
        let out = run(
            &mut state,
            Command::History {
                exercise: Some("Squat".to_string()),
                metric: Metric::E1rm,
            },
        )
        .await
        .unwrap();
        assert!(out.contains("No workouts logged yet."));
    }

    #[tokio::test]
    async fn test_log_recovery_replaces_same_date() {
        let mut state = state();
        let date = NaiveDate::from_ymd_opt(2024, 1, 5);
        for sleep in [6.0, 9.0] {
            let cmd = Command::LogRecovery {
                sleep,
                soreness: 1,
                readiness: 5,
                date,
            };
            run(&mut state, cmd).await.unwrap();
        }
        let logs = load_recovery(&state);
        let on_date: Vec<_> = logs.iter().filter(|l| Some(l.date) == date).collect();
        assert_eq!(on_date.len(), 1);
        assert_eq!(on_date[0].sleep_hours, 9.0);
        assert_eq!(logs[0].date, date.unwrap());
    }

    #[tokio::test]
    async fn test_log_recovery_rejects_bad_scale() {
        let mut state = state();
        let cmd = Command::LogRecovery {
            sleep: 8.0,
            soreness: 9,
            readiness: 3,
            date: None,
        };
        assert!(matches!(run(&mut state, cmd).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_dashboard_without_key() {
        let mut state = state();
        let out = run(&mut state, Command::Dashboard).await.unwrap();
        assert!(out.contains("API Key not configured."));
        assert!(out.contains("Last Workout: Leg Day"));
    }

    #[tokio::test]
    async fn test_dashboard_for_empty_client() {
        let mut state = state();
        state.session.load_client("fresh-client");
        let out = run(&mut state, Command::Dashboard).await.unwrap();
        assert!(out.contains("Readiness Score: 75"));
        assert!(out.contains("Today's recovery is not logged yet"));
    }

    #[tokio::test]
    async fn test_nan_weight_keeps_existing_history() {
        let mut state = state();
        run(&mut state, squat(100.0)).await.unwrap();
        run(&mut state, squat(105.0)).await.unwrap();
        assert_eq!(load_workouts(&state).len(), 5);

        let result = run(&mut state, squat(f64::NAN)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let workouts = load_workouts(&state);
        assert_eq!(workouts.len(), 5);
        assert_eq!(workouts[0].name, "Mine");
        assert_eq!(workouts[1].name, "Mine");
    }

    #[tokio::test]
    async fn test_log_refused_when_stored_log_is_unreadable() {
        let mut state = state();
        let key = RecordKind::Workouts.storage_key(state.session.owner_id());
        state.storage.backend().write_raw(&key, "[{\"id\":").unwrap();

        let out = run(&mut state, Command::Workouts).await.unwrap();
        assert!(out.contains("No workouts logged yet."));
        let result = run(&mut state, squat(100.0)).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(
            state.storage.backend().read_raw(&key).unwrap().as_deref(),
            Some("[{\"id\":")
        );
    }

    #[tokio::test]
    async fn test_unusable_data_dir_still_runs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();
        let mut state = AppState::new(
            Storage::new(FileStore::open(file.join("sub"))),
            ReadinessAdvisor::unconfigured(),
            config(),
        );

        let out = run(&mut state, Command::Workouts).await.unwrap();
        assert!(out.contains("No workouts logged yet."));
        assert!(run(&mut state, Command::Dashboard).await.is_ok());
    }

    #[tokio::test]
    async fn test_coach_mode_is_remembered_and_exited() {
        let mut state = state();
        let out = run(
            &mut state,
            Command::Coach {
                id: Some("client-9".to_string()),
                exit: false,
            },
        )
        .await
        .unwrap();
        assert!(out.starts_with("Coach Mode: viewing client client-9"));
        assert_eq!(
            state.storage.get::<String>(ACTIVE_CLIENT_KEY).as_deref(),
            Some("client-9")
        );

        let out = run(&mut state, Command::Workouts).await.unwrap();
        assert!(out.starts_with("Coach Mode"));
        assert!(out.contains("No workouts logged yet."));

        let out = run(&mut state, Command::Coach { id: None, exit: true }).await.unwrap();
        assert_eq!(out, "Coach mode off. Viewing your own log.\n");
        assert!(!state.session.is_coach_mode());
        assert_eq!(state.storage.get::<String>(ACTIVE_CLIENT_KEY).as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_blank_coach_client_rejected() {
        let mut state = state();
        let cmd = Command::Coach {
            id: Some("  ".to_string()),
            exit: false,
        };
        assert!(matches!(run(&mut state, cmd).await, Err(AppError::Validation(_))));
        assert!(!state.session.is_coach_mode());
    }
}

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ExerciseLog, SetLog, WorkoutLog};

const DEFAULT_RPE: f64 = 7.0;
const DEFAULT_REST_SECONDS: u32 = 60;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Which field of a set is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Weight,
    Reps,
    Rpe,
    RestTime,
}

/// A workout being logged. Sets stay editable until `finish`.
#[derive(Debug, Clone)]
pub struct WorkoutDraft {
    pub name: String,
    exercises: Vec<ExerciseLog>,
}

impl WorkoutDraft {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            name: format!("Workout - {}", now.format("%-m/%-d/%Y")),
            exercises: Vec::new(),
        }
    }

    pub fn exercises(&self) -> &[ExerciseLog] {
        &self.exercises
    }

    /// Appends an unnamed exercise and returns its index.
    pub fn add_exercise(&mut self) -> usize {
        self.exercises.push(ExerciseLog {
            id: new_id(),
            name: String::new(),
            sets: Vec::new(),
        });
        self.exercises.len() - 1
    }

    pub fn rename_exercise(&mut self, exercise: usize, name: &str) -> Result<(), AppError> {
        self.exercise_mut(exercise)?.name = name.to_string();
        Ok(())
    }

    pub fn remove_exercise(&mut self, exercise: usize) -> Result<ExerciseLog, AppError> {
        self.exercise_mut(exercise)?;
        Ok(self.exercises.remove(exercise))
    }

    /// Adds a set that repeats the previous set's weight, reps and RPE.
    /// Returns the new set's index.
    pub fn add_set(&mut self, exercise: usize) -> Result<usize, AppError> {
        let sets = &mut self.exercise_mut(exercise)?.sets;
        let (weight, reps, rpe) = sets
            .last()
            .map(|s| (s.weight, s.reps, s.rpe))
            .unwrap_or((0.0, 0, DEFAULT_RPE));
        sets.push(SetLog {
            id: new_id(),
            weight,
            reps,
            rpe,
            rest_time: DEFAULT_REST_SECONDS,
        });
        Ok(sets.len() - 1)
    }

    pub fn update_set(
        &mut self,
        exercise: usize,
        set: usize,
        field: SetField,
        value: f64,
    ) -> Result<(), AppError> {
        let target = self
            .exercise_mut(exercise)?
            .sets
            .get_mut(set)
            .ok_or_else(|| AppError::NotFound(format!("Set {set} not found")))?;
        match field {
            SetField::Weight => target.weight = non_negative(value, "weight")?,
            SetField::Rpe => target.rpe = non_negative(value, "RPE")?,
            SetField::Reps => target.reps = whole_number(value, "reps")?,
            SetField::RestTime => target.rest_time = whole_number(value, "rest time")?,
        }
        Ok(())
    }

    pub fn remove_set(&mut self, exercise: usize, set: usize) -> Result<SetLog, AppError> {
        let sets = &mut self.exercise_mut(exercise)?.sets;
        if set >= sets.len() {
            return Err(AppError::NotFound(format!("Set {set} not found")));
        }
        Ok(sets.remove(set))
    }

    /// True when at least one exercise would be saved.
    pub fn can_finish(&self) -> bool {
        self.exercises.iter().any(ExerciseLog::is_complete)
    }

    /// Produces the workout to save, keeping only named exercises with sets.
    pub fn finish(self, now: DateTime<Utc>) -> Result<WorkoutLog, AppError> {
        if !self.can_finish() {
            return Err(AppError::Validation(
                "A workout needs at least one named exercise with a set".to_string(),
            ));
        }
        Ok(WorkoutLog {
            id: new_id(),
            date: now,
            name: self.name,
            exercises: self
                .exercises
                .into_iter()
                .filter(ExerciseLog::is_complete)
                .collect(),
        })
    }

    fn exercise_mut(&mut self, exercise: usize) -> Result<&mut ExerciseLog, AppError> {
        self.exercises
            .get_mut(exercise)
            .ok_or_else(|| AppError::NotFound(format!("Exercise {exercise} not found")))
    }
}

/// NaN and infinities serialize as `null` and would make the stored log unreadable.
fn non_negative(value: f64, field: &str) -> Result<f64, AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "{field} must be a non-negative number, got {value}"
        )));
    }
    Ok(value)
}

fn whole_number(value: f64, field: &str) -> Result<u32, AppError> {
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(AppError::Validation(format!(
            "{field} must be a whole number, got {value}"
        )));
    }
    Ok(value as u32)
}

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::RecoveryLog;

pub const SORENESS_LABELS: [&str; 5] = ["None", "Mild", "Moderate", "High", "Severe"];
pub const READINESS_LABELS: [&str; 5] = ["Very Poor", "Poor", "Okay", "Good", "Excellent"];

const MAX_SLEEP_HOURS: f64 = 12.0;

/// Daily recovery check-in being filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryDraft {
    pub sleep_hours: f64,
    pub soreness: u8,
    pub readiness: u8,
}

impl Default for RecoveryDraft {
    fn default() -> Self {
        Self {
            sleep_hours: 8.0,
            soreness: 2,
            readiness: 3,
        }
    }
}

impl RecoveryDraft {
    pub fn soreness_label(&self) -> Option<&'static str> {
        scale_label(&SORENESS_LABELS, self.soreness)
    }

    pub fn readiness_label(&self) -> Option<&'static str> {
        scale_label(&READINESS_LABELS, self.readiness)
    }

    /// Validates ranges and stamps the log with `date`.
    pub fn build(&self, date: NaiveDate) -> Result<RecoveryLog, AppError> {
        if !(0.0..=MAX_SLEEP_HOURS).contains(&self.sleep_hours) {
            return Err(AppError::Validation(format!(
                "sleep hours must be between 0 and {MAX_SLEEP_HOURS}, got {}",
                self.sleep_hours
            )));
        }
        check_scale("soreness", self.soreness)?;
        check_scale("readiness", self.readiness)?;

        Ok(RecoveryLog {
            id: Uuid::new_v4().to_string(),
            date,
            sleep_hours: self.sleep_hours,
            soreness: self.soreness,
            readiness: self.readiness,
        })
    }
}

/// Label for a 1-5 scale value.
pub fn scale_label(labels: &[&'static str; 5], value: u8) -> Option<&'static str> {
    labels.get(usize::from(value).checked_sub(1)?).copied()
}

fn check_scale(field: &str, value: u8) -> Result<(), AppError> {
    if (1..=5).contains(&value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} must be between 1 and 5, got {value}"
        )))
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily recovery check-in. At most one per calendar date per identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryLog {
    pub id: String,
    pub date: NaiveDate,
    pub sleep_hours: f64,
    /// 1 (none) to 5 (severe).
    pub soreness: u8,
    /// 1 (very poor) to 5 (excellent).
    pub readiness: u8,
}

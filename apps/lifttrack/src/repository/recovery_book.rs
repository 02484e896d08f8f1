#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::RecoveryLog;

/// Recovery logs keyed by date, with an insertion sequence so the persisted
/// newest-first order survives the round trip through the map.
#[derive(Debug, Default)]
pub struct RecoveryBook {
    entries: BTreeMap<NaiveDate, (u64, RecoveryLog)>,
    next_seq: u64,
}

impl RecoveryBook {
    /// Builds from a newest-first sequence. If the input already holds two
    /// logs for one date, the one nearer the front wins.
    pub fn from_newest_first(logs: Vec<RecoveryLog>) -> Self {
        let mut book = Self::default();
        for log in logs.into_iter().rev() {
            book.upsert(log);
        }
        book
    }

    /// Inserts `log` as the newest entry, replacing any log for the same date.
    pub fn upsert(&mut self, log: RecoveryLog) -> Option<RecoveryLog> {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries
            .insert(log.date, (seq, log))
            .map(|(_, replaced)| replaced)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&RecoveryLog> {
        self.entries.get(&date).map(|(_, log)| log)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn into_newest_first(self) -> Vec<RecoveryLog> {
        let mut ordered: Vec<_> = self.entries.into_values().collect();
        ordered.sort_by(|a, b| b.0.cmp(&a.0));
        ordered.into_iter().map(|(_, log)| log).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(id: &str, date: &str, sleep: f64) -> RecoveryLog {
        RecoveryLog {
            id: id.to_string(),
            date: date.parse().unwrap(),
            sleep_hours: sleep,
            soreness: 2,
            readiness: 3,
        }
    }

    #[test]
    fn test_order_survives_round_trip() {
        let logs = vec![
            log("r3", "2024-01-03", 7.0),
            log("r1", "2024-01-01", 8.0),
            log("r2", "2024-01-02", 6.0),
        ];
        let ids: Vec<_> = RecoveryBook::from_newest_first(logs.clone())
            .into_newest_first()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec!["r3", "r1", "r2"]);
    }

    #[test]
    fn test_upsert_replaces_same_date() {
        let mut book = RecoveryBook::from_newest_first(vec![log("old", "2024-01-05", 5.0)]);
        let replaced = book.upsert(log("new", "2024-01-05", 9.0));
        assert_eq!(replaced.map(|l| l.id).as_deref(), Some("old"));
        assert_eq!(book.len(), 1);
        let date = "2024-01-05".parse().unwrap();
        assert_eq!(book.get(date).map(|l| l.sleep_hours), Some(9.0));
    }

    #[test]
    fn test_upsert_goes_to_front() {
        let mut book = RecoveryBook::from_newest_first(vec![
            log("b", "2024-01-06", 7.0),
            log("a", "2024-01-05", 7.0),
        ]);
        book.upsert(log("c", "2024-01-04", 7.0));
        let ids: Vec<_> = book.into_newest_first().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_duplicate_dates_in_input_keep_front_entry() {
        let book = RecoveryBook::from_newest_first(vec![
            log("newer", "2024-01-05", 8.0),
            log("older", "2024-01-05", 4.0),
        ]);
        let logs = book.into_newest_first();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, "newer");
    }
}

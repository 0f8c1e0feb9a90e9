//! Pure transition rules and predicates for the registry. Nothing in this
//! module touches the database, which keeps the rules testable on their own.

use chrono::NaiveDate;

/// An event stays open through its final day.
pub fn event_open(end_date: NaiveDate, today: NaiveDate) -> bool {
    end_date >= today
}

/// Only attendance that was both attended and passed earns credit.
pub fn earns_credit(attended: bool, passed: bool) -> bool {
    attended && passed
}

/// One row of an attendance-taking submission, as it arrives from a form or
/// sheet. The person id may be absent when the row is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceEntry {
    pub person_id: Option<i32>,
    pub attended: bool,
    pub passed: bool,
}

/// A validated entry, ready to be applied to a registration row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidEntry {
    pub person_id: i32,
    pub attended: bool,
    pub passed: bool,
}

/// Checks a single submitted row. Validation is per row; a bad entry never
/// aborts the rest of the batch.
pub fn validate_entry(entry: &AttendanceEntry) -> Result<ValidEntry, String> {
    match entry.person_id {
        Some(person_id) => Ok(ValidEntry {
            person_id,
            attended: entry.attended,
            passed: entry.passed,
        }),
        None => Err("missing person id".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn event_open_through_final_day() {
        let today = date(2026, 8, 26);
        assert!(event_open(today, today));
        assert!(event_open(date(2026, 9, 1), today));
        assert!(!event_open(date(2026, 8, 25), today));
    }

    #[test]
    fn credit_requires_attended_and_passed() {
        assert!(earns_credit(true, true));
        assert!(!earns_credit(true, false));
        assert!(!earns_credit(false, true));
        assert!(!earns_credit(false, false));
    }

    #[test]
    fn entry_without_person_is_rejected() {
        let entry = AttendanceEntry {
            person_id: None,
            attended: true,
            passed: true,
        };
        assert!(validate_entry(&entry).is_err());

        let entry = AttendanceEntry {
            person_id: Some(7),
            attended: true,
            passed: false,
        };
        let valid = validate_entry(&entry).unwrap();
        assert_eq!(valid.person_id, 7);
        assert!(valid.attended);
        assert!(!valid.passed);
    }
}

//! CSV import of people rosters and attendance sheets.

use crate::domain::AttendanceEntry;
use anyhow::Context;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One person row from an imported roster sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonRecord {
    pub first_name: String,
    pub last_name: String,
    pub sca_name: Option<String>,
}

/// One row of an attendance sheet. The person id column may be blank, which
/// the recording step rejects per row.
#[derive(Debug, Deserialize)]
struct SheetRow {
    person_id: Option<i32>,
    attended: bool,
    passed: bool,
}

pub fn read_people<R: Read>(rdr: R) -> csv::Result<Vec<PersonRecord>> {
    csv::Reader::from_reader(rdr).into_deserialize().collect()
}

pub fn load_people(path: &Path) -> anyhow::Result<Vec<PersonRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open roster {}", path.display()))?;
    Ok(read_people(file)?)
}

pub fn read_attendance_sheet<R: Read>(rdr: R) -> csv::Result<Vec<AttendanceEntry>> {
    let rows: Vec<SheetRow> = csv::Reader::from_reader(rdr).into_deserialize().collect::<csv::Result<_>>()?;

    Ok(rows
        .into_iter()
        .map(|row| AttendanceEntry {
            person_id: row.person_id,
            attended: row.attended,
            passed: row.passed,
        })
        .collect())
}

pub fn load_attendance_sheet(path: &Path) -> anyhow::Result<Vec<AttendanceEntry>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open attendance sheet {}", path.display()))?;
    Ok(read_attendance_sheet(file)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_people_with_optional_sca_name() {
        let sheet = "first_name,last_name,sca_name\n\
                     Anna,Smith,Aelfgifu\n\
                     Bob,Jones,\n";

        let people = read_people(sheet.as_bytes()).unwrap();

        assert_eq!(people.len(), 2);
        assert_eq!(people[0].sca_name.as_deref(), Some("Aelfgifu"));
        assert_eq!(people[1].sca_name, None);
    }

    #[test]
    fn blank_person_id_survives_as_none() {
        let sheet = "person_id,attended,passed\n\
                     4,true,true\n\
                     ,true,false\n";

        let entries = read_attendance_sheet(sheet.as_bytes()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].person_id, Some(4));
        assert_eq!(entries[1].person_id, None);
    }
}

//! CSV export of the stored collections. Column order is fixed and covers the
//! complete record including bookkeeping fields; given the same record
//! sequence the output is byte-identical.

use super::domain::{format_timestamp, CaregiverRecord, ParentRecord};

pub const PARENT_COLUMNS: [&str; 10] = [
    "id",
    "full_name",
    "email",
    "phone",
    "baby_timing",
    "start_timeframe",
    "notes",
    "updates_opt_in",
    "created_at",
    "updated_at",
];

pub const CAREGIVER_COLUMNS: [&str; 11] = [
    "id",
    "full_name",
    "email",
    "phone",
    "certs",
    "years_experience",
    "availability",
    "notes",
    "updates_opt_in",
    "created_at",
    "updated_at",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer flush failed: {0}")]
    Buffer(String),
    #[error("csv output was not valid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub fn parents_csv(records: &[ParentRecord]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(PARENT_COLUMNS)?;

    for record in records {
        writer.write_record([
            record.id.to_string(),
            record.full_name.clone(),
            record.email.clone(),
            record.phone.clone(),
            record.baby_timing.clone(),
            record.start_timeframe.clone(),
            record.notes.clone().unwrap_or_default(),
            bool_cell(record.updates_opt_in).to_string(),
            format_timestamp(&record.created_at),
            format_timestamp(&record.updated_at),
        ])?;
    }

    finish(writer)
}

pub fn caregivers_csv(records: &[CaregiverRecord]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CAREGIVER_COLUMNS)?;

    for record in records {
        writer.write_record([
            record.id.to_string(),
            record.full_name.clone(),
            record.email.clone(),
            record.phone.clone(),
            record.certs.clone().unwrap_or_default(),
            record
                .years_experience
                .map(|years| years.to_string())
                .unwrap_or_default(),
            record.availability.clone(),
            record.notes.clone().unwrap_or_default(),
            bool_cell(record.updates_opt_in).to_string(),
            format_timestamp(&record.created_at),
            format_timestamp(&record.updated_at),
        ])?;
    }

    finish(writer)
}

/// Booleans export as 0/1, matching their storage representation.
fn bool_cell(flag: bool) -> u8 {
    u8::from(flag)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let buffer = writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.to_string()))?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_parents() -> Vec<ParentRecord> {
        let base = Utc.with_ymd_and_hms(2025, 11, 2, 8, 30, 0).unwrap();
        vec![
            ParentRecord {
                id: 3,
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "555-1212".to_string(),
                baby_timing: "due March".to_string(),
                start_timeframe: "1-3 months".to_string(),
                notes: Some("prefers \"quiet\" nights, arrives late,\nneeds parking".to_string()),
                updates_opt_in: true,
                created_at: base,
                updated_at: base,
            },
            ParentRecord {
                id: 2,
                full_name: "Ana Souza".to_string(),
                email: "ana@example.com".to_string(),
                phone: "555-3434".to_string(),
                baby_timing: "8 weeks old".to_string(),
                start_timeframe: "asap".to_string(),
                notes: None,
                updates_opt_in: false,
                created_at: base - chrono::Duration::hours(1),
                updated_at: base,
            },
            ParentRecord {
                id: 1,
                full_name: "Mia Chen".to_string(),
                email: "mia@example.com".to_string(),
                phone: "555-5656".to_string(),
                baby_timing: "due January".to_string(),
                start_timeframe: "3-6 months".to_string(),
                notes: Some("twins".to_string()),
                updates_opt_in: true,
                created_at: base - chrono::Duration::hours(2),
                updated_at: base - chrono::Duration::hours(2),
            },
        ]
    }

    #[test]
    fn round_trips_through_a_standard_csv_parser() {
        let records = sample_parents();
        let document = parents_csv(&records).expect("serializes");

        let mut reader = csv::Reader::from_reader(document.as_bytes());
        assert_eq!(
            reader
                .headers()
                .expect("headers")
                .iter()
                .collect::<Vec<_>>(),
            PARENT_COLUMNS.to_vec()
        );

        let rows: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().expect("rows");
        assert_eq!(rows.len(), 3);

        // The note with an embedded delimiter and newline survives intact.
        assert_eq!(
            &rows[0][6],
            "prefers \"quiet\" nights, arrives late,\nneeds parking"
        );
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][7], "1");
        assert_eq!(&rows[1][6], "");
        assert_eq!(&rows[1][7], "0");
        assert_eq!(&rows[2][2], "mia@example.com");
    }

    #[test]
    fn output_is_byte_identical_across_runs() {
        let records = sample_parents();
        assert_eq!(
            parents_csv(&records).expect("first run"),
            parents_csv(&records).expect("second run")
        );
    }

    #[test]
    fn caregiver_columns_include_bookkeeping_fields() {
        let record = CaregiverRecord {
            id: 9,
            full_name: "Sam Rivers".to_string(),
            email: "sam@example.com".to_string(),
            phone: "555-0000".to_string(),
            certs: None,
            years_experience: None,
            availability: "overnights".to_string(),
            notes: None,
            updates_opt_in: false,
            created_at: Utc.with_ymd_and_hms(2025, 11, 2, 8, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 11, 3, 8, 30, 0).unwrap(),
        };

        let document = caregivers_csv(&[record]).expect("serializes");
        let mut lines = document.lines();
        assert_eq!(lines.next(), Some(CAREGIVER_COLUMNS.join(",").as_str()));
        let row = lines.next().expect("one row");
        assert!(row.starts_with("9,Sam Rivers,sam@example.com"));
        // Absent optionals export as empty cells.
        assert!(row.contains(",,,overnights"));
    }
}

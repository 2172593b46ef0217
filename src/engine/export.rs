//! CSV export of daily series.

use crate::domain::DailyRow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// `<scope>.csv`, lower-cased with spaces as dashes.
pub fn csv_filename(scope: &str) -> String {
    let scope = scope.trim().to_lowercase().replace(' ', "-");
    if scope.is_empty() {
        "export.csv".to_string()
    } else {
        format!("{}.csv", scope)
    }
}

/// Serialize rows as `Timestamp,Date,<column>...` ordered by date ascending.
///
/// `columns` fixes the entity column order. A column missing on a day is an
/// empty field.
pub fn daily_rows_to_csv(rows: &[DailyRow], columns: &[String]) -> Result<Vec<u8>, ExportError> {
    let mut sorted: Vec<&DailyRow> = rows.iter().collect();
    sorted.sort_by_key(|row| row.date);

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = vec!["Timestamp".to_string(), "Date".to_string()];
    header.extend(columns.iter().cloned());
    writer.write_record(&header)?;

    for row in sorted {
        let mut record = Vec::with_capacity(columns.len() + 2);
        record.push(row.date.to_string());
        record.push(row.date.to_csv_date());
        for column in columns {
            record.push(
                row.values
                    .get(column)
                    .map(|v| v.to_canonical_string())
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))
}

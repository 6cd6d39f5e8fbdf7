use wedding_common::model::GuestRecord;

use crate::error::AppError;

pub const CSV_HEADER: [&str; 3] = ["guest", "attendance", "attendance_label"];

/// Prepended so spreadsheet tools detect UTF-8.
pub const UTF8_BOM: char = '\u{feff}';

pub const CSV_FILE_NAME: &str = "guests.csv";

/// Render records as CSV (header always present, CRLF line endings, minimal quoting).
pub fn build_csv(records: &[GuestRecord]) -> Result<String, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::Export(e.to_string()))?;
    for record in records {
        let code = record.attendance.to_string();
        writer
            .write_record([record.guest.as_str(), code.as_str(), record.attendance_label()])
            .map_err(|e| AppError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Export(e.to_string()))
}

/// CSV document with the leading byte-order mark.
pub fn build_csv_with_bom(records: &[GuestRecord]) -> Result<String, AppError> {
    let csv = build_csv(records)?;
    Ok(format!("{UTF8_BOM}{csv}"))
}

use std::str::FromStr;

use csv::StringRecord;

use crate::ingest::IngestError;

/// Human-readable location of a CSV record for error messages.
pub fn record_label(record: &StringRecord) -> String {
    match record.position() {
        Some(pos) => format!("line {}", pos.line()),
        None => String::from("record"),
    }
}

pub fn parse_field<T: FromStr>(
    record: &str,
    field: &'static str,
    value: &str,
) -> Result<T, IngestError> {
    value.trim().parse().map_err(|_| IngestError::Field {
        record: record.to_string(),
        field,
        value: value.to_string(),
    })
}

/// Fields of a record with trailing empty fields (trailing delimiters) dropped.
pub fn trimmed_fields(record: &StringRecord) -> Vec<&str> {
    let mut fields: Vec<&str> = record.iter().collect();
    while fields.last().is_some_and(|f| f.trim().is_empty()) {
        fields.pop();
    }
    fields
}

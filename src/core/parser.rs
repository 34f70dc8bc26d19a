use crate::domain::model::FeedRecord;

pub const FIELD_DELIMITER: char = '|';

/// Parses the raw feed payload into records.
///
/// The first line is the header. Every following non-blank line becomes one
/// record with exactly the header's fields: short rows get `null` for the
/// missing trailing fields, extra cells are dropped. Parsing never fails;
/// malformed input just yields fewer or sparser records.
pub fn parse_feed(raw: &str) -> Vec<FeedRecord> {
    let mut lines = raw.split('\n');

    let headers: Vec<&str> = match lines.next() {
        Some(header) => header.split(FIELD_DELIMITER).collect(),
        None => return Vec::new(),
    };

    let records: Vec<FeedRecord> = lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut values = line.split(FIELD_DELIMITER);
            let mut record = FeedRecord::new();
            for header in &headers {
                record.insert(*header, values.next().map(str::to_string));
            }
            record
        })
        .collect();

    tracing::debug!(
        "Parsed {} records with {} header fields",
        records.len(),
        headers.len()
    );

    records
}

//! CSV bodies → ordered string records → typed rows.
//!
//! # Design
//! Parsing and projection are separate stages. `parse_records` only knows
//! about the header and field counts: a row whose width differs from the
//! header is dropped and parsing carries on, because the upstream feed emits
//! the occasional malformed trailing row. Business rules such as "a blank
//! name falls back to the symbol" belong to each `FromRecord` impl.

use crate::error::ApiError;

/// One CSV row as `(header, value)` pairs in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Field value, or an empty string when the column is missing.
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Field value, or `None` when the column is missing or blank.
    pub fn optional(&self, name: &str) -> Option<String> {
        self.get(name)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Typed projection of a single record by header name.
pub trait FromRecord: Sized {
    fn from_record(record: &Record) -> Self;
}

pub fn project<T: FromRecord>(records: &[Record]) -> Vec<T> {
    records.iter().map(T::from_record).collect()
}

/// Parse a CSV body whose first row is the header.
///
/// Blank lines are ignored. Rows with a field count different from the
/// header are skipped. A body without a header row, or one that is not valid
/// UTF-8 CSV, is a `Decode` error.
pub fn parse_records(body: &[u8]) -> Result<Vec<Record>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body);

    let header = reader.headers().map_err(csv_error)?.clone();
    if header.is_empty() {
        return Err(ApiError::Decode("CSV body has no header row".to_string()));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                if let csv::ErrorKind::UnequalLengths { pos, len, .. } = err.kind() {
                    tracing::debug!(
                        line = ?pos.as_ref().map(|p| p.line()),
                        fields = *len,
                        expected = header.len(),
                        "skipping CSV row with mismatched field count"
                    );
                    continue;
                }
                return Err(csv_error(err));
            }
        };
        records.push(
            header
                .iter()
                .zip(row.iter())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        );
    }
    Ok(records)
}

fn csv_error(err: csv::Error) -> ApiError {
    ApiError::Decode(format!("malformed CSV: {err}"))
}

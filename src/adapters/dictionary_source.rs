use crate::adapters::input::{decode_with_fallback, SourceEncoding};
use crate::domain::model::RawEntry;
use crate::utils::error::{CleanseError, Result};

pub const SHORTHAND_COLUMN: &str = "shorthand";
pub const FULL_FORM_COLUMN: &str = "full_form";

/// Reads shorthand/full-form rows from a CSV dictionary.
///
/// Header names are matched after trimming and lowercasing. Empty cells come
/// back as `None`; filtering is left to the dictionary compiler.
pub fn read_dictionary_csv(bytes: &[u8], source_name: &str) -> Result<Vec<RawEntry>> {
    let (text, encoding) = decode_with_fallback(bytes);
    if encoding == SourceEncoding::Latin1 {
        tracing::warn!("⚠️ Dictionary {} is not UTF-8, decoded as ISO-8859-1", source_name);
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CleanseError::MissingRequiredField {
                field: name.to_string(),
                source_name: source_name.to_string(),
            })
    };
    let shorthand_index = column(SHORTHAND_COLUMN)?;
    let full_form_index = column(FULL_FORM_COLUMN)?;

    let cell = |record: &csv::StringRecord, index: usize| {
        record
            .get(index)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        entries.push(RawEntry {
            shorthand: cell(&record, shorthand_index),
            full_form: cell(&record, full_form_index),
        });
    }

    tracing::debug!("Read {} dictionary rows from {}", entries.len(), source_name);
    Ok(entries)
}

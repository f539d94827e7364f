use crate::domain::model::TextUnit;
use crate::utils::error::{CleanseError, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_TEXT_COLUMN: &str = "Clinical Notes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Latin1,
}

/// 先以 UTF-8 解碼，失敗時退回 ISO-8859-1
pub fn decode_with_fallback(bytes: &[u8]) -> (String, SourceEncoding) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (
            text.strip_prefix('\u{feff}').unwrap_or(text).to_string(),
            SourceEncoding::Utf8,
        ),
        // ISO-8859-1 maps each byte to the code point of the same value
        Err(_) => (
            bytes.iter().map(|&b| char::from(b)).collect(),
            SourceEncoding::Latin1,
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Csv,
    Txt,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(InputKind::Csv),
            "txt" => Ok(InputKind::Txt),
            _ => Err(CleanseError::UnsupportedFileType {
                path: path.display().to_string(),
                extension,
            }),
        }
    }
}

/// Decodes `bytes` and splits them into text units according to the file
/// extension of `path`.
pub fn read_text_units(path: &Path, bytes: &[u8], text_column: &str) -> Result<Vec<TextUnit>> {
    let kind = InputKind::from_path(path)?;
    let (text, encoding) = decode_with_fallback(bytes);
    if encoding == SourceEncoding::Latin1 {
        tracing::warn!(
            "⚠️ UTF-8 decode failed for {}. Retrying with ISO-8859-1...",
            path.display()
        );
    }

    let source_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match kind {
        InputKind::Csv => read_csv_units(&text, text_column, &source_name),
        InputKind::Txt => Ok(read_txt_units(&text)),
    }
}

/// One unit per row of `text_column`. Short rows yield empty text.
pub fn read_csv_units(text: &str, text_column: &str, source_name: &str) -> Result<Vec<TextUnit>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let column_index = reader
        .headers()?
        .iter()
        .position(|header| header.trim() == text_column)
        .ok_or_else(|| CleanseError::MissingRequiredField {
            field: text_column.to_string(),
            source_name: source_name.to_string(),
        })?;

    let mut units = Vec::new();
    for record in reader.records() {
        let record = record?;
        units.push(TextUnit::new(record.get(column_index).unwrap_or_default()));
    }
    Ok(units)
}

/// One unit per non-blank line, trimmed.
pub fn read_txt_units(text: &str) -> Vec<TextUnit> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(TextUnit::from)
        .collect()
}

/// Supported input files directly inside `dir`, sorted by file name.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match InputKind::from_path(&path) {
            Ok(_) => files.push(path),
            Err(_) => tracing::debug!("Skipping unsupported file {}", path.display()),
        }
    }
    files.sort();
    Ok(files)
}

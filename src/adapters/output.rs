use crate::domain::model::{CleanedUnit, CleaningReport, FrequencyCounter, ReplacementTable};
use crate::utils::error::{CleanseError, Result};
use std::io::Write;
use std::str::FromStr;
use zip::write::{FileOptions, ZipWriter};

pub const ORIGINAL_HEADER: &str = "Original Notes";
pub const CLEANED_HEADER: &str = "Cleaned Notes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Csv,
    Txt,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Txt => "txt",
            OutputFormat::Json => "json",
        }
    }

    /// 解析設定中的格式清單，重複項只保留一次
    pub fn parse_list(formats: &[String]) -> Result<Vec<OutputFormat>> {
        let mut parsed = Vec::new();
        for format in formats {
            let format = format.parse::<OutputFormat>()?;
            if !parsed.contains(&format) {
                parsed.push(format);
            }
        }
        Ok(parsed)
    }
}

impl FromStr for OutputFormat {
    type Err = CleanseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "txt" => Ok(OutputFormat::Txt),
            "json" => Ok(OutputFormat::Json),
            other => Err(CleanseError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: csv, txt, json".to_string(),
            }),
        }
    }
}

/// `Original Notes,Cleaned Notes` table, one row per unit.
pub fn render_csv(units: &[CleanedUnit]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([ORIGINAL_HEADER, CLEANED_HEADER])?;
    for unit in units {
        writer.write_record([unit.original.as_str(), unit.cleaned.as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| CleanseError::IoError(e.into_error()))
}

/// Cleaned notes only, one per line.
pub fn render_txt(units: &[CleanedUnit]) -> String {
    let mut out = String::new();
    for unit in units {
        out.push_str(&unit.cleaned);
        out.push('\n');
    }
    out
}

pub fn render_json(report: &CleaningReport) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(report)?)
}

/// Human-readable replacement summary.
pub fn render_summary_log(source_name: &str, counter: &FrequencyCounter, table: &ReplacementTable) -> String {
    let mut out = format!("Replacement Summary for {}:\n\n", source_name);
    for (shorthand, count) in counter.sorted() {
        out.push_str(&format!(
            "{} -> {} : {} replacements\n",
            shorthand,
            table.full_form(shorthand).unwrap_or("?"),
            count
        ));
    }
    out
}

/// `Shorthand,Full Form,Count` table.
pub fn render_replacement_csv(counter: &FrequencyCounter, table: &ReplacementTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Shorthand", "Full Form", "Count"])?;
    for (shorthand, count) in counter.sorted() {
        let count = count.to_string();
        writer.write_record([
            shorthand,
            table.full_form(shorthand).unwrap_or("?"),
            count.as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| CleanseError::IoError(e.into_error()))
}

/// Packs `(name, bytes)` pairs into one in-memory ZIP archive.
pub fn bundle_zip(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

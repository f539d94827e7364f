use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do when no usable dictionary rows remain after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyDictionaryPolicy {
    /// 空字典 => 清理流程只做小寫與正規化
    #[default]
    PassThrough,
    Fail,
}

/// 字典來源的原始資料列，欄位可能缺漏
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub shorthand: Option<String>,
    pub full_form: Option<String>,
}

impl RawEntry {
    pub fn new(shorthand: impl Into<String>, full_form: impl Into<String>) -> Self {
        Self {
            shorthand: Some(shorthand.into()),
            full_form: Some(full_form.into()),
        }
    }
}

/// 正規化後的字典項目 (trim + lowercase)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementEntry {
    pub shorthand: String,
    pub full_form: String,
}

impl ReplacementEntry {
    /// Returns `None` when either field is missing or blank after trimming.
    pub fn normalize(raw: &RawEntry) -> Option<Self> {
        let shorthand = raw.shorthand.as_deref()?.trim().to_lowercase();
        let full_form = raw.full_form.as_deref()?.trim().to_lowercase();

        if shorthand.is_empty() || full_form.is_empty() {
            return None;
        }

        Some(Self {
            shorthand,
            full_form,
        })
    }
}

/// Shorthand -> full form lookup. Keys keep the position of their first
/// occurrence; a later entry for the same key replaces only the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplacementTable {
    entries: IndexMap<String, String>,
}

impl ReplacementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入項目，回傳被覆蓋的舊值
    pub fn insert(&mut self, entry: ReplacementEntry) -> Option<String> {
        self.entries.insert(entry.shorthand, entry.full_form)
    }

    pub fn full_form(&self, shorthand: &str) -> Option<&str> {
        self.entries.get(shorthand).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-shorthand substitution counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyCounter {
    counts: HashMap<String, u64>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, shorthand: &str) {
        match self.counts.get_mut(shorthand) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(shorthand.to_string(), 1);
            }
        }
    }

    pub fn get(&self, shorthand: &str) -> u64 {
        self.counts.get(shorthand).copied().unwrap_or(0)
    }

    /// 以逐鍵加總合併另一個計數器
    pub fn merge(&mut self, other: FrequencyCounter) {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Highest count first; ties ordered by key.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut items: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        items
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    pub original: String,
}

impl TextUnit {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
        }
    }
}

impl From<&str> for TextUnit {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TextUnit {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedUnit {
    pub original: String,
    pub cleaned: String,
}

/// 一次清理執行的結果：逐筆輸出與整體計數
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningOutcome {
    pub units: Vec<CleanedUnit>,
    pub counter: FrequencyCounter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementStat {
    pub shorthand: String,
    pub full_form: String,
    pub count: u64,
}

/// JSON report written next to the cleaned outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    pub source_name: String,
    pub generated_at: DateTime<Utc>,
    pub unit_count: usize,
    pub skipped_dictionary_entries: usize,
    pub total_replacements: u64,
    pub replacements: Vec<ReplacementStat>,
    pub units: Vec<CleanedUnit>,
}

impl CleaningReport {
    pub fn build(
        source_name: &str,
        outcome: &CleaningOutcome,
        table: &ReplacementTable,
        skipped_dictionary_entries: usize,
    ) -> Self {
        let replacements = outcome
            .counter
            .sorted()
            .into_iter()
            .map(|(shorthand, count)| ReplacementStat {
                shorthand: shorthand.to_string(),
                full_form: table.full_form(shorthand).unwrap_or("?").to_string(),
                count,
            })
            .collect();

        Self {
            source_name: source_name.to_string(),
            generated_at: Utc::now(),
            unit_count: outcome.units.len(),
            skipped_dictionary_entries,
            total_replacements: outcome.counter.total(),
            replacements,
            units: outcome.units.clone(),
        }
    }
}

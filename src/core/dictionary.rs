pub use crate::domain::model::EmptyDictionaryPolicy;
use crate::domain::model::{RawEntry, ReplacementEntry, ReplacementTable};
use crate::utils::error::{CleanseError, Result};
use regex::{Regex, RegexBuilder};

/// Large clinical dictionaries produce wide alternations; raise the default
/// compiled-size ceiling so they still build.
const PATTERN_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Whole-token alternation over every key of a [`ReplacementTable`].
#[derive(Debug, Clone)]
pub struct MatchPattern {
    regex: Option<Regex>,
    key_count: usize,
}

impl MatchPattern {
    /// Builds `\b(?:k1|k2|...)\b` with every key escaped as a literal.
    ///
    /// Longer keys come first so that a key which is a prefix of another
    /// (`c` vs `c/o`) never shadows it; keys of equal length keep their
    /// table order. No keys yields a pattern that matches nothing.
    pub fn build<'a, I>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut keys: Vec<&str> = keys.into_iter().collect();
        if keys.is_empty() {
            return Ok(Self::never());
        }

        keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        let alternation = keys
            .iter()
            .map(|key| regex::escape(key))
            .collect::<Vec<_>>()
            .join("|");
        let source = format!(r"\b(?:{})\b", alternation);

        let regex = RegexBuilder::new(&source)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;

        Ok(Self {
            regex: Some(regex),
            key_count: keys.len(),
        })
    }

    pub fn never() -> Self {
        Self {
            regex: None,
            key_count: 0,
        }
    }

    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    pub fn matches_nothing(&self) -> bool {
        self.regex.is_none()
    }

    pub fn key_count(&self) -> usize {
        self.key_count
    }
}

/// Immutable output of [`DictionaryCompiler::compile`]; share it by reference
/// (or `Arc`) across every text unit and worker of a run.
#[derive(Debug, Clone)]
pub struct CompiledDictionary {
    pub table: ReplacementTable,
    pub pattern: MatchPattern,
    pub skipped_entries: usize,
}

impl CompiledDictionary {
    pub fn empty() -> Self {
        Self {
            table: ReplacementTable::new(),
            pattern: MatchPattern::never(),
            skipped_entries: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryCompiler {
    policy: EmptyDictionaryPolicy,
}

impl DictionaryCompiler {
    pub fn new(policy: EmptyDictionaryPolicy) -> Self {
        Self { policy }
    }

    /// Normalizes the raw rows, drops incomplete ones, and builds the table
    /// and pattern. Rows are applied in input order, so for a repeated
    /// shorthand the last row wins.
    pub fn compile<I>(&self, entries: I) -> Result<CompiledDictionary>
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let mut table = ReplacementTable::new();
        let mut skipped_entries = 0usize;
        let mut overwritten = 0usize;

        for (index, raw) in entries.into_iter().enumerate() {
            match ReplacementEntry::normalize(&raw) {
                Some(entry) => {
                    if let Some(previous) = table.insert(entry) {
                        overwritten += 1;
                        tracing::debug!(
                            "Dictionary row {} overrides earlier full form '{}'",
                            index + 1,
                            previous
                        );
                    }
                }
                None => {
                    skipped_entries += 1;
                    tracing::debug!("Dropping incomplete dictionary row {}: {:?}", index + 1, raw);
                }
            }
        }

        if skipped_entries > 0 {
            tracing::warn!(
                "⚠️ Dropped {} dictionary rows with a missing shorthand or full form",
                skipped_entries
            );
        }
        if overwritten > 0 {
            tracing::info!(
                "🔁 {} duplicate shorthand rows resolved (last occurrence wins)",
                overwritten
            );
        }

        if table.is_empty() {
            match self.policy {
                EmptyDictionaryPolicy::Fail => return Err(CleanseError::EmptyDictionary),
                EmptyDictionaryPolicy::PassThrough => {
                    tracing::warn!("⚠️ Dictionary is empty, cleaning will only normalize text");
                    return Ok(CompiledDictionary {
                        skipped_entries,
                        ..CompiledDictionary::empty()
                    });
                }
            }
        }

        let pattern = MatchPattern::build(table.keys())?;
        tracing::debug!(
            "Compiled dictionary: {} shorthand keys, {} rows skipped",
            pattern.key_count(),
            skipped_entries
        );

        Ok(CompiledDictionary {
            table,
            pattern,
            skipped_entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(rows: &[(&str, &str)]) -> CompiledDictionary {
        DictionaryCompiler::default()
            .compile(rows.iter().map(|(s, f)| RawEntry::new(*s, *f)))
            .unwrap()
    }

    #[test]
    fn test_duplicate_shorthand_last_wins() {
        let dict = compile(&[("bid", "twice daily"), ("bid", "two times a day")]);
        assert_eq!(dict.table.len(), 1);
        assert_eq!(dict.table.full_form("bid"), Some("two times a day"));
        assert_eq!(dict.pattern.key_count(), 1);
    }

    #[test]
    fn test_duplicates_detected_after_normalization() {
        let dict = compile(&[(" HR", "Heart Rate"), ("hr ", "HEART RATE (BPM)")]);
        assert_eq!(dict.table.len(), 1);
        assert_eq!(dict.table.full_form("hr"), Some("heart rate (bpm)"));
    }

    #[test]
    fn test_incomplete_rows_are_dropped_and_counted() {
        let rows = vec![
            RawEntry::new("hr", "heart rate"),
            RawEntry {
                shorthand: None,
                full_form: Some("orphan".to_string()),
            },
            RawEntry {
                shorthand: Some("prn".to_string()),
                full_form: None,
            },
            RawEntry::new("  ", "blank key"),
        ];

        let dict = DictionaryCompiler::default().compile(rows).unwrap();
        assert_eq!(dict.table.len(), 1);
        assert_eq!(dict.skipped_entries, 3);
    }

    #[test]
    fn test_empty_dictionary_passthrough() {
        let dict = DictionaryCompiler::new(EmptyDictionaryPolicy::PassThrough)
            .compile(Vec::new())
            .unwrap();
        assert!(dict.is_empty());
        assert!(dict.pattern.matches_nothing());
    }

    #[test]
    fn test_empty_dictionary_fail_policy() {
        let rows = vec![RawEntry {
            shorthand: None,
            full_form: None,
        }];
        let result = DictionaryCompiler::new(EmptyDictionaryPolicy::Fail).compile(rows);
        assert!(matches!(result, Err(CleanseError::EmptyDictionary)));
    }

    #[test]
    fn test_pattern_escapes_metacharacters() {
        let dict = compile(&[("q.d", "every day"), ("c/o", "complains of")]);
        let regex = dict.pattern.regex().unwrap();

        assert!(regex.is_match("take med q.d now"));
        // '.' must not act as a wildcard
        assert!(!regex.is_match("take med qxd now"));
        assert!(regex.is_match("pt c/o pain"));
    }

    #[test]
    fn test_pattern_requires_word_boundaries() {
        let dict = compile(&[("hr", "heart rate")]);
        let regex = dict.pattern.regex().unwrap();

        assert!(regex.is_match("hr 80"));
        assert!(regex.is_match("(hr)"));
        assert!(!regex.is_match("three"));
        assert!(!regex.is_match("hrs"));
    }

    #[test]
    fn test_longer_key_preferred_over_prefix_key() {
        let dict = compile(&[("c", "cup"), ("c/o", "complains of")]);
        let regex = dict.pattern.regex().unwrap();

        let found: Vec<&str> = regex.find_iter("pt c/o pain").map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["c/o"]);
    }

    #[test]
    fn test_compiled_dictionary_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompiledDictionary>();
    }
}

use crate::core::dictionary::{CompiledDictionary, MatchPattern};
use crate::domain::model::{FrequencyCounter, ReplacementTable};
use crate::utils::error::{CleanseError, Result};

/// Single left-to-right substitution pass of shorthand tokens.
#[derive(Debug, Clone, Copy)]
pub struct BulkReplacer<'d> {
    table: &'d ReplacementTable,
    pattern: &'d MatchPattern,
}

impl<'d> BulkReplacer<'d> {
    pub fn new(table: &'d ReplacementTable, pattern: &'d MatchPattern) -> Self {
        Self { table, pattern }
    }

    pub fn from_dictionary(dictionary: &'d CompiledDictionary) -> Self {
        Self::new(&dictionary.table, &dictionary.pattern)
    }

    /// Lowercases `text`, then replaces every whole-token shorthand with its
    /// full form and bumps `counter` once per replacement.
    ///
    /// Replacement text is never rescanned. A match missing from the table
    /// means the pattern and table disagree and is reported as
    /// [`CleanseError::LookupInvariantViolation`].
    pub fn replace(&self, text: &str, counter: &mut FrequencyCounter) -> Result<String> {
        let lowered = text.to_lowercase();

        let Some(regex) = self.pattern.regex() else {
            return Ok(lowered);
        };

        let mut output = String::with_capacity(lowered.len());
        let mut last_end = 0;

        for found in regex.find_iter(&lowered) {
            let token = found.as_str();
            let full_form = self.table.full_form(token).ok_or_else(|| {
                CleanseError::LookupInvariantViolation {
                    token: token.to_string(),
                }
            })?;

            output.push_str(&lowered[last_end..found.start()]);
            output.push_str(full_form);
            counter.increment(token);
            last_end = found.end();
        }

        output.push_str(&lowered[last_end..]);
        Ok(output)
    }
}

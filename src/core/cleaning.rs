use crate::core::dictionary::CompiledDictionary;
use crate::core::normalizer::TextNormalizer;
use crate::core::replacer::BulkReplacer;
use crate::domain::model::{CleanedUnit, CleaningOutcome, FrequencyCounter, TextUnit};
use crate::utils::error::{CleanseError, Result};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::Arc;

/// Lowercase -> shorthand expansion -> symbol/whitespace cleanup, per unit,
/// with one frequency counter for the whole run.
#[derive(Debug, Clone, Copy)]
pub struct CleaningPipeline<'d> {
    dictionary: &'d CompiledDictionary,
}

impl<'d> CleaningPipeline<'d> {
    pub fn new(dictionary: &'d CompiledDictionary) -> Self {
        Self { dictionary }
    }

    pub fn clean_unit(&self, unit: &TextUnit, counter: &mut FrequencyCounter) -> Result<CleanedUnit> {
        let replaced = BulkReplacer::from_dictionary(self.dictionary).replace(&unit.original, counter)?;

        Ok(CleanedUnit {
            original: unit.original.clone(),
            cleaned: TextNormalizer::normalize(&replaced),
        })
    }

    pub fn run(&self, units: &[TextUnit]) -> Result<CleaningOutcome> {
        let mut counter = FrequencyCounter::new();
        let cleaned = units
            .iter()
            .map(|unit| self.clean_unit(unit, &mut counter))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Cleaned {} units, {} replacements across {} shorthand keys",
            cleaned.len(),
            counter.total(),
            counter.len()
        );

        Ok(CleaningOutcome {
            units: cleaned,
            counter,
        })
    }

    /// Same result as [`run`](Self::run), spread over `workers` threads.
    ///
    /// Builds a pool for this call only; batch runs share one pool through
    /// [`run_in_pool`](Self::run_in_pool).
    pub fn run_parallel(&self, units: &[TextUnit], workers: usize) -> Result<CleaningOutcome> {
        if units.len() < 2 {
            return self.run(units);
        }
        match worker_pool(workers)? {
            Some(pool) => self.run_in_pool(units, &pool),
            None => self.run(units),
        }
    }

    /// Units are split into contiguous chunks, one per pool thread; each chunk
    /// fills its own counter and the counters are summed afterwards, so output
    /// order and final counts match the sequential run.
    pub fn run_in_pool(&self, units: &[TextUnit], pool: &ThreadPool) -> Result<CleaningOutcome> {
        let threads = pool.current_num_threads();
        if threads <= 1 || units.len() < 2 {
            return self.run(units);
        }

        let chunk_size = units.len().div_ceil(threads).max(1);
        let partitions = pool.install(|| {
            units
                .par_chunks(chunk_size)
                .map(|chunk| {
                    let mut local = FrequencyCounter::new();
                    let cleaned = chunk
                        .iter()
                        .map(|unit| self.clean_unit(unit, &mut local))
                        .collect::<Result<Vec<_>>>()?;
                    Ok::<_, CleanseError>((cleaned, local))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut outcome = CleaningOutcome {
            units: Vec::with_capacity(units.len()),
            counter: FrequencyCounter::new(),
        };
        for (cleaned, local) in partitions {
            outcome.units.extend(cleaned);
            outcome.counter.merge(local);
        }

        tracing::debug!(
            "Cleaned {} units on {} workers, {} replacements",
            outcome.units.len(),
            threads,
            outcome.counter.total()
        );

        Ok(outcome)
    }
}

/// Worker pool for a whole run; `None` when `workers` (0 or 1) asks for a
/// sequential run.
pub fn worker_pool(workers: usize) -> Result<Option<Arc<ThreadPool>>> {
    if workers <= 1 {
        return Ok(None);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("notes-cleanse-{}", index))
        .build()
        .map_err(|e| CleanseError::ProcessingError {
            message: format!("Failed to start worker pool: {}", e),
        })?;

    tracing::debug!("Started worker pool with {} threads", workers);
    Ok(Some(Arc::new(pool)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dictionary::DictionaryCompiler;
    use crate::domain::model::RawEntry;

    fn dictionary() -> CompiledDictionary {
        DictionaryCompiler::default()
            .compile(vec![
                RawEntry::new("hr", "heart rate"),
                RawEntry::new("c/o", "complains of"),
                RawEntry::new("sob", "shortness of breath"),
                RawEntry::new("bid", "twice daily"),
            ])
            .unwrap()
    }

    fn units(texts: &[&str]) -> Vec<TextUnit> {
        texts.iter().map(|t| TextUnit::from(*t)).collect()
    }

    #[test]
    fn test_run_cleans_each_unit_and_pairs_original() {
        let dict = dictionary();
        let outcome = CleaningPipeline::new(&dict)
            .run(&units(&["Pt c/o elevated HR today!", "SOB noted;  meds BID."]))
            .unwrap();

        assert_eq!(outcome.units.len(), 2);
        assert_eq!(outcome.units[0].original, "Pt c/o elevated HR today!");
        assert_eq!(
            outcome.units[0].cleaned,
            "pt complains of elevated heart rate today"
        );
        assert_eq!(
            outcome.units[1].cleaned,
            "shortness of breath noted meds twice daily"
        );
        assert_eq!(outcome.counter.total(), 4);
    }

    #[test]
    fn test_units_are_independent() {
        let dict = dictionary();
        let pipeline = CleaningPipeline::new(&dict);

        let alone = pipeline.run(&units(&["hr stable"])).unwrap();
        let together = pipeline.run(&units(&["c/o sob", "hr stable"])).unwrap();

        assert_eq!(alone.units[0], together.units[1]);
    }

    #[test]
    fn test_run_is_deterministic() {
        let dict = dictionary();
        let pipeline = CleaningPipeline::new(&dict);
        let input = units(&["HR 90, c/o pain", "bid", "nothing here"]);

        let first = pipeline.run(&input).unwrap();
        let second = pipeline.run(&input).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dict = dictionary();
        let pipeline = CleaningPipeline::new(&dict);
        let input: Vec<TextUnit> = (0..101)
            .map(|i| TextUnit::new(format!("Note {}: c/o SOB, HR {} bid!", i, 60 + i)))
            .collect();

        let sequential = pipeline.run(&input).unwrap();
        let parallel = pipeline.run_parallel(&input, 4).unwrap();

        assert_eq!(parallel, sequential);
        assert_eq!(parallel.counter.get("hr"), 101);
    }

    #[test]
    fn test_shared_pool_reused_across_runs() {
        let dict = dictionary();
        let pipeline = CleaningPipeline::new(&dict);
        let pool = worker_pool(3).unwrap().unwrap();

        let first = pipeline.run_in_pool(&units(&["hr", "c/o sob", "bid"]), &pool).unwrap();
        let second = pipeline.run_in_pool(&units(&["HR HR", "nothing"]), &pool).unwrap();

        assert_eq!(first, pipeline.run(&units(&["hr", "c/o sob", "bid"])).unwrap());
        assert_eq!(second.counter.get("hr"), 2);
        assert_eq!(pool.current_num_threads(), 3);
    }

    #[test]
    fn test_sequential_worker_counts_have_no_pool() {
        assert!(worker_pool(0).unwrap().is_none());
        assert!(worker_pool(1).unwrap().is_none());
    }

    #[test]
    fn test_empty_input() {
        let dict = dictionary();
        let outcome = CleaningPipeline::new(&dict).run_parallel(&[], 8).unwrap();
        assert!(outcome.units.is_empty());
        assert!(outcome.counter.is_empty());
    }
}

use crate::adapters::dictionary_source::read_dictionary_csv;
use crate::adapters::input::{discover_inputs, InputKind};
use crate::app::pipelines::notes_pipeline::NotesPipeline;
use crate::core::cleaning::worker_pool;
use crate::core::dictionary::{CompiledDictionary, DictionaryCompiler};
use crate::core::etl::EtlEngine;
use crate::core::{ConfigProvider, Storage};
use crate::utils::error::{CleanseError, ErrorSeverity, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FileFailure {
    pub input: PathBuf,
    pub error: CleanseError,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub processed: Vec<(PathBuf, String)>,
    pub failed: Vec<FileFailure>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// 失敗檔案中最嚴重的錯誤
    pub fn worst_failure(&self) -> Option<&FileFailure> {
        self.failed.iter().max_by_key(|f| f.error.severity())
    }
}

/// Reads and compiles the configured dictionary once for the whole run.
pub async fn load_dictionary<S: Storage, C: ConfigProvider>(storage: &S, config: &C) -> Result<CompiledDictionary> {
    let path = config.dictionary_path();
    tracing::info!("📖 Loading dictionary from: {}", path);

    let bytes = storage.read_file(path).await?;
    let entries = read_dictionary_csv(&bytes, path)?;
    let dictionary = DictionaryCompiler::new(config.empty_dictionary_policy()).compile(entries)?;

    tracing::info!(
        "✅ Dictionary ready: {} shorthand keys ({} rows skipped)",
        dictionary.table.len(),
        dictionary.skipped_entries
    );
    Ok(dictionary)
}

/// A single supported file, or every supported file directly inside a directory.
pub fn plan_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        return discover_inputs(input);
    }
    InputKind::from_path(input)?;
    Ok(vec![input.to_path_buf()])
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "notes".to_string())
}

/// Output base name for each planned input.
///
/// Inputs sharing a stem (`notes.csv` and `notes.txt`) get their extension
/// appended (`notes_csv`, `notes_txt`) so their outputs and logs stay apart.
pub fn output_stems(inputs: &[PathBuf]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for input in inputs {
        *seen.entry(file_stem(input)).or_insert(0) += 1;
    }

    inputs
        .iter()
        .map(|input| {
            let stem = file_stem(input);
            if seen.get(&stem).copied().unwrap_or(0) < 2 {
                return stem;
            }
            match input.extension() {
                Some(ext) => format!("{}_{}", stem, ext.to_string_lossy().to_ascii_lowercase()),
                None => stem,
            }
        })
        .collect()
}

/// Cleans every planned input with the shared dictionary.
///
/// Per-file failures are collected and the batch moves on; a critical error
/// (an engine invariant breaking) stops the batch.
pub async fn run_batch<S, C>(storage: S, config: C, dictionary: Arc<CompiledDictionary>) -> Result<BatchSummary>
where
    S: Storage + Clone,
    C: ConfigProvider + Clone,
{
    let inputs = plan_inputs(Path::new(config.input_path()))?;
    if inputs.is_empty() {
        tracing::warn!("⚠️ No .csv or .txt files found in {}", config.input_path());
    }

    let stems = output_stems(&inputs);
    let pool = worker_pool(config.workers())?;

    let mut summary = BatchSummary::default();
    let mut claimed: HashSet<String> = HashSet::new();
    for (input, stem) in inputs.into_iter().zip(stems) {
        // 同名輸出會互相覆蓋，後到的檔案記為失敗
        if !claimed.insert(stem.clone()) {
            let error = CleanseError::ProcessingError {
                message: format!("Output name '{}' is already used by another input", stem),
            };
            tracing::error!("❌ Failed to process {}: {}", input.display(), error);
            summary.failed.push(FileFailure { input, error });
            continue;
        }

        let pipeline = NotesPipeline::new(
            storage.clone(),
            config.clone(),
            Arc::clone(&dictionary),
            input.clone(),
        )
        .with_output_stem(stem)
        .with_worker_pool(pool.clone());

        match EtlEngine::new(pipeline).run().await {
            Ok(output) => summary.processed.push((input, output)),
            Err(error) if error.severity() == ErrorSeverity::Critical => return Err(error),
            Err(error) => {
                tracing::error!("❌ Failed to process {}: {}", input.display(), error);
                summary.failed.push(FileFailure { input, error });
            }
        }
    }

    tracing::info!(
        "🏁 Batch finished: {} succeeded, {} failed",
        summary.processed.len(),
        summary.failed.len()
    );
    Ok(summary)
}

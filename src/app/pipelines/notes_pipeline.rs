use crate::adapters::input::read_text_units;
use crate::adapters::output::{self, OutputFormat};
use crate::core::cleaning::CleaningPipeline;
use crate::core::dictionary::CompiledDictionary;
use crate::core::{CleaningOutcome, ConfigProvider, Pipeline, Storage, TextUnit};
use crate::domain::model::CleaningReport;
use crate::utils::error::{CleanseError, Result};
use rayon::ThreadPool;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 單一輸入檔的清理流程：讀取筆記 -> 展開縮寫 -> 寫出結果與摘要
pub struct NotesPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) dictionary: Arc<CompiledDictionary>,
    pub(crate) input_file: PathBuf,
    pub(crate) output_stem: Option<String>,
    pub(crate) pool: Option<Arc<ThreadPool>>,
}

impl<S: Storage, C: ConfigProvider> NotesPipeline<S, C> {
    pub fn new(storage: S, config: C, dictionary: Arc<CompiledDictionary>, input_file: PathBuf) -> Self {
        Self {
            storage,
            config,
            dictionary,
            input_file,
            output_stem: None,
            pool: None,
        }
    }

    /// Base name for every output and log file, in place of the input's stem.
    pub fn with_output_stem(mut self, stem: impl Into<String>) -> Self {
        self.output_stem = Some(stem.into());
        self
    }

    /// 共用批次的 worker pool，避免每個檔案重建
    pub fn with_worker_pool(mut self, pool: Option<Arc<ThreadPool>>) -> Self {
        self.pool = pool;
        self
    }

    fn source_name(&self) -> String {
        self.input_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input_file.display().to_string())
    }

    fn stem(&self) -> String {
        if let Some(stem) = &self.output_stem {
            return stem.clone();
        }
        self.input_file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "notes".to_string())
    }

    async fn write_to(&self, dir: &str, name: &str, data: &[u8]) -> Result<String> {
        let path = Path::new(dir).join(name).to_string_lossy().into_owned();
        self.storage.write_file(&path, data).await?;
        Ok(path)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for NotesPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<TextUnit>> {
        tracing::info!("🔄 Processing: {}", self.source_name());

        let bytes = self
            .storage
            .read_file(&self.input_file.to_string_lossy())
            .await?;
        read_text_units(&self.input_file, &bytes, self.config.text_column())
    }

    async fn transform(&self, units: Vec<TextUnit>) -> Result<CleaningOutcome> {
        let dictionary = Arc::clone(&self.dictionary);
        let workers = self.config.workers();
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let pipeline = CleaningPipeline::new(&dictionary);
            match pool {
                Some(pool) => pipeline.run_in_pool(&units, &pool),
                None => pipeline.run_parallel(&units, workers),
            }
        })
        .await
        .map_err(|e| CleanseError::ProcessingError {
            message: format!("Cleaning task failed: {}", e),
        })?
    }

    async fn load(&self, outcome: CleaningOutcome) -> Result<String> {
        let formats = OutputFormat::parse_list(self.config.output_formats())?;
        let source_name = self.source_name();
        let stem = self.stem();
        let table = &self.dictionary.table;

        let mut outputs: Vec<(String, Vec<u8>)> = Vec::new();
        for format in &formats {
            let data = match format {
                OutputFormat::Csv => output::render_csv(&outcome.units)?,
                OutputFormat::Txt => output::render_txt(&outcome.units).into_bytes(),
                OutputFormat::Json => {
                    let report = CleaningReport::build(
                        &source_name,
                        &outcome,
                        table,
                        self.dictionary.skipped_entries,
                    );
                    output::render_json(&report)?
                }
            };
            outputs.push((format!("{}.{}", stem, format.extension()), data));
        }

        let logs = vec![
            (
                format!("replacement_summary_{}.txt", stem),
                output::render_summary_log(&source_name, &outcome.counter, table).into_bytes(),
            ),
            (
                format!("replacement_log_{}.csv", stem),
                output::render_replacement_csv(&outcome.counter, table)?,
            ),
        ];

        let mut primary = None;
        for (name, data) in &outputs {
            let path = self.write_to(self.config.output_path(), name, data).await?;
            tracing::info!("✅ Saved: {}", path);
            primary.get_or_insert(path);
        }
        for (name, data) in &logs {
            let path = self.write_to(self.config.log_path(), name, data).await?;
            tracing::info!("📝 Log saved: {}", path);
        }

        if self.config.bundle_zip() {
            tracing::debug!("Creating ZIP bundle with {} files", outputs.len() + logs.len());
            let mut bundled = outputs;
            bundled.extend(logs);
            let zip_data = output::bundle_zip(&bundled)?;
            let path = self
                .write_to(self.config.output_path(), &format!("{}_bundle.zip", stem), &zip_data)
                .await?;
            tracing::info!("📦 Bundle saved: {}", path);
            return Ok(path);
        }

        primary.ok_or_else(|| CleanseError::ConfigError {
            message: "No output format selected".to_string(),
        })
    }
}

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::batch::{load_dictionary, run_batch, BatchSummary};
pub use app::pipelines::notes_pipeline::NotesPipeline;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::cleaning::{worker_pool, CleaningPipeline};
pub use crate::core::dictionary::{CompiledDictionary, DictionaryCompiler, EmptyDictionaryPolicy, MatchPattern};
pub use crate::core::etl::EtlEngine;
pub use crate::core::normalizer::TextNormalizer;
pub use crate::core::replacer::BulkReplacer;
pub use domain::model::{
    CleanedUnit, CleaningOutcome, FrequencyCounter, RawEntry, ReplacementEntry, ReplacementTable, TextUnit,
};
pub use utils::error::{CleanseError, Result};

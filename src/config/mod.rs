pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::dictionary::EmptyDictionaryPolicy;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "notes-cleanse")]
#[command(about = "Expand shorthand in clinical notes using a replacement dictionary")]
pub struct CliConfig {
    /// CSV dictionary with `shorthand` and `full_form` columns
    #[arg(long, default_value = "fully_expanded_dataset.csv")]
    pub dictionary: String,

    /// Input file (.csv or .txt) or a directory of them
    #[arg(long, default_value = "input")]
    pub input: String,

    #[arg(long = "output-dir", default_value = "./output")]
    pub output_path: String,

    #[arg(long = "log-dir", default_value = "./logs")]
    pub log_path: String,

    #[arg(long, default_value = "Clinical Notes")]
    pub text_column: String,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    /// Also write a ZIP bundle of the outputs
    #[arg(long)]
    pub zip: bool,

    /// Worker threads for cleaning (0 or 1 runs sequentially)
    #[arg(long, default_value = "1")]
    pub workers: usize,

    #[arg(long, help = "Fail instead of passing text through when the dictionary is empty")]
    pub fail_on_empty_dictionary: bool,

    /// TOML configuration file; replaces all other options when given
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "List the files that would be processed and exit")]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn dictionary_path(&self) -> &str {
        &self.dictionary
    }

    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn log_path(&self) -> &str {
        &self.log_path
    }

    fn text_column(&self) -> &str {
        &self.text_column
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn bundle_zip(&self) -> bool {
        self.zip
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn empty_dictionary_policy(&self) -> EmptyDictionaryPolicy {
        if self.fail_on_empty_dictionary {
            EmptyDictionaryPolicy::Fail
        } else {
            EmptyDictionaryPolicy::PassThrough
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("dictionary", &self.dictionary)?;
        validation::validate_file_extension("dictionary", &self.dictionary, &["csv"])?;
        validation::validate_path("input", &self.input)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_path("log_path", &self.log_path)?;
        validation::validate_non_empty_string("text_column", &self.text_column)?;
        validation::validate_output_formats("formats", &self.formats)?;
        validation::validate_range("workers", self.workers, 0, 256)?;
        Ok(())
    }
}

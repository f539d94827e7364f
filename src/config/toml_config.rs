use crate::adapters::input::DEFAULT_TEXT_COLUMN;
use crate::core::dictionary::EmptyDictionaryPolicy;
use crate::core::ConfigProvider;
use crate::utils::error::{CleanseError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub dictionary: DictionaryConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    pub path: String,
    #[serde(default)]
    pub on_empty: EmptyDictionaryPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    #[serde(default = "default_text_column")]
    pub text_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_log_path")]
    pub log_path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    #[serde(default)]
    pub zip: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub workers: usize,
}

fn default_text_column() -> String {
    DEFAULT_TEXT_COLUMN.to_string()
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// 替換環境變數 (例如 ${NOTES_DIR})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn dictionary_path(&self) -> &str {
        &self.dictionary.path
    }

    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn log_path(&self) -> &str {
        &self.output.log_path
    }

    fn text_column(&self) -> &str {
        &self.input.text_column
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn bundle_zip(&self) -> bool {
        self.output.zip
    }

    fn workers(&self) -> usize {
        self.processing.workers
    }

    fn empty_dictionary_policy(&self) -> EmptyDictionaryPolicy {
        self.dictionary.on_empty
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("dictionary.path", &self.dictionary.path)?;
        validation::validate_file_extension("dictionary.path", &self.dictionary.path, &["csv"])?;
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_non_empty_string("input.text_column", &self.input.text_column)?;
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_path("output.log_path", &self.output.log_path)?;
        validation::validate_output_formats("output.formats", &self.output.formats)?;
        validation::validate_range("processing.workers", self.processing.workers, 0, 256)?;

        if self.input.path.contains("${") || self.output.path.contains("${") {
            return Err(CleanseError::ConfigError {
                message: "Unresolved environment variable in input or output path".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[dictionary]
path = "fully_expanded_dataset.csv"

[input]
path = "input"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.text_column(), "Clinical Notes");
        assert_eq!(config.log_path(), "./logs");
        assert_eq!(config.output_formats(), ["csv".to_string()]);
        assert_eq!(config.workers(), 0);
        assert!(!config.bundle_zip());
        assert_eq!(config.empty_dictionary_policy(), EmptyDictionaryPolicy::PassThrough);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[dictionary]
path = "dict.csv"
on_empty = "fail"

[input]
path = "notes.txt"
text_column = "Note Text"

[output]
path = "./out"
log_path = "./out/logs"
formats = ["csv", "txt", "json"]
zip = true

[processing]
workers = 4
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.empty_dictionary_policy(), EmptyDictionaryPolicy::Fail);
        assert_eq!(config.text_column(), "Note Text");
        assert_eq!(config.output_formats().len(), 3);
        assert!(config.bundle_zip());
        assert_eq!(config.workers(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NOTES_CLEANSE_TEST_INPUT", "/data/notes");

        let toml_content = r#"
[dictionary]
path = "dict.csv"

[input]
path = "${NOTES_CLEANSE_TEST_INPUT}"

[output]
path = "${NOTES_CLEANSE_TEST_UNSET}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input_path(), "/data/notes");
        assert_eq!(config.output_path(), "${NOTES_CLEANSE_TEST_UNSET}");
        assert!(config.validate().is_err());

        std::env::remove_var("NOTES_CLEANSE_TEST_INPUT");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let toml_content = r#"
[dictionary]
path = "dict.xlsx"

[input]
path = "input"

[output]
path = "./output"
formats = ["pdf"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_dictionary_path_is_missing_config() {
        let toml_content = r#"
[dictionary]
path = ""

[input]
path = "input"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CleanseError::MissingConfigError { ref field } if field == "dictionary.path"));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let toml_content = r#"
[dictionary]
path = "dict.csv"
on_empty = "explode"

[input]
path = "input"

[output]
path = "./output"
"#;

        let err = TomlConfig::from_toml_str(toml_content).unwrap_err();
        assert!(matches!(err, CleanseError::TomlError(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[dictionary]
path = "dict.csv"

[input]
path = "input"

[output]
path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.dictionary_path(), "dict.csv");
    }
}

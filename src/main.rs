use clap::Parser;
use notes_cleanse::app::batch::{load_dictionary, plan_inputs, run_batch};
use notes_cleanse::core::ConfigProvider;
use notes_cleanse::utils::{logger, validation::Validate};
use notes_cleanse::{CleanseError, CliConfig, LocalStorage, TomlConfig};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting notes-cleanse");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let exit_code = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => execute(config, cli.dry_run).await,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    1
                }
            }
        }
        None => execute(cli.clone(), cli.dry_run).await,
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn execute<C>(config: C, dry_run: bool) -> i32
where
    C: ConfigProvider + Validate + Clone,
{
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return 1;
    }

    if dry_run {
        return match plan_inputs(Path::new(config.input_path())) {
            Ok(inputs) => {
                tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
                for input in inputs {
                    println!("{}", input.display());
                }
                0
            }
            Err(e) => report_failure(&e),
        };
    }

    let storage = LocalStorage::default();

    let dictionary = match load_dictionary(&storage, &config).await {
        Ok(dictionary) => Arc::new(dictionary),
        Err(e) => return report_failure(&e),
    };

    match run_batch(storage, config, dictionary).await {
        Ok(summary) => {
            for (input, output) in &summary.processed {
                println!("✅ {} -> {}", input.display(), output);
            }
            for failure in &summary.failed {
                eprintln!(
                    "❌ {}: {}",
                    failure.input.display(),
                    failure.error.user_friendly_message()
                );
            }
            match summary.worst_failure() {
                Some(failure) => {
                    eprintln!("💡 Suggestion: {}", failure.error.recovery_suggestion());
                    failure.error.exit_code().max(1)
                }
                None => 0,
            }
        }
        Err(e) => report_failure(&e),
    }
}

fn report_failure(e: &CleanseError) -> i32 {
    tracing::error!(
        "❌ Cleaning failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    e.exit_code().max(1)
}

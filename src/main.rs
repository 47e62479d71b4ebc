use clap::Parser;
use ramalama_compose::utils::error::{ComposeError, ErrorSeverity};
use ramalama_compose::utils::{logger, validation::Validate};
use ramalama_compose::{CliConfig, ComposeGenerator, LocalStorage, SystemHost};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting ramalama-compose");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config).await {
        Ok(Some(output_path)) => {
            tracing::info!("📁 Manifest saved to: {}", output_path);
            println!("📁 Manifest saved to: {}", output_path);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(
                "❌ Generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<Option<String>, ComposeError> {
    let serving = config.resolve()?;
    let host = SystemHost::new();
    let manifest = ComposeGenerator::new(&serving, &host).generate()?;

    if config.stdout {
        println!("{}", manifest.content);
        return Ok(None);
    }

    let storage = LocalStorage::new(config.output_dir.clone());
    storage.save_manifest(&manifest).await.map(Some)
}

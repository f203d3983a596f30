use clap::Parser;
use sheet_splitter::adapters::google::auth::{authenticate, DRIVE_SCOPE, SPREADSHEETS_SCOPE};
use sheet_splitter::core::engine::preview;
use sheet_splitter::core::ConfigProvider;
use sheet_splitter::utils::{logger, validation::Validate};
use sheet_splitter::{
    CliConfig, Coordinator, CsvSource, GoogleDrive, GoogleSheets, GroupWorker, SplitEngine,
    SplitError, TomlConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting sheet-splitter");

    let outcome = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(&config, cli.dry_run).await,
                Err(e) => Err(e),
            }
        }
        None => run(&cli, cli.dry_run).await,
    };

    // Errors are reported, never turned into a failing exit status.
    if let Err(e) = outcome {
        tracing::error!("❌ {} (Category: {:?})", e, e.category());
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        println!("{}", e.user_friendly_message());
    }

    Ok(())
}

async fn run<C: ConfigProvider + Validate>(config: &C, dry_run: bool) -> Result<(), SplitError> {
    config.validate()?;
    tracing::debug!(
        "Source {} ({}, '{}'), credentials {}",
        config.source_path(),
        config.encoding(),
        config.delimiter().escape_default(),
        config.credentials_path()
    );

    let source = CsvSource::new(config.source_path())
        .with_encoding(config.encoding())?
        .with_delimiter(config.delimiter())?;

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No spreadsheets will be created");
        preview(&source).await?;
        return Ok(());
    }

    let session = Arc::new(
        authenticate(
            config.credentials_path(),
            &[SPREADSHEETS_SCOPE, DRIVE_SCOPE],
        )
        .await?,
    );
    let sheets = GoogleSheets::new(Arc::clone(&session), config.sheets_endpoint())?
        .with_sheet_name(config.sheet_name());
    let drive = GoogleDrive::new(session, config.drive_endpoint())?;

    let worker = GroupWorker::new(Arc::new(sheets), Arc::new(drive))
        .with_title_template(config.title_template())
        .with_policy(config.failure_policy());
    let engine = SplitEngine::new(source, Coordinator::new(worker));

    let report = engine.run().await?;
    println!("{:?}", report.produced_counts());
    for success in &report.successes {
        println!("{}: {}", success.key, success.spreadsheet_id);
    }

    Ok(())
}

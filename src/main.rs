use anyhow::Context;
use clap::Parser;
use subenum::utils::error::{ErrorSeverity, SubenumError};
use subenum::utils::{logger, validation::Validate};
use subenum::{CliConfig, EnumerationEngine, ProcessRunner, SystemResolver, ToolsConfig, TracingLog};

fn exit_code(e: &SubenumError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: SubenumError) -> ! {
    tracing::error!(
        "{} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    logger::banner(&TracingLog);
    tracing::debug!("CLI config: {:?}", cli);

    let tools = ToolsConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load config file '{}'", cli.config))
        .unwrap_or_else(|e| {
            eprintln!("❌ {:#}", e);
            eprintln!(
                "💡 Copy subenum.example.toml to {} or pass --config <FILE>",
                subenum::config::DEFAULT_CONFIG_FILE
            );
            std::process::exit(1);
        });

    if let Err(e) = tools.validate() {
        fail(e);
    }

    let dry_run = cli.dry_run;
    let options = cli.into_run_options(tools);
    let engine = match EnumerationEngine::new(ProcessRunner::new(), SystemResolver, TracingLog, options) {
        Ok(engine) => engine,
        Err(e) => fail(e),
    };

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No tools will be executed");
        for spec in engine.dry_run() {
            println!("[{}] {}", spec.tool, spec.display_line());
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(summary) => {
            if !summary.failed_tools.is_empty() {
                tracing::warn!("Tools that failed: {}", summary.failed_tools.join(", "));
            }
            println!("✅ {} unique subdomains", summary.subdomains.len());
            println!("📁 Merged results: {}", summary.merged_path.display());
            if let Some(report) = summary.report_path {
                println!("📄 Report: {}", report.display());
            }
            Ok(())
        }
        Err(e) => fail(e),
    }
}

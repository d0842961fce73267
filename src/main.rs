mod cli;

use cli::{Args, Settings};
use cloudscan::adapters::outbound::console::StderrProgressReporter;
use cloudscan::adapters::outbound::filesystem::FileSystemCacheStore;
use cloudscan::adapters::outbound::network::{HttpIdentityResolver, HttpScanBackend};
use cloudscan::application::report_writer::ReportWriter;
use cloudscan::application::use_cases::ScanCloudAccountUseCase;
use cloudscan::config::{discover_config, load_config_from_path, ConfigFile};
use cloudscan::shared::error::ExitCode;
use cloudscan::shared::Result;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();
    init_logging(args.verbose);

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e.red());

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from warn
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Option<ConfigFile>> {
    match &args.config {
        Some(path) => load_config_from_path(path).map(Some),
        None => discover_config(&std::env::current_dir()?),
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let settings = Settings::resolve(args, config)?;
    tracing::debug!(
        "Cache directory: {}, scanner: {}",
        settings.cache_dir.display(),
        settings.scanner_url
    );

    // Create adapters (Dependency Injection)
    let cache_store = FileSystemCacheStore::new(&settings.cache_dir);
    let mut scan_backend = HttpScanBackend::new(&settings.scanner_url)?;
    if let Some(max_concurrent) = settings.max_concurrent {
        scan_backend = scan_backend.with_max_concurrent(max_concurrent);
    }
    let identity_resolver = HttpIdentityResolver::new(&settings.scanner_url)?;
    let progress_reporter = StderrProgressReporter::new();

    let use_case = ScanCloudAccountUseCase::new(
        settings.catalog,
        cache_store,
        scan_backend,
        identity_resolver,
        progress_reporter,
    )
    .with_provider(settings.provider);

    let response = use_case.execute(settings.request).await?;
    ReportWriter::new().write(&response.report, &response.report_options)?;

    if settings.exit_on_failure && response.has_failures() {
        eprintln!(
            "{}",
            "⚠️  Failed checks detected in the report".yellow()
        );
        return Ok(ExitCode::FailedChecksDetected);
    }

    Ok(ExitCode::Success)
}

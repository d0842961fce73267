use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use cloudscan::application::dto::{OutputFormat, ScanRequest, DEFAULT_TIMEOUT};
use cloudscan::application::use_cases::DEFAULT_PROVIDER;
use cloudscan::cloud_scan::domain::{ServiceCatalog, Severity};
use cloudscan::config::ConfigFile;
use cloudscan::shared::error::CloudScanError;
use cloudscan::shared::Result;

/// Scanner service used when neither the CLI nor the config names one
pub const DEFAULT_SCANNER_URL: &str = "http://127.0.0.1:8080";

/// Scan a cloud account, reusing cached per-service results
#[derive(Parser, Debug)]
#[command(name = "cloudscan")]
#[command(version)]
#[command(
    about = "Scan a cloud account for misconfigurations, reusing cached per-service results",
    long_about = None
)]
pub struct Args {
    /// Output format: json or table
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Services to scan (defaults to every supported service)
    /// Can be repeated or comma separated: -s ec2,s3 -s rds
    #[arg(short, long = "service", value_name = "SERVICE", value_delimiter = ',')]
    pub services: Vec<String>,

    /// Show the results of a single resource (requires exactly one --service)
    #[arg(long)]
    pub arn: Option<String>,

    /// Account id to scan (resolved from the credentials if omitted)
    #[arg(long)]
    pub account: Option<String>,

    /// Region to scan (resolved from the credentials if omitted)
    #[arg(long)]
    pub region: Option<String>,

    /// Cache directory
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Ignore cached results and rescan everything
    #[arg(long)]
    pub update_cache: bool,

    /// Rescan cached services older than this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub max_cache_age: Option<u64>,

    /// Deadline for the whole scan in seconds [default: 600]
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Severities to report, repeatable or comma separated (default: all)
    #[arg(long = "severity", value_name = "SEVERITY", value_delimiter = ',')]
    pub severities: Vec<Severity>,

    /// Base URL of the scanner service
    #[arg(long, value_name = "URL")]
    pub scanner_url: Option<String>,

    /// Path to a config file (defaults to ./cloudscan.config.yml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Exit with code 1 when the report contains failed checks
    #[arg(long)]
    pub exit_on_failure: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Everything `main` needs after merging CLI arguments over the config file
#[derive(Debug)]
pub struct Settings {
    pub request: ScanRequest,
    pub catalog: ServiceCatalog,
    pub cache_dir: PathBuf,
    pub scanner_url: String,
    pub provider: String,
    /// Scanner request concurrency; the backend default when `None`
    pub max_concurrent: Option<usize>,
    pub exit_on_failure: bool,
}

impl Settings {
    /// Merges `args` over `config`; CLI values win
    pub fn resolve(args: Args, config: Option<ConfigFile>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let format = match (args.format, config.format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(name)) => OutputFormat::from_str(name).map_err(CloudScanError::configuration)?,
            (None, None) => OutputFormat::default(),
        };

        let services = if args.services.is_empty() {
            config.services.unwrap_or_default()
        } else {
            args.services
        };

        let severities = if args.severities.is_empty() {
            config
                .severities
                .unwrap_or_default()
                .iter()
                .map(|s| Severity::from_str(s).map_err(CloudScanError::configuration))
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            args.severities
        };

        let timeout = args
            .timeout
            .or(config.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let catalog = match config.supported_services {
            Some(services) => ServiceCatalog::new(services)?,
            None => ServiceCatalog::aws_default(),
        };

        let mut builder = ScanRequest::builder()
            .services(services)
            .update_cache(args.update_cache)
            .timeout(timeout)
            .format(format)
            .severities(severities);
        if let Some(account) = args.account {
            builder = builder.account_id(account);
        }
        if let Some(region) = args.region {
            builder = builder.region(region);
        }
        if let Some(arn) = args.arn {
            builder = builder.arn(arn);
        }
        if let Some(output) = args.output {
            builder = builder.output(output);
        }
        if let Some(max_age) = args.max_cache_age.or(config.max_cache_age_secs) {
            builder = builder.max_cache_age(Duration::from_secs(max_age));
        }

        Ok(Self {
            request: builder.build()?,
            catalog,
            cache_dir: args
                .cache_dir
                .or(config.cache_dir)
                .unwrap_or_else(default_cache_dir),
            scanner_url: args
                .scanner_url
                .or(config.scanner_url)
                .unwrap_or_else(|| DEFAULT_SCANNER_URL.to_string()),
            provider: config
                .provider
                .unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
            max_concurrent: config.max_concurrent_requests,
            exit_on_failure: args.exit_on_failure,
        })
    }
}

/// `$XDG_CACHE_HOME/cloudscan`, then `$HOME/.cache/cloudscan`, then `./.cloudscan-cache`
pub fn default_cache_dir() -> PathBuf {
    std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .filter(|v| !v.is_empty())
                .map(|home| PathBuf::from(home).join(".cache"))
        })
        .map(|base| base.join("cloudscan"))
        .unwrap_or_else(|| PathBuf::from(".cloudscan-cache"))
}

use super::OutputFormat;
use crate::cloud_scan::domain::Severity;
use crate::shared::error::CloudScanError;
use crate::shared::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Default deadline for a whole scan
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// ScanRequest - input of the scan use case
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Requested services; every supported service when empty
    pub services: Vec<String>,
    pub account_id: Option<String>,
    pub region: Option<String>,
    /// Resource identifier to drill into
    pub arn: Option<String>,
    /// Skip reading the cache; everything is rescanned and the cache replaced
    pub update_cache: bool,
    /// Cached services older than this are rescanned
    pub max_cache_age: Option<Duration>,
    /// Deadline for the whole flow
    pub timeout: Duration,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub severities: Vec<Severity>,
}

impl ScanRequest {
    pub fn builder() -> ScanRequestBuilder {
        ScanRequestBuilder::default()
    }
}

/// Builder for [`ScanRequest`]
#[derive(Debug, Default)]
pub struct ScanRequestBuilder {
    services: Vec<String>,
    account_id: Option<String>,
    region: Option<String>,
    arn: Option<String>,
    update_cache: bool,
    max_cache_age: Option<Duration>,
    timeout: Option<Duration>,
    format: OutputFormat,
    output: Option<PathBuf>,
    severities: Vec<Severity>,
}

impl ScanRequestBuilder {
    pub fn services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services = services.into_iter().map(Into::into).collect();
        self
    }

    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn arn(mut self, arn: impl Into<String>) -> Self {
        self.arn = Some(arn.into());
        self
    }

    pub fn update_cache(mut self, update_cache: bool) -> Self {
        self.update_cache = update_cache;
        self
    }

    pub fn max_cache_age(mut self, max_cache_age: Duration) -> Self {
        self.max_cache_age = Some(max_cache_age);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn severities(mut self, severities: Vec<Severity>) -> Self {
        self.severities = severities;
        self
    }

    /// Builds the request
    ///
    /// # Errors
    /// Returns a configuration error for a zero timeout or an empty service name
    pub fn build(self) -> Result<ScanRequest> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(CloudScanError::configuration("timeout must be greater than zero").into());
        }
        if self.services.iter().any(|s| s.trim().is_empty()) {
            return Err(CloudScanError::configuration("service names must not be empty").into());
        }

        Ok(ScanRequest {
            services: self.services,
            account_id: self.account_id.filter(|a| !a.is_empty()),
            region: self.region.filter(|r| !r.is_empty()),
            arn: self.arn.filter(|a| !a.is_empty()),
            update_cache: self.update_cache,
            max_cache_age: self.max_cache_age,
            timeout,
            format: self.format,
            output: self.output,
            severities: self.severities,
        })
    }
}

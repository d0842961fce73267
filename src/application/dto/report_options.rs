use super::OutputFormat;
use crate::cloud_scan::domain::{ScanScope, Severity};
use crate::shared::error::CloudScanError;
use crate::shared::Result;
use std::path::PathBuf;

/// Granularity of the rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    /// One summary line per service
    Service,
    /// One line per resource of the selected service
    Resource,
    /// Every check of the selected resource
    Result,
}

/// ReportOptions - how the final report is presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub format: OutputFormat,
    /// Output file; stdout when `None`
    pub output: Option<PathBuf>,
    /// Severities to show; every severity when empty
    pub severities: Vec<Severity>,
    pub level: ReportLevel,
    /// The selected service (set from `Resource` level upwards)
    pub service: Option<String>,
    /// The selected resource identifier (set at `Result` level)
    pub arn: Option<String>,
    /// Whether cached results were merged into the report
    pub from_cache: bool,
}

impl ReportOptions {
    /// Derives the options for a request
    ///
    /// The level escalates to `Resource` when exactly one service is selected
    /// and to `Result` when a resource identifier is also given.
    ///
    /// # Errors
    /// Returns a configuration error when `arn` is given without exactly one service
    pub fn new(
        format: OutputFormat,
        output: Option<PathBuf>,
        severities: Vec<Severity>,
        selected: &ScanScope,
        arn: Option<String>,
    ) -> Result<Self> {
        let mut options = Self {
            format,
            output,
            severities,
            level: ReportLevel::Service,
            service: None,
            arn: None,
            from_cache: false,
        };

        match (selected.single(), arn) {
            (Some(service), arn) => {
                options.level = ReportLevel::Resource;
                options.service = Some(service.to_string());
                if let Some(arn) = arn.filter(|a| !a.is_empty()) {
                    options.level = ReportLevel::Result;
                    options.arn = Some(arn);
                }
            }
            (None, Some(arn)) if !arn.is_empty() => {
                return Err(CloudScanError::configuration(
                    "you must specify the single --service which the --arn relates to",
                )
                .into());
            }
            (None, _) => {}
        }

        Ok(options)
    }

    /// Whether a result of `severity` passes the severity filter
    pub fn includes_severity(&self, severity: Severity) -> bool {
        self.severities.is_empty() || self.severities.contains(&severity)
    }
}

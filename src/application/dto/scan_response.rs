use super::ReportOptions;
use crate::cloud_scan::domain::Report;

/// ScanResponse - output of the scan use case
///
/// `report` is already narrowed to the requested services and ready to render.
#[derive(Debug, Clone)]
pub struct ScanResponse {
    pub report: Report,
    pub report_options: ReportOptions,
    /// Services served from the cache
    pub cached_services: Vec<String>,
    /// Services scanned in this run
    pub scanned_services: Vec<String>,
    /// Whether the cache entry was rewritten
    pub cache_written: bool,
}

impl ScanResponse {
    /// Whether any failed check is in the rendered report
    pub fn has_failures(&self) -> bool {
        self.report.failed()
    }
}

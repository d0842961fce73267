use crate::application::dto::ReportOptions;
use crate::cloud_scan::domain::Report;
use crate::shared::Result;

/// ReportFormatter port for rendering a report
///
/// Implementations honour the report level and severity filter in `options`.
pub trait ReportFormatter {
    fn format(&self, report: &Report, options: &ReportOptions) -> Result<String>;
}

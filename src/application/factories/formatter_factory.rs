use crate::adapters::outbound::formatters::{JsonFormatter, TableFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ReportFormatter;

/// Factory for creating report formatters
///
/// Maps an [`OutputFormat`] chosen on the command line to the adapter that renders it.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter for `format`
    ///
    /// # Examples
    /// ```
    /// use cloudscan::application::dto::OutputFormat;
    /// use cloudscan::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Json);
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn ReportFormatter> {
        match format {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Table => Box::new(TableFormatter::new()),
        }
    }

    /// Status line shown while the report is rendered
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Generating JSON report...",
            OutputFormat::Table => "📝 Generating table report...",
        }
    }
}

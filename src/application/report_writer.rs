use crate::application::dto::ReportOptions;
use crate::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use crate::cloud_scan::domain::Report;
use crate::ports::outbound::{OutputPresenter, ReportFormatter};
use crate::shared::error::CloudScanError;
use crate::shared::Result;

/// ReportWriter - renders a report and delivers it to its destination
///
/// By default the formatter and presenter are picked from the options
/// (format and output path).
#[derive(Default)]
pub struct ReportWriter {
    formatter: Option<Box<dyn ReportFormatter>>,
    presenter: Option<Box<dyn OutputPresenter>>,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formatter(mut self, formatter: Box<dyn ReportFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn with_presenter(mut self, presenter: Box<dyn OutputPresenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Renders `report` according to `options` and presents it
    ///
    /// # Errors
    /// Any failure is reported as [`CloudScanError::Render`]
    pub fn write(self, report: &Report, options: &ReportOptions) -> Result<()> {
        let formatter = self
            .formatter
            .unwrap_or_else(|| FormatterFactory::create(options.format));
        let presenter = self
            .presenter
            .unwrap_or_else(|| PresenterFactory::create(PresenterType::from(options.output.clone())));

        tracing::debug!("{}", FormatterFactory::progress_message(options.format));
        let content = formatter
            .format(report, options)
            .map_err(|e| Self::render_error(&e))?;

        presenter.present(&content).map_err(|e| {
            if e.downcast_ref::<CloudScanError>().is_some() {
                e
            } else {
                Self::render_error(&e)
            }
        })
    }

    fn render_error(e: &anyhow::Error) -> anyhow::Error {
        CloudScanError::Render {
            details: format!("{:#}", e),
        }
        .into()
    }
}

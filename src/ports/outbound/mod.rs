/// Outbound ports - interfaces the application needs from infrastructure
mod cache_store;
mod identity_resolver;
mod output_presenter;
mod progress_reporter;
mod report_formatter;
mod scan_backend;

pub use cache_store::CacheStore;
pub use identity_resolver::{Identity, IdentityResolver};
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use report_formatter::ReportFormatter;
pub use scan_backend::{ScanBackend, ScanProgressCallback};

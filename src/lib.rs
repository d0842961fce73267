//! cloudscan - incremental cloud account scanner
//!
//! Scans the services of one cloud account/region, reusing per-service results
//! cached by earlier runs and scanning only what is missing. The merged report is
//! written back to the cache and then narrowed to the requested services.
//!
//! # Architecture
//!
//! - **Domain Layer** (`cloud_scan`): reports, scopes, cache reconciliation and composition
//! - **Application Layer** (`application`): the scan use case, DTOs and report writing
//! - **Ports** (`ports`): interfaces the application needs from infrastructure
//! - **Adapters** (`adapters`): filesystem cache, HTTP scanner client, formatters
//! - **Shared** (`shared`): errors, result alias and path security checks
//!
//! # Example
//!
//! ```no_run
//! use cloudscan::prelude::*;
//!
//! # async fn scan() -> Result<()> {
//! let use_case = ScanCloudAccountUseCase::new(
//!     ServiceCatalog::aws_default(),
//!     FileSystemCacheStore::new("/tmp/cloudscan"),
//!     HttpScanBackend::new("http://127.0.0.1:8080")?,
//!     HttpIdentityResolver::new("http://127.0.0.1:8080")?,
//!     StderrProgressReporter::new(),
//! );
//!
//! let request = ScanRequest::builder().services(["ec2", "s3"]).build()?;
//! let response = use_case.execute(request).await?;
//! ReportWriter::new().write(&response.report, &response.report_options)?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cloud_scan;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemCacheStore, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, TableFormatter};
    pub use crate::adapters::outbound::network::{HttpIdentityResolver, HttpScanBackend};
    pub use crate::application::dto::{
        OutputFormat, ReportLevel, ReportOptions, ScanRequest, ScanResponse,
    };
    pub use crate::application::report_writer::ReportWriter;
    pub use crate::application::use_cases::ScanCloudAccountUseCase;
    pub use crate::cloud_scan::domain::{
        CacheKey, Report, ResultStatus, ScanResult, ScanScope, ServiceCatalog, ServiceResults,
        Severity,
    };
    pub use crate::cloud_scan::services::{CacheReconciler, Reconciliation, ReportComposer};
    pub use crate::ports::outbound::{
        CacheStore, Identity, IdentityResolver, OutputPresenter, ProgressReporter,
        ReportFormatter, ScanBackend,
    };
    pub use crate::shared::error::{CloudScanError, ExitCode};
    pub use crate::shared::Result;
}

pub mod cache_key;
pub mod report;
pub mod scan_result;
pub mod scan_scope;
pub mod service_catalog;

pub use cache_key::CacheKey;
pub use report::{Report, ServiceResults};
pub use scan_result::{ResultStatus, ScanResult, Severity};
pub use scan_scope::ScanScope;
pub use service_catalog::ServiceCatalog;

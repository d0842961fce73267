/// Mock implementations for testing
mod mock_cache_store;
mod mock_identity_resolver;
mod mock_progress_reporter;
mod mock_scan_backend;

pub use mock_cache_store::MockCacheStore;
pub use mock_identity_resolver::MockIdentityResolver;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_scan_backend::MockScanBackend;

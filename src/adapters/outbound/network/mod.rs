/// Network adapters talking to the scanner service
mod http_identity_resolver;
mod http_scan_backend;

pub use http_identity_resolver::HttpIdentityResolver;
pub use http_scan_backend::HttpScanBackend;

/// Use cases module containing application business logic orchestration
mod scan_cloud_account;

pub use scan_cloud_account::{ScanCloudAccountUseCase, DEFAULT_PROVIDER};

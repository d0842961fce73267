use crate::cloud_scan::domain::ScanResult;
use crate::shared::Result;
use async_trait::async_trait;

/// Progress callback: (services completed, services requested)
pub type ScanProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// ScanBackend port for enumerating and evaluating cloud resources
///
/// # Async Support
/// Implementations may query services concurrently; callers see a single
/// call that either returns every result or fails.
#[async_trait]
pub trait ScanBackend: Send + Sync {
    /// Scans the given services of one account/region
    ///
    /// # Errors
    /// Returns an error if any service could not be scanned. Partial results
    /// are never returned.
    async fn scan(
        &self,
        account_id: &str,
        region: &str,
        services: &[String],
    ) -> Result<Vec<ScanResult>>;

    /// Scans with progress reporting
    ///
    /// The default implementation reports only completion.
    async fn scan_with_progress(
        &self,
        account_id: &str,
        region: &str,
        services: &[String],
        progress: ScanProgressCallback,
    ) -> Result<Vec<ScanResult>> {
        let results = self.scan(account_id, region, services).await?;
        progress(services.len(), services.len());
        Ok(results)
    }
}

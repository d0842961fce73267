use crate::application::cache_writer::CacheWriter;
use crate::application::dto::{ReportOptions, ScanRequest, ScanResponse};
use crate::cloud_scan::domain::{CacheKey, Report, ScanResult, ScanScope, ServiceCatalog};
use crate::cloud_scan::services::{CacheReconciler, ReportComposer};
use crate::ports::outbound::{CacheStore, Identity, IdentityResolver, ProgressReporter, ScanBackend};
use crate::shared::error::CloudScanError;
use crate::shared::Result;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Provider name used for cache keys and error messages
pub const DEFAULT_PROVIDER: &str = "aws";

/// ScanCloudAccountUseCase - scans one account/region, reusing cached results
///
/// The flow is strictly sequential:
/// options → scope → identity → cache load → reconcile → scan (only if needed)
/// → compose → merge cache → persist full report → narrow.
///
/// # Type Parameters
/// * `CS` - CacheStore implementation
/// * `SB` - ScanBackend implementation
/// * `IR` - IdentityResolver implementation
/// * `PR` - ProgressReporter implementation
pub struct ScanCloudAccountUseCase<CS, SB, IR, PR> {
    catalog: ServiceCatalog,
    cache_store: CS,
    scan_backend: SB,
    identity_resolver: IR,
    progress_reporter: PR,
    provider: String,
}

impl<CS, SB, IR, PR> ScanCloudAccountUseCase<CS, SB, IR, PR>
where
    CS: CacheStore,
    SB: ScanBackend,
    IR: IdentityResolver,
    PR: ProgressReporter,
{
    /// Creates a new ScanCloudAccountUseCase with injected dependencies
    pub fn new(
        catalog: ServiceCatalog,
        cache_store: CS,
        scan_backend: SB,
        identity_resolver: IR,
        progress_reporter: PR,
    ) -> Self {
        Self {
            catalog,
            cache_store,
            scan_backend,
            identity_resolver,
            progress_reporter,
            provider: DEFAULT_PROVIDER.to_string(),
        }
    }

    /// Overrides the provider name used in cache keys and scan errors
    ///
    /// Set from the `provider` config field; defaults to [`DEFAULT_PROVIDER`].
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Executes the scan under the request's deadline
    ///
    /// # Errors
    /// Fails fast on the first failing step; no partial report is returned.
    /// Running out of time yields [`CloudScanError::DeadlineExceeded`].
    pub async fn execute(&self, request: ScanRequest) -> Result<ScanResponse> {
        let timeout = request.timeout;
        match tokio::time::timeout(timeout, self.run(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("Increase --timeout value");
                self.progress_reporter
                    .report_error(&format!("⚠️  Scan timed out after {}s", timeout.as_secs()));
                Err(CloudScanError::DeadlineExceeded { timeout }.into())
            }
        }
    }

    async fn run(&self, request: ScanRequest) -> Result<ScanResponse> {
        // Step 1: Presentation options (contradictory filters fail before any work)
        let selected = ScanScope::new(request.services.iter().cloned());
        let mut report_options = ReportOptions::new(
            request.format,
            request.output.clone(),
            request.severities.clone(),
            &selected,
            request.arn.clone(),
        )?;

        // Step 2: Scope
        let scope = self.catalog.resolve_scope(&request.services)?;

        // Step 3: Identity
        let identity = self.resolve_identity(&request).await?;
        let key = CacheKey::new(&self.provider, &identity.account_id, &identity.region)?;

        // Step 4: Cache
        let cached = self.load_cache(&key, &request)?;

        // Step 5: Reconcile
        let reconciliation = CacheReconciler::reconcile(&scope, cached.as_ref());

        // Step 6: Scan what is missing
        let fresh = if reconciliation.is_fully_cached() {
            tracing::debug!("No more services to scan - everything was found in the cache.");
            self.progress_reporter.report(&format!(
                "♻️  All {} service(s) found in cache",
                scope.len()
            ));
            None
        } else {
            Some(
                self.scan_remaining(&identity, &reconciliation.remaining)
                    .await?,
            )
        };

        // Step 7: Compose and merge
        let mut report = ReportComposer::compose(
            fresh,
            &reconciliation.remaining,
            &identity.account_id,
            &identity.region,
            &scope,
            Utc::now(),
        )?;
        if let Some(cached) = cached {
            report_options.from_cache = !reconciliation.cached.is_empty();
            Self::merge_cached(&mut report, cached);
        }

        // Step 8: Persist the full report, then narrow to the requested scope
        let did_scan = !reconciliation.is_fully_cached();
        let (report, cache_written) = CacheWriter::new(&self.cache_store).persist_then_narrow(
            &key,
            report,
            did_scan,
            &scope,
        )?;

        self.progress_reporter.report_completion(&format!(
            "✅ Scan complete: {} service(s) scanned, {} from cache",
            reconciliation.remaining.len(),
            reconciliation.cached.len()
        ));

        Ok(ScanResponse {
            report,
            report_options,
            cached_services: reconciliation.cached,
            scanned_services: reconciliation.remaining,
            cache_written,
        })
    }

    /// Uses the explicit account and region, or asks the identity resolver
    async fn resolve_identity(&self, request: &ScanRequest) -> Result<Identity> {
        if let (Some(account_id), Some(region)) = (&request.account_id, &request.region) {
            return Ok(Identity {
                account_id: account_id.clone(),
                region: region.clone(),
            });
        }

        tracing::debug!("Looking up cloud caller identity...");
        let resolved = self
            .identity_resolver
            .resolve(request.region.as_deref())
            .await
            .map_err(|e| CloudScanError::IdentityResolution {
                details: format!("{:#}", e),
            })?;

        // A requested region always wins over the resolver's answer
        let region = match &request.region {
            Some(region) => {
                if *region != resolved.region {
                    tracing::debug!(
                        "Resolver answered region {}, keeping requested region {}",
                        resolved.region,
                        region
                    );
                }
                region.clone()
            }
            None => resolved.region,
        };
        let identity = Identity {
            account_id: resolved.account_id,
            region,
        };
        tracing::debug!(
            "Verified credentials for account {} in {}",
            identity.account_id,
            identity.region
        );
        Ok(identity)
    }

    /// Loads the cached report unless a cache refresh was requested,
    /// expiring services older than the configured maximum age
    fn load_cache(&self, key: &CacheKey, request: &ScanRequest) -> Result<Option<Report>> {
        if request.update_cache {
            tracing::debug!("Cache update requested, ignoring cached results.");
            return Ok(None);
        }

        tracing::debug!("Attempting to load results from cache ({})...", key);
        let Some(mut cached) = self.cache_store.load(key)? else {
            tracing::debug!("Cached results not found.");
            return Ok(None);
        };

        let cutoff = request
            .max_cache_age
            .and_then(|max_age| chrono::Duration::from_std(max_age).ok())
            .and_then(|max_age| Utc::now().checked_sub_signed(max_age));
        if let Some(cutoff) = cutoff {
            let expired = cached.expire_older_than(cutoff);
            if !expired.is_empty() {
                self.progress_reporter.report(&format!(
                    "⌛ Cached results expired for: {}",
                    expired.join(", ")
                ));
            }
        }

        Ok(Some(cached))
    }

    /// Imports every service the cache covers, so the rewritten cache keeps
    /// services that were not requested this time
    fn merge_cached(report: &mut Report, cached: Report) {
        tracing::debug!("Merging cached results...");
        let services = cached.services_in_scope().to_vec();
        report.merge_from(cached, &services);
    }

    /// Calls the scan backend for `services` while showing a progress bar
    async fn scan_remaining(
        &self,
        identity: &Identity,
        services: &[String],
    ) -> Result<Vec<ScanResult>> {
        tracing::debug!(
            "Scanning the following services using the {} API: [{}]...",
            self.provider,
            services.join(", ")
        );
        self.progress_reporter.report(&format!(
            "🔍 Scanning {} service(s) in {} ({})...",
            services.len(),
            identity.account_id,
            identity.region
        ));

        // Create atomic counters for thread-safe progress sharing
        let progress_current = Arc::new(AtomicUsize::new(0));
        let progress_total = Arc::new(AtomicUsize::new(services.len()));
        let is_done = Arc::new(AtomicBool::new(false));

        let current_clone = progress_current.clone();
        let total_clone = progress_total.clone();
        let done_clone = is_done.clone();
        // Stops the bar even if the deadline drops this future mid-scan
        let done_guard = DoneOnDrop(is_done);

        let progress_handle = thread::spawn(move || {
            let pb = ProgressBar::new(total_clone.load(Ordering::Relaxed) as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} - {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            pb.set_message("Scanning services...");

            while !done_clone.load(Ordering::Relaxed) {
                pb.set_length(total_clone.load(Ordering::Relaxed) as u64);
                pb.set_position(current_clone.load(Ordering::Relaxed) as u64);
                thread::sleep(Duration::from_millis(50));
            }

            pb.finish_and_clear();
        });

        let callback_total = progress_total.clone();
        let progress_callback = Box::new(move |current: usize, total: usize| {
            progress_current.store(current, Ordering::Relaxed);
            callback_total.store(total, Ordering::Relaxed);
        });

        let result = self
            .scan_backend
            .scan_with_progress(
                &identity.account_id,
                &identity.region,
                services,
                progress_callback,
            )
            .await;

        drop(done_guard);
        match tokio::task::spawn_blocking(move || progress_handle.join()).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => tracing::warn!("Progress bar thread panicked"),
            Err(e) => tracing::warn!("Failed to join progress bar thread: {}", e),
        }

        result.map_err(|e| {
            self.progress_reporter.report_error(&format!(
                "⚠️  Scanning {} ({}) failed",
                identity.account_id, identity.region
            ));
            CloudScanError::ScanBackend {
                provider: self.provider.clone(),
                details: format!("{:#}", e),
            }
            .into()
        })
    }
}

/// Sets the flag when dropped
struct DoneOnDrop(Arc<AtomicBool>);

impl Drop for DoneOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests;

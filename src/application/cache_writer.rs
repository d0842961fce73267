use crate::cloud_scan::domain::{CacheKey, Report, ScanScope};
use crate::ports::outbound::CacheStore;
use crate::shared::Result;

/// CacheWriter - persists the merged report when this run scanned something
///
/// The cache must always receive the full-scope report. Narrowing to what the
/// user asked to see happens afterwards, which is why both steps live in
/// [`CacheWriter::persist_then_narrow`].
pub struct CacheWriter<'a, CS> {
    store: &'a CS,
}

impl<'a, CS: CacheStore> CacheWriter<'a, CS> {
    pub fn new(store: &'a CS) -> Self {
        Self { store }
    }

    /// Saves `report` only if `did_scan`; returns whether a save happened
    pub fn write_if_needed(&self, key: &CacheKey, report: &Report, did_scan: bool) -> Result<bool> {
        if !did_scan {
            tracing::debug!("Nothing new was scanned, leaving the cache untouched.");
            return Ok(false);
        }

        tracing::debug!(
            "Writing results to cache for services [{}]...",
            report.services_in_scope().join(", ")
        );
        self.store.save(key, report)?;
        Ok(true)
    }

    /// Persists the full report if needed, then returns the view restricted to `final_scope`
    pub fn persist_then_narrow(
        &self,
        key: &CacheKey,
        report: Report,
        did_scan: bool,
        final_scope: &ScanScope,
    ) -> Result<(Report, bool)> {
        let written = self.write_if_needed(key, &report, did_scan)?;
        Ok((report.narrow(final_scope), written))
    }
}

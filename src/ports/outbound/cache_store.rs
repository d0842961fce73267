use crate::cloud_scan::domain::{CacheKey, Report};
use crate::shared::Result;

/// CacheStore port for persisting reports between runs
///
/// One report per key. A save replaces whatever was stored before.
pub trait CacheStore {
    /// Loads the cached report for `key`
    ///
    /// # Returns
    /// `Ok(None)` when nothing usable is cached (missing or unreadable entry)
    ///
    /// # Errors
    /// Returns an error for any other storage failure; callers must not
    /// fall back to a full scan in that case
    fn load(&self, key: &CacheKey) -> Result<Option<Report>>;

    /// Saves `report` under `key`
    ///
    /// A failed save must leave either the previous entry or nothing readable,
    /// never a partially written report.
    fn save(&self, key: &CacheKey, report: &Report) -> Result<()>;
}

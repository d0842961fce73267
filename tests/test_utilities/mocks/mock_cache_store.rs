use cloudscan::prelude::*;
use std::sync::{Arc, Mutex};

/// In-memory CacheStore keyed by `CacheKey`
///
/// Clones share state, so a test can keep a handle after moving one into the use case.
#[derive(Default, Clone)]
pub struct MockCacheStore {
    entries: Arc<Mutex<Vec<(CacheKey, Report)>>>,
    saves: Arc<Mutex<usize>>,
    fail_load: bool,
}

impl MockCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: CacheKey, report: Report) -> Self {
        self.entries.lock().unwrap().push((key, report));
        self
    }

    pub fn with_load_failure() -> Self {
        Self {
            fail_load: true,
            ..Default::default()
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Report> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, r)| r.clone())
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl CacheStore for MockCacheStore {
    fn load(&self, key: &CacheKey) -> Result<Option<Report>> {
        if self.fail_load {
            anyhow::bail!("Mock cache store failure");
        }
        Ok(self.get(key))
    }

    fn save(&self, key: &CacheKey, report: &Report) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|(k, _)| k != key);
        entries.push((key.clone(), report.clone()));
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

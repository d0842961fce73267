use crate::cloud_scan::domain::{Report, ScanScope};
use std::collections::HashSet;

/// Outcome of comparing a requested scope with a cached report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciliation {
    /// Services the cache already covers, in scope order
    pub cached: Vec<String>,
    /// Services that must be scanned, in scope order
    pub remaining: Vec<String>,
}

impl Reconciliation {
    /// Nothing left to scan; the backend must not be called
    pub fn is_fully_cached(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// CacheReconciler - splits a scope into cached and remaining services
pub struct CacheReconciler;

impl CacheReconciler {
    pub fn reconcile(scope: &ScanScope, cached: Option<&Report>) -> Reconciliation {
        let Some(cached) = cached else {
            return Reconciliation {
                cached: Vec::new(),
                remaining: scope.services().to_vec(),
            };
        };

        let in_cache: HashSet<&str> = cached
            .services_in_scope()
            .iter()
            .map(String::as_str)
            .collect();

        let (hits, misses): (Vec<String>, Vec<String>) = scope
            .services()
            .iter()
            .cloned()
            .partition(|service| in_cache.contains(service.as_str()));

        for service in &hits {
            tracing::debug!("Results for service '{}' found in cache.", service);
        }

        Reconciliation {
            cached: hits,
            remaining: misses,
        }
    }
}

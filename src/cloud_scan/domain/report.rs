use super::{ScanResult, ScanScope};
use crate::shared::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Results for one service: resource identifier -> evaluated checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResults {
    /// When this service was scanned
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub resources: BTreeMap<String, Vec<ScanResult>>,
}

impl ServiceResults {
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            updated_at,
            resources: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, result: ScanResult) {
        self.resources
            .entry(result.resource.clone())
            .or_default()
            .push(result);
    }

    pub fn results(&self) -> impl Iterator<Item = &ScanResult> {
        self.resources.values().flatten()
    }

    pub fn result_count(&self) -> usize {
        self.resources.values().map(Vec::len).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.results().filter(|r| r.is_failed()).count()
    }
}

/// Report - scan results for one account/region
///
/// This is both what gets rendered and what gets cached.
///
/// Invariant: every key of `results` is listed in `services_in_scope`.
/// A service may be in scope without an entry (nothing found).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    account_id: String,
    region: String,
    services_in_scope: Vec<String>,
    #[serde(default)]
    results: BTreeMap<String, ServiceResults>,
}

impl Report {
    /// Creates an empty report claiming coverage of `scope`
    pub fn new(account_id: impl Into<String>, region: impl Into<String>, scope: &ScanScope) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
            services_in_scope: scope.services().to_vec(),
            results: BTreeMap::new(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn services_in_scope(&self) -> &[String] {
        &self.services_in_scope
    }

    pub fn results(&self) -> &BTreeMap<String, ServiceResults> {
        &self.results
    }

    pub fn service_results(&self, service: &str) -> Option<&ServiceResults> {
        self.results.get(service)
    }

    pub fn covers(&self, service: &str) -> bool {
        self.services_in_scope.iter().any(|s| s == service)
    }

    /// Stores the results slot for an in-scope service
    ///
    /// # Errors
    /// Returns an error if the service is not in scope
    pub fn insert_service_results(&mut self, service: &str, results: ServiceResults) -> Result<()> {
        if !self.covers(service) {
            anyhow::bail!(
                "Service '{}' is not in the report scope [{}]",
                service,
                self.services_in_scope.join(", ")
            );
        }
        self.results.insert(service.to_string(), results);
        Ok(())
    }

    /// Whether any contained check failed
    pub fn failed(&self) -> bool {
        self.results
            .values()
            .any(|service| service.results().any(ScanResult::is_failed))
    }

    /// Moves the listed services' results out of `cached` into this report
    ///
    /// An existing entry for the same service is replaced. Each imported service is
    /// added to the scope if absent, including services the cached report covered
    /// without any results.
    pub fn merge_from(&mut self, mut cached: Report, services_to_import: &[String]) {
        for service in services_to_import {
            if !self.covers(service) {
                self.services_in_scope.push(service.clone());
            }
            match cached.results.remove(service) {
                Some(results) => {
                    self.results.insert(service.clone(), results);
                }
                None => {
                    self.results.remove(service);
                }
            }
        }
    }

    /// Restricts the report to exactly the services of `final_scope`
    ///
    /// Services of `final_scope` that this report does not cover are not added.
    pub fn narrow(mut self, final_scope: &ScanScope) -> Report {
        let keep = final_scope.as_set();
        self.services_in_scope.retain(|s| keep.contains(s.as_str()));
        self.results.retain(|service, _| keep.contains(service.as_str()));
        self
    }

    /// Drops services scanned before `cutoff` from scope and results,
    /// returning the expired service names in scope order
    pub fn expire_older_than(&mut self, cutoff: DateTime<Utc>) -> Vec<String> {
        let expired: Vec<String> = self
            .results
            .iter()
            .filter(|(_, results)| results.updated_at < cutoff)
            .map(|(service, _)| service.clone())
            .collect();
        if expired.is_empty() {
            return expired;
        }

        let expired_set: HashSet<&str> = expired.iter().map(String::as_str).collect();
        let ordered: Vec<String> = self
            .services_in_scope
            .iter()
            .filter(|s| expired_set.contains(s.as_str()))
            .cloned()
            .collect();
        self.services_in_scope
            .retain(|s| !expired_set.contains(s.as_str()));
        self.results
            .retain(|service, _| !expired_set.contains(service.as_str()));
        ordered
    }

    /// Checks the scope/results invariant and that the scope has no duplicates
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for service in &self.services_in_scope {
            if !seen.insert(service.as_str()) {
                anyhow::bail!("Service '{}' is listed twice in the report scope", service);
            }
        }
        if let Some(orphan) = self.results.keys().find(|s| !seen.contains(s.as_str())) {
            anyhow::bail!(
                "Report contains results for '{}' which is not in its scope",
                orphan
            );
        }
        Ok(())
    }
}

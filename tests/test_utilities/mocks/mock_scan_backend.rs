use async_trait::async_trait;
use cloudscan::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock ScanBackend returning canned results and recording every call
#[derive(Default, Clone)]
pub struct MockScanBackend {
    results: HashMap<String, Vec<ScanResult>>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    should_fail: bool,
}

impl MockScanBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a failed check of `severity` for `resource` in `service`
    pub fn with_finding(mut self, service: &str, resource: &str, severity: Severity) -> Self {
        self.results
            .entry(service.to_string())
            .or_default()
            .push(ScanResult::new(
                service,
                resource,
                format!("{}-001", service.to_uppercase()),
                severity,
                ResultStatus::Failed,
            ));
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScanBackend for MockScanBackend {
    async fn scan(
        &self,
        _account_id: &str,
        _region: &str,
        services: &[String],
    ) -> Result<Vec<ScanResult>> {
        self.calls.lock().unwrap().push(services.to_vec());
        if self.should_fail {
            anyhow::bail!("Mock scan backend failure");
        }
        Ok(services
            .iter()
            .filter_map(|s| self.results.get(s))
            .flatten()
            .cloned()
            .collect())
    }
}

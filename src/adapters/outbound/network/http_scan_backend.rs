use crate::cloud_scan::domain::ScanResult;
use crate::ports::outbound::{ScanBackend, ScanProgressCallback};
use crate::shared::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Response body of the per-service results endpoint
#[derive(Debug, Deserialize)]
struct ServiceResultsResponse {
    #[serde(default)]
    results: Vec<ScanResult>,
}

/// HttpScanBackend adapter querying a scanner service over HTTP
///
/// Each service is fetched from
/// `GET {base}/v1/accounts/{account}/regions/{region}/services/{service}/results`.
/// Services are requested concurrently; the first failure aborts the whole scan.
pub struct HttpScanBackend {
    client: reqwest::Client,
    base_url: String,
    max_concurrent: usize,
}

impl HttpScanBackend {
    const TIMEOUT_SECONDS: u64 = 120;
    const MAX_CONCURRENT: usize = 4;

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let user_agent = format!("cloudscan/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_concurrent: Self::MAX_CONCURRENT,
        })
    }

    /// Limits how many services are queried at once
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    fn results_url(&self, account_id: &str, region: &str, service: &str) -> String {
        format!(
            "{}/v1/accounts/{}/regions/{}/services/{}/results",
            self.base_url,
            urlencoding::encode(account_id),
            urlencoding::encode(region),
            urlencoding::encode(service)
        )
    }

    async fn fetch_service(
        &self,
        account_id: &str,
        region: &str,
        service: &str,
    ) -> Result<Vec<ScanResult>> {
        let url = self.results_url(account_id, region, service);
        tracing::debug!("Fetching results for service '{}' from {}", service, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("failed to scan service '{}': {}", service, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "scanner returned status code {} for service '{}'{}",
                status,
                service,
                if body.trim().is_empty() {
                    String::new()
                } else {
                    format!(": {}", body.trim())
                }
            );
        }

        let body: ServiceResultsResponse = response.json().await.map_err(|e| {
            anyhow::anyhow!("invalid response for service '{}': {}", service, e)
        })?;
        tracing::debug!(
            "Service '{}' returned {} result(s)",
            service,
            body.results.len()
        );
        Ok(body.results)
    }

    async fn scan_services(
        &self,
        account_id: &str,
        region: &str,
        services: &[String],
        progress: Option<&ScanProgressCallback>,
    ) -> Result<Vec<ScanResult>> {
        let total = services.len();
        let completed = AtomicUsize::new(0);

        let per_service: Vec<Vec<ScanResult>> = stream::iter(services.iter().cloned())
            .map(|service| {
                let completed = &completed;
                async move {
                    let results = self.fetch_service(account_id, region, &service).await?;
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(progress) = progress {
                        progress(done, total);
                    }
                    Ok::<_, anyhow::Error>(results)
                }
            })
            .buffer_unordered(self.max_concurrent)
            .try_collect()
            .await?;

        Ok(per_service.into_iter().flatten().collect())
    }
}

#[async_trait]
impl ScanBackend for HttpScanBackend {
    async fn scan(
        &self,
        account_id: &str,
        region: &str,
        services: &[String],
    ) -> Result<Vec<ScanResult>> {
        self.scan_services(account_id, region, services, None).await
    }

    async fn scan_with_progress(
        &self,
        account_id: &str,
        region: &str,
        services: &[String],
        progress: ScanProgressCallback,
    ) -> Result<Vec<ScanResult>> {
        self.scan_services(account_id, region, services, Some(&progress))
            .await
    }
}

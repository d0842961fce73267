use super::*;
use crate::application::dto::ReportLevel;
use crate::cloud_scan::domain::{ResultStatus, ServiceResults, Severity};
use std::sync::Mutex;

// Mock implementations for testing
#[derive(Default)]
struct MockCacheStore {
    stored: Mutex<Option<Report>>,
    saves: Mutex<Vec<Report>>,
    load_error: bool,
}

impl MockCacheStore {
    fn with_report(report: Report) -> Self {
        Self {
            stored: Mutex::new(Some(report)),
            ..Default::default()
        }
    }

    fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    fn last_saved(&self) -> Option<Report> {
        self.saves.lock().unwrap().last().cloned()
    }
}

impl CacheStore for MockCacheStore {
    fn load(&self, _key: &CacheKey) -> Result<Option<Report>> {
        if self.load_error {
            anyhow::bail!("cache volume unreadable");
        }
        Ok(self.stored.lock().unwrap().clone())
    }

    fn save(&self, _key: &CacheKey, report: &Report) -> Result<()> {
        *self.stored.lock().unwrap() = Some(report.clone());
        self.saves.lock().unwrap().push(report.clone());
        Ok(())
    }
}

#[derive(Default)]
struct MockScanBackend {
    calls: Mutex<Vec<Vec<String>>>,
    fail: bool,
    delay: Option<Duration>,
}

impl MockScanBackend {
    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ScanBackend for MockScanBackend {
    async fn scan(
        &self,
        _account_id: &str,
        _region: &str,
        services: &[String],
    ) -> Result<Vec<ScanResult>> {
        self.calls.lock().unwrap().push(services.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            anyhow::bail!("AccessDenied: not authorized to perform ec2:DescribeInstances");
        }
        Ok(services
            .iter()
            .map(|service| {
                ScanResult::new(
                    service.as_str(),
                    format!("arn:aws:{}:::fresh", service),
                    "FRESH-1",
                    Severity::High,
                    ResultStatus::Failed,
                )
            })
            .collect())
    }
}

#[derive(Default)]
struct MockIdentityResolver {
    calls: Mutex<Vec<Option<String>>>,
    fail: bool,
    /// Region answered regardless of the requested override
    fixed_region: Option<String>,
}

#[async_trait::async_trait]
impl IdentityResolver for MockIdentityResolver {
    async fn resolve(&self, region: Option<&str>) -> Result<Identity> {
        self.calls.lock().unwrap().push(region.map(String::from));
        if self.fail {
            anyhow::bail!("no credentials found");
        }
        Ok(Identity {
            account_id: "999999999999".to_string(),
            region: self
                .fixed_region
                .as_deref()
                .or(region)
                .unwrap_or("eu-west-1")
                .to_string(),
        })
    }
}

#[derive(Default)]
struct MockProgressReporter {
    errors: Mutex<Vec<String>>,
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, _message: &str) {}
    fn report_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
    fn report_completion(&self, _message: &str) {}
}

type TestUseCase =
    ScanCloudAccountUseCase<MockCacheStore, MockScanBackend, MockIdentityResolver, MockProgressReporter>;

fn catalog() -> ServiceCatalog {
    ServiceCatalog::new(vec!["ec2".into(), "s3".into(), "rds".into()]).unwrap()
}

fn use_case(cache: MockCacheStore, backend: MockScanBackend) -> TestUseCase {
    ScanCloudAccountUseCase::new(
        catalog(),
        cache,
        backend,
        MockIdentityResolver::default(),
        MockProgressReporter::default(),
    )
}

/// A cached report for account 123 / us-east-1 with one result per listed service
fn cached_report(scope: &[&str], with_data: &[&str]) -> Report {
    let mut report = Report::new("123", "us-east-1", &ScanScope::new(scope.iter().copied()));
    for service in with_data {
        let mut slot = ServiceResults::new(Utc::now());
        slot.push(ScanResult::new(
            *service,
            format!("arn:aws:{}:::cached", service),
            "CACHED-1",
            Severity::Medium,
            ResultStatus::Failed,
        ));
        report.insert_service_results(service, slot).unwrap();
    }
    report
}

fn request(services: &[&str]) -> ScanRequest {
    ScanRequest::builder()
        .services(services.iter().copied())
        .account_id("123")
        .region("us-east-1")
        .build()
        .unwrap()
}

fn resource_ids(report: &Report, service: &str) -> Vec<String> {
    report
        .service_results(service)
        .map(|s| s.resources.keys().cloned().collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_empty_cache_scans_everything_and_writes_cache() {
    let uc = use_case(MockCacheStore::default(), MockScanBackend::default());

    let response = uc.execute(request(&["ec2", "s3"])).await.unwrap();

    assert_eq!(uc.scan_backend.calls(), vec![vec!["ec2", "s3"]]);
    assert_eq!(response.scanned_services, vec!["ec2", "s3"]);
    assert!(response.cached_services.is_empty());
    assert!(response.cache_written);
    assert!(!response.report_options.from_cache);

    let saved = uc.cache_store.last_saved().unwrap();
    assert_eq!(saved.services_in_scope(), &["ec2", "s3"]);
    assert!(saved.service_results("ec2").is_some());
    assert!(saved.service_results("s3").is_some());
}

#[tokio::test]
async fn test_partial_cache_scans_only_missing_services() {
    let cache = MockCacheStore::with_report(cached_report(&["ec2"], &["ec2"]));
    let uc = use_case(cache, MockScanBackend::default());

    let response = uc.execute(request(&["ec2", "s3"])).await.unwrap();

    assert_eq!(uc.scan_backend.calls(), vec![vec!["s3"]]);
    assert_eq!(response.cached_services, vec!["ec2"]);
    assert_eq!(response.scanned_services, vec!["s3"]);
    assert!(response.report_options.from_cache);

    let report = &response.report;
    assert_eq!(report.services_in_scope(), &["ec2", "s3"]);
    assert_eq!(resource_ids(report, "ec2"), vec!["arn:aws:ec2:::cached"]);
    assert_eq!(resource_ids(report, "s3"), vec!["arn:aws:s3:::fresh"]);

    let saved = uc.cache_store.last_saved().unwrap();
    assert_eq!(resource_ids(&saved, "ec2"), vec!["arn:aws:ec2:::cached"]);
    assert_eq!(resource_ids(&saved, "s3"), vec!["arn:aws:s3:::fresh"]);
}

#[tokio::test]
async fn test_fully_cached_skips_backend_and_cache_write() {
    let cache = MockCacheStore::with_report(cached_report(&["ec2", "s3", "rds"], &["ec2", "rds"]));
    let uc = use_case(cache, MockScanBackend::default());

    let response = uc.execute(request(&["ec2"])).await.unwrap();

    assert!(uc.scan_backend.calls().is_empty());
    assert_eq!(uc.cache_store.save_count(), 0);
    assert!(!response.cache_written);
    assert!(response.scanned_services.is_empty());
    assert_eq!(response.report.services_in_scope(), &["ec2"]);
    assert_eq!(
        resource_ids(&response.report, "ec2"),
        vec!["arn:aws:ec2:::cached"]
    );
    assert!(response.report.service_results("rds").is_none());
}

#[tokio::test]
async fn test_arn_with_two_services_is_configuration_error_before_scanning() {
    let uc = use_case(MockCacheStore::default(), MockScanBackend::default());
    let request = ScanRequest::builder()
        .services(["ec2", "s3"])
        .arn("arn:aws:s3:::logs")
        .build()
        .unwrap();

    let err = uc.execute(request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CloudScanError>(),
        Some(CloudScanError::Configuration { .. })
    ));
    assert!(uc.scan_backend.calls().is_empty());
    assert!(uc.identity_resolver.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unsupported_service_fails_before_identity_and_cache() {
    let cache = MockCacheStore {
        load_error: true,
        ..Default::default()
    };
    let uc = use_case(cache, MockScanBackend::default());
    let request = ScanRequest::builder()
        .services(["lambda"])
        .build()
        .unwrap();

    let err = uc.execute(request).await.unwrap_err();

    match err.downcast_ref::<CloudScanError>() {
        Some(CloudScanError::UnsupportedService { service, supported }) => {
            assert_eq!(service, "lambda");
            assert_eq!(supported.len(), 3);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(uc.identity_resolver.calls.lock().unwrap().is_empty());
    assert!(uc.scan_backend.calls().is_empty());
}

#[tokio::test]
async fn test_single_service_escalates_report_level() {
    let uc = use_case(MockCacheStore::default(), MockScanBackend::default());
    let request = ScanRequest::builder()
        .services(["s3"])
        .arn("arn:aws:s3:::fresh")
        .account_id("123")
        .region("us-east-1")
        .build()
        .unwrap();

    let response = uc.execute(request).await.unwrap();

    assert_eq!(response.report_options.level, ReportLevel::Result);
    assert_eq!(response.report_options.service.as_deref(), Some("s3"));
}

#[tokio::test]
async fn test_cache_keeps_unrequested_cached_services() {
    let cache = MockCacheStore::with_report(cached_report(&["ec2", "rds"], &["ec2", "rds"]));
    let uc = use_case(cache, MockScanBackend::default());

    let response = uc.execute(request(&["s3"])).await.unwrap();

    // Presented view contains only what was asked for
    assert_eq!(response.report.services_in_scope(), &["s3"]);
    assert!(response.report.service_results("rds").is_none());

    // Cache holds the full merged report
    let saved = uc.cache_store.last_saved().unwrap();
    assert_eq!(saved.services_in_scope(), &["s3", "ec2", "rds"]);
    assert_eq!(resource_ids(&saved, "rds"), vec!["arn:aws:rds:::cached"]);
}

#[tokio::test]
async fn test_default_scope_is_whole_catalog() {
    let uc = use_case(MockCacheStore::default(), MockScanBackend::default());

    let response = uc.execute(request(&[])).await.unwrap();

    assert_eq!(uc.scan_backend.calls(), vec![vec!["ec2", "s3", "rds"]]);
    assert_eq!(response.report.services_in_scope(), &["ec2", "s3", "rds"]);
    assert_eq!(response.report_options.level, ReportLevel::Service);
}

#[tokio::test]
async fn test_update_cache_ignores_cached_results() {
    let cache = MockCacheStore::with_report(cached_report(&["ec2"], &["ec2"]));
    let uc = use_case(cache, MockScanBackend::default());
    let request = ScanRequest::builder()
        .services(["ec2"])
        .account_id("123")
        .region("us-east-1")
        .update_cache(true)
        .build()
        .unwrap();

    let response = uc.execute(request).await.unwrap();

    assert_eq!(uc.scan_backend.calls(), vec![vec!["ec2"]]);
    assert_eq!(resource_ids(&response.report, "ec2"), vec!["arn:aws:ec2:::fresh"]);
    assert!(response.cache_written);
}

#[tokio::test]
async fn test_max_cache_age_rescans_stale_services() {
    let mut cached = cached_report(&["ec2", "s3"], &["s3"]);
    let mut stale = ServiceResults::new(Utc::now() - chrono::Duration::hours(3));
    stale.push(ScanResult::new(
        "ec2",
        "arn:aws:ec2:::stale",
        "CACHED-1",
        Severity::Low,
        ResultStatus::Failed,
    ));
    cached.insert_service_results("ec2", stale).unwrap();
    let uc = use_case(MockCacheStore::with_report(cached), MockScanBackend::default());
    let request = ScanRequest::builder()
        .services(["ec2", "s3"])
        .account_id("123")
        .region("us-east-1")
        .max_cache_age(Duration::from_secs(3600))
        .build()
        .unwrap();

    let response = uc.execute(request).await.unwrap();

    assert_eq!(uc.scan_backend.calls(), vec![vec!["ec2"]]);
    assert_eq!(response.cached_services, vec!["s3"]);
    assert_eq!(resource_ids(&response.report, "ec2"), vec!["arn:aws:ec2:::fresh"]);
    assert_eq!(resource_ids(&response.report, "s3"), vec!["arn:aws:s3:::cached"]);
}

#[tokio::test]
async fn test_identity_resolved_when_account_or_region_missing() {
    let uc = use_case(MockCacheStore::default(), MockScanBackend::default());
    let request = ScanRequest::builder()
        .services(["ec2"])
        .region("ap-south-1")
        .build()
        .unwrap();

    let response = uc.execute(request).await.unwrap();

    assert_eq!(
        *uc.identity_resolver.calls.lock().unwrap(),
        vec![Some("ap-south-1".to_string())]
    );
    assert_eq!(response.report.account_id(), "999999999999");
    assert_eq!(response.report.region(), "ap-south-1");
}

#[tokio::test]
async fn test_requested_region_wins_over_resolver_region() {
    let uc = ScanCloudAccountUseCase::new(
        catalog(),
        MockCacheStore::default(),
        MockScanBackend::default(),
        MockIdentityResolver {
            fixed_region: Some("us-east-1".to_string()),
            ..Default::default()
        },
        MockProgressReporter::default(),
    );
    let request = ScanRequest::builder()
        .services(["ec2"])
        .region("eu-west-1")
        .build()
        .unwrap();

    let response = uc.execute(request).await.unwrap();

    assert_eq!(response.report.account_id(), "999999999999");
    assert_eq!(response.report.region(), "eu-west-1");
    assert_eq!(uc.cache_store.last_saved().unwrap().region(), "eu-west-1");
}

#[tokio::test]
async fn test_resolver_region_used_without_override() {
    let uc = ScanCloudAccountUseCase::new(
        catalog(),
        MockCacheStore::default(),
        MockScanBackend::default(),
        MockIdentityResolver {
            fixed_region: Some("us-east-1".to_string()),
            ..Default::default()
        },
        MockProgressReporter::default(),
    );
    let request = ScanRequest::builder().services(["ec2"]).build().unwrap();

    let response = uc.execute(request).await.unwrap();

    assert_eq!(response.report.region(), "us-east-1");
}

#[tokio::test]
async fn test_identity_not_resolved_when_both_known() {
    let uc = use_case(MockCacheStore::default(), MockScanBackend::default());

    uc.execute(request(&["ec2"])).await.unwrap();

    assert!(uc.identity_resolver.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_identity_failure_is_fatal() {
    let uc = ScanCloudAccountUseCase::new(
        catalog(),
        MockCacheStore::default(),
        MockScanBackend::default(),
        MockIdentityResolver {
            fail: true,
            ..Default::default()
        },
        MockProgressReporter::default(),
    );
    let request = ScanRequest::builder().services(["ec2"]).build().unwrap();

    let err = uc.execute(request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CloudScanError>(),
        Some(CloudScanError::IdentityResolution { .. })
    ));
    assert!(err.to_string().contains("no credentials found"));
    assert!(uc.scan_backend.calls().is_empty());
}

#[tokio::test]
async fn test_cache_load_error_is_fatal_not_full_scan() {
    let cache = MockCacheStore {
        load_error: true,
        ..Default::default()
    };
    let uc = use_case(cache, MockScanBackend::default());

    let err = uc.execute(request(&["ec2"])).await.unwrap_err();

    assert!(err.to_string().contains("cache volume unreadable"));
    assert!(uc.scan_backend.calls().is_empty());
}

#[tokio::test]
async fn test_backend_failure_aborts_without_cache_write() {
    let backend = MockScanBackend {
        fail: true,
        ..Default::default()
    };
    let uc = use_case(MockCacheStore::default(), backend);

    let err = uc.execute(request(&["ec2"])).await.unwrap_err();

    match err.downcast_ref::<CloudScanError>() {
        Some(CloudScanError::ScanBackend { provider, details }) => {
            assert_eq!(provider, "aws");
            assert!(details.contains("AccessDenied"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().starts_with("aws scan error"));
    assert_eq!(uc.cache_store.save_count(), 0);
    assert_eq!(
        *uc.progress_reporter.errors.lock().unwrap(),
        vec!["⚠️  Scanning 123 (us-east-1) failed".to_string()]
    );
}

#[tokio::test]
async fn test_deadline_exceeded_is_distinguished() {
    let backend = MockScanBackend {
        delay: Some(Duration::from_secs(5)),
        ..Default::default()
    };
    let uc = use_case(MockCacheStore::default(), backend);
    let request = ScanRequest::builder()
        .services(["ec2"])
        .account_id("123")
        .region("us-east-1")
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = uc.execute(request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CloudScanError>(),
        Some(CloudScanError::DeadlineExceeded { .. })
    ));
    assert_eq!(uc.cache_store.save_count(), 0);
    assert!(uc.progress_reporter.errors.lock().unwrap()[0].contains("timed out"));
}

#[tokio::test]
async fn test_custom_provider_is_used_in_errors() {
    let backend = MockScanBackend {
        fail: true,
        ..Default::default()
    };
    let uc = use_case(MockCacheStore::default(), backend).with_provider("gcp");

    let err = uc.execute(request(&["ec2"])).await.unwrap_err();

    assert!(err.to_string().starts_with("gcp scan error"));
}

use crate::cloud_scan::domain::{Report, ScanResult, ScanScope, ServiceResults};
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// ReportComposer - builds the report for one invocation from fresh scan output
pub struct ReportComposer;

impl ReportComposer {
    /// Composes a report that claims coverage of the whole `full_scope`
    ///
    /// `fresh` is `None` when nothing was scanned. Otherwise every service in
    /// `scanned` gets a slot stamped with `scanned_at`, empty when the backend
    /// found nothing for it. Results for services outside `full_scope` are dropped.
    pub fn compose(
        fresh: Option<Vec<ScanResult>>,
        scanned: &[String],
        account_id: &str,
        region: &str,
        full_scope: &ScanScope,
        scanned_at: DateTime<Utc>,
    ) -> Result<Report> {
        let mut report = Report::new(account_id, region, full_scope);
        let Some(fresh) = fresh else {
            return Ok(report);
        };

        let mut slots: BTreeMap<String, ServiceResults> = scanned
            .iter()
            .filter(|service| full_scope.contains(service))
            .map(|service| (service.clone(), ServiceResults::new(scanned_at)))
            .collect();

        for result in fresh {
            if !full_scope.contains(&result.service) {
                tracing::warn!(
                    "Dropping result for service '{}' outside the requested scope",
                    result.service
                );
                continue;
            }
            slots
                .entry(result.service.clone())
                .or_insert_with(|| ServiceResults::new(scanned_at))
                .push(result);
        }

        for (service, results) in slots {
            report.insert_service_results(&service, results)?;
        }
        Ok(report)
    }
}

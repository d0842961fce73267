use super::summary::{selected_resource_results, selected_service, SeverityCounts};
use crate::application::dto::{ReportLevel, ReportOptions};
use crate::cloud_scan::domain::{Report, ScanResult, ServiceResults};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(rename = "reportId")]
    report_id: String,
    #[serde(rename = "generatedAt")]
    generated_at: String,
    tool: Tool,
    #[serde(rename = "accountId")]
    account_id: &'a str,
    region: &'a str,
    level: &'static str,
    #[serde(rename = "fromCache")]
    from_cache: bool,
    #[serde(rename = "severityFilter", skip_serializing_if = "Vec::is_empty")]
    severity_filter: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    services: Option<Vec<ServiceSummary<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resources: Option<Vec<ResourceSummary<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<Vec<&'a ScanResult>>,
}

#[derive(Serialize)]
struct Tool {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ServiceSummary<'a> {
    name: &'a str,
    #[serde(rename = "lastScanned", skip_serializing_if = "Option::is_none")]
    last_scanned: Option<DateTime<Utc>>,
    resources: usize,
    failures: BTreeMap<&'static str, usize>,
}

#[derive(Serialize)]
struct ResourceSummary<'a> {
    resource: &'a str,
    failures: BTreeMap<&'static str, usize>,
}

fn failure_map(counts: SeverityCounts) -> BTreeMap<&'static str, usize> {
    counts.iter().map(|(s, n)| (s.as_str(), n)).collect()
}

/// JsonFormatter adapter rendering the report as a JSON document
///
/// The document carries a fresh report id and generation timestamp and the
/// section matching the report level: `services`, `resources` or `results`.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn build_services<'a>(report: &'a Report, options: &ReportOptions) -> Vec<ServiceSummary<'a>> {
        report
            .services_in_scope()
            .iter()
            .map(|service| {
                let slot = report.service_results(service);
                ServiceSummary {
                    name: service,
                    last_scanned: slot.map(|s| s.updated_at),
                    resources: slot.map(|s| s.resources.len()).unwrap_or(0),
                    failures: failure_map(SeverityCounts::failed(
                        slot.into_iter().flat_map(ServiceResults::results),
                        options,
                    )),
                }
            })
            .collect()
    }

    fn build_resources<'a>(
        slot: Option<&'a ServiceResults>,
        options: &ReportOptions,
    ) -> Vec<ResourceSummary<'a>> {
        slot.map(|slot| {
            slot.resources
                .iter()
                .map(|(resource, results)| ResourceSummary {
                    resource,
                    failures: failure_map(SeverityCounts::failed(results, options)),
                })
                .collect()
        })
        .unwrap_or_default()
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &Report, options: &ReportOptions) -> Result<String> {
        let mut document = JsonReport {
            report_id: format!("urn:uuid:{}", Uuid::new_v4()),
            generated_at: Utc::now().to_rfc3339(),
            tool: Tool {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
            account_id: report.account_id(),
            region: report.region(),
            level: "service",
            from_cache: options.from_cache,
            severity_filter: options.severities.iter().map(|s| s.as_str()).collect(),
            services: None,
            service: None,
            resources: None,
            resource: None,
            results: None,
        };

        match options.level {
            ReportLevel::Service => {
                document.services = Some(Self::build_services(report, options));
            }
            ReportLevel::Resource => {
                document.level = "resource";
                let selected = selected_service(report, options);
                document.service = selected.map(|(name, _)| name);
                document.resources = Some(Self::build_resources(
                    selected.and_then(|(_, slot)| slot),
                    options,
                ));
            }
            ReportLevel::Result => {
                document.level = "result";
                document.service = selected_service(report, options).map(|(name, _)| name);
                document.resource = options.arn.as_deref();
                document.results = Some(selected_resource_results(report, options));
            }
        }

        serde_json::to_string_pretty(&document).map_err(Into::into)
    }
}

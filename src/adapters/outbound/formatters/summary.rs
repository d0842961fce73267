use crate::application::dto::ReportOptions;
use crate::cloud_scan::domain::{Report, ScanResult, ServiceResults, Severity};

/// Failed-check counts per severity, ordered most severe first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SeverityCounts {
    counts: [usize; Severity::ALL.len()],
}

impl SeverityCounts {
    /// Counts failed results that pass the severity filter
    pub(crate) fn failed<'a>(
        results: impl IntoIterator<Item = &'a ScanResult>,
        options: &ReportOptions,
    ) -> Self {
        let mut counts = Self::default();
        for result in results {
            if result.is_failed() && options.includes_severity(result.severity) {
                counts.add(result.severity);
            }
        }
        counts
    }

    fn add(&mut self, severity: Severity) {
        if let Some(index) = Severity::ALL.iter().position(|s| *s == severity) {
            self.counts[index] += 1;
        }
    }

    pub(crate) fn get(&self, severity: Severity) -> usize {
        Severity::ALL
            .iter()
            .position(|s| *s == severity)
            .map(|index| self.counts[index])
            .unwrap_or(0)
    }

    pub(crate) fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(severity, count)` pairs in display order
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Severity, usize)> + '_ {
        Severity::ALL.iter().copied().zip(self.counts.iter().copied())
    }
}

/// Results of the selected service, if the report has any
pub(crate) fn selected_service<'r>(
    report: &'r Report,
    options: &ReportOptions,
) -> Option<(&'r str, Option<&'r ServiceResults>)> {
    let service = options.service.as_deref()?;
    let name = report
        .services_in_scope()
        .iter()
        .find(|s| s.as_str() == service)?;
    Some((name.as_str(), report.service_results(service)))
}

/// Results of the selected resource that pass the severity filter
pub(crate) fn selected_resource_results<'r>(
    report: &'r Report,
    options: &ReportOptions,
) -> Vec<&'r ScanResult> {
    let (Some((_, Some(slot))), Some(arn)) =
        (selected_service(report, options), options.arn.as_deref())
    else {
        return Vec::new();
    };

    slot.resources
        .get(arn)
        .map(|results| {
            results
                .iter()
                .filter(|r| options.includes_severity(r.severity))
                .collect()
        })
        .unwrap_or_default()
}

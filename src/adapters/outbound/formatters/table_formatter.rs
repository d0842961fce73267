use super::summary::{selected_resource_results, selected_service, SeverityCounts};
use crate::application::dto::{ReportLevel, ReportOptions};
use crate::cloud_scan::domain::{Report, ResultStatus, ServiceResults, Severity};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// Text used for a missing value in a cell
const EMPTY_CELL: &str = "-";

/// TableFormatter adapter rendering the report as plain-text tables
pub struct TableFormatter;

impl TableFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Collapses newlines so a cell stays on one line
    fn cell(text: &str) -> String {
        text.replace(['\r', '\n'], " ")
    }

    /// Renders rows under headers with each column padded to its widest cell
    fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();

        let mut output = Self::render_row(headers, &widths);
        output.push_str(&format!("|{}|\n", separator.join("|")));
        for row in rows {
            output.push_str(&Self::render_row(row, &widths));
        }
        output
    }

    fn render_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!(" {:<width$} ", cell.as_ref(), width = width))
            .collect();
        format!("|{}|\n", padded.join("|"))
    }

    fn severity_headers(first: &str) -> Vec<&str> {
        std::iter::once(first)
            .chain(Severity::ALL.iter().map(|s| s.as_str()))
            .collect()
    }

    fn count_cells(counts: SeverityCounts) -> Vec<String> {
        counts.iter().map(|(_, n)| n.to_string()).collect()
    }

    fn render_header(report: &Report, options: &ReportOptions, output: &mut String) {
        output.push_str(&format!(
            "Scan overview for account {} ({})\n",
            report.account_id(),
            report.region()
        ));
        if !options.severities.is_empty() {
            let names: Vec<&str> = options.severities.iter().map(|s| s.as_str()).collect();
            output.push_str(&format!("Severities: {}\n", names.join(", ")));
        }
        if options.from_cache {
            output.push_str("This scan report was loaded from cached results.\n");
        }
        output.push('\n');
    }

    fn render_services(report: &Report, options: &ReportOptions, output: &mut String) {
        let mut headers = Self::severity_headers("Service");
        headers.insert(1, "Resources");
        headers.push("Last Scanned");

        let rows: Vec<Vec<String>> = report
            .services_in_scope()
            .iter()
            .map(|service| {
                let slot = report.service_results(service);
                let counts = SeverityCounts::failed(
                    slot.into_iter().flat_map(ServiceResults::results),
                    options,
                );
                let mut row = vec![
                    Self::cell(service),
                    slot.map(|s| s.resources.len()).unwrap_or(0).to_string(),
                ];
                row.extend(Self::count_cells(counts));
                row.push(
                    slot.map(|s| s.updated_at.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| EMPTY_CELL.to_string()),
                );
                row
            })
            .collect();

        output.push_str(&Self::render_table(&headers, &rows));
    }

    fn render_resources(report: &Report, options: &ReportOptions, output: &mut String) {
        let Some((service, slot)) = selected_service(report, options) else {
            output.push_str("No results found for the selected service.\n");
            return;
        };
        output.push_str(&format!("Resources for service {}\n\n", service));

        let Some(slot) = slot.filter(|s| !s.resources.is_empty()) else {
            output.push_str(&format!("No resources found for service {}.\n", service));
            return;
        };

        let headers = Self::severity_headers("Resource");
        let rows: Vec<Vec<String>> = slot
            .resources
            .iter()
            .map(|(resource, results)| {
                let mut row = vec![Self::cell(resource)];
                row.extend(Self::count_cells(SeverityCounts::failed(results, options)));
                row
            })
            .collect();

        output.push_str(&Self::render_table(&headers, &rows));
    }

    fn render_results(report: &Report, options: &ReportOptions, output: &mut String) {
        let arn = options.arn.as_deref().unwrap_or(EMPTY_CELL);
        output.push_str(&format!("Results for resource {}\n\n", arn));

        let results = selected_resource_results(report, options);
        if results.is_empty() {
            output.push_str(&format!("No results found for resource {}.\n", arn));
            return;
        }

        let rows: Vec<Vec<String>> = results
            .iter()
            .map(|r| {
                let status = match r.status {
                    ResultStatus::Passed => "PASS",
                    ResultStatus::Failed => "FAIL",
                    ResultStatus::Ignored => "IGNORED",
                };
                vec![
                    Self::cell(&r.rule_id),
                    r.severity.to_string(),
                    status.to_string(),
                    if r.title.is_empty() {
                        EMPTY_CELL.to_string()
                    } else {
                        Self::cell(&r.title)
                    },
                ]
            })
            .collect();

        output.push_str(&Self::render_table(
            &["Rule", "Severity", "Status", "Title"],
            &rows,
        ));
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for TableFormatter {
    fn format(&self, report: &Report, options: &ReportOptions) -> Result<String> {
        let mut output = String::new();
        Self::render_header(report, options, &mut output);

        match options.level {
            ReportLevel::Service => Self::render_services(report, options, &mut output),
            ReportLevel::Resource => Self::render_resources(report, options, &mut output),
            ReportLevel::Result => Self::render_results(report, options, &mut output),
        }

        Ok(output)
    }
}

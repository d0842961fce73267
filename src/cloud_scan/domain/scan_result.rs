use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a failed check, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, most severe first (display order)
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Unknown => "UNKNOWN",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "UNKNOWN" => Ok(Severity::Unknown),
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(format!(
                "Invalid severity: {}. Please specify one of UNKNOWN, LOW, MEDIUM, HIGH, CRITICAL",
                s
            )),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one rule against one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultStatus {
    Passed,
    Failed,
    Ignored,
}

/// A single evaluated check produced by the scan backend
///
/// The core never interprets these beyond grouping by service and resource
/// and asking whether anything failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub service: String,
    /// Resource identifier (ARN or equivalent)
    pub resource: String,
    pub rule_id: String,
    #[serde(default)]
    pub title: String,
    pub severity: Severity,
    pub status: ResultStatus,
}

impl ScanResult {
    pub fn new(
        service: impl Into<String>,
        resource: impl Into<String>,
        rule_id: impl Into<String>,
        severity: Severity,
        status: ResultStatus,
    ) -> Self {
        Self {
            service: service.into(),
            resource: resource.into(),
            rule_id: rule_id.into(),
            title: String::new(),
            severity,
            status,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn is_failed(&self) -> bool {
        self.status == ResultStatus::Failed
    }
}

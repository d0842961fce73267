use std::collections::HashSet;

/// ScanScope - ordered, duplicate-free set of services requested for one invocation
///
/// Iteration order is the request order (or catalog order when defaulted).
/// Use [`ScanScope::as_set`] for membership tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanScope {
    services: Vec<String>,
}

impl ScanScope {
    /// Builds a scope, dropping repeated services while keeping first-seen order
    pub fn new<I, S>(services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let services = services
            .into_iter()
            .map(Into::into)
            .filter(|service| seen.insert(service.clone()))
            .collect();
        Self { services }
    }

    pub fn services(&self) -> &[String] {
        &self.services
    }

    pub fn as_set(&self) -> HashSet<&str> {
        self.services.iter().map(String::as_str).collect()
    }

    pub fn contains(&self, service: &str) -> bool {
        self.services.iter().any(|s| s == service)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Returns the single selected service, if the scope has exactly one
    pub fn single(&self) -> Option<&str> {
        match self.services.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

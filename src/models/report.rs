use super::CheckOutcome;
use crate::config::SiteSpec;

const BODY_HEADER: &str = "The following websites have changed:";

/// Ordered report lines collected during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    entries: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the outcome's report line; unchanged sites add nothing.
    pub fn record(&mut self, site: &SiteSpec, outcome: &CheckOutcome) {
        if let Some(line) = outcome.describe(site) {
            self.entries.push(line);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn body(&self) -> String {
        format!("{}\n\n{}", BODY_HEADER, self.entries.join("\n\n"))
    }
}

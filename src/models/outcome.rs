use crate::config::SiteSpec;

/// Result of checking one site during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Unchanged,
    Changed(String),
    FetchError(String),
    ElementNotFound,
}

impl CheckOutcome {
    /// Report line for this outcome, `None` when there is nothing to report.
    pub fn describe(&self, site: &SiteSpec) -> Option<String> {
        let prefix = format!("{} ({})", site.name, site.url);

        match self {
            CheckOutcome::Unchanged => None,
            CheckOutcome::Changed(text) => Some(format!("{} - Updated text:\n{}", prefix, text)),
            CheckOutcome::FetchError(detail) => {
                Some(format!("{} - Error fetching page: {}", prefix, detail))
            }
            CheckOutcome::ElementNotFound => Some(format!("{} - Target element not found.", prefix)),
        }
    }
}

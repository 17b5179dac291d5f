use std::fmt;

/// Why pagination stopped for a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every page within the budget was fetched.
    BudgetReached,
    /// A page rendered without any listings; later pages are skipped.
    NoMoreResults { page: u32 },
    /// A page fetch failed after retry exhaustion; prior pages are kept.
    PageFetchFailed { page: u32 },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::BudgetReached => write!(f, "page budget reached"),
            StopReason::NoMoreResults { page } => write!(f, "no listings on page {}", page),
            StopReason::PageFetchFailed { page } => {
                write!(f, "page {} fetch failed after retries", page)
            }
        }
    }
}

/// Per-keyword summary reported at the end of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub keyword: String,
    pub pages_attempted: u32,
    pub records_collected: usize,
    pub fragments_dropped: usize,
    pub stop_reason: StopReason,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stop_reason_messages() {
        assert_eq!(StopReason::BudgetReached.to_string(), "page budget reached");
        assert_eq!(
            StopReason::NoMoreResults { page: 3 }.to_string(),
            "no listings on page 3"
        );
        assert_eq!(
            StopReason::PageFetchFailed { page: 1 }.to_string(),
            "page 1 fetch failed after retries"
        );
    }
}

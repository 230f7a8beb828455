/// Crawl lifecycle state definitions
use std::fmt;

/// Represents where a crawl run is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Frontier holds the seed URL, dataset is empty
    Idle,

    /// The fetch/extract/advance loop is in progress
    Running,

    /// Frontier exhausted; the dataset is complete
    Done,

    /// The run stopped on an error, limit or cancellation; nothing is persisted
    Failed,
}

impl CrawlState {
    /// Returns true if the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running) | (Self::Running, Self::Done) | (Self::Running, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(CrawlState::Idle.can_transition_to(CrawlState::Running));
        assert!(CrawlState::Running.can_transition_to(CrawlState::Done));
        assert!(CrawlState::Running.can_transition_to(CrawlState::Failed));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!CrawlState::Idle.can_transition_to(CrawlState::Done));
        assert!(!CrawlState::Done.can_transition_to(CrawlState::Running));
        assert!(!CrawlState::Failed.can_transition_to(CrawlState::Running));
        assert!(!CrawlState::Failed.can_transition_to(CrawlState::Done));
        assert!(!CrawlState::Done.can_transition_to(CrawlState::Failed));
        assert!(!CrawlState::Running.can_transition_to(CrawlState::Running));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CrawlState::Idle), "idle");
        assert_eq!(format!("{}", CrawlState::Failed), "failed");
    }
}

/// Crawl phase definitions for the controller's state machine
///
/// `Running` is the initial phase, also for a resumed crawl. `Checkpointing`
/// is entered from `Running` and always returns to it. The three terminal
/// phases are only reachable from `Running`.
use std::fmt;

/// Represents the current phase of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Pages are being pulled from the frontier
    Running,

    /// A state snapshot is being written
    Checkpointing,

    // ===== Terminal Phases =====
    /// The saved-page limit or the crawl hard cap was reached
    TerminatedLimitReached,

    /// The frontier ran out of entries
    TerminatedFrontierExhausted,

    /// An interrupt signal stopped the crawl after a final checkpoint
    TerminatedInterrupted,
}

impl CrawlPhase {
    /// Returns true if no further iterations will run
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running | Self::Checkpointing)
    }

    /// Returns true if the crawl ended on its own rather than by a signal
    pub fn is_clean_finish(&self) -> bool {
        matches!(
            self,
            Self::TerminatedLimitReached | Self::TerminatedFrontierExhausted
        )
    }

    /// Checks whether moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Running, _) => next != Self::Running,
            (Self::Checkpointing, Self::Running) => true,
            _ => false,
        }
    }

    /// Short lowercase label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Checkpointing => "checkpointing",
            Self::TerminatedLimitReached => "limit_reached",
            Self::TerminatedFrontierExhausted => "frontier_exhausted",
            Self::TerminatedInterrupted => "interrupted",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

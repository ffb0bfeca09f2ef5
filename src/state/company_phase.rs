use std::fmt;

/// Per-company crawl phases
///
/// A company moves through these phases once per run:
///
/// ```text
/// Pending -> Locating -> Classifying -> TargetFound
///                |             |
///                |             +-> Exploring -> TargetFound | Exhausted
///                +-> Exhausted
/// ```
///
/// A failing company is abandoned mid-graph; its writes are rolled back and
/// the next run starts it from `Pending` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanyPhase {
    /// Needs processing: no live target page is known
    Pending,

    /// Searching for a careers page from the company root
    Locating,

    /// Classifying the located careers page
    Classifying,

    /// Following classifier suggestions
    Exploring,

    // ===== Terminal States =====
    /// A target page was recorded
    TargetFound,

    /// Every strategy and suggestion was tried without finding a target
    Exhausted,
}

impl CompanyPhase {
    /// Returns true if the run is finished with this company
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::TargetFound | Self::Exhausted)
    }

    /// Returns true if the transition is allowed by the phase graph
    pub fn can_transition_to(&self, next: CompanyPhase) -> bool {
        use CompanyPhase::*;
        match (self, next) {
            (Pending, Locating) => true,
            (Locating, Classifying) | (Locating, Exhausted) => true,
            (Classifying, TargetFound) | (Classifying, Exploring) => true,
            (Exploring, TargetFound) | (Exploring, Exhausted) => true,
            _ => false,
        }
    }

    /// String form used in logs and run reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Locating => "locating",
            Self::Classifying => "classifying",
            Self::Exploring => "exploring",
            Self::TargetFound => "target_found",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for CompanyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! State module for tracking per-company crawl progress
//!
//! - `CompanyPhase`: where a company is in the locate/classify/explore cycle
//! - `PhaseTracker`: enforces the phase graph while a company is processed

mod company_phase;

pub use company_phase::CompanyPhase;

use crate::ScoutError;

/// Tracks one company's phase and rejects transitions outside the graph
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    company_id: i64,
    phase: CompanyPhase,
}

impl PhaseTracker {
    /// Starts a company in `Pending`
    pub fn new(company_id: i64) -> Self {
        Self {
            company_id,
            phase: CompanyPhase::Pending,
        }
    }

    pub fn phase(&self) -> CompanyPhase {
        self.phase
    }

    /// Moves to `next`, or fails with `InvalidTransition`
    pub fn advance(&mut self, next: CompanyPhase) -> Result<(), ScoutError> {
        if !self.phase.can_transition_to(next) {
            return Err(ScoutError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!(
            company_id = self.company_id,
            from = %self.phase,
            to = %next,
            "Company phase change"
        );
        self.phase = next;
        Ok(())
    }
}

//! League engine error types
//!
//! Variants fall into the categories the HTTP layer maps onto status codes:
//! validation and preconditions are the caller's fault, `NotFound` signals
//! absence, `Database` is whatever the store reported, and
//! `ContractViolation` means persisted data broke an invariant.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeagueError {
    // Preconditions
    #[error("At least two teams are required to generate fixtures (found {found})")]
    InsufficientTeams { found: usize },
    #[error("No fixtures scheduled for week {week}. Generate fixtures first.")]
    NoFixtures { week: i64 },
    #[error("Week {week} still has {unplayed} unplayed match(es)")]
    WeekIncomplete { week: i64, unplayed: usize },
    #[error("No active season")]
    NoActiveSeason,

    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),

    #[error("Contract violation: {0}")]
    ContractViolation(String),
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LeagueError {
    pub fn not_found(what: impl Into<String>) -> Self {
        LeagueError::NotFound(what.into())
    }

    /// Failures a per-match loop may log and skip.
    pub fn is_transient(&self) -> bool {
        matches!(self, LeagueError::Database(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LeagueError::NotFound(_))
    }

    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            LeagueError::InsufficientTeams { .. }
                | LeagueError::NoFixtures { .. }
                | LeagueError::WeekIncomplete { .. }
                | LeagueError::NoActiveSeason
        )
    }
}

pub type LeagueResult<T> = Result<T, LeagueError>;

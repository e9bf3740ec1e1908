//! League Manager
//!
//! Entry point for the simulation core:
//! - Fixture generation
//! - Week simulation and advancement
//! - Standings recomputation and manual result edits
//! - Championship predictions
//! - Season lifecycle
//!
//! The operations themselves live in the sibling modules as `impl` blocks
//! on [`LeagueManager`].

use super::{repository::LeagueRepository, simulator::MatchSimulator};

/// Drives a league through a persistence port and an injected simulator.
pub struct LeagueManager<R> {
    pub(super) repo: R,
    pub(super) simulator: MatchSimulator,
}

impl<R: LeagueRepository> LeagueManager<R> {
    pub fn new(repo: R, simulator: MatchSimulator) -> Self {
        Self { repo, simulator }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

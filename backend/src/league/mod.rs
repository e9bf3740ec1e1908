//! League simulation core
//!
//! Everything here talks to storage through [`LeagueRepository`]; the HTTP
//! layer only ever calls [`LeagueManager`].

pub mod constants;
pub mod error;
pub mod fixtures;
pub mod manager;
pub mod predictor;
pub mod repository;
pub mod season;
pub mod simulator;
pub mod standings;
pub mod week;

pub use error::{LeagueError, LeagueResult};
pub use fixtures::{double_round_robin, total_weeks, FixtureSummary, Pairing};
pub use manager::LeagueManager;
pub use predictor::{predict, ChampionshipOdds, TeamForecastInput};
pub use repository::{LeagueRepository, MatchCommit};
pub use season::SeasonPhase;
pub use simulator::{MatchSimulator, OutcomeOdds, PlayedMatch, SeasonReport, WeekReport};
pub use standings::{StandingDelta, TableRow};
pub use week::WeekAdvance;

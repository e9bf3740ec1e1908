pub mod fixtures;
pub mod matches;
pub mod pages;
pub mod season;
pub mod standings;
pub mod views;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{db::SqliteRepository, league::LeagueManager};

pub use fixtures::router as fixtures_router;
pub use matches::router as matches_router;
pub use pages::router as pages_router;
pub use season::router as season_router;
pub use standings::router as standings_router;

pub type League = LeagueManager<SqliteRepository>;

/// Shared state for every league endpoint
pub struct AppState {
    pub league: League,
    /// Held by every request that mutates league state
    pub write_lock: Mutex<()>,
    /// Cancelled on shutdown; passed to every core operation
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(league: League, shutdown: CancellationToken) -> Self {
        Self {
            league,
            write_lock: Mutex::new(()),
            shutdown,
        }
    }
}

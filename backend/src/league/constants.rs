//! League engine constants
//!
//! The predictor coefficients are tuned empirically; tests pin them.

/// Year used when the first season is created or the league is reset.
pub const DEFAULT_SEASON_YEAR: i64 = 2025;

/// Points awarded per outcome
pub const POINTS_FOR_WIN: i64 = 3;
pub const POINTS_FOR_DRAW: i64 = 1;

/// Highest score a manual edit may record for either side.
pub const MAX_EDITED_GOALS: i64 = 99;

/// Multiplier applied to the home side's strength when sampling outcomes.
pub const HOME_ADVANTAGE: f64 = 1.1;

/// Highest number of goals the winning (or drawing) side can score is
/// `GOAL_SPREAD` for a win (1..=3) and `GOAL_SPREAD - 1` for a draw (0..=2).
pub const GOAL_SPREAD: i64 = 3;

/// Budget scale used by the predictor's team strength term.
pub const BUDGET_SCALE: f64 = 1_000_000.0;

/// Season progress boundaries for the predictor's three phases.
pub const EARLY_SEASON_END: f64 = 0.30;
pub const LATE_SEASON_START: f64 = 0.70;

/// Early phase: score = EARLY_BASE + EARLY_WEIGHT * strength
pub const EARLY_BASE: f64 = 0.3;
pub const EARLY_WEIGHT: f64 = 0.4;

/// Mid phase: score = strength * (MID_BASE + MID_CATCHUP_WEIGHT * catchup)
pub const MID_BASE: f64 = 0.6;
pub const MID_CATCHUP_WEIGHT: f64 = 0.4;

/// Late phase factor for a side that can no longer close the gap.
pub const LATE_OUT_OF_REACH: f64 = 0.1;

/// Remaining weeks at or below which late scores get sharpened.
pub const SHARPEN_WITHIN_WEEKS: i64 = 2;

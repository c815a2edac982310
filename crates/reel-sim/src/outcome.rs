//! Outcome selection and forced-win injection

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::grid::ReelGrid;
use crate::rng::RandomSource;
use crate::symbols::{Symbol, SymbolTable};

/// Number of leading columns overwritten by a forced win
pub const FORCED_RUN: usize = 3;

/// Validated win probability in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct WinProbability(f64);

impl WinProbability {
    /// Fails on NaN or values outside `[0, 1]`
    pub fn new(value: f64) -> SimResult<Self> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(SimError::InvalidProbability(value));
        }
        Ok(Self(value))
    }

    /// Clamps into `[0, 1]`; NaN becomes 0
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Which row receives the forced winning run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForcedRow {
    /// Always this row
    Fixed(u8),
    /// Uniform over the visible rows
    Random,
}

impl Default for ForcedRow {
    fn default() -> Self {
        ForcedRow::Fixed(0)
    }
}

/// A forced winning run written into the final grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedWin {
    pub symbol: Symbol,
    pub row: usize,
    /// Leading columns overwritten
    pub columns: usize,
}

/// Win/lose decision for one spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDecision {
    pub is_win: bool,
    pub forced: Option<ForcedWin>,
}

impl OutcomeDecision {
    pub fn lose() -> Self {
        Self {
            is_win: false,
            forced: None,
        }
    }
}

/// `draw() < win_probability`
///
/// Out-of-range probabilities are tolerated: `<= 0` never wins, `>= 1`
/// always wins, NaN never wins.
pub fn decide_outcome<R: RandomSource + ?Sized>(rng: &mut R, win_probability: f64) -> bool {
    rng.next_f64() < win_probability
}

/// Write a run of one random symbol into the first [`FORCED_RUN`] columns
/// of the target row
///
/// Must be applied to the final settled grid.
pub fn inject_forced_win<R: RandomSource + ?Sized>(
    rng: &mut R,
    table: &SymbolTable,
    grid: &mut ReelGrid,
    forced_row: ForcedRow,
) -> ForcedWin {
    let symbol = table.pick(rng);
    let last_row = grid.rows().saturating_sub(1);
    let row = match forced_row {
        ForcedRow::Fixed(row) => (row as usize).min(last_row),
        ForcedRow::Random => rng.next_index(grid.rows()),
    };
    let columns = FORCED_RUN.min(grid.cols());

    for col in 0..columns {
        grid.set_cell(col, row, symbol);
    }

    ForcedWin {
        symbol,
        row,
        columns,
    }
}

/// Decide the outcome and, on a win, inject the forced run into `grid`
pub fn select_outcome<R: RandomSource + ?Sized>(
    rng: &mut R,
    table: &SymbolTable,
    grid: &mut ReelGrid,
    win_probability: f64,
    forced_row: ForcedRow,
) -> OutcomeDecision {
    if !decide_outcome(rng, win_probability) {
        return OutcomeDecision::lose();
    }
    let forced = inject_forced_win(rng, table, grid, forced_row);
    log::trace!(
        "forced win: {} x{} on row {}",
        forced.symbol,
        forced.columns,
        forced.row
    );
    OutcomeDecision {
        is_win: true,
        forced: Some(forced),
    }
}

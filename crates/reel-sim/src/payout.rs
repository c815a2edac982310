//! Row-based payout evaluation
//!
//! Each visible row is scored independently: the most frequent symbol in the
//! row pays `wager × multiplier × (count − 2)` when it appears at least
//! [`MIN_MATCH`] times. Matches do not need to be adjacent.

use serde::{Deserialize, Serialize};

use crate::grid::ReelGrid;
use crate::symbols::{Symbol, SymbolTable};

/// Minimum occurrences in a row for it to pay
pub const MIN_MATCH: usize = 3;

/// One paying row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWin {
    pub row: usize,
    pub symbol: Symbol,
    /// Occurrences of `symbol` in the row
    pub count: usize,
    /// Catalog multiplier of `symbol`
    pub multiplier: u64,
    pub amount: u64,
}

/// Result of scoring a grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub total_win: u64,
    pub row_wins: Vec<RowWin>,
}

impl Evaluation {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_win(&self) -> bool {
        self.total_win > 0
    }

    /// Indices of paying rows, ascending
    pub fn winning_rows(&self) -> Vec<usize> {
        self.row_wins.iter().map(|w| w.row).collect()
    }
}

/// Most frequent symbol in a row and its count
///
/// Ties go to the symbol that appears first in column order.
pub fn dominant_symbol(row: &[Symbol]) -> Option<(Symbol, usize)> {
    let mut best: Option<(Symbol, usize)> = None;
    for (i, &symbol) in row.iter().enumerate() {
        // already counted at its first occurrence
        if row[..i].contains(&symbol) {
            continue;
        }
        let count = row.iter().filter(|&&s| s == symbol).count();
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((symbol, count));
        }
    }
    best
}

/// Payout for `count` occurrences at `multiplier` (0 below [`MIN_MATCH`])
pub fn row_payout(wager: u64, multiplier: u64, count: usize) -> u64 {
    if count < MIN_MATCH {
        return 0;
    }
    let extra = (count - (MIN_MATCH - 1)) as u64;
    wager.saturating_mul(multiplier).saturating_mul(extra)
}

/// Score every visible row of `grid`
///
/// A spin decided as a loss is never paid, even if rows happen to match.
pub fn evaluate(grid: &ReelGrid, is_win: bool, wager: u64, table: &SymbolTable) -> Evaluation {
    if !is_win {
        return Evaluation::none();
    }

    let mut evaluation = Evaluation::none();
    for row in 0..grid.rows() {
        let symbols = grid.row(row);
        let Some((symbol, count)) = dominant_symbol(&symbols) else {
            continue;
        };
        let multiplier = table.payout(symbol);
        let amount = row_payout(wager, multiplier, count);
        if amount == 0 {
            continue;
        }
        evaluation.total_win = evaluation.total_win.saturating_add(amount);
        evaluation.row_wins.push(RowWin {
            row,
            symbol,
            count,
            multiplier,
            amount,
        });
    }
    evaluation
}

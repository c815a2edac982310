//! Reel grid: full strips plus the visible window of each column

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::error::{SimError, SimResult};
use crate::rng::RandomSource;
use crate::strip::{ReelStrip, generate_strips};
use crate::symbols::{Symbol, SymbolTable};

/// COLS × ROWS arrangement of symbols
///
/// Each column keeps its full strip and a stop position; the visible cells
/// of a column are always `rows` consecutive symbols of its strip starting
/// at the stop (wrapping around).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridParts")]
pub struct ReelGrid {
    reels: Vec<ReelStrip>,
    stops: Vec<usize>,
    rows: usize,
}

/// Unchecked serialized form of [`ReelGrid`]
#[derive(Deserialize)]
struct GridParts {
    reels: Vec<ReelStrip>,
    stops: Vec<usize>,
    rows: usize,
}

impl TryFrom<GridParts> for ReelGrid {
    type Error = SimError;

    fn try_from(parts: GridParts) -> SimResult<Self> {
        Self::from_parts(parts.reels, parts.stops, parts.rows)
    }
}

impl ReelGrid {
    /// Fresh random grid: one generated strip per column, stops at 0
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R, table: &SymbolTable, spec: &GridSpec) -> Self {
        let reels = generate_strips(rng, table, spec.cols, spec.strip_length);
        Self::from_reels(reels, spec.rows as usize)
    }

    /// Grid over existing strips, stops at 0
    pub fn from_reels(reels: Vec<ReelStrip>, rows: usize) -> Self {
        let stops = vec![0; reels.len()];
        Self { reels, stops, rows }
    }

    /// Grid over existing strips with explicit stop positions
    ///
    /// Needs one stop per strip, each inside its strip, and no empty strips.
    pub fn from_parts(reels: Vec<ReelStrip>, stops: Vec<usize>, rows: usize) -> SimResult<Self> {
        if stops.len() != reels.len() {
            return Err(SimError::config(format!(
                "{} stop positions for {} reels",
                stops.len(),
                reels.len()
            )));
        }
        for (col, (reel, &stop)) in reels.iter().zip(&stops).enumerate() {
            if reel.is_empty() {
                return Err(SimError::config(format!("reel {col} has an empty strip")));
            }
            if stop >= reel.len() {
                return Err(SimError::config(format!(
                    "stop {stop} outside reel {col} of length {}",
                    reel.len()
                )));
            }
        }
        Ok(Self { reels, stops, rows })
    }

    /// Grid whose strips are exactly the given rows (row-major input)
    ///
    /// Rows shorter than the first row are padded by repeating their last symbol.
    pub fn from_rows(rows: &[Vec<Symbol>]) -> Self {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let reels = (0..cols)
            .map(|col| {
                let symbols = rows
                    .iter()
                    .map(|row| {
                        row.get(col)
                            .or_else(|| row.last())
                            .copied()
                            .unwrap_or(Symbol::Diamond)
                    })
                    .collect();
                ReelStrip::new(col as u8, symbols)
            })
            .collect();
        Self::from_reels(reels, rows.len())
    }

    pub fn cols(&self) -> usize {
        self.reels.len()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Visible symbol at (column, row)
    pub fn cell(&self, col: usize, row: usize) -> Symbol {
        self.reels[col].symbol_at(self.stops[col] + row)
    }

    /// Overwrite a visible cell (writes through to the strip)
    pub fn set_cell(&mut self, col: usize, row: usize, symbol: Symbol) {
        let position = self.stops[col] + row;
        self.reels[col].set(position, symbol);
    }

    /// Visible symbols of one row, in column order
    pub fn row(&self, row: usize) -> Vec<Symbol> {
        (0..self.cols()).map(|col| self.cell(col, row)).collect()
    }

    /// Visible symbols of one column, top to bottom
    pub fn column(&self, col: usize) -> Vec<Symbol> {
        self.reels[col].window(self.stops[col], self.rows)
    }

    /// Visible window, column-major (reels × rows)
    pub fn window(&self) -> Vec<Vec<Symbol>> {
        (0..self.cols()).map(|col| self.column(col)).collect()
    }

    /// Visible window, row-major
    pub fn rows_view(&self) -> Vec<Vec<Symbol>> {
        (0..self.rows).map(|row| self.row(row)).collect()
    }

    pub fn reel(&self, col: usize) -> &ReelStrip {
        &self.reels[col]
    }

    pub fn stop(&self, col: usize) -> usize {
        self.stops[col]
    }

    /// Move a column's visible window (wraps to the strip length)
    pub fn set_stop(&mut self, col: usize, stop: usize) {
        let len = self.reels[col].len().max(1);
        self.stops[col] = stop % len;
    }

    /// One animation frame: every strip scrolls down by one symbol
    pub fn scroll(&mut self) {
        for reel in &mut self.reels {
            reel.rotate_down();
        }
    }

    /// Render rows with glyphs or labels, one line per row
    pub fn render(&self, glyphs: bool) -> String {
        self.rows_view()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|s| if glyphs { s.glyph() } else { s.label() })
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for ReelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

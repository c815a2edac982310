//! Reel strips and the strip generator

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;
use crate::symbols::{Symbol, SymbolTable};

/// One column's full sequence of symbols
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelStrip {
    /// Symbols in order
    pub symbols: Vec<Symbol>,
    /// Reel (column) index
    pub reel_index: u8,
}

impl ReelStrip {
    pub fn new(reel_index: u8, symbols: Vec<Symbol>) -> Self {
        Self { symbols, reel_index }
    }

    /// Symbol at position (wraps around)
    ///
    /// Panics on an empty strip; strips built by the generator are never empty.
    pub fn symbol_at(&self, position: usize) -> Symbol {
        self.symbols[position % self.symbols.len()]
    }

    /// Overwrite the symbol at position (wraps around)
    pub fn set(&mut self, position: usize, symbol: Symbol) {
        if self.symbols.is_empty() {
            return;
        }
        let len = self.symbols.len();
        self.symbols[position % len] = symbol;
    }

    /// `rows` consecutive symbols starting at `start` (wraps around)
    pub fn window(&self, start: usize, rows: usize) -> Vec<Symbol> {
        if self.symbols.is_empty() {
            return Vec::new();
        }
        (0..rows).map(|r| self.symbol_at(start + r)).collect()
    }

    /// Scroll one step: the last symbol moves to the front
    pub fn rotate_down(&mut self) {
        if !self.symbols.is_empty() {
            self.symbols.rotate_right(1);
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Generate a strip of `length` symbols, each drawn uniformly from the table
pub fn generate_strip<R: RandomSource + ?Sized>(
    rng: &mut R,
    table: &SymbolTable,
    reel_index: u8,
    length: usize,
) -> ReelStrip {
    let symbols = (0..length).map(|_| table.pick(rng)).collect();
    ReelStrip::new(reel_index, symbols)
}

/// Generate one strip per column
pub fn generate_strips<R: RandomSource + ?Sized>(
    rng: &mut R,
    table: &SymbolTable,
    cols: u8,
    length: usize,
) -> Vec<ReelStrip> {
    (0..cols)
        .map(|col| generate_strip(rng, table, col, length))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ChaChaRandom, ScriptedRandom};

    #[test]
    fn test_strip_length_and_catalog() {
        let table = SymbolTable::standard();
        let mut rng = ChaChaRandom::seeded(99);
        let strip = generate_strip(&mut rng, &table, 2, 30);
        assert_eq!(strip.len(), 30);
        assert_eq!(strip.reel_index, 2);
        assert!(strip.symbols.iter().all(|s| table.contains(*s)));
    }

    #[test]
    fn test_strip_consumes_one_draw_per_symbol() {
        let table = SymbolTable::standard();
        let mut rng = ScriptedRandom::new(vec![0.0, 0.2, 0.4]);
        let strips = generate_strips(&mut rng, &table, 5, 30);
        assert_eq!(strips.len(), 5);
        assert_eq!(rng.consumed(), 150);
        assert_eq!(
            strips[0].window(0, 3),
            vec![Symbol::Diamond, Symbol::Cherry, Symbol::Bell]
        );
    }

    #[test]
    fn test_window_wraps() {
        let strip = ReelStrip::new(
            0,
            vec![Symbol::Bar, Symbol::Bell, Symbol::Lemon, Symbol::Dice],
        );
        assert_eq!(
            strip.window(3, 3),
            vec![Symbol::Dice, Symbol::Bar, Symbol::Bell]
        );
        assert_eq!(strip.symbol_at(6), Symbol::Lemon);
    }

    #[test]
    fn test_rotate_down() {
        let mut strip = ReelStrip::new(0, vec![Symbol::Bar, Symbol::Bell, Symbol::Lemon]);
        strip.rotate_down();
        assert_eq!(strip.symbols, vec![Symbol::Lemon, Symbol::Bar, Symbol::Bell]);
    }

    #[test]
    fn test_zero_length_strip() {
        let table = SymbolTable::standard();
        let mut rng = ScriptedRandom::new(vec![0.3]);
        let mut strip = generate_strip(&mut rng, &table, 0, 0);
        assert!(strip.is_empty());
        assert!(strip.window(0, 3).is_empty());
        strip.set(1, Symbol::Bar);
        strip.rotate_down();
        assert!(strip.is_empty());
    }
}

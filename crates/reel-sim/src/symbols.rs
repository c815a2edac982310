//! Symbol definitions and the payout catalog

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::rng::RandomSource;

/// Reel symbol
///
/// Declared in descending payout order (Diamond pays most).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Symbol {
    Diamond = 0,
    Cherry = 1,
    Dice = 2,
    Bell = 3,
    Seven = 4,
    Bar = 5,
    Lemon = 6,
    Watermelon = 7,
    Grapes = 8,
}

impl Symbol {
    /// All symbols in catalog order
    pub const ALL: [Symbol; 9] = [
        Symbol::Diamond,
        Symbol::Cherry,
        Symbol::Dice,
        Symbol::Bell,
        Symbol::Seven,
        Symbol::Bar,
        Symbol::Lemon,
        Symbol::Watermelon,
        Symbol::Grapes,
    ];

    /// Symbol from catalog index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Catalog index
    pub fn index(self) -> usize {
        self as usize
    }

    /// Reference payout multiplier for a 3-match
    pub fn payout(self) -> u64 {
        match self {
            Symbol::Diamond => 50,
            Symbol::Cherry => 40,
            Symbol::Dice => 30,
            Symbol::Bell => 20,
            Symbol::Seven => 15,
            Symbol::Bar => 10,
            Symbol::Lemon | Symbol::Watermelon | Symbol::Grapes => 5,
        }
    }

    /// Display glyph used by graphical shells
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Diamond => "💎",
            Symbol::Cherry => "🍒",
            Symbol::Dice => "🎲",
            Symbol::Bell => "🔔",
            Symbol::Seven => "7️⃣",
            Symbol::Bar => "BAR",
            Symbol::Lemon => "🍋",
            Symbol::Watermelon => "🍉",
            Symbol::Grapes => "🍇",
        }
    }

    /// Fixed-width ASCII label for terminals and logs
    pub fn label(self) -> &'static str {
        match self {
            Symbol::Diamond => "DIA",
            Symbol::Cherry => "CHE",
            Symbol::Dice => "DIC",
            Symbol::Bell => "BEL",
            Symbol::Seven => "SEV",
            Symbol::Bar => "BAR",
            Symbol::Lemon => "LEM",
            Symbol::Watermelon => "MEL",
            Symbol::Grapes => "GRP",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One catalog entry: a symbol and its payout multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub symbol: Symbol,
    pub payout: u64,
}

/// Symbol catalog
///
/// Strips draw uniformly from the entries, so every entry has the same
/// probability of landing regardless of its multiplier. Serialized as the
/// plain entry list; deserialization goes through [`SymbolTable::from_entries`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SymbolEntry>", into = "Vec<SymbolEntry>")]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    /// Reference catalog: all nine symbols with their standard multipliers
    pub fn standard() -> Self {
        Self {
            entries: Symbol::ALL
                .iter()
                .map(|&symbol| SymbolEntry {
                    symbol,
                    payout: symbol.payout(),
                })
                .collect(),
        }
    }

    /// Build a catalog from custom entries
    pub fn from_entries(entries: Vec<SymbolEntry>) -> SimResult<Self> {
        if entries.is_empty() {
            return Err(SimError::config("symbol table must not be empty"));
        }
        for (i, entry) in entries.iter().enumerate() {
            if entry.payout == 0 {
                return Err(SimError::config(format!(
                    "symbol {} has a zero payout multiplier",
                    entry.symbol
                )));
            }
            if entries[..i].iter().any(|e| e.symbol == entry.symbol) {
                return Err(SimError::config(format!(
                    "symbol {} listed more than once",
                    entry.symbol
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Build a catalog from `(symbol, multiplier)` pairs
    pub fn with_payouts(payouts: &[(Symbol, u64)]) -> SimResult<Self> {
        Self::from_entries(
            payouts
                .iter()
                .map(|&(symbol, payout)| SymbolEntry { symbol, payout })
                .collect(),
        )
    }

    /// Payout multiplier for a symbol (0 if the symbol is not in the catalog)
    pub fn payout(&self, symbol: Symbol) -> u64 {
        self.entries
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| e.payout)
            .unwrap_or(0)
    }

    /// Symbol at catalog position
    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.entries.get(index).map(|e| e.symbol)
    }

    /// Draw one symbol uniformly at random
    pub fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Symbol {
        let idx = rng.next_index(self.entries.len());
        self.entries[idx].symbol
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.entries.iter().any(|e| e.symbol == symbol)
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<SymbolEntry>> for SymbolTable {
    type Error = SimError;

    fn try_from(entries: Vec<SymbolEntry>) -> SimResult<Self> {
        Self::from_entries(entries)
    }
}

impl From<SymbolTable> for Vec<SymbolEntry> {
    fn from(table: SymbolTable) -> Self {
        table.entries
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;

    #[test]
    fn test_standard_payouts() {
        let table = SymbolTable::standard();
        let payouts: Vec<u64> = table.iter().map(|e| e.payout).collect();
        assert_eq!(payouts, vec![50, 40, 30, 20, 15, 10, 5, 5, 5]);
        assert_eq!(table.len(), 9);
    }

    #[test]
    fn test_symbol_index_roundtrip() {
        for (i, symbol) in Symbol::ALL.iter().enumerate() {
            assert_eq!(symbol.index(), i);
            assert_eq!(Symbol::from_index(i), Some(*symbol));
        }
        assert_eq!(Symbol::from_index(9), None);
    }

    #[test]
    fn test_custom_table_validation() {
        assert!(SymbolTable::from_entries(Vec::new()).is_err());

        let zero = vec![SymbolEntry {
            symbol: Symbol::Bell,
            payout: 0,
        }];
        assert!(SymbolTable::from_entries(zero).is_err());

        let dup = vec![
            SymbolEntry { symbol: Symbol::Bell, payout: 3 },
            SymbolEntry { symbol: Symbol::Bell, payout: 4 },
        ];
        assert!(SymbolTable::from_entries(dup).is_err());

        let custom = SymbolTable::from_entries(vec![
            SymbolEntry { symbol: Symbol::Seven, payout: 7 },
            SymbolEntry { symbol: Symbol::Bar, payout: 2 },
        ])
        .unwrap();
        assert_eq!(custom.payout(Symbol::Seven), 7);
        assert_eq!(custom.payout(Symbol::Diamond), 0);
        assert!(!custom.contains(Symbol::Diamond));

        let pairs = SymbolTable::with_payouts(&[(Symbol::Lemon, 9), (Symbol::Grapes, 1)]).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs.get(1), Some(Symbol::Grapes));
        assert_eq!(pairs.payout(Symbol::Lemon), 9);
    }

    #[test]
    fn test_deserialize_validates_entries() {
        let table = SymbolTable::with_payouts(&[(Symbol::Bell, 4), (Symbol::Bar, 2)]).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[{"symbol":"bell","payout":4},{"symbol":"bar","payout":2}]"#);
        assert_eq!(serde_json::from_str::<SymbolTable>(&json).unwrap(), table);

        assert!(serde_json::from_str::<SymbolTable>("[]").is_err());
        assert!(serde_json::from_str::<SymbolTable>(r#"{"entries":[]}"#).is_err());
        assert!(serde_json::from_str::<SymbolTable>(r#"[{"symbol":"bell","payout":0}]"#).is_err());
        assert!(
            serde_json::from_str::<SymbolTable>(
                r#"[{"symbol":"bell","payout":1},{"symbol":"bell","payout":2}]"#
            )
            .is_err()
        );
    }

    #[test]
    fn test_pick_maps_draw_to_catalog_position() {
        let table = SymbolTable::standard();
        let mut rng = ScriptedRandom::new(vec![0.0, 0.5, 0.999]);
        assert_eq!(table.pick(&mut rng), Symbol::Diamond);
        assert_eq!(table.pick(&mut rng), Symbol::Seven);
        assert_eq!(table.pick(&mut rng), Symbol::Grapes);
    }
}

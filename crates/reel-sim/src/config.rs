//! Simulation configuration

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::outcome::{ForcedRow, FORCED_RUN, WinProbability};
use crate::symbols::{SymbolEntry, SymbolTable};
use crate::timing::TimingProfile;

/// Reference column count
pub const COLS: u8 = 5;
/// Reference visible row count
pub const ROWS: u8 = 3;
/// Reference strip length (leaves scroll buffer above the visible window)
pub const STRIP_LENGTH: usize = 30;
/// Smallest wager, also the wager step
pub const MIN_WAGER: u64 = 1_000;
pub const MAX_WAGER: u64 = 100_000;
pub const DEFAULT_BALANCE: u64 = 20_670_000;
pub const DEFAULT_WAGER: u64 = 10_000;
pub const DEFAULT_WIN_PROBABILITY: f64 = 0.6;

/// Grid specification (columns × visible rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub cols: u8,
    /// Number of visible rows per reel
    pub rows: u8,
    /// Full strip length per reel
    pub strip_length: usize,
}

impl GridSpec {
    /// Standard 5×3 with 30-symbol strips
    pub fn standard_5x3() -> Self {
        Self {
            cols: COLS,
            rows: ROWS,
            strip_length: STRIP_LENGTH,
        }
    }

    /// Total visible positions
    pub fn total_positions(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Shortest strip that keeps a full window above and below the visible rows
    pub fn min_strip_length(&self) -> usize {
        3 * self.rows as usize
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.cols == 0 || self.rows == 0 {
            return Err(SimError::config("grid needs at least one column and one row"));
        }
        if (self.cols as usize) < FORCED_RUN {
            return Err(SimError::config(format!(
                "grid needs at least {FORCED_RUN} columns for forced wins, got {}",
                self.cols
            )));
        }
        let min_strip = self.min_strip_length();
        if self.strip_length < min_strip {
            return Err(SimError::config(format!(
                "strip length {} leaves no scroll buffer for {} visible rows (need at least {min_strip})",
                self.strip_length, self.rows
            )));
        }
        Ok(())
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_5x3()
    }
}

/// Wager bounds and step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WagerLimits {
    pub min: u64,
    pub max: u64,
    pub step: u64,
}

impl WagerLimits {
    pub fn standard() -> Self {
        Self {
            min: MIN_WAGER,
            max: MAX_WAGER,
            step: MIN_WAGER,
        }
    }

    /// Clamp a wager into `[min, max]`
    pub fn clamp(&self, wager: u64) -> u64 {
        wager.clamp(self.min, self.max)
    }

    /// `clamp(current + delta)`
    pub fn adjust(&self, current: u64, delta: i64) -> u64 {
        let moved = if delta >= 0 {
            current.saturating_add(delta.unsigned_abs())
        } else {
            current.saturating_sub(delta.unsigned_abs())
        };
        self.clamp(moved)
    }

    /// One step up
    pub fn increase(&self, current: u64) -> u64 {
        self.clamp(current.saturating_add(self.step))
    }

    /// One step down
    pub fn decrease(&self, current: u64) -> u64 {
        self.clamp(current.saturating_sub(self.step))
    }

    pub fn contains(&self, wager: u64) -> bool {
        (self.min..=self.max).contains(&wager)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.min == 0 {
            return Err(SimError::config("minimum wager must be positive"));
        }
        if self.min > self.max {
            return Err(SimError::config(format!(
                "minimum wager {} exceeds maximum {}",
                self.min, self.max
            )));
        }
        if self.step == 0 {
            return Err(SimError::config("wager step must be positive"));
        }
        Ok(())
    }
}

impl Default for WagerLimits {
    fn default() -> Self {
        Self::standard()
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Grid layout
    #[serde(default)]
    pub grid: GridSpec,
    /// Wager bounds
    #[serde(default)]
    pub wager: WagerLimits,
    /// Balance at session start
    pub starting_balance: u64,
    /// Wager at session start
    pub starting_wager: u64,
    /// Probability that a spin is flagged as a win
    pub win_probability: f64,
    /// Row that receives the forced winning run
    #[serde(default)]
    pub forced_row: ForcedRow,
    /// Animation timing
    #[serde(default)]
    pub timing: TimingProfile,
    /// Custom payout catalog (standard catalog when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payouts: Option<Vec<SymbolEntry>>,
}

impl SimConfig {
    /// Reference widget behavior
    pub fn reference() -> Self {
        Self {
            grid: GridSpec::standard_5x3(),
            wager: WagerLimits::standard(),
            starting_balance: DEFAULT_BALANCE,
            starting_wager: DEFAULT_WAGER,
            win_probability: DEFAULT_WIN_PROBABILITY,
            forced_row: ForcedRow::default(),
            timing: TimingProfile::Normal,
            payouts: None,
        }
    }

    /// Reference rules with short animations
    pub fn turbo() -> Self {
        Self {
            timing: TimingProfile::Turbo,
            ..Self::reference()
        }
    }

    /// Instant settlement, every spin wins (demos and shell testing)
    pub fn studio() -> Self {
        Self {
            win_probability: 1.0,
            forced_row: ForcedRow::Random,
            timing: TimingProfile::Instant,
            ..Self::reference()
        }
    }

    /// Check every field; spin execution assumes a validated config
    pub fn validate(&self) -> SimResult<()> {
        self.grid.validate()?;
        self.wager.validate()?;
        if !self.wager.contains(self.starting_wager) {
            return Err(SimError::config(format!(
                "starting wager {} outside [{}, {}]",
                self.starting_wager, self.wager.min, self.wager.max
            )));
        }
        WinProbability::new(self.win_probability)?;
        if let ForcedRow::Fixed(row) = self.forced_row {
            if row >= self.grid.rows {
                return Err(SimError::config(format!(
                    "forced row {row} outside the {} visible rows",
                    self.grid.rows
                )));
            }
        }
        self.symbol_table()?;
        Ok(())
    }

    /// Symbol catalog described by this config
    pub fn symbol_table(&self) -> SimResult<SymbolTable> {
        match &self.payouts {
            Some(entries) => SymbolTable::from_entries(entries.clone()),
            None => Ok(SymbolTable::standard()),
        }
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> SimResult<String> {
        Ok(serde_yml::to_string(self)?)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::reference()
    }
}

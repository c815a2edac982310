//! Reel engine: configuration, random source, session and statistics in one place

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::grid::ReelGrid;
use crate::outcome::{ForcedWin, WinProbability, select_outcome};
use crate::payout::evaluate;
use crate::rng::{RandomSource, StdRandom};
use crate::session::{Session, SpinOutcome, SpinPhase, SpinPlan, SpinRejection, TickOutcome};
use crate::symbols::{Symbol, SymbolTable};
use crate::timing::{TimingConfig, TimingProfile};

/// Reel simulation engine
///
/// Owns one sequential random source and one session. Spins are requested
/// with [`request_spin`](Self::request_spin) and advanced with
/// [`tick`](Self::tick) until they settle.
#[derive(Debug)]
pub struct ReelEngine<R: RandomSource = StdRandom> {
    /// Configuration
    config: SimConfig,
    /// Symbol catalog derived from the config
    table: SymbolTable,
    /// Timing derived from the config
    timing: TimingConfig,
    /// Random number generator
    rng: R,
    /// Balance, wager, phase and displayed grid
    session: Session,
    /// Current session stats
    stats: SessionStats,
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_wagered: u64,
    pub total_won: u64,
    pub wins: u64,
    pub losses: u64,
    /// Spins decided as a win (forced run injected)
    pub forced_wins: u64,
    pub biggest_win: u64,
    /// Paying rows per symbol
    pub symbol_wins: BTreeMap<Symbol, u64>,
}

impl SessionStats {
    /// Record a settled spin
    pub fn record(&mut self, outcome: &SpinOutcome) {
        let win = outcome.total_win();
        self.total_spins += 1;
        self.total_wagered = self.total_wagered.saturating_add(outcome.wager);
        self.total_won = self.total_won.saturating_add(win);
        if win > 0 {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        if outcome.forced.is_some() {
            self.forced_wins += 1;
        }
        self.biggest_win = self.biggest_win.max(win);
        for row_win in &outcome.evaluation.row_wins {
            *self.symbol_wins.entry(row_win.symbol).or_default() += 1;
        }
    }

    /// Fold another session's stats into this one
    pub fn merge(&mut self, other: &SessionStats) {
        self.total_spins += other.total_spins;
        self.total_wagered = self.total_wagered.saturating_add(other.total_wagered);
        self.total_won = self.total_won.saturating_add(other.total_won);
        self.wins += other.wins;
        self.losses += other.losses;
        self.forced_wins += other.forced_wins;
        self.biggest_win = self.biggest_win.max(other.biggest_win);
        for (symbol, count) in &other.symbol_wins {
            *self.symbol_wins.entry(*symbol).or_default() += count;
        }
    }

    /// Calculate RTP (percent)
    pub fn rtp(&self) -> f64 {
        if self.total_wagered > 0 {
            (self.total_won as f64 / self.total_wagered as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate (percent)
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

impl ReelEngine<StdRandom> {
    /// Create a new engine with the reference config, seeded from the OS
    pub fn new() -> Self {
        Self::assemble(
            SimConfig::reference(),
            SymbolTable::standard(),
            StdRandom::from_entropy(),
        )
    }

    /// Create with specific config, seeded from the OS
    pub fn with_config(config: SimConfig) -> SimResult<Self> {
        Self::with_rng(config, StdRandom::from_entropy())
    }

    /// Create with specific config and a fixed seed
    pub fn seeded(config: SimConfig, seed: u64) -> SimResult<Self> {
        Self::with_rng(config, StdRandom::seeded(seed))
    }

    /// Reseed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRandom::seeded(seed);
    }
}

impl Default for ReelEngine<StdRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> ReelEngine<R> {
    /// Create with specific config and random source
    pub fn with_rng(config: SimConfig, rng: R) -> SimResult<Self> {
        config.validate()?;
        let table = config.symbol_table()?;
        Ok(Self::assemble(config, table, rng))
    }

    fn assemble(config: SimConfig, table: SymbolTable, mut rng: R) -> Self {
        let grid = ReelGrid::random(&mut rng, &table, &config.grid);
        let session = Session::new(
            config.starting_balance,
            config.starting_wager,
            config.wager,
            grid,
        );
        Self {
            timing: TimingConfig::from_profile(config.timing),
            config,
            table,
            rng,
            session,
            stats: SessionStats::default(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Set the win probability used from the next spin on
    pub fn set_win_probability(&mut self, probability: f64) -> SimResult<()> {
        let probability = WinProbability::new(probability)?;
        self.config.win_probability = probability.value();
        Ok(())
    }

    /// Set timing profile (takes effect on the next spin)
    pub fn set_timing(&mut self, profile: TimingProfile) {
        self.config.timing = profile;
        self.timing = TimingConfig::from_profile(profile);
    }

    /// Move the wager by `delta`; ignored while spinning
    pub fn adjust_wager(&mut self, delta: i64) -> u64 {
        self.session.adjust_wager(delta)
    }

    pub fn increase_wager(&mut self) -> u64 {
        self.session.increase_wager()
    }

    pub fn decrease_wager(&mut self) -> u64 {
        self.session.decrease_wager()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn timing_config(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn grid(&self) -> &ReelGrid {
        self.session.grid()
    }

    pub fn balance(&self) -> u64 {
        self.session.balance()
    }

    pub fn wager(&self) -> u64 {
        self.session.wager()
    }

    pub fn phase(&self) -> SpinPhase {
        self.session.phase()
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.session.last_outcome()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Generate the final grid and decide the outcome for the next spin
    fn plan_spin(&mut self) -> SpinPlan {
        let mut final_grid = ReelGrid::random(&mut self.rng, &self.table, &self.config.grid);
        let decision = select_outcome(
            &mut self.rng,
            &self.table,
            &mut final_grid,
            self.config.win_probability,
            self.config.forced_row,
        );
        SpinPlan {
            final_grid,
            decision,
        }
    }

    /// Start a spin; returns the balance after the wager is deducted
    ///
    /// Rejected requests change nothing and draw no randomness.
    pub fn request_spin(&mut self) -> Result<u64, SpinRejection> {
        if let Err(rejection) = self.session.check_spin() {
            log::debug!("spin rejected: {rejection}");
            return Err(rejection);
        }
        let plan = self.plan_spin();
        self.session.begin_spin(plan, &self.timing)
    }

    /// Advance the spin in flight by one animation frame
    pub fn tick(&mut self) -> TickOutcome {
        let step = self.session.tick(&self.table);
        if let TickOutcome::Settled(outcome) = &step {
            self.stats.record(outcome);
        }
        step
    }

    /// Settle the spin in flight immediately
    pub fn settle(&mut self) -> Option<SpinOutcome> {
        let outcome = self.session.settle(&self.table)?;
        self.stats.record(&outcome);
        Some(outcome)
    }

    /// Request a spin and settle it without playing animation frames
    pub fn spin_to_completion(&mut self) -> Result<SpinOutcome, SpinRejection> {
        self.request_spin()?;
        self.settle().ok_or(SpinRejection::AlreadySpinning)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Export config as JSON
    pub fn export_config(&self) -> SimResult<String> {
        self.config.to_json()
    }

    /// Replace the config from JSON and start a fresh session under it
    pub fn import_config(&mut self, json: &str) -> SimResult<()> {
        if self.session.is_spinning() {
            return Err(SimError::SpinInProgress);
        }
        let config = SimConfig::from_json(json)?;
        let table = config.symbol_table()?;
        let grid = ReelGrid::random(&mut self.rng, &table, &config.grid);

        self.session = Session::new(
            config.starting_balance,
            config.starting_wager,
            config.wager,
            grid,
        );
        self.timing = TimingConfig::from_profile(config.timing);
        self.table = table;
        self.config = config;
        self.stats = SessionStats::default();
        log::debug!("config imported; session restarted");
        Ok(())
    }
}

/// Result of a stand-alone [`spin`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    pub final_grid: ReelGrid,
    pub total_win: u64,
    pub winning_rows: Vec<usize>,
    pub new_balance: u64,
    pub is_win: bool,
    pub forced: Option<ForcedWin>,
}

/// One complete spin without a session
///
/// The config is validated and its symbol catalog used, exactly as a
/// [`ReelEngine`] built from it would. Returns `Ok(None)` when
/// `balance < wager`; otherwise `new_balance = balance - wager + total_win`.
pub fn spin<R: RandomSource + ?Sized>(
    rng: &mut R,
    config: &SimConfig,
    balance: u64,
    wager: u64,
) -> SimResult<Option<SpinResult>> {
    config.validate()?;
    if balance < wager {
        return Ok(None);
    }
    let table = config.symbol_table()?;
    let mut final_grid = ReelGrid::random(rng, &table, &config.grid);
    let decision = select_outcome(
        rng,
        &table,
        &mut final_grid,
        config.win_probability,
        config.forced_row,
    );
    let evaluation = evaluate(&final_grid, decision.is_win, wager, &table);
    Ok(Some(SpinResult {
        winning_rows: evaluation.winning_rows(),
        total_win: evaluation.total_win,
        new_balance: (balance - wager).saturating_add(evaluation.total_win),
        is_win: decision.is_win,
        forced: decision.forced,
        final_grid,
    }))
}

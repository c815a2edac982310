//! Spin lifecycle state machine
//!
//! ```text
//!          request_spin            animation complete / settle()
//!   Idle ───────────────▶ Spinning ─────────────────────────────▶ Settling ──▶ Idle
//!    ▲                     │ tick(): scroll displayed reels                   │
//!    └─────────────────────┴──────────────────────────────────────────────────┘
//! ```
//!
//! The final grid and the win/lose decision are fixed when the spin starts;
//! animation frames only move the displayed reels and never touch the
//! decided outcome or the balance.

use serde::{Deserialize, Serialize};

use crate::config::WagerLimits;
use crate::grid::ReelGrid;
use crate::outcome::{ForcedWin, OutcomeDecision};
use crate::payout::{Evaluation, evaluate};
use crate::symbols::SymbolTable;
use crate::timing::{AnimationStep, SpinAnimation, TimingConfig};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinPhase {
    /// Accepting wager changes and spin requests
    Idle,
    /// Animation running; requests are ignored
    Spinning,
    /// Revealing the final grid and paying out
    Settling,
}

/// Why a spin request was refused
///
/// A rejection leaves the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinRejection {
    AlreadySpinning,
    InsufficientBalance { balance: u64, wager: u64 },
}

impl std::fmt::Display for SpinRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadySpinning => f.write_str("a spin is already in progress"),
            Self::InsufficientBalance { balance, wager } => {
                write!(f, "balance {balance} cannot cover wager {wager}")
            }
        }
    }
}

/// Outcome decided at spin start, revealed at settlement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinPlan {
    pub final_grid: ReelGrid,
    pub decision: OutcomeDecision,
}

/// Settled result of one spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub grid: ReelGrid,
    pub is_win: bool,
    pub forced: Option<ForcedWin>,
    pub evaluation: Evaluation,
    pub wager: u64,
    /// Balance before the wager was deducted
    pub balance_before: u64,
    pub balance_after: u64,
}

impl SpinOutcome {
    pub fn total_win(&self) -> u64 {
        self.evaluation.total_win
    }

    pub fn winning_rows(&self) -> Vec<usize> {
        self.evaluation.winning_rows()
    }
}

/// Result of one animation tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No spin in flight
    Idle,
    /// Intermediate frame
    Frame(u32),
    /// Animation finished and the spin settled
    Settled(SpinOutcome),
}

#[derive(Debug, Clone)]
struct PendingSpin {
    plan: SpinPlan,
    wager: u64,
    balance_before: u64,
    animation: SpinAnimation,
}

/// Economic and display state of one play session
#[derive(Debug, Clone)]
pub struct Session {
    balance: u64,
    wager: u64,
    limits: WagerLimits,
    phase: SpinPhase,
    /// Grid currently shown (scrolls while spinning)
    grid: ReelGrid,
    pending: Option<PendingSpin>,
    last_outcome: Option<SpinOutcome>,
}

impl Session {
    pub fn new(balance: u64, wager: u64, limits: WagerLimits, grid: ReelGrid) -> Self {
        Self {
            balance,
            wager: limits.clamp(wager),
            limits,
            phase: SpinPhase::Idle,
            grid,
            pending: None,
            last_outcome: None,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn wager(&self) -> u64 {
        self.wager
    }

    pub fn limits(&self) -> &WagerLimits {
        &self.limits
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase != SpinPhase::Idle
    }

    pub fn grid(&self) -> &ReelGrid {
        &self.grid
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }

    /// Animation progress of the spin in flight
    pub fn progress(&self) -> Option<f64> {
        self.pending.as_ref().map(|p| p.animation.progress())
    }

    /// Guard for `Idle → Spinning`
    pub fn check_spin(&self) -> Result<(), SpinRejection> {
        if self.is_spinning() {
            return Err(SpinRejection::AlreadySpinning);
        }
        if self.balance < self.wager {
            return Err(SpinRejection::InsufficientBalance {
                balance: self.balance,
                wager: self.wager,
            });
        }
        Ok(())
    }

    /// Start a spin with a pre-computed plan
    ///
    /// Deducts the wager and clears the previous outcome. Returns the
    /// balance after deduction.
    pub fn begin_spin(&mut self, plan: SpinPlan, timing: &TimingConfig) -> Result<u64, SpinRejection> {
        if let Err(rejection) = self.check_spin() {
            log::debug!("spin rejected: {rejection}");
            return Err(rejection);
        }

        let balance_before = self.balance;
        self.balance -= self.wager;
        self.last_outcome = None;
        self.phase = SpinPhase::Spinning;
        self.pending = Some(PendingSpin {
            plan,
            wager: self.wager,
            balance_before,
            animation: SpinAnimation::new(timing),
        });

        log::debug!(
            "spin started: wager {} balance {} -> {}",
            self.wager,
            balance_before,
            self.balance
        );
        Ok(self.balance)
    }

    /// Advance the animation by one frame, settling when it completes
    pub fn tick(&mut self, table: &SymbolTable) -> TickOutcome {
        let Some(pending) = self.pending.as_mut() else {
            return TickOutcome::Idle;
        };

        match pending.animation.tick() {
            AnimationStep::Frame(frame) => {
                self.grid.scroll();
                log::trace!("frame {frame}/{}", pending.animation.total_ticks());
                TickOutcome::Frame(frame)
            }
            AnimationStep::Complete => match self.settle(table) {
                Some(outcome) => TickOutcome::Settled(outcome),
                None => TickOutcome::Idle,
            },
        }
    }

    /// Reveal the final grid and pay out, skipping any remaining frames
    ///
    /// Returns `None` when no spin is in flight.
    pub fn settle(&mut self, table: &SymbolTable) -> Option<SpinOutcome> {
        let pending = self.pending.take()?;
        self.phase = SpinPhase::Settling;

        let SpinPlan {
            final_grid,
            decision,
        } = pending.plan;
        let evaluation = evaluate(&final_grid, decision.is_win, pending.wager, table);
        if evaluation.total_win > 0 {
            self.balance = self.balance.saturating_add(evaluation.total_win);
        }
        self.grid = final_grid;

        let outcome = SpinOutcome {
            grid: self.grid.clone(),
            is_win: decision.is_win,
            forced: decision.forced,
            evaluation,
            wager: pending.wager,
            balance_before: pending.balance_before,
            balance_after: self.balance,
        };
        self.last_outcome = Some(outcome.clone());
        self.phase = SpinPhase::Idle;

        log::debug!(
            "spin settled: win {} rows {:?} balance {}",
            outcome.total_win(),
            outcome.winning_rows(),
            self.balance
        );
        Some(outcome)
    }

    /// Move the wager by `delta`, clamped to the limits
    ///
    /// Ignored while a spin is in flight. Returns the wager in effect.
    pub fn adjust_wager(&mut self, delta: i64) -> u64 {
        if self.is_spinning() {
            log::debug!("wager change ignored while spinning");
            return self.wager;
        }
        self.wager = adjust_wager(self.wager, delta, &self.limits);
        self.wager
    }

    pub fn increase_wager(&mut self) -> u64 {
        self.adjust_wager(self.limits.step.min(i64::MAX as u64) as i64)
    }

    pub fn decrease_wager(&mut self) -> u64 {
        self.adjust_wager(-(self.limits.step.min(i64::MAX as u64) as i64))
    }
}

/// `clamp(current + delta, min, max)`
pub fn adjust_wager(current: u64, delta: i64, limits: &WagerLimits) -> u64 {
    limits.adjust(current, delta)
}

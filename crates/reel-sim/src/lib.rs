//! # reel-sim — Reel Simulation Engine
//!
//! Slot-machine simulation core: randomized reel strips, forced-win
//! injection, row-based payouts and a caller-driven spin lifecycle.
//!
//! ## Features
//!
//! - **Strip Generation**: uniform draws from a configurable symbol catalog
//! - **Outcome Control**: a win probability decides each spin; wins get a
//!   forced run of three identical symbols
//! - **Row Payouts**: `wager × multiplier × (count − 2)` for the most frequent
//!   symbol of each row
//! - **Spin Lifecycle**: `Idle → Spinning → Settling → Idle`, ticked by the shell
//! - **Batch Simulation**: parallel, reproducible RTP runs
//!
//! ## Architecture
//!
//! ```text
//! ReelEngine<R: RandomSource>
//!     │
//!     ├── SimConfig (grid, wager limits, probability, timing)
//!     ├── SymbolTable (symbols, multipliers)
//!     └── Session (balance, wager, phase, displayed grid)
//!           │
//!           v
//!     request_spin → SpinPlan (final grid + decision)
//!     tick…        → SpinAnimation frames
//!     settle       → evaluate → SpinOutcome
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod outcome;
pub mod payout;
pub mod rng;
pub mod session;
pub mod simulation;
pub mod strip;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use outcome::*;
pub use payout::*;
pub use rng::*;
pub use session::*;
pub use simulation::*;
pub use strip::*;
pub use symbols::*;
pub use timing::*;

//! Headless batch simulation
//!
//! Plays whole sessions with instant timing on a reproducible ChaCha source.
//! Batches run independent sessions in parallel, one engine per run.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::engine::{ReelEngine, SessionStats};
use crate::error::SimResult;
use crate::rng::ChaChaRandom;
use crate::timing::TimingProfile;

/// Result of one simulated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Run index within a batch (0 for a single session)
    pub run: usize,
    pub seed: u64,
    pub spins_requested: u64,
    pub spins_played: u64,
    /// Stopped early because the balance could not cover the wager
    pub busted: bool,
    pub starting_balance: u64,
    pub final_balance: u64,
    pub rtp: f64,
    pub hit_rate: f64,
    pub stats: SessionStats,
}

/// Aggregate of several independent sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub seed: u64,
    pub spins_per_run: u64,
    pub busted_runs: usize,
    pub rtp: f64,
    pub hit_rate: f64,
    pub totals: SessionStats,
    pub runs: Vec<SimulationReport>,
}

/// Seed for run `run` of a batch seeded with `seed` (run 0 keeps `seed`)
pub fn run_seed(seed: u64, run: usize) -> u64 {
    seed ^ (run as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Play up to `spins` spins in one session
pub fn simulate(config: &SimConfig, spins: u64, seed: u64) -> SimResult<SimulationReport> {
    let report = simulate_run(config, 0, spins, seed)?;
    log::info!(
        "simulated {} spins: rtp {:.2}% hit rate {:.2}% balance {} -> {}",
        report.spins_played,
        report.rtp,
        report.hit_rate,
        report.starting_balance,
        report.final_balance
    );
    Ok(report)
}

/// Play `runs` independent sessions in parallel and aggregate them
pub fn simulate_batch(config: &SimConfig, runs: usize, spins: u64, seed: u64) -> SimResult<BatchReport> {
    config.validate()?;

    let reports = (0..runs)
        .into_par_iter()
        .map(|run| simulate_run(config, run, spins, run_seed(seed, run)))
        .collect::<SimResult<Vec<_>>>()?;

    let mut totals = SessionStats::default();
    for report in &reports {
        totals.merge(&report.stats);
    }
    let busted_runs = reports.iter().filter(|r| r.busted).count();

    log::info!(
        "batch of {} runs x {} spins: rtp {:.2}% hit rate {:.2}% ({} busted)",
        runs,
        spins,
        totals.rtp(),
        totals.hit_rate(),
        busted_runs
    );

    Ok(BatchReport {
        seed,
        spins_per_run: spins,
        busted_runs,
        rtp: totals.rtp(),
        hit_rate: totals.hit_rate(),
        totals,
        runs: reports,
    })
}

fn simulate_run(config: &SimConfig, run: usize, spins: u64, seed: u64) -> SimResult<SimulationReport> {
    let config = SimConfig {
        timing: TimingProfile::Instant,
        ..config.clone()
    };
    let starting_balance = config.starting_balance;
    let mut engine = ReelEngine::with_rng(config, ChaChaRandom::seeded(seed))?;

    let mut busted = false;
    for _ in 0..spins {
        if let Err(rejection) = engine.spin_to_completion() {
            log::warn!(
                "run {run} stopped after {} spins: {rejection}",
                engine.stats().total_spins
            );
            busted = true;
            break;
        }
    }

    let stats = engine.stats().clone();
    Ok(SimulationReport {
        run,
        seed,
        spins_requested: spins,
        spins_played: stats.total_spins,
        busted,
        starting_balance,
        final_balance: engine.balance(),
        rtp: stats.rtp(),
        hit_rate: stats.hit_rate(),
        stats,
    })
}

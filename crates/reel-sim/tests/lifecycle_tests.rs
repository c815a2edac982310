//! End-to-end tests for reel-sim
//!
//! Covers the behavior a presentation shell relies on:
//! - Row payout formula and the loss suppression rule
//! - Forced wins always paying
//! - Balance bookkeeping across the spin lifecycle
//! - Wager clamping and requests ignored mid-spin
//! - Reproducibility of seeded engines and batch runs

use reel_sim::{
    ChaChaRandom, ForcedRow, ReelEngine, ReelGrid, ScriptedRandom, SimConfig, SpinPhase,
    SpinRejection, Symbol, SymbolTable, TickOutcome, WagerLimits, adjust_wager, evaluate,
    simulate, simulate_batch,
};

/// Scripted draw that picks `symbol` from the standard catalog
fn draw(symbol: Symbol) -> f64 {
    (symbol.index() as f64 + 0.5) / 9.0
}

/// Script for one reference spin: 5 strips × 30 draws, then the outcome draws
fn spin_script(visible_rows: [[Symbol; 5]; 3], tail: &[f64]) -> Vec<f64> {
    let mut script = Vec::new();
    for col in 0..5 {
        for pos in 0..30 {
            let symbol = if pos < 3 { visible_rows[pos][col] } else { Symbol::Grapes };
            script.push(draw(symbol));
        }
    }
    script.extend_from_slice(tail);
    script
}

fn settle_by_ticks<R: reel_sim::RandomSource>(engine: &mut ReelEngine<R>) -> reel_sim::SpinOutcome {
    loop {
        match engine.tick() {
            TickOutcome::Frame(_) => {}
            TickOutcome::Settled(outcome) => return outcome,
            TickOutcome::Idle => panic!("no spin in flight"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PAYOUT FORMULA
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_row_contribution_formula() {
    let table = SymbolTable::standard();
    let filler = [Symbol::Cherry, Symbol::Dice];

    for wager in [1_000u64, 7_000, 10_000, 100_000] {
        for symbol in [Symbol::Diamond, Symbol::Seven, Symbol::Grapes] {
            for k in 3..=5usize {
                let mut row = vec![symbol; k];
                row.extend(filler.iter().take(5 - k));
                let grid = ReelGrid::from_rows(&[row]);

                let eval = evaluate(&grid, true, wager, &table);
                assert_eq!(
                    eval.total_win,
                    wager * symbol.payout() * (k as u64 - 2),
                    "wager {wager} symbol {symbol} count {k}"
                );
            }
        }
    }
}

#[test]
fn test_five_bars_at_5000() {
    let grid = ReelGrid::from_rows(&[vec![Symbol::Bar; 5]]);
    let eval = evaluate(&grid, true, 5_000, &SymbolTable::standard());
    assert_eq!(eval.total_win, 150_000);
}

#[test]
fn test_loss_never_pays_incidental_matches() {
    let grid = ReelGrid::from_rows(&[
        vec![Symbol::Diamond; 5],
        vec![Symbol::Cherry; 5],
        vec![Symbol::Dice; 5],
    ]);
    let eval = evaluate(&grid, false, 100_000, &SymbolTable::standard());
    assert_eq!(eval.total_win, 0);
    assert!(eval.winning_rows().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPIN LIFECYCLE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_forced_diamond_run_pays_500k() {
    use Symbol::*;
    let rows = [
        [Bell, Cherry, Dice, Bell, Lemon],
        [Cherry, Dice, Bell, Seven, Bar],
        [Lemon, Watermelon, Grapes, Bar, Seven],
    ];
    // initial display grid, then the spin's grid, decision draw (win) and winning symbol
    let mut script = spin_script(rows, &[]);
    script.extend(spin_script(rows, &[0.0, draw(Diamond)]));

    let config = SimConfig {
        forced_row: ForcedRow::Fixed(0),
        ..SimConfig::reference()
    };
    let mut engine = ReelEngine::with_rng(config, ScriptedRandom::new(script)).unwrap();

    let start = engine.balance();
    assert_eq!(start, 20_670_000);
    assert_eq!(engine.request_spin(), Ok(20_660_000));
    assert_eq!(engine.phase(), SpinPhase::Spinning);

    let outcome = settle_by_ticks(&mut engine);
    assert!(outcome.is_win);
    assert_eq!(outcome.grid.row(0), vec![Diamond, Diamond, Diamond, Bell, Lemon]);
    assert_eq!(outcome.total_win(), 500_000);
    assert_eq!(outcome.winning_rows(), vec![0]);
    assert_eq!(engine.balance(), 21_160_000);
    assert_eq!(engine.balance() - start, 490_000);
}

#[test]
fn test_forced_win_always_pays() {
    let config = SimConfig {
        win_probability: 1.0,
        forced_row: ForcedRow::Random,
        ..SimConfig::turbo()
    };
    let mut engine = ReelEngine::with_rng(config, ChaChaRandom::seeded(2024)).unwrap();

    for _ in 0..300 {
        engine.request_spin().unwrap();
        let outcome = settle_by_ticks(&mut engine);
        let forced = outcome.forced.expect("win spins carry an injection");
        assert!(outcome.total_win() > 0);
        assert!(outcome.winning_rows().contains(&forced.row));
        let row = outcome.grid.row(forced.row);
        assert!(row[..3].iter().all(|&s| s == forced.symbol));
    }
}

#[test]
fn test_zero_probability_over_1000_spins() {
    let config = SimConfig {
        win_probability: 0.0,
        ..SimConfig::studio()
    };
    let mut engine = ReelEngine::with_rng(config, ChaChaRandom::seeded(77)).unwrap();
    for _ in 0..1000 {
        let outcome = engine.spin_to_completion().unwrap();
        assert_eq!(outcome.total_win(), 0);
        assert!(outcome.winning_rows().is_empty());
        assert!(outcome.forced.is_none());
    }
    assert_eq!(engine.balance(), 20_670_000 - 1000 * 10_000);
    assert_eq!(engine.stats().losses, 1000);
}

#[test]
fn test_balance_identity_every_spin() {
    let mut engine = ReelEngine::seeded(SimConfig::turbo(), 31337).unwrap();
    for _ in 0..500 {
        let before = engine.balance();
        let wager = engine.wager();
        engine.request_spin().unwrap();
        assert_eq!(engine.balance(), before - wager);

        let outcome = settle_by_ticks(&mut engine);
        assert_eq!(outcome.balance_before, before);
        assert_eq!(engine.balance(), before - wager + outcome.total_win());
    }
}

#[test]
fn test_requests_mid_spin_change_nothing() {
    let mut engine = ReelEngine::seeded(SimConfig::reference(), 8).unwrap();
    engine.request_spin().unwrap();
    for _ in 0..10 {
        engine.tick();
    }

    let balance = engine.balance();
    let wager = engine.wager();
    let grid = engine.grid().clone();

    assert_eq!(engine.request_spin(), Err(SpinRejection::AlreadySpinning));
    assert_eq!(engine.increase_wager(), wager);
    assert_eq!(engine.decrease_wager(), wager);
    assert_eq!(engine.balance(), balance);
    assert_eq!(engine.wager(), wager);
    assert_eq!(engine.grid(), &grid);
}

#[test]
fn test_settlement_ignores_animation_frames() {
    let mut a = ReelEngine::with_rng(SimConfig::reference(), ChaChaRandom::seeded(5)).unwrap();
    let mut b = ReelEngine::with_rng(SimConfig::reference(), ChaChaRandom::seeded(5)).unwrap();

    a.request_spin().unwrap();
    let ticked = settle_by_ticks(&mut a);

    b.request_spin().unwrap();
    let settled = b.settle().unwrap();

    assert_eq!(ticked, settled);
}

#[test]
fn test_visible_windows_are_strip_slices() {
    let mut engine = ReelEngine::seeded(SimConfig::reference(), 44).unwrap();
    for _ in 0..20 {
        engine.request_spin().unwrap();
        engine.tick();
        engine.tick();
        let grid = engine.grid();
        for col in 0..grid.cols() {
            let strip = grid.reel(col);
            assert_eq!(grid.column(col), strip.window(grid.stop(col), grid.rows()));
        }
        settle_by_ticks(&mut engine);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WAGER
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_wager_clamps_at_bounds() {
    let limits = WagerLimits::standard();
    let mut wager = 10_000;
    for _ in 0..500 {
        wager = adjust_wager(wager, 1_000, &limits);
    }
    assert_eq!(wager, 100_000);
    for _ in 0..500 {
        wager = adjust_wager(wager, -1_000, &limits);
    }
    assert_eq!(wager, 1_000);

    let mut engine = ReelEngine::new();
    for _ in 0..200 {
        engine.increase_wager();
    }
    assert_eq!(engine.wager(), 100_000);
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPRODUCIBILITY & BATCH
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_seeded_engines_reproduce() {
    let mut a = ReelEngine::seeded(SimConfig::studio(), 1234).unwrap();
    let mut b = ReelEngine::seeded(SimConfig::studio(), 1234).unwrap();
    assert_eq!(a.grid(), b.grid());
    for _ in 0..100 {
        assert_eq!(a.spin_to_completion(), b.spin_to_completion());
    }
}

#[test]
fn test_hit_rate_tracks_probability() {
    let report = simulate(&SimConfig::reference(), 20_000, 11).unwrap();
    assert_eq!(report.spins_played, 20_000);
    assert_eq!(report.stats.wins, report.stats.forced_wins);
    assert!((report.hit_rate - 60.0).abs() < 2.0, "hit rate {}", report.hit_rate);
}

#[test]
fn test_batch_is_deterministic_and_serializable() {
    let config = SimConfig::reference();
    let a = simulate_batch(&config, 3, 250, 100).unwrap();
    let b = simulate_batch(&config, 3, 250, 100).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.totals.total_spins, 750);

    let json = serde_json::to_string(&a).unwrap();
    assert!(json.contains("\"busted_runs\""));
}

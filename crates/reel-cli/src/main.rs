//! reel-cli — terminal shell for the reel simulation engine
//!
//! Usage:
//!   reel-cli play [--spins N] [--seed S] [--frames]   - Play spins in one session
//!   reel-cli simulate [--spins N] [--runs R] [--json]  - Batch RTP simulation
//!   reel-cli config [--format json|yaml]               - Print the default config

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use reel_sim::{
    ReelEngine, SimConfig, SpinOutcome, TickOutcome, simulate, simulate_batch,
};

#[derive(Parser)]
#[command(name = "reel-cli", about = "Reel simulation terminal shell")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play spins in one session, printing each settled grid
    Play {
        /// Number of spins to request
        #[arg(short, long, default_value_t = 10)]
        spins: u64,
        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,
        /// Config file (.json, .yaml or .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the win probability
        #[arg(short, long)]
        probability: Option<f64>,
        /// Override the starting wager
        #[arg(short, long)]
        wager: Option<u64>,
        /// Print every animation frame
        #[arg(long)]
        frames: bool,
    },
    /// Run a batch simulation and print the report
    Simulate {
        /// Spins per run
        #[arg(short, long, default_value_t = 10_000)]
        spins: u64,
        /// Independent sessions (run in parallel)
        #[arg(short, long, default_value_t = 1)]
        runs: usize,
        /// Base seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Config file (.json, .yaml or .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the default configuration
    Config {
        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Json)]
        format: ConfigFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => bail!(
                "Unsupported config extension for {} (expected .json, .yaml or .yml)",
                path.display()
            ),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            spins,
            seed,
            config,
            probability,
            wager,
            frames,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(wager) = wager {
                config.starting_wager = wager;
            }
            if let Some(probability) = probability {
                config.win_probability = probability;
            }
            play(config, spins, seed, frames)
        }
        Commands::Simulate {
            spins,
            runs,
            seed,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            run_simulation(&config, spins, runs, seed, json)
        }
        Commands::Config { format } => {
            let config = SimConfig::default();
            let text = match format {
                ConfigFormat::Json => config.to_json(),
                ConfigFormat::Yaml => config.to_yaml(),
            }
            .context("Failed to serialize default config")?;
            println!("{text}");
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_config(path, &text)
}

fn parse_config(path: &Path, text: &str) -> Result<SimConfig> {
    let config = match ConfigFormat::from_path(path)? {
        ConfigFormat::Json => SimConfig::from_json(text),
        ConfigFormat::Yaml => SimConfig::from_yaml(text),
    }
    .with_context(|| format!("Invalid config {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn play(config: SimConfig, spins: u64, seed: Option<u64>, frames: bool) -> Result<()> {
    let mut engine = match seed {
        Some(seed) => ReelEngine::seeded(config, seed),
        None => ReelEngine::with_config(config),
    }
    .context("Failed to start session")?;

    println!("🎰 Balance {}  Wager {}\n", engine.balance(), engine.wager());
    println!("{}\n", engine.grid().render(true));

    for spin in 1..=spins {
        if let Err(rejection) = engine.request_spin() {
            println!("Spin {spin} rejected: {rejection}");
            break;
        }

        let outcome = loop {
            match engine.tick() {
                TickOutcome::Frame(frame) => {
                    if frames {
                        println!("frame {frame}\n{}\n", engine.grid().render(true));
                    }
                }
                TickOutcome::Settled(outcome) => break outcome,
                TickOutcome::Idle => bail!("Spin {spin} vanished before settling"),
            }
        };
        print_outcome(spin, &outcome);
    }

    let stats = engine.stats();
    println!(
        "Spins {}  Won {}  Wagered {}  RTP {:.2}%  Hit rate {:.2}%  Balance {}",
        stats.total_spins,
        stats.total_won,
        stats.total_wagered,
        stats.rtp(),
        stats.hit_rate(),
        engine.balance()
    );
    Ok(())
}

fn print_outcome(spin: u64, outcome: &SpinOutcome) {
    println!("── Spin {spin} ──");
    println!("{}", outcome.grid.render(true));
    if outcome.total_win() > 0 {
        for row_win in &outcome.evaluation.row_wins {
            println!(
                "  row {}: {} x{} pays {}",
                row_win.row + 1,
                row_win.symbol.glyph(),
                row_win.count,
                row_win.amount
            );
        }
        println!("  WIN {}", outcome.total_win());
    } else {
        println!("  no win");
    }
    println!("  balance {}\n", outcome.balance_after);
}

fn run_simulation(config: &SimConfig, spins: u64, runs: usize, seed: u64, json: bool) -> Result<()> {
    if runs <= 1 {
        let report = simulate(config, spins, seed).context("Simulation failed")?;
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!(
                "Spins {}/{}  RTP {:.2}%  Hit rate {:.2}%  Biggest win {}  Balance {} -> {}{}",
                report.spins_played,
                report.spins_requested,
                report.rtp,
                report.hit_rate,
                report.stats.biggest_win,
                report.starting_balance,
                report.final_balance,
                if report.busted { "  (busted)" } else { "" }
            );
        }
        return Ok(());
    }

    let batch = simulate_batch(config, runs, spins, seed).context("Batch simulation failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }
    for report in &batch.runs {
        println!(
            "run {:>3}  seed {:>20}  spins {:>8}  RTP {:>9.2}%  balance {}",
            report.run, report.seed, report.spins_played, report.rtp, report.final_balance
        );
    }
    println!(
        "\nTotal spins {}  RTP {:.2}%  Hit rate {:.2}%  Busted runs {}/{}",
        batch.totals.total_spins, batch.rtp, batch.hit_rate, batch.busted_runs, runs
    );
    for (symbol, count) in &batch.totals.symbol_wins {
        println!("  {} {:>8} paying rows", symbol.glyph(), count);
    }
    Ok(())
}

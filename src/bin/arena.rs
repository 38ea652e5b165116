use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use connect_four_ai::ai::{Agent, Difficulty, EngineAgent, RandomAgent, SearchEngine};
use connect_four_ai::arena::{play_match, MatchReport};
use connect_four_ai::config::EngineConfig;

/// Pit two Connect Four agents against each other.
#[derive(Parser)]
#[command(name = "arena", about = "Play headless Connect Four matches")]
struct Cli {
    /// First contender: easy, medium, hard, or random
    #[arg(long, default_value = "hard")]
    first: String,

    /// Second contender: easy, medium, hard, or random
    #[arg(long, default_value = "medium")]
    second: String,

    /// Number of games (the first mover alternates)
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Seed for reproducible matches; the second contender uses seed + 1
    #[arg(long)]
    seed: Option<u64>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "engine.toml")]
    config: PathBuf,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn build_agent(
    contender: &str,
    config: &EngineConfig,
    seed: Option<u64>,
) -> Result<Box<dyn Agent>> {
    if contender.eq_ignore_ascii_case("random") {
        let agent = match seed {
            Some(seed) => RandomAgent::with_seed(seed),
            None => RandomAgent::new(),
        };
        return Ok(Box::new(agent));
    }

    let difficulty: Difficulty = contender
        .parse()
        .with_context(|| format!("parsing contender '{contender}'"))?;
    let engine = match seed {
        Some(seed) => SearchEngine::with_seed(config.clone(), seed),
        None => SearchEngine::new(config.clone()),
    }
    .context("building search engine")?;
    Ok(Box::new(EngineAgent::new(engine, difficulty)))
}

fn print_summary(report: &MatchReport) {
    println!("{} vs {} over {} games", report.first, report.second, report.games);
    println!(
        "  {:<16} {:>4} wins ({:.1}%)",
        report.first,
        report.first_wins,
        report.first_win_rate() * 100.0
    );
    println!(
        "  {:<16} {:>4} wins ({:.1}%)",
        report.second,
        report.second_wins,
        report.second_win_rate() * 100.0
    );
    println!(
        "  {:<16} {:>4}      ({:.1}%)",
        "draws",
        report.draws,
        report.draw_rate() * 100.0
    );
    println!("  average length: {:.1} moves", report.average_length);
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.print_default_config {
        let toml = EngineConfig::default_toml().context("serializing default config")?;
        print!("{toml}");
        return Ok(());
    }

    if cli.games == 0 {
        bail!("--games must be at least 1");
    }

    let config = EngineConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let mut first = build_agent(&cli.first, &config, cli.seed)?;
    let mut second = build_agent(&cli.second, &config, cli.seed.map(|s| s.wrapping_add(1)))?;

    let report = play_match(first.as_mut(), second.as_mut(), cli.games).context("match aborted")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("serializing match report")?;
        println!("{json}");
    } else {
        print_summary(&report);
    }

    Ok(())
}

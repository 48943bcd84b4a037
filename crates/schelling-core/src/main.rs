//! Schelling Segregation Simulator
//!
//! Runs one simulation to convergence and reports the final metrics.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use schelling_core::config::DEFAULT_CONFIG_PATH;
use schelling_core::{run_simulation, Config, UnhappinessRule};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "schelling_sim")]
#[command(about = "Schelling segregation with social-network opinion dynamics")]
struct Args {
    /// TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of ticks to simulate
    #[arg(long)]
    max_ticks: Option<u64>,

    #[arg(long)]
    grid_size: Option<usize>,

    #[arg(long)]
    num_races: Option<usize>,

    #[arg(long)]
    empty_fraction: Option<f64>,

    #[arg(long)]
    initial_opinion_split: Option<f64>,

    #[arg(long)]
    social_force: Option<f64>,

    #[arg(long)]
    social_temperature: Option<f64>,

    #[arg(long)]
    move_rate: Option<f64>,

    #[arg(long, value_enum)]
    rule: Option<RuleArg>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RuleArg {
    Minority,
    Dominated,
}

impl From<RuleArg> for UnhappinessRule {
    fn from(arg: RuleArg) -> Self {
        match arg {
            RuleArg::Minority => UnhappinessRule::Minority,
            RuleArg::Dominated => UnhappinessRule::Dominated,
        }
    }
}

impl Args {
    /// Command-line values take precedence over the file
    fn apply(&self, config: &mut Config) {
        let model = &mut config.model;
        let run = &mut config.run;
        if let Some(v) = self.seed {
            run.seed = v;
        }
        if let Some(v) = self.max_ticks {
            run.max_ticks = v;
        }
        if let Some(v) = self.grid_size {
            model.grid_size = v;
        }
        if let Some(v) = self.num_races {
            model.num_races = v;
        }
        if let Some(v) = self.empty_fraction {
            model.empty_fraction = v;
        }
        if let Some(v) = self.initial_opinion_split {
            model.initial_opinion_split = v;
        }
        if let Some(v) = self.social_force {
            model.social_force = v;
        }
        if let Some(v) = self.social_temperature {
            model.social_temperature = v;
        }
        if let Some(v) = self.move_rate {
            model.move_rate = v;
        }
        if let Some(v) = self.rule {
            model.unhappiness_rule = v.into();
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("schelling_core=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::load_or_default(&args.config);
    args.apply(&mut config);

    tracing::info!(
        seed = config.run.seed,
        grid_size = config.model.grid_size,
        num_races = config.model.num_races,
        rule = ?config.model.unhappiness_rule,
        "Starting simulation"
    );

    let outcome = run_simulation(&config)?;
    let summary = &outcome.summary;

    if args.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("runtime      {:>6}", summary.ticks);
        println!("converged    {:>6}", summary.converged);
        println!("pct happy    {:>6.2}", summary.pct_happy);
        match summary.pct_same {
            Some(same) => println!("pct same     {:>6.2}", same),
            None => println!("pct same        n/a"),
        }
        println!("no pref      {:>6.3}", summary.no_preference_fraction);
        println!("mean degree  {:>6.2}", summary.network.mean_degree);
    }
    Ok(())
}

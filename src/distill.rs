//! Run the repetition-code correction round over every pattern of bit-flip
//! errors on the data qubits and print the distribution of outcomes.

use clap::Parser;
use tracing::info;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt, EnvFilter };
use tableau_sim::{
    config::SimConfig,
    protocol,
    storage::StorageKind,
};

#[derive(Parser, Debug)]
#[command(version, about = "Sweep a 5-qubit error-correction round over all error patterns")]
struct Args {
    /// Base seed for all trials; omit for fresh entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Trials per error pattern.
    #[arg(short, long, default_value_t = 100)]
    trials: usize,

    /// Tableau backend: `dense` or `packed`.
    #[arg(long, default_value_t = StorageKind::Packed)]
    storage: StorageKind,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = SimConfig {
        seed: args.seed,
        trials: args.trials,
        storage: args.storage,
        ..SimConfig::default()
    };
    config.validate()?;
    info!(trials = config.trials, storage = %config.storage, "starting sweep");

    let result = protocol::sweep(&config)?;
    for outcome in result.0.iter() {
        let errors: String
            = if outcome.errors.is_empty() {
                "none".to_string()
            } else {
                outcome.errors.iter()
                    .map(|k| k.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            };
        let category
            = outcome.tally.unanimous()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "mixed".to_string());
        println!("errors {:>5} | {:>12} | {}", errors, category, outcome.tally);
    }
    println!("by pattern: {}", result.by_subset());
    println!("all trials: {}", result.total());
    Ok(())
}

//! Print the tableau of a small register after each layer of a cluster-state
//! style circuit, then measure every qubit.

use clap::Parser;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt, EnvFilter };
use tableau_sim::{
    config::SimConfig,
    error::TableauResult,
    storage::{ Dense, Packed, Storage, StorageKind },
    tableau::Tableau,
};

#[derive(Parser, Debug)]
#[command(version, about = "Show the stabilizer tableau as a circuit runs")]
struct Args {
    /// Number of qubits.
    #[arg(short, default_value_t = 4)]
    n: usize,

    /// Number of H + CZ layers.
    #[arg(short, long, default_value_t = SimConfig::default().depth)]
    depth: usize,

    /// Seed for the final measurements; omit for fresh entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Tableau backend: `dense` or `packed`.
    #[arg(long, default_value_t = StorageKind::Packed)]
    storage: StorageKind,

    /// Print stabilizer/destabilizer pairs instead of the raw grid.
    #[arg(long, default_value_t = false)]
    group: bool,
}

fn show<S: Storage>(t: usize, stab: &Tableau<S>, group: bool) {
    println!("t={}", t);
    if group {
        println!("{}", stab.as_group());
    } else {
        println!("{}", stab);
    }
}

fn run<S: Storage>(args: &Args, config: &SimConfig) -> TableauResult<()> {
    let mut stab: Tableau<S> = Tableau::new(args.n);
    show(0, &stab, args.group);
    for t in 1..=config.depth {
        (0..args.n).try_for_each(|k| stab.apply_h(k).map(|_| ()))?;
        let offs = if t % 2 == 1 { 0 } else { 1 };
        (offs..args.n.saturating_sub(1)).step_by(2)
            .try_for_each(|k| stab.apply_cz(k, k + 1).map(|_| ()))?;
        show(t, &stab, args.group);
    }
    let mut rng = config.rng(0);
    let outcomes: Vec<String>
        = (0..args.n)
        .map(|k| stab.measure(k, &mut rng).map(|m| m.to_string()))
        .collect::<TableauResult<_>>()?;
    println!("measured: {}", outcomes.join(" "));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = SimConfig {
        seed: args.seed,
        storage: args.storage,
        depth: args.depth,
        ..SimConfig::default()
    };
    config.validate()?;
    match config.storage {
        StorageKind::Dense => run::<Dense>(&args, &config)?,
        StorageKind::Packed => run::<Packed>(&args, &config)?,
    }
    Ok(())
}

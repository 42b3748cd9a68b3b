use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use indicatif::ProgressBar;
use jointsim::core::provision::provision;
use jointsim::core::report::Reporter;
use jointsim::core::run::generate;
use jointsim::core::units::Coins;
use jointsim::core::{Spec, WorkloadDriver};
use jointsim::ledger::{DeadlineLedger, MemoryLedger};
use jointsim::utils::{self, JsonReporter, PlotDataReporter, TopologySpec};
use log::{info, warn};
use rand::prelude::*;

/// Measure direct-payment success on a synthetic credit network.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Read run parameters from a JSON file. Flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of users
    #[arg(short = 'n', long)]
    users: Option<usize>,
    /// Power-law exponent of the degree distribution
    #[arg(long)]
    exponent: Option<f64>,
    /// Mean relationship capacity in coins
    #[arg(long)]
    capacity_mean: Option<f64>,
    /// Number of payment trials
    #[arg(short, long)]
    trials: Option<u64>,
    /// Trials between two success-ratio samples
    #[arg(short, long)]
    interval: Option<u64>,
    /// Amount paid in every trial, in coins
    #[arg(long)]
    payment: Option<f64>,
    /// Smallest ledger units per coin
    #[arg(long)]
    units_per_coin: Option<u128>,
    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,
    /// Load the network from a topology file instead of generating one
    #[arg(long)]
    topology: Option<PathBuf>,
    /// Save the network to a topology file
    #[arg(long)]
    save_topology: Option<PathBuf>,
    /// Give up on a ledger call after this many milliseconds
    #[arg(long, default_value_t = 5_000)]
    ledger_timeout_ms: u64,
    /// Write the success-ratio series as JSON
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Write the success-ratio series as two-column plot data
    #[arg(long)]
    plot_data: Option<PathBuf>,
}

impl Args {
    fn spec(&self) -> anyhow::Result<Spec> {
        let mut spec = match &self.config {
            Some(path) => utils::read_spec(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            None => Spec::default(),
        };
        if let Some(n) = self.users {
            spec.nr_users = n;
        }
        if let Some(exponent) = self.exponent {
            spec.exponent = exponent;
        }
        if let Some(mean) = self.capacity_mean {
            spec.capacity_mean = Coins::new(mean);
        }
        if let Some(trials) = self.trials {
            spec.nr_trials = trials;
        }
        if let Some(interval) = self.interval {
            spec.sample_interval = interval;
        }
        if let Some(payment) = self.payment {
            spec.payment = Coins::new(payment);
        }
        if let Some(units) = self.units_per_coin {
            spec.units_per_coin = units;
        }
        if let Some(seed) = self.seed {
            spec.seed = seed;
        }
        Ok(spec)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let spec = args.spec()?.validate()?;
    let mut rng = StdRng::seed_from_u64(spec.seed);

    let network = match &args.topology {
        Some(path) => utils::read_network(path)
            .with_context(|| format!("failed to load topology from {}", path.display()))?,
        None => generate(&spec, &mut rng)?,
    };
    if let Some(path) = &args.save_topology {
        utils::write_topology_spec(path, &TopologySpec::from(&network))
            .with_context(|| format!("failed to save topology to {}", path.display()))?;
        info!("Saved topology to {}", path.display());
    }

    let mut driver = WorkloadDriver::new(network.nr_users(), spec.workload_opts())?;
    let timeout = Duration::from_millis(args.ledger_timeout_ms);
    let mut ledger =
        DeadlineLedger::spawn(MemoryLedger::new(), timeout).context("failed to start ledger")?;
    let provisioned = provision(&network, &mut ledger, spec.units_per_coin);
    if provisioned.users_registered == 0 && network.nr_users() > 0 {
        warn!(
            "Ledger registered none of {} users; every trial will fail",
            network.nr_users()
        );
    }

    info!("Running {} trials", driver.nr_trials());
    let bar = ProgressBar::new(driver.nr_trials());
    while driver.step(&mut ledger, &mut rng).is_some() {
        bar.inc(1);
    }
    bar.finish_and_clear();
    let report = driver.into_report();

    println!(
        "users: {}/{} registered, relationships: {}/{} opened",
        provisioned.users_registered,
        network.nr_users(),
        provisioned.relationships_opened,
        network.nr_relationships()
    );
    println!(
        "payments: {}/{} settled, success ratio {}",
        report.tally.successes(),
        report.tally.trials(),
        report.tally.ratio()
    );

    if let Some(path) = &args.out {
        JsonReporter::new(path)
            .report(&report.samples)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.plot_data {
        PlotDataReporter::new(path)
            .report(&report.samples)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

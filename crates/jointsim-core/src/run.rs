use log::info;
use rand::prelude::*;

use crate::capacity::{self, CapacityError};
use crate::degree::{self, DegreeError};
use crate::ledger::LedgerGateway;
use crate::network::{builder, Network, TopologyError, User};
use crate::provision::{self, ProvisionReport};
use crate::report::Reporter;
use crate::spec::{Spec, SpecError, ValidSpec};
use crate::workload::{WorkloadDriver, WorkloadError, WorkloadReport};

/// The core `jointsim` routine. This generates a network from `spec`, provisions it
/// on `ledger`, runs the payment workload against it and hands the samples to `reporter`.
///
/// Every random choice is drawn from a single generator seeded with `spec.seed`, so equal
/// specifications run against equally behaving ledgers produce equal reports.
///
/// This function returns an error before touching the ledger if `spec` is invalid.
/// Ledger faults never abort a run; they show up in the report.
pub fn run<L, P>(spec: Spec, ledger: &mut L, reporter: &mut P) -> Result<RunReport, Error>
where
    L: LedgerGateway + ?Sized,
    P: Reporter + ?Sized,
{
    let spec = spec.validate()?;
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let network = generate(&spec, &mut rng)?;
    simulate(&spec, network, ledger, reporter, &mut rng)
}

/// Generates a network: power-law degree targets, a topology approximating them, and
/// exponentially distributed capacities.
pub fn generate<R>(spec: &ValidSpec, rng: &mut R) -> Result<Network, Error>
where
    R: Rng + ?Sized,
{
    let targets = degree::power_law_sequence(spec.nr_users, spec.exponent, rng)?;
    let topology = builder::build(User::population(spec.nr_users), &targets, rng)?;
    let network = capacity::assign(&topology, spec.capacity_mean, rng)?;
    info!(
        "Generated {} users with {} relationships (max degree {})",
        network.nr_users(),
        network.nr_relationships(),
        network.degrees().into_iter().max().unwrap_or(0)
    );
    Ok(network)
}

/// Provisions an existing network on `ledger` and runs the payment workload against it.
pub fn simulate<L, P, R>(
    spec: &ValidSpec,
    network: Network,
    ledger: &mut L,
    reporter: &mut P,
    rng: &mut R,
) -> Result<RunReport, Error>
where
    L: LedgerGateway + ?Sized,
    P: Reporter + ?Sized,
    R: Rng + ?Sized,
{
    let driver = WorkloadDriver::new(network.nr_users(), spec.workload_opts())?;
    let provision = provision::provision(&network, ledger, spec.units_per_coin);
    let workload = driver.run(ledger, rng);
    reporter
        .report(&workload.samples)
        .map_err(|e| Error::Report(Box::new(e)))?;
    Ok(RunReport {
        network,
        provision,
        workload,
    })
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub network: Network,
    pub provision: ProvisionReport,
    pub workload: WorkloadReport,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    InvalidSpec(#[from] SpecError),

    #[error("failed to generate degree targets")]
    Degree(#[from] DegreeError),

    #[error("failed to build topology")]
    Topology(#[from] TopologyError),

    #[error("failed to assign capacities")]
    Capacity(#[from] CapacityError),

    #[error("failed to set up workload")]
    Workload(#[from] WorkloadError),

    #[error("failed to report samples")]
    Report(#[source] Box<dyn std::error::Error + Send + Sync>),
}

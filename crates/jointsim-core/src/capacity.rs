//! Relationship capacities.

use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::network::{FundedLink, Link, Network, Topology};
use crate::units::Coins;

/// Funds every relationship in `topology` with an independent exponential draw of mean `mean`.
/// Relationships keep their order.
pub fn assign<R>(
    topology: &Topology<Link>,
    mean: Coins,
    rng: &mut R,
) -> Result<Network, CapacityError>
where
    R: Rng + ?Sized,
{
    if !mean.is_positive() {
        return Err(CapacityError::InvalidMean(mean));
    }
    let exp = Exp::new(mean.into_f64().recip()).map_err(|_| CapacityError::InvalidMean(mean))?;
    let funded = topology.map_relationships(|link| {
        let capacity = Coins::new(exp.sample(rng));
        FundedLink::from_link(link, capacity)
    });
    Ok(Network::from_topology(funded))
}

#[derive(Debug, thiserror::Error)]
pub enum CapacityError {
    #[error("capacity mean must be positive and finite (got {0})")]
    InvalidMean(Coins),
}

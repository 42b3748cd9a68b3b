pub mod builder;
pub(crate) mod topology;
pub mod types;

pub use topology::{Topology, TopologyError};
pub use types::*;

use crate::units::Coins;

/// A credit network: users and the funded relationships between them.
#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology<FundedLink>,
}

impl Network {
    /// Creates a network from explicit users and funded relationships, checking the properties
    /// listed in [`Topology::new`].
    pub fn new(users: &[User], relationships: &[FundedLink]) -> Result<Self, TopologyError> {
        let topology = Topology::new(users, relationships)?;
        Ok(Self { topology })
    }

    pub(crate) fn from_topology(topology: Topology<FundedLink>) -> Self {
        Self { topology }
    }

    /// The capacity funded between `x` and `y`, if they share a relationship.
    pub fn capacity_between(&self, x: UserId, y: UserId) -> Option<Coins> {
        self.topology.relationship(x, y).map(|r| r.capacity)
    }

    /// The unfunded view of this network's relationships, in provisioning order.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        self.topology.relationships().map(|r| r.link())
    }

    /// The topology underlying this network.
    pub fn topology(&self) -> &Topology<FundedLink> {
        &self.topology
    }

    delegate::delegate! {
        to self.topology {
            pub fn users(&self) -> impl Iterator<Item = &User>;

            pub fn relationships(&self) -> impl Iterator<Item = &FundedLink>;

            #[call(contains)]
            pub fn has_relationship(&self, x: UserId, y: UserId) -> bool;

            pub fn degree(&self, id: UserId) -> usize;

            pub fn degrees(&self) -> Vec<usize>;

            pub fn nr_users(&self) -> usize;

            pub fn nr_relationships(&self) -> usize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacities_are_looked_up_in_either_order() -> anyhow::Result<()> {
        let users = User::population(3);
        let relationships = [
            FundedLink::new(UserId::new(1), UserId::new(0), Coins::new(4.0)),
            FundedLink::new(UserId::new(1), UserId::new(2), Coins::new(0.5)),
        ];
        let network = Network::new(&users, &relationships)?;
        assert_eq!(
            network.capacity_between(UserId::new(0), UserId::new(1)),
            Some(Coins::new(4.0))
        );
        assert_eq!(
            network.capacity_between(UserId::new(2), UserId::new(1)),
            Some(Coins::new(0.5))
        );
        assert_eq!(network.capacity_between(UserId::new(0), UserId::new(2)), None);
        assert!(network.has_relationship(UserId::new(2), UserId::new(1)));
        Ok(())
    }

    #[test]
    fn links_follow_relationship_order() -> anyhow::Result<()> {
        let users = User::population(3);
        let relationships = [
            FundedLink::new(UserId::new(2), UserId::new(1), Coins::ONE),
            FundedLink::new(UserId::new(0), UserId::new(1), Coins::ONE),
        ];
        let network = Network::new(&users, &relationships)?;
        let links = network.links().collect::<Vec<_>>();
        assert_eq!(
            links,
            vec![
                Link::new(UserId::new(1), UserId::new(2)),
                Link::new(UserId::new(0), UserId::new(1)),
            ]
        );
        Ok(())
    }
}

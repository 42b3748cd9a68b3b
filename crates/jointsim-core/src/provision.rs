//! Materializing a [`Network`] on a ledger.

use log::{debug, info, warn};

use crate::ledger::{Fault, LedgerGateway};
use crate::network::{Link, Network, Relationship, UserId};
use crate::units::Amount;

/// The outcome of provisioning a network. Faults are listed in the order they occurred.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    /// The number of users the ledger registered.
    pub users_registered: usize,
    /// Users the ledger refused to register.
    pub registration_faults: Vec<(UserId, Fault)>,
    /// The number of relationships the ledger opened.
    pub relationships_opened: usize,
    /// Relationships the ledger refused to open.
    pub relationship_faults: Vec<(Link, Fault)>,
}

impl ProvisionReport {
    /// Returns true if every user and every relationship made it onto the ledger.
    pub fn is_complete(&self) -> bool {
        self.registration_faults.is_empty() && self.relationship_faults.is_empty()
    }
}

/// Registers every user of `network` and then opens every relationship, in order, funding each
/// with its capacity scaled by `units_per_coin`.
///
/// Provisioning is best-effort: a failed call is logged and recorded in the report, and the
/// remaining users and relationships are still attempted.
///
/// Scaling truncates, so a capacity below one ledger unit is opened with zero funding.
pub fn provision<L>(network: &Network, ledger: &mut L, units_per_coin: u128) -> ProvisionReport
where
    L: LedgerGateway + ?Sized,
{
    let mut report = ProvisionReport::default();
    for user in network.users() {
        match ledger.register_user(user.id, &user.label) {
            Ok(()) => report.users_registered += 1,
            Err(fault) => {
                warn!("Failed to register {} ({}): {fault}", user.label, user.id);
                report.registration_faults.push((user.id, fault));
            }
        }
    }
    for r in network.relationships() {
        let funding = r.capacity.to_amount(units_per_coin);
        if funding == Amount::ZERO {
            debug!("Relationship {} truncates {} to zero funding", r.link(), r.capacity);
        }
        match ledger.open_relationship(r.a, r.b, funding) {
            Ok(()) => report.relationships_opened += 1,
            Err(fault) => {
                let link = r.link();
                warn!("Failed to open relationship {link}: {fault}");
                report.relationship_faults.push((link, fault));
            }
        }
    }
    info!(
        "Provisioned {}/{} users and {}/{} relationships",
        report.users_registered,
        network.nr_users(),
        report.relationships_opened,
        network.nr_relationships()
    );
    report
}

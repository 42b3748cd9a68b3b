//! Fixtures for tests: small networks and a recording mock ledger.

use rustc_hash::FxHashSet;

use crate::ledger::{Fault, LedgerGateway};
use crate::network::types::{FundedLink, Link, User, UserId};
use crate::network::Network;
use crate::units::{Amount, Coins};

/// Four users (IDs 0-3) with relationships (0, 1) and (1, 2). User 3 is isolated.
pub fn four_user_config() -> (Vec<User>, Vec<Link>) {
    let users = User::population(4);
    let links = vec![
        Link::new(users[0].id, users[1].id),
        Link::new(users[1].id, users[2].id),
    ];
    (users, links)
}

/// [`four_user_config`] with every relationship funded with 10 coins.
pub fn four_user_network() -> Network {
    let (users, links) = four_user_config();
    let relationships = links
        .iter()
        .map(|l| FundedLink::new(l.a, l.b, Coins::new(10.0)))
        .collect::<Vec<_>>();
    Network::new(&users, &relationships).expect("fixture network is valid")
}

/// A ledger call recorded by [`MockLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Register(UserId),
    Open(Link, Amount),
    Pay {
        payer: UserId,
        payee: UserId,
        amount: Amount,
    },
}

/// A ledger that records every call. Payments settle if and only if the two users share a
/// relationship, regardless of amount. Registrations and relationships can be set up to fail.
#[derive(Debug, Default)]
pub struct MockLedger {
    calls: Vec<Call>,
    relationships: FxHashSet<Link>,
    failing_users: FxHashSet<UserId>,
    failing_links: FxHashSet<Link>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger on which the given relationships already exist.
    pub fn with_relationships(links: impl IntoIterator<Item = Link>) -> Self {
        Self {
            relationships: links.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Makes registration of `id` fail.
    pub fn fail_registration(mut self, id: UserId) -> Self {
        self.failing_users.insert(id);
        self
    }

    /// Makes opening `link` fail.
    pub fn fail_relationship(mut self, link: Link) -> Self {
        self.failing_links.insert(link);
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn payments(&self) -> impl Iterator<Item = (UserId, UserId, Amount)> + '_ {
        self.calls.iter().filter_map(|c| match *c {
            Call::Pay {
                payer,
                payee,
                amount,
            } => Some((payer, payee, amount)),
            _ => None,
        })
    }

    pub fn has_relationship(&self, x: UserId, y: UserId) -> bool {
        self.relationships.contains(&Link::new(x, y))
    }
}

impl LedgerGateway for MockLedger {
    fn register_user(&mut self, id: UserId, _label: &str) -> Result<(), Fault> {
        self.calls.push(Call::Register(id));
        if self.failing_users.contains(&id) {
            return Err(Fault::Rejected(format!("registration of {id} refused")));
        }
        Ok(())
    }

    fn open_relationship(&mut self, a: UserId, b: UserId, funding: Amount) -> Result<(), Fault> {
        let link = Link::new(a, b);
        self.calls.push(Call::Open(link, funding));
        if self.failing_links.contains(&link) {
            return Err(Fault::Rejected(format!("relationship {link} refused")));
        }
        if !self.relationships.insert(link) {
            return Err(Fault::DuplicateRelationship { a, b });
        }
        Ok(())
    }

    fn pay(&mut self, payer: UserId, payee: UserId, amount: Amount) -> Result<(), Fault> {
        self.calls.push(Call::Pay {
            payer,
            payee,
            amount,
        });
        if !self.has_relationship(payer, payee) {
            return Err(Fault::NoRelationship { payer, payee });
        }
        Ok(())
    }
}

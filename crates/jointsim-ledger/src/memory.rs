use jointsim_core::units::Amount;
use jointsim_core::{Fault, LedgerGateway, Link, UserId};
use log::debug;
use rustc_hash::FxHashMap;

/// The balances of a relationship. `balance_a` belongs to the lower user ID of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointAccount {
    /// The balance of the lower user ID.
    pub balance_a: Amount,
    /// The balance of the higher user ID.
    pub balance_b: Amount,
}

impl JointAccount {
    /// Splits `funding` between both sides: `a` receives half rounded down, `b` the rest.
    pub fn split(funding: Amount) -> Self {
        let balance_a = Amount::new(funding.inner() / 2);
        Self {
            balance_a,
            balance_b: funding - balance_a,
        }
    }

    /// The sum of both balances.
    pub fn total(&self) -> Amount {
        self.balance_a + self.balance_b
    }

    fn sides_mut(&mut self, link: Link, payer: UserId) -> (&mut Amount, &mut Amount) {
        if payer == link.a {
            (&mut self.balance_a, &mut self.balance_b)
        } else {
            (&mut self.balance_b, &mut self.balance_a)
        }
    }
}

/// An in-memory ledger of users and joint accounts.
///
/// Only direct payments are supported: a payment settles when the payer and payee share an
/// account and the payer's side covers the amount.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    users: FxHashMap<UserId, String>,
    accounts: FxHashMap<Link, JointAccount>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the account between `x` and `y`, if any.
    pub fn account(&self, x: UserId, y: UserId) -> Option<&JointAccount> {
        self.accounts.get(&Link::new(x, y))
    }

    /// Returns the label a user was registered with.
    pub fn label(&self, id: UserId) -> Option<&str> {
        self.users.get(&id).map(String::as_str)
    }

    /// Closes the account between `x` and `y` and returns its final balances.
    pub fn close_relationship(&mut self, x: UserId, y: UserId) -> Result<JointAccount, Fault> {
        self.check_registered(x)?;
        self.check_registered(y)?;
        self.accounts
            .remove(&Link::new(x, y))
            .ok_or(Fault::NoRelationship { payer: x, payee: y })
    }

    /// The number of registered users.
    pub fn nr_users(&self) -> usize {
        self.users.len()
    }

    /// The number of open accounts.
    pub fn nr_accounts(&self) -> usize {
        self.accounts.len()
    }

    fn check_registered(&self, id: UserId) -> Result<(), Fault> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(Fault::UnknownUser(id))
        }
    }
}

impl LedgerGateway for MemoryLedger {
    fn register_user(&mut self, id: UserId, label: &str) -> Result<(), Fault> {
        if self.users.contains_key(&id) {
            return Err(Fault::AlreadyRegistered(id));
        }
        self.users.insert(id, label.to_owned());
        Ok(())
    }

    fn open_relationship(&mut self, a: UserId, b: UserId, funding: Amount) -> Result<(), Fault> {
        if a == b {
            return Err(Fault::SelfRelationship(a));
        }
        self.check_registered(a)?;
        self.check_registered(b)?;
        let link = Link::new(a, b);
        if self.accounts.contains_key(&link) {
            return Err(Fault::DuplicateRelationship { a, b });
        }
        self.accounts.insert(link, JointAccount::split(funding));
        Ok(())
    }

    fn pay(&mut self, payer: UserId, payee: UserId, amount: Amount) -> Result<(), Fault> {
        if payer == payee {
            return Err(Fault::SelfRelationship(payer));
        }
        self.check_registered(payer)?;
        self.check_registered(payee)?;
        let link = Link::new(payer, payee);
        let account = self
            .accounts
            .get_mut(&link)
            .ok_or(Fault::NoRelationship { payer, payee })?;
        let (from, to) = account.sides_mut(link, payer);
        let remaining = from.checked_sub(amount).ok_or(Fault::InsufficientCapacity {
            available: *from,
            requested: amount,
        })?;
        // The total never exceeds the funding, so the payee side cannot overflow.
        *to += amount;
        *from = remaining;
        debug!("{payer} paid {amount} to {payee}");
        Ok(())
    }
}

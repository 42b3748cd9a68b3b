//! The interface to the ledger that records users, relationships and payments.

use std::time::Duration;

use crate::network::UserId;
use crate::units::Amount;

/// An interface for ledgers.
///
/// Every call is a blocking request/response. A ledger reports any unsuccessful call as a
/// [`Fault`]; callers in this crate only care whether a call succeeded.
pub trait LedgerGateway {
    /// Registers a user. Re-registration behavior is up to the ledger.
    fn register_user(&mut self, id: UserId, label: &str) -> Result<(), Fault>;

    /// Opens a bidirectional relationship between two registered users, funded with `funding`.
    fn open_relationship(&mut self, a: UserId, b: UserId, funding: Amount) -> Result<(), Fault>;

    /// Moves `amount` from the payer's side of its relationship with the payee to the payee's
    /// side. Fails if there is no direct relationship or not enough capacity.
    fn pay(&mut self, payer: UserId, payee: UserId, amount: Amount) -> Result<(), Fault>;
}

impl<L: LedgerGateway + ?Sized> LedgerGateway for &mut L {
    fn register_user(&mut self, id: UserId, label: &str) -> Result<(), Fault> {
        (**self).register_user(id, label)
    }

    fn open_relationship(&mut self, a: UserId, b: UserId, funding: Amount) -> Result<(), Fault> {
        (**self).open_relationship(a, b, funding)
    }

    fn pay(&mut self, payer: UserId, payee: UserId, amount: Amount) -> Result<(), Fault> {
        (**self).pay(payer, payee, amount)
    }
}

impl<L: LedgerGateway + ?Sized> LedgerGateway for Box<L> {
    fn register_user(&mut self, id: UserId, label: &str) -> Result<(), Fault> {
        (**self).register_user(id, label)
    }

    fn open_relationship(&mut self, a: UserId, b: UserId, funding: Amount) -> Result<(), Fault> {
        (**self).open_relationship(a, b, funding)
    }

    fn pay(&mut self, payer: UserId, payee: UserId, amount: Amount) -> Result<(), Fault> {
        (**self).pay(payer, payee, amount)
    }
}

/// An unsuccessful ledger call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    /// The user is not registered.
    #[error("user {0} is not registered")]
    UnknownUser(UserId),

    /// The user is already registered.
    #[error("user {0} is already registered")]
    AlreadyRegistered(UserId),

    /// Both endpoints of a relationship or payment are the same user.
    #[error("user {0} cannot transact with itself")]
    SelfRelationship(UserId),

    /// The two users already share a relationship.
    #[error("users {a} and {b} already share a relationship")]
    DuplicateRelationship { a: UserId, b: UserId },

    /// The two users do not share a relationship.
    #[error("no relationship between {payer} and {payee}")]
    NoRelationship { payer: UserId, payee: UserId },

    /// The payer's side of the relationship cannot cover the payment.
    #[error("insufficient capacity ({requested} requested, {available} available)")]
    InsufficientCapacity { available: Amount, requested: Amount },

    /// The ledger did not answer in time.
    #[error("ledger did not answer within {0:?}")]
    Timeout(Duration),

    /// The ledger can no longer be reached.
    #[error("ledger disconnected")]
    Disconnected,

    /// Any other rejection.
    #[error("rejected: {0}")]
    Rejected(String),
}

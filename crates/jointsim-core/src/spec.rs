//! This module defines run specifications ([`Spec`]): the parameters that shape the generated
//! network and the payment workload. A `Spec` must be [validated](Spec::validate) before it is
//! used, so that a bad configuration fails before the ledger is touched.

use crate::units::{Amount, Coins, UNITS_PER_COIN};
use crate::workload::WorkloadOpts;

/// A run specification.
#[derive(
    Debug, Clone, PartialEq, typed_builder::TypedBuilder, serde::Serialize, serde::Deserialize,
)]
#[serde(default)]
pub struct Spec {
    /// Population size.
    #[builder(default = 100)]
    pub nr_users: usize,
    /// Power-law exponent of the degree distribution.
    #[builder(default = 2.5)]
    pub exponent: f64,
    /// Mean relationship capacity.
    #[builder(default = Coins::new(10.0))]
    pub capacity_mean: Coins,
    /// Number of payment trials.
    #[builder(default = 1000)]
    pub nr_trials: u64,
    /// Trials between two success-ratio samples.
    #[builder(default = 100)]
    pub sample_interval: u64,
    /// Amount paid in every trial.
    #[builder(default = Coins::ONE)]
    pub payment: Coins,
    /// Smallest ledger units per coin.
    #[builder(default = UNITS_PER_COIN)]
    pub units_per_coin: u128,
    /// Random seed.
    #[builder(default)]
    pub seed: u64,
}

impl Default for Spec {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Spec {
    /// Validate a specification, producing a `ValidSpec`.
    ///
    /// Correctness properties:
    ///
    /// - There must be at least one user if any trial is to run.
    /// - The exponent must be finite and greater than 1.
    /// - The capacity mean and the payment must be finite and positive.
    /// - The payment must be at least one ledger unit. Capacities are not checked this way: a
    ///   capacity below one unit is provisioned with zero funding.
    /// - The sample interval and the unit scale must be positive.
    pub fn validate(self) -> Result<ValidSpec, SpecError> {
        if self.nr_users == 0 && self.nr_trials > 0 {
            return Err(SpecError::NoUsers);
        }
        if !(self.exponent.is_finite() && self.exponent > 1.0) {
            return Err(SpecError::InvalidExponent(self.exponent));
        }
        if !self.capacity_mean.is_positive() {
            return Err(SpecError::InvalidCapacityMean(self.capacity_mean));
        }
        if self.units_per_coin == 0 {
            return Err(SpecError::ZeroUnitScale);
        }
        let payment = self.payment.to_amount(self.units_per_coin);
        if !self.payment.is_positive() || payment == Amount::ZERO {
            return Err(SpecError::InvalidPayment(self.payment));
        }
        if self.sample_interval == 0 {
            return Err(SpecError::ZeroSampleInterval);
        }
        Ok(ValidSpec(self))
    }
}

/// A `Spec` that has been validated. Its fields are guaranteed to satisfy the properties listed
/// in [`Spec::validate()`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSpec(Spec);

impl ValidSpec {
    /// The workload options this specification describes, with the payment scaled to ledger
    /// units.
    pub fn workload_opts(&self) -> WorkloadOpts {
        WorkloadOpts::builder()
            .nr_trials(self.0.nr_trials)
            .sample_interval(self.0.sample_interval)
            .amount(self.0.payment.to_amount(self.0.units_per_coin))
            .build()
    }

    pub fn into_inner(self) -> Spec {
        self.0
    }
}

impl std::ops::Deref for ValidSpec {
    type Target = Spec;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Run specification error.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// Trials were requested for an empty population.
    #[error("cannot run trials without users")]
    NoUsers,

    /// The power-law exponent is out of range.
    #[error("power-law exponent must be greater than 1 (got {0})")]
    InvalidExponent(f64),

    /// The capacity mean is out of range.
    #[error("capacity mean must be positive (got {0})")]
    InvalidCapacityMean(Coins),

    /// The payment is out of range.
    #[error("payment must be at least one ledger unit (got {0})")]
    InvalidPayment(Coins),

    /// The sample interval is zero.
    #[error("sample interval must be positive")]
    ZeroSampleInterval,

    /// The unit scale is zero.
    #[error("units per coin must be positive")]
    ZeroUnitScale,
}

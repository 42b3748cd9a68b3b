//! Randomized payment traffic and success-ratio sampling.
//!
//! A [`WorkloadDriver`] runs a fixed number of trials one after the other. Each trial draws a
//! payer and a distinct payee uniformly at random and asks the ledger to move a fixed amount
//! between them. Every `sample_interval` trials the driver records the fraction of all trials so
//! far that settled.

use log::{debug, info, warn};
use rand::Rng;

use crate::ledger::LedgerGateway;
use crate::network::UserId;
use crate::units::Amount;

/// Workload options.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct WorkloadOpts {
    /// The number of trials to run.
    #[builder(default = 1000)]
    pub nr_trials: u64,
    /// The number of trials between two samples.
    #[builder(default = 100)]
    pub sample_interval: u64,
    /// The amount every trial tries to pay.
    pub amount: Amount,
}

/// One payment request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_new::new, serde::Serialize, serde::Deserialize,
)]
pub struct PaymentAttempt {
    pub payer: UserId,
    pub payee: UserId,
    pub amount: Amount,
}

/// Whether a trial's payment went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    Settled,
    Failed,
}

/// A completed trial. `attempt` is `None` when no payer/payee pair could be formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    /// One-based trial number.
    pub number: u64,
    pub attempt: Option<PaymentAttempt>,
    pub outcome: TrialOutcome,
}

/// Running counts of trials and settled payments.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    trials: u64,
    successes: u64,
}

impl Tally {
    pub fn record(&mut self, outcome: TrialOutcome) {
        self.trials += 1;
        if outcome == TrialOutcome::Settled {
            self.successes += 1;
        }
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    /// Successes over trials, or zero before the first trial.
    pub fn ratio(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.successes as f64 / self.trials as f64
    }
}

/// The cumulative success ratio after `trials` trials.
#[derive(Debug, Clone, Copy, PartialEq, derive_new::new, serde::Serialize, serde::Deserialize)]
pub struct SuccessSample {
    pub trials: u64,
    pub ratio: f64,
}

impl std::fmt::Display for SuccessSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Success ratio after {} transactions: {}",
            self.trials, self.ratio
        )
    }
}

/// Where a driver is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No trial has run yet.
    Idle,
    /// `trial` trials have run.
    Running { trial: u64 },
    /// All trials have run.
    Completed,
}

/// What a driver produced.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadReport {
    pub tally: Tally,
    pub samples: Vec<SuccessSample>,
}

/// Runs payment trials against a ledger. See the [module documentation](self).
#[derive(Debug)]
pub struct WorkloadDriver {
    nr_users: usize,
    opts: WorkloadOpts,
    tally: Tally,
    samples: Vec<SuccessSample>,
    state: DriverState,
}

impl WorkloadDriver {
    /// Creates a driver for a population of `nr_users` users with IDs `0..nr_users`.
    ///
    /// With fewer than two users no payment can be formed; every trial then counts as a failure
    /// without reaching the ledger.
    pub fn new(nr_users: usize, opts: WorkloadOpts) -> Result<Self, WorkloadError> {
        if opts.sample_interval == 0 {
            return Err(WorkloadError::ZeroSampleInterval);
        }
        if opts.amount == Amount::ZERO {
            return Err(WorkloadError::ZeroAmount);
        }
        if nr_users == 0 && opts.nr_trials > 0 {
            return Err(WorkloadError::NoUsers);
        }
        if nr_users < 2 && opts.nr_trials > 0 {
            warn!("A single user cannot pay anyone; all {} trials will fail", opts.nr_trials);
        }
        Ok(Self {
            nr_users,
            opts,
            tally: Tally::default(),
            samples: Vec::new(),
            state: DriverState::Idle,
        })
    }

    /// Runs the next trial and returns it, or returns `None` once all trials have run.
    pub fn step<L, R>(&mut self, ledger: &mut L, rng: &mut R) -> Option<Trial>
    where
        L: LedgerGateway + ?Sized,
        R: Rng + ?Sized,
    {
        if self.tally.trials() >= self.opts.nr_trials {
            self.state = DriverState::Completed;
            return None;
        }
        let number = self.tally.trials() + 1;
        let attempt = self.draw_attempt(rng);
        let outcome = match attempt {
            Some(PaymentAttempt {
                payer,
                payee,
                amount,
            }) => match ledger.pay(payer, payee, amount) {
                Ok(()) => TrialOutcome::Settled,
                Err(fault) => {
                    debug!("Trial {number}: payment from {payer} to {payee} failed: {fault}");
                    TrialOutcome::Failed
                }
            },
            None => TrialOutcome::Failed,
        };
        self.tally.record(outcome);
        if number % self.opts.sample_interval == 0 {
            let sample = SuccessSample::new(number, self.tally.ratio());
            info!("{sample}");
            self.samples.push(sample);
        }
        self.state = if number == self.opts.nr_trials {
            DriverState::Completed
        } else {
            DriverState::Running { trial: number }
        };
        Some(Trial {
            number,
            attempt,
            outcome,
        })
    }

    /// Runs every remaining trial.
    pub fn run<L, R>(mut self, ledger: &mut L, rng: &mut R) -> WorkloadReport
    where
        L: LedgerGateway + ?Sized,
        R: Rng + ?Sized,
    {
        while self.step(ledger, rng).is_some() {}
        self.into_report()
    }

    pub fn into_report(self) -> WorkloadReport {
        WorkloadReport {
            tally: self.tally,
            samples: self.samples,
        }
    }

    // The payee is redrawn until it differs from the payer.
    fn draw_attempt<R>(&self, rng: &mut R) -> Option<PaymentAttempt>
    where
        R: Rng + ?Sized,
    {
        if self.nr_users < 2 {
            return None;
        }
        let payer = rng.gen_range(0..self.nr_users);
        let mut payee = rng.gen_range(0..self.nr_users);
        while payee == payer {
            payee = rng.gen_range(0..self.nr_users);
        }
        Some(PaymentAttempt::new(
            UserId::new(payer),
            UserId::new(payee),
            self.opts.amount,
        ))
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn samples(&self) -> &[SuccessSample] {
        &self.samples
    }

    pub fn nr_trials(&self) -> u64 {
        self.opts.nr_trials
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkloadError {
    #[error("the sample interval must be positive")]
    ZeroSampleInterval,

    #[error("the payment amount must be positive")]
    ZeroAmount,

    #[error("cannot run trials without users")]
    NoUsers,
}

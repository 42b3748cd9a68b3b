//! Sinks for the success-ratio series.

use std::convert::Infallible;

use crate::workload::SuccessSample;

/// The trait that must be implemented by every consumer of a finished run's samples.
pub trait Reporter {
    /// The error type of the sink.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Receives the complete, ordered sample sequence.
    fn report(&mut self, samples: &[SuccessSample]) -> Result<(), Self::Error>;
}

impl<P: Reporter + ?Sized> Reporter for &mut P {
    type Error = P::Error;

    fn report(&mut self, samples: &[SuccessSample]) -> Result<(), Self::Error> {
        (**self).report(samples)
    }
}

/// Collects samples in memory.
impl Reporter for Vec<SuccessSample> {
    type Error = Infallible;

    fn report(&mut self, samples: &[SuccessSample]) -> Result<(), Self::Error> {
        self.extend_from_slice(samples);
        Ok(())
    }
}

/// Discards samples.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    type Error = Infallible;

    fn report(&mut self, _samples: &[SuccessSample]) -> Result<(), Self::Error> {
        Ok(())
    }
}

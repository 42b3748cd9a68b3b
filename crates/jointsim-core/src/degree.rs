//! Power-law degree sequences.

use rand::Rng;
use rand_distr::{Distribution, Pareto};

/// Draws `n` degree targets from a power law with exponent `exponent`.
///
/// Samples come from a Pareto distribution with scale 1 and shape `exponent - 1`, whose density
/// is proportional to `x^-exponent`. Each sample is floored and clamped to at least 1. There is
/// no upper bound, so a few users can get very large targets.
pub fn power_law_sequence<R>(
    n: usize,
    exponent: f64,
    rng: &mut R,
) -> Result<Vec<usize>, DegreeError>
where
    R: Rng + ?Sized,
{
    if !(exponent.is_finite() && exponent > 1.0) {
        return Err(DegreeError::InvalidExponent(exponent));
    }
    let pareto =
        Pareto::new(1.0, exponent - 1.0).map_err(|_| DegreeError::InvalidExponent(exponent))?;
    let degrees = (0..n)
        .map(|_| {
            let x: f64 = pareto.sample(rng);
            std::cmp::max(1, x.floor() as usize)
        })
        .collect();
    Ok(degrees)
}

#[derive(Debug, thiserror::Error)]
pub enum DegreeError {
    #[error("power-law exponent must be greater than 1 (got {0})")]
    InvalidExponent(f64),
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;

    use super::*;

    #[test]
    fn exactly_n_positive_degrees() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        for &n in &[1, 2, 10, 100, 1000] {
            for &exponent in &[1.1, 2.0, 2.5, 3.5] {
                let degrees = power_law_sequence(n, exponent, &mut rng)?;
                assert_eq!(degrees.len(), n);
                assert!(degrees.iter().all(|&d| d >= 1));
            }
        }
        Ok(())
    }

    #[test]
    fn empty_population_is_empty() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(power_law_sequence(0, 2.5, &mut rng)?.is_empty());
        Ok(())
    }

    #[test]
    fn heavy_tail_dominated_by_ones() -> anyhow::Result<()> {
        // With exponent 2.5, P(X < 2) = 1 - 2^-1.5, so roughly 65% of targets are 1.
        let mut rng = StdRng::seed_from_u64(1);
        let degrees = power_law_sequence(10_000, 2.5, &mut rng)?;
        let ones = degrees.iter().filter(|&&d| d == 1).count();
        assert!((6_000..7_000).contains(&ones), "got {ones} ones");
        assert!(degrees.iter().any(|&d| d >= 10));
        Ok(())
    }

    #[test]
    fn invalid_exponent_fails() {
        let mut rng = StdRng::seed_from_u64(0);
        for &exponent in &[1.0, 0.5, -2.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                power_law_sequence(10, exponent, &mut rng),
                Err(DegreeError::InvalidExponent(..))
            ));
        }
    }

    #[test]
    fn same_seed_same_sequence() -> anyhow::Result<()> {
        let a = power_law_sequence(100, 2.5, &mut StdRng::seed_from_u64(9))?;
        let b = power_law_sequence(100, 2.5, &mut StdRng::seed_from_u64(9))?;
        assert_eq!(a, b);
        Ok(())
    }
}

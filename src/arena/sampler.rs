//! Drawing one action from a policy.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::arena::game::Action;
use crate::error::{ArenaError, ArenaResult};

/// Sample one of `legal_actions` using `distribution` as weights.
///
/// The weights need not be normalized but must be finite, non-negative and
/// have a positive sum. Randomness comes only from `rng`, so a seeded
/// generator makes draws reproducible.
pub fn sample_action<R: Rng + ?Sized>(
    distribution: &[f64],
    legal_actions: &[Action],
    rng: &mut R,
) -> ArenaResult<Action> {
    if distribution.len() != legal_actions.len() {
        return Err(ArenaError::InvalidDistribution(format!(
            "{} weights for {} legal actions",
            distribution.len(),
            legal_actions.len()
        )));
    }
    let total: f64 = distribution.iter().sum();
    if distribution.iter().any(|w| !w.is_finite()) || !total.is_finite() {
        return Err(ArenaError::InvalidDistribution(format!(
            "non-finite weights {:?}",
            distribution
        )));
    }

    let index = WeightedIndex::new(distribution)
        .map_err(|e| ArenaError::InvalidDistribution(format!("{:?}: {}", distribution, e)))?;
    Ok(legal_actions[index.sample(rng)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_stay_within_legal_actions() {
        let mut rng = StdRng::seed_from_u64(42);
        let legal = [3, 7, 11, 12];
        let weights = [0.1, 0.4, 0.2, 0.3];

        for _ in 0..1_000 {
            let action = sample_action(&weights, &legal, &mut rng).unwrap();
            assert!(legal.contains(&action));
        }
    }

    #[test]
    fn test_point_mass_always_returns_that_action() {
        let mut rng = StdRng::seed_from_u64(7);
        let legal = [0, 5, 9];
        let weights = [0.0, 1.0, 0.0];

        for _ in 0..10_000 {
            assert_eq!(sample_action(&weights, &legal, &mut rng).unwrap(), 5);
        }
    }

    #[test]
    fn test_unnormalized_weights_follow_proportions() {
        let mut rng = StdRng::seed_from_u64(1);
        let legal = [0, 1];
        let weights = [1.0, 3.0];
        let draws = 20_000;

        let ones = (0..draws)
            .filter(|_| sample_action(&weights, &legal, &mut rng).unwrap() == 1)
            .count();
        let freq = ones as f64 / draws as f64;
        assert!((freq - 0.75).abs() < 0.02, "frequency {} should be near 0.75", freq);
    }

    #[test]
    fn test_same_seed_same_draws() {
        let legal = [0, 1, 2, 3, 4];
        let weights = [1.0; 5];
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);

        for _ in 0..100 {
            assert_eq!(
                sample_action(&weights, &legal, &mut a).unwrap(),
                sample_action(&weights, &legal, &mut b).unwrap()
            );
        }
    }

    #[test]
    fn test_rejects_invalid_distributions() {
        let mut rng = StdRng::seed_from_u64(0);
        let cases: [(&[f64], &[Action]); 6] = [
            (&[0.5, 0.5], &[1]),
            (&[], &[]),
            (&[0.0, 0.0], &[1, 2]),
            (&[-1.0, 2.0], &[1, 2]),
            (&[f64::NAN, 1.0], &[1, 2]),
            (&[f64::INFINITY, 1.0], &[1, 2]),
        ];
        for (weights, legal) in cases {
            assert!(
                matches!(
                    sample_action(weights, legal, &mut rng),
                    Err(ArenaError::InvalidDistribution(_))
                ),
                "weights {:?} should be rejected",
                weights
            );
        }
    }
}

use std::collections::HashMap;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::data_structures::{BirthdayRun, BirthdaySummary, CollisionResult, Digest};
use crate::error::{HashAttackError, Result};
use crate::toy_hash::{check_hash_bits, toy_hash};
use crate::utils::random_message;

fn check_search_params(bits: u32, max_trials: u64, message_length: usize) -> Result<()> {
    check_hash_bits(bits)?;
    if max_trials == 0 {
        return Err(HashAttackError::invalid("max_trials must be positive"));
    }
    if message_length == 0 {
        return Err(HashAttackError::invalid("message length must be positive"));
    }
    Ok(())
}

/// Samples random messages until two distinct ones share a digest.
///
/// Keeps the first message seen for every digest. Returns `Ok(None)` once
/// `max_trials` samples pass without a collision. Drawing the very same message
/// twice is not a collision and just costs a trial.
pub fn birthday_attack<R: Rng>(
    bits: u32,
    max_trials: u64,
    rng: &mut R,
    message_length: usize,
) -> Result<Option<CollisionResult>> {
    check_search_params(bits, max_trials, message_length)?;

    let mut seen: HashMap<Digest, Vec<u8>> = HashMap::new();
    for trial in 1..=max_trials {
        let message = random_message(message_length, rng)?;
        let digest = toy_hash(&message, bits)?;
        match seen.get(&digest) {
            Some(previous) if *previous != message => {
                debug!("collision on {:#x} after {} trials", digest, trial);
                return Ok(Some(CollisionResult {
                    trials: trial,
                    first_message: previous.clone(),
                    second_message: message,
                    collision_value: digest,
                }));
            }
            Some(_) => {}
            None => {
                seen.insert(digest, message);
            }
        }
    }
    info!("no collision for {} bits within {} trials", bits, max_trials);
    Ok(None)
}

fn into_run(collision: Option<CollisionResult>, max_trials: u64) -> BirthdayRun {
    let trials = collision.as_ref().map_or(max_trials, |c| c.trials);
    BirthdayRun { trials, collision }
}

/// Repeats [`birthday_attack`] `runs` times on one shared generator.
pub fn simulate_birthday_trials<R: Rng>(
    bits: u32,
    runs: usize,
    rng: &mut R,
    message_length: usize,
    max_trials: u64,
) -> Result<Vec<BirthdayRun>> {
    check_search_params(bits, max_trials, message_length)?;
    let mut results = Vec::with_capacity(runs);
    for _ in 0..runs {
        let collision = birthday_attack(bits, max_trials, rng, message_length)?;
        results.push(into_run(collision, max_trials));
    }
    Ok(results)
}

/// Parallel variant of [`simulate_birthday_trials`].
///
/// Run `i` draws from ChaCha stream `i` under `seed`, so the output only depends
/// on the arguments and not on how rayon schedules the work.
pub fn simulate_birthday_trials_par(
    bits: u32,
    runs: usize,
    seed: u64,
    message_length: usize,
    max_trials: u64,
) -> Result<Vec<BirthdayRun>> {
    check_search_params(bits, max_trials, message_length)?;
    (0..runs)
        .into_par_iter()
        .map(|run| -> Result<BirthdayRun> {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(run as u64);
            let collision = birthday_attack(bits, max_trials, &mut rng, message_length)?;
            Ok(into_run(collision, max_trials))
        })
        .collect()
}

/// `1 - exp(-t(t-1) / 2^(bits+1))`, clamped to `[0, 1]`.
pub fn estimate_collision_probability(trials: u64, bit_size: u32) -> f64 {
    let space_size = 2f64.powf(f64::from(bit_size));
    let t = trials as f64;
    let exponent = -(t * (t - 1.0).max(0.0)) / (2.0 * space_size);
    let probability = -exponent.exp_m1();
    probability.clamp(0.0, 1.0)
}

/// Theoretical curve sampled at `points` evenly spaced trial counts in `1..=max_trials`.
pub fn probability_curve(bits: u32, max_trials: u64, points: usize) -> Vec<(u64, f64)> {
    if max_trials == 0 || points == 0 {
        return Vec::new();
    }
    let span = (max_trials - 1) as f64;
    let denom = points.saturating_sub(1).max(1) as f64;
    (0..points)
        .map(|i| {
            let trials = 1 + (span * i as f64 / denom) as u64;
            (trials, estimate_collision_probability(trials, bits))
        })
        .collect()
}

/// Trials needed for collision probability `p`: `sqrt(2 · 2^bits · ln(1/(1-p)))`.
pub fn birthday_bound(bits: u32, p: f64) -> Result<f64> {
    if !(0.0..1.0).contains(&p) {
        return Err(HashAttackError::invalid(format!(
            "probability must be in [0, 1), got {p}"
        )));
    }
    let space_size = 2f64.powf(f64::from(bits));
    Ok((2.0 * space_size * (1.0 / (1.0 - p)).ln()).sqrt())
}

pub fn summarize_runs(runs: &[BirthdayRun]) -> Option<BirthdaySummary> {
    let min_trials = runs.iter().map(|r| r.trials).min()?;
    let max_trials = runs.iter().map(|r| r.trials).max()?;
    let total: u64 = runs.iter().map(|r| r.trials).sum();
    Some(BirthdaySummary {
        runs: runs.len(),
        collisions_found: runs.iter().filter(|r| r.collision.is_some()).count(),
        mean_trials: total as f64 / runs.len() as f64,
        min_trials,
        max_trials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::seeded_rng;

    #[test]
    fn finds_collision_at_8_bits() {
        let mut rng = seeded_rng(Some(42));
        let collision = birthday_attack(8, 500, &mut rng, 8).unwrap().unwrap();
        assert!(collision.trials <= 500);
        assert_ne!(collision.first_message, collision.second_message);
        assert_eq!(toy_hash(&collision.first_message, 8).unwrap(), collision.collision_value);
        assert_eq!(toy_hash(&collision.second_message, 8).unwrap(), collision.collision_value);
    }

    #[test]
    fn same_seed_same_collision() {
        let a = birthday_attack(12, 10_000, &mut seeded_rng(Some(9)), 8).unwrap();
        let b = birthday_attack(12, 10_000, &mut seeded_rng(Some(9)), 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn exhausted_budget_is_not_an_error() {
        // a single sample has nothing to collide with
        let mut rng = seeded_rng(Some(1));
        assert_eq!(birthday_attack(32, 1, &mut rng, 8).unwrap(), None);
    }

    #[test]
    fn repeated_message_does_not_count() {
        // one-byte messages repeat long before 64-bit digests collide
        let mut rng = seeded_rng(Some(5));
        assert_eq!(birthday_attack(64, 2_000, &mut rng, 1).unwrap(), None);
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut rng = seeded_rng(Some(0));
        assert!(birthday_attack(0, 10, &mut rng, 8).is_err());
        assert!(birthday_attack(8, 0, &mut rng, 8).is_err());
        assert!(birthday_attack(8, 10, &mut rng, 0).is_err());
    }

    #[test]
    fn simulation_returns_expected_runs() {
        let mut rng = seeded_rng(Some(123));
        let runs = simulate_birthday_trials(8, 5, &mut rng, 8, 1000).unwrap();
        assert_eq!(runs.len(), 5);
        for run in &runs {
            assert!(run.trials <= 1000);
            assert_eq!(run.collision.as_ref().map(|c| c.trials), Some(run.trials));
        }
    }

    #[test]
    fn failed_runs_record_the_budget() {
        let mut rng = seeded_rng(Some(2));
        let runs = simulate_birthday_trials(40, 3, &mut rng, 8, 4).unwrap();
        assert!(runs.iter().all(|r| r.trials == 4 && r.collision.is_none()));
    }

    #[test]
    fn parallel_simulation_is_deterministic() {
        let a = simulate_birthday_trials_par(10, 8, 77, 8, 5000).unwrap();
        let b = simulate_birthday_trials_par(10, 8, 77, 8, 5000).unwrap();
        assert_eq!(a.len(), 8);
        assert_eq!(a, b);
    }

    #[test]
    fn probability_bounds_and_monotonic() {
        let p = estimate_collision_probability(50, 16);
        assert!(p > 0.0 && p <= 1.0);
        assert_eq!(estimate_collision_probability(0, 16), 0.0);
        assert_eq!(estimate_collision_probability(1, 16), 0.0);

        let mut last = 0.0;
        for trials in (0..5000).step_by(37) {
            let p = estimate_collision_probability(trials, 12);
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= last);
            last = p;
        }
        assert!(estimate_collision_probability(u64::MAX, 8) <= 1.0);
    }

    #[test]
    fn curve_spans_the_budget() {
        let curve = probability_curve(16, 1000, 50);
        assert_eq!(curve.len(), 50);
        assert_eq!(curve.first().unwrap().0, 1);
        assert_eq!(curve.last().unwrap().0, 1000);
        assert!(curve.windows(2).all(|w| w[0].1 <= w[1].1));
        assert_eq!(probability_curve(16, 1000, 1), vec![(1, 0.0)]);
    }

    #[test]
    fn bound_hits_half_probability() {
        let bound = birthday_bound(20, 0.5).unwrap();
        let p = estimate_collision_probability(bound.round() as u64, 20);
        assert!((p - 0.5).abs() < 0.01);
        assert!(birthday_bound(20, 1.0).is_err());
    }

    #[test]
    fn summary_aggregates_runs() {
        let runs = vec![
            BirthdayRun { trials: 10, collision: None },
            BirthdayRun { trials: 30, collision: None },
        ];
        let summary = summarize_runs(&runs).unwrap();
        assert_eq!(summary.mean_trials, 20.0);
        assert_eq!((summary.min_trials, summary.max_trials), (10, 30));
        assert_eq!(summary.collisions_found, 0);
        assert!(summarize_runs(&[]).is_none());
    }
}

use hash_attacks::avalanche::{run_avalanche_suite, summarize_avalanche};
use hash_attacks::birthday::*;
use hash_attacks::pollard::{hash_step, pollard_rho, pollard_trace};
use hash_attacks::toy_hash::toy_hash;
use hash_attacks::utils::{flip_bit, seeded_rng, truncate_digest};
use hash_attacks::HashAttackError;
use log::debug;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn birthday_collision_is_genuine_across_widths() {
    init_logger();
    let mut rng = seeded_rng(Some(2024));
    for bits in [8, 12, 16, 20] {
        let collision = birthday_attack(bits, 1 << 16, &mut rng, 8)
            .unwrap()
            .expect("collision within 2^16 trials");
        debug!("{} bits: collision after {} trials", bits, collision.trials);
        assert_ne!(collision.first_message, collision.second_message);
        assert_eq!(toy_hash(&collision.first_message, bits).unwrap(), collision.collision_value);
        assert_eq!(toy_hash(&collision.second_message, bits).unwrap(), collision.collision_value);
        assert!(collision.collision_value < 1 << bits);
    }
}

#[test]
fn pigeonhole_guarantees_a_collision() {
    // 257 distinct-enough messages can't fit in 256 digests
    let mut rng = seeded_rng(Some(1));
    let collision = birthday_attack(8, 257, &mut rng, 16).unwrap();
    assert!(collision.is_some());
}

#[test]
fn simulated_mean_tracks_theory() {
    init_logger();
    let runs = simulate_birthday_trials_par(12, 200, 5, 8, 100_000).unwrap();
    let summary = summarize_runs(&runs).unwrap();
    assert_eq!(summary.collisions_found, 200);
    // expected ~ sqrt(pi/2 * 2^12) ≈ 80
    let expected = (std::f64::consts::PI / 2.0 * 4096.0).sqrt();
    debug!("mean trials {} vs expected {}", summary.mean_trials, expected);
    assert!(summary.mean_trials > expected * 0.7 && summary.mean_trials < expected * 1.3);
}

#[test]
fn pollard_cycle_closes_from_collision_value() {
    init_logger();
    for start in [0u64, 1, 2, 500, 1023] {
        let result = pollard_rho(10, start, 5000).unwrap();
        assert!(result.cycle_length >= 1);

        // mu steps from start land on the cycle
        let mut entry = start;
        for _ in 0..result.tail_length {
            entry = hash_step(entry, 10).unwrap();
        }
        let mut back = entry;
        for _ in 0..result.cycle_length {
            back = hash_step(back, 10).unwrap();
        }
        assert_eq!(back, entry);

        let edges = pollard_trace(10, start, 5000).unwrap();
        assert_eq!(edges.len() as u64, result.tail_length + result.cycle_length);
    }
}

#[test]
fn pollard_reports_non_convergence() {
    let err = pollard_rho(40, 1, 10).unwrap_err();
    assert!(matches!(err, HashAttackError::NonConvergence { max_steps: 10 }));
    assert!(err.to_string().contains("10 steps"));
}

#[test]
fn avalanche_suite_is_well_formed() {
    let message = b"The quick brown fox";
    let results = run_avalanche_suite(message, 32).unwrap();
    assert_eq!(results.len(), message.len() * 8);
    assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.fraction_changed)));
    let summary = summarize_avalanche(&results).unwrap();
    // sha-256 output bits flip about half the time
    assert!(summary.mean_fraction > 0.35 && summary.mean_fraction < 0.65);
}

#[test]
fn boundaries_are_invalid_arguments() {
    assert!(truncate_digest(&[0u8; 32], 257).unwrap_err().is_invalid_argument());
    assert!(flip_bit(b"abc", 24).unwrap_err().is_invalid_argument());
    assert!(toy_hash(b"abc", 65).unwrap_err().is_invalid_argument());
}

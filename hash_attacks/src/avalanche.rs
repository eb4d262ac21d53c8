use log::debug;

use crate::data_structures::{AvalancheResult, AvalancheSummary};
use crate::error::Result;
use crate::toy_hash::{check_hash_bits, toy_hash};
use crate::utils::{flip_bit, hamming_distance};

/// Flips input bit `bit_index` and reports the share of output bits that changed.
pub fn avalanche_test(message: &[u8], bit_index: usize, bits: u32) -> Result<AvalancheResult> {
    check_hash_bits(bits)?;
    let flipped_message = flip_bit(message, bit_index)?;
    let baseline = toy_hash(message, bits)?;
    let flipped = toy_hash(&flipped_message, bits)?;
    let changed = hamming_distance(baseline, flipped);
    Ok(AvalancheResult {
        bit_index,
        fraction_changed: f64::from(changed) / f64::from(bits),
        baseline_hash: baseline,
        flipped_hash: flipped,
    })
}

/// One result per input bit, ordered by bit index.
pub fn run_avalanche_suite(message: &[u8], bits: u32) -> Result<Vec<AvalancheResult>> {
    check_hash_bits(bits)?;
    let total_bits = message.len() * 8;
    let results = (0..total_bits)
        .map(|idx| avalanche_test(message, idx, bits))
        .collect::<Result<Vec<_>>>()?;
    debug!("avalanche suite: {} input bits, {} output bits", total_bits, bits);
    Ok(results)
}

/// `None` for an empty result set.
pub fn summarize_avalanche(results: &[AvalancheResult]) -> Option<AvalancheSummary> {
    if results.is_empty() {
        return None;
    }
    let fractions = results.iter().map(|r| r.fraction_changed);
    let mean = fractions.clone().sum::<f64>() / results.len() as f64;
    let min = fractions.clone().fold(f64::INFINITY, f64::min);
    let max = fractions.fold(f64::NEG_INFINITY, f64::max);
    Some(AvalancheSummary {
        samples: results.len(),
        mean_fraction: mean,
        min_fraction: min,
        max_fraction: max,
    })
}

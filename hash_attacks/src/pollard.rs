use std::collections::HashSet;

use log::{debug, warn};

use crate::data_structures::{Digest, PollardResult};
use crate::error::{HashAttackError, Result};
use crate::toy_hash::{check_hash_bits, toy_hash};

/// Bytes used to encode a state before hashing it: `ceil(bits / 8)`, at least 1.
pub fn state_width(bits: u32) -> usize {
    (bits as usize).div_ceil(8).max(1)
}

fn check_state(value: Digest, width: usize) -> Result<()> {
    if width < 8 && value >> (8 * width) != 0 {
        return Err(HashAttackError::invalid(format!(
            "state {value} does not fit in {width} byte(s)"
        )));
    }
    Ok(())
}

/// The toy hash as a self-map `f: [0, 2^bits) -> [0, 2^bits)`.
///
/// `value` is encoded big-endian on [`state_width`] bytes and hashed to `bits`
/// bits. Pure, so the cycle search below never needs to know what hash sits
/// underneath.
pub fn hash_step(value: Digest, bits: u32) -> Result<Digest> {
    check_hash_bits(bits)?;
    let width = state_width(bits);
    check_state(value, width)?;
    toy_hash(&value.to_be_bytes()[8 - width..], bits)
}

/// Tail length μ and cycle length λ, given a point where Floyd's pointers met.
fn locate_cycle_parameters(bits: u32, start: Digest, meeting: Digest) -> Result<(u64, u64)> {
    let mut tortoise = start;
    let mut hare = meeting;
    let mut mu = 0;
    while tortoise != hare {
        tortoise = hash_step(tortoise, bits)?;
        hare = hash_step(hare, bits)?;
        mu += 1;
    }

    hare = hash_step(tortoise, bits)?;
    let mut lam = 1;
    while tortoise != hare {
        hare = hash_step(hare, bits)?;
        lam += 1;
    }
    Ok((mu, lam))
}

/// Floyd's tortoise and hare over [`hash_step`], starting from `start`.
///
/// Both paths are recorded in full. Fails with
/// [`HashAttackError::NonConvergence`] if the pointers have not met after
/// `max_steps` iterations.
pub fn pollard_rho(bits: u32, start: Digest, max_steps: u64) -> Result<PollardResult> {
    check_hash_bits(bits)?;
    check_state(start, state_width(bits))?;

    let mut tortoise = start;
    let mut hare = start;
    let mut tortoise_path = vec![tortoise];
    let mut hare_path = vec![hare];

    for iteration in 1..=max_steps {
        tortoise = hash_step(tortoise, bits)?;
        hare = hash_step(hash_step(hare, bits)?, bits)?;
        tortoise_path.push(tortoise);
        hare_path.push(hare);
        if tortoise == hare {
            let (mu, lam) = locate_cycle_parameters(bits, start, tortoise)?;
            debug!(
                "rho met at {:#x} after {} iterations (mu={}, lambda={})",
                tortoise, iteration, mu, lam
            );
            return Ok(PollardResult {
                collision_value: tortoise,
                iterations: iteration,
                tail_length: mu,
                cycle_length: lam,
                tortoise_path,
                hare_path,
            });
        }
    }

    warn!("pollard rho: no meeting for {} bits within {} steps", bits, max_steps);
    Err(HashAttackError::NonConvergence { max_steps })
}

/// Edges `state -> f(state)` in the order they were walked, for drawing the
/// functional graph.
///
/// Stops after `steps` edges, or as soon as the walk returns to a state it has
/// already left, so every source state appears once.
pub fn pollard_trace(bits: u32, start: Digest, steps: usize) -> Result<Vec<(Digest, Digest)>> {
    check_hash_bits(bits)?;
    check_state(start, state_width(bits))?;

    let mut edges = Vec::with_capacity(steps.min(1 << 16));
    let mut visited = HashSet::new();
    let mut value = start;
    for _ in 0..steps {
        let next = hash_step(value, bits)?;
        edges.push((value, next));
        visited.insert(value);
        value = next;
        if visited.contains(&value) {
            break;
        }
    }
    Ok(edges)
}

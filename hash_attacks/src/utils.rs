use num_bigint::BigUint;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::data_structures::Digest;
use crate::error::{HashAttackError, Result};

pub const RANDOM_MESSAGE_LENGTH: usize = 8;

/// Reads `digest` as a big-endian integer and keeps its low `bits` bits.
///
/// Works for any digest width, hence the `BigUint`. Fails when `bits` is zero
/// or larger than the digest.
pub fn truncate_digest(digest: &[u8], bits: u32) -> Result<BigUint> {
    if bits == 0 {
        return Err(HashAttackError::invalid("bits must be positive"));
    }
    let available = digest.len() as u64 * 8;
    if u64::from(bits) > available {
        return Err(HashAttackError::invalid(format!(
            "bits ({bits}) exceeds digest size ({available} bits)"
        )));
    }
    let value = BigUint::from_bytes_be(digest);
    let mask = (BigUint::from(1u32) << bits) - 1u32;
    Ok(value & mask)
}

/// Draws `length` bytes from `rng`, one byte per draw.
pub fn random_message<R: Rng>(length: usize, rng: &mut R) -> Result<Vec<u8>> {
    if length == 0 {
        return Err(HashAttackError::invalid("message length must be positive"));
    }
    Ok(draw_bytes(length, rng))
}

fn draw_bytes<R: Rng>(length: usize, rng: &mut R) -> Vec<u8> {
    (0..length).map(|_| rng.random::<u8>()).collect()
}

/// Lazily yields `count` random messages of `length` bytes.
pub struct RandomMessages<'a, R: Rng> {
    rng: &'a mut R,
    length: usize,
    remaining: usize,
}

impl<R: Rng> Iterator for RandomMessages<'_, R> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(draw_bytes(self.length, self.rng))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

pub fn iter_random_messages<R: Rng>(
    count: usize,
    length: usize,
    rng: &mut R,
) -> Result<RandomMessages<'_, R>> {
    if length == 0 {
        return Err(HashAttackError::invalid("message length must be positive"));
    }
    Ok(RandomMessages {
        rng,
        length,
        remaining: count,
    })
}

/// Returns a copy of `message` with one bit toggled.
///
/// Bit `i` is bit `i % 8` of byte `i / 8`, counting from the least significant
/// bit, so index 0 is the low bit of the first byte.
pub fn flip_bit(message: &[u8], bit_index: usize) -> Result<Vec<u8>> {
    let (byte_index, offset) = (bit_index / 8, bit_index % 8);
    if byte_index >= message.len() {
        return Err(HashAttackError::invalid(format!(
            "bit index {bit_index} out of range for a {}-byte message",
            message.len()
        )));
    }
    let mut flipped = message.to_vec();
    flipped[byte_index] ^= 1 << offset;
    Ok(flipped)
}

pub fn hamming_distance(a: Digest, b: Digest) -> u32 {
    (a ^ b).count_ones()
}

/// Deterministic generator for a given seed, OS entropy otherwise.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    }
}

//! A deliberately naive Merkle–Damgård hash and the length-extension forgery it
//! falls to.
//!
//! The digest *is* the final chaining state, so anyone holding a tag for
//! `secret ‖ message` can load it back into a hasher and keep going. All they
//! need besides the tag is the length of `secret`, to rebuild the padding the
//! victim's hasher appended.

use std::fmt;

use log::debug;

use crate::data_structures::LengthExtensionResult;
use crate::error::{HashAttackError, Result};

pub const BLOCK_SIZE: usize = 64;
pub const DIGEST_SIZE: usize = 16;

const IV: [u32; 4] = [0x01234567, 0x89ABCDEF, 0xFEDCBA98, 0x76543210];

// rotate a 33-bit value within 32 bits: bit 32 lands on bit `amount`
fn rotl_carry(value: u64, amount: u32) -> u32 {
    ((value << amount) | (value >> (32 - amount))) as u32
}

// 16 rounds, one per little-endian message word, registers rotate every round.
// `a + i` enters the first rotation unreduced, so its carry survives.
fn compress(state: [u32; 4], block: &[u8; BLOCK_SIZE]) -> [u32; 4] {
    let [mut a, mut b, mut c, mut d] = state;
    for (index, chunk) in block.chunks_exact(4).enumerate() {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let i = index as u32;
        let mix = rotl_carry(u64::from(word) ^ (u64::from(a) + u64::from(i)), i % 16 + 1);
        a = a.wrapping_add(mix);
        b ^= a ^ word.rotate_left(i % 5 + 1);
        c = c.wrapping_add(b.rotate_left(i % 7 + 2)).wrapping_add(word);
        d ^= c ^ i;
        (a, b, c, d) = (b, c, d, a);
    }
    [a, b, c, d]
}

/// Toy Merkle–Damgård hasher with its chaining state exposed.
///
/// Four 32-bit registers, 64-byte blocks, 16-byte digests. `Clone` gives a
/// fully independent copy, which is how [`SimpleMdHasher::digest`] finalises
/// without touching the live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleMdHasher {
    state: [u32; 4],
    processed: u64,
    buffer: Vec<u8>,
}

impl Default for SimpleMdHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleMdHasher {
    pub fn new() -> Self {
        Self::with_state(IV, 0)
    }

    /// Starts from arbitrary registers with `processed` bytes already accounted for.
    pub fn with_state(state: [u32; 4], processed: u64) -> Self {
        SimpleMdHasher {
            state,
            processed,
            buffer: Vec::with_capacity(BLOCK_SIZE),
        }
    }

    pub fn state(&self) -> [u32; 4] {
        self.state
    }

    /// Bytes already pushed through the compression function.
    pub fn processed_length(&self) -> u64 {
        self.processed
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Padding appended to a `message_length`-byte input: `0x80`, zeros up to
    /// 56 mod 64, then the bit length (mod 2^64) as 8 big-endian bytes.
    pub fn glue_padding(message_length: u64) -> Vec<u8> {
        let bit_length = message_length.wrapping_mul(8);
        let remainder = (message_length % BLOCK_SIZE as u64 + 1) as usize % BLOCK_SIZE;
        let pad_len = (2 * BLOCK_SIZE - 8 - remainder) % BLOCK_SIZE;

        let mut padding = Vec::with_capacity(1 + pad_len + 8);
        padding.push(0x80);
        padding.resize(1 + pad_len, 0x00);
        padding.extend_from_slice(&bit_length.to_be_bytes());
        padding
    }

    pub fn update(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.buffer.extend_from_slice(data);

        while self.buffer.len() >= BLOCK_SIZE {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(&self.buffer[..BLOCK_SIZE]);
            self.buffer.drain(..BLOCK_SIZE);
            self.state = compress(self.state, &block);
            self.processed = self.processed.wrapping_add(BLOCK_SIZE as u64);
        }
    }

    fn apply_padding(&mut self) {
        let total = self.processed.wrapping_add(self.buffer.len() as u64);
        let padding = Self::glue_padding(total);
        self.update(&padding);
    }

    /// Finalises a copy; `self` can keep absorbing data afterwards.
    pub fn digest(&self) -> [u8; DIGEST_SIZE] {
        let mut finished = self.clone();
        finished.apply_padding();
        finished.state_bytes()
    }

    pub fn hexdigest(&self) -> String {
        hex::encode(self.digest())
    }

    fn state_bytes(&self) -> [u8; DIGEST_SIZE] {
        let mut out = [0u8; DIGEST_SIZE];
        for (chunk, register) in out.chunks_exact_mut(4).zip(self.state) {
            chunk.copy_from_slice(&register.to_le_bytes());
        }
        out
    }

    /// Loads the registers from a raw 16-byte digest and drops buffered input.
    ///
    /// The processed length is left alone; set it with
    /// [`SimpleMdHasher::set_processed_length`].
    pub fn state_from_digest(&mut self, digest: &[u8]) -> Result<()> {
        if digest.len() != DIGEST_SIZE {
            return Err(HashAttackError::invalid(format!(
                "digest must be {DIGEST_SIZE} bytes, got {}",
                digest.len()
            )));
        }
        for (register, chunk) in self.state.iter_mut().zip(digest.chunks_exact(4)) {
            *register = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        self.buffer.clear();
        Ok(())
    }

    pub fn state_from_hexdigest(&mut self, digest: &str) -> Result<()> {
        let bytes = hex::decode(digest.trim())?;
        self.state_from_digest(&bytes)
    }

    /// Overrides the processed byte count and drops buffered input.
    pub fn set_processed_length(&mut self, total_length: u64) {
        self.processed = total_length;
        self.buffer.clear();
    }
}

impl fmt::Display for SimpleMdHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimpleMdHasher {{ state: [")?;
        for (i, register) in self.state.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "0x{:08x}", register)?;
        }
        write!(
            f,
            "], buffer_len: {}, processed: {} }}",
            self.buffer.len(),
            self.processed
        )
    }
}

/// Secret-prefix MAC: hex digest of `key ‖ message`.
///
/// `hasher` is used as a template and is never modified.
pub fn compute_tag(key: &[u8], message: &[u8], hasher: Option<&SimpleMdHasher>) -> String {
    let mut hasher = hasher.cloned().unwrap_or_default();
    hasher.update(key);
    hasher.update(message);
    hasher.hexdigest()
}

pub fn verify_tag(key: &[u8], message: &[u8], tag: &str, hasher: Option<&SimpleMdHasher>) -> bool {
    compute_tag(key, message, hasher).eq_ignore_ascii_case(tag.trim())
}

/// Forges a tag for `original ‖ glue ‖ append` from the tag of `secret ‖ original`.
///
/// Only the secret's length is needed. When `key_length_guess` is right the
/// returned digest equals `compute_tag(secret, forged_message)`.
pub fn forge_length_extension(
    original_digest: &str,
    original_message: &[u8],
    append_message: &[u8],
    key_length_guess: usize,
    hasher: Option<&SimpleMdHasher>,
) -> Result<LengthExtensionResult> {
    let mut hasher = hasher.cloned().unwrap_or_default();
    hasher.state_from_hexdigest(original_digest)?;

    let total_processed = key_length_guess
        .checked_add(original_message.len())
        .and_then(|total| u64::try_from(total).ok())
        .ok_or_else(|| {
            HashAttackError::invalid(format!(
                "key length guess {key_length_guess} overflows the message length"
            ))
        })?;
    let glue_padding = SimpleMdHasher::glue_padding(total_processed);
    let resumed_length = total_processed
        .checked_add(glue_padding.len() as u64)
        .ok_or_else(|| {
            HashAttackError::invalid(format!(
                "key length guess {key_length_guess} leaves no room for glue padding"
            ))
        })?;
    hasher.set_processed_length(resumed_length);
    debug!(
        "forging with key length {}: {} prefix bytes, {} bytes of glue",
        key_length_guess,
        total_processed,
        glue_padding.len()
    );
    hasher.update(append_message);
    let forged_digest = hasher.hexdigest();

    let mut forged_message =
        Vec::with_capacity(original_message.len() + glue_padding.len() + append_message.len());
    forged_message.extend_from_slice(original_message);
    forged_message.extend_from_slice(&glue_padding);
    forged_message.extend_from_slice(append_message);

    Ok(LengthExtensionResult {
        forged_message,
        forged_digest,
        glue_padding,
        key_length_guess,
    })
}

/// One forgery per key length guess, for when the secret's length is unknown
/// and candidates can be checked against a verifier.
pub fn forge_candidates(
    original_digest: &str,
    original_message: &[u8],
    append_message: &[u8],
    key_length_guesses: impl IntoIterator<Item = usize>,
    hasher: Option<&SimpleMdHasher>,
) -> Result<Vec<LengthExtensionResult>> {
    key_length_guesses
        .into_iter()
        .map(|guess| {
            forge_length_extension(original_digest, original_message, append_message, guess, hasher)
        })
        .collect()
}

use sha2::{Digest as _, Sha256};

use crate::data_structures::Digest;
use crate::error::{HashAttackError, Result};
use crate::utils::truncate_digest;

pub const DEFAULT_HASH_BITS: u32 = 20;
/// Widest toy hash that still fits a [`Digest`].
pub const MAX_HASH_BITS: u32 = 64;

pub fn check_hash_bits(bits: u32) -> Result<()> {
    if bits == 0 || bits > MAX_HASH_BITS {
        return Err(HashAttackError::invalid(format!(
            "hash width must be in 1..={MAX_HASH_BITS} bits, got {bits}"
        )));
    }
    Ok(())
}

/// SHA-256 of `message`, truncated to `bits` bits.
///
/// Deterministic and side-effect free; birthday search and Pollard's rho both
/// lean on that to reproduce collisions and cycles.
pub fn toy_hash(message: &[u8], bits: u32) -> Result<Digest> {
    check_hash_bits(bits)?;
    let digest = Sha256::digest(message);
    let value = truncate_digest(&digest, bits)?;
    // bits <= 64 so a single limb holds the whole value
    Ok(value.iter_u64_digits().next().unwrap_or(0))
}

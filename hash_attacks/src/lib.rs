//! Classic attacks on hash functions, run against deliberately weak toys:
//! birthday collision search, Pollard's rho over a hash's functional graph,
//! bit-avalanche measurement and a Merkle–Damgård length-extension forgery.
//!
//! Nothing in here is meant to be secure. The toy hash is SHA-256 cut down to a
//! handful of bits and the length-extension hasher is a 16-round mixing
//! function with no cryptographic pedigree.

pub mod avalanche;
pub mod birthday;
pub mod complexity;
pub mod config;
pub mod data_structures;
pub mod error;
pub mod length_ext;
pub mod pollard;
pub mod toy_hash;
pub mod utils;

pub use error::{HashAttackError, Result};

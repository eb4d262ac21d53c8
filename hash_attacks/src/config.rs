//! Parameter sets for each demonstration.
//!
//! Each struct doubles as a clap argument group so a front end can flatten it
//! straight into its CLI. `Default` matches the clap defaults.

use clap::Args;
use log::info;
use rand::Rng;

use crate::avalanche::run_avalanche_suite;
use crate::birthday::{simulate_birthday_trials, simulate_birthday_trials_par};
use crate::data_structures::{
    AvalancheResult, BirthdayRun, Digest, ForgeryReport, PollardResult,
};
use crate::error::{HashAttackError, Result};
use crate::length_ext::{compute_tag, forge_length_extension, verify_tag};
use crate::pollard::{pollard_rho, pollard_trace};
use crate::toy_hash::{check_hash_bits, DEFAULT_HASH_BITS};
use crate::utils::{seeded_rng, RANDOM_MESSAGE_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct BirthdayConfig {
    /// Toy hash width in bits
    #[arg(long, default_value_t = DEFAULT_HASH_BITS)]
    pub bits: u32,
    /// Number of independent collision searches
    #[arg(long, default_value_t = 100)]
    pub runs: usize,
    /// Trial budget per search
    #[arg(long, default_value_t = 1_000_000)]
    pub max_trials: u64,
    /// Length of each random message in bytes
    #[arg(long, default_value_t = RANDOM_MESSAGE_LENGTH)]
    pub message_length: usize,
    /// Seed for reproducible runs, OS entropy when absent
    #[arg(long)]
    pub seed: Option<u64>,
    /// Spread the runs over the rayon thread pool
    #[arg(long)]
    pub parallel: bool,
}

impl Default for BirthdayConfig {
    fn default() -> Self {
        BirthdayConfig {
            bits: DEFAULT_HASH_BITS,
            runs: 100,
            max_trials: 1_000_000,
            message_length: RANDOM_MESSAGE_LENGTH,
            seed: None,
            parallel: false,
        }
    }
}

impl BirthdayConfig {
    pub fn validate(&self) -> Result<()> {
        check_hash_bits(self.bits)?;
        if self.max_trials == 0 {
            return Err(HashAttackError::invalid("max_trials must be positive"));
        }
        if self.message_length == 0 {
            return Err(HashAttackError::invalid("message length must be positive"));
        }
        Ok(())
    }

    pub fn simulate(&self) -> Result<Vec<BirthdayRun>> {
        self.validate()?;
        info!("birthday simulation: {:?}", self);
        if self.parallel {
            let seed = self.seed.unwrap_or_else(|| seeded_rng(None).random());
            simulate_birthday_trials_par(
                self.bits,
                self.runs,
                seed,
                self.message_length,
                self.max_trials,
            )
        } else {
            let mut rng = seeded_rng(self.seed);
            simulate_birthday_trials(
                self.bits,
                self.runs,
                &mut rng,
                self.message_length,
                self.max_trials,
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct PollardConfig {
    /// Toy hash width in bits
    #[arg(long, default_value_t = DEFAULT_HASH_BITS)]
    pub bits: u32,
    /// Starting state of the walk
    #[arg(long, default_value_t = 1)]
    pub start: Digest,
    /// Iteration budget for Floyd's search
    #[arg(long, default_value_t = 100_000)]
    pub max_steps: u64,
    /// Edges to collect when tracing the functional graph
    #[arg(long, default_value_t = 200)]
    pub trace_steps: usize,
}

impl Default for PollardConfig {
    fn default() -> Self {
        PollardConfig {
            bits: DEFAULT_HASH_BITS,
            start: 1,
            max_steps: 100_000,
            trace_steps: 200,
        }
    }
}

impl PollardConfig {
    pub fn run(&self) -> Result<PollardResult> {
        info!("pollard rho: {:?}", self);
        pollard_rho(self.bits, self.start, self.max_steps)
    }

    pub fn trace(&self) -> Result<Vec<(Digest, Digest)>> {
        pollard_trace(self.bits, self.start, self.trace_steps)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct AvalancheConfig {
    /// Toy hash width in bits
    #[arg(long, default_value_t = DEFAULT_HASH_BITS)]
    pub bits: u32,
    /// Message whose bits get flipped one at a time
    #[arg(long, default_value = "hello")]
    pub message: String,
}

impl Default for AvalancheConfig {
    fn default() -> Self {
        AvalancheConfig {
            bits: DEFAULT_HASH_BITS,
            message: "hello".to_string(),
        }
    }
}

impl AvalancheConfig {
    pub fn run(&self) -> Result<Vec<AvalancheResult>> {
        run_avalanche_suite(self.message.as_bytes(), self.bits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct LengthExtensionConfig {
    /// Message the victim tagged
    #[arg(long, default_value = "amount=100")]
    pub original_message: String,
    /// Data to smuggle in after the glue padding
    #[arg(long, default_value = "&admin=true")]
    pub appended_message: String,
    /// Guessed length of the secret prefix in bytes
    #[arg(long, default_value_t = 6)]
    pub key_length_guess: usize,
    /// Hex tag of secret ‖ original, as seen on the wire
    #[arg(long)]
    pub observed_digest: Option<String>,
    /// Secret prefix, used to produce the tag and to check the forgery
    #[arg(long)]
    pub secret: Option<String>,
}

impl Default for LengthExtensionConfig {
    fn default() -> Self {
        LengthExtensionConfig {
            original_message: "amount=100".to_string(),
            appended_message: "&admin=true".to_string(),
            key_length_guess: 6,
            observed_digest: None,
            secret: None,
        }
    }
}

impl LengthExtensionConfig {
    /// Forges from the observed digest, or from the secret's own tag when no
    /// digest was given. Needs at least one of the two.
    pub fn run(&self) -> Result<ForgeryReport> {
        let original = self.original_message.as_bytes();
        let observed_digest = match (&self.observed_digest, &self.secret) {
            (Some(digest), _) => digest.trim().to_string(),
            (None, Some(secret)) => compute_tag(secret.as_bytes(), original, None),
            (None, None) => {
                return Err(HashAttackError::invalid(
                    "either an observed digest or the secret is required",
                ))
            }
        };

        let result = forge_length_extension(
            &observed_digest,
            original,
            self.appended_message.as_bytes(),
            self.key_length_guess,
            None,
        )?;
        let verified = self.secret.as_ref().map(|secret| {
            verify_tag(secret.as_bytes(), &result.forged_message, &result.forged_digest, None)
        });
        Ok(ForgeryReport {
            observed_digest,
            result,
            verified,
        })
    }
}

use thiserror::Error;

/// Errors raised by the attack routines.
///
/// Every argument check runs before any hashing starts, so an error never
/// leaves a caller-owned hasher or generator half updated.
#[derive(Debug, Error)]
pub enum HashAttackError {
    /// A parameter is out of range: bit width, length, index or digest size.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A digest string could not be decoded as hex.
    #[error("invalid argument: malformed hex digest: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Floyd's cycle search used up its step budget without the two pointers meeting.
    #[error("pollard rho did not converge within {max_steps} steps")]
    NonConvergence {
        /// The step budget that was exhausted.
        max_steps: u64,
    },
}

impl HashAttackError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// True for every error caused by a bad caller-supplied argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::InvalidHex(_))
    }
}

pub type Result<T> = std::result::Result<T, HashAttackError>;

/// Truncated toy-hash output. Only the low `bits` bits are ever set.
pub type Digest = u64;

/// Two distinct messages that the toy hash maps to the same digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionResult {
    /// 1-based trial at which the repeat showed up.
    pub trials: u64,
    pub first_message: Vec<u8>,
    pub second_message: Vec<u8>,
    pub collision_value: Digest,
}

/// One repetition of a birthday simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayRun {
    /// Trials spent: the collision trial, or the full budget when none was found.
    pub trials: u64,
    pub collision: Option<CollisionResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BirthdaySummary {
    pub runs: usize,
    pub collisions_found: usize,
    pub mean_trials: f64,
    pub min_trials: u64,
    pub max_trials: u64,
}

/// Outcome of Floyd's tortoise/hare search over the toy hash's functional graph.
///
/// `tortoise_path[i]` and `hare_path[i]` are the pointer positions after `i`
/// iterations, index 0 being the start value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollardResult {
    pub collision_value: Digest,
    pub iterations: u64,
    /// μ: steps from the start value to the first state on the cycle.
    pub tail_length: u64,
    /// λ: period of the cycle, at least 1.
    pub cycle_length: u64,
    pub tortoise_path: Vec<Digest>,
    pub hare_path: Vec<Digest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvalancheResult {
    pub bit_index: usize,
    pub fraction_changed: f64,
    pub baseline_hash: Digest,
    pub flipped_hash: Digest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvalancheSummary {
    pub samples: usize,
    pub mean_fraction: f64,
    pub min_fraction: f64,
    pub max_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthExtensionResult {
    /// `original ‖ glue_padding ‖ appended`, i.e. what the attacker submits.
    pub forged_message: Vec<u8>,
    /// Hex tag valid for `secret ‖ forged_message` when the key length guess is right.
    pub forged_digest: String,
    pub glue_padding: Vec<u8>,
    pub key_length_guess: usize,
}

/// A forgery together with how its input tag was obtained and, when the secret
/// is known, whether the forged tag checks out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeryReport {
    pub observed_digest: String,
    pub result: LengthExtensionResult,
    pub verified: Option<bool>,
}

/// Ordered run of integer states kept around for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampledSequence {
    pub states: Vec<Digest>,
}

impl SampledSequence {
    pub fn new(states: Vec<Digest>) -> Self {
        Self { states }
    }

    /// The last `size` states, or all of them when there are fewer.
    pub fn tail(&self, size: usize) -> &[Digest] {
        let start = self.states.len().saturating_sub(size);
        &self.states[start..]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Digest> {
        self.states.iter()
    }
}

impl From<Vec<Digest>> for SampledSequence {
    fn from(states: Vec<Digest>) -> Self {
        Self::new(states)
    }
}

impl<'a> IntoIterator for &'a SampledSequence {
    type Item = &'a Digest;
    type IntoIter = std::slice::Iter<'a, Digest>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

use std::f64::consts::PI;

/// Rough operation counts for finding a collision in a `bits`-bit hash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackCosts {
    pub bits: u32,
    /// `2^(bits/2)`
    pub birthday: f64,
    /// `sqrt(π · 2^(bits-1))`, the expected rho length
    pub pollard: f64,
    /// `2^bits`
    pub brute_force: f64,
}

pub fn attack_costs(bits: u32) -> AttackCosts {
    let bits_f = f64::from(bits);
    AttackCosts {
        bits,
        birthday: 2f64.powf(bits_f / 2.0),
        pollard: (PI * 2f64.powf(bits_f - 1.0)).sqrt(),
        brute_force: 2f64.powf(bits_f),
    }
}

pub fn difficulty_scaling(bit_sizes: &[u32]) -> Vec<AttackCosts> {
    bit_sizes.iter().copied().map(attack_costs).collect()
}

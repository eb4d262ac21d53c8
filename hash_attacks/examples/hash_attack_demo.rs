use clap::{Parser, Subcommand};
use log::{error, info};
use std::time::Instant;

use hash_attacks::avalanche::summarize_avalanche;
use hash_attacks::birthday::{birthday_bound, probability_curve, summarize_runs};
use hash_attacks::complexity::difficulty_scaling;
use hash_attacks::config::{AvalancheConfig, BirthdayConfig, LengthExtensionConfig, PollardConfig};
use hash_attacks::data_structures::SampledSequence;
use hash_attacks::Result;

const DIFFICULTY_BITS: [u32; 5] = [8, 12, 16, 20, 24];

#[derive(Parser)]
#[command(about = "Classic attacks on deliberately weak hash functions")]
struct Cli {
    #[command(subcommand)]
    attack: Attack,
}

#[derive(Subcommand)]
enum Attack {
    /// Random sampling until two messages share a truncated digest
    Birthday(BirthdayConfig),
    /// Floyd cycle detection on the toy hash's functional graph
    Pollard(PollardConfig),
    /// Output bit changes for every single-bit input flip
    Avalanche(AvalancheConfig),
    /// Forge a secret-prefix MAC without the secret
    LengthExtension(LengthExtensionConfig),
    /// Operation counts per attack for a range of hash widths
    Difficulty,
}

fn birthday(config: &BirthdayConfig) -> Result<()> {
    let runs = config.simulate()?;
    for (index, run) in runs.iter().enumerate() {
        match &run.collision {
            Some(c) => info!(
                "run {:3}: {:8} trials, {} vs {} -> {:#x}",
                index + 1,
                run.trials,
                hex::encode(&c.first_message),
                hex::encode(&c.second_message),
                c.collision_value
            ),
            None => info!("run {:3}: budget of {} trials exhausted", index + 1, run.trials),
        }
    }
    if let Some(summary) = summarize_runs(&runs) {
        println!(
            "{}/{} runs collided, mean {:.0} trials (min {}, max {})",
            summary.collisions_found, summary.runs, summary.mean_trials, summary.min_trials, summary.max_trials
        );
    }
    println!("theoretical 50% bound: {:.0} trials", birthday_bound(config.bits, 0.5)?);
    for (trials, probability) in probability_curve(config.bits, config.max_trials, 10) {
        println!("  P(collision | {:>8} trials) = {:.4}", trials, probability);
    }
    Ok(())
}

fn pollard(config: &PollardConfig) -> Result<()> {
    let result = config.run()?;
    println!(
        "met at {:#x} after {} iterations: mu = {}, lambda = {}",
        result.collision_value, result.iterations, result.tail_length, result.cycle_length
    );
    let tortoise = SampledSequence::from(result.tortoise_path);
    let hare = SampledSequence::from(result.hare_path);
    println!("tortoise tail: {:x?}", tortoise.tail(8));
    println!("hare tail:     {:x?}", hare.tail(8));
    let edges = config.trace()?;
    println!("trace: {} edges", edges.len());
    for (state, next) in edges.iter().take(16) {
        println!("  {:#x} -> {:#x}", state, next);
    }
    Ok(())
}

fn avalanche(config: &AvalancheConfig) -> Result<()> {
    let results = config.run()?;
    for r in &results {
        println!(
            "bit {:3}: {:.3} changed ({:#x} -> {:#x})",
            r.bit_index, r.fraction_changed, r.baseline_hash, r.flipped_hash
        );
    }
    if let Some(summary) = summarize_avalanche(&results) {
        println!(
            "mean {:.3}, min {:.3}, max {:.3} over {} flips",
            summary.mean_fraction, summary.min_fraction, summary.max_fraction, summary.samples
        );
    }
    Ok(())
}

fn length_extension(config: &LengthExtensionConfig) -> Result<()> {
    let report = config.run()?;
    println!("observed tag:   {}", report.observed_digest);
    println!("glue padding:   {}", hex::encode(&report.result.glue_padding));
    println!("forged message: {}", hex::encode(&report.result.forged_message));
    println!("forged tag:     {}", report.result.forged_digest);
    match report.verified {
        Some(true) => println!("forgery verified against the secret"),
        Some(false) => println!("forgery rejected, wrong key length guess?"),
        None => println!("no secret given, forgery unverified"),
    }
    Ok(())
}

fn difficulty() {
    for costs in difficulty_scaling(&DIFFICULTY_BITS) {
        println!(
            "{:2} bits: birthday {:>12.0}  pollard {:>12.0}  brute force {:>12.0}",
            costs.bits, costs.birthday, costs.pollard, costs.brute_force
        );
    }
}

//RUST_LOG=info cargo run --release --package hash_attacks --example hash_attack_demo -- birthday --bits 16 --runs 20 --seed 7
fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let outcome = match &cli.attack {
        Attack::Birthday(config) => birthday(config),
        Attack::Pollard(config) => pollard(config),
        Attack::Avalanche(config) => avalanche(config),
        Attack::LengthExtension(config) => length_extension(config),
        Attack::Difficulty => {
            difficulty();
            Ok(())
        }
    };
    if let Err(err) = outcome {
        error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
    info!("Total time: {:?}", start.elapsed());
}

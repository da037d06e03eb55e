use std::collections::HashSet;

use anyhow::{Result, bail};

/// Seed used when the command line names none.
pub const DEFAULT_SEED: u64 = 1337;

/// Most seeds a single `a..b` range may expand to.
pub const MAX_SEED_RANGE: u64 = 100_000;

/// Resolve a list of CLI seed arguments into run seeds.
///
/// Accepts decimal integers (negative values use their magnitude), `0x` hex
/// literals, and inclusive ranges such as `1..5` of at most
/// [`MAX_SEED_RANGE`] seeds. Duplicates are dropped while keeping first-seen
/// order.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();
    let mut seen: HashSet<u64> = HashSet::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            let start = parse_seed(start)?;
            let end = parse_seed(end.trim_start_matches('='))?;
            if end < start {
                bail!("Seed range runs backwards: {token}");
            }
            if end - start >= MAX_SEED_RANGE {
                bail!("Seed range {token} spans more than {MAX_SEED_RANGE} seeds");
            }
            for seed in start..=end {
                push_unique(&mut seeds, &mut seen, seed);
            }
            continue;
        }

        push_unique(&mut seeds, &mut seen, parse_seed(token)?);
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn parse_seed(token: &str) -> Result<u64> {
    let token = token.trim();
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        && let Ok(value) = u64::from_str_radix(hex, 16)
    {
        return Ok(value);
    }

    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }

    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }

    bail!("Unrecognized seed token: {token}");
}

fn push_unique(seeds: &mut Vec<u64>, seen: &mut HashSet<u64>, seed: u64) {
    if seen.insert(seed) {
        seeds.push(seed);
    }
}

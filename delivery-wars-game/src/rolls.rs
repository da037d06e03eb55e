//! Random draw sources.
//!
//! Every random decision in the engine goes through [`Rolls`]. Sessions use
//! [`RunStreams`], a set of seeded per-domain streams; tests inject
//! [`ScriptedRolls`] to pin outcomes.

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use sha2::Sha256;
use std::collections::VecDeque;

/// Source of the bounded draws the simulation needs.
pub trait Rolls {
    /// Uniform integer in `[min, max]`, both inclusive.
    fn int_between(&mut self, min: i32, max: i32) -> i32;

    /// Uniform percentage draw in `[0, 100)`.
    fn percent(&mut self) -> f64;

    /// Uniform index in `[0, len)`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize;

    /// Opaque 32-bit token used for identifiers.
    fn token(&mut self) -> u32;
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

impl<R: RngCore> Rolls for CountingRng<R> {
    fn int_between(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.gen_range(min..=max)
    }

    fn percent(&mut self) -> f64 {
        self.gen_range(0.0..100.0)
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.gen_range(0..len)
    }

    fn token(&mut self) -> u32 {
        self.next_u32()
    }
}

/// Deterministic bundle of RNG streams segregated by simulation domain.
#[derive(Debug, Clone)]
pub struct RunStreams {
    jobs: CountingRng<SmallRng>,
    resolve: CountingRng<SmallRng>,
    upkeep: CountingRng<SmallRng>,
}

impl RunStreams {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            jobs: CountingRng::new(derive_stream_seed(seed, b"jobs")),
            resolve: CountingRng::new(derive_stream_seed(seed, b"resolve")),
            upkeep: CountingRng::new(derive_stream_seed(seed, b"upkeep")),
        }
    }

    /// Stream feeding job generation.
    pub fn jobs(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.jobs
    }

    /// Stream feeding delivery resolution.
    pub fn resolve(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.resolve
    }

    /// Stream feeding overnight upkeep.
    pub fn upkeep(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.upkeep
    }

    /// Borrow the resolution and job streams together.
    pub fn resolve_and_jobs(
        &mut self,
    ) -> (&mut CountingRng<SmallRng>, &mut CountingRng<SmallRng>) {
        (&mut self.resolve, &mut self.jobs)
    }

    /// Borrow the upkeep and job streams together.
    pub fn upkeep_and_jobs(
        &mut self,
    ) -> (&mut CountingRng<SmallRng>, &mut CountingRng<SmallRng>) {
        (&mut self.upkeep, &mut self.jobs)
    }

    /// Total draws across every stream.
    #[must_use]
    pub const fn total_draws(&self) -> u64 {
        self.jobs
            .draws()
            .saturating_add(self.resolve.draws())
            .saturating_add(self.upkeep.draws())
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).map_or(user_seed, |mut mac| {
        mac.update(domain_tag);
        let digest = mac.finalize().into_bytes();
        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(seed_bytes)
    })
}

/// Fixed-sequence draw source.
///
/// Integer-shaped draws (`int_between`, `index`, `token`) and percentage
/// draws come from two separate queues, so a script only has to list the
/// values for each kind in call order. Scripted integers are clamped into the
/// requested range. Once a queue runs dry, integers fall back to the range
/// minimum and percentages to `50.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    ints: VecDeque<i64>,
    percents: VecDeque<f64>,
}

impl ScriptedRolls {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append integer draws.
    #[must_use]
    pub fn ints(mut self, values: impl IntoIterator<Item = i64>) -> Self {
        self.ints.extend(values);
        self
    }

    /// Append percentage draws.
    #[must_use]
    pub fn percents(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.percents.extend(values);
        self
    }

    /// Number of scripted draws not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.ints.len() + self.percents.len()
    }
}

impl Rolls for ScriptedRolls {
    fn int_between(&mut self, min: i32, max: i32) -> i32 {
        let Some(value) = self.ints.pop_front() else {
            return min;
        };
        let upper = max.max(min);
        i32::try_from(value.clamp(i64::from(min), i64::from(upper))).unwrap_or(min)
    }

    fn percent(&mut self) -> f64 {
        self.percents.pop_front().unwrap_or(50.0)
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.ints
            .pop_front()
            .and_then(|value| usize::try_from(value).ok())
            .map_or(0, |value| value.min(len - 1))
    }

    fn token(&mut self) -> u32 {
        self.ints
            .pop_front()
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(0)
    }
}

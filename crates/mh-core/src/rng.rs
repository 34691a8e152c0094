//! Deterministic RNG streams.
//!
//! # Determinism strategy
//!
//! All randomness in a run descends from one `u64` seed held in an
//! [`RngStream`].  Nothing reads ambient or thread-local randomness.
//!
//! - **Per-agent, per-tick** draws (treatment coin-flips, relapse) use an
//!   [`AgentRng`] seeded by mixing `(seed, agent, tick)`.  The RNG state for a
//!   tick is therefore a pure function of the run seed and the tick counter:
//!   agents never share state, tick order across agents is irrelevant, and a
//!   restored snapshot continues bit-identically without storing generator
//!   internals.
//! - **Setup** draws (population sampling, network generation, programme
//!   enrolment) use a [`SimRng`] derived from the seed and a fixed
//!   [`Substream`] salt, so adding draws to one setup phase never perturbs
//!   another.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::{AgentId, MhError, MhResult, Tick};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// SplitMix64 finaliser.  Spreads nearby inputs across the whole seed space.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG for a single tick.
///
/// Create with [`RngStream::agent`]; the value is cheap to construct and is
/// dropped at the end of the agent's update.  The type is `!Sync` to prevent
/// accidental sharing across threads.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed, an agent ID and
    /// the tick being computed.
    pub fn new(global_seed: u64, agent: AgentId, tick: Tick) -> Self {
        let agent_seed = mix64(global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT));
        AgentRng(SmallRng::seed_from_u64(mix64(agent_seed ^ tick.0)))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for setup phases (population sampling, network
/// generation, programme enrolment).
///
/// Used only in single-threaded contexts.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// One draw from `Normal(mean, sd)`.
    ///
    /// Fails with [`MhError::Config`] if `sd` is negative or non-finite.
    pub fn normal(&mut self, mean: f64, sd: f64) -> MhResult<f64> {
        if !(sd.is_finite() && sd >= 0.0) {
            return Err(MhError::Config(format!("normal sd must be finite and non-negative, got {sd}")));
        }
        let dist = Normal::new(mean, sd)
            .map_err(|e| MhError::Config(format!("invalid normal({mean}, {sd}): {e}")))?;
        Ok(dist.sample(&mut self.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }
}

// ── RngStream ─────────────────────────────────────────────────────────────────

/// Setup phases that draw from their own independent [`SimRng`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Substream {
    Population,
    Network,
    Enrolment,
}

impl Substream {
    fn salt(self) -> u64 {
        match self {
            Substream::Population => 0x01,
            Substream::Network    => 0x02,
            Substream::Enrolment  => 0x03,
        }
    }
}

/// The RNG stream state of one simulation instance.
///
/// Holds only the run seed; every generator is derived from it on demand, so
/// the stream is `Copy` and two instances with the same seed are
/// indistinguishable.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RngStream {
    seed: u64,
}

impl RngStream {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// RNG for `agent`'s update that produces tick `tick`.
    #[inline]
    pub fn agent(&self, agent: AgentId, tick: Tick) -> AgentRng {
        AgentRng::new(self.seed, agent, tick)
    }

    /// RNG for one setup phase.
    pub fn substream(&self, which: Substream) -> SimRng {
        SimRng::new(mix64(self.seed ^ which.salt().wrapping_mul(MIXING_CONSTANT)))
    }
}

//! Randomized delays for the typewriter animation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inclusive range of delays in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    /// Shortest delay.
    pub min_ms: u64,
    /// Longest delay.
    pub max_ms: u64,
}

impl DelayRange {
    /// Create a range. Bounds are swapped if given in reverse.
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        if min_ms <= max_ms {
            Self { min_ms, max_ms }
        } else {
            Self {
                min_ms: max_ms,
                max_ms: min_ms,
            }
        }
    }

    /// Lower bound, whichever field holds it.
    pub fn lo(&self) -> u64 {
        self.min_ms.min(self.max_ms)
    }

    /// Upper bound, whichever field holds it.
    pub fn hi(&self) -> u64 {
        self.min_ms.max(self.max_ms)
    }

    /// Whether `ms` lies within the range.
    pub fn contains(&self, ms: u64) -> bool {
        (self.lo()..=self.hi()).contains(&ms)
    }
}

impl std::fmt::Display for DelayRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}ms", self.lo(), self.hi())
    }
}

/// Picks a delay from a range.
pub trait DelaySource: Send {
    /// Pick a delay, uniformly and inclusively, from `range`.
    fn pick(&mut self, range: DelayRange) -> Duration;
}

/// Uniform delays from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngDelays;

impl DelaySource for ThreadRngDelays {
    fn pick(&mut self, range: DelayRange) -> Duration {
        let ms = rand::thread_rng().gen_range(range.lo()..=range.hi());
        Duration::from_millis(ms)
    }
}

/// Uniform delays from a seeded generator, reproducible across runs.
#[derive(Debug, Clone)]
pub struct SeededDelays {
    rng: StdRng,
}

impl SeededDelays {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DelaySource for SeededDelays {
    fn pick(&mut self, range: DelayRange) -> Duration {
        Duration::from_millis(self.rng.gen_range(range.lo()..=range.hi()))
    }
}

/// Where in a range [`FixedDelays`] picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixedPick {
    #[default]
    Min,
    Max,
}

/// Always picks the same end of every range.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDelays {
    pick: FixedPick,
}

impl FixedDelays {
    /// Always pick the lower bound.
    pub fn min() -> Self {
        Self {
            pick: FixedPick::Min,
        }
    }

    /// Always pick the upper bound.
    pub fn max() -> Self {
        Self {
            pick: FixedPick::Max,
        }
    }
}

impl DelaySource for FixedDelays {
    fn pick(&mut self, range: DelayRange) -> Duration {
        match self.pick {
            FixedPick::Min => Duration::from_millis(range.lo()),
            FixedPick::Max => Duration::from_millis(range.hi()),
        }
    }
}

//! Probability ramp — linear warm-up of a pass probability over time.
//!
//! The chance of passing starts at `minimum_chance` when the ramp is built
//! (or reset) and climbs linearly to `maximum_chance` over `max_duration`,
//! then stays there.
//!
//! ```text
//! chance
//!   max ┤        ┌──────────────
//!       │      ╱
//!       │    ╱
//!   min ┤──╱
//!       └──┴─────┴──────────────▶ elapsed
//!          0   max_duration
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{RampError, RampResult};
use crate::random::{RandomSource, ThreadRandom};

/// A time-based probability ramp.
///
/// `current_chance`, `check` and `reset` all read or write the start
/// timestamp under one lock, so a reset never interleaves with a read.
/// `check` releases the lock before drawing from the random source.
pub struct ProbabilityRamp<C = SystemClock, R = ThreadRandom> {
    minimum_chance: f64,
    maximum_chance: f64,
    max_duration: Duration,
    clock: C,
    random: R,
    /// Start of the current ramp cycle.
    start: Mutex<Instant>,
}

/// Point-in-time view of a ramp, taken under a single lock.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RampSnapshot {
    /// Current pass probability.
    pub chance: f64,
    /// Fraction of the warm-up completed, in `[0, 1]`.
    pub progress: f64,
    /// Milliseconds since the current cycle started.
    pub elapsed_ms: u64,
    /// Whether the warm-up has finished.
    pub saturated: bool,
}

impl ProbabilityRamp {
    /// Create a ramp driven by the system clock and a thread-local generator.
    pub fn new(
        minimum_chance: f64,
        maximum_chance: f64,
        max_duration: Duration,
    ) -> RampResult<Self> {
        Self::with_sources(
            minimum_chance,
            maximum_chance,
            max_duration,
            SystemClock,
            ThreadRandom,
        )
    }
}

impl<C: Clock, R: RandomSource> ProbabilityRamp<C, R> {
    /// Create a ramp with an injected clock and random source.
    pub fn with_sources(
        minimum_chance: f64,
        maximum_chance: f64,
        max_duration: Duration,
        clock: C,
        random: R,
    ) -> RampResult<Self> {
        if let Err(e) = validate(minimum_chance, maximum_chance, max_duration) {
            warn!(error = %e, "rejected probability ramp");
            return Err(e);
        }

        let start = clock.now();
        let max_duration_ms = millis(max_duration);
        debug!(
            minimum_chance,
            maximum_chance,
            max_duration_ms,
            "created probability ramp"
        );

        Ok(Self {
            minimum_chance,
            maximum_chance,
            max_duration,
            clock,
            random,
            start: Mutex::new(start),
        })
    }

    pub fn minimum_chance(&self) -> f64 {
        self.minimum_chance
    }

    pub fn maximum_chance(&self) -> f64 {
        self.maximum_chance
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Current pass probability, in `[minimum_chance, maximum_chance]`.
    pub fn current_chance(&self) -> f64 {
        let start = self.lock_start();
        self.chance_at(self.elapsed_since(*start))
    }

    /// Draw once from the random source and pass if the draw falls below
    /// the current chance.
    pub fn check(&self) -> bool {
        let start = self.lock_start();
        let chance = self.chance_at(self.elapsed_since(*start));
        drop(start);

        // Always exactly one draw, and a zero chance never passes whatever
        // the source returns.
        let draw = self.random.next_ratio();
        let passed = chance > 0.0 && draw < chance;
        trace!(chance, draw, passed, "ramp check");
        passed
    }

    /// Restart the warm-up from `minimum_chance`.
    pub fn reset(&self) {
        let mut start = self.lock_start();
        let now = self.clock.now();
        let elapsed_ms = millis(now.saturating_duration_since(*start));
        debug!(elapsed_ms, "resetting probability ramp");
        *start = now;
    }

    /// Time since the current cycle started.
    pub fn elapsed(&self) -> Duration {
        let start = self.lock_start();
        self.elapsed_since(*start)
    }

    /// Fraction of the warm-up completed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let start = self.lock_start();
        self.progress_at(self.elapsed_since(*start))
    }

    /// Whether the ramp has reached `maximum_chance`.
    pub fn is_saturated(&self) -> bool {
        self.elapsed() >= self.max_duration
    }

    pub fn snapshot(&self) -> RampSnapshot {
        let start = self.lock_start();
        let elapsed = self.elapsed_since(*start);
        RampSnapshot {
            chance: self.chance_at(elapsed),
            progress: self.progress_at(elapsed),
            elapsed_ms: millis(elapsed),
            saturated: elapsed >= self.max_duration,
        }
    }

    // The guarded value is a plain `Instant`, which a panicking holder
    // cannot leave half-written, so poisoning is ignored.
    fn lock_start(&self) -> MutexGuard<'_, Instant> {
        self.start.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn elapsed_since(&self, start: Instant) -> Duration {
        self.clock.now().saturating_duration_since(start)
    }

    fn progress_at(&self, elapsed: Duration) -> f64 {
        if elapsed >= self.max_duration {
            return 1.0;
        }
        elapsed.as_secs_f64() / self.max_duration.as_secs_f64()
    }

    fn chance_at(&self, elapsed: Duration) -> f64 {
        if elapsed >= self.max_duration {
            return self.maximum_chance;
        }
        let span = self.maximum_chance - self.minimum_chance;
        self.minimum_chance + self.progress_at(elapsed) * span
    }
}

impl<C, R> std::fmt::Debug for ProbabilityRamp<C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbabilityRamp")
            .field("minimum_chance", &self.minimum_chance)
            .field("maximum_chance", &self.maximum_chance)
            .field("max_duration", &self.max_duration)
            .finish_non_exhaustive()
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Check ramp arguments in order: minimum, maximum, ordering, duration.
fn validate(
    minimum_chance: f64,
    maximum_chance: f64,
    max_duration: Duration,
) -> RampResult<()> {
    // `contains` is false for NaN, so NaN is rejected here too.
    if !(0.0..=1.0).contains(&minimum_chance) {
        return Err(RampError::out_of_range("minimum_chance", minimum_chance));
    }
    if !(0.0..=1.0).contains(&maximum_chance) {
        return Err(RampError::out_of_range("maximum_chance", maximum_chance));
    }
    if minimum_chance > maximum_chance {
        return Err(RampError::InvalidConfiguration {
            minimum: minimum_chance,
            maximum: maximum_chance,
        });
    }
    if max_duration.is_zero() {
        return Err(RampError::out_of_range(
            "max_duration",
            format!("{max_duration:?}"),
        ));
    }
    Ok(())
}

//! Virtual-time clock and state hashing.
//!
//! The session never reads wall-clock time. The embedder calls
//! `advance(dt)` with elapsed seconds; the clock accumulates fractional
//! time and pays it out as whole one-second ticks, carrying the remainder
//! forward. Tests advance time deterministically the same way.

use crate::fixed::{Fixed64, Ticks};

// ---------------------------------------------------------------------------
// TickClock
// ---------------------------------------------------------------------------

/// Accumulator clock producing fixed one-second ticks from variable deltas.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TickClock {
    /// Duration of one tick, in seconds.
    period: Fixed64,

    /// Accumulated time remainder, always in `[0, period)` after advance.
    accumulator: Fixed64,

    /// Total ticks produced since construction or the last reset.
    tick: Ticks,
}

impl TickClock {
    /// A clock ticking once per second.
    pub fn per_second() -> Self {
        Self::with_period(Fixed64::from_num(1))
    }

    /// A clock with an explicit tick period, in seconds.
    pub fn with_period(period: Fixed64) -> Self {
        debug_assert!(period > Fixed64::ZERO);
        Self {
            period,
            accumulator: Fixed64::ZERO,
            tick: 0,
        }
    }

    /// Feed elapsed time; returns how many whole ticks fit.
    pub fn advance(&mut self, dt: Fixed64) -> u32 {
        self.accumulate(dt);
        let mut ticks = 0u32;
        while self.consume_tick() {
            ticks += 1;
        }
        ticks
    }

    /// Feed elapsed time into the accumulator without paying out ticks.
    /// Non-positive deltas are ignored.
    pub fn accumulate(&mut self, dt: Fixed64) {
        if dt <= Fixed64::ZERO {
            return;
        }
        self.accumulator += dt;
    }

    /// Pay out one tick if a whole period is banked. Callers that need the
    /// tick counter to be exact per tick drive this in a loop instead of
    /// [`TickClock::advance`].
    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= self.period {
            self.accumulator -= self.period;
            self.tick += 1;
            true
        } else {
            false
        }
    }

    /// Current tick counter.
    pub fn tick(&self) -> Ticks {
        self.tick
    }

    /// Drop any accumulated remainder and restart the counter.
    pub fn reset(&mut self) {
        self.accumulator = Fixed64::ZERO;
        self.tick = 0;
    }

    /// The unspent fraction of the current tick.
    pub fn accumulator(&self) -> Fixed64 {
        self.accumulator
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A simple deterministic hash of session state for desync detection.
///
/// Uses FNV-1a (64-bit) for speed and simplicity. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    /// Start a new hash.
    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    /// Feed bytes into the hash.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    /// Feed a u64 into the hash.
    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    /// Feed a u32 into the hash.
    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    /// Feed a Fixed64 into the hash.
    pub fn write_fixed64(&mut self, v: Fixed64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    /// Finalize and return the hash value.
    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

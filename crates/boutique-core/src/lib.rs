//! Boutique Core -- the deterministic game core for a wave-based shop sim.
//!
//! This crate provides the clothing inventory, the customer catalog, the
//! preference-matching engine, the wave session state machine, events, and
//! the fixed-point arithmetic and seeded RNG that keep a wave replayable
//! from a seed and an action script.
//!
//! # Wave Tick Pipeline
//!
//! Each whole second paid out by the session clock runs one tick through
//! [`session::WaveSession::advance`]:
//!
//! 1. **Countdown** -- Decrement the wave timer; at zero the wave ends and
//!    the tick stops here.
//! 2. **Patience sweep** -- Every visible, unserved customer loses patience
//!    (half rate while waiting on a make-to-order); anyone reaching zero
//!    walks out.
//! 3. **Exhaustion check** -- When every sampled customer has been served,
//!    the wave ends early.
//!
//! The clock only runs while the session is `Playing`: showing a sale
//! outcome freezes the countdown and every customer's patience.
//!
//! # Key Types
//!
//! - [`session::WaveSession`] -- The wave state machine and action surface.
//! - [`item::Inventory`] -- Player-created clothing in creation order; the
//!   sales rack is its first N items.
//! - [`catalog::CustomerCatalog`] -- Validated customer definitions sampled
//!   into each wave.
//! - [`matching::evaluate`] -- Price, shape, color, pattern preference check
//!   with child-readable rejection reasons.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`rng::GameRng`] -- Seeded SplitMix64 stream behind sampling, VIP
//!   rolls, and hint phrasing.
//! - [`event::EventBus`] -- Per-kind ring buffers the driver polls for cues.
//! - [`save::SaveStore`] -- Key to JSON-blob persistence seam.

pub mod catalog;
pub mod clock;
pub mod customer;
pub mod event;
pub mod fixed;
pub mod id;
pub mod item;
pub mod matching;
pub mod queue;
pub mod rng;
pub mod save;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

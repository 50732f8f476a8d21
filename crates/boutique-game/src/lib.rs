//! Boutique Game -- the driver that turns the headless core into a game.
//!
//! One [`Game`] value owns the customer catalog, the inventory, the
//! progression / achievement / upgrade ledgers, the tutorial log, and the
//! live wave session, and wires their events into the embedding's audio
//! and particle sinks. Embeddings construct it with a save store and
//! their platform sinks, then drive it from input handlers and a frame
//! loop. Everything below stays deterministic; the sinks and the store
//! are the only way side effects leave.

pub mod craft;
pub mod cues;
pub mod game;
pub mod tips;
pub mod tutorial;

mod persist;

pub use craft::{CraftPrefill, CustomerRef};
pub use cues::{AudioSink, EffectId, MusicTrack, NullAudio, NullParticles, ParticleSink, SoundCue};
pub use game::Game;
pub use tutorial::{TutorialId, TutorialLog};

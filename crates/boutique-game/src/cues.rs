//! Presentation cues and the sinks they are routed to.
//!
//! The core crates stay headless: nothing below this module plays a sound
//! or draws a particle. The driver translates session and ledger events
//! into cue names and hands them to whatever [`AudioSink`] and
//! [`ParticleSink`] the embedding supplied. A terminal harness plugs in
//! the null sinks; a real frontend maps each name onto an asset.

// ---------------------------------------------------------------------------
// Cue names
// ---------------------------------------------------------------------------

/// One-shot sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Click,
    Pop,
    Whoosh,
    ChaChing,
    Sparkle,
    Success,
    Fail,
    LevelUp,
    Achievement,
}

impl SoundCue {
    /// Stable asset key for the embedding's sound table.
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Click => "click",
            SoundCue::Pop => "pop",
            SoundCue::Whoosh => "whoosh",
            SoundCue::ChaChing => "cha-ching",
            SoundCue::Sparkle => "sparkle",
            SoundCue::Success => "success",
            SoundCue::Fail => "fail",
            SoundCue::LevelUp => "level-up",
            SoundCue::Achievement => "achievement",
        }
    }
}

/// Looping background tracks, one per screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicTrack {
    HomeLoop,
    WorkshopLoop,
    StoreLoop,
}

impl MusicTrack {
    pub fn name(self) -> &'static str {
        match self {
            MusicTrack::HomeLoop => "home-loop",
            MusicTrack::WorkshopLoop => "workshop-loop",
            MusicTrack::StoreLoop => "store-loop",
        }
    }
}

/// Particle effects the embedding can render.
///
/// `SuccessBurst` is part of the vocabulary for embeddings to fire
/// directly (e.g. at a tapped element); the driver itself never routes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectId {
    Celebration,
    CoinBurst,
    Sparkles,
    SuccessBurst,
    SoftFail,
    LevelUpBurst,
    AchievementBurst,
}

impl EffectId {
    pub fn name(self) -> &'static str {
        match self {
            EffectId::Celebration => "celebration",
            EffectId::CoinBurst => "coin-burst",
            EffectId::Sparkles => "sparkles",
            EffectId::SuccessBurst => "success-burst",
            EffectId::SoftFail => "soft-fail",
            EffectId::LevelUpBurst => "level-up-burst",
            EffectId::AchievementBurst => "achievement-burst",
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Audio output seam. Calls are fire-and-forget; the driver mutes all of
/// them when sound is disabled in the settings.
pub trait AudioSink {
    fn play_one_shot(&mut self, cue: SoundCue);
    fn play_loop(&mut self, track: MusicTrack);
    fn stop_loop(&mut self);
}

/// Particle output seam. `x` and `y` are normalized to the play area:
/// `(0.0, 0.0)` top-left, `(1.0, 1.0)` bottom-right. Embeddings debounce
/// as they see fit.
pub trait ParticleSink {
    fn fire(&mut self, effect: EffectId, x: f32, y: f32);
}

/// Sink that drops every cue. The default for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_one_shot(&mut self, _cue: SoundCue) {}

    fn play_loop(&mut self, _track: MusicTrack) {}

    fn stop_loop(&mut self) {}
}

/// Particle sink that drops every effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullParticles;

impl ParticleSink for NullParticles {
    fn fire(&mut self, _effect: EffectId, _x: f32, _y: f32) {}
}

// ---------------------------------------------------------------------------
// Recording sinks (test support)
// ---------------------------------------------------------------------------

/// Captures every audio call in order, for assertions.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub one_shots: Vec<SoundCue>,
    pub loops: Vec<MusicTrack>,
    pub stops: u32,
}

#[cfg(any(test, feature = "test-utils"))]
impl AudioSink for RecordingAudio {
    fn play_one_shot(&mut self, cue: SoundCue) {
        self.one_shots.push(cue);
    }

    fn play_loop(&mut self, track: MusicTrack) {
        self.loops.push(track);
    }

    fn stop_loop(&mut self) {
        self.stops += 1;
    }
}

/// Captures every fired effect in order.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, Default)]
pub struct RecordingParticles {
    pub fired: Vec<EffectId>,
}

#[cfg(any(test, feature = "test-utils"))]
impl ParticleSink for RecordingParticles {
    fn fire(&mut self, effect: EffectId, _x: f32, _y: f32) {
        self.fired.push(effect);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

//! The game driver.
//!
//! [`Game`] is the embedding-facing facade: one value that owns the
//! customer catalog, the player's inventory, the persistent ledgers, the
//! optional live wave session, and the audio/particle sinks. Embeddings
//! call its methods from input handlers and a frame loop; the driver keeps
//! the ledgers consistent, persists after every mutation batch, and routes
//! events to the sinks.
//!
//! # Wiring rules
//!
//! - A successful sale settles in a fixed order: the session removes the
//!   item, then the money lands, then the per-sale XP, then the sale
//!   achievement counters, then everything touched is persisted.
//! - Wave end grants the wave XP bonus (only when at least one sale
//!   succeeded), runs the wave-level achievement checks, then archives the
//!   result into the wave history.
//! - Events are routed after every action or tick batch, oldest first, and
//!   each event is routed exactly once.

use std::collections::HashSet;

use boutique_core::catalog::CustomerCatalog;
use boutique_core::customer::Preference;
use boutique_core::event::{Event, EventKind};
use boutique_core::fixed::{Fixed64, f64_to_fixed64};
use boutique_core::id::{CustomerId, ItemId};
use boutique_core::item::{Color, Inventory, ItemDraft, PriceLevel};
use boutique_core::save::{SaveStore, StoreKey};
use boutique_core::session::{
    DEFAULT_RACK_CAPACITY, SessionConfig, Settlement, WaveError, WavePhase, WaveResult,
    WaveSession,
};
use boutique_progression::{ProgressionEvent, ProgressionLedger, Unlock, XP_PER_SALE, XP_PER_WAVE};

use boutique_achievements::{AchievementBoard, AchievementId};
use boutique_upgrades::{UpgradeId, UpgradeLedger};

use crate::craft::{self, CraftPrefill, CustomerRef};
use crate::cues::{AudioSink, EffectId, MusicTrack, ParticleSink, SoundCue};
use crate::persist;
use crate::tips;
use crate::tutorial::{TutorialId, TutorialLog};

/// Seconds of `advance` time after a wave ends before the results screen
/// opens.
const EXIT_DELAY_SECS: f64 = 0.5;

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// Everything one player profile owns, wired together.
///
/// Generic over the persistence store and the two presentation sinks so a
/// test harness can plug in an in-memory store and recording sinks while a
/// real embedding brings its platform backends.
pub struct Game<S, A, P> {
    catalog: CustomerCatalog,
    inventory: Inventory,
    progression: ProgressionLedger,
    achievements: AchievementBoard,
    upgrades: UpgradeLedger,
    tutorials: TutorialLog,
    session: Option<WaveSession>,
    /// Advance time accumulated since the wave ended.
    exit_delay: Fixed64,
    /// Per-kind count of session events already routed.
    events_seen: [u64; EventKind::ALL.len()],
    store: S,
    audio: A,
    particles: P,
}

impl<S: SaveStore, A: AudioSink, P: ParticleSink> Game<S, A, P> {
    /// Rehydrates every ledger from the store and stands the driver up.
    /// Missing or corrupt blobs load as fresh state.
    pub fn new(catalog: CustomerCatalog, store: S, audio: A, particles: P) -> Self {
        let progression = persist::load_or_default(&store, StoreKey::Game);
        let inventory = persist::load_or_default(&store, StoreKey::Inventory);
        let achievements = persist::load_or_default(&store, StoreKey::Achievements);
        let upgrades = persist::load_or_default(&store, StoreKey::Upgrades);
        let tutorials = persist::load_or_default(&store, StoreKey::Tutorials);
        Self {
            catalog,
            inventory,
            progression,
            achievements,
            upgrades,
            tutorials,
            session: None,
            exit_delay: Fixed64::ZERO,
            events_seen: [0; EventKind::ALL.len()],
            store,
            audio,
            particles,
        }
    }

    // -- Read access ---------------------------------------------------

    pub fn catalog(&self) -> &CustomerCatalog {
        &self.catalog
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn progression(&self) -> &ProgressionLedger {
        &self.progression
    }

    pub fn achievements(&self) -> &AchievementBoard {
        &self.achievements
    }

    pub fn upgrades(&self) -> &UpgradeLedger {
        &self.upgrades
    }

    pub fn tutorials(&self) -> &TutorialLog {
        &self.tutorials
    }

    /// The live wave session, if one is up.
    pub fn session(&self) -> Option<&WaveSession> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn particles(&self) -> &P {
        &self.particles
    }

    // -- Wave lifecycle ------------------------------------------------

    /// Starts the next wave with the current stock, folding the upgrade
    /// effects into the session config.
    pub fn start_wave(&mut self, seed: u64) -> Result<(), WaveError> {
        if let Some(session) = &self.session {
            if matches!(session.phase(), WavePhase::Playing | WavePhase::Result) {
                return Err(WaveError::AlreadyStarted);
            }
        }
        let config = SessionConfig {
            wave_number: self.progression.wave_number(),
            duration_secs: self.progression.settings().wave_duration_secs
                + self.upgrades.wave_time_bonus(),
            rack_capacity: DEFAULT_RACK_CAPACITY + self.upgrades.rack_bonus(),
            tip_bonus: self.upgrades.tip_bonus(),
            seed,
            ..SessionConfig::default()
        };
        let mut session = WaveSession::new(config);
        session.start_wave(&self.catalog, &self.inventory)?;
        self.session = Some(session);
        self.exit_delay = Fixed64::ZERO;
        self.events_seen = [0; EventKind::ALL.len()];
        self.pump();
        Ok(())
    }

    /// Runs wave time forward. `dt` is elapsed seconds; `now_ms` is wall
    /// clock, used only to timestamp achievement unlocks.
    pub fn advance(&mut self, dt: Fixed64, now_ms: u64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase() == WavePhase::Ended {
            self.exit_delay += dt;
            return;
        }
        let outcome = session.advance(dt);
        if let Some(result) = outcome.ended {
            self.handle_wave_end(result, now_ms);
        }
        self.pump();
    }

    /// True once the wave has ended and the short exit pause has run its
    /// course, so the results screen should open.
    pub fn results_ready(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.phase() == WavePhase::Ended)
            && self.exit_delay >= f64_to_fixed64(EXIT_DELAY_SECS)
    }

    /// Drops the live session. Mid-wave this abandons the wave without a
    /// result; after the results it just puts the store away.
    pub fn abandon_wave(&mut self) {
        self.session = None;
        self.exit_delay = Fixed64::ZERO;
        self.events_seen = [0; EventKind::ALL.len()];
    }

    // -- Player actions ------------------------------------------------

    /// Selects (or re-selects) a rack item to offer.
    pub fn select_item(&mut self, item: ItemId) {
        if let Some(session) = self.session.as_mut() {
            session.select_item(item, &self.inventory);
        }
        self.pump();
    }

    /// Taps a customer: with a selection this attempts the sale, without
    /// one it toggles the "make it for them" prompt.
    pub fn tap_customer(&mut self, customer: CustomerId) {
        if let Some(session) = self.session.as_mut() {
            session.tap_customer(customer, &self.inventory);
        }
        self.pump();
    }

    /// A speech-bubble hint phrased from the customer's preferences.
    /// Draws on the wave RNG, so asking is part of the replay script.
    pub fn customer_hint(&mut self, customer: CustomerId) -> Option<String> {
        self.session.as_mut()?.preference_hint(customer)
    }

    /// Accepts the "make it" prompt: reserves the customer and seeds the
    /// crafting form from their preferences. `None` when the prompt is
    /// not showing for this customer.
    pub fn begin_make_to_order(&mut self, customer: CustomerId) -> Option<CraftPrefill> {
        let reserved = self
            .session
            .as_mut()
            .is_some_and(|session| session.begin_make_to_order(customer));
        self.pump();
        if reserved {
            Some(self.craft_prefill(CustomerRef::Runtime(customer)))
        } else {
            None
        }
    }

    /// Settles the pending sale outcome. On success the sold item is
    /// already gone from the inventory when the money, XP, and sale
    /// achievements land. Returns `None` when nothing is pending.
    pub fn acknowledge_result(&mut self, now_ms: u64) -> Option<Settlement> {
        let session = self.session.as_mut()?;
        let settlement = session.acknowledge_result(&mut self.inventory)?;

        if settlement.record.success {
            self.progression.add_money(settlement.record.coins);
            self.progression.add_xp(XP_PER_SALE);
            self.achievements.track_sale(now_ms);
            self.achievements
                .track_coins_earned(self.progression.total_money(), now_ms);
            self.save_game();
            self.save_inventory();
            self.save_achievements();
        }
        if let Some(result) = settlement.ended.clone() {
            self.handle_wave_end(result, now_ms);
        }
        self.pump();
        Some(settlement)
    }

    // -- Crafting ------------------------------------------------------

    /// Starting values for the crafting form when making for a customer.
    /// Unknown customers fall back to an unconstrained preference.
    pub fn craft_prefill(&self, customer: CustomerRef) -> CraftPrefill {
        let fallback = Preference::anything(PriceLevel::Three);
        let wants = match customer {
            CustomerRef::Static(id) => self.catalog.get(id).map(|def| &def.wants),
            CustomerRef::Runtime(id) => self
                .session
                .as_ref()
                .and_then(|session| session.customer(id))
                .map(|customer| &customer.wants),
        }
        .unwrap_or(&fallback);
        craft::prefill(wants, &self.progression.unlocked_colors())
    }

    /// Appends a finished craft to the inventory, advances the crafting
    /// achievements, and hands the item to a waiting make-to-order
    /// customer if one is reserved.
    pub fn finish_craft(&mut self, draft: ItemDraft, now_ms: u64) -> ItemId {
        let item_id = self.inventory.add(draft, now_ms);
        self.achievements.track_item_created(now_ms);
        let distinct: HashSet<Color> = self
            .inventory
            .items()
            .iter()
            .map(|item| item.color)
            .collect();
        self.achievements
            .track_colors_used(distinct.len() as u32, now_ms);
        self.sfx(SoundCue::Sparkle);
        self.burst(EffectId::Sparkles);
        if let Some(session) = self.session.as_mut() {
            session.deliver_crafted(item_id, &self.inventory);
        }
        self.save_inventory();
        self.save_achievements();
        self.pump();
        item_id
    }

    // -- Upgrades ------------------------------------------------------

    /// Buys the next level of an upgrade if affordable. The money moves
    /// first; `cost` being `Some` means the line is below max.
    pub fn purchase_upgrade(&mut self, id: UpgradeId) -> bool {
        let Some(cost) = self.upgrades.cost(id) else {
            return false;
        };
        if !self.progression.spend_money(cost) {
            return false;
        }
        self.upgrades.purchase(id);
        self.save_game();
        self.save_upgrades();
        self.pump();
        true
    }

    // -- Results & coaching ----------------------------------------------

    /// The coaching line for the most recent wave.
    pub fn wave_tip(&self) -> Option<&'static str> {
        self.progression.last_wave().map(tips::wave_tip)
    }

    // -- Toasts ------------------------------------------------------------

    /// Next unlock toast, oldest first. Popped toasts never come back,
    /// even across a save/load.
    pub fn pop_pending_unlock(&mut self) -> Option<Unlock> {
        let unlock = self.progression.pop_pending_unlock();
        if unlock.is_some() {
            self.save_game();
        }
        unlock
    }

    /// The level reached by the most recent level-up, for the celebration
    /// overlay.
    pub fn take_pending_level_up(&mut self) -> Option<u32> {
        let level = self.progression.take_pending_level_up();
        if level.is_some() {
            self.save_game();
        }
        level
    }

    /// Next achievement toast, oldest first.
    pub fn pop_pending_achievement(&mut self) -> Option<AchievementId> {
        let id = self.achievements.pop_pending();
        if id.is_some() {
            self.save_achievements();
        }
        id
    }

    // -- Tutorials -------------------------------------------------------

    pub fn should_show_tutorial(&self, id: TutorialId) -> bool {
        self.tutorials.should_show(id)
    }

    pub fn complete_tutorial(&mut self, id: TutorialId) {
        self.tutorials.complete(id);
        self.save_tutorials();
    }

    // -- Settings & presentation ------------------------------------------

    /// Flips the master sound switch. Muting also stops the running
    /// background loop.
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.progression.settings_mut().sound_enabled = enabled;
        if !enabled {
            self.audio.stop_loop();
        }
        self.save_game();
    }

    pub fn set_wave_duration_secs(&mut self, secs: u32) {
        self.progression.settings_mut().wave_duration_secs = secs;
        self.save_game();
    }

    /// Starts a screen's background loop, unless muted.
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.progression.settings().sound_enabled {
            self.audio.play_loop(track);
        }
    }

    pub fn stop_music(&mut self) {
        self.audio.stop_loop();
    }

    /// One-shot click for embedding button presses, respecting the mute
    /// switch.
    pub fn ui_click(&mut self) {
        self.sfx(SoundCue::Click);
    }

    // -- Profile ---------------------------------------------------------

    /// Wipes every ledger and every store blob back to a fresh profile.
    pub fn reset_all(&mut self) {
        self.session = None;
        self.exit_delay = Fixed64::ZERO;
        self.events_seen = [0; EventKind::ALL.len()];
        self.inventory = Inventory::new();
        self.progression.reset();
        self.achievements.reset();
        self.upgrades.reset();
        self.tutorials.reset();
        self.save_game();
        self.save_inventory();
        self.save_achievements();
        self.save_upgrades();
        self.save_tutorials();
    }

    // -- Wave end --------------------------------------------------------

    /// Books a finished wave: wave XP bonus when anything sold, the
    /// wave-level achievement checks, then the history entry.
    fn handle_wave_end(&mut self, result: WaveResult, now_ms: u64) {
        if result.items_sold > 0 {
            self.progression.add_xp(XP_PER_WAVE);
        }
        self.achievements.apply_wave(&result, now_ms);
        self.progression.complete_wave(result);
        self.exit_delay = Fixed64::ZERO;
        self.save_game();
        self.save_achievements();
    }

    // -- Event routing -----------------------------------------------------

    /// Drains session events not yet seen (oldest first) plus the ledger
    /// events, and routes them all to the sinks.
    fn pump(&mut self) {
        let mut batch: Vec<Event> = Vec::new();
        if let Some(session) = &self.session {
            for (slot, kind) in EventKind::ALL.into_iter().enumerate() {
                let Some(buffer) = session.events().buffer(kind) else {
                    continue;
                };
                let total = buffer.total_written();
                let fresh = (total - self.events_seen[slot]) as usize;
                if fresh == 0 {
                    continue;
                }
                // Events past the ring capacity are gone; route what's left.
                let start = buffer.len().saturating_sub(fresh);
                batch.extend(buffer.iter().skip(start).cloned());
                self.events_seen[slot] = total;
            }
        }
        batch.sort_by_key(Event::tick);
        for event in batch {
            self.route_session_event(&event);
        }
        self.route_ledger_events();
    }

    fn route_session_event(&mut self, event: &Event) {
        match event {
            Event::WaveStarted { .. } => self.sfx(SoundCue::Whoosh),
            Event::MakeToOrderStarted { .. } => self.sfx(SoundCue::Pop),
            Event::ItemDelivered { .. } => {
                self.sfx(SoundCue::Sparkle);
                self.burst(EffectId::Sparkles);
            }
            Event::DeliveryMissed { .. } => {}
            Event::CustomerWalkedOut {
                waiting_for_order, ..
            } => {
                // A missed order already stung; no second sting here.
                if !waiting_for_order {
                    self.sfx(SoundCue::Fail);
                }
            }
            Event::SaleCompleted { success, .. } => {
                if *success {
                    self.sfx(SoundCue::ChaChing);
                    self.burst(EffectId::CoinBurst);
                } else {
                    self.sfx(SoundCue::Fail);
                    self.burst(EffectId::SoftFail);
                }
            }
            Event::WaveEnded { items_sold, .. } => {
                if *items_sold > 0 {
                    self.sfx(SoundCue::Success);
                    self.burst(EffectId::Celebration);
                }
            }
        }
    }

    fn route_ledger_events(&mut self) {
        for event in self.progression.drain_events() {
            if let ProgressionEvent::LevelUp { .. } = event {
                self.sfx(SoundCue::LevelUp);
                self.burst(EffectId::LevelUpBurst);
            }
        }
        for _unlock in self.achievements.drain_events() {
            self.sfx(SoundCue::Achievement);
            self.burst(EffectId::AchievementBurst);
        }
        for _purchase in self.upgrades.drain_events() {
            self.sfx(SoundCue::Pop);
        }
    }

    fn sfx(&mut self, cue: SoundCue) {
        if self.progression.settings().sound_enabled {
            self.audio.play_one_shot(cue);
        }
    }

    /// Center-of-screen burst. Embeddings that track tap positions fire
    /// their own through the sink directly.
    fn burst(&mut self, effect: EffectId) {
        self.particles.fire(effect, 0.5, 0.5);
    }

    // -- Persistence -------------------------------------------------------

    fn save_game(&mut self) {
        persist::save(&mut self.store, StoreKey::Game, &self.progression);
    }

    fn save_inventory(&mut self) {
        persist::save(&mut self.store, StoreKey::Inventory, &self.inventory);
    }

    fn save_achievements(&mut self) {
        persist::save(&mut self.store, StoreKey::Achievements, &self.achievements);
    }

    fn save_upgrades(&mut self) {
        persist::save(&mut self.store, StoreKey::Upgrades, &self.upgrades);
    }

    fn save_tutorials(&mut self) {
        persist::save(&mut self.store, StoreKey::Tutorials, &self.tutorials);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

//! Player progression for the boutique: coins, XP, levels, and the unlock
//! schedule for colors and patterns.
//!
//! # Overview
//!
//! [`ProgressionLedger`] is the single owner of everything the player has
//! earned: the coin balance, experience points, the level derived from them,
//! the completed-wave history, and game settings. The driver credits coins
//! and XP as waves resolve; the ledger derives the level from
//! [`LEVEL_THRESHOLDS`] and queues the color/pattern unlocks each new level
//! grants.
//!
//! Level-ups and unlocks are consumed one at a time by the presentation layer
//! via [`ProgressionLedger::take_pending_level_up`] and
//! [`ProgressionLedger::pop_pending_unlock`], so a multi-level jump never
//! drops a reward. Both queues survive save/load; the transient
//! [`ProgressionEvent`] feed does not.

use boutique_core::item::{Color, Pattern};
use boutique_core::queue::PendingQueue;
use boutique_core::session::{DEFAULT_WAVE_DURATION_SECS, WaveResult};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Level math
// ---------------------------------------------------------------------------

/// XP granted for each successful sale.
pub const XP_PER_SALE: u32 = 10;

/// XP granted for finishing a wave with at least one successful sale.
pub const XP_PER_WAVE: u32 = 25;

/// Cumulative XP required to reach level `index + 1`.
pub const LEVEL_THRESHOLDS: [u32; 10] = [0, 50, 125, 250, 450, 700, 1000, 1400, 1900, 2500];

/// Highest reachable level.
pub const MAX_LEVEL: u32 = LEVEL_THRESHOLDS.len() as u32;

/// Level for a given XP total. Levels are 1-indexed: level `i + 1` is held
/// once XP meets `LEVEL_THRESHOLDS[i]`. Caps at [`MAX_LEVEL`].
pub fn calculate_level(xp: u32) -> u32 {
    let mut level = 1;
    for (index, &threshold) in LEVEL_THRESHOLDS.iter().enumerate() {
        if xp < threshold {
            break;
        }
        level = index as u32 + 1;
    }
    level
}

/// XP required to reach `level`. `None` outside `1..=MAX_LEVEL`.
pub fn xp_for_level(level: u32) -> Option<u32> {
    if level == 0 {
        return None;
    }
    LEVEL_THRESHOLDS.get(level as usize - 1).copied()
}

// ---------------------------------------------------------------------------
// Unlock schedule
// ---------------------------------------------------------------------------

/// Colors granted on reaching `level`. Level 1 is the starting palette;
/// levels past 5 grant nothing.
pub fn colors_for_level(level: u32) -> &'static [Color] {
    match level {
        1 => &[Color::Pink, Color::Blue, Color::Yellow, Color::Green],
        2 => &[Color::Purple],
        3 => &[Color::Orange],
        4 => &[Color::Red],
        5 => &[Color::White],
        _ => &[],
    }
}

/// Patterns granted on reaching `level`. Level 1 starts with plain fabric.
pub fn patterns_for_level(level: u32) -> &'static [Pattern] {
    match level {
        1 => &[Pattern::None],
        2 => &[Pattern::Stripes],
        3 => &[Pattern::Dots],
        4 => &[Pattern::Hearts],
        5 => &[Pattern::Stars],
        _ => &[],
    }
}

/// A single crafting option granted by a level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unlock {
    Color(Color),
    Pattern(Pattern),
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Player-tunable settings, persisted with the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub sound_enabled: bool,
    pub wave_duration_secs: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            wave_duration_secs: DEFAULT_WAVE_DURATION_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events emitted by the ledger since the last drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressionEvent {
    MoneyEarned { amount: u32, total: u32 },
    MoneySpent { amount: u32, total: u32 },
    XpGained { amount: u32, total: u32 },
    LevelUp { level: u32 },
    UnlockGranted { unlock: Unlock },
}

// ---------------------------------------------------------------------------
// ProgressionLedger
// ---------------------------------------------------------------------------

/// Coins, XP, level, wave history, and settings. Fully serializable except
/// for the transient event feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionLedger {
    total_money: u32,
    xp: u32,
    level: u32,

    /// Level reached by the most recent level-up, until the presentation
    /// layer takes it.
    pending_level_up: Option<u32>,

    /// Unlocks granted but not yet shown, oldest first.
    pending_unlocks: PendingQueue<Unlock>,

    /// Number of the next wave to play. Starts at 1.
    wave_number: u32,

    /// Results of completed waves, oldest first.
    wave_history: Vec<WaveResult>,

    settings: GameSettings,

    /// Events emitted since last drain. Not serialized (transient).
    #[serde(skip)]
    events: Vec<ProgressionEvent>,
}

impl ProgressionLedger {
    /// A fresh ledger: no coins, no XP, level 1, wave 1, default settings.
    pub fn new() -> Self {
        Self {
            total_money: 0,
            xp: 0,
            level: 1,
            pending_level_up: None,
            pending_unlocks: PendingQueue::new(),
            wave_number: 1,
            wave_history: Vec::new(),
            settings: GameSettings::default(),
            events: Vec::new(),
        }
    }

    // -- Queries --

    pub fn total_money(&self) -> u32 {
        self.total_money
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn wave_number(&self) -> u32 {
        self.wave_number
    }

    pub fn wave_history(&self) -> &[WaveResult] {
        &self.wave_history
    }

    /// The most recently completed wave, if any.
    pub fn last_wave(&self) -> Option<&WaveResult> {
        self.wave_history.last()
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GameSettings {
        &mut self.settings
    }

    /// Every color unlocked at the current level, in schedule order.
    pub fn unlocked_colors(&self) -> Vec<Color> {
        (1..=self.level)
            .flat_map(|level| colors_for_level(level).iter().copied())
            .collect()
    }

    /// Every pattern unlocked at the current level, in schedule order.
    pub fn unlocked_patterns(&self) -> Vec<Pattern> {
        (1..=self.level)
            .flat_map(|level| patterns_for_level(level).iter().copied())
            .collect()
    }

    pub fn is_color_unlocked(&self, color: Color) -> bool {
        (1..=self.level).any(|level| colors_for_level(level).contains(&color))
    }

    pub fn is_pattern_unlocked(&self, pattern: Pattern) -> bool {
        (1..=self.level).any(|level| patterns_for_level(level).contains(&pattern))
    }

    // -- Mutations --

    /// Credit coins. Never fails.
    pub fn add_money(&mut self, amount: u32) {
        self.total_money = self.total_money.saturating_add(amount);
        self.events.push(ProgressionEvent::MoneyEarned {
            amount,
            total: self.total_money,
        });
    }

    /// Debit coins. Returns `false` and leaves the balance untouched when
    /// there aren't enough.
    pub fn spend_money(&mut self, amount: u32) -> bool {
        if self.total_money < amount {
            return false;
        }
        self.total_money -= amount;
        self.events.push(ProgressionEvent::MoneySpent {
            amount,
            total: self.total_money,
        });
        true
    }

    /// Credit XP and recompute the level. On a level-up, stores the new level
    /// for [`take_pending_level_up`](Self::take_pending_level_up) and queues
    /// each crossed level's unlocks (colors before patterns, lowest level
    /// first). Returns `true` when the level went up.
    pub fn add_xp(&mut self, amount: u32) -> bool {
        let previous = self.level;
        self.xp = self.xp.saturating_add(amount);
        self.level = calculate_level(self.xp);
        self.events.push(ProgressionEvent::XpGained {
            amount,
            total: self.xp,
        });

        if self.level <= previous {
            return false;
        }

        self.pending_level_up = Some(self.level);
        self.events.push(ProgressionEvent::LevelUp { level: self.level });
        for reached in previous + 1..=self.level {
            for &color in colors_for_level(reached) {
                self.pending_unlocks.enqueue(Unlock::Color(color));
                self.events.push(ProgressionEvent::UnlockGranted {
                    unlock: Unlock::Color(color),
                });
            }
            for &pattern in patterns_for_level(reached) {
                self.pending_unlocks.enqueue(Unlock::Pattern(pattern));
                self.events.push(ProgressionEvent::UnlockGranted {
                    unlock: Unlock::Pattern(pattern),
                });
            }
        }
        true
    }

    /// Record a finished wave and advance the wave counter. Coins and XP are
    /// credited separately, per sale, as the wave plays out.
    pub fn complete_wave(&mut self, result: WaveResult) {
        self.wave_history.push(result);
        self.wave_number += 1;
    }

    /// Next unshown unlock, oldest first.
    pub fn pop_pending_unlock(&mut self) -> Option<Unlock> {
        self.pending_unlocks.dequeue()
    }

    /// The unshown level-up, if one is waiting. Consumes it.
    pub fn take_pending_level_up(&mut self) -> Option<u32> {
        self.pending_level_up.take()
    }

    /// Wipe all progress back to a fresh ledger, settings included.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // -- Event API --

    /// Drain all pending events. Returns events and clears the internal list.
    pub fn drain_events(&mut self) -> Vec<ProgressionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get a read-only view of pending events.
    pub fn pending_events(&self) -> &[ProgressionEvent] {
        &self.events
    }
}

impl Default for ProgressionLedger {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use boutique_core::test_utils::{sale_record, wave_result};
    use proptest::prelude::*;

    // -----------------------------------------------------------------------
    // Level math
    // -----------------------------------------------------------------------

    #[test]
    fn level_one_until_the_first_paid_threshold() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(49), 1);
        assert_eq!(calculate_level(50), 2);
    }

    #[test]
    fn each_threshold_bumps_the_level() {
        for (index, &threshold) in LEVEL_THRESHOLDS.iter().enumerate() {
            let level = index as u32 + 1;
            assert_eq!(calculate_level(threshold), level);
            if index > 0 {
                assert_eq!(calculate_level(threshold - 1), level - 1);
            }
        }
    }

    #[test]
    fn level_caps_at_max() {
        assert_eq!(calculate_level(2500), MAX_LEVEL);
        assert_eq!(calculate_level(1_000_000), MAX_LEVEL);
    }

    #[test]
    fn xp_for_level_mirrors_the_thresholds() {
        assert_eq!(xp_for_level(0), None);
        assert_eq!(xp_for_level(1), Some(0));
        assert_eq!(xp_for_level(2), Some(50));
        assert_eq!(xp_for_level(MAX_LEVEL), Some(2500));
        assert_eq!(xp_for_level(MAX_LEVEL + 1), None);
    }

    // -----------------------------------------------------------------------
    // Money
    // -----------------------------------------------------------------------

    #[test]
    fn add_money_accumulates_and_reports_the_total() {
        let mut ledger = ProgressionLedger::new();
        ledger.add_money(10);
        ledger.add_money(15);
        assert_eq!(ledger.total_money(), 25);
        assert_eq!(
            ledger.drain_events(),
            vec![
                ProgressionEvent::MoneyEarned {
                    amount: 10,
                    total: 10
                },
                ProgressionEvent::MoneyEarned {
                    amount: 15,
                    total: 25
                },
            ]
        );
    }

    #[test]
    fn spend_money_rejects_overdrafts_without_mutating() {
        let mut ledger = ProgressionLedger::new();
        ledger.add_money(10);
        ledger.drain_events();

        assert!(!ledger.spend_money(11));
        assert_eq!(ledger.total_money(), 10);
        assert!(ledger.pending_events().is_empty());

        assert!(ledger.spend_money(10));
        assert_eq!(ledger.total_money(), 0);
        assert_eq!(
            ledger.drain_events(),
            vec![ProgressionEvent::MoneySpent {
                amount: 10,
                total: 0
            }]
        );
    }

    // -----------------------------------------------------------------------
    // XP and unlocks
    // -----------------------------------------------------------------------

    #[test]
    fn one_sale_of_xp_stays_on_level_one() {
        let mut ledger = ProgressionLedger::new();
        assert!(!ledger.add_xp(XP_PER_SALE));
        assert_eq!(ledger.level(), 1);
        assert_eq!(ledger.take_pending_level_up(), None);
        assert_eq!(ledger.pop_pending_unlock(), None);
    }

    #[test]
    fn crossing_fifty_xp_reaches_level_two() {
        let mut ledger = ProgressionLedger::new();
        assert!(!ledger.add_xp(25));
        assert!(ledger.add_xp(25));
        assert_eq!(ledger.level(), 2);

        assert_eq!(ledger.take_pending_level_up(), Some(2));
        assert_eq!(ledger.take_pending_level_up(), None);

        assert_eq!(ledger.pop_pending_unlock(), Some(Unlock::Color(Color::Purple)));
        assert_eq!(
            ledger.pop_pending_unlock(),
            Some(Unlock::Pattern(Pattern::Stripes))
        );
        assert_eq!(ledger.pop_pending_unlock(), None);
    }

    #[test]
    fn a_multi_level_jump_queues_every_crossed_unlock_in_order() {
        let mut ledger = ProgressionLedger::new();
        assert!(ledger.add_xp(450));
        assert_eq!(ledger.level(), 5);
        assert_eq!(ledger.take_pending_level_up(), Some(5));

        let expected = [
            Unlock::Color(Color::Purple),
            Unlock::Pattern(Pattern::Stripes),
            Unlock::Color(Color::Orange),
            Unlock::Pattern(Pattern::Dots),
            Unlock::Color(Color::Red),
            Unlock::Pattern(Pattern::Hearts),
            Unlock::Color(Color::White),
            Unlock::Pattern(Pattern::Stars),
        ];
        for unlock in expected {
            assert_eq!(ledger.pop_pending_unlock(), Some(unlock));
        }
        assert_eq!(ledger.pop_pending_unlock(), None);
    }

    #[test]
    fn level_up_emits_xp_then_level_then_unlocks() {
        let mut ledger = ProgressionLedger::new();
        ledger.add_xp(50);
        let events = ledger.drain_events();
        assert_eq!(
            events,
            vec![
                ProgressionEvent::XpGained {
                    amount: 50,
                    total: 50
                },
                ProgressionEvent::LevelUp { level: 2 },
                ProgressionEvent::UnlockGranted {
                    unlock: Unlock::Color(Color::Purple)
                },
                ProgressionEvent::UnlockGranted {
                    unlock: Unlock::Pattern(Pattern::Stripes)
                },
            ]
        );
    }

    #[test]
    fn unlocked_sets_follow_the_level() {
        let mut ledger = ProgressionLedger::new();
        assert_eq!(
            ledger.unlocked_colors(),
            vec![Color::Pink, Color::Blue, Color::Yellow, Color::Green]
        );
        assert_eq!(ledger.unlocked_patterns(), vec![Pattern::None]);
        assert!(!ledger.is_color_unlocked(Color::Purple));

        ledger.add_xp(125);
        assert_eq!(ledger.level(), 3);
        assert_eq!(
            ledger.unlocked_colors(),
            vec![
                Color::Pink,
                Color::Blue,
                Color::Yellow,
                Color::Green,
                Color::Purple,
                Color::Orange,
            ]
        );
        assert_eq!(
            ledger.unlocked_patterns(),
            vec![Pattern::None, Pattern::Stripes, Pattern::Dots]
        );
        assert!(ledger.is_pattern_unlocked(Pattern::Dots));
        assert!(!ledger.is_pattern_unlocked(Pattern::Stars));
    }

    // -----------------------------------------------------------------------
    // Waves
    // -----------------------------------------------------------------------

    #[test]
    fn complete_wave_appends_history_and_advances_the_counter() {
        let mut ledger = ProgressionLedger::new();
        assert_eq!(ledger.wave_number(), 1);

        let result = wave_result(1, vec![sale_record(1, 1, 5, true)]);
        ledger.complete_wave(result.clone());

        assert_eq!(ledger.wave_number(), 2);
        assert_eq!(ledger.wave_history(), &[result.clone()]);
        assert_eq!(ledger.last_wave(), Some(&result));
        assert_eq!(ledger.total_money(), 0);
    }

    // -----------------------------------------------------------------------
    // Settings, persistence, reset
    // -----------------------------------------------------------------------

    #[test]
    fn default_settings_enable_sound_and_the_stock_wave_length() {
        let settings = GameSettings::default();
        assert!(settings.sound_enabled);
        assert_eq!(settings.wave_duration_secs, DEFAULT_WAVE_DURATION_SECS);
    }

    #[test]
    fn saved_ledger_round_trips_without_the_event_feed() {
        let mut ledger = ProgressionLedger::new();
        ledger.add_money(30);
        ledger.add_xp(60);
        ledger.settings_mut().sound_enabled = false;
        ledger.complete_wave(wave_result(1, vec![sale_record(1, 1, 5, true)]));

        let blob = serde_json::to_string(&ledger).unwrap();
        let mut loaded: ProgressionLedger = serde_json::from_str(&blob).unwrap();

        assert_eq!(loaded.total_money(), 30);
        assert_eq!(loaded.xp(), 60);
        assert_eq!(loaded.level(), 2);
        assert_eq!(loaded.wave_number(), 2);
        assert_eq!(loaded.wave_history().len(), 1);
        assert!(!loaded.settings().sound_enabled);
        assert_eq!(loaded.take_pending_level_up(), Some(2));
        assert_eq!(
            loaded.pop_pending_unlock(),
            Some(Unlock::Color(Color::Purple))
        );
        assert!(loaded.pending_events().is_empty());
    }

    #[test]
    fn reset_restores_a_fresh_ledger() {
        let mut ledger = ProgressionLedger::new();
        ledger.add_money(100);
        ledger.add_xp(500);
        ledger.complete_wave(wave_result(1, vec![]));
        ledger.settings_mut().sound_enabled = false;

        ledger.reset();

        assert_eq!(ledger.total_money(), 0);
        assert_eq!(ledger.xp(), 0);
        assert_eq!(ledger.level(), 1);
        assert_eq!(ledger.wave_number(), 1);
        assert!(ledger.wave_history().is_empty());
        assert_eq!(ledger.pop_pending_unlock(), None);
        assert_eq!(ledger.take_pending_level_up(), None);
        assert!(ledger.settings().sound_enabled);
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn level_is_monotonic_in_xp(a in 0u32..5000, b in 0u32..5000) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(calculate_level(low) <= calculate_level(high));
        }

        #[test]
        fn level_always_sits_between_its_thresholds(xp in 0u32..10_000) {
            let level = calculate_level(xp);
            prop_assert!((1..=MAX_LEVEL).contains(&level));
            prop_assert!(xp >= LEVEL_THRESHOLDS[level as usize - 1]);
            if level < MAX_LEVEL {
                prop_assert!(xp < LEVEL_THRESHOLDS[level as usize]);
            }
        }
    }
}

//! Achievement board for the boutique: monotonic progress counters with
//! one-way unlocks and a FIFO toast queue.
//!
//! # Overview
//!
//! Eight achievements are defined up front (see [`DEFINITIONS`]); the
//! [`AchievementBoard`] tracks per-achievement progress against a fixed
//! requirement. Progress only ever rises, clamps at the requirement, and
//! freezes once the achievement unlocks -- late or duplicate signals are
//! no-ops. Crossing a requirement stamps the unlock time and enqueues the id
//! for the presentation layer to pop one toast at a time.
//!
//! Game code feeds the board through the `track_*` methods, which map raw
//! gameplay signals (a sale, a coin total, a finished wave) onto the right
//! counters. [`AchievementBoard::apply_wave`] reduces a whole
//! [`WaveResult`] into the wave-level signals.

use std::collections::{HashMap, HashSet};

use boutique_core::id::CustomerId;
use boutique_core::queue::PendingQueue;
use boutique_core::session::WaveResult;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers & definitions
// ---------------------------------------------------------------------------

/// Identifies one of the eight achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AchievementId {
    FirstSale,
    SuperSeller,
    BigEarner,
    ClothingCreator,
    RainbowMaker,
    SpeedDemon,
    PerfectWave,
    FamilyFavorite,
}

impl AchievementId {
    pub const ALL: [AchievementId; 8] = [
        AchievementId::FirstSale,
        AchievementId::SuperSeller,
        AchievementId::BigEarner,
        AchievementId::ClothingCreator,
        AchievementId::RainbowMaker,
        AchievementId::SpeedDemon,
        AchievementId::PerfectWave,
        AchievementId::FamilyFavorite,
    ];
}

/// Static description of an achievement. The icon is an emoji so the board
/// reads for non-readers too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: u32,
}

/// All achievement definitions, in display order.
pub const DEFINITIONS: [AchievementDef; 8] = [
    AchievementDef {
        id: AchievementId::FirstSale,
        name: "First Sale",
        description: "Sell your very first item",
        icon: "🪙",
        requirement: 1,
    },
    AchievementDef {
        id: AchievementId::SuperSeller,
        name: "Super Seller",
        description: "Make 50 sales in total",
        icon: "🏆",
        requirement: 50,
    },
    AchievementDef {
        id: AchievementId::BigEarner,
        name: "Big Earner",
        description: "Earn 100 coins in total",
        icon: "💰",
        requirement: 100,
    },
    AchievementDef {
        id: AchievementId::ClothingCreator,
        name: "Clothing Creator",
        description: "Craft 10 pieces of clothing",
        icon: "👗",
        requirement: 10,
    },
    AchievementDef {
        id: AchievementId::RainbowMaker,
        name: "Rainbow Maker",
        description: "Craft with all 8 colors",
        icon: "🌈",
        requirement: 8,
    },
    AchievementDef {
        id: AchievementId::SpeedDemon,
        name: "Speed Demon",
        description: "Make 5 sales in a single wave",
        icon: "⚡",
        requirement: 5,
    },
    AchievementDef {
        id: AchievementId::PerfectWave,
        name: "Perfect Wave",
        description: "Finish a wave with every sale a match",
        icon: "⭐",
        requirement: 1,
    },
    AchievementDef {
        id: AchievementId::FamilyFavorite,
        name: "Family Favorite",
        description: "Sell to 7 different customers in one wave",
        icon: "👨‍👩‍👧‍👦",
        requirement: 7,
    },
];

/// Look up the static definition for an achievement.
pub fn definition(id: AchievementId) -> &'static AchievementDef {
    &DEFINITIONS[id as usize]
}

// ---------------------------------------------------------------------------
// Entries & events
// ---------------------------------------------------------------------------

/// Runtime state of one achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementEntry {
    pub progress: u32,
    pub requirement: u32,
    /// Wall-clock unlock time. `None` while still locked.
    pub unlocked_at_ms: Option<u64>,
}

impl AchievementEntry {
    fn fresh(id: AchievementId) -> Self {
        Self {
            progress: 0,
            requirement: definition(id).requirement,
            unlocked_at_ms: None,
        }
    }
}

/// Events emitted by the board since the last drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementEvent {
    Unlocked { id: AchievementId, at_ms: u64 },
}

// ---------------------------------------------------------------------------
// AchievementBoard
// ---------------------------------------------------------------------------

/// Progress and unlock state for all achievements, plus the queue of unlocks
/// waiting to be shown. Fully serializable except for the transient events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementBoard {
    entries: HashMap<AchievementId, AchievementEntry>,

    /// Unlocked but not yet shown, oldest first.
    pending: PendingQueue<AchievementId>,

    /// Events emitted since last drain. Not serialized (transient).
    #[serde(skip)]
    events: Vec<AchievementEvent>,
}

impl AchievementBoard {
    /// A fresh board with every achievement locked at zero progress.
    pub fn new() -> Self {
        let entries = AchievementId::ALL
            .iter()
            .map(|&id| (id, AchievementEntry::fresh(id)))
            .collect();
        Self {
            entries,
            pending: PendingQueue::new(),
            events: Vec::new(),
        }
    }

    // -- Progress API --

    /// Add `amount` to an achievement's progress. Returns `true` when this
    /// update unlocked it.
    pub fn increment_progress(&mut self, id: AchievementId, amount: u32, now_ms: u64) -> bool {
        let target = self.progress(id).saturating_add(amount);
        self.raise_to(id, target, now_ms)
    }

    /// Raise an achievement's progress to `value`. Lower values are ignored;
    /// progress never decreases. Returns `true` when this update unlocked it.
    pub fn set_progress(&mut self, id: AchievementId, value: u32, now_ms: u64) -> bool {
        self.raise_to(id, value, now_ms)
    }

    fn raise_to(&mut self, id: AchievementId, target: u32, now_ms: u64) -> bool {
        let entry = self
            .entries
            .entry(id)
            .or_insert_with(|| AchievementEntry::fresh(id));
        if entry.unlocked_at_ms.is_some() || target <= entry.progress {
            return false;
        }
        entry.progress = target.min(entry.requirement);
        if entry.progress < entry.requirement {
            return false;
        }
        entry.unlocked_at_ms = Some(now_ms);
        self.pending.enqueue(id);
        self.events.push(AchievementEvent::Unlocked { id, at_ms: now_ms });
        true
    }

    // -- Trackers --

    /// One successful sale: feeds first-sale and the cumulative counter.
    pub fn track_sale(&mut self, now_ms: u64) {
        self.increment_progress(AchievementId::FirstSale, 1, now_ms);
        self.increment_progress(AchievementId::SuperSeller, 1, now_ms);
    }

    /// High-water mark of total coins earned.
    pub fn track_coins_earned(&mut self, total_coins: u32, now_ms: u64) {
        self.set_progress(AchievementId::BigEarner, total_coins, now_ms);
    }

    /// One item crafted in the workshop.
    pub fn track_item_created(&mut self, now_ms: u64) {
        self.increment_progress(AchievementId::ClothingCreator, 1, now_ms);
    }

    /// Count of distinct colors seen across the wardrobe.
    pub fn track_colors_used(&mut self, distinct_colors: u32, now_ms: u64) {
        self.set_progress(AchievementId::RainbowMaker, distinct_colors, now_ms);
    }

    /// Wave totals: 5+ sales is a speed-demon wave; 3+ attempts with every
    /// one successful is a perfect wave.
    pub fn track_wave_sales(&mut self, sales: u32, attempts: u32, now_ms: u64) {
        if sales >= 5 {
            self.set_progress(AchievementId::SpeedDemon, sales, now_ms);
        }
        if attempts >= 3 && sales == attempts {
            self.increment_progress(AchievementId::PerfectWave, 1, now_ms);
        }
    }

    /// High-water mark of distinct customers successfully sold to in one wave.
    pub fn track_unique_customers(&mut self, count: u32, now_ms: u64) {
        self.set_progress(AchievementId::FamilyFavorite, count, now_ms);
    }

    /// Reduce a finished wave into its wave-level signals. Per-sale signals
    /// (first-sale, super-seller, coins) are tracked as each sale resolves,
    /// not here, so a wave is never double counted.
    pub fn apply_wave(&mut self, result: &WaveResult, now_ms: u64) {
        let attempts = result.sales.len() as u32;
        self.track_wave_sales(result.items_sold, attempts, now_ms);

        let unique: HashSet<CustomerId> = result
            .sales
            .iter()
            .filter(|sale| sale.success)
            .map(|sale| sale.customer.id)
            .collect();
        self.track_unique_customers(unique.len() as u32, now_ms);
    }

    // -- Queries --

    pub fn progress(&self, id: AchievementId) -> u32 {
        self.entries.get(&id).map_or(0, |entry| entry.progress)
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|entry| entry.unlocked_at_ms.is_some())
    }

    pub fn unlocked_at_ms(&self, id: AchievementId) -> Option<u64> {
        self.entries.get(&id).and_then(|entry| entry.unlocked_at_ms)
    }

    pub fn unlocked_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.unlocked_at_ms.is_some())
            .count()
    }

    pub fn total_count(&self) -> usize {
        AchievementId::ALL.len()
    }

    /// Next unshown unlock, oldest first.
    pub fn pop_pending(&mut self) -> Option<AchievementId> {
        self.pending.dequeue()
    }

    /// Wipe all progress and unlocks.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // -- Event API --

    /// Drain all pending events. Returns events and clears the internal list.
    pub fn drain_events(&mut self) -> Vec<AchievementEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get a read-only view of pending events.
    pub fn pending_events(&self) -> &[AchievementEvent] {
        &self.events
    }
}

impl Default for AchievementBoard {
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

    // -----------------------------------------------------------------------
    // Progress rules
    // -----------------------------------------------------------------------

    #[test]
    fn increment_unlocks_at_the_requirement() {
        let mut board = AchievementBoard::new();
        assert!(board.increment_progress(AchievementId::FirstSale, 1, 42));
        assert!(board.is_unlocked(AchievementId::FirstSale));
        assert_eq!(board.unlocked_at_ms(AchievementId::FirstSale), Some(42));
        assert_eq!(board.pop_pending(), Some(AchievementId::FirstSale));
        assert_eq!(board.pop_pending(), None);
    }

    #[test]
    fn updates_after_unlock_are_no_ops() {
        let mut board = AchievementBoard::new();
        board.increment_progress(AchievementId::FirstSale, 1, 42);
        board.pop_pending();
        board.drain_events();

        assert!(!board.increment_progress(AchievementId::FirstSale, 1, 99));
        assert!(!board.set_progress(AchievementId::FirstSale, 5, 99));
        assert_eq!(board.progress(AchievementId::FirstSale), 1);
        assert_eq!(board.unlocked_at_ms(AchievementId::FirstSale), Some(42));
        assert_eq!(board.pop_pending(), None);
        assert!(board.pending_events().is_empty());
    }

    #[test]
    fn set_progress_never_lowers() {
        let mut board = AchievementBoard::new();
        board.set_progress(AchievementId::BigEarner, 40, 0);
        assert!(!board.set_progress(AchievementId::BigEarner, 30, 0));
        assert_eq!(board.progress(AchievementId::BigEarner), 40);

        assert!(board.set_progress(AchievementId::BigEarner, 100, 7));
        assert!(board.is_unlocked(AchievementId::BigEarner));
    }

    #[test]
    fn progress_clamps_at_the_requirement() {
        let mut board = AchievementBoard::new();
        board.set_progress(AchievementId::BigEarner, 250, 0);
        assert_eq!(board.progress(AchievementId::BigEarner), 100);
    }

    // -----------------------------------------------------------------------
    // Trackers
    // -----------------------------------------------------------------------

    #[test]
    fn track_sale_feeds_both_sale_counters() {
        let mut board = AchievementBoard::new();
        board.track_sale(1);
        assert!(board.is_unlocked(AchievementId::FirstSale));
        assert_eq!(board.progress(AchievementId::SuperSeller), 1);

        for _ in 0..49 {
            board.track_sale(2);
        }
        assert!(board.is_unlocked(AchievementId::SuperSeller));
    }

    #[test]
    fn speed_demon_needs_five_sales_in_one_wave() {
        let mut board = AchievementBoard::new();
        board.track_wave_sales(4, 6, 0);
        assert_eq!(board.progress(AchievementId::SpeedDemon), 0);

        board.track_wave_sales(5, 6, 0);
        assert!(board.is_unlocked(AchievementId::SpeedDemon));
        assert!(!board.is_unlocked(AchievementId::PerfectWave));
    }

    #[test]
    fn perfect_wave_needs_three_attempts_all_successful() {
        let mut board = AchievementBoard::new();
        board.track_wave_sales(2, 2, 0);
        assert!(!board.is_unlocked(AchievementId::PerfectWave));

        board.track_wave_sales(3, 3, 0);
        assert!(board.is_unlocked(AchievementId::PerfectWave));
    }

    #[test]
    fn family_favorite_keeps_the_best_wave() {
        let mut board = AchievementBoard::new();
        board.track_unique_customers(4, 0);
        assert_eq!(board.progress(AchievementId::FamilyFavorite), 4);

        board.track_unique_customers(3, 0);
        assert_eq!(board.progress(AchievementId::FamilyFavorite), 4);

        board.track_unique_customers(7, 0);
        assert!(board.is_unlocked(AchievementId::FamilyFavorite));
    }

    #[test]
    fn rainbow_and_crafting_trackers_hit_their_targets() {
        let mut board = AchievementBoard::new();
        for _ in 0..10 {
            board.track_item_created(0);
        }
        assert!(board.is_unlocked(AchievementId::ClothingCreator));

        board.track_colors_used(8, 0);
        assert!(board.is_unlocked(AchievementId::RainbowMaker));
    }

    // -----------------------------------------------------------------------
    // Wave reduction
    // -----------------------------------------------------------------------

    #[test]
    fn apply_wave_derives_the_wave_level_signals() {
        let mut board = AchievementBoard::new();

        // Three successes out of four attempts, two of them to the same
        // customer.
        let result = wave_result(
            1,
            vec![
                sale_record(1, 1, 5, true),
                sale_record(2, 1, 5, true),
                sale_record(3, 2, 10, true),
                sale_record(4, 3, 5, false),
            ],
        );
        board.apply_wave(&result, 0);

        assert_eq!(board.progress(AchievementId::FamilyFavorite), 2);
        assert_eq!(board.progress(AchievementId::SpeedDemon), 0);
        assert!(!board.is_unlocked(AchievementId::PerfectWave));
        // Per-sale counters are fed at sale time, not by the reduction.
        assert_eq!(board.progress(AchievementId::SuperSeller), 0);
    }

    #[test]
    fn a_clean_five_sale_wave_unlocks_both_wave_achievements() {
        let mut board = AchievementBoard::new();
        let sales = (1..=5).map(|i| sale_record(i, i as u32, 5, true)).collect();
        board.apply_wave(&wave_result(1, sales), 9);

        assert!(board.is_unlocked(AchievementId::SpeedDemon));
        assert!(board.is_unlocked(AchievementId::PerfectWave));
        assert_eq!(board.progress(AchievementId::FamilyFavorite), 5);
        assert_eq!(
            board.drain_events(),
            vec![
                AchievementEvent::Unlocked {
                    id: AchievementId::SpeedDemon,
                    at_ms: 9
                },
                AchievementEvent::Unlocked {
                    id: AchievementId::PerfectWave,
                    at_ms: 9
                },
            ]
        );
    }

    // -----------------------------------------------------------------------
    // Queues, persistence, reset
    // -----------------------------------------------------------------------

    #[test]
    fn pending_unlocks_pop_in_unlock_order() {
        let mut board = AchievementBoard::new();
        board.increment_progress(AchievementId::FirstSale, 1, 0);
        board.set_progress(AchievementId::ClothingCreator, 10, 1);

        assert_eq!(board.pop_pending(), Some(AchievementId::FirstSale));
        assert_eq!(board.pop_pending(), Some(AchievementId::ClothingCreator));
        assert_eq!(board.pop_pending(), None);
    }

    #[test]
    fn saved_board_round_trips_without_the_event_feed() {
        let mut board = AchievementBoard::new();
        board.set_progress(AchievementId::BigEarner, 60, 0);
        board.increment_progress(AchievementId::FirstSale, 1, 5);

        let blob = serde_json::to_string(&board).unwrap();
        let mut loaded: AchievementBoard = serde_json::from_str(&blob).unwrap();

        assert_eq!(loaded.progress(AchievementId::BigEarner), 60);
        assert!(loaded.is_unlocked(AchievementId::FirstSale));
        assert_eq!(loaded.unlocked_at_ms(AchievementId::FirstSale), Some(5));
        assert_eq!(loaded.pop_pending(), Some(AchievementId::FirstSale));
        assert!(loaded.pending_events().is_empty());
    }

    #[test]
    fn reset_locks_everything_again() {
        let mut board = AchievementBoard::new();
        board.track_sale(0);
        board.track_coins_earned(100, 0);
        board.reset();

        assert_eq!(board.unlocked_count(), 0);
        assert_eq!(board.progress(AchievementId::SuperSeller), 0);
        assert_eq!(board.pop_pending(), None);
    }

    #[test]
    fn definitions_line_up_with_the_ids() {
        for id in AchievementId::ALL {
            let def = definition(id);
            assert_eq!(def.id, id);
            assert!(def.requirement > 0);
        }
        assert_eq!(AchievementBoard::new().total_count(), 8);
        assert_eq!(
            serde_json::to_string(&AchievementId::FirstSale).unwrap(),
            "\"first-sale\""
        );
    }
}

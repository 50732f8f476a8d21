//! Wave session: one timed round of selling at the store counter.
//!
//! The session is a small state machine driven entirely by the embedder:
//! `advance(dt)` feeds virtual time into an accumulator clock that pays out
//! whole one-second ticks, and the player actions mutate state between
//! ticks. Nothing here reads wall-clock time, so a seeded session replays
//! identically from the same action script.
//!
//! Phases: `Ready -> Playing -> Result -> Playing (loop) -> Ended`. The
//! clock only runs in `Playing`; while a sale outcome is pending
//! acknowledgment (`Result`) both the wave countdown and customer patience
//! are frozen. `Ended` is terminal: the session hands out its [`WaveResult`]
//! exactly once. Abandoning a wave is structural — drop the session and the
//! clock dies with it, with no result emitted.

use crate::catalog::CustomerCatalog;
use crate::clock::{StateHash, TickClock};
use crate::customer::{mood_from_patience, CustomerKind, RuntimeCustomer};
use crate::event::{Event, EventBus};
use crate::fixed::{f64_to_fixed64, Fixed64, Ticks};
use crate::id::{CustomerId, ItemId};
use crate::item::{ClothingItem, Inventory};
use crate::matching::{self, MatchFailure, MatchOutcome};
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};

/// Wave length before upgrades, in seconds.
pub const DEFAULT_WAVE_DURATION_SECS: u32 = 90;

/// Rack slots before upgrades.
pub const DEFAULT_RACK_CAPACITY: usize = 6;

/// Customers shown at the counter at once.
pub const DEFAULT_VISIBLE_COUNT: usize = 3;

/// Customers sampled from the catalog per wave.
pub const DEFAULT_SAMPLE_SIZE: usize = 8;

/// Probability that a sampled customer arrives as a VIP.
pub const DEFAULT_VIP_CHANCE: f64 = 0.2;

/// Patience lost per tick by a visible customer.
pub const DEFAULT_PATIENCE_DECAY_PER_SEC: f64 = 2.0;

/// Decay multiplier while a customer waits on a make-to-order.
pub const DEFAULT_ORDER_WAIT_MULTIPLIER: f64 = 0.5;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Everything a wave needs to know up front. Built by the driver from the
/// player's settings, upgrade levels, and progression state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// 1-based number of this wave, stamped into events and the result.
    pub wave_number: u32,
    /// Wave length in seconds (settings base plus upgrade bonus).
    pub duration_secs: u32,
    /// Sales rack size (base plus upgrade bonus).
    pub rack_capacity: usize,
    /// How many unserved customers are at the counter at once.
    pub visible_count: usize,
    /// How many customers to sample from the catalog.
    pub sample_size: usize,
    /// Per-customer VIP probability, in [0, 1].
    pub vip_chance: Fixed64,
    /// Patience lost per tick by each visible customer.
    pub patience_decay: Fixed64,
    /// Decay multiplier for customers waiting on an order.
    pub order_wait_multiplier: Fixed64,
    /// Flat coins added to every successful sale (tip jar upgrade).
    pub tip_bonus: u32,
    /// RNG seed for sampling, VIP rolls, and hints.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            wave_number: 1,
            duration_secs: DEFAULT_WAVE_DURATION_SECS,
            rack_capacity: DEFAULT_RACK_CAPACITY,
            visible_count: DEFAULT_VISIBLE_COUNT,
            sample_size: DEFAULT_SAMPLE_SIZE,
            vip_chance: f64_to_fixed64(DEFAULT_VIP_CHANCE),
            patience_decay: f64_to_fixed64(DEFAULT_PATIENCE_DECAY_PER_SEC),
            order_wait_multiplier: f64_to_fixed64(DEFAULT_ORDER_WAIT_MULTIPLIER),
            tip_bonus: 0,
            seed: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Misuse of the session lifecycle. Player-level mistakes are silent no-ops;
/// these indicate a driver bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WaveError {
    #[error("cannot start a wave with an empty inventory")]
    EmptyInventory,

    #[error("wave already started")]
    AlreadyStarted,
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Waiting for `start_wave`.
    Ready,
    /// Countdown and patience decay active.
    Playing,
    /// A sale outcome is pending acknowledgment; the clock is frozen.
    Result,
    /// Terminal. The `WaveResult` has been handed out.
    Ended,
}

// ---------------------------------------------------------------------------
// Sale records
// ---------------------------------------------------------------------------

/// Who the buyer was, captured at sale-resolution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    pub name: String,
    pub kind: CustomerKind,
    pub is_vip: bool,
}

/// One resolved sale attempt, success or failure. Snapshots the item and
/// the customer so the record stays valid after the item leaves the
/// inventory. Walkouts produce no record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub item_id: ItemId,
    pub item: ClothingItem,
    pub customer: CustomerSnapshot,
    /// Coins earned on success; the asking price on a reject.
    pub coins: u32,
    pub success: bool,
    /// The rejection reason, `None` on success.
    pub reason: Option<MatchFailure>,
}

/// Summary of one completed wave, handed out exactly once at wave end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveResult {
    pub wave_number: u32,
    pub sales: Vec<SaleRecord>,
    /// Sum of coins over successful sales.
    pub total_earned: u32,
    pub items_sold: u32,
    pub items_not_sold: u32,
}

/// What the driver gets back from acknowledging a sale outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// The acknowledged record (coins, success flag, snapshots).
    pub record: SaleRecord,
    /// Present when settling this sale also ended the wave.
    pub ended: Option<WaveResult>,
}

/// Result of an `advance` call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdvanceOutcome {
    /// Number of whole ticks actually executed.
    pub ticks_run: u32,
    /// Present when one of those ticks ended the wave.
    pub ended: Option<WaveResult>,
}

// ---------------------------------------------------------------------------
// WaveSession
// ---------------------------------------------------------------------------

/// The playable core of one wave. Owns the roster, the clock, the sale
/// log, and the in-progress interaction state; borrows the inventory from
/// the caller per action so the items outlive the wave.
#[derive(Debug)]
pub struct WaveSession {
    config: SessionConfig,
    phase: WavePhase,
    clock: TickClock,
    /// Whole seconds remaining on the wave timer.
    countdown: u32,
    /// Sampled customers, in visit order. Never shrinks during a wave.
    roster: Vec<RuntimeCustomer>,
    /// Resolved sale attempts, oldest first.
    sales: Vec<SaleRecord>,
    /// The rack item the player is holding up, if any.
    selected: Option<ItemId>,
    /// Customer with an active "make it for them" prompt.
    prompt: Option<CustomerId>,
    /// Customer waiting on a make-to-order craft.
    reserved: Option<CustomerId>,
    /// The sale outcome awaiting acknowledgment (`Result` phase only).
    pending: Option<SaleRecord>,
    rng: GameRng,
    events: EventBus,
}

impl WaveSession {
    /// Create a session in `Ready`, waiting for `start_wave`.
    pub fn new(config: SessionConfig) -> Self {
        let rng = GameRng::new(config.seed);
        let countdown = config.duration_secs;
        Self {
            config,
            phase: WavePhase::Ready,
            clock: TickClock::per_second(),
            countdown,
            roster: Vec::new(),
            sales: Vec::new(),
            selected: None,
            prompt: None,
            reserved: None,
            pending: None,
            rng,
            events: EventBus::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn wave_number(&self) -> u32 {
        self.config.wave_number
    }

    /// Whole seconds left on the wave timer.
    pub fn countdown_secs(&self) -> u32 {
        self.countdown
    }

    /// Ticks run so far this wave.
    pub fn tick(&self) -> Ticks {
        self.clock.tick()
    }

    /// The full sampled roster, in visit order.
    pub fn roster(&self) -> &[RuntimeCustomer] {
        &self.roster
    }

    /// The customers currently at the counter: the first `visible_count`
    /// unserved roster entries. Serving one slides the next in.
    pub fn visible(&self) -> impl Iterator<Item = &RuntimeCustomer> {
        self.roster
            .iter()
            .filter(|c| !c.served)
            .take(self.config.visible_count)
    }

    pub fn customer(&self, id: CustomerId) -> Option<&RuntimeCustomer> {
        self.roster.iter().find(|c| c.id == id)
    }

    pub fn unserved_count(&self) -> usize {
        self.roster.iter().filter(|c| !c.served).count()
    }

    /// The sales rack view of an inventory, at this wave's capacity.
    pub fn rack<'a>(&self, inventory: &'a Inventory) -> &'a [ClothingItem] {
        inventory.rack(self.config.rack_capacity)
    }

    pub fn selected_item(&self) -> Option<ItemId> {
        self.selected
    }

    /// Customer with the active "make it" prompt, if any.
    pub fn make_it_prompt(&self) -> Option<CustomerId> {
        self.prompt
    }

    /// Customer reserved by a make-to-order, if any.
    pub fn reserved_customer(&self) -> Option<CustomerId> {
        self.reserved
    }

    /// The sale outcome awaiting acknowledgment.
    pub fn pending_result(&self) -> Option<&SaleRecord> {
        self.pending.as_ref()
    }

    /// Resolved sale attempts so far this wave.
    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Start the wave: sample the roster, reset the per-wave state, begin
    /// the countdown. Only legal once, from `Ready`, with stock to sell.
    pub fn start_wave(
        &mut self,
        catalog: &CustomerCatalog,
        inventory: &Inventory,
    ) -> Result<(), WaveError> {
        if self.phase != WavePhase::Ready {
            return Err(WaveError::AlreadyStarted);
        }
        if inventory.is_empty() {
            return Err(WaveError::EmptyInventory);
        }

        // Sample without replacement: shuffle the catalog order, take the
        // first N, roll VIP status per sampled customer.
        let mut order: Vec<usize> = (0..catalog.len()).collect();
        self.rng.shuffle(&mut order);
        let count = self.config.sample_size.min(catalog.len());
        let mut roster = Vec::with_capacity(count);
        for &index in &order[..count] {
            let def = &catalog.defs()[index];
            let is_vip = self.rng.chance(self.config.vip_chance);
            roster.push(RuntimeCustomer::from_def(def, is_vip));
        }
        self.roster = roster;

        self.sales.clear();
        self.selected = None;
        self.prompt = None;
        self.reserved = None;
        self.pending = None;
        self.countdown = self.config.duration_secs;
        self.clock.reset();
        self.phase = WavePhase::Playing;

        self.events.emit(Event::WaveStarted {
            wave_number: self.config.wave_number,
            customer_count: self.roster.len(),
            tick: self.clock.tick(),
        });
        Ok(())
    }

    /// Feed elapsed virtual seconds. Whole ticks are paid out one at a
    /// time; outside `Playing` the clock is frozen and `dt` is discarded.
    pub fn advance(&mut self, dt: Fixed64) -> AdvanceOutcome {
        if self.phase != WavePhase::Playing {
            return AdvanceOutcome::default();
        }
        self.clock.accumulate(dt);
        let mut outcome = AdvanceOutcome::default();
        while self.phase == WavePhase::Playing && self.clock.consume_tick() {
            outcome.ticks_run += 1;
            outcome.ended = self.run_tick();
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Player actions
    // -----------------------------------------------------------------------

    /// Toggle the selected rack item. Stale ids are ignored. Any pending
    /// "make it" prompt is dismissed by interacting with the rack.
    pub fn select_item(&mut self, id: ItemId, inventory: &Inventory) {
        if self.phase != WavePhase::Playing {
            return;
        }
        if inventory.get(id).is_none() {
            return;
        }
        self.prompt = None;
        self.selected = if self.selected == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    /// Tap a visible customer.
    ///
    /// With a selection this resolves the sale attempt: evaluate the item,
    /// price the outcome, snapshot a [`SaleRecord`], and freeze into
    /// `Result` until the driver acknowledges. Nothing is mutated yet.
    ///
    /// With no selection this offers "make it for them" — but only when no
    /// rack item could satisfy the customer; otherwise the tap is a no-op.
    pub fn tap_customer(&mut self, id: CustomerId, inventory: &Inventory) {
        if self.phase != WavePhase::Playing {
            return;
        }
        if !self.visible().any(|c| c.id == id) {
            return;
        }

        let Some(item_id) = self.selected else {
            self.toggle_make_it_prompt(id, inventory);
            return;
        };
        let Some(item) = inventory.get(item_id) else {
            return;
        };
        let Some(customer) = self.customer(id) else {
            return;
        };

        let base = item.price.coin_value();
        let (coins, success, reason) = match matching::evaluate(item, &customer.wants) {
            MatchOutcome::Match => (
                matching::payout(base, customer.is_vip, self.config.tip_bonus),
                true,
                None,
            ),
            MatchOutcome::Reject(failure) => (base, false, Some(failure)),
        };

        self.pending = Some(SaleRecord {
            item_id,
            item: item.clone(),
            customer: CustomerSnapshot {
                id: customer.id,
                name: customer.name.clone(),
                kind: customer.kind,
                is_vip: customer.is_vip,
            },
            coins,
            success,
            reason,
        });
        self.phase = WavePhase::Result;
    }

    fn toggle_make_it_prompt(&mut self, id: CustomerId, inventory: &Inventory) {
        let Some(customer) = self.customer(id) else {
            return;
        };
        if customer.is_waiting_for_order() {
            return;
        }
        let rack = inventory.rack(self.config.rack_capacity);
        if matching::has_matching_item(rack, &customer.wants) {
            return;
        }
        self.prompt = if self.prompt == Some(id) { None } else { Some(id) };
    }

    /// Accept the "make it" prompt: reserve the customer for a crafted
    /// order. Their patience decays at half rate until the craft returns.
    /// Returns whether the reservation was made.
    pub fn begin_make_to_order(&mut self, id: CustomerId) -> bool {
        if self.phase != WavePhase::Playing {
            return false;
        }
        if self.prompt != Some(id) || self.reserved.is_some() {
            return false;
        }
        let tick = self.clock.tick();
        let Some(customer) = self.roster.iter_mut().find(|c| c.id == id && !c.served) else {
            return false;
        };
        customer.make_to_order = Some(crate::customer::MakeToOrder {
            waiting_for_order: true,
            order_started_tick: tick,
        });
        self.reserved = Some(id);
        self.prompt = None;
        self.events.emit(Event::MakeToOrderStarted { customer: id, tick });
        true
    }

    /// Consume the pending sale outcome. On success the item leaves the
    /// inventory (exactly once); on failure the inventory is untouched.
    /// Both paths log the record, mark the customer served, and return to
    /// `Playing` — unless the shelves are now bare or everyone has been
    /// served, in which case the wave ends here.
    pub fn acknowledge_result(&mut self, inventory: &mut Inventory) -> Option<Settlement> {
        if self.phase != WavePhase::Result {
            return None;
        }
        let record = self.pending.take()?;

        if record.success {
            inventory.remove(record.item_id);
        }
        if let Some(customer) = self
            .roster
            .iter_mut()
            .find(|c| c.id == record.customer.id)
        {
            customer.served = true;
        }
        self.sales.push(record.clone());
        self.selected = None;
        self.events.emit(Event::SaleCompleted {
            customer: record.customer.id,
            item: record.item_id,
            coins: record.coins,
            success: record.success,
            tick: self.clock.tick(),
        });

        self.phase = WavePhase::Playing;
        let ended = if inventory.is_empty() || self.roster.iter().all(|c| c.served) {
            Some(self.end_wave())
        } else {
            None
        };
        Some(Settlement { record, ended })
    }

    /// Hand a freshly crafted item back to the reserved customer. If they
    /// are still waiting it becomes the selection (ready to sell) and
    /// `ItemDelivered` fires; if they already left, `DeliveryMissed` fires
    /// and the item simply stays in the inventory. Both paths clear the
    /// reservation and the customer's make-to-order flag.
    pub fn deliver_crafted(&mut self, item_id: ItemId, inventory: &Inventory) {
        if self.phase != WavePhase::Playing {
            return;
        }
        let Some(customer_id) = self.reserved.take() else {
            return;
        };
        let tick = self.clock.tick();
        let mut still_waiting = false;
        if let Some(customer) = self.roster.iter_mut().find(|c| c.id == customer_id) {
            still_waiting = !customer.served;
            customer.make_to_order = None;
        }
        if still_waiting && inventory.get(item_id).is_some() {
            self.selected = Some(item_id);
            self.events.emit(Event::ItemDelivered {
                customer: customer_id,
                item: item_id,
                tick,
            });
        } else {
            self.events.emit(Event::DeliveryMissed {
                customer: customer_id,
                item: item_id,
                tick,
            });
        }
    }

    /// Thought-bubble text for a roster customer, phrased via the session
    /// RNG so repeat visits vary.
    pub fn preference_hint(&mut self, id: CustomerId) -> Option<String> {
        let index = self.roster.iter().position(|c| c.id == id)?;
        Some(matching::preference_hint(
            &self.roster[index].wants,
            &mut self.rng,
        ))
    }

    // -----------------------------------------------------------------------
    // State hash
    // -----------------------------------------------------------------------

    /// Deterministic hash of the observable session state, for desync
    /// detection in tests.
    pub fn state_hash(&self) -> u64 {
        let mut hasher = StateHash::new();
        hasher.write_u32(self.phase as u32);
        hasher.write_u32(self.config.wave_number);
        hasher.write_u32(self.countdown);
        hasher.write_u64(self.clock.tick());
        hasher.write_fixed64(self.clock.accumulator());
        hasher.write_u64(self.rng.state());

        hasher.write_u32(self.roster.len() as u32);
        for customer in &self.roster {
            hasher.write_u32(customer.id.0);
            hasher.write_fixed64(customer.patience);
            hasher.write_u32(customer.is_vip as u32);
            hasher.write_u32(customer.served as u32);
            hasher.write_u32(customer.is_waiting_for_order() as u32);
        }

        hasher.write_u32(self.sales.len() as u32);
        for sale in &self.sales {
            hasher.write_u64(sale.item_id.0);
            hasher.write_u32(sale.coins);
            hasher.write_u32(sale.success as u32);
        }

        write_opt_u64(&mut hasher, self.selected.map(|i| i.0));
        write_opt_u64(&mut hasher, self.prompt.map(|c| c.0 as u64));
        write_opt_u64(&mut hasher, self.reserved.map(|c| c.0 as u64));
        hasher.finish()
    }

    // -----------------------------------------------------------------------
    // Internal: one tick
    // -----------------------------------------------------------------------

    fn run_tick(&mut self) -> Option<WaveResult> {
        // Contract 1: countdown. A tick that ends the wave skips its sweep.
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            return Some(self.end_wave());
        }

        // Contract 2: patience sweep over a snapshot of the visible window
        // taken before any mutation. A customer served during this tick
        // never also decays, and a walkout does not slide the next
        // customer into decay range until the following tick.
        let tick = self.clock.tick();
        let snapshot: Vec<CustomerId> = self.visible().map(|c| c.id).collect();
        let mut walkouts: Vec<(CustomerId, bool)> = Vec::new();
        for id in snapshot {
            let Some(customer) = self.roster.iter_mut().find(|c| c.id == id) else {
                continue;
            };
            let waiting = customer.is_waiting_for_order();
            let mut decay = self.config.patience_decay;
            if waiting {
                decay *= self.config.order_wait_multiplier;
            }
            customer.patience = (customer.patience - decay).max(Fixed64::ZERO);
            customer.mood = mood_from_patience(customer.patience);
            if customer.patience == Fixed64::ZERO {
                // Served-by-timeout, exactly once: served customers leave
                // the visible window and never re-enter the sweep.
                customer.served = true;
                walkouts.push((id, waiting));
            }
        }
        for (customer, waiting_for_order) in walkouts {
            self.events.emit(Event::CustomerWalkedOut {
                customer,
                waiting_for_order,
                tick,
            });
        }

        // Contract 3: exhaustion.
        if self.roster.iter().all(|c| c.served) {
            return Some(self.end_wave());
        }
        None
    }

    fn end_wave(&mut self) -> WaveResult {
        for customer in &mut self.roster {
            customer.make_to_order = None;
        }
        self.reserved = None;
        self.prompt = None;
        self.selected = None;
        self.phase = WavePhase::Ended;

        let sales = std::mem::take(&mut self.sales);
        let total_earned = sales.iter().filter(|s| s.success).map(|s| s.coins).sum();
        let items_sold = sales.iter().filter(|s| s.success).count() as u32;
        let items_not_sold = sales.iter().filter(|s| !s.success).count() as u32;
        let result = WaveResult {
            wave_number: self.config.wave_number,
            sales,
            total_earned,
            items_sold,
            items_not_sold,
        };
        self.events.emit(Event::WaveEnded {
            wave_number: result.wave_number,
            total_earned: result.total_earned,
            items_sold: result.items_sold,
            tick: self.clock.tick(),
        });
        result
    }
}

fn write_opt_u64(hasher: &mut StateHash, value: Option<u64>) {
    match value {
        Some(v) => {
            hasher.write_u32(1);
            hasher.write_u64(v);
        }
        None => hasher.write_u32(0),
    }
}

// ===========================================================================
// Tests
// ===========================================================================

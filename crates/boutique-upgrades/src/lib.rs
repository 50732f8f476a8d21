//! Purchasable store upgrades: three upgrade lines, three levels each.
//!
//! # Overview
//!
//! The [`UpgradeLedger`] holds the purchased level of each upgrade line and
//! exposes the gameplay bonuses as pure functions of those levels. It never
//! touches the coin balance -- the caller checks [`UpgradeLedger::cost`],
//! debits the progression ledger, and only then calls
//! [`UpgradeLedger::purchase`]. That keeps the coin ledger and the upgrade
//! ledger free of any dependency on each other.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers & definitions
// ---------------------------------------------------------------------------

/// Identifies one of the three upgrade lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpgradeId {
    BiggerRack,
    PatientCustomers,
    TipJar,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 3] = [
        UpgradeId::BiggerRack,
        UpgradeId::PatientCustomers,
        UpgradeId::TipJar,
    ];
}

/// Static description of an upgrade line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Coin cost for each level, `costs[0]` buying level 1.
    pub costs: [u32; 3],
}

/// All upgrade definitions, in display order.
pub const DEFINITIONS: [UpgradeDef; 3] = [
    UpgradeDef {
        id: UpgradeId::BiggerRack,
        name: "Bigger Rack",
        description: "+2 items in store",
        icon: "🧺",
        costs: [50, 150, 300],
    },
    UpgradeDef {
        id: UpgradeId::PatientCustomers,
        name: "Patient Customers",
        description: "+15s wave time",
        icon: "⏰",
        costs: [75, 200, 400],
    },
    UpgradeDef {
        id: UpgradeId::TipJar,
        name: "Tip Jar",
        description: "+1 coin per sale",
        icon: "💵",
        costs: [100, 250, 500],
    },
];

/// Levels an upgrade line can reach.
pub const MAX_LEVEL: u32 = 3;

/// Look up the static definition for an upgrade.
pub fn definition(id: UpgradeId) -> &'static UpgradeDef {
    &DEFINITIONS[id as usize]
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events emitted by the ledger since the last drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeEvent {
    /// An upgrade was bought; `level` is the level just reached.
    Purchased { id: UpgradeId, level: u32 },
}

// ---------------------------------------------------------------------------
// UpgradeLedger
// ---------------------------------------------------------------------------

/// Purchased level of each upgrade line. Fully serializable except for the
/// transient event feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeLedger {
    levels: HashMap<UpgradeId, u32>,

    /// Events emitted since last drain. Not serialized (transient).
    #[serde(skip)]
    events: Vec<UpgradeEvent>,
}

impl UpgradeLedger {
    /// A fresh ledger with nothing purchased.
    pub fn new() -> Self {
        Self {
            levels: UpgradeId::ALL.iter().map(|&id| (id, 0)).collect(),
            events: Vec::new(),
        }
    }

    // -- Queries --

    /// Current level of an upgrade line, 0 when unpurchased.
    pub fn level(&self, id: UpgradeId) -> u32 {
        self.levels.get(&id).copied().unwrap_or(0)
    }

    pub fn is_maxed(&self, id: UpgradeId) -> bool {
        self.level(id) >= MAX_LEVEL
    }

    /// Coin cost of the next level, `None` once maxed. Never debits anything.
    pub fn cost(&self, id: UpgradeId) -> Option<u32> {
        definition(id).costs.get(self.level(id) as usize).copied()
    }

    // -- Effect getters --

    /// Extra rack slots granted by bigger-rack: +2 per level.
    pub fn rack_bonus(&self) -> usize {
        self.level(UpgradeId::BiggerRack) as usize * 2
    }

    /// Extra wave seconds granted by patient-customers: +15 s per level.
    pub fn wave_time_bonus(&self) -> u32 {
        self.level(UpgradeId::PatientCustomers) * 15
    }

    /// Extra coins per successful sale granted by tip-jar: +1 per level.
    pub fn tip_bonus(&self) -> u32 {
        self.level(UpgradeId::TipJar)
    }

    // -- Mutations --

    /// Raise an upgrade line one level. Returns `false` at max. The caller
    /// has already paid; no currency changes hands here.
    pub fn purchase(&mut self, id: UpgradeId) -> bool {
        let level = self.levels.entry(id).or_insert(0);
        if *level >= MAX_LEVEL {
            return false;
        }
        *level += 1;
        let reached = *level;
        self.events.push(UpgradeEvent::Purchased { id, level: reached });
        true
    }

    /// Zero every upgrade line.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // -- Event API --

    /// Drain all pending events. Returns events and clears the internal list.
    pub fn drain_events(&mut self) -> Vec<UpgradeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get a read-only view of pending events.
    pub fn pending_events(&self) -> &[UpgradeEvent] {
        &self.events
    }
}

impl Default for UpgradeLedger {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

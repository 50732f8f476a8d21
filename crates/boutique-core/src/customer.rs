use crate::fixed::{Fixed64, Ticks};
use crate::id::CustomerId;
use crate::item::{Color, Pattern, PriceLevel, Shape};
use serde::{Deserialize, Serialize};

/// Patience a customer arrives with, unless they are a VIP.
pub const BASE_MAX_PATIENCE: u32 = 100;

/// VIPs are pickier: less patience, but double payout.
pub const VIP_MAX_PATIENCE: u32 = 80;

/// Who the customer is to the shopkeeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerKind {
    Family,
    Friend,
    Creature,
}

/// What a customer is shopping for. An empty list means no constraint on
/// that attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    pub max_price: PriceLevel,
}

impl Preference {
    /// A customer who will take anything up to the given price.
    pub fn anything(max_price: PriceLevel) -> Self {
        Self {
            shapes: Vec::new(),
            colors: Vec::new(),
            patterns: Vec::new(),
            max_price,
        }
    }
}

/// A catalog entry: who can show up to a wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDef {
    pub id: CustomerId,
    pub slug: String,
    pub name: String,
    pub avatar: String,
    pub kind: CustomerKind,
    pub wants: Preference,
}

/// Mood shown on the customer card. Always derived from patience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Neutral,
    Impatient,
}

/// Derive mood from remaining patience. Thresholds are absolute, so a VIP
/// (max 80) turns neutral sooner into their visit than a regular customer.
pub fn mood_from_patience(patience: Fixed64) -> Mood {
    if patience > Fixed64::from_num(60) {
        Mood::Happy
    } else if patience > Fixed64::from_num(30) {
        Mood::Neutral
    } else {
        Mood::Impatient
    }
}

/// Deferred-sale bookkeeping while the player is off crafting for this
/// customer. Their patience decays at half rate while `waiting_for_order`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MakeToOrder {
    pub waiting_for_order: bool,
    pub order_started_tick: Ticks,
}

/// A catalog customer instantiated for one wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeCustomer {
    pub id: CustomerId,
    pub name: String,
    pub avatar: String,
    pub kind: CustomerKind,
    pub wants: Preference,
    pub is_vip: bool,
    pub max_patience: Fixed64,
    pub patience: Fixed64,
    pub mood: Mood,
    /// Set when served: sold-to, declined, or walked out. Served customers
    /// leave the visible window and never decay again.
    pub served: bool,
    pub make_to_order: Option<MakeToOrder>,
}

impl RuntimeCustomer {
    /// Instantiate a catalog customer at full patience.
    pub fn from_def(def: &CustomerDef, is_vip: bool) -> Self {
        let max = if is_vip {
            Fixed64::from_num(VIP_MAX_PATIENCE)
        } else {
            Fixed64::from_num(BASE_MAX_PATIENCE)
        };
        Self {
            id: def.id,
            name: def.name.clone(),
            avatar: def.avatar.clone(),
            kind: def.kind,
            wants: def.wants.clone(),
            is_vip,
            max_patience: max,
            patience: max,
            mood: Mood::Happy,
            served: false,
            make_to_order: None,
        }
    }

    pub fn is_waiting_for_order(&self) -> bool {
        self.make_to_order
            .as_ref()
            .is_some_and(|m| m.waiting_for_order)
    }
}

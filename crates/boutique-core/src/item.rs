use crate::fixed::Fixed32;
use crate::id::ItemId;
use serde::{Deserialize, Serialize};

/// Clothing silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Shirt,
    Dress,
    Pants,
    Skirt,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Shirt, Shape::Dress, Shape::Pants, Shape::Skirt];

    pub fn label(self) -> &'static str {
        match self {
            Shape::Shirt => "shirt",
            Shape::Dress => "dress",
            Shape::Pants => "pants",
            Shape::Skirt => "skirt",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Fabric color. The unlock schedule gates which of these are craftable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Pink,
    Purple,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    White,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Pink,
        Color::Purple,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Orange,
        Color::Red,
        Color::White,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Color::Pink => "pink",
            Color::Purple => "purple",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::Red => "red",
            Color::White => "white",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Fabric pattern. `None` is the plain fabric every profile starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    None,
    Stripes,
    Dots,
    Hearts,
    Stars,
}

impl Pattern {
    pub const ALL: [Pattern; 5] = [
        Pattern::None,
        Pattern::Stripes,
        Pattern::Dots,
        Pattern::Hearts,
        Pattern::Stars,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Pattern::None => "none",
            Pattern::Stripes => "stripes",
            Pattern::Dots => "dots",
            Pattern::Hearts => "hearts",
            Pattern::Stars => "stars",
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Price tier of an item. Ordered: a customer's `max_price` caps the tier
/// they will accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PriceLevel {
    One,
    Two,
    Three,
}

impl PriceLevel {
    pub const ALL: [PriceLevel; 3] = [PriceLevel::One, PriceLevel::Two, PriceLevel::Three];

    /// The 1/2/3 tier as stored in data files and saves.
    pub fn tier(self) -> u8 {
        match self {
            PriceLevel::One => 1,
            PriceLevel::Two => 2,
            PriceLevel::Three => 3,
        }
    }

    /// Base coin value of the tier before bonuses.
    pub fn coin_value(self) -> u32 {
        match self {
            PriceLevel::One => 5,
            PriceLevel::Two => 10,
            PriceLevel::Three => 15,
        }
    }
}

impl TryFrom<u8> for PriceLevel {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(PriceLevel::One),
            2 => Ok(PriceLevel::Two),
            3 => Ok(PriceLevel::Three),
            other => Err(format!("price level must be 1, 2, or 3, got {other}")),
        }
    }
}

impl From<PriceLevel> for u8 {
    fn from(v: PriceLevel) -> u8 {
        v.tier()
    }
}

/// One free-draw decoration stroke. Opaque to the session; carried so a
/// crafted item round-trips through a save unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoodleStroke {
    pub points: Vec<DoodlePoint>,
    pub color: Color,
    pub width: Fixed32,
}

/// A point on the doodle canvas, in item-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoodlePoint {
    pub x: Fixed32,
    pub y: Fixed32,
}

/// A crafted clothing item. Immutable once created, except for its removal
/// from the inventory when sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: ItemId,
    pub shape: Shape,
    pub color: Color,
    pub pattern: Pattern,
    #[serde(default)]
    pub doodles: Vec<DoodleStroke>,
    pub price: PriceLevel,
    pub created_at_ms: u64,
}

/// Everything the crafting flow decides about an item, minus the id and
/// timestamp the inventory assigns on `add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub shape: Shape,
    pub color: Color,
    pub pattern: Pattern,
    #[serde(default)]
    pub doodles: Vec<DoodleStroke>,
    pub price: PriceLevel,
}

impl ItemDraft {
    pub fn new(shape: Shape, color: Color, pattern: Pattern, price: PriceLevel) -> Self {
        Self {
            shape,
            color,
            pattern,
            doodles: Vec::new(),
            price,
        }
    }
}

/// The player's clothing collection. Insertion order is display order: the
/// sales rack is the first `capacity` items, and crafted items append at
/// the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<ClothingItem>,
    next_id: u64,
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
        }
    }

    /// Append a crafted item, assigning it the next id.
    pub fn add(&mut self, draft: ItemDraft, created_at_ms: u64) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.push(ClothingItem {
            id,
            shape: draft.shape,
            color: draft.color,
            pattern: draft.pattern,
            doodles: draft.doodles,
            price: draft.price,
            created_at_ms,
        });
        id
    }

    /// Remove an item by id, preserving the order of the rest.
    /// Returns the item, or `None` if the id is stale.
    pub fn remove(&mut self, id: ItemId) -> Option<ClothingItem> {
        let pos = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn get(&self, id: ItemId) -> Option<&ClothingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The sales rack: the first `capacity` items.
    pub fn rack(&self, capacity: usize) -> &[ClothingItem] {
        &self.items[..capacity.min(self.items.len())]
    }

    /// The most recently crafted item.
    pub fn newest(&self) -> Option<&ClothingItem> {
        self.items.last()
    }

    pub fn items(&self) -> &[ClothingItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every item. The id counter keeps running so ids stay unique.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(price: PriceLevel) -> ItemDraft {
        ItemDraft::new(Shape::Shirt, Color::Pink, Pattern::None, price)
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let mut inv = Inventory::new();
        let a = inv.add(draft(PriceLevel::One), 0);
        let b = inv.add(draft(PriceLevel::Two), 0);
        assert_eq!(a, ItemId(0));
        assert_eq!(b, ItemId(1));
        assert_eq!(inv.len(), 2);
    }

    #[test]
    fn remove_is_exactly_once() {
        let mut inv = Inventory::new();
        let id = inv.add(draft(PriceLevel::One), 0);

        let removed = inv.remove(id);
        assert!(removed.is_some());
        assert_eq!(removed.unwrap().id, id);

        // Second removal with the same id is a stale no-op.
        assert!(inv.remove(id).is_none());
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_preserves_order_of_rest() {
        let mut inv = Inventory::new();
        let a = inv.add(draft(PriceLevel::One), 0);
        let b = inv.add(draft(PriceLevel::Two), 0);
        let c = inv.add(draft(PriceLevel::Three), 0);

        inv.remove(b);
        let ids: Vec<ItemId> = inv.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn ids_never_repeat_after_removal() {
        let mut inv = Inventory::new();
        let a = inv.add(draft(PriceLevel::One), 0);
        inv.remove(a);
        let b = inv.add(draft(PriceLevel::One), 0);
        assert_ne!(a, b);
    }

    #[test]
    fn rack_is_a_prefix() {
        let mut inv = Inventory::new();
        for _ in 0..8 {
            inv.add(draft(PriceLevel::One), 0);
        }
        assert_eq!(inv.rack(6).len(), 6);
        assert_eq!(inv.rack(6)[0].id, ItemId(0));
        assert_eq!(inv.rack(6)[5].id, ItemId(5));
    }

    #[test]
    fn rack_smaller_than_capacity() {
        let mut inv = Inventory::new();
        inv.add(draft(PriceLevel::One), 0);
        assert_eq!(inv.rack(6).len(), 1);
        assert!(Inventory::new().rack(6).is_empty());
    }

    #[test]
    fn newest_is_last_added() {
        let mut inv = Inventory::new();
        inv.add(draft(PriceLevel::One), 0);
        let b = inv.add(draft(PriceLevel::Two), 0);
        assert_eq!(inv.newest().map(|i| i.id), Some(b));
    }

    #[test]
    fn price_level_coin_values() {
        assert_eq!(PriceLevel::One.coin_value(), 5);
        assert_eq!(PriceLevel::Two.coin_value(), 10);
        assert_eq!(PriceLevel::Three.coin_value(), 15);
    }

    #[test]
    fn price_level_ordering() {
        assert!(PriceLevel::One < PriceLevel::Two);
        assert!(PriceLevel::Two < PriceLevel::Three);
    }

    #[test]
    fn price_level_serde_as_tier_number() {
        let json = serde_json::to_string(&PriceLevel::Two).unwrap();
        assert_eq!(json, "2");
        let back: PriceLevel = serde_json::from_str("3").unwrap();
        assert_eq!(back, PriceLevel::Three);
        assert!(serde_json::from_str::<PriceLevel>("4").is_err());
    }

    #[test]
    fn enum_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Shape::Dress).unwrap(), "\"dress\"");
        assert_eq!(serde_json::to_string(&Color::Pink).unwrap(), "\"pink\"");
        assert_eq!(
            serde_json::to_string(&Pattern::Stripes).unwrap(),
            "\"stripes\""
        );
    }

    #[test]
    fn inventory_serde_round_trip_keeps_id_counter() {
        let mut inv = Inventory::new();
        let a = inv.add(draft(PriceLevel::One), 11);
        inv.remove(a);

        let json = serde_json::to_string(&inv).unwrap();
        let mut restored: Inventory = serde_json::from_str(&json).unwrap();

        // A fresh add after the round-trip must not reuse the removed id.
        let b = restored.add(draft(PriceLevel::One), 12);
        assert_ne!(a, b);
    }
}

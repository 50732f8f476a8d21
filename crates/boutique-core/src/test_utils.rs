//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::catalog::{CatalogBuilder, CustomerCatalog};
use crate::customer::{CustomerDef, CustomerKind, Preference};
use crate::fixed::Fixed64;
use crate::id::{CustomerId, ItemId};
use crate::item::{ClothingItem, Color, Inventory, ItemDraft, Pattern, PriceLevel, Shape};
use crate::matching::MatchFailure;
use crate::session::{CustomerSnapshot, SaleRecord, SessionConfig, WaveResult, WaveSession};

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Item constructors
// ===========================================================================

pub fn pink_shirt() -> ItemDraft {
    ItemDraft::new(Shape::Shirt, Color::Pink, Pattern::None, PriceLevel::One)
}

pub fn blue_dress() -> ItemDraft {
    ItemDraft::new(Shape::Dress, Color::Blue, Pattern::None, PriceLevel::Two)
}

pub fn striped_skirt() -> ItemDraft {
    ItemDraft::new(Shape::Skirt, Color::Purple, Pattern::Stripes, PriceLevel::Three)
}

/// A fully specified item outside any inventory, for record-level tests.
pub fn clothing_item(
    id: u64,
    shape: Shape,
    color: Color,
    pattern: Pattern,
    price: PriceLevel,
) -> ClothingItem {
    ClothingItem {
        id: ItemId(id),
        shape,
        color,
        pattern,
        doodles: Vec::new(),
        price,
        created_at_ms: 0,
    }
}

/// An inventory of `count` pink price-1 shirts.
pub fn stocked_inventory(count: usize) -> Inventory {
    let mut inventory = Inventory::new();
    for _ in 0..count {
        inventory.add(pink_shirt(), 0);
    }
    inventory
}

// ===========================================================================
// Customer constructors
// ===========================================================================

pub fn wants(shapes: &[Shape], colors: &[Color], max_price: PriceLevel) -> Preference {
    Preference {
        shapes: shapes.to_vec(),
        colors: colors.to_vec(),
        patterns: Vec::new(),
        max_price,
    }
}

pub fn customer_def(id: u32, slug: &str, wants: Preference) -> CustomerDef {
    CustomerDef {
        id: CustomerId(id),
        slug: slug.to_string(),
        name: slug.to_string(),
        avatar: "🙂".to_string(),
        kind: CustomerKind::Friend,
        wants,
    }
}

/// A catalog of `count` easygoing customers (any item, max price 3).
pub fn easy_catalog(count: u32) -> CustomerCatalog {
    let mut builder = CatalogBuilder::new();
    for i in 0..count {
        builder.add_customer(customer_def(
            i,
            &format!("c{i}"),
            Preference::anything(PriceLevel::Three),
        ));
    }
    builder.build().unwrap()
}

/// A catalog of `count` customers who only want dresses. Nothing in a
/// shirt-stocked rack can satisfy them.
pub fn picky_catalog(count: u32) -> CustomerCatalog {
    let mut builder = CatalogBuilder::new();
    for i in 0..count {
        builder.add_customer(customer_def(
            i,
            &format!("p{i}"),
            wants(&[Shape::Dress], &[], PriceLevel::Three),
        ));
    }
    builder.build().unwrap()
}

// ===========================================================================
// Session helpers
// ===========================================================================

/// Deterministic config: no VIPs, no tips.
pub fn no_vip_config(seed: u64) -> SessionConfig {
    SessionConfig {
        vip_chance: Fixed64::ZERO,
        seed,
        ..SessionConfig::default()
    }
}

/// A session already started against the given catalog and stock.
pub fn started_session(
    config: SessionConfig,
    catalog: &CustomerCatalog,
    inventory: &Inventory,
) -> WaveSession {
    let mut session = WaveSession::new(config);
    session.start_wave(catalog, inventory).unwrap();
    session
}

// ===========================================================================
// Record constructors
// ===========================================================================

/// A resolved sale against a synthetic customer, for ledger-level tests.
pub fn sale_record(item_id: u64, customer_id: u32, coins: u32, success: bool) -> SaleRecord {
    SaleRecord {
        item_id: ItemId(item_id),
        item: clothing_item(
            item_id,
            Shape::Shirt,
            Color::Pink,
            Pattern::None,
            PriceLevel::One,
        ),
        customer: CustomerSnapshot {
            id: CustomerId(customer_id),
            name: format!("Customer {customer_id}"),
            kind: CustomerKind::Friend,
            is_vip: false,
        },
        coins,
        success,
        reason: if success {
            None
        } else {
            Some(MatchFailure::TooExpensive)
        },
    }
}

/// A wave result whose totals are derived from the given records.
pub fn wave_result(wave_number: u32, sales: Vec<SaleRecord>) -> WaveResult {
    let total_earned = sales.iter().filter(|s| s.success).map(|s| s.coins).sum();
    let items_sold = sales.iter().filter(|s| s.success).count() as u32;
    let items_not_sold = sales.len() as u32 - items_sold;
    WaveResult {
        wave_number,
        sales,
        total_earned,
        items_sold,
        items_not_sold,
    }
}

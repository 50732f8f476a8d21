//! Criterion benchmarks for the Boutique wave session.
//!
//! Four benchmark groups:
//! - `wave_tick`: 50 sampled customers, 10 visible -- per-tick sweep cost
//! - `full_wave`: run a whole wave to walkout exhaustion
//! - `sale_path`: select, tap, acknowledge -- the hot player loop
//! - `matching`: rack scan against a picky preference

use boutique_core::fixed::Fixed64;
use boutique_core::item::{Color, Inventory, Pattern, PriceLevel, Shape};
use boutique_core::matching;
use boutique_core::session::{SessionConfig, WaveSession};
use boutique_core::test_utils::*;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;

// ===========================================================================
// Session builders
// ===========================================================================

/// A wave too long to time out, crowded enough to make the sweep visible.
fn crowded_session() -> (WaveSession, Inventory) {
    let catalog = easy_catalog(50);
    let inventory = stocked_inventory(50);
    let config = SessionConfig {
        sample_size: 50,
        visible_count: 10,
        duration_secs: 1_000_000,
        ..no_vip_config(7)
    };
    let session = started_session(config, &catalog, &inventory);
    (session, inventory)
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_wave_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("wave_tick");
    group.sample_size(50);

    group.bench_function("30_ticks_10_visible", |b| {
        b.iter_batched(
            || crowded_session().0,
            |mut session| {
                session.advance(Fixed64::from_num(30));
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_full_wave(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_wave");
    group.sample_size(50);

    // Nobody is served, so every customer walks out by tick 50 and the
    // wave ends by exhaustion.
    group.bench_function("walkout_exhaustion_50_customers", |b| {
        b.iter_batched(
            || crowded_session().0,
            |mut session| {
                session.advance(Fixed64::from_num(60));
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_sale_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("sale_path");
    group.sample_size(50);

    group.bench_function("select_tap_acknowledge", |b| {
        b.iter_batched(
            crowded_session,
            |(mut session, mut inventory)| {
                let item = inventory.rack(6)[0].id;
                let customer = session.visible().next().unwrap().id;
                session.select_item(item, &inventory);
                session.tap_customer(customer, &inventory);
                session.acknowledge_result(&mut inventory);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");
    group.sample_size(100);

    let rack: Vec<_> = (0..6)
        .map(|i| clothing_item(i, Shape::Shirt, Color::Pink, Pattern::None, PriceLevel::One))
        .collect();
    let preference = wants(&[Shape::Dress], &[Color::Blue], PriceLevel::Three);

    group.bench_function("rack_scan_6_items", |b| {
        b.iter(|| matching::has_matching_item(black_box(&rack), black_box(&preference)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_wave_tick,
    bench_full_wave,
    bench_sale_path,
    bench_matching
);
criterion_main!(benches);

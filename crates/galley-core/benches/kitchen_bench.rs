//! Criterion benchmarks for the galley core.
//!
//! - `recipe_match`: dish matching and cook planning over a staged wok.
//! - `kitchen_tick`: one scheduler pass over a busy kitchen.
//! - `autocook_service`: the automation loop serving a full queue.

use criterion::{Criterion, criterion_group, criterion_main};
use galley_core::automation::AutoCook;
use galley_core::config::KitchenConfig;
use galley_core::customer::CustomerQueue;
use galley_core::id::*;
use galley_core::item::{ItemKind, SlotItem};
use galley_core::notify::Silent;
use galley_core::recipe::{match_dish, plan_cook};
use galley_core::sim::Scheduler;
use galley_core::state::GameState;
use galley_core::test_utils::*;
use std::hint::black_box;

// ===========================================================================
// Builders
// ===========================================================================

fn staged_wok() -> Vec<SlotItem> {
    vec![
        SlotItem::new("vegetables_chopped", ItemKind::Prepared, 3, 3),
        SlotItem::new("garlic_chopped", ItemKind::Prepared, 3, 5),
        SlotItem::new("salt", ItemKind::Seasoning, 3, 3),
    ]
}

/// Every cooking appliance holding a finished batch.
fn busy_state() -> GameState {
    let mut state = test_state();
    for id in ["cutting_board", "wok", "steamer"] {
        finish_on(&mut state, id, "vegetables_chopped", 1);
    }
    state
}

fn full_queue() -> CustomerQueue {
    let mut queue = CustomerQueue::new(6, 3);
    for _ in 0..6 {
        let _ = queue.arrive(ItemId::from("garlic_vegetables"), 600);
    }
    queue
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_recipe_match(c: &mut Criterion) {
    let catalog = test_catalog();
    let config = KitchenConfig::default();
    let slots = staged_wok();

    c.bench_function("recipe_match", |b| {
        b.iter(|| black_box(match_dish(&catalog, black_box(&slots), "wok")))
    });
    c.bench_function("plan_cook", |b| {
        b.iter(|| black_box(plan_cook(&catalog, &config, black_box(&slots), "wok")))
    });
}

fn bench_kitchen_tick(c: &mut Criterion) {
    c.bench_function("kitchen_tick", |b| {
        let mut state = busy_state();
        let mut queue = CustomerQueue::default();
        let mut scheduler = Scheduler::new(&state.config);
        let mut now = 0;
        b.iter(|| {
            now += 100;
            black_box(scheduler.advance(now, &mut state, &mut queue, &mut Silent));
        })
    });
}

fn bench_autocook(c: &mut Criterion) {
    c.bench_function("autocook_service_60s", |b| {
        b.iter(|| {
            let mut state = test_state();
            for item in ["vegetables", "garlic"] {
                state.inventory.set(item, 50);
            }
            let mut queue = full_queue();
            let mut scheduler = Scheduler::new(&state.config).with_automation(AutoCook::new());
            let mut now = 0;
            while now <= 60_000 {
                scheduler.advance(now, &mut state, &mut queue, &mut Silent);
                now += 100;
            }
            black_box(state.money)
        })
    });
}

criterion_group!(benches, bench_recipe_match, bench_kitchen_tick, bench_autocook);
criterion_main!(benches);

//! The automation loop running a service on the bundled kitchen.

use galley_core::automation::AutoCook;
use galley_core::customer::{CustomerQueue, Departure};
use galley_core::id::*;
use galley_core::notify::{Severity, ToastLog};
use galley_core::plate::PlateStatus;
use galley_core::sim::Scheduler;
use galley_core::state::GameState;

// ===========================================================================
// Helpers
// ===========================================================================

fn kitchen_with(stock: &[(&str, u32)]) -> GameState {
    let mut state = galley_data::default_game_data()
        .expect("bundled kitchen loads")
        .into_state();
    for &(item, count) in stock {
        state.inventory.set(item, count);
    }
    state
}

/// Drive the scheduler in 100 ms steps up to `until`, collecting departures.
fn run(
    scheduler: &mut Scheduler,
    state: &mut GameState,
    queue: &mut CustomerQueue,
    log: &mut ToastLog,
    until: u64,
) -> Vec<Departure> {
    let mut departures = Vec::new();
    let mut now = 0;
    while now <= until {
        departures.extend(scheduler.advance(now, state, queue, log).departures);
        now += 100;
    }
    departures
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn serves_a_two_step_dish() {
    let mut state = kitchen_with(&[("vegetables", 2), ("garlic", 2)]);
    let mut queue = CustomerQueue::default();
    let mut log = ToastLog::new();
    let mut scheduler = Scheduler::new(&state.config).with_automation(AutoCook::new());
    let money = state.money;
    queue.arrive(ItemId::from("garlic_vegetables"), 600).unwrap();

    let departures = run(&mut scheduler, &mut state, &mut queue, &mut log, 20_000);

    assert_eq!(state.money, money + 15);
    assert_eq!(state.inventory.count("vegetables"), 1);
    assert_eq!(state.inventory.count("garlic"), 1);
    assert_eq!(state.seasonings.count("salt"), 99);
    assert!(state.prepared.is_empty());
    assert!(matches!(&departures[..], [Departure::Satisfied(order)] if order.dish == "garlic_vegetables"));
    assert!(queue.is_empty());
    // The dirty plate was washed once the kitchen went quiet.
    assert!(state.plates.iter().all(|p| p.status == PlateStatus::Empty));
    assert_eq!(log.count(Severity::Money), 1);
}

#[test]
fn mixer_and_steamer_make_steamed_egg() {
    let mut state = kitchen_with(&[("egg", 1)]);
    let mut queue = CustomerQueue::default();
    let mut log = ToastLog::new();
    let mut scheduler = Scheduler::new(&state.config).with_automation(AutoCook::new());
    let money = state.money;
    queue.arrive(ItemId::from("steamed_egg"), 600).unwrap();

    run(&mut scheduler, &mut state, &mut queue, &mut log, 15_000);

    assert_eq!(state.money, money + 12);
    assert_eq!(state.inventory.count("egg"), 0);
    assert_eq!(state.seasonings.count("salt"), 99);
}

#[test]
fn two_orders_share_the_kitchen() {
    let mut state = kitchen_with(&[("vegetables", 5), ("garlic", 5), ("pumpkin", 5)]);
    let mut queue = CustomerQueue::default();
    let mut log = ToastLog::new();
    let mut scheduler = Scheduler::new(&state.config).with_automation(AutoCook::new());
    let money = state.money;
    queue.arrive(ItemId::from("garlic_vegetables"), 600).unwrap();
    queue.arrive(ItemId::from("steamed_pumpkin"), 600).unwrap();

    run(&mut scheduler, &mut state, &mut queue, &mut log, 40_000);

    assert_eq!(state.money, money + 15 + 14);
    assert_eq!(state.seasonings.count("sugar"), 99);
    assert!(queue.is_empty());
}

#[test]
fn impatient_customer_leaves_without_stock() {
    let mut state = kitchen_with(&[]);
    let mut queue = CustomerQueue::default();
    let mut log = ToastLog::new();
    let mut scheduler = Scheduler::new(&state.config).with_automation(AutoCook::new());
    queue.arrive(ItemId::from("tomato_egg"), 3).unwrap();

    let departures = run(&mut scheduler, &mut state, &mut queue, &mut log, 5000);

    assert!(matches!(&departures[..], [Departure::OutOfPatience(_)]));
    assert_eq!(log.count(Severity::Warning), 1);
    assert_eq!(scheduler.autocook().map(AutoCook::task_count), Some(0));
}

#[test]
fn disabled_automation_leaves_the_kitchen_alone() {
    let mut state = kitchen_with(&[("vegetables", 2), ("garlic", 2)]);
    let mut queue = CustomerQueue::default();
    let mut log = ToastLog::new();
    let mut scheduler = Scheduler::new(&state.config).with_automation(AutoCook::new());
    if let Some(autocook) = scheduler.autocook_mut() {
        autocook.set_enabled(false);
    }
    queue.arrive(ItemId::from("garlic_vegetables"), 600).unwrap();

    run(&mut scheduler, &mut state, &mut queue, &mut log, 5000);

    assert_eq!(state.inventory.count("vegetables"), 2);
    assert!(state.kitchen.iter().all(|a| a.slots().is_empty()));
}

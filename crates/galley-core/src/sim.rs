//! The single scheduler the host drives.
//!
//! The host calls [`Scheduler::advance`] from its event loop with the
//! current wall-clock time. Each subsystem runs on its own [`Cadence`]:
//! appliance and plate timers, then the automation loop, then customer
//! patience. Nothing else in the crate schedules work.

use crate::appliance::Transition;
use crate::automation::{AutoAction, AutoCook};
use crate::config::KitchenConfig;
use crate::customer::{Departure, FrontOfHouse};
use crate::id::*;
use crate::notify::{Notifier, Severity};
use crate::state::GameState;
use crate::time::Millis;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cadence
// ---------------------------------------------------------------------------

/// A fixed-interval trigger. Fires on the first poll, then whenever at
/// least `interval` has passed since the last due time. Missed periods are
/// skipped rather than replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    pub interval: Millis,
    next_due: Option<Millis>,
}

impl Cadence {
    pub fn new(interval: Millis) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// `true` if the cadence fires at `now`.
    pub fn poll(&mut self, now: Millis) -> bool {
        match self.next_due {
            Some(due) if now < due => false,
            Some(due) if self.interval > 0 => {
                let missed = (now - due) / self.interval;
                self.next_due = Some(due + (missed + 1) * self.interval);
                true
            }
            _ => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    /// Forget the schedule; the next poll fires.
    pub fn restart(&mut self) {
        self.next_due = None;
    }
}

// ---------------------------------------------------------------------------
// Advance result
// ---------------------------------------------------------------------------

/// What one [`Scheduler::advance`] call did.
#[derive(Debug, Default)]
pub struct AdvanceResult {
    /// Appliance transitions, in declaration order. Empty when the timer
    /// cadence did not fire.
    pub transitions: Vec<(ApplianceId, Transition)>,
    pub automation: Option<AutoAction>,
    pub departures: Vec<Departure>,
    /// Whether the appliance timers ran at all.
    pub ticked: bool,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Scheduler {
    timers: Cadence,
    automation: Cadence,
    patience: Cadence,
    paused: bool,
    autocook: Option<AutoCook>,
}

impl Scheduler {
    /// Cadences from `config`; automation off.
    pub fn new(config: &KitchenConfig) -> Self {
        Self {
            timers: Cadence::new(config.tick_interval),
            automation: Cadence::new(config.automation_interval),
            patience: Cadence::new(config.patience_interval),
            paused: false,
            autocook: None,
        }
    }

    pub fn with_automation(mut self, autocook: AutoCook) -> Self {
        self.autocook = Some(autocook);
        self
    }

    pub fn autocook(&self) -> Option<&AutoCook> {
        self.autocook.as_ref()
    }

    pub fn autocook_mut(&mut self) -> Option<&mut AutoCook> {
        self.autocook.as_mut()
    }

    /// A paused scheduler skips every subsystem. Appliance timers are
    /// wall-clock based and catch up on resume.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.timers.restart();
        self.automation.restart();
        self.patience.restart();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Run whatever is due at `now`.
    pub fn advance(
        &mut self,
        now: Millis,
        state: &mut GameState,
        front: &mut dyn FrontOfHouse,
        notifier: &mut dyn Notifier,
    ) -> AdvanceResult {
        let mut result = AdvanceResult::default();
        if self.paused {
            return result;
        }

        if self.timers.poll(now) {
            tracing::trace!(now, "kitchen tick");
            result.transitions = state.tick(now);
            result.ticked = true;
        }

        if let Some(autocook) = self.autocook.as_mut()
            && self.automation.poll(now)
        {
            result.automation = autocook.tick(state, front, now, notifier);
        }

        if self.patience.poll(now) {
            result.departures = front.tick_patience();
            for departure in &result.departures {
                if let Departure::OutOfPatience(order) = departure {
                    tracing::debug!(customer = %order.id, dish = %order.dish, "customer walked out");
                    notifier.show_toast(
                        &format!("Customer {} got tired of waiting", order.id),
                        Severity::Warning,
                    );
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appliance::ApplianceStatus;
    use crate::customer::CustomerQueue;
    use crate::item::{ItemKind, OutputItem};
    use crate::notify::{Silent, ToastLog};
    use crate::test_utils::*;

    #[test]
    fn cadence_fires_on_interval() {
        let mut cadence = Cadence::new(100);
        assert!(cadence.poll(0));
        assert!(!cadence.poll(50));
        assert!(cadence.poll(100));
        assert!(!cadence.poll(199));
        // Skips the missed 200 and 300 periods.
        assert!(cadence.poll(350));
        assert!(!cadence.poll(399));
        assert!(cadence.poll(400));
    }

    #[test]
    fn zero_interval_always_fires() {
        let mut cadence = Cadence::new(0);
        assert!(cadence.poll(5));
        assert!(cadence.poll(5));
    }

    #[test]
    fn advance_ticks_appliances() {
        let mut state = test_state();
        let mut queue = CustomerQueue::default();
        let mut scheduler = Scheduler::new(&state.config);
        let wok = state.appliance_mut("wok").unwrap();
        wok.add_item(seasoning_slot("salt")).unwrap();
        wok.start_processing(250, OutputItem::new("unknown", ItemKind::Dish, 1), 0)
            .unwrap();

        let first = scheduler.advance(0, &mut state, &mut queue, &mut Silent);
        assert!(first.ticked);
        assert!(!scheduler.advance(50, &mut state, &mut queue, &mut Silent).ticked);
        scheduler.advance(300, &mut state, &mut queue, &mut Silent);
        assert_eq!(state.appliance("wok").unwrap().status(), ApplianceStatus::Done);
    }

    #[test]
    fn paused_scheduler_does_nothing() {
        let mut state = test_state();
        let mut queue = CustomerQueue::default();
        queue.arrive(ItemId::from("tomato_egg"), 1);
        let mut scheduler = Scheduler::new(&state.config);
        scheduler.pause();

        let result = scheduler.advance(5000, &mut state, &mut queue, &mut Silent);
        assert!(!result.ticked);
        assert_eq!(queue.len(), 1);

        scheduler.resume();
        let result = scheduler.advance(5000, &mut state, &mut queue, &mut Silent);
        assert!(result.ticked);
        assert_eq!(result.departures.len(), 1);
    }

    #[test]
    fn impatient_customer_is_announced() {
        let mut state = test_state();
        let mut queue = CustomerQueue::default();
        let mut log = ToastLog::new();
        queue.arrive(ItemId::from("tomato_egg"), 2);
        let mut scheduler = Scheduler::new(&state.config);

        scheduler.advance(0, &mut state, &mut queue, &mut log);
        assert_eq!(queue.len(), 1);
        scheduler.advance(1000, &mut state, &mut queue, &mut log);
        assert!(queue.is_empty());
        assert_eq!(log.count(Severity::Warning), 1);
    }

    #[test]
    fn automation_runs_on_its_own_cadence() {
        let mut state = test_state();
        let mut queue = CustomerQueue::default();
        queue.arrive(ItemId::from("garlic_vegetables"), 60);
        let mut scheduler = Scheduler::new(&state.config).with_automation(AutoCook::new());

        let result = scheduler.advance(0, &mut state, &mut queue, &mut Silent);
        assert!(matches!(result.automation, Some(AutoAction::Step { step: 0, .. })));
        let result = scheduler.advance(100, &mut state, &mut queue, &mut Silent);
        assert!(result.automation.is_none());
        assert_eq!(scheduler.autocook().map(AutoCook::task_count), Some(1));
    }
}

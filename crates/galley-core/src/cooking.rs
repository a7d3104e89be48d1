//! Player-facing appliance actions: start, clear, clean, break, repair.
//!
//! These wrap the state machine with the surrounding game rules (shop
//! gate, recipe resolution, money) and report through the notifier and the
//! event log.

use crate::appliance::{ApplianceStatus, Rejection};
use crate::customer::FrontOfHouse;
use crate::event::KitchenEvent;
use crate::id::*;
use crate::item::SlotItem;
use crate::notify::{Notifier, Severity};
use crate::recipe::{CookPlan, plan_cook};
use crate::state::{GameState, StateError};
use crate::time::Millis;

/// What pressing "start" did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookStart {
    Cooking(CookPlan),
    /// A trash bin began emptying.
    Emptying,
}

impl GameState {
    /// Start the appliance: cook its contents, or empty it if it is a trash
    /// bin. Refused while the shop is closed.
    pub fn start_cooking(
        &mut self,
        appliance: &str,
        now: Millis,
        front: &dyn FrontOfHouse,
        notifier: &mut dyn Notifier,
    ) -> Result<CookStart, StateError> {
        if !front.is_shop_open() {
            notifier.show_toast("Open the shop before cooking", Severity::Error);
            return Err(StateError::ShopClosed);
        }

        let catalog = self.shared_catalog();
        let config = self.config.clone();
        let target = self.appliance_mut(appliance)?;
        let id = target.id().clone();

        if target.is_trash() {
            if target.trash_count() == 0 {
                notifier.show_toast("The trash bin is empty", Severity::Error);
                return Err(Rejection::Empty.into());
            }
            target.start_emptying(now)?;
            notifier.show_toast("Emptying the trash bin...", Severity::Success);
            self.events.record(KitchenEvent::CleaningStarted { appliance: id, at: now });
            return Ok(CookStart::Emptying);
        }

        if target.status() != ApplianceStatus::HasIngredients {
            return Err(Rejection::WrongStatus(target.status()).into());
        }
        let plan = plan_cook(&catalog, &config, target.slots(), id.as_str());
        target.start_processing(plan.process_time, plan.output.clone(), now)?;

        if plan.output.count > 1 {
            notifier.show_toast(
                &format!("Cooking {} x {}...", plan.output.count, plan.output.item),
                Severity::Success,
            );
        } else {
            notifier.show_toast("Cooking...", Severity::Success);
        }
        self.events.record(KitchenEvent::ProcessingStarted {
            appliance: id,
            output: plan.output.item.clone(),
            count: plan.output.count,
            duration: plan.process_time,
            at: now,
        });
        Ok(CookStart::Cooking(plan))
    }

    /// Throw away everything staged on an appliance.
    pub fn clear_appliance(
        &mut self,
        appliance: &str,
        notifier: &mut dyn Notifier,
    ) -> Result<Vec<SlotItem>, StateError> {
        let removed = self.appliance_mut(appliance)?.clear()?;
        notifier.show_toast("Appliance cleared", Severity::Success);
        Ok(removed)
    }

    /// Start scrubbing a burned appliance.
    pub fn clean_appliance(
        &mut self,
        appliance: &str,
        now: Millis,
        notifier: &mut dyn Notifier,
    ) -> Result<(), StateError> {
        let target = self.appliance_mut(appliance)?;
        target.begin_clean(now)?;
        let id = target.id().clone();
        notifier.show_toast("Cleaning...", Severity::Info);
        self.events.record(KitchenEvent::CleaningStarted { appliance: id, at: now });
        Ok(())
    }

    /// Forced breakdown, driven by the host's random events.
    pub fn break_appliance(
        &mut self,
        appliance: &str,
        now: Millis,
        notifier: &mut dyn Notifier,
    ) -> Result<(), StateError> {
        let target = self.appliance_mut(appliance)?;
        target.break_down()?;
        let id = target.id().clone();
        notifier.show_toast(&format!("{} broke down!", target.def().name), Severity::Warning);
        self.events.record(KitchenEvent::ApplianceBroken { appliance: id, at: now });
        Ok(())
    }

    /// Pay for and start repairing a broken appliance. Returns the cost.
    pub fn repair_appliance(
        &mut self,
        appliance: &str,
        now: Millis,
        notifier: &mut dyn Notifier,
    ) -> Result<u32, StateError> {
        let target = self.appliance(appliance)?;
        if target.status() != ApplianceStatus::Broken {
            return Err(Rejection::WrongStatus(target.status()).into());
        }
        let cost = self.config.repair_cost(target.def().level);
        let id = target.id().clone();

        if let Err(rejection) = self.spend(cost) {
            notifier.show_toast(&format!("Repair costs {cost} coins"), Severity::Error);
            return Err(rejection.into());
        }
        let repair_time = self.config.repair_time;
        self.appliance_mut(appliance)?.begin_repair(repair_time, now)?;

        notifier.show_toast(&format!("-{cost} coins"), Severity::Money);
        self.events.record(KitchenEvent::RepairStarted {
            appliance: id,
            cost,
            at: now,
        });
        Ok(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CustomerQueue;
    use crate::item::ItemKind;
    use crate::notify::ToastLog;
    use crate::recipe::CookOutcome;
    use crate::test_utils::*;

    #[test]
    fn closed_shop_refuses() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        let mut queue = CustomerQueue::default();
        queue.close();
        state.appliance_mut("wok").unwrap().add_item(seasoning_slot("salt")).unwrap();

        assert_eq!(
            state.start_cooking("wok", 0, &queue, &mut log),
            Err(StateError::ShopClosed)
        );
        assert_eq!(log.count(Severity::Error), 1);
        assert_eq!(
            state.appliance("wok").unwrap().status(),
            ApplianceStatus::HasIngredients
        );
    }

    #[test]
    fn cooking_fixes_output_at_start() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        let queue = CustomerQueue::default();
        let board = state.appliance_mut("cutting_board").unwrap();
        board.add_item(SlotItem::new("vegetables", ItemKind::Raw, 3, 3)).unwrap();

        let started = state.start_cooking("cutting_board", 0, &queue, &mut log).unwrap();
        let CookStart::Cooking(plan) = started else {
            panic!("expected a cook");
        };
        assert_eq!(
            plan.outcome,
            CookOutcome::Prepared {
                item: ItemId::from("vegetables_chopped"),
                count: 3
            }
        );
        let board = state.appliance("cutting_board").unwrap();
        assert_eq!(board.status(), ApplianceStatus::Processing);
        assert_eq!(board.pending_output(), Some(&plan.output));
        assert!(log.last().unwrap().message.contains("3 x vegetables_chopped"));
    }

    #[test]
    fn idle_appliance_does_not_start() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        let queue = CustomerQueue::default();
        assert_eq!(
            state.start_cooking("wok", 0, &queue, &mut log),
            Err(StateError::Rejected(Rejection::WrongStatus(ApplianceStatus::Idle)))
        );
        assert!(state.events.is_empty());
    }

    #[test]
    fn trash_bin_start_empties() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        let queue = CustomerQueue::default();
        state.appliance_mut("trash_bin").unwrap().add_trash().unwrap();

        assert_eq!(
            state.start_cooking("trash_bin", 0, &queue, &mut log),
            Ok(CookStart::Emptying)
        );
        assert_eq!(
            state.appliance("trash_bin").unwrap().status(),
            ApplianceStatus::Cleaning
        );
    }

    #[test]
    fn clear_discards_staged_items() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        state.appliance_mut("wok").unwrap().add_item(raw_slot("egg", 3)).unwrap();
        let removed = state.clear_appliance("wok", &mut log).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(state.appliance("wok").unwrap().status(), ApplianceStatus::Idle);
    }

    #[test]
    fn burned_wok_cleans() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        finish_on(&mut state, "wok", "garlic_vegetables", 1);
        state.tick(10_000);
        assert_eq!(state.appliance("wok").unwrap().status(), ApplianceStatus::Burned);

        state.clean_appliance("wok", 10_000, &mut log).unwrap();
        state.tick(13_000);
        assert_eq!(state.appliance("wok").unwrap().status(), ApplianceStatus::Idle);
    }

    #[test]
    fn repair_charges_by_level() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        state.break_appliance("wok", 0, &mut log).unwrap();

        let money = state.money;
        assert_eq!(state.repair_appliance("wok", 0, &mut log), Ok(10));
        assert_eq!(state.money, money - 10);
        assert_eq!(
            state.appliance("wok").unwrap().status(),
            ApplianceStatus::Repairing
        );
        state.tick(3000);
        assert_eq!(state.appliance("wok").unwrap().status(), ApplianceStatus::Idle);
    }

    #[test]
    fn repair_without_money_changes_nothing() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        state.break_appliance("wok", 0, &mut log).unwrap();
        state.money = 4;
        assert!(matches!(
            state.repair_appliance("wok", 0, &mut log),
            Err(StateError::Rejected(Rejection::InsufficientFunds { .. }))
        ));
        assert_eq!(state.money, 4);
        assert_eq!(state.appliance("wok").unwrap().status(), ApplianceStatus::Broken);
    }

    #[test]
    fn trash_bins_never_break() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        assert_eq!(
            state.break_appliance("trash_bin", 0, &mut log),
            Err(StateError::Rejected(Rejection::TrashBin("break")))
        );
    }
}

//! Plates: the only way a dish reaches a customer.
//!
//! ```text
//! Empty --plate dish--> HasDish --serve--> Dirty --wash--> Washing --done--> Empty
//! ```

use crate::appliance::Rejection;
use crate::customer::FrontOfHouse;
use crate::event::KitchenEvent;
use crate::id::*;
use crate::item::ItemKind;
use crate::notify::{Notifier, Severity};
use crate::state::{GameState, StateError};
use crate::time::{Millis, Timer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateStatus {
    Empty,
    HasDish(ItemId),
    Dirty,
    Washing {
        start: Millis,
        duration: Millis,
        progress: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlateError {
    #[error("the plate is not empty")]
    Occupied,
    #[error("the plate holds no dish")]
    NoDish,
    #[error("only dirty plates can be washed")]
    NotDirty,
    #[error("the plate is already empty")]
    AlreadyEmpty,
    #[error("{0} is not a finished dish")]
    NotADish(ItemId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plate {
    pub status: PlateStatus,
}

impl Default for Plate {
    fn default() -> Self {
        Self::new()
    }
}

impl Plate {
    pub fn new() -> Self {
        Self {
            status: PlateStatus::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status == PlateStatus::Empty
    }

    pub fn dish(&self) -> Option<&ItemId> {
        match &self.status {
            PlateStatus::HasDish(dish) => Some(dish),
            _ => None,
        }
    }

    pub fn put_dish(&mut self, dish: ItemId) -> Result<(), PlateError> {
        if !self.is_empty() {
            return Err(PlateError::Occupied);
        }
        self.status = PlateStatus::HasDish(dish);
        Ok(())
    }

    pub fn wash(&mut self, now: Millis, duration: Millis) -> Result<(), PlateError> {
        if self.status != PlateStatus::Dirty {
            return Err(PlateError::NotDirty);
        }
        self.status = PlateStatus::Washing {
            start: now,
            duration,
            progress: 0.0,
        };
        Ok(())
    }

    /// Throw away whatever is on the plate.
    pub fn clear(&mut self) -> Result<(), PlateError> {
        if self.is_empty() {
            return Err(PlateError::AlreadyEmpty);
        }
        self.status = PlateStatus::Empty;
        Ok(())
    }

    /// Advance washing. Returns `true` when the plate just became clean.
    pub fn tick(&mut self, now: Millis) -> bool {
        let PlateStatus::Washing {
            start,
            duration,
            progress,
        } = &mut self.status
        else {
            return false;
        };
        let timer = Timer::new(*start, *duration);
        *progress = timer.progress(now);
        if timer.is_finished(now) {
            self.status = PlateStatus::Empty;
            return true;
        }
        false
    }
}

// ---------------------------------------------------------------------------
// GameState operations
// ---------------------------------------------------------------------------

impl GameState {
    pub fn wash_plate(&mut self, index: usize, now: Millis) -> Result<(), StateError> {
        let duration = self.config.wash_time;
        self.plate_mut(index)?.wash(now, duration)?;
        Ok(())
    }

    pub fn clear_plate(&mut self, index: usize) -> Result<(), StateError> {
        self.plate_mut(index)?.clear()?;
        Ok(())
    }

    /// Carry an empty plate to a finished appliance and take one dish.
    pub fn plate_onto_appliance(
        &mut self,
        plate: usize,
        appliance: &str,
        notifier: &mut dyn Notifier,
    ) -> Result<ItemId, StateError> {
        if !self.plate(plate)?.is_empty() {
            notifier.show_toast("That plate is not empty", Severity::Error);
            return Err(PlateError::Occupied.into());
        }
        let source = self.appliance_mut(appliance)?;
        let output = source.output().ok_or(Rejection::NothingToCollect)?;
        if output.kind != ItemKind::Dish {
            notifier.show_toast("Only finished dishes can be plated", Severity::Error);
            return Err(PlateError::NotADish(output.item.clone()).into());
        }
        let unit = source.take_one_output()?;
        self.plate_mut(plate)?.put_dish(unit.item.clone())?;
        notifier.show_toast(&format!("Plated {}", unit.item), Severity::Success);
        Ok(unit.item)
    }

    /// Hand a plated dish to customer `customer`. On success the plate turns
    /// dirty and the dish price is credited.
    pub fn serve_plate(
        &mut self,
        plate: usize,
        customer: usize,
        front: &mut dyn FrontOfHouse,
        now: Millis,
        notifier: &mut dyn Notifier,
    ) -> Result<u32, StateError> {
        let Some(dish) = self.plate(plate)?.dish().cloned() else {
            notifier.show_toast("There is no dish on that plate", Severity::Error);
            return Err(PlateError::NoDish.into());
        };
        if !front.serve_customer(customer, &dish) {
            notifier.show_toast(&format!("Nobody there wants {dish}"), Severity::Error);
            return Err(StateError::ServeRefused(customer));
        }

        self.plate_mut(plate)?.status = PlateStatus::Dirty;
        let price = self.catalog().dish(dish.as_str()).map_or(0, |d| d.price);
        self.earn(price);
        tracing::debug!(%dish, customer, price, "dish served");
        notifier.show_toast(&format!("+{price} coins"), Severity::Money);
        self.events.record(KitchenEvent::DishServed {
            dish,
            customer,
            price,
            at: now,
        });
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CustomerQueue;
    use crate::notify::ToastLog;
    use crate::test_utils::*;

    #[test]
    fn wash_cycle_returns_to_empty() {
        let mut plate = Plate {
            status: PlateStatus::Dirty,
        };
        plate.wash(1000, 2000).unwrap();
        assert!(!plate.tick(2000));
        assert!(matches!(
            plate.status,
            PlateStatus::Washing { progress, .. } if progress == 50.0
        ));
        assert!(plate.tick(3000));
        assert!(plate.is_empty());
    }

    #[test]
    fn only_dirty_plates_wash() {
        let mut plate = Plate::new();
        assert_eq!(plate.wash(0, 2000), Err(PlateError::NotDirty));
        assert_eq!(plate.clear(), Err(PlateError::AlreadyEmpty));
    }

    #[test]
    fn plating_takes_one_unit() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        finish_on(&mut state, "wok", "garlic_vegetables", 2);

        let dish = state.plate_onto_appliance(0, "wok", &mut log).unwrap();
        assert_eq!(dish, "garlic_vegetables");
        assert_eq!(state.plates[0].dish(), Some(&ItemId::from("garlic_vegetables")));
        assert_eq!(state.appliance("wok").unwrap().output().unwrap().count, 1);

        assert!(matches!(
            state.plate_onto_appliance(0, "wok", &mut log),
            Err(StateError::Plate(PlateError::Occupied))
        ));
    }

    #[test]
    fn prepared_output_cannot_be_plated() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        finish_on(&mut state, "cutting_board", "vegetables_chopped", 1);
        assert!(matches!(
            state.plate_onto_appliance(0, "cutting_board", &mut log),
            Err(StateError::Plate(PlateError::NotADish(_)))
        ));
        assert!(state.plates[0].is_empty());
    }

    #[test]
    fn serving_credits_price_and_dirties_plate() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        let mut queue = CustomerQueue::default();
        queue.arrive(ItemId::from("garlic_vegetables"), 30);
        state.plates[1].put_dish(ItemId::from("garlic_vegetables")).unwrap();

        let money = state.money;
        let price = state.serve_plate(1, 0, &mut queue, 0, &mut log).unwrap();
        assert_eq!(price, 15);
        assert_eq!(state.money, money + 15);
        assert_eq!(state.plates[1].status, PlateStatus::Dirty);
    }

    #[test]
    fn refused_serve_keeps_dish() {
        let mut state = test_state();
        let mut log = ToastLog::new();
        let mut queue = CustomerQueue::default();
        queue.arrive(ItemId::from("tomato_egg"), 30);
        state.plates[0].put_dish(ItemId::from("garlic_vegetables")).unwrap();

        let money = state.money;
        assert_eq!(
            state.serve_plate(0, 0, &mut queue, 0, &mut log),
            Err(StateError::ServeRefused(0))
        );
        assert_eq!(state.money, money);
        assert!(state.plates[0].dish().is_some());
    }
}

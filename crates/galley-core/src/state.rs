use crate::appliance::{Appliance, Rejection, Transition};
use crate::catalog::Catalog;
use crate::config::KitchenConfig;
use crate::event::{EventLog, KitchenEvent};
use crate::id::*;
use crate::item::{PreparedShelf, Stock};
use crate::kitchen::Kitchen;
use crate::payload::DragTracker;
use crate::plate::{Plate, PlateError};
use crate::time::Millis;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("unknown appliance '{0}'")]
    UnknownAppliance(ApplianceId),
    #[error("no plate at index {0}")]
    UnknownPlate(usize),
    #[error("the shop is closed")]
    ShopClosed,
    #[error("out of {0}")]
    OutOfStock(ItemId),
    #[error("customer {0} did not accept the dish")]
    ServeRefused(usize),
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Plate(#[from] PlateError),
}

/// The whole mutable game state, owned explicitly by the host.
///
/// Catalog data is shared and read-only; everything else is plain owned
/// data mutated through the operations in this crate.
#[derive(Debug)]
pub struct GameState {
    catalog: Arc<Catalog>,
    pub config: KitchenConfig,
    pub kitchen: Kitchen,
    /// Raw ingredient stock.
    pub inventory: Stock,
    /// Seasoning amounts.
    pub seasonings: Stock,
    pub prepared: PreparedShelf,
    pub plates: Vec<Plate>,
    pub money: u32,
    pub drag: DragTracker,
    pub events: EventLog,
}

impl GameState {
    /// Fresh state: idle kitchen, empty pantry, full seasoning bar, clean
    /// plates and the configured starting money.
    pub fn new(catalog: Arc<Catalog>, config: KitchenConfig) -> Self {
        let kitchen = Kitchen::from_catalog(&catalog, &config);
        let seasonings = catalog
            .seasonings()
            .iter()
            .map(|s| (s.id.clone(), s.max_amount))
            .collect();
        Self {
            kitchen,
            inventory: Stock::new(),
            seasonings,
            prepared: PreparedShelf::new(),
            plates: vec![Plate::new(); config.plate_count],
            money: config.starting_money,
            drag: DragTracker::new(),
            events: EventLog::new(config.event_capacity),
            catalog,
            config,
        }
    }

    /// Back to the state [`new`](Self::new) produces.
    pub fn reset(&mut self) {
        *self = Self::new(Arc::clone(&self.catalog), self.config.clone());
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn shared_catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    pub fn appliance(&self, id: &str) -> Result<&Appliance, StateError> {
        self.kitchen
            .get(id)
            .ok_or_else(|| StateError::UnknownAppliance(ApplianceId::from(id)))
    }

    pub fn appliance_mut(&mut self, id: &str) -> Result<&mut Appliance, StateError> {
        self.kitchen
            .get_mut(id)
            .ok_or_else(|| StateError::UnknownAppliance(ApplianceId::from(id)))
    }

    pub fn plate(&self, index: usize) -> Result<&Plate, StateError> {
        self.plates.get(index).ok_or(StateError::UnknownPlate(index))
    }

    pub fn plate_mut(&mut self, index: usize) -> Result<&mut Plate, StateError> {
        self.plates.get_mut(index).ok_or(StateError::UnknownPlate(index))
    }

    /// Deduct `amount`, or fail without touching the balance.
    pub fn spend(&mut self, amount: u32) -> Result<(), Rejection> {
        if amount > self.money {
            return Err(Rejection::InsufficientFunds {
                needed: amount,
                available: self.money,
            });
        }
        self.money -= amount;
        Ok(())
    }

    pub fn earn(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Advance appliance and plate timers. Every transition is recorded in
    /// the event log and returned.
    pub fn tick(&mut self, now: Millis) -> Vec<(ApplianceId, Transition)> {
        let transitions = self.kitchen.tick(now);
        for (appliance, transition) in &transitions {
            let appliance = appliance.clone();
            let event = match transition {
                Transition::Completed(output) => KitchenEvent::ProcessingCompleted {
                    appliance,
                    output: output.item.clone(),
                    count: output.count,
                    at: now,
                },
                Transition::Burned => KitchenEvent::OutputBurned { appliance, at: now },
                Transition::Cleaned => KitchenEvent::CleaningFinished { appliance, at: now },
                Transition::Emptied { discarded } => KitchenEvent::TrashEmptied {
                    appliance,
                    discarded: *discarded,
                    at: now,
                },
                Transition::Repaired => KitchenEvent::RepairFinished { appliance, at: now },
            };
            self.events.record(event);
        }

        for (index, plate) in self.plates.iter_mut().enumerate() {
            if plate.tick(now) {
                self.events.record(KitchenEvent::PlateWashed { plate: index, at: now });
            }
        }
        transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appliance::ApplianceStatus;
    use crate::event::EventKind;
    use crate::item::{ItemKind, OutputItem};
    use crate::test_utils::*;

    #[test]
    fn new_state_uses_config() {
        let state = test_state();
        assert_eq!(state.money, 100);
        assert_eq!(state.plates.len(), 3);
        assert!(state.plates.iter().all(Plate::is_empty));
        assert_eq!(state.seasonings.count("salt"), 100);
        assert_eq!(state.kitchen.len(), 4);
    }

    #[test]
    fn unknown_appliance_is_an_error() {
        let mut state = test_state();
        assert_eq!(
            state.appliance_mut("oven").unwrap_err(),
            StateError::UnknownAppliance(ApplianceId::from("oven"))
        );
    }

    #[test]
    fn spend_is_all_or_nothing() {
        let mut state = test_state();
        state.money = 8;
        assert_eq!(
            state.spend(10),
            Err(Rejection::InsufficientFunds {
                needed: 10,
                available: 8
            })
        );
        assert_eq!(state.money, 8);
        state.spend(8).unwrap();
        assert_eq!(state.money, 0);
    }

    #[test]
    fn tick_records_completion() {
        let mut state = test_state();
        let wok = state.appliance_mut("wok").unwrap();
        wok.add_item(seasoning_slot("salt")).unwrap();
        wok.start_processing(500, OutputItem::new("unknown", ItemKind::Dish, 1), 0)
            .unwrap();

        assert!(state.tick(250).is_empty());
        let transitions = state.tick(500);
        assert_eq!(transitions.len(), 1);
        assert_eq!(state.appliance("wok").unwrap().status(), ApplianceStatus::Done);

        let events = state.events.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::ProcessingCompleted);
    }

    #[test]
    fn reset_restores_fresh_state() {
        let mut state = test_state();
        state.money = 3;
        state.inventory.set("egg", 9);
        state.appliance_mut("wok").unwrap().add_item(raw_slot("egg", 3)).unwrap();
        state.reset();
        assert_eq!(state.money, 100);
        assert_eq!(state.inventory.count("egg"), 0);
        assert_eq!(state.appliance("wok").unwrap().status(), ApplianceStatus::Idle);
    }
}

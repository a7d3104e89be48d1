//! Optional automation loop.
//!
//! [`AutoCook`] plays the kitchen the way a player would, using the same
//! staging and cooking operations and therefore the same capacity and
//! status checks. Each tick performs at most one action, in priority order:
//!
//! 1. wash the first dirty plate,
//! 2. drain the first finished appliance (prepared output to the shelf,
//!    dishes onto an empty plate and to a customer),
//! 3. advance one customer's recipe plan by one step.

use crate::appliance::ApplianceStatus;
use crate::catalog::{Catalog, RecipeStep};
use crate::customer::{CustomerStatus, FrontOfHouse};
use crate::id::*;
use crate::item::{ItemKind, SlotItem};
use crate::notify::Notifier;
use crate::plate::PlateStatus;
use crate::state::{GameState, StateError};
use crate::time::Millis;
use std::collections::HashMap;

/// What one automation tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoAction {
    WashedPlate(usize),
    /// A prepared batch moved to the shelf.
    Shelved {
        appliance: ApplianceId,
        item: ItemId,
        count: u32,
    },
    /// A dish was plated; `served` names the customer who took it.
    Plated {
        appliance: ApplianceId,
        plate: usize,
        dish: ItemId,
        served: Option<CustomerId>,
    },
    /// A cook that matched nothing was thrown away.
    Discarded { appliance: ApplianceId },
    /// Step `step` of `customer`'s plan was started on `appliance`.
    Step {
        customer: CustomerId,
        appliance: ApplianceId,
        step: usize,
    },
}

#[derive(Debug, Clone)]
struct Task {
    steps: Vec<RecipeStep>,
    next: usize,
}

/// Per-customer recipe plans plus which appliance is working for whom.
#[derive(Debug, Clone)]
pub struct AutoCook {
    enabled: bool,
    tasks: HashMap<CustomerId, Task>,
    assignments: HashMap<ApplianceId, CustomerId>,
}

impl Default for AutoCook {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoCook {
    /// Enabled, with no plans yet.
    pub fn new() -> Self {
        Self {
            enabled: true,
            tasks: HashMap::new(),
            assignments: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning automation off forgets every plan.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.tasks.clear();
            self.assignments.clear();
        }
        tracing::info!(enabled, "automation toggled");
    }

    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Index of the next step in `customer`'s plan, if one exists.
    pub fn next_step(&self, customer: CustomerId) -> Option<usize> {
        self.tasks.get(&customer).map(|t| t.next)
    }

    pub fn assigned_to(&self, appliance: &str) -> Option<CustomerId> {
        self.assignments.get(appliance).copied()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    pub fn tick(
        &mut self,
        state: &mut GameState,
        front: &mut dyn FrontOfHouse,
        now: Millis,
        notifier: &mut dyn Notifier,
    ) -> Option<AutoAction> {
        if !self.enabled {
            return None;
        }
        self.forget_departed(front);

        if let Some(action) = self.wash_dirty_plate(state, now) {
            return Some(action);
        }
        if let Some(action) = self.drain_finished(state, front, now, notifier) {
            return Some(action);
        }
        self.advance_plans(state, front, now, notifier)
    }

    fn forget_departed(&mut self, front: &dyn FrontOfHouse) {
        let present: Vec<CustomerId> = front.orders().iter().map(|o| o.id).collect();
        self.tasks.retain(|id, _| present.contains(id));
        self.assignments.retain(|_, id| present.contains(id));
    }

    fn wash_dirty_plate(&self, state: &mut GameState, now: Millis) -> Option<AutoAction> {
        let index = state
            .plates
            .iter()
            .position(|p| p.status == PlateStatus::Dirty)?;
        state.wash_plate(index, now).ok()?;
        Some(AutoAction::WashedPlate(index))
    }

    fn drain_finished(
        &mut self,
        state: &mut GameState,
        front: &mut dyn FrontOfHouse,
        now: Millis,
        notifier: &mut dyn Notifier,
    ) -> Option<AutoAction> {
        let finished: Vec<(ApplianceId, ItemId, ItemKind)> = state
            .kitchen
            .iter()
            .filter(|a| a.status() == ApplianceStatus::Done)
            .filter_map(|a| a.output().map(|o| (a.id().clone(), o.item.clone(), o.kind)))
            .collect();

        for (appliance, item, kind) in finished {
            if kind == ItemKind::Prepared {
                let output = state.appliance_mut(appliance.as_str()).ok()?.collect_output().ok()?;
                state.prepared.push_many(&output.item, output.count);
                self.assignments.remove(&appliance);
                return Some(AutoAction::Shelved {
                    appliance,
                    item: output.item,
                    count: output.count,
                });
            }

            if state.catalog().dish(item.as_str()).is_none() {
                state.appliance_mut(appliance.as_str()).ok()?.collect_output().ok()?;
                self.assignments.remove(&appliance);
                tracing::debug!(%appliance, "failed cook discarded");
                return Some(AutoAction::Discarded { appliance });
            }

            let Some(plate) = state.plates.iter().position(|p| p.is_empty()) else {
                continue;
            };
            let unit = state.appliance_mut(appliance.as_str()).ok()?.take_one_output().ok()?;
            state.plate_mut(plate).ok()?.put_dish(unit.item).ok()?;
            let owner = self.assignments.remove(&appliance);

            let customer = owner
                .and_then(|id| front.orders().iter().position(|o| o.id == id))
                .or_else(|| {
                    front
                        .orders()
                        .iter()
                        .position(|o| o.is_waiting() && o.dish == item)
                });
            let mut served = None;
            if let Some(index) = customer {
                let id = front.orders()[index].id;
                if state.serve_plate(plate, index, front, now, notifier).is_ok() {
                    self.tasks.remove(&id);
                    served = Some(id);
                }
            }
            return Some(AutoAction::Plated {
                appliance,
                plate,
                dish: item,
                served,
            });
        }
        None
    }

    fn advance_plans(
        &mut self,
        state: &mut GameState,
        front: &mut dyn FrontOfHouse,
        now: Millis,
        notifier: &mut dyn Notifier,
    ) -> Option<AutoAction> {
        if !front.is_shop_open() {
            return None;
        }
        let catalog = state.shared_catalog();
        let orders: Vec<_> = front
            .orders()
            .iter()
            .map(|o| (o.id, o.dish.clone(), o.status))
            .collect();

        for (customer, dish, status) in orders {
            if matches!(status, CustomerStatus::Eating { .. }) {
                self.tasks.remove(&customer);
                continue;
            }
            if !self.tasks.contains_key(&customer) {
                let Some(steps) = catalog.recipe_steps(dish.as_str()) else {
                    continue;
                };
                self.tasks.insert(
                    customer,
                    Task {
                        steps: steps.to_vec(),
                        next: 0,
                    },
                );
            }
            let Some(task) = self.tasks.get(&customer) else {
                continue;
            };
            let Some(step) = task.steps.get(task.next).cloned() else {
                continue;
            };

            let appliance = step.appliance().clone();
            let idle = state
                .kitchen
                .get(appliance.as_str())
                .is_some_and(|a| a.status() == ApplianceStatus::Idle && a.disruption().is_none());
            if !idle || !has_inputs(state, &step) {
                continue;
            }

            match execute_step(state, &catalog, &step, &*front, now, notifier) {
                Ok(()) => {
                    let index = task.next;
                    if let Some(task) = self.tasks.get_mut(&customer) {
                        task.next += 1;
                    }
                    self.assignments.insert(appliance.clone(), customer);
                    tracing::debug!(%customer, %appliance, step = index, "automation step started");
                    return Some(AutoAction::Step {
                        customer,
                        appliance,
                        step: index,
                    });
                }
                Err(err) => {
                    tracing::warn!(%err, %customer, %appliance, "automation step failed");
                }
            }
        }
        None
    }
}

/// Inputs of `step` with repeated items merged, in plan order.
fn required_inputs(step: &RecipeStep) -> Vec<(ItemKind, &ItemId, u32)> {
    let mut needs: Vec<(ItemKind, &ItemId, u32)> = Vec::new();
    for input in step.inputs() {
        match needs
            .iter_mut()
            .find(|(kind, item, _)| *kind == input.kind && *item == &input.item)
        {
            Some((_, _, count)) => *count += input.count,
            None => needs.push((input.kind, &input.item, input.count)),
        }
    }
    needs
}

fn in_stock(state: &GameState, kind: ItemKind, item: &str, count: u32) -> bool {
    match kind {
        ItemKind::Raw => state.inventory.has(item, count),
        ItemKind::Prepared => state.prepared.count(item) >= count,
        ItemKind::Seasoning => state.seasonings.has(item, count),
        ItemKind::Dish => false,
    }
}

/// Whether the summed inputs of `step` are in stock right now.
fn has_inputs(state: &GameState, step: &RecipeStep) -> bool {
    required_inputs(step)
        .into_iter()
        .all(|(kind, item, count)| in_stock(state, kind, item.as_str(), count))
}

/// Stage every input and start the appliance. Nothing is staged or taken
/// unless the whole step is in stock; a rejected insert restores the
/// appliance.
fn execute_step(
    state: &mut GameState,
    catalog: &Catalog,
    step: &RecipeStep,
    front: &dyn FrontOfHouse,
    now: Millis,
    notifier: &mut dyn Notifier,
) -> Result<(), StateError> {
    let needs = required_inputs(step);
    if let Some(&(_, item, _)) = needs
        .iter()
        .find(|&&(kind, item, count)| !in_stock(state, kind, item.as_str(), count))
    {
        return Err(StateError::OutOfStock(item.clone()));
    }

    let appliance_id = step.appliance().as_str();
    let appliance = state.appliance_mut(appliance_id)?;
    let snapshot = appliance.clone();
    for &(kind, item, count) in &needs {
        let max_stack = catalog.max_stack(item.as_str()).max(count);
        if let Err(rejection) = appliance.add_item(SlotItem::new(item.clone(), kind, count, max_stack)) {
            *appliance = snapshot;
            return Err(rejection.into());
        }
    }

    for (kind, item, count) in needs {
        let item = item.as_str();
        let taken = match kind {
            ItemKind::Raw => state.inventory.try_take(item, count),
            ItemKind::Seasoning => state.seasonings.try_take(item, count),
            ItemKind::Prepared => state.prepared.take_many(item, count),
            ItemKind::Dish => false,
        };
        if !taken {
            *state.appliance_mut(appliance_id)? = snapshot;
            return Err(StateError::OutOfStock(ItemId::from(item)));
        }
    }

    state.start_cooking(appliance_id, now, front, notifier)?;
    Ok(())
}

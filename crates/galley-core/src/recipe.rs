//! Recipe matching.
//!
//! Pure functions over slot contents. A dish matches when the appliance
//! holds exactly the recipe's component set, each in at least the required
//! quantity; the scarcest component decides how many dishes one cook yields.
//! A lone raw or prepared stack with a declared transformation on this
//! appliance falls back to prepared-item production. Anything else cooks
//! into the `unknown` sentinel.

use crate::catalog::{Catalog, DishDef};
use crate::config::KitchenConfig;
use crate::id::*;
use crate::item::{ItemKind, OutputItem, SlotItem};
use crate::time::Millis;
use std::collections::BTreeMap;

/// Output id of a cook that matched nothing.
pub const UNKNOWN_DISH_ID: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DishMatch<'a> {
    pub dish: &'a DishDef,
    /// Number of dishes the contents are enough for. At least 1.
    pub multiplier: u32,
}

/// Sum of slot counts per `(kind, id)`.
fn tally<'s>(slots: impl IntoIterator<Item = &'s SlotItem>) -> BTreeMap<(ItemKind, &'s str), u32> {
    let mut have = BTreeMap::new();
    for slot in slots {
        *have.entry((slot.kind, slot.item.as_str())).or_insert(0) += slot.count;
    }
    have
}

/// First dish for `appliance`, in declaration order, whose component set
/// equals the staged one and whose quantities are all met.
pub fn match_dish<'a>(catalog: &'a Catalog, slots: &[SlotItem], appliance: &str) -> Option<DishMatch<'a>> {
    if slots.is_empty() {
        return None;
    }
    let have = tally(slots);

    catalog
        .dishes()
        .iter()
        .filter(|dish| dish.appliance == appliance)
        .find_map(|dish| {
            let mut required: BTreeMap<(ItemKind, &str), u32> = BTreeMap::new();
            for component in &dish.recipe {
                *required
                    .entry((component.kind, component.item.as_str()))
                    .or_insert(0) += component.count;
            }
            if required.len() != have.len() {
                return None;
            }
            let mut multiplier = u32::MAX;
            for (key, &need) in &required {
                let &got = have.get(key)?;
                if need == 0 || got < need {
                    return None;
                }
                multiplier = multiplier.min(got / need);
            }
            Some(DishMatch { dish, multiplier })
        })
}

/// `base * (1 + (multiplier - 1) * factor)`, rounded. Single batches keep
/// the base time.
pub fn scaled_process_time(base: Millis, multiplier: u32, factor: f64) -> Millis {
    if multiplier <= 1 {
        return base;
    }
    (base as f64 * (1.0 + (multiplier - 1) as f64 * factor)).round() as Millis
}

/// What a cook resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookOutcome {
    Dish { dish: ItemId, multiplier: u32 },
    Prepared { item: ItemId, count: u32 },
    Failed,
}

/// A fully resolved cook: the output to store at start time and how long
/// it takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookPlan {
    pub output: OutputItem,
    pub process_time: Millis,
    pub outcome: CookOutcome,
}

impl CookPlan {
    pub fn is_failure(&self) -> bool {
        self.outcome == CookOutcome::Failed
    }
}

/// Resolve the contents of `appliance` into a cook plan.
pub fn plan_cook(catalog: &Catalog, config: &KitchenConfig, slots: &[SlotItem], appliance: &str) -> CookPlan {
    if let Some(found) = match_dish(catalog, slots, appliance) {
        let base = found.dish.cook_time.unwrap_or(config.default_cook_time);
        return CookPlan {
            output: OutputItem::new(found.dish.id.clone(), ItemKind::Dish, found.multiplier),
            process_time: scaled_process_time(base, found.multiplier, config.batch_time_factor),
            outcome: CookOutcome::Dish {
                dish: found.dish.id.clone(),
                multiplier: found.multiplier,
            },
        };
    }

    if let [slot] = slots
        && matches!(slot.kind, ItemKind::Raw | ItemKind::Prepared)
        && let Some(prepared) = catalog.prepared_for(slot.item.as_str(), appliance)
    {
        let base = prepared.process_time.unwrap_or(config.default_prepare_time);
        return CookPlan {
            output: OutputItem::new(prepared.id.clone(), ItemKind::Prepared, slot.count),
            process_time: scaled_process_time(base, slot.count, config.batch_time_factor),
            outcome: CookOutcome::Prepared {
                item: prepared.id.clone(),
                count: slot.count,
            },
        };
    }

    CookPlan {
        output: OutputItem::new(UNKNOWN_DISH_ID, ItemKind::Dish, 1),
        process_time: config.failed_cook_time,
        outcome: CookOutcome::Failed,
    }
}

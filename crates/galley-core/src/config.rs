//! Tunable kitchen constants.
//!
//! Every field has a default, so a partial `config.{ron,toml,json}` (see
//! `galley-data`) only overrides what it names.

use crate::time::Millis;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    /// Cadence of appliance and plate timers.
    pub tick_interval: Millis,
    /// Cadence of the automation loop.
    pub automation_interval: Millis,
    /// Cadence of the customer patience countdown.
    pub patience_interval: Millis,

    /// Dish cook time when the catalog entry has none.
    pub default_cook_time: Millis,
    /// Prepared-item process time when the catalog entry has none.
    pub default_prepare_time: Millis,
    /// Process time of a cook that matched nothing.
    pub failed_cook_time: Millis,
    /// Extra fraction of base time per additional batched unit.
    pub batch_time_factor: f64,

    pub default_trash_capacity: u32,
    pub default_clean_time: Millis,

    pub repair_time: Millis,
    pub repair_cost_base: u32,
    pub repair_cost_per_level: u32,

    pub plate_count: usize,
    pub wash_time: Millis,

    pub starting_money: u32,
    /// Ring-buffer size of the event log.
    pub event_capacity: usize,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            tick_interval: 100,
            automation_interval: 500,
            patience_interval: 1000,
            default_cook_time: 4000,
            default_prepare_time: 2000,
            failed_cook_time: 4000,
            batch_time_factor: 0.4,
            default_trash_capacity: 20,
            default_clean_time: 3000,
            repair_time: 3000,
            repair_cost_base: 10,
            repair_cost_per_level: 5,
            plate_count: 3,
            wash_time: 2000,
            starting_money: 100,
            event_capacity: 256,
        }
    }
}

impl KitchenConfig {
    /// Repair price for an appliance of the given upgrade level (1-based).
    pub fn repair_cost(&self, level: u32) -> u32 {
        self.repair_cost_base + self.repair_cost_per_level * level.saturating_sub(1)
    }
}

use crate::appliance::{Appliance, Transition};
use crate::catalog::Catalog;
use crate::config::KitchenConfig;
use crate::id::*;
use crate::time::Millis;
use std::collections::HashMap;

/// Every placed appliance, kept in catalog declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Kitchen {
    appliances: Vec<Appliance>,
    index: HashMap<ApplianceId, usize>,
}

impl Kitchen {
    /// One idle appliance per catalog entry. Zero clean times fall back to
    /// the configured default.
    pub fn from_catalog(catalog: &Catalog, config: &KitchenConfig) -> Self {
        let appliances: Vec<Appliance> = catalog
            .appliances()
            .iter()
            .map(|def| {
                let mut def = def.clone();
                if def.clean_time == 0 {
                    def.clean_time = config.default_clean_time;
                }
                Appliance::new(def)
            })
            .collect();
        let index = appliances
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id().clone(), i))
            .collect();
        Self { appliances, index }
    }

    pub fn get(&self, id: &str) -> Option<&Appliance> {
        self.index.get(id).map(|&i| &self.appliances[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Appliance> {
        self.index.get(id).map(|&i| &mut self.appliances[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Appliance> {
        self.appliances.iter()
    }

    pub fn len(&self) -> usize {
        self.appliances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appliances.is_empty()
    }

    /// Advance every appliance in declaration order.
    pub fn tick(&mut self, now: Millis) -> Vec<(ApplianceId, Transition)> {
        self.appliances
            .iter_mut()
            .filter_map(|a| a.tick(now).map(|t| (a.id().clone(), t)))
            .collect()
    }
}

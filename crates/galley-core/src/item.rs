use crate::id::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The four item families the kitchen moves around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Raw ingredient from the pantry stock.
    #[serde(alias = "ingredient")]
    Raw,
    /// Intermediate product of a single-ingredient step.
    Prepared,
    Seasoning,
    /// Finished, sellable product. Must be plated, never shelved.
    #[serde(alias = "finished_dish")]
    Dish,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Raw => "raw",
            ItemKind::Prepared => "prepared",
            ItemKind::Seasoning => "seasoning",
            ItemKind::Dish => "dish",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Appliance contents
// ---------------------------------------------------------------------------

/// One stack of a single item inside an appliance.
///
/// Invariant: `1 <= count <= max_stack`. Constructors clamp to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotItem {
    pub item: ItemId,
    pub kind: ItemKind,
    pub count: u32,
    pub max_stack: u32,
}

impl SlotItem {
    pub fn new(item: impl Into<ItemId>, kind: ItemKind, count: u32, max_stack: u32) -> Self {
        let count = count.max(1);
        Self {
            item: item.into(),
            kind,
            count,
            max_stack: max_stack.max(count),
        }
    }

    /// A single unit of `item`.
    pub fn single(item: impl Into<ItemId>, kind: ItemKind, max_stack: u32) -> Self {
        Self::new(item, kind, 1, max_stack)
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.max_stack
    }

    /// Room left before the stack limit.
    pub fn room(&self) -> u32 {
        self.max_stack.saturating_sub(self.count)
    }
}

/// The product of a finished processing cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputItem {
    pub item: ItemId,
    pub kind: ItemKind,
    pub count: u32,
}

impl OutputItem {
    pub fn new(item: impl Into<ItemId>, kind: ItemKind, count: u32) -> Self {
        Self {
            item: item.into(),
            kind,
            count: count.max(1),
        }
    }

    /// Re-stage the whole batch as one slot; the batch size becomes its
    /// stack limit so it moves as a unit.
    pub fn into_slot(self) -> SlotItem {
        SlotItem {
            item: self.item,
            kind: self.kind,
            count: self.count,
            max_stack: self.count,
        }
    }
}

// ---------------------------------------------------------------------------
// Stock
// ---------------------------------------------------------------------------

/// Fungible per-item counts: raw ingredient stock or seasoning amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    counts: BTreeMap<ItemId, u32>,
}

impl Stock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, item: &str) -> u32 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    pub fn has(&self, item: &str, quantity: u32) -> bool {
        self.count(item) >= quantity
    }

    pub fn add(&mut self, item: &ItemId, quantity: u32) {
        *self.counts.entry(item.clone()).or_insert(0) += quantity;
    }

    pub fn set(&mut self, item: impl Into<ItemId>, quantity: u32) {
        self.counts.insert(item.into(), quantity);
    }

    /// Remove exactly `quantity` units. All or nothing.
    #[must_use = "false means the stock was too low and nothing was taken"]
    pub fn try_take(&mut self, item: &str, quantity: u32) -> bool {
        match self.counts.get_mut(item) {
            Some(count) if *count >= quantity => {
                *count -= quantity;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u32)> {
        self.counts.iter().map(|(id, &n)| (id, n))
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

impl<I: Into<ItemId>> FromIterator<(I, u32)> for Stock {
    fn from_iter<T: IntoIterator<Item = (I, u32)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().map(|(id, n)| (id.into(), n)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Prepared shelf
// ---------------------------------------------------------------------------

/// The prepared-items pool. Ordered; each entry is one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedShelf {
    items: Vec<ItemId>,
}

impl PreparedShelf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ItemId) {
        self.items.push(item);
    }

    /// Push `count` units of `item`.
    pub fn push_many(&mut self, item: &ItemId, count: u32) {
        for _ in 0..count {
            self.items.push(item.clone());
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    pub fn count(&self, item: &str) -> u32 {
        self.items.iter().filter(|i| *i == item).count() as u32
    }

    /// Remove the first unit of `item`.
    #[must_use = "false means the shelf held no such item"]
    pub fn try_take(&mut self, item: &str) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove `count` units of `item`, or nothing when fewer are shelved.
    pub fn take_many(&mut self, item: &str, count: u32) -> bool {
        if self.count(item) < count {
            return false;
        }
        for _ in 0..count {
            self.try_take(item);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

use crate::id::*;
use crate::item::ItemKind;
use crate::time::Millis;
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Whether an appliance cooks or only swallows discarded items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplianceKind {
    Normal,
    Trash,
}

/// An appliance definition in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplianceDef {
    pub id: ApplianceId,
    pub name: String,
    pub kind: ApplianceKind,
    /// Number of distinct slots; for trash bins, the number of discarded units.
    pub capacity: u32,
    pub process_time: Millis,
    /// Time a finished output survives before burning. 0 never burns.
    pub burn_time: Millis,
    pub clean_time: Millis,
    pub price: u32,
    /// Upgrade level, 1-based. Drives repair cost.
    pub level: u32,
}

impl ApplianceDef {
    pub fn new(id: impl Into<ApplianceId>, kind: ApplianceKind, capacity: u32) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            kind,
            capacity,
            process_time: 0,
            burn_time: 0,
            clean_time: 0,
            price: 0,
            level: 1,
        }
    }

    pub fn is_trash(&self) -> bool {
        self.kind == ApplianceKind::Trash
    }
}

/// A raw ingredient bought into stock.
#[derive(Debug, Clone, PartialEq)]
pub struct RawIngredientDef {
    pub id: ItemId,
    pub name: String,
    pub price: u32,
    pub max_stack: u32,
    /// Empty means any appliance.
    pub allowed_appliances: Vec<ApplianceId>,
}

/// A single-ingredient transformation: `source` on `appliance` yields `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDef {
    pub id: ItemId,
    pub name: String,
    pub source: ItemId,
    pub appliance: ApplianceId,
    pub process_time: Option<Millis>,
    pub max_stack: u32,
    pub allowed_appliances: Vec<ApplianceId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasoningDef {
    pub id: ItemId,
    pub name: String,
    pub price: u32,
    pub max_amount: u32,
    pub max_stack: u32,
}

/// One entry of a dish recipe: `count` units of `item` per output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeComponent {
    pub kind: ItemKind,
    pub item: ItemId,
    pub count: u32,
}

impl RecipeComponent {
    pub fn new(kind: ItemKind, item: impl Into<ItemId>, count: u32) -> Self {
        Self {
            kind,
            item: item.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DishDef {
    pub id: ItemId,
    pub name: String,
    pub price: u32,
    pub cook_time: Option<Millis>,
    pub appliance: ApplianceId,
    pub recipe: Vec<RecipeComponent>,
}

/// One step of a dish's production plan, used by the automation loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeStep {
    /// Put one unit of `input` on `appliance` and process it into `output`.
    Prepare {
        input: RecipeComponent,
        appliance: ApplianceId,
        output: ItemId,
    },
    /// Stage every input on `appliance` and cook them into `output`.
    Cook {
        inputs: Vec<RecipeComponent>,
        appliance: ApplianceId,
        output: ItemId,
    },
}

impl RecipeStep {
    pub fn appliance(&self) -> &ApplianceId {
        match self {
            RecipeStep::Prepare { appliance, .. } | RecipeStep::Cook { appliance, .. } => appliance,
        }
    }

    pub fn output(&self) -> &ItemId {
        match self {
            RecipeStep::Prepare { output, .. } | RecipeStep::Cook { output, .. } => output,
        }
    }

    pub fn inputs(&self) -> &[RecipeComponent] {
        match self {
            RecipeStep::Prepare { input, .. } => std::slice::from_ref(input),
            RecipeStep::Cook { inputs, .. } => inputs,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate {kind} id '{id}'")]
    Duplicate { kind: &'static str, id: String },
    #[error("appliance '{0}' has zero capacity")]
    ZeroCapacity(ApplianceId),
    #[error("'{referenced_by}' references unknown appliance '{appliance}'")]
    UnknownAppliance {
        referenced_by: String,
        appliance: ApplianceId,
    },
    #[error("'{referenced_by}' references unknown item '{item}'")]
    UnknownItem { referenced_by: String, item: ItemId },
    #[error("'{referenced_by}' expects '{item}' to be {expected}, but it is {found}")]
    KindMismatch {
        referenced_by: String,
        item: ItemId,
        expected: ItemKind,
        found: ItemKind,
    },
    #[error("'{referenced_by}' needs a positive quantity of '{item}'")]
    ZeroQuantity { referenced_by: String, item: ItemId },
    #[error("dish '{0}' has an empty recipe")]
    EmptyRecipe(ItemId),
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`Catalog`].
/// Three-phase lifecycle: registration -> mutation -> finalization.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    appliances: Vec<ApplianceDef>,
    raw: Vec<RawIngredientDef>,
    prepared: Vec<PreparedDef>,
    seasonings: Vec<SeasoningDef>,
    dishes: Vec<DishDef>,
    steps: Vec<(ItemId, Vec<RecipeStep>)>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: Register an appliance. Declaration order is tick order.
    pub fn register_appliance(&mut self, def: ApplianceDef) {
        self.appliances.push(def);
    }

    pub fn register_raw(&mut self, def: RawIngredientDef) {
        self.raw.push(def);
    }

    pub fn register_prepared(&mut self, def: PreparedDef) {
        self.prepared.push(def);
    }

    pub fn register_seasoning(&mut self, def: SeasoningDef) {
        self.seasonings.push(def);
    }

    /// Phase 1: Register a dish. Declaration order is match priority.
    pub fn register_dish(&mut self, def: DishDef) {
        self.dishes.push(def);
    }

    /// Phase 1: Attach an automation plan to a dish. Replaces any earlier plan.
    pub fn set_recipe_steps(&mut self, dish: impl Into<ItemId>, steps: Vec<RecipeStep>) {
        let dish = dish.into();
        self.steps.retain(|(d, _)| *d != dish);
        self.steps.push((dish, steps));
    }

    /// Phase 2: Mutate an existing dish by id.
    pub fn mutate_dish<F>(&mut self, id: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut DishDef),
    {
        let dish = self
            .dishes
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        f(dish);
        Ok(())
    }

    /// Phase 2: Mutate an existing appliance by id.
    pub fn mutate_appliance<F>(&mut self, id: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut ApplianceDef),
    {
        let appliance = self
            .appliances
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        f(appliance);
        Ok(())
    }

    /// Phase 3: Validate every cross-reference and freeze the catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut appliance_index = HashMap::new();
        for (i, def) in self.appliances.iter().enumerate() {
            if appliance_index.insert(def.id.clone(), i).is_some() {
                return Err(CatalogError::Duplicate {
                    kind: "appliance",
                    id: def.id.to_string(),
                });
            }
            if def.capacity == 0 {
                return Err(CatalogError::ZeroCapacity(def.id.clone()));
            }
        }

        let mut items: HashMap<ItemId, ItemEntry> = HashMap::new();
        let tables = [
            (ItemKind::Raw, self.raw.iter().map(|d| &d.id).collect::<Vec<_>>()),
            (ItemKind::Prepared, self.prepared.iter().map(|d| &d.id).collect()),
            (ItemKind::Seasoning, self.seasonings.iter().map(|d| &d.id).collect()),
            (ItemKind::Dish, self.dishes.iter().map(|d| &d.id).collect()),
        ];
        for (kind, ids) in tables {
            for (index, id) in ids.into_iter().enumerate() {
                if items.insert(id.clone(), ItemEntry { kind, index }).is_some() {
                    return Err(CatalogError::Duplicate {
                        kind: "item",
                        id: id.to_string(),
                    });
                }
            }
        }

        let check_appliance = |referenced_by: &ItemId,
                               appliance: &ApplianceId|
         -> Result<(), CatalogError> {
            if appliance_index.contains_key(appliance) {
                Ok(())
            } else {
                Err(CatalogError::UnknownAppliance {
                    referenced_by: referenced_by.to_string(),
                    appliance: appliance.clone(),
                })
            }
        };
        let check_item = |referenced_by: &ItemId,
                          item: &ItemId,
                          expected: &[ItemKind]|
         -> Result<(), CatalogError> {
            let entry = items.get(item).ok_or_else(|| CatalogError::UnknownItem {
                referenced_by: referenced_by.to_string(),
                item: item.clone(),
            })?;
            if expected.contains(&entry.kind) {
                Ok(())
            } else {
                Err(CatalogError::KindMismatch {
                    referenced_by: referenced_by.to_string(),
                    item: item.clone(),
                    expected: expected[0],
                    found: entry.kind,
                })
            }
        };
        let check_component = |referenced_by: &ItemId,
                               component: &RecipeComponent|
         -> Result<(), CatalogError> {
            check_item(referenced_by, &component.item, &[component.kind])?;
            if component.count == 0 {
                return Err(CatalogError::ZeroQuantity {
                    referenced_by: referenced_by.to_string(),
                    item: component.item.clone(),
                });
            }
            Ok(())
        };

        for raw in &self.raw {
            for appliance in &raw.allowed_appliances {
                check_appliance(&raw.id, appliance)?;
            }
        }
        for prepared in &self.prepared {
            check_appliance(&prepared.id, &prepared.appliance)?;
            check_item(
                &prepared.id,
                &prepared.source,
                &[ItemKind::Raw, ItemKind::Prepared],
            )?;
            for appliance in &prepared.allowed_appliances {
                check_appliance(&prepared.id, appliance)?;
            }
        }
        for dish in &self.dishes {
            check_appliance(&dish.id, &dish.appliance)?;
            if dish.recipe.is_empty() {
                return Err(CatalogError::EmptyRecipe(dish.id.clone()));
            }
            for component in &dish.recipe {
                check_component(&dish.id, component)?;
            }
        }
        for (dish, steps) in &self.steps {
            check_item(dish, dish, &[ItemKind::Dish])?;
            for step in steps {
                check_appliance(dish, step.appliance())?;
                for input in step.inputs() {
                    check_component(dish, input)?;
                }
                if !items.contains_key(step.output()) {
                    return Err(CatalogError::UnknownItem {
                        referenced_by: dish.to_string(),
                        item: step.output().clone(),
                    });
                }
            }
        }

        tracing::debug!(
            appliances = self.appliances.len(),
            items = items.len(),
            dishes = self.dishes.len(),
            "catalog built"
        );

        Ok(Catalog {
            appliances: self.appliances,
            appliance_index,
            raw: self.raw,
            prepared: self.prepared,
            seasonings: self.seasonings,
            dishes: self.dishes,
            items,
            steps: self.steps.into_iter().collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct ItemEntry {
    kind: ItemKind,
    index: usize,
}

/// Immutable catalog. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct Catalog {
    appliances: Vec<ApplianceDef>,
    appliance_index: HashMap<ApplianceId, usize>,
    raw: Vec<RawIngredientDef>,
    prepared: Vec<PreparedDef>,
    seasonings: Vec<SeasoningDef>,
    dishes: Vec<DishDef>,
    items: HashMap<ItemId, ItemEntry>,
    steps: HashMap<ItemId, Vec<RecipeStep>>,
}

impl Catalog {
    pub fn appliance(&self, id: &str) -> Option<&ApplianceDef> {
        self.appliance_index.get(id).map(|&i| &self.appliances[i])
    }

    /// All appliances in declaration order.
    pub fn appliances(&self) -> &[ApplianceDef] {
        &self.appliances
    }

    pub fn raw(&self, id: &str) -> Option<&RawIngredientDef> {
        self.entry(id, ItemKind::Raw).map(|i| &self.raw[i])
    }

    pub fn prepared(&self, id: &str) -> Option<&PreparedDef> {
        self.entry(id, ItemKind::Prepared).map(|i| &self.prepared[i])
    }

    pub fn seasoning(&self, id: &str) -> Option<&SeasoningDef> {
        self.entry(id, ItemKind::Seasoning).map(|i| &self.seasonings[i])
    }

    pub fn dish(&self, id: &str) -> Option<&DishDef> {
        self.entry(id, ItemKind::Dish).map(|i| &self.dishes[i])
    }

    pub fn raw_ingredients(&self) -> &[RawIngredientDef] {
        &self.raw
    }

    pub fn seasonings(&self) -> &[SeasoningDef] {
        &self.seasonings
    }

    /// All dishes in declaration order.
    pub fn dishes(&self) -> &[DishDef] {
        &self.dishes
    }

    pub fn kind_of(&self, id: &str) -> Option<ItemKind> {
        self.items.get(id).map(|e| e.kind)
    }

    /// Kind assigned to a processing output: prepared when the catalog
    /// declares it as such, dish otherwise (including unknown ids).
    pub fn output_kind(&self, id: &str) -> ItemKind {
        match self.kind_of(id) {
            Some(ItemKind::Prepared) => ItemKind::Prepared,
            _ => ItemKind::Dish,
        }
    }

    /// Stack limit inside an appliance slot. Unknown items and dishes do not stack.
    pub fn max_stack(&self, id: &str) -> u32 {
        let Some(entry) = self.items.get(id) else {
            return 1;
        };
        let max_stack = match entry.kind {
            ItemKind::Raw => self.raw[entry.index].max_stack,
            ItemKind::Prepared => self.prepared[entry.index].max_stack,
            ItemKind::Seasoning => self.seasonings[entry.index].max_stack,
            ItemKind::Dish => 1,
        };
        max_stack.max(1)
    }

    /// Appliances an item may be placed on. Empty means unrestricted.
    pub fn allowed_appliances(&self, id: &str) -> &[ApplianceId] {
        match self.items.get(id) {
            Some(ItemEntry {
                kind: ItemKind::Raw,
                index,
            }) => &self.raw[*index].allowed_appliances,
            Some(ItemEntry {
                kind: ItemKind::Prepared,
                index,
            }) => &self.prepared[*index].allowed_appliances,
            _ => &[],
        }
    }

    /// The single-ingredient transformation of `source` on `appliance`,
    /// first in declaration order.
    pub fn prepared_for(&self, source: &str, appliance: &str) -> Option<&PreparedDef> {
        self.prepared
            .iter()
            .find(|p| p.source == source && p.appliance == appliance)
    }

    pub fn recipe_steps(&self, dish: &str) -> Option<&[RecipeStep]> {
        self.steps.get(dish).map(Vec::as_slice)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Ids of every catalog item, in no particular order.
    pub fn item_ids(&self) -> HashSet<&ItemId> {
        self.items.keys().collect()
    }

    fn entry(&self, id: &str, kind: ItemKind) -> Option<usize> {
        self.items
            .get(id)
            .filter(|e| e.kind == kind)
            .map(|e| e.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn lookups_resolve_by_id_and_kind() {
        let catalog = test_catalog();
        assert_eq!(catalog.kind_of("vegetables"), Some(ItemKind::Raw));
        assert_eq!(catalog.kind_of("salt"), Some(ItemKind::Seasoning));
        assert!(catalog.raw("salt").is_none());
        assert_eq!(catalog.max_stack("vegetables"), 3);
        assert_eq!(catalog.max_stack("garlic_vegetables"), 1);
        assert_eq!(catalog.max_stack("mystery"), 1);
    }

    #[test]
    fn output_kind_defaults_to_dish() {
        let catalog = test_catalog();
        assert_eq!(catalog.output_kind("vegetables_chopped"), ItemKind::Prepared);
        assert_eq!(catalog.output_kind("garlic_vegetables"), ItemKind::Dish);
        assert_eq!(catalog.output_kind("unknown"), ItemKind::Dish);
    }

    #[test]
    fn prepared_for_matches_source_and_appliance() {
        let catalog = test_catalog();
        let chopped = catalog.prepared_for("vegetables", "cutting_board").unwrap();
        assert_eq!(chopped.id, "vegetables_chopped");
        assert!(catalog.prepared_for("vegetables", "wok").is_none());
    }

    #[test]
    fn allowed_appliances_empty_for_unrestricted() {
        let catalog = test_catalog();
        assert_eq!(catalog.allowed_appliances("vegetables"), &[ApplianceId::from("cutting_board")]);
        assert!(catalog.allowed_appliances("salt").is_empty());
    }

    #[test]
    fn appliances_keep_declaration_order() {
        let catalog = test_catalog();
        let ids: Vec<_> = catalog.appliances().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["cutting_board", "wok", "steamer", "trash_bin"]);
    }

    #[test]
    fn duplicate_item_rejected() {
        let mut builder = test_catalog_builder();
        builder.register_seasoning(SeasoningDef {
            id: ItemId::from("vegetables"),
            name: "dup".into(),
            price: 1,
            max_amount: 10,
            max_stack: 1,
        });
        assert!(matches!(
            builder.build(),
            Err(CatalogError::Duplicate { kind: "item", .. })
        ));
    }

    #[test]
    fn dangling_appliance_rejected() {
        let mut builder = test_catalog_builder();
        builder
            .mutate_dish("garlic_vegetables", |d| d.appliance = ApplianceId::from("oven"))
            .unwrap();
        assert!(matches!(
            builder.build(),
            Err(CatalogError::UnknownAppliance { .. })
        ));
    }

    #[test]
    fn recipe_kind_mismatch_rejected() {
        let mut builder = test_catalog_builder();
        builder
            .mutate_dish("garlic_vegetables", |d| d.recipe[0].kind = ItemKind::Raw)
            .unwrap();
        assert!(matches!(
            builder.build(),
            Err(CatalogError::KindMismatch { .. })
        ));
    }

    #[test]
    fn zero_capacity_rejected() {
        let mut builder = test_catalog_builder();
        builder.mutate_appliance("wok", |a| a.capacity = 0).unwrap();
        assert_eq!(
            builder.build().unwrap_err(),
            CatalogError::ZeroCapacity(ApplianceId::from("wok"))
        );
    }

    #[test]
    fn mutate_missing_is_not_found() {
        let mut builder = test_catalog_builder();
        let result = builder.mutate_dish("nope", |_| {});
        assert_eq!(result, Err(CatalogError::NotFound("nope".into())));
    }

    #[test]
    fn recipe_steps_attached_to_dish() {
        let catalog = test_catalog();
        let steps = catalog.recipe_steps("garlic_vegetables").unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2].appliance(), "wok");
        assert_eq!(steps[2].output(), "garlic_vegetables");
    }

    #[test]
    fn steps_for_unknown_dish_rejected() {
        let mut builder = test_catalog_builder();
        builder.set_recipe_steps("ghost_dish", Vec::new());
        assert!(matches!(
            builder.build(),
            Err(CatalogError::UnknownItem { .. })
        ));
    }
}

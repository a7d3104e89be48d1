//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::catalog::*;
use crate::config::KitchenConfig;
use crate::id::*;
use crate::item::{ItemKind, OutputItem, SlotItem};
use crate::state::GameState;
use crate::time::Millis;
use std::sync::Arc;

// ===========================================================================
// Definition constructors
// ===========================================================================

pub fn appliance(id: &str, capacity: u32, process_time: Millis, burn_time: Millis) -> ApplianceDef {
    ApplianceDef {
        process_time,
        burn_time,
        clean_time: 2000,
        ..ApplianceDef::new(id, ApplianceKind::Normal, capacity)
    }
}

pub fn trash_bin(id: &str, capacity: u32) -> ApplianceDef {
    ApplianceDef {
        clean_time: 3000,
        ..ApplianceDef::new(id, ApplianceKind::Trash, capacity)
    }
}

pub fn raw(id: &str, price: u32, max_stack: u32, allowed: &[&str]) -> RawIngredientDef {
    RawIngredientDef {
        id: ItemId::from(id),
        name: id.to_string(),
        price,
        max_stack,
        allowed_appliances: allowed.iter().map(|&a| ApplianceId::from(a)).collect(),
    }
}

pub fn prepared(
    id: &str,
    source: &str,
    appliance: &str,
    process_time: Option<Millis>,
    max_stack: u32,
    allowed: &[&str],
) -> PreparedDef {
    PreparedDef {
        id: ItemId::from(id),
        name: id.to_string(),
        source: ItemId::from(source),
        appliance: ApplianceId::from(appliance),
        process_time,
        max_stack,
        allowed_appliances: allowed.iter().map(|&a| ApplianceId::from(a)).collect(),
    }
}

pub fn seasoning(id: &str) -> SeasoningDef {
    SeasoningDef {
        id: ItemId::from(id),
        name: id.to_string(),
        price: 1,
        max_amount: 100,
        max_stack: 3,
    }
}

pub fn dish(id: &str, price: u32, appliance: &str, recipe: Vec<RecipeComponent>) -> DishDef {
    DishDef {
        id: ItemId::from(id),
        name: id.to_string(),
        price,
        cook_time: Some(3000),
        appliance: ApplianceId::from(appliance),
        recipe,
    }
}

fn prep_step(kind: ItemKind, input: &str, appliance: &str, output: &str) -> RecipeStep {
    RecipeStep::Prepare {
        input: RecipeComponent::new(kind, input, 1),
        appliance: ApplianceId::from(appliance),
        output: ItemId::from(output),
    }
}

// ===========================================================================
// Test catalog
// ===========================================================================

/// A small kitchen: cutting board, wok, steamer and a trash bin, with two
/// dishes that both finish on the wok.
pub fn test_catalog_builder() -> CatalogBuilder {
    let mut builder = CatalogBuilder::new();

    builder.register_appliance(appliance("cutting_board", 1, 3000, 0));
    builder.register_appliance(ApplianceDef {
        clean_time: 3000,
        ..appliance("wok", 4, 4000, 5000)
    });
    builder.register_appliance(appliance("steamer", 4, 6000, 8000));
    builder.register_appliance(trash_bin("trash_bin", 20));

    builder.register_raw(raw("vegetables", 5, 3, &["cutting_board"]));
    builder.register_raw(raw("garlic", 2, 5, &["cutting_board"]));
    builder.register_raw(raw("egg", 3, 3, &["wok"]));
    builder.register_raw(raw("tomato", 6, 2, &["cutting_board"]));

    builder.register_prepared(prepared(
        "vegetables_chopped",
        "vegetables",
        "cutting_board",
        Some(2000),
        3,
        &["wok", "steamer"],
    ));
    builder.register_prepared(prepared(
        "garlic_chopped",
        "garlic",
        "cutting_board",
        Some(1500),
        5,
        &["wok"],
    ));
    builder.register_prepared(prepared("egg_fried", "egg", "wok", Some(2500), 2, &["wok"]));
    builder.register_prepared(prepared(
        "tomato_chopped",
        "tomato",
        "cutting_board",
        Some(2000),
        2,
        &["wok"],
    ));
    builder.register_prepared(prepared(
        "tomato_fried",
        "tomato_chopped",
        "wok",
        Some(2500),
        2,
        &["wok"],
    ));

    builder.register_seasoning(seasoning("salt"));
    builder.register_seasoning(seasoning("sugar"));

    builder.register_dish(dish(
        "garlic_vegetables",
        15,
        "wok",
        vec![
            RecipeComponent::new(ItemKind::Prepared, "vegetables_chopped", 1),
            RecipeComponent::new(ItemKind::Prepared, "garlic_chopped", 1),
            RecipeComponent::new(ItemKind::Seasoning, "salt", 1),
        ],
    ));
    builder.register_dish(dish(
        "tomato_egg",
        18,
        "wok",
        vec![
            RecipeComponent::new(ItemKind::Prepared, "tomato_fried", 1),
            RecipeComponent::new(ItemKind::Prepared, "egg_fried", 1),
            RecipeComponent::new(ItemKind::Seasoning, "salt", 1),
        ],
    ));

    builder.set_recipe_steps(
        "garlic_vegetables",
        vec![
            prep_step(ItemKind::Raw, "vegetables", "cutting_board", "vegetables_chopped"),
            prep_step(ItemKind::Raw, "garlic", "cutting_board", "garlic_chopped"),
            RecipeStep::Cook {
                inputs: vec![
                    RecipeComponent::new(ItemKind::Prepared, "vegetables_chopped", 1),
                    RecipeComponent::new(ItemKind::Prepared, "garlic_chopped", 1),
                    RecipeComponent::new(ItemKind::Seasoning, "salt", 1),
                ],
                appliance: ApplianceId::from("wok"),
                output: ItemId::from("garlic_vegetables"),
            },
        ],
    );
    builder.set_recipe_steps(
        "tomato_egg",
        vec![
            prep_step(ItemKind::Raw, "tomato", "cutting_board", "tomato_chopped"),
            prep_step(ItemKind::Prepared, "tomato_chopped", "wok", "tomato_fried"),
            prep_step(ItemKind::Raw, "egg", "wok", "egg_fried"),
            RecipeStep::Cook {
                inputs: vec![
                    RecipeComponent::new(ItemKind::Prepared, "tomato_fried", 1),
                    RecipeComponent::new(ItemKind::Prepared, "egg_fried", 1),
                    RecipeComponent::new(ItemKind::Seasoning, "salt", 1),
                ],
                appliance: ApplianceId::from("wok"),
                output: ItemId::from("tomato_egg"),
            },
        ],
    );

    builder
}

pub fn test_catalog() -> Catalog {
    test_catalog_builder()
        .build()
        .expect("test catalog is valid")
}

// ===========================================================================
// State helpers
// ===========================================================================

/// Default config over the test catalog, with five of each raw ingredient
/// in stock.
pub fn test_state() -> GameState {
    let mut state = GameState::new(Arc::new(test_catalog()), KitchenConfig::default());
    for item in ["vegetables", "garlic", "egg", "tomato"] {
        state.inventory.set(item, 5);
    }
    state
}

pub fn raw_slot(item: &str, max_stack: u32) -> SlotItem {
    SlotItem::single(item, ItemKind::Raw, max_stack)
}

pub fn seasoning_slot(item: &str) -> SlotItem {
    SlotItem::single(item, ItemKind::Seasoning, 3)
}

/// Put the wok into Processing on a throwaway cook.
pub fn start_wok_cook(state: &mut GameState, now: Millis) {
    let wok = state.appliance_mut("wok").expect("test kitchen has a wok");
    wok.add_item(seasoning_slot("salt")).expect("wok accepts salt");
    wok.start_processing(4000, OutputItem::new("unknown", ItemKind::Dish, 1), now)
        .expect("wok starts");
}

/// Drive `appliance` straight to Done holding `count` of `output`.
pub fn finish_on(state: &mut GameState, appliance: &str, output: &str, count: u32) {
    let kind = state.catalog().output_kind(output);
    let target = state.appliance_mut(appliance).expect("known appliance");
    target.add_item(seasoning_slot("salt")).expect("appliance accepts salt");
    target
        .start_processing(0, OutputItem::new(output, kind, count), 0)
        .expect("processing starts");
    target.tick(0);
}

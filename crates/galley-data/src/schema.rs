//! Serde data file structs for kitchen content.
//!
//! Every reference between tables is by name; the loader resolves names into
//! catalog ids. Optional fields fall back to catalog or config defaults.

use galley_core::time::Millis;
use serde::Deserialize;

fn one() -> u32 {
    1
}

fn default_max_amount() -> u32 {
    100
}

fn default_seasoning_stack() -> u32 {
    3
}

// ===========================================================================
// Appliances
// ===========================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplianceKindData {
    #[default]
    Normal,
    Trash,
}

/// An appliance definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplianceData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: ApplianceKindData,
    /// Slots, or units for a trash bin. Trash bins default to the configured
    /// bin size, everything else to one slot.
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub process_time: Millis,
    #[serde(default)]
    pub burn_time: Millis,
    #[serde(default)]
    pub clean_time: Option<Millis>,
    #[serde(default)]
    pub price: u32,
    #[serde(default = "one")]
    pub level: u32,
}

// ===========================================================================
// Items
// ===========================================================================

/// A raw ingredient in `ingredients.*`.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: u32,
    #[serde(default = "one")]
    pub max_stack: u32,
    /// Empty means any appliance.
    #[serde(default)]
    pub allowed_appliances: Vec<String>,
}

/// A prepared item in `prepared.*`.
#[derive(Debug, Clone, Deserialize)]
pub struct PreparedData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub source: String,
    pub appliance: String,
    #[serde(default)]
    pub process_time: Option<Millis>,
    #[serde(default = "one")]
    pub max_stack: u32,
    #[serde(default)]
    pub allowed_appliances: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasoningData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: u32,
    #[serde(default = "default_max_amount")]
    pub max_amount: u32,
    #[serde(default = "default_seasoning_stack")]
    pub max_stack: u32,
}

// ===========================================================================
// Dishes
// ===========================================================================

/// A recipe entry. The item kind comes from whichever table declares the
/// name.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentData {
    pub item: String,
    #[serde(default = "one")]
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DishData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub price: u32,
    #[serde(default)]
    pub cook_time: Option<Millis>,
    pub appliance: String,
    pub recipe: Vec<ComponentData>,
}

// ===========================================================================
// Automation plans
// ===========================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepData {
    Prepare {
        input: ComponentData,
        appliance: String,
        output: String,
    },
    Cook {
        inputs: Vec<ComponentData>,
        appliance: String,
        output: String,
    },
}

/// The ordered plan the automation loop follows for one dish.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeStepsData {
    pub dish: String,
    pub steps: Vec<StepData>,
}

//! Resolution pipeline: reads kitchen tables, resolves name references,
//! builds the catalog.
//!
//! Required tables: `appliances`, `ingredients`, `prepared`, `seasonings`,
//! `dishes`. Optional: `recipe_steps`, `config`. Each may be `.ron`,
//! `.toml` or `.json`, but only one format per table.

use crate::schema::*;
use galley_core::catalog::*;
use galley_core::config::KitchenConfig;
use galley_core::id::*;
use galley_core::item::ItemKind;
use galley_core::state::GameState;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: &'static str, dir: PathBuf },

    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A name declared twice, within one table or across the item tables.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// Names resolved, but the catalog rejected the tables.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Look for `{base_name}.ron`, `.toml` and `.json` in `dir`. More than one
/// match is an error.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

pub fn require_data_file(dir: &Path, base_name: &'static str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name,
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(file: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: file.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Deserialize `content` as `format`. `file` only labels errors.
pub fn parse_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(file, e)),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(file, e)),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(file, e)),
    }
}

/// Like [`parse_str`] for a table of rows. TOML has no top-level arrays, so
/// a TOML table keeps its rows under `toml_key`.
pub fn parse_list<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    if format != Format::Toml {
        return parse_str(content, format, file);
    }
    let table: toml::Table = toml::from_str(content).map_err(|e| parse_error(file, e))?;
    let rows = table
        .get(toml_key)
        .ok_or_else(|| parse_error(file, format!("missing key '{toml_key}' in TOML file")))?
        .clone();
    rows.try_into()
        .map_err(|e: toml::de::Error| parse_error(file, e))
}

pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format, path)
}

pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_list(&content, format, path, toml_key)
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Pipeline
// ===========================================================================

/// A resolved kitchen: the frozen catalog and its tuning.
#[derive(Debug)]
pub struct GameData {
    pub catalog: Catalog,
    pub config: KitchenConfig,
}

impl GameData {
    /// A fresh game over this kitchen.
    pub fn into_state(self) -> GameState {
        GameState::new(Arc::new(self.catalog), self.config)
    }
}

struct Table<T> {
    file: PathBuf,
    rows: Vec<T>,
}

struct Tables {
    appliances: Table<ApplianceData>,
    ingredients: Table<IngredientData>,
    prepared: Table<PreparedData>,
    seasonings: Table<SeasoningData>,
    dishes: Table<DishData>,
    recipe_steps: Option<Table<RecipeStepsData>>,
    config: KitchenConfig,
}

fn read_table<T: DeserializeOwned>(path: PathBuf, key: &str) -> Result<Table<T>, DataLoadError> {
    let rows = deserialize_list(&path, key)?;
    Ok(Table { file: path, rows })
}

/// Load every table in `dir` and build the catalog.
pub fn load_game_data(dir: &Path) -> Result<GameData, DataLoadError> {
    let config = match find_data_file(dir, "config")? {
        Some(path) => deserialize_file(&path)?,
        None => KitchenConfig::default(),
    };
    let recipe_steps = match find_data_file(dir, "recipe_steps")? {
        Some(path) => Some(read_table(path, "recipe_steps")?),
        None => None,
    };
    let tables = Tables {
        appliances: read_table(require_data_file(dir, "appliances")?, "appliances")?,
        ingredients: read_table(require_data_file(dir, "ingredients")?, "ingredients")?,
        prepared: read_table(require_data_file(dir, "prepared")?, "prepared")?,
        seasonings: read_table(require_data_file(dir, "seasonings")?, "seasonings")?,
        dishes: read_table(require_data_file(dir, "dishes")?, "dishes")?,
        recipe_steps,
        config,
    };

    let data = resolve(tables)?;
    tracing::info!(
        dir = %dir.display(),
        items = data.catalog.item_count(),
        dishes = data.catalog.dishes().len(),
        "kitchen data loaded"
    );
    Ok(data)
}

const DEFAULT_APPLIANCES: &str = include_str!("../data/appliances.ron");
const DEFAULT_INGREDIENTS: &str = include_str!("../data/ingredients.ron");
const DEFAULT_PREPARED: &str = include_str!("../data/prepared.ron");
const DEFAULT_SEASONINGS: &str = include_str!("../data/seasonings.ron");
const DEFAULT_DISHES: &str = include_str!("../data/dishes.ron");
const DEFAULT_RECIPE_STEPS: &str = include_str!("../data/recipe_steps.ron");

fn bundled<T: DeserializeOwned>(name: &str, content: &str) -> Result<Table<T>, DataLoadError> {
    let file = PathBuf::from(name);
    let rows = parse_list(content, Format::Ron, &file, "")?;
    Ok(Table { file, rows })
}

/// The bundled kitchen: six appliances, eight raw ingredients, ten
/// prepared items, salt and sugar, and six dishes with automation plans.
pub fn default_game_data() -> Result<GameData, DataLoadError> {
    let tables = Tables {
        appliances: bundled("appliances.ron", DEFAULT_APPLIANCES)?,
        ingredients: bundled("ingredients.ron", DEFAULT_INGREDIENTS)?,
        prepared: bundled("prepared.ron", DEFAULT_PREPARED)?,
        seasonings: bundled("seasonings.ron", DEFAULT_SEASONINGS)?,
        dishes: bundled("dishes.ron", DEFAULT_DISHES)?,
        recipe_steps: Some(bundled("recipe_steps.ron", DEFAULT_RECIPE_STEPS)?),
        config: KitchenConfig::default(),
    };
    let data = resolve(tables)?;
    tracing::info!(items = data.catalog.item_count(), "bundled kitchen loaded");
    Ok(data)
}

fn display_name(name: &Option<String>, id: &str) -> String {
    name.clone().unwrap_or_else(|| id.to_string())
}

fn resolve_appliances(
    names: &HashMap<String, ApplianceId>,
    list: &[String],
    file: &Path,
) -> Result<Vec<ApplianceId>, DataLoadError> {
    list.iter()
        .map(|name| resolve_name(names, name, file, "appliance").cloned())
        .collect()
}

fn resolve_component(
    items: &HashMap<String, ItemKind>,
    data: &ComponentData,
    file: &Path,
) -> Result<RecipeComponent, DataLoadError> {
    let kind = *resolve_name(items, &data.item, file, "item")?;
    Ok(RecipeComponent::new(kind, data.item.as_str(), data.count))
}

fn resolve_step(
    appliances: &HashMap<String, ApplianceId>,
    items: &HashMap<String, ItemKind>,
    data: &StepData,
    file: &Path,
) -> Result<RecipeStep, DataLoadError> {
    Ok(match data {
        StepData::Prepare {
            input,
            appliance,
            output,
        } => RecipeStep::Prepare {
            input: resolve_component(items, input, file)?,
            appliance: resolve_name(appliances, appliance, file, "appliance")?.clone(),
            output: {
                resolve_name(items, output, file, "item")?;
                ItemId::from(output.as_str())
            },
        },
        StepData::Cook {
            inputs,
            appliance,
            output,
        } => RecipeStep::Cook {
            inputs: inputs
                .iter()
                .map(|c| resolve_component(items, c, file))
                .collect::<Result<_, _>>()?,
            appliance: resolve_name(appliances, appliance, file, "appliance")?.clone(),
            output: {
                resolve_name(items, output, file, "dish")?;
                ItemId::from(output.as_str())
            },
        },
    })
}

fn resolve(tables: Tables) -> Result<GameData, DataLoadError> {
    let Tables {
        appliances,
        ingredients,
        prepared,
        seasonings,
        dishes,
        recipe_steps,
        config,
    } = tables;
    let mut builder = CatalogBuilder::new();

    let mut appliance_ids: HashMap<String, ApplianceId> = HashMap::new();
    for data in &appliances.rows {
        check_duplicate(&appliance_ids, &data.id, &appliances.file)?;
        let (kind, fallback_capacity) = match data.kind {
            ApplianceKindData::Normal => (ApplianceKind::Normal, 1),
            ApplianceKindData::Trash => (ApplianceKind::Trash, config.default_trash_capacity),
        };
        let def = ApplianceDef {
            name: display_name(&data.name, &data.id),
            process_time: data.process_time,
            burn_time: data.burn_time,
            clean_time: data.clean_time.unwrap_or(config.default_clean_time),
            price: data.price,
            level: data.level,
            ..ApplianceDef::new(
                data.id.as_str(),
                kind,
                data.capacity.unwrap_or(fallback_capacity),
            )
        };
        appliance_ids.insert(data.id.clone(), def.id.clone());
        builder.register_appliance(def);
    }

    // All item names up front so references may point forward.
    let mut item_kinds: HashMap<String, ItemKind> = HashMap::new();
    let declared = [
        (ItemKind::Raw, &ingredients.file, ingredients.rows.iter().map(|d| &d.id).collect::<Vec<_>>()),
        (ItemKind::Prepared, &prepared.file, prepared.rows.iter().map(|d| &d.id).collect()),
        (ItemKind::Seasoning, &seasonings.file, seasonings.rows.iter().map(|d| &d.id).collect()),
        (ItemKind::Dish, &dishes.file, dishes.rows.iter().map(|d| &d.id).collect()),
    ];
    for (kind, file, ids) in declared {
        for id in ids {
            check_duplicate(&item_kinds, id, file)?;
            item_kinds.insert(id.clone(), kind);
        }
    }

    for data in &ingredients.rows {
        builder.register_raw(RawIngredientDef {
            id: ItemId::from(data.id.as_str()),
            name: display_name(&data.name, &data.id),
            price: data.price,
            max_stack: data.max_stack,
            allowed_appliances: resolve_appliances(
                &appliance_ids,
                &data.allowed_appliances,
                &ingredients.file,
            )?,
        });
    }

    for data in &prepared.rows {
        resolve_name(&item_kinds, &data.source, &prepared.file, "ingredient")?;
        builder.register_prepared(PreparedDef {
            id: ItemId::from(data.id.as_str()),
            name: display_name(&data.name, &data.id),
            source: ItemId::from(data.source.as_str()),
            appliance: resolve_name(&appliance_ids, &data.appliance, &prepared.file, "appliance")?
                .clone(),
            process_time: data.process_time,
            max_stack: data.max_stack,
            allowed_appliances: resolve_appliances(
                &appliance_ids,
                &data.allowed_appliances,
                &prepared.file,
            )?,
        });
    }

    for data in &seasonings.rows {
        builder.register_seasoning(SeasoningDef {
            id: ItemId::from(data.id.as_str()),
            name: display_name(&data.name, &data.id),
            price: data.price,
            max_amount: data.max_amount,
            max_stack: data.max_stack,
        });
    }

    for data in &dishes.rows {
        let recipe = data
            .recipe
            .iter()
            .map(|c| resolve_component(&item_kinds, c, &dishes.file))
            .collect::<Result<Vec<_>, _>>()?;
        builder.register_dish(DishDef {
            id: ItemId::from(data.id.as_str()),
            name: display_name(&data.name, &data.id),
            price: data.price,
            cook_time: data.cook_time,
            appliance: resolve_name(&appliance_ids, &data.appliance, &dishes.file, "appliance")?
                .clone(),
            recipe,
        });
    }

    if let Some(table) = &recipe_steps {
        let mut planned: HashMap<String, ()> = HashMap::new();
        for data in &table.rows {
            check_duplicate(&planned, &data.dish, &table.file)?;
            resolve_name(&item_kinds, &data.dish, &table.file, "dish")?;
            let steps = data
                .steps
                .iter()
                .map(|s| resolve_step(&appliance_ids, &item_kinds, s, &table.file))
                .collect::<Result<Vec<_>, _>>()?;
            builder.set_recipe_steps(data.dish.as_str(), steps);
            planned.insert(data.dish.clone(), ());
        }
    }

    let catalog = builder.build()?;
    Ok(GameData { catalog, config })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "galley_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    /// Write the bundled tables into `dir` as RON.
    fn write_defaults(dir: &Path) {
        for (name, content) in [
            ("appliances.ron", DEFAULT_APPLIANCES),
            ("ingredients.ron", DEFAULT_INGREDIENTS),
            ("prepared.ron", DEFAULT_PREPARED),
            ("seasonings.ron", DEFAULT_SEASONINGS),
            ("dishes.ron", DEFAULT_DISHES),
            ("recipe_steps.ron", DEFAULT_RECIPE_STEPS),
        ] {
            fs::write(dir.join(name), content).unwrap();
        }
    }

    /// A two-appliance kitchen with one dish, enough to exercise formats.
    fn write_small(dir: &Path) {
        fs::write(
            dir.join("appliances.toml"),
            r#"
[[appliances]]
id = "cutting_board"
capacity = 1
process_time = 3000

[[appliances]]
id = "wok"
capacity = 4
process_time = 4000
burn_time = 5000

[[appliances]]
id = "bin"
kind = "trash"
"#,
        )
        .unwrap();
        fs::write(
            dir.join("ingredients.json"),
            r#"[{"id": "garlic", "price": 2, "max_stack": 5, "allowed_appliances": ["cutting_board"]}]"#,
        )
        .unwrap();
        fs::write(
            dir.join("prepared.ron"),
            r#"[(id: "garlic_chopped", source: "garlic", appliance: "cutting_board", max_stack: 5)]"#,
        )
        .unwrap();
        fs::write(dir.join("seasonings.ron"), r#"[(id: "salt")]"#).unwrap();
        fs::write(
            dir.join("dishes.ron"),
            r#"[(id: "garlic_fry", price: 9, appliance: "wok", recipe: [(item: "garlic_chopped", count: 2), (item: "salt")])]"#,
        )
        .unwrap();
    }

    // -----------------------------------------------------------------------
    // detect_format / find_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("dishes.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("dishes.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("dishes.json")).unwrap(), Format::Json);
        assert!(matches!(
            detect_format(Path::new("dishes.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("dishes")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn find_data_file_found_and_missing() {
        let dir = make_test_dir("find");
        fs::write(dir.join("dishes.json"), "[]").unwrap();

        assert_eq!(find_data_file(&dir, "dishes").unwrap(), Some(dir.join("dishes.json")));
        assert_eq!(find_data_file(&dir, "appliances").unwrap(), None);

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("dishes.ron"), "[]").unwrap();
        fs::write(dir.join("dishes.json"), "[]").unwrap();

        assert!(matches!(
            find_data_file(&dir, "dishes"),
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");

        let result = require_data_file(&dir, "dishes");
        assert!(matches!(result, Err(DataLoadError::MissingRequired { file: "dishes", .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize_list
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_list_toml_uses_key() {
        let dir = make_test_dir("list_toml");
        let path = dir.join("seasonings.toml");
        fs::write(
            &path,
            r#"
[[seasonings]]
id = "salt"

[[seasonings]]
id = "sugar"
max_stack = 2
"#,
        )
        .unwrap();

        let rows: Vec<SeasoningData> = deserialize_list(&path, "seasonings").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].max_amount, 100);
        assert_eq!(rows[1].max_stack, 2);

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml_missing_key() {
        let dir = make_test_dir("list_toml_missing");
        let path = dir.join("seasonings.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();

        let result: Result<Vec<SeasoningData>, _> = deserialize_list(&path, "seasonings");
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = make_test_dir("parse_err");
        let path = dir.join("dishes.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let err = deserialize_list::<DishData>(&path, "dishes").unwrap_err();
        assert!(matches!(err, DataLoadError::Parse { .. }));
        assert!(err.to_string().contains("dishes.ron"));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    #[test]
    fn bundled_kitchen_is_complete() {
        let data = default_game_data().unwrap();
        let catalog = &data.catalog;

        let appliances: Vec<_> = catalog.appliances().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(
            appliances,
            ["cutting_board", "wok", "steamer", "mixer", "grill", "trash_bin"]
        );
        assert!(catalog.appliance("trash_bin").unwrap().is_trash());
        assert_eq!(catalog.raw_ingredients().len(), 8);
        assert_eq!(catalog.seasonings().len(), 2);
        assert_eq!(catalog.dishes().len(), 6);
        assert_eq!(catalog.item_count(), 8 + 10 + 2 + 6);
        for dish in catalog.dishes() {
            assert!(catalog.recipe_steps(dish.id.as_str()).is_some(), "{} has no plan", dish.id);
        }
        assert_eq!(catalog.prepared("tomato_fried").unwrap().source, "tomato_chopped");
        assert_eq!(data.config, KitchenConfig::default());
    }

    #[test]
    fn directory_matches_bundled_tables() {
        let dir = make_test_dir("defaults");
        write_defaults(&dir);

        let loaded = load_game_data(&dir).unwrap();
        let bundled = default_game_data().unwrap();
        assert_eq!(loaded.catalog.item_count(), bundled.catalog.item_count());
        assert_eq!(loaded.catalog.dishes(), bundled.catalog.dishes());
        assert_eq!(loaded.catalog.appliances(), bundled.catalog.appliances());

        cleanup(&dir);
    }

    #[test]
    fn mixed_formats_resolve() {
        let dir = make_test_dir("mixed");
        write_small(&dir);

        let data = load_game_data(&dir).unwrap();
        let catalog = &data.catalog;
        let bin = catalog.appliance("bin").unwrap();
        assert!(bin.is_trash());
        assert_eq!(bin.capacity, data.config.default_trash_capacity);
        assert_eq!(bin.clean_time, data.config.default_clean_time);

        let dish = catalog.dish("garlic_fry").unwrap();
        assert_eq!(dish.cook_time, None);
        assert_eq!(
            dish.recipe,
            vec![
                RecipeComponent::new(ItemKind::Prepared, "garlic_chopped", 2),
                RecipeComponent::new(ItemKind::Seasoning, "salt", 1),
            ]
        );
        assert!(catalog.recipe_steps("garlic_fry").is_none());

        cleanup(&dir);
    }

    #[test]
    fn config_overrides_only_named_fields() {
        let dir = make_test_dir("config");
        write_small(&dir);
        fs::write(dir.join("config.toml"), "plate_count = 5\nbatch_time_factor = 0.5\n").unwrap();

        let data = load_game_data(&dir).unwrap();
        assert_eq!(data.config.plate_count, 5);
        assert_eq!(data.config.batch_time_factor, 0.5);
        assert_eq!(data.config.tick_interval, KitchenConfig::default().tick_interval);

        let state = data.into_state();
        assert_eq!(state.plates.len(), 5);

        cleanup(&dir);
    }

    #[test]
    fn missing_table_is_reported() {
        let dir = make_test_dir("missing_table");
        write_small(&dir);
        fs::remove_file(dir.join("dishes.ron")).unwrap();

        assert!(matches!(
            load_game_data(&dir),
            Err(DataLoadError::MissingRequired { file: "dishes", .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn unknown_appliance_is_unresolved() {
        let dir = make_test_dir("unknown_appliance");
        write_small(&dir);
        fs::write(
            dir.join("dishes.ron"),
            r#"[(id: "garlic_fry", price: 9, appliance: "oven", recipe: [(item: "salt")])]"#,
        )
        .unwrap();

        let err = load_game_data(&dir).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::UnresolvedRef { ref name, expected_kind: "appliance", .. } if name == "oven"
        ));

        cleanup(&dir);
    }

    #[test]
    fn item_names_are_unique_across_tables() {
        let dir = make_test_dir("dup_item");
        write_small(&dir);
        fs::write(dir.join("seasonings.ron"), r#"[(id: "salt"), (id: "garlic")]"#).unwrap();

        let err = load_game_data(&dir).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::DuplicateName { ref name, ref file } if name == "garlic" && file.ends_with("seasonings.ron")
        ));

        cleanup(&dir);
    }

    #[test]
    fn plan_for_unknown_dish_is_unresolved() {
        let dir = make_test_dir("plan_unknown");
        write_small(&dir);
        fs::write(
            dir.join("recipe_steps.json"),
            r#"[{"dish": "soup", "steps": []}]"#,
        )
        .unwrap();

        assert!(matches!(
            load_game_data(&dir),
            Err(DataLoadError::UnresolvedRef { expected_kind: "dish", .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn catalog_rules_still_apply() {
        let dir = make_test_dir("catalog_rule");
        write_small(&dir);
        fs::write(
            dir.join("dishes.ron"),
            r#"[(id: "garlic_fry", price: 9, appliance: "wok", recipe: [])]"#,
        )
        .unwrap();

        assert!(matches!(
            load_game_data(&dir),
            Err(DataLoadError::Catalog(CatalogError::EmptyRecipe(_)))
        ));

        cleanup(&dir);
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let data_err: DataLoadError = io_err.into();
        assert!(matches!(data_err, DataLoadError::Io(_)));
        assert!(format!("{data_err}").contains("file not found"));
    }
}

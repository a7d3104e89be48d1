//! Data-driven kitchen tables for galley.
//!
//! Appliances, ingredients, prepared items, seasonings, dishes and
//! automation plans are read from RON, TOML or JSON files (one format per
//! table, detected from the extension) and resolved into an immutable
//! [`galley_core::catalog::Catalog`]. A default kitchen is bundled.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, GameData, default_game_data, load_game_data};

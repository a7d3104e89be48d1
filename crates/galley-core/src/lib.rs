//! Galley Core -- the simulation core for a kitchen-management game.
//!
//! Players stage ingredients on appliances, chain processing steps into
//! prepared items, combine those into dishes, and serve customers before
//! their patience runs out. This crate owns the rules; rendering, audio and
//! shop flows live in the host.
//!
//! # Tick Pipeline
//!
//! A single [`sim::Scheduler`] is driven by the host event loop with a
//! wall-clock timestamp in milliseconds. At fixed cadences it runs:
//!
//! 1. **Appliances** -- processing, burning, cleaning and repair timers,
//!    in declaration order.
//! 2. **Plates** -- washing timers.
//! 3. **Automation** -- the optional [`automation::AutoCook`] loop.
//! 4. **Patience** -- the customer collaborator's countdown.
//!
//! # Key Types
//!
//! - [`catalog::Catalog`] -- Immutable ingredient, dish and appliance tables
//!   (frozen at startup, built through [`catalog::CatalogBuilder`]).
//! - [`appliance::Appliance`] -- Per-appliance state machine. Every mutation
//!   returns `Result<_, Rejection>` and leaves state untouched on failure.
//! - [`recipe`] -- Pure dish matching with batch scaling.
//! - [`payload::DragPayload`] -- Tagged drag descriptor plus the
//!   [`payload::can_drop`] predicate.
//! - [`state::GameState`] -- Explicitly owned game state; the drop
//!   orchestrators in [`drop`] mutate it transactionally.
//! - [`event::EventLog`] -- Ring-buffered log of timed and forced
//!   transitions.

pub mod appliance;
pub mod automation;
pub mod catalog;
pub mod config;
pub mod cooking;
pub mod customer;
pub mod disruption;
pub mod drop;
pub mod event;
pub mod id;
pub mod item;
pub mod kitchen;
pub mod notify;
pub mod payload;
pub mod plate;
pub mod recipe;
pub mod sim;
pub mod state;
pub mod time;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

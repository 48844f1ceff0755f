//! Core data types for army lists, catalogue units, and the finished sheet.
//!
//! - [`ArmySelection`](army::ArmySelection): what the player chose, parsed from the list export
//! - [`CatalogueUnit`](unit::CatalogueUnit): a flat unit record resolved from a rules catalogue
//! - [`EnrichedUnit`](sheet::EnrichedUnit) and [`CheatSheet`](sheet::CheatSheet): the joined,
//!   display-ready model handed to renderers
//! - [`Heuristics`](heuristics::Heuristics): keyword tables used by every classification step
//!
//! Catalogue records are read-only once resolved. A cheat sheet is built once per army
//! list and owned by the caller.

pub mod army;
pub mod heuristics;
pub mod sheet;
pub mod types;
pub mod unit;

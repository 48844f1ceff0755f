//! Reconciliation of army selections against catalogue records.
//!
//! - [`CheatSheetEngine`](engine::CheatSheetEngine): main entry point, builds a
//!   [`CheatSheet`](crate::core::sheet::CheatSheet) from a parsed army
//! - [`names`]: selection-name to catalogue-record lookup
//! - [`weapons`]: selected weapon filtering, counting, and row aggregation
//! - [`abilities`]: passive badges and per-phase grouping
//! - [`faction`]: faction-wide ability promotion and suppression
//!
//! ## Reconciliation
//!
//! 1. **Name matching**: exact, then case-insensitive, then containment
//! 2. **Weapons**: catalogue weapons overlapping a selected item, or all of them
//!    when the list gave no equipment; non-character rows are aggregated
//! 3. **Abilities**: keyword-style abilities become badges, the rest are
//!    grouped by phase
//! 4. **Faction pass**: shared rules carrying the faction marker are counted
//!    across units; common ones move to the sheet header and all marked rules
//!    are removed from the units
//!
//! ## Example
//!
//! ```rust,no_run
//! use army_sheet::catalog::store::ResolvedCatalogue;
//! use army_sheet::core::heuristics::Heuristics;
//! use army_sheet::matching::engine::CheatSheetEngine;
//! use std::path::Path;
//!
//! let resolved = ResolvedCatalogue::load_from_file(Path::new("space_wolves.json")).unwrap();
//! let catalogue = resolved.unit_catalogue();
//! let heuristics = Heuristics::default();
//!
//! let engine = CheatSheetEngine::new(&catalogue, &heuristics);
//! let sheet = engine.generate(&std::fs::read_to_string("army.txt").unwrap());
//!
//! for unit in sheet.all_units() {
//!     println!("{} ({} pts)", unit.name, unit.points);
//! }
//! ```

pub mod abilities;
pub mod engine;
pub mod faction;
pub mod names;
pub mod weapons;

pub use engine::CheatSheetEngine;

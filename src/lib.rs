//! # army-sheet
//!
//! A library for building army reference sheets from army list exports and
//! BattleScribe-style rules catalogues.
//!
//! List building apps export an army as plain text: unit names, points, and
//! the chosen wargear, but none of the rules. The rules live in catalogue
//! documents where units, weapons, and abilities are spread over shared
//! definitions linked by identifier, sometimes across several documents.
//!
//! `army-sheet` parses the export, flattens the catalogues into one record
//! per unit, and joins the two into a cheat sheet.
//!
//! ## Features
//!
//! - **Army list parsing**: Sections, units, warlord, enhancements, wargear, and
//!   model groups with per-model weapons
//! - **Catalogue resolution**: Cross-document lookup of shared profiles, rules,
//!   and entries, with linked weapons followed to a bounded depth
//! - **Name matching**: Exact, case-insensitive, then containment
//! - **Weapon counting**: Only the selected weapons, with summed counts
//! - **Phase grouping**: Abilities grouped by the phase they are used in, with
//!   keyword-style abilities shown as badges
//! - **Faction abilities**: Rules shared by most of the army are listed once
//!
//! ## Example
//!
//! ```rust,no_run
//! use army_sheet::{CatalogueResolver, CheatSheetEngine, Heuristics};
//! use std::path::Path;
//!
//! let heuristics = Heuristics::default();
//!
//! // Resolve the faction catalogue and its linked catalogues
//! let resolver = CatalogueResolver::from_path(Path::new("Imperium - Space Wolves.cat"), true).unwrap();
//! let catalogue = resolver.resolve(&heuristics).unit_catalogue();
//!
//! // Build the sheet for an exported list
//! let list = std::fs::read_to_string("army.txt").unwrap();
//! let engine = CheatSheetEngine::new(&catalogue, &heuristics);
//! let sheet = engine.generate(&list);
//!
//! println!("{} ({} points)", sheet.army_name, sheet.points);
//! for ability in &sheet.faction_abilities {
//!     println!("Faction: {}", ability.name);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Catalogue documents, resolution, and unit storage
//! - [`core`]: Core data types for selections, catalogue units, and sheets
//! - [`matching`]: Reconciliation engine
//! - [`parsing`]: Parsers for army list exports and XML documents
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::builder::{CatalogueDocument, CatalogueResolver};
pub use catalog::store::{ResolvedCatalogue, UnitCatalogue};
pub use core::army::ArmySelection;
pub use core::heuristics::Heuristics;
pub use core::sheet::CheatSheet;
pub use core::types::*;
pub use matching::engine::CheatSheetEngine;
pub use parsing::army_list::parse_army_list;

//! Catalogue resolution and storage.
//!
//! Catalogue documents describe a faction's units as a graph: top-level
//! selection entries reference shared profiles, rules, and other entries by
//! identifier, and a document may link further documents. Resolution
//! flattens that graph into one [`CatalogueUnit`](crate::core::unit::CatalogueUnit)
//! record per entry:
//!
//! - [`builder`]: document loading and the [`CatalogueResolver`](builder::CatalogueResolver)
//! - [`index`]: identifier lookup tables over shared definitions
//! - [`store`]: the serializable [`ResolvedCatalogue`](store::ResolvedCatalogue) and the
//!   merged, name-keyed [`UnitCatalogue`](store::UnitCatalogue)
//! - [`factions`]: faction names and their catalogue files
//!
//! ## Example
//!
//! ```rust,no_run
//! use army_sheet::catalog::builder::CatalogueResolver;
//! use army_sheet::core::heuristics::Heuristics;
//! use std::path::Path;
//!
//! // Load a catalogue and every linked catalogue next to it
//! let resolver = CatalogueResolver::from_path(Path::new("Imperium - Space Wolves.cat"), true).unwrap();
//! let resolved = resolver.resolve(&Heuristics::default());
//!
//! // Save for later runs
//! std::fs::write("space_wolves.json", resolved.to_json().unwrap()).unwrap();
//!
//! // Merge duplicate fragments before reconciliation
//! let units = resolved.unit_catalogue();
//! println!("{} units", units.len());
//! ```

pub mod builder;
pub mod factions;
pub mod index;
pub mod store;

pub use store::CatalogError;

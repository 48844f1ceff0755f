//! Parsers for the two text inputs of the pipeline.
//!
//! - **Army list exports** ([`army_list`]): the bullet-formatted plain text a list
//!   builder app produces. Parsing is best-effort and never fails.
//! - **Catalogue documents** ([`xml`]): XML rules documents, folded into an
//!   element tree that the catalogue resolver queries by identifier.
//!
//! ## Example
//!
//! ```rust
//! use army_sheet::core::heuristics::Heuristics;
//! use army_sheet::parsing::army_list::parse_army_list;
//!
//! let text = "Foo (500 Points)\n\nCHARACTERS\n\nBar (100 Points)\n  • Warlord\n";
//! let army = parse_army_list(text, &Heuristics::default());
//! assert_eq!(army.characters[0].name, "Bar");
//! assert!(army.characters[0].warlord);
//! ```
//!
//! ## Army list bullets
//!
//! | Marker | Indent | Meaning |
//! |--------|--------|---------|
//! | `•` `‣` `-` `*` | < 4 | unit entry: warlord, enhancement, model or wargear |
//! | `◦` `○` `▪` | any | weapon of the last model |
//! | any | >= 4 | weapon of the last model |

pub mod army_list;
pub mod xml;

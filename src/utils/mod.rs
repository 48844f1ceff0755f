//! Shared helpers: name normalization, markup cleaning, and resolver limits.

pub mod text;
pub mod validation;

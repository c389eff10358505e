//! Brand and location data for clinicsite builds.
//!
//! This crate loads a brand's JSON dataset, exposes the brand-level fallbacks
//! and per-location records, and derives the directory slug each location page
//! is written under.

pub mod load;
pub mod model;
pub mod slug;

pub use load::{load_dataset, DataError};
pub use model::{AreasServed, Brand, BrandDataset, Location, Scalar};
pub use slug::location_slug;

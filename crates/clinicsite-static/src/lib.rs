//! Static site builder for clinicsite brands.
//!
//! Renders one page per location from a token template, rebuilds the
//! homepage location grid from per-location cards, and copies static assets
//! into the output folder.

pub mod assets;
pub mod builder;
pub mod cards;
pub mod homepage;
pub mod pages;

pub use builder::{BuildConfig, BuildError, BuildResult, HomepageStatus, SiteBuilder};
pub use cards::{CardBuilder, CardConfig, CardError, CardLayout};
pub use assets::{AssetCopier, AssetError};
pub use homepage::HomepageError;
pub use pages::{ListConfig, LocationPageRenderer};

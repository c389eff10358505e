//! Placeholder-token templates for clinicsite.
//!
//! Templates are plain HTML carrying bracketed uppercase tokens such as
//! `[LOCATION_NAME]`. They are parsed once into literal and token segments and
//! rendered against a [`TokenMap`]. This crate also builds `<li>` list
//! fragments and rewrites root-relative links for pages written below the
//! site root.

pub mod links;
pub mod lists;
pub mod template;

pub use links::{relative_root, LinkRewriter, LinkRules, TemplateError};
pub use lists::ListBuilder;
pub use template::{Rendered, Segment, Template, TokenMap};

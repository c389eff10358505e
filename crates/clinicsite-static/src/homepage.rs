//! Homepage assembly.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use clinicsite_data::Brand;
use clinicsite_template::{Rendered, Template, TokenMap};

/// Homepage token replaced with the brand URL.
pub const CANONICAL_URL_TOKEN: &str = "CANONICAL_URL_FOR_BRAND_PAGE";

const GRID_OPEN: &str = r#"<div class="all-locations-grid">"#;

// From the grid opening tag to the first card close that is followed by the
// grid's own closing tag.
static GRID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div class="all-locations-grid">[\s\S]*?</article>\s*</div>"#)
        .expect("Invalid grid regex")
});

/// Errors that can occur while assembling the homepage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HomepageError {
    #[error("Could not find the location grid (<div class=\"all-locations-grid\"> ending in </article></div>) in the homepage template")]
    GridMarkerNotFound,
}

/// Replace the whole location grid block with `cards`, in order.
pub fn splice_grid(html: &str, cards: &[String]) -> Result<String, HomepageError> {
    if !GRID_RE.is_match(html) {
        return Err(HomepageError::GridMarkerNotFound);
    }

    let grid = format!("{GRID_OPEN}\n{}\n</div>", cards.join("\n"));

    Ok(GRID_RE.replacen(html, 1, NoExpand(&grid)).into_owned())
}

/// Tokens in a homepage template that the brand does not provide.
pub fn unknown_tokens(template: &str) -> Vec<String> {
    Template::parse(template)
        .tokens()
        .into_iter()
        .filter(|t| *t != CANONICAL_URL_TOKEN)
        .map(str::to_string)
        .collect()
}

/// Substitute brand tokens and rebuild the location grid.
///
/// Brand tokens are applied to the template before the cards are inserted,
/// so card text is never scanned for tokens.
pub fn assemble_homepage(
    template: &str,
    cards: &[String],
    brand: &Brand,
) -> Result<Rendered, HomepageError> {
    let mut values = TokenMap::new();
    values.insert(CANONICAL_URL_TOKEN, brand.url.as_str());

    let rendered = Template::parse(template).render(&values);
    let html = splice_grid(&rendered.html, cards)?;

    Ok(Rendered {
        html,
        unresolved: rendered.unresolved,
    })
}

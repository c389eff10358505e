//! Relative link rewriting for pages written below the site root.
//!
//! Templates are authored as if they lived at the site root: `href="style.css"`,
//! `src="images/logo.png"`, `href="#insurance"`. A page written to
//! `locations/<slug>/index.html` needs every such reference to climb back to
//! the root first. The climb is computed from the page's output path.

use std::collections::HashMap;
use std::path::{Component, Path};

use regex::Regex;

/// Errors that can occur while preparing a rewriter.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Invalid link rewrite rule: {0}")]
    InvalidLinkRule(String),
}

/// Relative path from a page back to the site root.
///
/// `page` is the page's path relative to the output root, so
/// `locations/atlanta/index.html` yields `../../` and `index.html` yields an
/// empty string.
pub fn relative_root(page: &Path) -> String {
    let depth = page
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .count()
        })
        .unwrap_or(0);

    "../".repeat(depth)
}

/// What to rewrite in a page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRules {
    /// Absolute brand homepage URL whose links become relative
    pub site_root: Option<String>,

    /// Homepage file name appended to the climb (`""` or `"index.html"`)
    pub home_page: String,

    /// Homepage section anchors linked from page navigation
    pub anchors: Vec<String>,

    /// Root-level files referenced by `href` or `src`
    pub asset_files: Vec<String>,

    /// Root-level directories referenced by `href`, `src` or CSS `url()`
    pub asset_dirs: Vec<String>,
}

impl Default for LinkRules {
    fn default() -> Self {
        Self {
            site_root: None,
            home_page: String::new(),
            anchors: [
                "locations-full",
                "insurance",
                "treatment-planning",
                "admissions",
                "services",
                "contact",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            asset_files: vec!["style.css".to_string(), "script.js".to_string()],
            asset_dirs: vec!["images".to_string()],
        }
    }
}

/// Rewrites root-relative references in a single pass.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    pattern: Regex,
    replacements: HashMap<String, String>,
}

impl LinkRewriter {
    /// Compile the rules for pages whose climb to the root is `prefix`.
    pub fn new(rules: &LinkRules, prefix: &str) -> Result<Self, TemplateError> {
        let mut replacements = HashMap::new();

        for file in &rules.asset_files {
            for attr in ["href", "src"] {
                replacements.insert(
                    format!(r#"{attr}="{file}""#),
                    format!(r#"{attr}="{prefix}{file}""#),
                );
            }
        }

        for dir in &rules.asset_dirs {
            for attr in ["href", "src"] {
                replacements.insert(
                    format!(r#"{attr}="{dir}/"#),
                    format!(r#"{attr}="{prefix}{dir}/"#),
                );
            }
            for open in ["url('", "url(\"", "url("] {
                replacements.insert(format!("{open}{dir}/"), format!("{open}{prefix}{dir}/"));
            }
        }

        let home = home_target(prefix, &rules.home_page);
        let home_href = format!(r#"href="{home}""#);

        replacements.insert(r##"href="#top""##.to_string(), home_href.clone());
        replacements.insert(r#"href="index.html""#.to_string(), home_href.clone());

        for anchor in &rules.anchors {
            replacements.insert(
                format!(r##"href="#{anchor}""##),
                format!(r##"href="{home}#{anchor}""##),
            );
        }

        if let Some(root) = rules.site_root.as_deref().filter(|r| !r.is_empty()) {
            let bare = root.trim_end_matches('/');
            for variant in [bare.to_string(), format!("{bare}/")] {
                replacements.insert(format!(r#"href="{variant}""#), home_href.clone());
                for anchor in &rules.anchors {
                    replacements.insert(
                        format!(r##"href="{variant}#{anchor}""##),
                        format!(r##"href="{home}#{anchor}""##),
                    );
                }
            }
        }

        // Longest first so overlapping literals prefer the most specific rule
        let mut literals: Vec<&String> = replacements.keys().collect();
        literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternation = literals
            .iter()
            .map(|l| regex::escape(l))
            .collect::<Vec<_>>()
            .join("|");

        let pattern =
            Regex::new(&alternation).map_err(|e| TemplateError::InvalidLinkRule(e.to_string()))?;

        Ok(Self {
            pattern,
            replacements,
        })
    }

    /// Rewrite every matching reference in `text`.
    pub fn rewrite(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let matched = &caps[0];
                self.replacements
                    .get(matched)
                    .cloned()
                    .unwrap_or_else(|| matched.to_string())
            })
            .into_owned()
    }
}

/// Link target for the homepage as seen from a page at `prefix`.
fn home_target(prefix: &str, home_page: &str) -> String {
    let target = format!("{prefix}{home_page}");
    if target.is_empty() {
        "./".to_string()
    } else {
        target
    }
}

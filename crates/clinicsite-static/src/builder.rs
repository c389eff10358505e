//! Static site builder.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clinicsite_data::{load_dataset, BrandDataset, DataError};
use clinicsite_template::{relative_root, LinkRewriter, LinkRules, ListBuilder, TemplateError, TokenMap};

use crate::assets::{AssetCopier, AssetError};
use crate::cards::{CardBuilder, CardConfig, CardError};
use crate::homepage::{self, assemble_homepage, HomepageError};
use crate::pages::{ListConfig, LocationPageRenderer};

const PAGE_FILE: &str = "index.html";

/// Configuration for building one brand's site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Brand JSON dataset
    pub data_file: PathBuf,

    /// Location page template
    pub location_template: PathBuf,

    /// Homepage template containing the location grid
    pub home_template: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Directory under the output root holding location pages
    pub locations_dir: String,

    /// Directory the asset files and directories are copied from
    pub assets_dir: PathBuf,

    /// Link rewriting rules; their asset lists are also what gets copied
    pub links: LinkRules,

    /// Homepage card settings
    pub card: CardConfig,

    /// Empty-state fragments for per-location lists
    pub lists: ListConfig,

    /// Brand-wide list tokens, rendered as `<li>` fragments
    pub static_lists: BTreeMap<String, Vec<String>>,

    /// Brand-wide literal tokens
    pub tokens: BTreeMap<String, String>,

    /// Fail instead of leaving unknown tokens in the output
    pub strict_tokens: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.json"),
            location_template: PathBuf::from("location-template.html"),
            home_template: PathBuf::from("index.html"),
            output_dir: PathBuf::from("dist"),
            locations_dir: "locations".to_string(),
            assets_dir: PathBuf::from("."),
            links: LinkRules::default(),
            card: CardConfig::default(),
            lists: ListConfig::default(),
            static_lists: BTreeMap::new(),
            tokens: BTreeMap::new(),
            strict_tokens: false,
        }
    }
}

/// What happened to the homepage during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomepageStatus {
    /// Written to this path
    Written(PathBuf),
    /// Not written; location pages and assets were still produced
    Skipped(HomepageError),
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of location pages generated
    pub pages: usize,

    /// Homepage outcome
    pub homepage: HomepageStatus,

    /// Number of asset files copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

impl BuildResult {
    /// Whether every output, including the homepage, was produced.
    pub fn is_complete(&self) -> bool {
        matches!(self.homepage, HomepageStatus::Written(_))
    }
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Card(#[from] CardError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("Unresolved tokens in {template}: {tokens}")]
    UnresolvedTokens { template: String, tokens: String },

    #[error("Locations '{first}' and '{second}' both use the slug '{slug}'")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

/// Builds one brand's static site.
pub struct SiteBuilder {
    config: BuildConfig,
}

impl SiteBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build the site.
    ///
    /// Inputs are all read and checked before anything is written. A homepage
    /// template without a location grid is reported in the result rather than
    /// failing the build.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        tracing::info!("Starting build...");

        let data = load_dataset(&self.config.data_file)?;
        let location_source = read_text(&self.config.location_template)?;
        let home_source = read_text(&self.config.home_template)?;

        let slugs = self.collect_slugs(&data)?;

        // Slugs are single path segments, so every location page sits at the same depth
        let prefix = relative_root(&self.location_page_path("_"));
        let rewriter = LinkRewriter::new(&self.config.links, &prefix)?;
        let renderer = LocationPageRenderer::new(
            &location_source,
            &rewriter,
            &self.config.lists,
            self.brand_tokens(),
        );
        self.check_tokens(&self.config.location_template, renderer.unknown_tokens())?;
        self.check_tokens(
            &self.config.home_template,
            homepage::unknown_tokens(&home_source),
        )?;

        let copier = AssetCopier::new(&self.config.assets_dir, &self.config.output_dir);
        self.check_assets(&copier)?;

        let cards = CardBuilder::new(self.config.card.clone())?;

        // Render everything before touching the output directory
        let mut pages = Vec::with_capacity(data.locations.len());
        let mut all_cards = Vec::with_capacity(data.locations.len());

        for (location, slug) in data.locations.iter().zip(&slugs) {
            tracing::info!("Processing location: {}...", location.name);

            let page = renderer.render(location, &data.brand);
            let output_path = self.config.output_dir.join(self.location_page_path(slug));
            pages.push((output_path, page.html));

            all_cards.push(cards.render(location, &data.brand, slug)?);
        }

        tracing::info!("Processing homepage...");
        let home = assemble_homepage(&home_source, &all_cards, &data.brand);

        // Location pages
        for (path, html) in &pages {
            write_file(path, html)?;
        }
        tracing::info!("Generated {} location pages.", pages.len());

        // Homepage
        let homepage = match home {
            Ok(home) => {
                let path = self.config.output_dir.join(PAGE_FILE);
                write_file(&path, &home.html)?;
                tracing::info!("Homepage location grid rebuilt.");
                HomepageStatus::Written(path)
            }
            Err(e) => {
                tracing::error!("{}. Skipping homepage build.", e);
                HomepageStatus::Skipped(e)
            }
        };

        // Assets
        tracing::info!("Copying assets...");
        let assets = self.copy_assets(&copier)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: slugs.len(),
            homepage,
            assets,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Path of a location page relative to the output root.
    fn location_page_path(&self, slug: &str) -> PathBuf {
        Path::new(&self.config.locations_dir)
            .join(slug)
            .join(PAGE_FILE)
    }

    /// Derive every slug up front, rejecting duplicates.
    fn collect_slugs(&self, data: &BrandDataset) -> Result<Vec<String>, BuildError> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut slugs = Vec::with_capacity(data.locations.len());

        for location in &data.locations {
            let slug = location.slug()?;
            if let Some(first) = seen.insert(slug.clone(), &location.name) {
                return Err(BuildError::DuplicateSlug {
                    slug,
                    first: first.to_string(),
                    second: location.name.clone(),
                });
            }
            slugs.push(slug);
        }

        Ok(slugs)
    }

    /// Tokens shared by every location page.
    fn brand_tokens(&self) -> TokenMap {
        let mut tokens = TokenMap::new();
        let list = ListBuilder::new();

        for (name, items) in &self.config.static_lists {
            tokens.insert(name.as_str(), list.build(Some(items.as_slice())));
        }
        for (name, value) in &self.config.tokens {
            tokens.insert(name.as_str(), value.as_str());
        }

        tokens
    }

    /// Warn about, or with `strict_tokens` reject, tokens nothing will fill.
    fn check_tokens(&self, template: &Path, unknown: Vec<String>) -> Result<(), BuildError> {
        if unknown.is_empty() {
            return Ok(());
        }

        let tokens = unknown
            .iter()
            .map(|t| format!("[{}]", t))
            .collect::<Vec<_>>()
            .join(", ");

        if self.config.strict_tokens {
            return Err(BuildError::UnresolvedTokens {
                template: template.display().to_string(),
                tokens,
            });
        }

        tracing::warn!(
            "Leaving unresolved tokens in {}: {}",
            template.display(),
            tokens
        );
        Ok(())
    }

    /// Fail if any configured asset is missing from the source folder.
    fn check_assets(&self, copier: &AssetCopier) -> Result<(), BuildError> {
        for file in &self.config.links.asset_files {
            copier.check_file(file)?;
        }
        for dir in &self.config.links.asset_dirs {
            copier.check_dir(dir)?;
        }
        Ok(())
    }

    /// Copy configured asset files and directories. Returns the file count.
    fn copy_assets(&self, copier: &AssetCopier) -> Result<usize, BuildError> {
        let mut count = 0;

        for file in &self.config.links.asset_files {
            copier.copy_file(file)?;
            count += 1;
        }
        for dir in &self.config.links.asset_dirs {
            count += copier.copy_dir(dir)?;
        }

        tracing::debug!("Copied {} asset files", count);
        Ok(count)
    }
}

fn read_text(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|e| BuildError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

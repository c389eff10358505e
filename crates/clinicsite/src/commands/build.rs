//! Static site build command.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clinicsite_static::{
    BuildConfig, CardConfig, CardLayout, HomepageStatus, ListConfig, SiteBuilder,
};
use clinicsite_template::LinkRules;
use serde::Deserialize;

/// Configuration file structure (site.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    links: LinksConfig,
    #[serde(default)]
    cards: CardsConfig,
    #[serde(default)]
    lists: ListsConfig,
    #[serde(default)]
    static_lists: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    tokens: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct SiteConfig {
    #[serde(default = "default_data")]
    data: String,
    #[serde(default = "default_location_template")]
    location_template: String,
    #[serde(default = "default_home_template")]
    home_template: String,
    #[serde(default = "default_output")]
    output: String,
    #[serde(default = "default_locations_dir")]
    locations_dir: String,
    #[serde(default = "default_assets_dir")]
    assets_dir: String,
    #[serde(default)]
    strict_tokens: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data: default_data(),
            location_template: default_location_template(),
            home_template: default_home_template(),
            output: default_output(),
            locations_dir: default_locations_dir(),
            assets_dir: default_assets_dir(),
            strict_tokens: false,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct LinksConfig {
    /// Absolute brand URL, e.g. "https://www.sunrisedetox.com/"
    site_root: Option<String>,
    /// "" links home to the directory, "index.html" to the file
    #[serde(default)]
    home_page: String,
    anchors: Option<Vec<String>>,
    asset_files: Option<Vec<String>>,
    asset_dirs: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CardsConfig {
    /// Built-in layout name or a path to a minijinja card template
    #[serde(default = "default_layout")]
    layout: String,
    name_prefix: Option<String>,
    #[serde(default = "default_phone_cta")]
    phone_cta: String,
}

impl Default for CardsConfig {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            name_prefix: None,
            phone_cta: default_phone_cta(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ListsConfig {
    #[serde(default)]
    cities_empty: String,
    #[serde(default)]
    zips_empty: String,
    #[serde(default)]
    insurance_empty: String,
}

fn default_data() -> String {
    "data.json".to_string()
}
fn default_location_template() -> String {
    "location-template.html".to_string()
}
fn default_home_template() -> String {
    "index.html".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_locations_dir() -> String {
    "locations".to_string()
}
fn default_assets_dir() -> String {
    ".".to_string()
}
fn default_layout() -> String {
    "sunrise".to_string()
}
fn default_phone_cta() -> String {
    "Call Admissions".to_string()
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("{} not found, using defaults", path.display());
    Ok(ConfigFile::default())
}

/// Map the config file onto the builder's configuration.
///
/// Relative paths are resolved against `base`, the config file's directory.
fn build_config(
    file: ConfigFile,
    base: &Path,
    output: Option<PathBuf>,
    strict: bool,
) -> BuildConfig {
    let defaults = LinkRules::default();

    let links = LinkRules {
        site_root: file.links.site_root,
        home_page: file.links.home_page,
        anchors: file.links.anchors.unwrap_or(defaults.anchors),
        asset_files: file.links.asset_files.unwrap_or(defaults.asset_files),
        asset_dirs: file.links.asset_dirs.unwrap_or(defaults.asset_dirs),
    };

    let layout = match CardLayout::from_name(&file.cards.layout) {
        CardLayout::Custom(path) => CardLayout::Custom(base.join(path)),
        layout => layout,
    };

    let card = CardConfig {
        layout,
        name_prefix: file.cards.name_prefix,
        site_root: links.site_root.clone(),
        locations_dir: file.site.locations_dir.clone(),
        phone_cta: file.cards.phone_cta,
    };

    BuildConfig {
        data_file: base.join(&file.site.data),
        location_template: base.join(&file.site.location_template),
        home_template: base.join(&file.site.home_template),
        output_dir: output.unwrap_or_else(|| base.join(&file.site.output)),
        locations_dir: file.site.locations_dir,
        assets_dir: base.join(&file.site.assets_dir),
        links,
        card,
        lists: ListConfig {
            cities_empty: file.lists.cities_empty,
            zips_empty: file.lists.zips_empty,
            insurance_empty: file.lists.insurance_empty,
        },
        static_lists: file.static_lists,
        tokens: file.tokens,
        strict_tokens: strict || file.site.strict_tokens,
    }
}

/// Load `site.toml` from `config_path` and turn it into a build configuration.
pub fn resolve(config_path: &Path, output: Option<PathBuf>, strict: bool) -> Result<BuildConfig> {
    let file_config = load_config(config_path)?;
    let base = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    Ok(build_config(file_config, base, output, strict))
}

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, strict: bool) -> Result<()> {
    tracing::info!("Building static site...");

    let config = resolve(config_path, output, strict)?;
    let result = SiteBuilder::new(config).build()?;

    tracing::info!(
        "Built {} location pages and copied {} assets in {}ms",
        result.pages,
        result.assets,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    if let HomepageStatus::Skipped(e) = result.homepage {
        anyhow::bail!("Homepage was not built: {}", e);
    }

    tracing::info!("Build complete!");

    Ok(())
}

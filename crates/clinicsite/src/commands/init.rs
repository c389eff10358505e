//! Scaffold a brand folder.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Per-brand starting values for the generated site.toml.
struct Preset {
    layout: &'static str,
    brand_name: &'static str,
    site_root: &'static str,
    home_page: &'static str,
    insurance_empty: &'static str,
    /// Brand-wide lists: token, page heading, items
    static_lists: &'static [(&'static str, &'static str, &'static [&'static str])],
}

const COUNSELING_SERVICES: &[&str] = &[
    "Mental Health Services",
    "Individual Counseling",
    "Group Counseling",
    "Family Counseling",
    "Psychiatric Care",
    "Medication Management",
    "Telehealth",
];

const TREATMENT_PROGRAMS: &[&str] = &[
    "Spravato Treatment",
    "Medication-Assisted Treatment",
    "Substance Abuse IOP",
    "Mental Health IOP",
    "Outpatient Substance Abuse Treatment",
    "Adolescent Treatment",
    "Partial Hospitalization Program",
    "Veterans Program",
];

impl Preset {
    fn for_brand(brand: &str) -> Self {
        match brand {
            "evolve" => Self {
                layout: "evolve",
                brand_name: "Evolve Recovery Center",
                site_root: "https://www.evolverecoverycenter.com/",
                home_page: "index.html",
                insurance_empty: "<li>Please call for insurance verification.</li>",
                static_lists: &[],
            },
            "tcc" | "counseling" => Self {
                layout: "counseling",
                brand_name: "The Counseling Center",
                site_root: "https://www.thecounselingcenter.com/",
                home_page: "",
                insurance_empty: "",
                static_lists: &[
                    (
                        "COUNSELING_SERVICES_LIST",
                        "Counseling services",
                        COUNSELING_SERVICES,
                    ),
                    (
                        "TREATMENT_PROGRAMS_LIST",
                        "Treatment programs",
                        TREATMENT_PROGRAMS,
                    ),
                ],
            },
            _ => Self {
                layout: "sunrise",
                brand_name: "Sunrise Detox",
                site_root: "https://www.sunrisedetox.com/",
                home_page: "",
                insurance_empty: "",
                static_lists: &[],
            },
        }
    }

    fn config(&self) -> String {
        format!(
            r#"# clinicsite configuration

[site]
# Brand dataset and templates, relative to this file
data = "data.json"
location_template = "location-template.html"
home_template = "index.html"

# Output directory for the built site
output = "dist"

# Fail when a template token has no value
strict_tokens = false

[links]
# Absolute brand URL; links to it become relative in location pages
site_root = "{site_root}"

# "" links home to the directory, "index.html" to the file
home_page = "{home_page}"

[cards]
# sunrise, evolve, counseling, or a path to a minijinja template
layout = "{layout}"

# Removed from location names in card headers
name_prefix = "{brand_name} at "

[lists]
insurance_empty = "{insurance_empty}"

[static_lists]
# Brand-wide lists usable as [NAME] tokens in the location template
{static_lists}
[tokens]
BRAND_NAME = "{brand_name}"
"#,
            site_root = self.site_root,
            home_page = self.home_page,
            layout = self.layout,
            brand_name = self.brand_name,
            insurance_empty = self.insurance_empty,
            static_lists = self.static_lists_toml(),
        )
    }

    fn static_lists_toml(&self) -> String {
        if self.static_lists.is_empty() {
            return "# SERVICES_LIST = [\"Medical Detox\", \"Residential Treatment\"]\n".to_string();
        }

        self.static_lists
            .iter()
            .map(|(token, _, items)| {
                let items = items
                    .iter()
                    .map(|item| format!("    \"{}\",\n", item))
                    .collect::<String>();
                format!("{} = [\n{}]\n", token, items)
            })
            .collect()
    }

    /// Location template with a section for each brand-wide list.
    fn location_template(&self) -> String {
        let sections = self
            .static_lists
            .iter()
            .map(|(token, heading, _)| {
                format!("    <h2>{}</h2>\n    <ul>\n[{}]\n    </ul>\n\n", heading, token)
            })
            .collect::<String>();

        DEFAULT_LOCATION_TEMPLATE.replace("  </main>", &format!("{}  </main>", sections))
    }

    fn data(&self) -> String {
        format!(
            r#"{{
  "brand": {{
    "url": "{site_root}",
    "telephone": "888-555-0100"
  }},
  "locations": [
    {{
      "name": "{brand_name} at Atlanta",
      "url": "{site_root}locations/atlanta",
      "streetAddress": "100 Peachtree St",
      "addressLocality": "Atlanta",
      "addressRegion": "GA",
      "postalCode": "30303",
      "latitude": 33.749,
      "longitude": -84.388,
      "image": "{site_root}images/atlanta.jpg",
      "gmb_link": "https://maps.google.com/?cid=1",
      "gmb_embed_url": "https://www.google.com/maps/embed?pb=1",
      "areasServed": {{
        "cities": ["Decatur", "Marietta"],
        "zips": ["30303", "30030"]
      }},
      "insuranceList": ["Aetna", "Cigna"]
    }}
  ]
}}
"#,
            site_root = self.site_root,
            brand_name = self.brand_name,
        )
    }
}

/// Run the init command.
pub async fn run(brand: Option<String>, yes: bool) -> Result<()> {
    tracing::info!("Initializing clinicsite...");

    let dir = brand.as_deref().unwrap_or(".");
    let preset = Preset::for_brand(brand.as_deref().unwrap_or_default());

    if !scaffold(Path::new(dir), &preset, yes)? {
        tracing::warn!("site.toml already exists in {}. Use --yes to overwrite.", dir);
        return Ok(());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'clinicsite build' in {} to build the site.", dir);

    Ok(())
}

/// Write the brand files into `dir`. Returns false if a config already exists
/// and `overwrite` is not set.
fn scaffold(dir: &Path, preset: &Preset, overwrite: bool) -> Result<bool> {
    let config_path = dir.join("site.toml");
    if config_path.exists() && !overwrite {
        return Ok(false);
    }

    fs::create_dir_all(dir.join("images")).context("Failed to create images directory")?;

    let config = preset.config();
    let data = preset.data();
    let location_template = preset.location_template();
    let files: [(&str, &str); 6] = [
        ("site.toml", config.as_str()),
        ("data.json", data.as_str()),
        ("location-template.html", location_template.as_str()),
        ("index.html", DEFAULT_HOME_TEMPLATE),
        ("style.css", DEFAULT_STYLE),
        ("script.js", DEFAULT_SCRIPT),
    ];

    for (name, contents) in files {
        let path = dir.join(name);
        if !path.exists() || overwrite {
            fs::write(&path, contents).with_context(|| format!("Failed to write {}", name))?;
            tracing::info!("Created {}", path.display());
        }
    }

    Ok(true)
}

const DEFAULT_LOCATION_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>[LOCATION_NAME] | [LOCATION_CITY], [LOCATION_STATE]</title>
  <link rel="canonical" href="[LOCATION_URL]">
  <link href="style.css" rel="stylesheet">
</head>
<body>
  <header id="top">
    <a href="#top"><img src="images/logo.svg" alt="[BRAND_NAME]"></a>
    <nav>
      <a href="#locations-full">Locations</a>
      <a href="#insurance">Insurance</a>
      <a href="tel:[LOCATION_PHONE]">[LOCATION_PHONE]</a>
    </nav>
  </header>

  <main itemscope itemtype="https://schema.org/MedicalClinic">
    <h1 itemprop="name">[LOCATION_NAME]</h1>
    <img src="[LOCATION_IMAGE_URL]" alt="[LOCATION_NAME]">

    <p itemprop="address">
      [LOCATION_ADDRESS_STREET]<br>
      [LOCATION_CITY], [LOCATION_STATE] [LOCATION_ADDRESS_POSTAL]
    </p>
    <div itemprop="geo" itemscope itemtype="https://schema.org/GeoCoordinates">
      <meta itemprop="latitude" content="[LOCATION_GEO_LAT]">
      <meta itemprop="longitude" content="[LOCATION_GEO_LONG]">
    </div>

    <a href="[LOCATION_GMB_URL]">Get directions</a>
    <iframe src="[LOCATION_GMB_EMBED_URL]" loading="lazy"></iframe>

    <h2>Cities served</h2>
    <ul>
[AREAS_SERVED_CITIES_LIST]
    </ul>

    <h2>Zip codes served</h2>
    <ul>
[AREAS_SERVED_ZIPS_LIST]
    </ul>

    <h2>Insurance accepted</h2>
    <ul>
[INSURANCE_LIST_HTML]
    </ul>
  </main>

  <script src="script.js"></script>
</body>
</html>
"##;

const DEFAULT_HOME_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Locations</title>
  <link rel="canonical" href="[CANONICAL_URL_FOR_BRAND_PAGE]">
  <link href="style.css" rel="stylesheet">
</head>
<body>
  <section id="locations-full">
    <h2>Our Locations</h2>
    <div class="all-locations-grid">
      <article class="location-card">
        <div class="location-card-header">Location cards are generated here</div>
      </article>
    </div>
  </section>

  <section id="insurance">
    <h2>Insurance</h2>
  </section>

  <script src="script.js"></script>
</body>
</html>
"#;

const DEFAULT_STYLE: &str = r#".all-locations-grid {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
  gap: 1.5rem;
}

.location-card-header {
  font-weight: 600;
}

.visually-hidden {
  position: absolute;
  width: 1px;
  height: 1px;
  overflow: hidden;
  clip: rect(0 0 0 0);
}
"#;

const DEFAULT_SCRIPT: &str = r#"document.addEventListener("DOMContentLoaded", () => {
  const images = document.querySelectorAll("img.lazy-load");
  const observer = new IntersectionObserver((entries) => {
    entries.forEach((entry) => {
      if (entry.isIntersecting) {
        entry.target.src = entry.target.dataset.src;
        observer.unobserve(entry.target);
      }
    });
  });
  images.forEach((img) => observer.observe(img));
});
"#;

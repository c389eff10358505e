//! Homepage location cards.
//!
//! Each brand has a fixed card layout rendered with minijinja. Values are
//! inserted verbatim, the same way location page tokens are.

use std::fs;
use std::path::PathBuf;

use minijinja::{AutoEscape, Environment};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use clinicsite_data::{Brand, Location};

/// Characters JavaScript's `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const UBER_URL: &str =
    "https://m.uber.com/ul/?action=setPickup&pickup=my_location&dropoff[formatted_address]=";
const LYFT_URL: &str = "https://www.lyft.com/ride-with-lyft?destination=";

const CARD_TEMPLATE: &str = "card.html";

/// Card layout used for the homepage grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CardLayout {
    /// Image, header, address and page link
    #[default]
    Sunrise,
    /// Image, header and page link
    Evolve,
    /// Address, phone, ride-share links and served-area text
    Counseling,
    /// A brand-supplied minijinja template file
    Custom(PathBuf),
}

impl CardLayout {
    /// Parse a built-in layout name, treating anything else as a template path.
    pub fn from_name(name: &str) -> Self {
        match name {
            "sunrise" => Self::Sunrise,
            "evolve" => Self::Evolve,
            "counseling" | "tcc" => Self::Counseling,
            path => Self::Custom(PathBuf::from(path)),
        }
    }
}

/// Per-brand card settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardConfig {
    pub layout: CardLayout,

    /// Removed from location names in card headers ("Sunrise Detox at ")
    pub name_prefix: Option<String>,

    /// Absolute site URL stripped from image URLs to make them root-relative
    pub site_root: Option<String>,

    /// Directory holding location pages, used for card links
    pub locations_dir: String,

    /// Link text shown when a location has no phone of its own
    pub phone_cta: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            layout: CardLayout::default(),
            name_prefix: None,
            site_root: None,
            locations_dir: "locations".to_string(),
            phone_cta: "Call Admissions".to_string(),
        }
    }
}

/// Errors that can occur while building cards.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("Failed to read card template {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to render card: {0}")]
    RenderError(#[from] minijinja::Error),
}

/// Values available to card templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CardContext {
    pub slug: String,
    pub page_url: String,
    pub name: String,
    pub display_name: String,
    pub image: String,
    pub image_path: String,
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal: String,
    pub phone_link: String,
    pub phone_text: String,
    pub full_address: String,
    pub uber_url: String,
    pub lyft_url: String,
    pub cities: Vec<String>,
    pub zips: Vec<String>,
    pub cities_joined: String,
    pub zips_joined: String,
    pub lazy_pixel: &'static str,
}

/// Renders one grid card per location.
pub struct CardBuilder {
    env: Environment<'static>,
    config: CardConfig,
}

impl CardBuilder {
    pub fn new(config: CardConfig) -> Result<Self, CardError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let source = match &config.layout {
            CardLayout::Sunrise => SUNRISE_CARD.to_string(),
            CardLayout::Evolve => EVOLVE_CARD.to_string(),
            CardLayout::Counseling => COUNSELING_CARD.to_string(),
            CardLayout::Custom(path) => {
                fs::read_to_string(path).map_err(|e| CardError::ReadError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
        };

        env.add_template_owned(CARD_TEMPLATE.to_string(), source)?;

        Ok(Self { env, config })
    }

    /// Collect the card values for one location.
    pub fn context(&self, location: &Location, brand: &Brand, slug: &str) -> CardContext {
        let display_name = self
            .config
            .name_prefix
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| location.name.replacen(p, "", 1))
            .unwrap_or_else(|| location.name.clone());

        let image_path = self
            .config
            .site_root
            .as_deref()
            .filter(|r| !r.is_empty())
            .and_then(|r| location.image.strip_prefix(r))
            .unwrap_or(location.image.as_str())
            .to_string();

        let full_address = location.full_address();
        let encoded_address = encode_uri_component(&full_address);

        let cities = location.cities().map(<[String]>::to_vec).unwrap_or_default();
        let zips = location.zips().map(<[String]>::to_vec).unwrap_or_default();

        CardContext {
            slug: slug.to_string(),
            page_url: format!("{}/{}/", self.config.locations_dir, slug),
            name: location.name.clone(),
            display_name,
            image: location.image.clone(),
            image_path,
            street: location.street_address.clone(),
            city: location.address_locality.clone(),
            region: location.address_region.clone(),
            postal: location.postal_code.to_string(),
            phone_link: location.phone_or(brand).to_string(),
            phone_text: location
                .telephone()
                .unwrap_or(self.config.phone_cta.as_str())
                .to_string(),
            uber_url: format!("{UBER_URL}{encoded_address}"),
            lyft_url: format!("{LYFT_URL}{encoded_address}"),
            full_address,
            cities_joined: cities.join(", "),
            zips_joined: zips.join(", "),
            cities,
            zips,
            lazy_pixel: LAZY_PIXEL,
        }
    }

    /// Render the card for one location.
    pub fn render(
        &self,
        location: &Location,
        brand: &Brand,
        slug: &str,
    ) -> Result<String, CardError> {
        let tmpl = self.env.get_template(CARD_TEMPLATE)?;
        Ok(tmpl.render(self.context(location, brand, slug))?)
    }
}

/// Percent-encode like JavaScript's `encodeURIComponent`.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

const LAZY_PIXEL: &str = "data:image/gif;base64,R0lGODlhAQABAIAAAP///wAAACH5BAEAAAAALAAAAAABAAEAAAICRAEAOw==";

const SUNRISE_CARD: &str = r#"
    <article id="{{ slug }}-card" class="location-card">
        <div class="location-card-image-wrapper">
            <img data-src="{{ image_path }}" class="lazy-load" alt="{{ name }} Facility" width="100%" height="100%" src="{{ lazy_pixel }}">
            <div class="location-card-header">{{ display_name }}</div>
        </div>
        <div class="location-card-content">
            <p>{{ street }}<br>{{ city }}, {{ region }} {{ postal }}</p>

            <a href="{{ page_url }}" class="btn btn-primary location-card-cta">View Location Page</a>
        </div>
    </article>
    "#;

const EVOLVE_CARD: &str = r#"
    <article id="{{ slug }}-card" class="location-card">
        <div class="location-card-image-wrapper">
            <img data-src="{{ image_path }}" class="lazy-load" alt="{{ name }} Facility" width="100%" height="100%" src="{{ lazy_pixel }}">
            <div class="location-card-header">{{ display_name }}</div>
        </div>
        <div class="location-card-content">
            <a href="{{ page_url }}" class="btn btn-primary location-card-cta">View Location Page</a>
        </div>
    </article>
    "#;

const COUNSELING_CARD: &str = r##"
    <article class="location-card">
        <div class="location-card-image-wrapper">
            <img data-src="{{ image_path }}" class="lazy-load" alt="{{ name }}" src="{{ lazy_pixel }}">
            <div class="location-card-header">{{ display_name }}</div>
        </div>
        <div class="location-card-content">
            <p class="location-address">
                <span>{{ street }}</span>
                <span>{{ city }}, {{ region }} {{ postal }}</span>
            </p>
            <p class="location-phone"><strong>Phone:</strong> <a href="tel:{{ phone_link }}">{{ phone_text }}</a></p>
            <a href="{{ page_url }}" class="btn btn-primary location-card-cta">View Location Page</a>

            <p class="ride-title">Request a Ride</p>
            <div class="ride-links">
                <a href="{{ uber_url }}" target="_blank" class="ride-link" aria-label="Request a ride with Uber">
                    <svg viewBox="0 0 256 256" fill="#000000"><path d="M211.314 133.028c-2.42-3.13-5.26-5.83-8.42-7.98-29.04-19.74-63.63-31.54-100.99-31.54-37.37 0-71.95 11.8-100.99 31.54-3.17 2.15-5.99 4.85-8.42 7.98C-3.1 169.328-3.1 213.6 1.8 231.18c.06.21.14.42.21.63 2.22 6.57 28.97 24.19 123.9 24.19s121.68-17.62 123.9-24.19c.07-.21.15-.42.21-.63 4.9-17.58 4.9-61.85-10.71-98.15z"/></svg>
                </a>
                <a href="{{ lyft_url }}" target="_blank" class="ride-link" aria-label="Request a ride with Lyft">
                    <svg viewBox="0 0 24 24" fill="#FF00BF"><path d="M21.1 12.6C19 11.5 17.4 9.2 17.4 6.7C17.4 3 14.4 0 10.8 0C7.1 0 4.1 3 4.1 6.7C4.1 9.2 2.5 11.5 0.4 12.6C0.2 12.7 0 13 0 13.4V16.9C0 17.3 0.2 17.6 0.5 17.7C1.4 18.2 2.8 18.6 4.4 18.6C4.8 18.6 5.1 18.3 5.1 17.9V14.8C5.1 14.4 5.4 14.1 5.8 14.1H15.6C16 14.1 16.3 14.4 16.3 14.8V17.9C16.3 18.3 16.6 18.6 17 18.6C18.6 18.6 20 18.2 20.9 17.7C21.2 17.6 21.4 17.3 21.4 16.9V13.4C21.4 13 21.2 12.7 21.1 12.6Z"/></svg>
                </a>
            </div>
            <p class="visually-hidden">
                Outpatient counseling services for {{ city }}, {{ region }} and surrounding towns including {{ cities_joined }}. We serve zip codes {{ zips_joined }}.
            </p>
        </div>
    </article>
    "##;

#[cfg(test)]
mod tests {
    use super::*;
    use clinicsite_data::{AreasServed, Scalar};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn location() -> Location {
        Location {
            name: "Sunrise Detox at Cherry Hill".to_string(),
            url: "https://www.sunrisedetox.com/locations/cherry_hill".to_string(),
            street_address: "2091 Springdale Rd".to_string(),
            address_locality: "Cherry Hill".to_string(),
            address_region: "NJ".to_string(),
            postal_code: Scalar::new("08003"),
            latitude: Scalar::new("39.9"),
            longitude: Scalar::new("-74.9"),
            image: "https://www.sunrisedetox.com/images/cherry-hill.jpg".to_string(),
            gmb_link: String::new(),
            gmb_embed_url: String::new(),
            telephone: None,
            areas_served: Some(AreasServed {
                cities: Some(vec!["Voorhees".to_string(), "Marlton".to_string()]),
                zips: Some(vec!["08002".to_string(), "08034".to_string()]),
            }),
            insurance_list: None,
        }
    }

    fn brand() -> Brand {
        Brand {
            url: "https://www.sunrisedetox.com/".to_string(),
            telephone: "888-443-3869".to_string(),
        }
    }

    fn config(layout: CardLayout) -> CardConfig {
        CardConfig {
            layout,
            name_prefix: Some("Sunrise Detox at ".to_string()),
            site_root: Some("https://www.sunrisedetox.com/".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(
            encode_uri_component("2091 Springdale Rd Cherry Hill NJ 08003"),
            "2091%20Springdale%20Rd%20Cherry%20Hill%20NJ%2008003"
        );
        assert_eq!(encode_uri_component("a&b/c#d"), "a%26b%2Fc%23d");
        assert_eq!(encode_uri_component("it's (ok)!*~._-"), "it's%20(ok)!*~._-");
    }

    #[test]
    fn sunrise_card_strips_prefix_and_site_root() {
        let builder = CardBuilder::new(config(CardLayout::Sunrise)).unwrap();

        let html = builder.render(&location(), &brand(), "cherry_hill").unwrap();

        assert!(html.contains(r#"<article id="cherry_hill-card" class="location-card">"#));
        assert!(html.contains(r#"data-src="images/cherry-hill.jpg""#));
        assert!(html.contains(r#"<div class="location-card-header">Cherry Hill</div>"#));
        assert!(html.contains("2091 Springdale Rd<br>Cherry Hill, NJ 08003"));
        assert!(html.contains(r#"href="locations/cherry_hill/""#));
    }

    #[test]
    fn counseling_card_has_phone_cta_and_ride_links() {
        let builder = CardBuilder::new(config(CardLayout::Counseling)).unwrap();

        let html = builder.render(&location(), &brand(), "cherry_hill").unwrap();

        assert!(html.contains(r#"<a href="tel:888-443-3869">Call Admissions</a>"#));
        assert!(html.contains(
            "dropoff[formatted_address]=2091%20Springdale%20Rd%20Cherry%20Hill%20NJ%2008003"
        ));
        assert!(html.contains(
            "ride-with-lyft?destination=2091%20Springdale%20Rd%20Cherry%20Hill%20NJ%2008003"
        ));
        assert!(html.contains("surrounding towns including Voorhees, Marlton."));
        assert!(html.contains("We serve zip codes 08002, 08034."));
    }

    #[test]
    fn own_phone_replaces_call_to_action() {
        let builder = CardBuilder::new(config(CardLayout::Counseling)).unwrap();
        let mut loc = location();
        loc.telephone = Some("856-555-0100".to_string());

        let ctx = builder.context(&loc, &brand(), "cherry_hill");

        assert_eq!(ctx.phone_link, "856-555-0100");
        assert_eq!(ctx.phone_text, "856-555-0100");
    }

    #[test]
    fn counseling_card_tolerates_missing_areas() {
        let builder = CardBuilder::new(config(CardLayout::Counseling)).unwrap();
        let mut loc = location();
        loc.areas_served = None;

        let ctx = builder.context(&loc, &brand(), "cherry_hill");

        assert!(ctx.cities.is_empty());
        assert_eq!(ctx.zips_joined, "");
        assert!(builder.render(&loc, &brand(), "cherry_hill").is_ok());
    }

    #[test]
    fn values_are_not_html_escaped() {
        let builder = CardBuilder::new(config(CardLayout::Evolve)).unwrap();
        let mut loc = location();
        loc.name = "Sunrise Detox at Smith & Wesson's".to_string();

        let html = builder.render(&loc, &brand(), "sw").unwrap();

        assert!(html.contains("Smith & Wesson's</div>"));
    }

    #[test]
    fn renders_custom_layout_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("card.html");
        fs::write(&path, "<li data-slug=\"{{ slug }}\">{{ display_name }}</li>").unwrap();

        let builder = CardBuilder::new(config(CardLayout::Custom(path))).unwrap();

        assert_eq!(
            builder.render(&location(), &brand(), "cherry_hill").unwrap(),
            "<li data-slug=\"cherry_hill\">Cherry Hill</li>"
        );
    }

    #[test]
    fn missing_custom_layout_is_an_error() {
        let result = CardBuilder::new(config(CardLayout::Custom(PathBuf::from(
            "/nonexistent/card.html",
        ))));

        assert!(matches!(result, Err(CardError::ReadError { .. })));
    }

    #[test]
    fn parses_layout_names() {
        assert_eq!(CardLayout::from_name("evolve"), CardLayout::Evolve);
        assert_eq!(CardLayout::from_name("tcc"), CardLayout::Counseling);
        assert_eq!(
            CardLayout::from_name("cards/custom.html"),
            CardLayout::Custom(PathBuf::from("cards/custom.html"))
        );
    }
}

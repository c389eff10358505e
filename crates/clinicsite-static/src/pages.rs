//! Location page rendering.

use clinicsite_data::{Brand, Location};
use clinicsite_template::{LinkRewriter, ListBuilder, Rendered, Template, TokenMap};

/// Token names understood by location page templates.
pub mod token {
    pub const LOCATION_NAME: &str = "LOCATION_NAME";
    pub const LOCATION_CITY: &str = "LOCATION_CITY";
    pub const LOCATION_STATE: &str = "LOCATION_STATE";
    pub const LOCATION_PHONE: &str = "LOCATION_PHONE";
    pub const LOCATION_URL: &str = "LOCATION_URL";
    pub const LOCATION_IMAGE_URL: &str = "LOCATION_IMAGE_URL";
    pub const LOCATION_ADDRESS_STREET: &str = "LOCATION_ADDRESS_STREET";
    pub const LOCATION_ADDRESS_POSTAL: &str = "LOCATION_ADDRESS_POSTAL";
    pub const LOCATION_GEO_LAT: &str = "LOCATION_GEO_LAT";
    pub const LOCATION_GEO_LONG: &str = "LOCATION_GEO_LONG";
    pub const LOCATION_GMB_URL: &str = "LOCATION_GMB_URL";
    pub const LOCATION_GMB_EMBED_URL: &str = "LOCATION_GMB_EMBED_URL";
    pub const AREAS_SERVED_CITIES_LIST: &str = "AREAS_SERVED_CITIES_LIST";
    pub const AREAS_SERVED_ZIPS_LIST: &str = "AREAS_SERVED_ZIPS_LIST";
    pub const INSURANCE_LIST_HTML: &str = "INSURANCE_LIST_HTML";

    /// Every per-location token.
    pub const ALL: &[&str] = &[
        LOCATION_NAME,
        LOCATION_CITY,
        LOCATION_STATE,
        LOCATION_PHONE,
        LOCATION_URL,
        LOCATION_IMAGE_URL,
        LOCATION_ADDRESS_STREET,
        LOCATION_ADDRESS_POSTAL,
        LOCATION_GEO_LAT,
        LOCATION_GEO_LONG,
        LOCATION_GMB_URL,
        LOCATION_GMB_EMBED_URL,
        AREAS_SERVED_CITIES_LIST,
        AREAS_SERVED_ZIPS_LIST,
        INSURANCE_LIST_HTML,
    ];
}

/// Empty-state fragments for the per-location lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListConfig {
    pub cities_empty: String,
    pub zips_empty: String,
    pub insurance_empty: String,
}

/// Renders location pages from a single pre-processed template.
#[derive(Debug, Clone)]
pub struct LocationPageRenderer {
    template: Template,
    brand_tokens: TokenMap,
    cities: ListBuilder,
    zips: ListBuilder,
    insurance: ListBuilder,
}

impl LocationPageRenderer {
    /// Parse `source` and rewrite its literal links once for every page.
    ///
    /// `brand_tokens` holds values shared by all locations, such as static
    /// service lists.
    pub fn new(
        source: &str,
        rewriter: &LinkRewriter,
        lists: &ListConfig,
        brand_tokens: TokenMap,
    ) -> Self {
        let template = Template::parse(source).map_literals(|text| rewriter.rewrite(text));

        Self {
            template,
            brand_tokens,
            cities: ListBuilder::with_empty(lists.cities_empty.clone()),
            zips: ListBuilder::with_empty(lists.zips_empty.clone()),
            insurance: ListBuilder::with_empty(lists.insurance_empty.clone()),
        }
    }

    /// Tokens in the template that no location will ever provide.
    pub fn unknown_tokens(&self) -> Vec<String> {
        self.template
            .tokens()
            .into_iter()
            .filter(|t| !token::ALL.contains(t) && !self.brand_tokens.contains(t))
            .map(str::to_string)
            .collect()
    }

    /// Token values for one location.
    pub fn tokens_for(&self, location: &Location, brand: &Brand) -> TokenMap {
        let mut values = TokenMap::new();
        values.extend(&self.brand_tokens);

        values
            .insert(token::LOCATION_NAME, location.name.as_str())
            .insert(token::LOCATION_CITY, location.address_locality.as_str())
            .insert(token::LOCATION_STATE, location.address_region.as_str())
            .insert(token::LOCATION_PHONE, location.phone_or(brand))
            .insert(token::LOCATION_URL, location.url.as_str())
            .insert(token::LOCATION_IMAGE_URL, location.image.as_str())
            .insert(token::LOCATION_ADDRESS_STREET, location.street_address.as_str())
            .insert(token::LOCATION_ADDRESS_POSTAL, location.postal_code.as_str())
            .insert(token::LOCATION_GEO_LAT, location.latitude.as_str())
            .insert(token::LOCATION_GEO_LONG, location.longitude.as_str())
            .insert(token::LOCATION_GMB_URL, location.gmb_link.as_str())
            .insert(token::LOCATION_GMB_EMBED_URL, location.gmb_embed_url.as_str())
            .insert(
                token::AREAS_SERVED_CITIES_LIST,
                self.cities.build(location.cities()),
            )
            .insert(
                token::AREAS_SERVED_ZIPS_LIST,
                self.zips.build(location.zips()),
            )
            .insert(
                token::INSURANCE_LIST_HTML,
                self.insurance.build(location.insurance()),
            );

        values
    }

    /// Render the page for one location.
    pub fn render(&self, location: &Location, brand: &Brand) -> Rendered {
        self.template.render(&self.tokens_for(location, brand))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicsite_data::{AreasServed, Scalar};
    use clinicsite_template::LinkRules;
    use pretty_assertions::assert_eq;

    fn sample_location() -> Location {
        Location {
            name: "The Counseling Center at Wakefield".to_string(),
            url: "https://www.thecounselingcenter.com/locations/wakefield".to_string(),
            street_address: "1 Main St".to_string(),
            address_locality: "Wakefield".to_string(),
            address_region: "RI".to_string(),
            postal_code: Scalar::new("02879"),
            latitude: Scalar::new("41.43"),
            longitude: Scalar::new("-71.5"),
            image: "https://www.thecounselingcenter.com/images/wakefield.jpg".to_string(),
            gmb_link: "https://maps.google.com/?cid=42".to_string(),
            gmb_embed_url: "https://www.google.com/maps/embed?pb=42".to_string(),
            telephone: None,
            areas_served: Some(AreasServed {
                cities: Some(vec!["Narragansett".to_string(), "Kingston".to_string()]),
                zips: Some(vec!["02882".to_string()]),
            }),
            insurance_list: None,
        }
    }

    fn brand() -> Brand {
        Brand {
            url: "https://www.thecounselingcenter.com/".to_string(),
            telephone: "866-850-5001".to_string(),
        }
    }

    fn renderer(source: &str, lists: &ListConfig, brand_tokens: TokenMap) -> LocationPageRenderer {
        let rewriter = LinkRewriter::new(&LinkRules::default(), "../../").unwrap();
        LocationPageRenderer::new(source, &rewriter, lists, brand_tokens)
    }

    #[test]
    fn replaces_every_location_token() {
        let source = token::ALL
            .iter()
            .map(|t| format!("[{t}]|[{t}]"))
            .collect::<Vec<_>>()
            .join("\n");

        let rendered = renderer(&source, &ListConfig::default(), TokenMap::new())
            .render(&sample_location(), &brand());

        assert!(rendered.unresolved.is_empty());
        for t in token::ALL {
            assert!(!rendered.html.contains(&format!("[{t}]")), "{t} left in output");
        }
    }

    #[test]
    fn phone_falls_back_to_brand() {
        let r = renderer("[LOCATION_PHONE]", &ListConfig::default(), TokenMap::new());

        let mut loc = sample_location();
        assert_eq!(r.render(&loc, &brand()).html, "866-850-5001");

        loc.telephone = Some("401-555-0100".to_string());
        assert_eq!(r.render(&loc, &brand()).html, "401-555-0100");
    }

    #[test]
    fn builds_list_tokens_with_configured_empty_state() {
        let lists = ListConfig {
            insurance_empty: "<li>Please call for insurance verification.</li>".to_string(),
            ..Default::default()
        };
        let r = renderer(
            "<ul>[AREAS_SERVED_CITIES_LIST]</ul><ul>[INSURANCE_LIST_HTML]</ul>",
            &lists,
            TokenMap::new(),
        );

        let html = r.render(&sample_location(), &brand()).html;

        assert_eq!(
            html,
            "<ul><li>Narragansett</li>\n<li>Kingston</li></ul><ul><li>Please call for insurance verification.</li></ul>"
        );
    }

    #[test]
    fn substitutes_brand_tokens_and_reports_unknown() {
        let mut brand_tokens = TokenMap::new();
        brand_tokens.insert("COUNSELING_SERVICES_LIST", "<li>Telehealth</li>");
        let r = renderer(
            "[COUNSELING_SERVICES_LIST][TREATMENT_PROGRAMS_LIST]",
            &ListConfig::default(),
            brand_tokens,
        );

        assert_eq!(r.unknown_tokens(), vec!["TREATMENT_PROGRAMS_LIST".to_string()]);
        assert_eq!(
            r.render(&sample_location(), &brand()).html,
            "<li>Telehealth</li>[TREATMENT_PROGRAMS_LIST]"
        );
    }

    #[test]
    fn rewrites_template_links_but_not_data() {
        let mut loc = sample_location();
        loc.image = "images/wakefield.jpg".to_string();
        let r = renderer(
            r#"<link href="style.css"><img src="images/logo.png"><img src="[LOCATION_IMAGE_URL]">"#,
            &ListConfig::default(),
            TokenMap::new(),
        );

        assert_eq!(
            r.render(&loc, &brand()).html,
            r#"<link href="../../style.css"><img src="../../images/logo.png"><img src="images/wakefield.jpg">"#
        );
    }
}

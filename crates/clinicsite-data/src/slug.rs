//! Output directory slugs for location pages.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::load::DataError;
use crate::model::Location;

/// Derive the directory slug for a location.
///
/// Uses the last non-empty path segment of the location URL, percent-decoded
/// so the directory name matches the path a browser requests. A URL with no
/// path falls back to the lower-cased city with whitespace removed.
pub fn location_slug(location: &Location) -> Result<String, DataError> {
    let slug = match trailing_segment(&location.url) {
        Some(segment) => segment,
        None => location
            .address_locality
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect(),
    };

    if slug.is_empty() {
        return Err(DataError::EmptySlug {
            name: location.name.clone(),
        });
    }

    // The slug becomes one directory under the locations folder
    if slug == "." || slug == ".." || slug.contains(['/', '\\']) {
        return Err(DataError::InvalidSlug {
            name: location.name.clone(),
            slug,
        });
    }

    Ok(slug)
}

/// Last non-empty path segment of `raw`, ignoring query and fragment.
fn trailing_segment(raw: &str) -> Option<String> {
    let segment = match Url::parse(raw) {
        Ok(url) => url
            .path_segments()?
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string)?,
        // Relative URLs such as "locations/alpharetta" still carry a usable path
        Err(_) => raw
            .split(['?', '#'])
            .next()
            .unwrap_or("")
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string)?,
    };

    let decoded = percent_decode_str(&segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.clone());

    Some(decoded)
}

impl Location {
    /// See [`location_slug`].
    pub fn slug(&self) -> Result<String, DataError> {
        location_slug(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scalar;
    use pretty_assertions::assert_eq;

    fn location(url: &str, city: &str) -> Location {
        Location {
            name: "Test Location".to_string(),
            url: url.to_string(),
            street_address: "1 Main St".to_string(),
            address_locality: city.to_string(),
            address_region: "GA".to_string(),
            postal_code: Scalar::new("30000"),
            latitude: Scalar::new("0"),
            longitude: Scalar::new("0"),
            image: String::new(),
            gmb_link: String::new(),
            gmb_embed_url: String::new(),
            telephone: None,
            areas_served: None,
            insurance_list: None,
        }
    }

    #[test]
    fn uses_trailing_path_segment_exactly() {
        let loc = location(
            "https://www.sunrisedetox.com/locations/alpharetta_georgia",
            "Alpharetta",
        );
        assert_eq!(loc.slug().unwrap(), "alpharetta_georgia");
    }

    #[test]
    fn ignores_trailing_slash_query_and_fragment() {
        let loc = location(
            "https://www.example.com/locations/Cherry-Hill/?utm=1#map",
            "Cherry Hill",
        );
        assert_eq!(loc.slug().unwrap(), "Cherry-Hill");
    }

    #[test]
    fn falls_back_to_city_without_any_spaces() {
        let loc = location("https://www.example.com/", "Saint Johns River");
        assert_eq!(loc.slug().unwrap(), "saintjohnsriver");
    }

    #[test]
    fn accepts_relative_urls() {
        let loc = location("locations/marietta", "Marietta");
        assert_eq!(loc.slug().unwrap(), "marietta");
    }

    #[test]
    fn decodes_non_ascii_and_spaces() {
        let loc = location("https://www.example.com/locations/são-paulo", "São Paulo");
        assert_eq!(loc.slug().unwrap(), "são-paulo");

        let loc = location("https://www.example.com/locations/cherry hill", "Cherry Hill");
        assert_eq!(loc.slug().unwrap(), "cherry hill");

        let loc = location("https://www.example.com/locations/s%C3%A3o-paulo/", "São Paulo");
        assert_eq!(loc.slug().unwrap(), "são-paulo");
    }

    #[test]
    fn rejects_dot_segments() {
        for (url, city) in [
            ("locations/..", "Atlanta"),
            ("../", "Atlanta"),
            ("https://www.example.com/", "."),
            ("https://www.example.com/", ".."),
            ("https://www.example.com/locations/a%2F..", "Atlanta"),
        ] {
            let loc = location(url, city);
            assert!(
                matches!(loc.slug(), Err(DataError::InvalidSlug { .. })),
                "{url} / {city} accepted"
            );
        }
    }

    #[test]
    fn rejects_location_without_any_slug_source() {
        let loc = location("https://www.example.com", "  ");
        assert!(matches!(loc.slug(), Err(DataError::EmptySlug { .. })));
    }
}

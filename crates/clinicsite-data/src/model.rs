//! Dataset types deserialized from a brand's JSON file.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// Root of a brand data file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BrandDataset {
    /// Brand-level values
    pub brand: Brand,

    /// Locations in display order
    pub locations: Vec<Location>,
}

/// Brand-level values shared by every location.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Brand {
    /// Canonical homepage URL
    pub url: String,

    /// Fallback phone number for locations without their own
    pub telephone: String,
}

/// One physical facility.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,

    /// Full canonical URL; its trailing path segment is the page slug
    pub url: String,

    pub street_address: String,
    pub address_locality: String,
    pub address_region: String,
    pub postal_code: Scalar,
    pub latitude: Scalar,
    pub longitude: Scalar,

    /// Absolute image URL
    pub image: String,

    #[serde(rename = "gmb_link")]
    pub gmb_link: String,

    #[serde(rename = "gmb_embed_url")]
    pub gmb_embed_url: String,

    #[serde(default)]
    pub telephone: Option<String>,

    #[serde(default)]
    pub areas_served: Option<AreasServed>,

    #[serde(default)]
    pub insurance_list: Option<Vec<String>>,
}

/// Cities and zip codes a location serves.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AreasServed {
    #[serde(default)]
    pub cities: Option<Vec<String>>,

    #[serde(default)]
    pub zips: Option<Vec<String>>,
}

impl Location {
    /// The location's own phone number, if it has a non-empty one.
    pub fn telephone(&self) -> Option<&str> {
        self.telephone.as_deref().filter(|t| !t.is_empty())
    }

    /// The location's phone number, falling back to the brand's.
    pub fn phone_or<'a>(&'a self, brand: &'a Brand) -> &'a str {
        self.telephone().unwrap_or(&brand.telephone)
    }

    /// Served cities, if the data lists any.
    pub fn cities(&self) -> Option<&[String]> {
        self.areas_served
            .as_ref()
            .and_then(|a| a.cities.as_deref())
    }

    /// Served zip codes, if the data lists any.
    pub fn zips(&self) -> Option<&[String]> {
        self.areas_served.as_ref().and_then(|a| a.zips.as_deref())
    }

    /// Accepted insurance providers, if the data lists any.
    pub fn insurance(&self) -> Option<&[String]> {
        self.insurance_list.as_deref()
    }

    /// Street, city, region and postal code separated by single spaces.
    pub fn full_address(&self) -> String {
        format!(
            "{} {} {} {}",
            self.street_address, self.address_locality, self.address_region, self.postal_code
        )
    }
}

/// A scalar field that real datasets write either as a string or a number.
///
/// Numbers keep their shortest decimal form, so `33.75` renders as `33.75`
/// and `30309` as `30309`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scalar(String);

impl Scalar {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or a number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
                Ok(Scalar(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

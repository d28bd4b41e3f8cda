//! City record domain model and identity rules.
//!
//! This module defines [`CityRecord`], the normalized shape of one city returned by
//! the remote search API or restored from the favorites blob, along with its local
//! identifier [`CityId`] and the [`IdentityPolicy`] that decides how identifiers are
//! minted when records are decoded.
//!
//! The serialized shape is field-for-field the remote API's shape (camelCase keys).
//! The identifier is never serialized: it is assigned locally every time a record is
//! decoded.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Namespace for content-derived city identifiers.
const CITY_NAMESPACE: Uuid = Uuid::from_u128(0x6c1f_3a2e_9b44_4d0b_8f27_c4a1_d2e9_5b70);

/// Locally generated identifier of a [`CityRecord`].
///
/// Favorites membership is decided by this identifier only, never by content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityId(Uuid);

impl CityId {
    /// Mints a new random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives an identifier from a city's title and coordinates.
    ///
    /// Equal titles and coordinates (to six decimal places) always yield the same
    /// identifier.
    #[must_use]
    pub fn from_content(title: &str, lat: f64, lng: f64) -> Self {
        let key = format!("{title}|{lat:.6}|{lng:.6}");
        Self(Uuid::new_v5(&CITY_NAMESPACE, key.as_bytes()))
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How identifiers are assigned to decoded city records.
///
/// - `Fresh`: a new random identifier per decode. The same real-world city fetched
///   twice yields two distinct records, and a favorite restored from storage never
///   matches a search result. This is the default.
/// - `Content`: the identifier is derived from title and coordinates, so repeated
///   fetches of the same city share an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityPolicy {
    #[default]
    Fresh,
    Content,
}

impl IdentityPolicy {
    /// Parses a policy name (`fresh` or `content`, case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "fresh" => Some(Self::Fresh),
            "content" => Some(Self::Content),
            _ => None,
        }
    }

    /// Assigns identifiers to freshly decoded records.
    fn apply(self, cities: &mut [CityRecord]) {
        if self == Self::Content {
            for city in cities {
                city.id = CityId::from_content(&city.title, city.lat, city.lng);
            }
        }
    }
}

/// A single city as shown to the user.
///
/// Records are created either by decoding a remote search response or by decoding
/// the persisted favorites blob.
///
/// # Examples
///
/// ```
/// use cityfinder::domain::CityRecord;
///
/// let paris = CityRecord::new(
///     "Paris",
///     "Capital of France",
///     "FR",
///     48.8567,
///     2.3508,
///     "en.wikipedia.org/wiki/Paris",
/// )
/// .with_elevation(35);
///
/// assert_eq!(paris.elevation, Some(35));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRecord {
    #[serde(skip, default = "CityId::generate")]
    id: CityId,
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    pub country_code: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<i64>,
    pub wikipedia_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_img: Option<String>,
}

impl CityRecord {
    /// Creates a record with a fresh identifier and no optional fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        country_code: impl Into<String>,
        lat: f64,
        lng: f64,
        wikipedia_url: impl Into<String>,
    ) -> Self {
        Self {
            id: CityId::generate(),
            title: title.into(),
            summary: summary.into(),
            feature: None,
            country_code: country_code.into(),
            lat,
            lng,
            elevation: None,
            wikipedia_url: wikipedia_url.into(),
            thumbnail_img: None,
        }
    }

    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    #[must_use]
    pub const fn with_elevation(mut self, meters: i64) -> Self {
        self.elevation = Some(meters);
        self
    }

    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_img = Some(url.into());
        self
    }

    /// Returns the record's local identifier.
    #[must_use]
    pub const fn id(&self) -> CityId {
        self.id
    }

    /// Compares every field except the identifier.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.title == other.title
            && self.summary == other.summary
            && self.feature == other.feature
            && self.country_code == other.country_code
            && self.lat.to_bits() == other.lat.to_bits()
            && self.lng.to_bits() == other.lng.to_bits()
            && self.elevation == other.elevation
            && self.wikipedia_url == other.wikipedia_url
            && self.thumbnail_img == other.thumbnail_img
    }
}

/// Top-level envelope of the remote search response.
#[derive(Debug, Deserialize)]
struct GeoNamesResponse {
    geonames: Vec<CityRecord>,
}

/// Decodes a remote search response body into city records.
///
/// # Errors
///
/// Returns the `serde_json` error if the body is not `{ "geonames": [ ... ] }` or an
/// entry is missing a required field.
pub fn decode_search_response(
    body: &[u8],
    policy: IdentityPolicy,
) -> std::result::Result<Vec<CityRecord>, serde_json::Error> {
    let mut cities = serde_json::from_slice::<GeoNamesResponse>(body)?.geonames;
    policy.apply(&mut cities);
    Ok(cities)
}

/// Decodes a favorites blob (a JSON array of records).
///
/// # Errors
///
/// Returns the `serde_json` error if the blob is not a JSON array of records.
pub fn decode_city_list(
    blob: &[u8],
    policy: IdentityPolicy,
) -> std::result::Result<Vec<CityRecord>, serde_json::Error> {
    let mut cities: Vec<CityRecord> = serde_json::from_slice(blob)?;
    policy.apply(&mut cities);
    Ok(cities)
}

/// Encodes records as a favorites blob.
///
/// # Errors
///
/// Returns the `serde_json` error if serialization fails.
pub fn encode_city_list(cities: &[CityRecord]) -> std::result::Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(cities)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CITIES: &str = r#"{
        "geonames": [
            {
                "title": "Paris",
                "summary": "Paris is the capital of France",
                "feature": "city",
                "countryCode": "FR",
                "lat": 48.8567,
                "lng": 2.3508,
                "elevation": 35,
                "wikipediaUrl": "en.wikipedia.org/wiki/Paris",
                "thumbnailImg": "http://www.geonames.org/img/wikipedia/39000/thumb-38486-100.jpg",
                "rank": 100
            },
            {
                "title": "Paris, Texas",
                "summary": "Paris is a city in Lamar County",
                "countryCode": "US",
                "lat": 33.6609,
                "lng": -95.5555,
                "wikipediaUrl": "en.wikipedia.org/wiki/Paris%2C_Texas"
            }
        ]
    }"#;

    #[test]
    fn decodes_envelope_with_optional_fields() {
        let cities = decode_search_response(TWO_CITIES.as_bytes(), IdentityPolicy::Fresh).unwrap();

        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].title, "Paris");
        assert_eq!(cities[0].feature.as_deref(), Some("city"));
        assert_eq!(cities[0].elevation, Some(35));
        assert_eq!(cities[1].country_code, "US");
        assert!(cities[1].feature.is_none());
        assert!(cities[1].elevation.is_none());
        assert!(cities[1].thumbnail_img.is_none());
    }

    #[test]
    fn fresh_policy_mints_new_ids_on_every_decode() {
        let first = decode_search_response(TWO_CITIES.as_bytes(), IdentityPolicy::Fresh).unwrap();
        let second = decode_search_response(TWO_CITIES.as_bytes(), IdentityPolicy::Fresh).unwrap();

        assert!(first[0].same_content(&second[0]));
        assert_ne!(first[0].id(), second[0].id());
        assert_ne!(first[0].id(), first[1].id());
    }

    #[test]
    fn content_policy_is_stable_across_decodes() {
        let first = decode_search_response(TWO_CITIES.as_bytes(), IdentityPolicy::Content).unwrap();
        let second = decode_search_response(TWO_CITIES.as_bytes(), IdentityPolicy::Content).unwrap();

        assert_eq!(first[0].id(), second[0].id());
        assert_ne!(first[0].id(), first[1].id());
        assert_eq!(first[0].id(), CityId::from_content("Paris", 48.8567, 2.3508));
    }

    #[test]
    fn missing_required_field_is_a_decode_error() {
        let body = r#"{ "geonames": [ { "title": "Nowhere", "summary": "" } ] }"#;
        assert!(decode_search_response(body.as_bytes(), IdentityPolicy::Fresh).is_err());
    }

    #[test]
    fn wrong_envelope_is_a_decode_error() {
        assert!(decode_search_response(b"[]", IdentityPolicy::Fresh).is_err());
        assert!(decode_search_response(b"not json", IdentityPolicy::Fresh).is_err());
    }

    #[test]
    fn encoded_list_uses_wire_names_and_omits_id() {
        let city = CityRecord::new("Lyon", "Second city", "FR", 45.76, 4.84, "en.wikipedia.org/wiki/Lyon")
            .with_thumbnail("http://example.org/lyon.jpg");
        let blob = encode_city_list(std::slice::from_ref(&city)).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&blob).unwrap();

        let entry = &json[0];
        assert_eq!(entry["countryCode"], "FR");
        assert_eq!(entry["wikipediaUrl"], "en.wikipedia.org/wiki/Lyon");
        assert_eq!(entry["thumbnailImg"], "http://example.org/lyon.jpg");
        assert!(entry.get("id").is_none());
        assert!(entry.get("elevation").is_none());
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!(IdentityPolicy::from_name("Content"), Some(IdentityPolicy::Content));
        assert_eq!(IdentityPolicy::from_name(" fresh "), Some(IdentityPolicy::Fresh));
        assert_eq!(IdentityPolicy::from_name("hash"), None);
    }
}

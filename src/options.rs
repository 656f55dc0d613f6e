use serde::{Deserialize, Serialize};

/// How a `GeometryCollection` is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionEncoding {
    /// `"geometries": [<geometry object>, ...]`, as RFC 7946 defines it.
    #[default]
    Rfc7946,
    /// `"coordinates": [<coordinates block>, ...]`, limited to Point, LineString and
    /// Polygon members.
    Coordinates,
}

/// Output options for the GeoJSON feature adapter.
///
/// Deserializes from any serde format; missing keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Add a computed `bbox` member to features and collections.
    pub include_bbox: bool,
    pub collection_encoding: CollectionEncoding,
}

impl Options {
    #[must_use]
    pub fn with_bbox(self) -> Self {
        Self {
            include_bbox: true,
            ..self
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert!(!options.include_bbox);
        assert_eq!(options.collection_encoding, CollectionEncoding::Rfc7946);
        assert!(Options::default().with_bbox().include_bbox);
    }

    #[test]
    fn test_from_toml() {
        let options: Options = toml::from_str("collection_encoding = \"coordinates\"").unwrap();
        assert_eq!(
            options,
            Options {
                include_bbox: false,
                collection_encoding: CollectionEncoding::Coordinates,
            }
        );
        let empty: Options = toml::from_str("").unwrap();
        assert_eq!(empty, Options::default());
    }

    #[test]
    fn test_from_json() {
        let options: Options = serde_json::from_str(r#"{"include_bbox": true}"#).unwrap();
        assert!(options.include_bbox);
        assert!(serde_json::from_str::<Options>(r#"{"collection_encoding": "wkt"}"#).is_err());
    }
}

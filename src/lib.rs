//! # serde-geofeature
//!
//! Validated geometry fields and typed GeoJSON features for serde records.
//!
//! Records are plain serde structs. Their geometry attribute holds a canonical
//! [`geometry::Geometry`], declared with a [`field::GeometryField`] that fixes the
//! accepted geometry kinds and how Z values are treated. The field accepts WKT, bare
//! coordinates or GeoJSON geometry objects and serializes to WKT. The [`feature`]
//! module turns such records into GeoJSON (RFC 7946) `Feature` and
//! `FeatureCollection` objects and back, with every geometry structurally validated
//! on the way in.
//!
//! ## Main Components
//!
//! - [`field::GeometryField`] - Validates loose input into a geometry of a declared kind
//! - [`geometry_field!`] - Wires a field into a record with `#[serde(with = "...")]`
//! - [`variant::GeoJsonGeometry`] - The seven GeoJSON geometry objects, validated on deserialization
//! - [`feature`] - `Feature` / `FeatureCollection` adapter for [`feature::FeatureRecord`]s
//! - [`convert`] - Canonical geometry to GeoJSON, bounding boxes and unions
//! - [`from_datasource`] - Reads records from any `GeozeroDatasource`
//! - [`error::Error`] - Custom error types for the library
//!
//! ## Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_geofeature::feature::{from_geojson_str, to_geojson_string, FeatureRecord};
//! use serde_geofeature::field::GeometryField;
//! use serde_geofeature::geometry::{Geometry, Point};
//! use serde_geofeature::geometry_field;
//! use serde_geofeature::options::Options;
//!
//! geometry_field!(mod location = serde_geofeature::field::GeometryField::new(
//!     &[serde_geofeature::geometry::GeometryKind::Point],
//!     serde_geofeature::field::ZValues::Allow,
//! ));
//!
//! #[derive(Debug, PartialEq, Deserialize, Serialize)]
//! struct Greeting {
//!     #[serde(with = "location")]
//!     geometry: Geometry,
//!     name: String,
//!     answer: i64,
//! }
//!
//! impl FeatureRecord for Greeting {
//!     const GEOMETRY: GeometryField = location::FIELD;
//!
//!     fn geometry(&self) -> &Geometry {
//!         &self.geometry
//!     }
//! }
//!
//! let greeting = Greeting {
//!     geometry: Geometry::Point(Point::new(0.0, 0.0)),
//!     name: "Hello World".to_string(),
//!     answer: 42,
//! };
//!
//! let geojson = to_geojson_string(&greeting, &Options::default()).unwrap();
//! assert_eq!(
//!     geojson,
//!     r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[0.0,0.0]},"properties":{"name":"Hello World","answer":42}}"#
//! );
//!
//! let decoded: Greeting = from_geojson_str(&geojson).unwrap();
//! assert_eq!(decoded, greeting);
//!
//! // The geometry field also accepts WKT when the record is deserialized directly.
//! let direct: Greeting =
//!     serde_json::from_str(r#"{"geometry": "POINT (0 0)", "name": "Hello World", "answer": 42}"#)
//!         .unwrap();
//! assert_eq!(direct, greeting);
//! ```
//!
//! ## Modules
//!
//! - [`collector`] - geozero event processors building canonical geometries
//! - [`convert`] - Conversion engine
//! - [`de`] - Reading records from geozero datasources
//! - [`error`] - Error types and handling
//! - [`feature`] - GeoJSON feature adapter
//! - [`field`] - Geometry field declaration and validation
//! - [`geometry`] - Canonical geometry model
//! - [`options`] - Output options
//! - [`ser`] - Datasource property values
//! - [`variant`] - GeoJSON geometry objects
//! - [`wkt`] - WKT reading and writing

pub mod collector;
pub mod convert;
#[allow(clippy::module_name_repetitions)]
pub mod de;
pub mod error;
pub mod feature;
#[macro_use]
pub mod field;
pub mod geometry;
pub mod options;
pub mod ser;
pub mod variant;
pub mod wkt;

pub use de::from_datasource;
pub use error::{Error, ErrorKind, Result};

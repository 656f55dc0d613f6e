//! Declared geometry fields: accepted kinds, Z-value policy and the validation that
//! turns loose input into a canonical [`Geometry`].
//!
//! A field is a `const` value. Wire it into a serde record with the
//! [`geometry_field!`](crate::geometry_field) macro:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_geofeature::geometry::Geometry;
//! use serde_geofeature::geometry_field;
//!
//! geometry_field!(mod area = serde_geofeature::field::GeometryField::new(
//!     &[
//!         serde_geofeature::geometry::GeometryKind::Polygon,
//!         serde_geofeature::geometry::GeometryKind::MultiPolygon,
//!     ],
//!     serde_geofeature::field::ZValues::Strip,
//! ));
//!
//! #[derive(Serialize, Deserialize)]
//! struct Parcel {
//!     #[serde(with = "area")]
//!     geometry: Geometry,
//! }
//!
//! let parcel: Parcel =
//!     serde_json::from_str(r#"{"geometry": "POLYGON Z ((0 0 1, 0 1 1, 1 1 1, 0 0 1))"}"#).unwrap();
//! assert!(!parcel.geometry.has_z());
//! assert_eq!(
//!     serde_json::to_string(&parcel).unwrap(),
//!     r#"{"geometry":"POLYGON((0 0,0 1,1 1,0 0))"}"#
//! );
//! ```
use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Geometry, GeometryKind};
use crate::variant::GeoJsonGeometry;
use crate::wkt::{from_wkt, to_wkt};

/// How a field treats Z values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZValues {
    /// Geometries without Z values are rejected.
    Required,
    /// Geometries are kept as given.
    #[default]
    Allow,
    /// Z values are dropped.
    Strip,
    /// Geometries with Z values are rejected.
    #[serde(alias = "forbidden")]
    Forbid,
}

/// Anything a geometry field accepts as input.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryInput {
    Geometry(Geometry),
    Wkt(String),
    /// Bare coordinates (tried against each declared kind) or a GeoJSON geometry object.
    Raw(Value),
}

impl From<Geometry> for GeometryInput {
    fn from(geometry: Geometry) -> Self {
        GeometryInput::Geometry(geometry)
    }
}

impl From<String> for GeometryInput {
    fn from(text: String) -> Self {
        GeometryInput::Wkt(text)
    }
}

impl From<&str> for GeometryInput {
    fn from(text: &str) -> Self {
        GeometryInput::Wkt(text.to_string())
    }
}

impl From<Value> for GeometryInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => GeometryInput::Wkt(text),
            other => GeometryInput::Raw(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryField {
    kinds: &'static [GeometryKind],
    z_values: ZValues,
}

impl GeometryField {
    /// # Panics
    ///
    /// Panics when `kinds` is empty; in a `const` this fails the build.
    #[must_use]
    pub const fn new(kinds: &'static [GeometryKind], z_values: ZValues) -> Self {
        assert!(
            !kinds.is_empty(),
            "A geometry field needs at least one geometry kind."
        );
        Self { kinds, z_values }
    }

    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an empty kind list or a kind listed twice.
    pub fn try_new(kinds: &'static [GeometryKind], z_values: ZValues) -> Result<Self> {
        if kinds.is_empty() {
            return Err(Error::Configuration(
                "A geometry field needs at least one geometry kind.".to_string(),
            ));
        }
        if let Some((index, kind)) = kinds
            .iter()
            .enumerate()
            .find(|&(index, kind)| kinds[..index].contains(kind))
        {
            return Err(Error::Configuration(format!(
                "Geometry kind {kind} is listed twice (again at position {index})."
            )));
        }
        Ok(Self { kinds, z_values })
    }

    #[must_use]
    pub fn kinds(&self) -> &'static [GeometryKind] {
        self.kinds
    }

    #[must_use]
    pub fn z_values(&self) -> ZValues {
        self.z_values
    }

    #[must_use]
    pub fn accepts(&self, kind: GeometryKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Turns `value` into a geometry of one of the declared kinds, with the Z-value
    /// policy applied.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidWkt`] for unparsable WKT; a validation error when raw input
    /// fits none of the declared kinds, when the geometry kind is not declared or when
    /// the Z-value policy rejects it.
    pub fn validate(&self, value: impl Into<GeometryInput>) -> Result<Geometry> {
        let geometry = match value.into() {
            GeometryInput::Geometry(geometry) => geometry,
            GeometryInput::Wkt(text) => from_wkt(&text)?,
            GeometryInput::Raw(value) => self.geometry_from_raw(value)?,
        };
        self.check_kind(&geometry)?;
        self.apply_z_values(geometry)
    }

    fn geometry_from_raw(&self, value: Value) -> Result<Geometry> {
        if value.is_object() {
            let variant: GeoJsonGeometry = serde_json::from_value(value)?;
            return Ok(variant.to_canonical());
        }
        self.kinds
            .iter()
            .find_map(|kind| {
                serde_json::from_value::<GeoJsonGeometry>(
                    json!({"type": kind, "coordinates": &value}),
                )
                .ok()
            })
            .map(|variant| variant.to_canonical())
            .ok_or_else(|| {
                Error::validation(format!(
                    "Supplied value ({value}) cannot be converted to a valid geometry."
                ))
            })
    }

    fn check_kind(&self, geometry: &Geometry) -> Result<()> {
        let kind = geometry.kind();
        if self.accepts(kind) {
            return Ok(());
        }
        debug!(%kind, expected = ?self.kinds, "Rejected geometry kind");
        match self.kinds {
            [expected] => Err(Error::validation(format!(
                "Supplied geometry ({kind}) is not a {expected}."
            ))),
            expected => Err(Error::validation(format!(
                "Supplied geometry ({kind}) is not one of the expected types: {}.",
                expected
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    fn apply_z_values(&self, geometry: Geometry) -> Result<Geometry> {
        match self.z_values {
            ZValues::Forbid if geometry.has_z() => {
                debug!(kind = %geometry.kind(), "Rejected geometry with z-values");
                Err(Error::validation(
                    "The supplied geometry has z-values. The field does not allow this.",
                ))
            }
            ZValues::Required if !geometry.has_z() => {
                debug!(kind = %geometry.kind(), "Rejected geometry without z-values");
                Err(Error::validation(
                    "The supplied geometry has no z-values. The field does require this.",
                ))
            }
            ZValues::Strip => Ok(geometry.force_2d()),
            _ => Ok(geometry),
        }
    }

    /// Writes a validated geometry as WKT.
    ///
    /// # Errors
    ///
    /// Only fails if the WKT writer does.
    pub fn serialize(&self, geometry: &Geometry) -> Result<String> {
        to_wkt(geometry)
    }

    /// One example WKT literal per declared kind, 3D when Z values are required.
    #[must_use]
    pub fn examples(&self) -> Vec<&'static str> {
        let three_d = self.z_values == ZValues::Required;
        self.kinds
            .iter()
            .map(|kind| example_wkt(*kind, three_d))
            .collect()
    }

    /// The JSON-schema fragment describing this field.
    #[must_use]
    pub fn json_schema(&self) -> Value {
        json!({"type": "string", "examples": self.examples()})
    }

    /// Number of ordinates this field accepts on GeoJSON positions, `None` for either.
    #[must_use]
    pub fn wire_dimension(&self) -> Option<usize> {
        match self.z_values {
            ZValues::Required => Some(3),
            ZValues::Allow => None,
            ZValues::Strip | ZValues::Forbid => Some(2),
        }
    }

    /// `serialize_with` hook writing the geometry as WKT.
    ///
    /// # Errors
    ///
    /// Propagates WKT writer and serializer failures.
    pub fn serialize_with<S: Serializer>(
        &self,
        geometry: &Geometry,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let text = self.serialize(geometry).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// `deserialize_with` hook accepting WKT or raw coordinates.
    ///
    /// # Errors
    ///
    /// Reports any [`GeometryField::validate`] failure through the deserializer.
    pub fn deserialize_with<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> std::result::Result<Geometry, D::Error> {
        let value = Value::deserialize(deserializer)?;
        self.validate(value).map_err(D::Error::custom)
    }
}

fn example_wkt(kind: GeometryKind, three_d: bool) -> &'static str {
    match (kind, three_d) {
        (GeometryKind::Point, false) => "POINT(10 20)",
        (GeometryKind::Point, true) => "POINT Z (10 20 30)",
        (GeometryKind::LineString, false) => "LINESTRING(10 10, 20 20, 21 30)",
        (GeometryKind::LineString, true) => "LINESTRING Z (10 10 30, 20 20 30, 21 30 30)",
        (GeometryKind::Polygon, false) => "POLYGON((0 0, 0 40, 40 40, 40 0, 0 0))",
        (GeometryKind::Polygon, true) => {
            "POLYGON Z ((0 0 30, 0 40 30, 40 40 30, 40 0 30, 0 0 30))"
        }
        (GeometryKind::MultiPoint, false) => "MULTIPOINT((0 0), (10 20), (15 20), (30 30))",
        (GeometryKind::MultiPoint, true) => {
            "MULTIPOINT Z ((0 0 30), (10 20 30), (15 20 30), (30 30 30))"
        }
        (GeometryKind::MultiLineString, false) => {
            "MULTILINESTRING((10 10, 20 20), (15 15, 30 15))"
        }
        (GeometryKind::MultiLineString, true) => {
            "MULTILINESTRING Z ((10 10 30, 20 20 30), (15 15 30, 30 15 30))"
        }
        (GeometryKind::MultiPolygon, false) => {
            "MULTIPOLYGON(((10 10, 10 20, 20 20, 20 15, 10 10)),((60 60, 70 70, 80 60, 60 60)))"
        }
        (GeometryKind::MultiPolygon, true) => {
            "MULTIPOLYGON Z (((10 10 30, 10 20 30, 20 20 30, 20 15 30, 10 10 30)),((60 60 30, 70 70 30, 80 60 30, 60 60 30)))"
        }
        (GeometryKind::GeometryCollection, false) => {
            "GEOMETRYCOLLECTION(POINT (10 10), POINT (30 30), LINESTRING (15 15, 20 20))"
        }
        (GeometryKind::GeometryCollection, true) => {
            "GEOMETRYCOLLECTION(POINT Z (10 10 30), POINT Z (30 30 30), LINESTRING Z (15 15 30, 20 20 30))"
        }
    }
}

/// Generates a module with `serialize`/`deserialize` functions for
/// `#[serde(with = "...")]` around a `const FIELD: GeometryField`.
///
/// The field expression is evaluated inside the generated module, which glob-imports
/// its parent module. Inside a function body, spell the paths out in full.
///
/// ```rust
/// use serde_geofeature::geometry::GeometryKind;
///
/// serde_geofeature::geometry_field!(pub mod location = serde_geofeature::field::GeometryField::new(
///     &[serde_geofeature::geometry::GeometryKind::Point],
///     serde_geofeature::field::ZValues::Allow,
/// ));
///
/// assert_eq!(location::FIELD.kinds(), &[GeometryKind::Point]);
/// ```
#[macro_export]
macro_rules! geometry_field {
    ($(#[$meta:meta])* $vis:vis mod $name:ident = $field:expr $(;)?) => {
        $(#[$meta])*
        $vis mod $name {
            #[allow(unused_imports)]
            use super::*;

            pub const FIELD: $crate::field::GeometryField = $field;

            pub fn serialize<S: ::serde::Serializer>(
                geometry: &$crate::geometry::Geometry,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                FIELD.serialize_with(geometry, serializer)
            }

            pub fn deserialize<'de, D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<$crate::geometry::Geometry, D::Error> {
                FIELD.deserialize_with(deserializer)
            }
        }
    };
}

//! GeoJSON geometry objects with eager structural validation.
//!
//! Every kind has its own struct, generic over the [`Position`] type that fixes its
//! dimensionality. [`GeoJsonGeometry`] is the `"type"`-tagged sum of all seven.
//! Deserializing any of them validates the coordinate structure; a value that
//! exists is well-formed.
//!
//! ```rust
//! use serde_geofeature::variant::{GeoJsonGeometry, AnyPosition};
//! use serde_geofeature::geometry::GeometryKind;
//!
//! let line: GeoJsonGeometry<AnyPosition> =
//!     serde_json::from_str(r#"{"type": "LineString", "coordinates": [[0, 0, 1], [1, 1, 1]]}"#)
//!         .unwrap();
//! assert_eq!(line.kind(), GeometryKind::LineString);
//! assert_eq!(line.dimension(), Some(3));
//!
//! let short = r#"{"type": "LineString", "coordinates": [[0, 0]]}"#;
//! assert!(serde_json::from_str::<GeoJsonGeometry<AnyPosition>>(short).is_err());
//! ```
mod collection;
mod linestring;
mod multi;
mod point;
mod polygon;
mod position;

use serde::{Deserialize, Serialize};

pub use collection::GeometryCollection;
pub use linestring::{LineString, LineStringCoordinates};
pub use multi::{
    MultiLineString, MultiLineStringCoordinates, MultiPoint, MultiPointCoordinates,
    MultiPolygon, MultiPolygonCoordinates,
};
pub use point::{Point, PointCoordinates};
pub use polygon::{LinearRing, Polygon, PolygonCoordinates};
pub use position::{AnyPosition, Position};

use crate::error::{Error, Result};
use crate::geometry::{Geometry, GeometryKind};
use crate::options::CollectionEncoding;

/// A single geometry kind on the wire.
pub trait GeometryVariant: Sized {
    const KIND: GeometryKind;

    /// Encodes a canonical geometry of this kind.
    ///
    /// # Errors
    ///
    /// Fails when the geometry is of another kind or cannot be expressed with this
    /// variant's position type.
    fn from_canonical(geometry: &Geometry) -> Result<Self>;

    fn to_canonical(&self) -> Geometry;
}

pub(crate) fn mismatch(expected: GeometryKind, geometry: &Geometry) -> Error {
    Error::validation(format!(
        "Expected a {expected} geometry, got {}.",
        geometry.kind()
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", bound = "P: Position")]
pub enum GeoJsonGeometry<P: Position = AnyPosition> {
    Point(Point<P>),
    LineString(LineString<P>),
    Polygon(Polygon<P>),
    MultiPoint(MultiPoint<P>),
    MultiLineString(MultiLineString<P>),
    MultiPolygon(MultiPolygon<P>),
    GeometryCollection(GeometryCollection<P>),
}

impl<P: Position> GeoJsonGeometry<P> {
    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        match self {
            GeoJsonGeometry::Point(_) => GeometryKind::Point,
            GeoJsonGeometry::LineString(_) => GeometryKind::LineString,
            GeoJsonGeometry::Polygon(_) => GeometryKind::Polygon,
            GeoJsonGeometry::MultiPoint(_) => GeometryKind::MultiPoint,
            GeoJsonGeometry::MultiLineString(_) => GeometryKind::MultiLineString,
            GeoJsonGeometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            GeoJsonGeometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Encodes a canonical geometry of any kind.
    ///
    /// # Errors
    ///
    /// Fails when the geometry cannot be expressed with position type `P` or, for
    /// collections, with the requested encoding.
    pub fn from_canonical_with(geometry: &Geometry, encoding: CollectionEncoding) -> Result<Self> {
        Ok(match geometry {
            Geometry::Point(_) => GeoJsonGeometry::Point(Point::from_canonical(geometry)?),
            Geometry::LineString(_) => {
                GeoJsonGeometry::LineString(LineString::from_canonical(geometry)?)
            }
            Geometry::Polygon(_) => GeoJsonGeometry::Polygon(Polygon::from_canonical(geometry)?),
            Geometry::MultiPoint(_) => {
                GeoJsonGeometry::MultiPoint(MultiPoint::from_canonical(geometry)?)
            }
            Geometry::MultiLineString(_) => {
                GeoJsonGeometry::MultiLineString(MultiLineString::from_canonical(geometry)?)
            }
            Geometry::MultiPolygon(_) => {
                GeoJsonGeometry::MultiPolygon(MultiPolygon::from_canonical(geometry)?)
            }
            Geometry::GeometryCollection(_) => GeoJsonGeometry::GeometryCollection(
                GeometryCollection::from_canonical_with(geometry, encoding)?,
            ),
        })
    }

    #[must_use]
    pub fn to_canonical(&self) -> Geometry {
        match self {
            GeoJsonGeometry::Point(point) => point.to_canonical(),
            GeoJsonGeometry::LineString(line) => line.to_canonical(),
            GeoJsonGeometry::Polygon(polygon) => polygon.to_canonical(),
            GeoJsonGeometry::MultiPoint(points) => points.to_canonical(),
            GeoJsonGeometry::MultiLineString(lines) => lines.to_canonical(),
            GeoJsonGeometry::MultiPolygon(polygons) => polygons.to_canonical(),
            GeoJsonGeometry::GeometryCollection(collection) => collection.to_canonical(),
        }
    }

    /// All positions in document order, descending into collection members.
    #[must_use]
    pub fn positions(&self) -> Box<dyn Iterator<Item = &P> + '_> {
        match self {
            GeoJsonGeometry::Point(point) => Box::new(point.coordinates().0.iter()),
            GeoJsonGeometry::LineString(line) => Box::new(line.coordinates().positions().iter()),
            GeoJsonGeometry::Polygon(polygon) => Box::new(
                polygon
                    .coordinates()
                    .rings()
                    .iter()
                    .flat_map(LinearRing::positions),
            ),
            GeoJsonGeometry::MultiPoint(points) => {
                Box::new(points.coordinates().positions().iter())
            }
            GeoJsonGeometry::MultiLineString(lines) => Box::new(
                lines
                    .coordinates()
                    .lines()
                    .iter()
                    .flat_map(LineStringCoordinates::positions),
            ),
            GeoJsonGeometry::MultiPolygon(polygons) => Box::new(
                polygons
                    .coordinates()
                    .polygons()
                    .iter()
                    .flat_map(PolygonCoordinates::rings)
                    .flat_map(LinearRing::positions),
            ),
            GeoJsonGeometry::GeometryCollection(collection) => Box::new(
                collection
                    .geometries()
                    .iter()
                    .flat_map(GeoJsonGeometry::positions),
            ),
        }
    }

    /// Number of ordinates of this geometry's positions, `None` when it has none.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.positions().next().map(Position::dimension)
    }

    pub(crate) fn map_positions<Q: Position>(self, f: &impl Fn(P) -> Q) -> GeoJsonGeometry<Q> {
        match self {
            GeoJsonGeometry::Point(point) => GeoJsonGeometry::Point(point.map(f)),
            GeoJsonGeometry::LineString(line) => GeoJsonGeometry::LineString(line.map(f)),
            GeoJsonGeometry::Polygon(polygon) => GeoJsonGeometry::Polygon(polygon.map(f)),
            GeoJsonGeometry::MultiPoint(points) => GeoJsonGeometry::MultiPoint(points.map(f)),
            GeoJsonGeometry::MultiLineString(lines) => {
                GeoJsonGeometry::MultiLineString(lines.map(f))
            }
            GeoJsonGeometry::MultiPolygon(polygons) => {
                GeoJsonGeometry::MultiPolygon(polygons.map(f))
            }
            GeoJsonGeometry::GeometryCollection(collection) => {
                GeoJsonGeometry::GeometryCollection(collection.map(f))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::geometry;

    #[test]
    fn test_tagged_roundtrip() {
        let value = json!({"type": "Polygon", "coordinates": [
            [[0.0, 0.0], [0.0, 40.0], [40.0, 40.0], [40.0, 0.0], [0.0, 0.0]]
        ]});
        let polygon: GeoJsonGeometry = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(polygon.kind(), GeometryKind::Polygon);
        assert_eq!(polygon.dimension(), Some(2));
        assert_eq!(serde_json::to_value(&polygon).unwrap(), value);
    }

    #[test]
    fn test_unknown_type() {
        let result = serde_json::from_value::<GeoJsonGeometry>(
            json!({"type": "Circle", "coordinates": [0, 0]}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bbox_member_is_ignored() {
        let point: GeoJsonGeometry = serde_json::from_value(
            json!({"type": "Point", "coordinates": [1, 2], "bbox": [1, 2, 1, 2]}),
        )
        .unwrap();
        assert_eq!(point.to_canonical(), Geometry::Point(geometry::Point::new(1., 2.)));
    }

    #[test]
    fn test_map_positions_widens() {
        let geometry = Geometry::MultiPoint(geometry::MultiPoint(vec![
            geometry::Point::new_z(0., 0., 1.),
            geometry::Point::new_z(1., 1., 2.),
        ]));
        let narrow = GeoJsonGeometry::<[f64; 3]>::from_canonical_with(
            &geometry,
            CollectionEncoding::default(),
        )
        .unwrap();
        let wide = narrow.map_positions(&AnyPosition::Xyz);
        assert_eq!(wide.dimension(), Some(3));
        assert_eq!(wide.to_canonical(), geometry);
    }

    #[test]
    fn test_mismatch_message() {
        let err = mismatch(
            GeometryKind::Polygon,
            &Geometry::Point(geometry::Point::new(0., 0.)),
        );
        assert!(err.to_string().contains("Expected a Polygon geometry, got Point."));
    }
}

//! The `GeometryCollection` variant and its two wire encodings.
//!
//! [`CollectionEncoding::Rfc7946`] writes `"geometries": [...]` holding full GeoJSON
//! geometry objects. [`CollectionEncoding::Coordinates`] writes a bare
//! `"coordinates": [...]` list whose blocks are told apart by nesting depth:
//!
//! * `[]` is an empty Point
//! * `[x, y]` is a Point
//! * `[[x, y], ...]` is a LineString
//! * `[[[x, y], ...], ...]` is a Polygon
//!
//! Only Point, LineString and Polygon members can be written that way. Both forms are
//! accepted when reading.
use serde::{
    de::Error as _, ser::Error as _, ser::SerializeStruct, Deserialize, Deserializer,
    Serialize, Serializer,
};
use serde_json::Value;

use super::point::PointCoordinates;
use super::position::{uniform_dimension, AnyPosition, Position};
use super::{mismatch, GeoJsonGeometry, GeometryVariant, LineString, Point, Polygon};
use crate::error::{Error, Result};
use crate::geometry::{self, Geometry, GeometryKind};
use crate::options::CollectionEncoding;

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCollection<P: Position = AnyPosition> {
    geometries: Vec<GeoJsonGeometry<P>>,
    encoding: CollectionEncoding,
}

impl<P: Position> GeometryCollection<P> {
    /// # Errors
    ///
    /// Fails when members differ in dimensionality, or when the coordinates encoding
    /// is asked to hold anything but Point, LineString and Polygon members.
    pub fn new(geometries: Vec<GeoJsonGeometry<P>>, encoding: CollectionEncoding) -> Result<Self> {
        uniform_dimension(geometries.iter().flat_map(GeoJsonGeometry::positions))?;
        if encoding == CollectionEncoding::Coordinates {
            if let Some(member) = geometries.iter().find(|member| {
                !matches!(
                    member,
                    GeoJsonGeometry::Point(_)
                        | GeoJsonGeometry::LineString(_)
                        | GeoJsonGeometry::Polygon(_)
                )
            }) {
                return Err(Error::validation(format!(
                    "A coordinates-encoded GeometryCollection can only hold Point, LineString and Polygon members, found {}.",
                    member.kind()
                )));
            }
        }
        Ok(Self {
            geometries,
            encoding,
        })
    }

    #[must_use]
    pub fn geometries(&self) -> &[GeoJsonGeometry<P>] {
        &self.geometries
    }

    #[must_use]
    pub fn encoding(&self) -> CollectionEncoding {
        self.encoding
    }

    pub(crate) fn from_canonical_with(
        geometry: &Geometry,
        encoding: CollectionEncoding,
    ) -> Result<Self> {
        let Geometry::GeometryCollection(collection) = geometry else {
            return Err(mismatch(GeometryKind::GeometryCollection, geometry));
        };
        let members = collection
            .0
            .iter()
            .map(|member| GeoJsonGeometry::from_canonical_with(member, encoding))
            .collect::<Result<_>>()?;
        Self::new(members, encoding)
    }

    pub(crate) fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> GeometryCollection<Q> {
        GeometryCollection {
            geometries: self
                .geometries
                .into_iter()
                .map(|member| member.map_positions(f))
                .collect(),
            encoding: self.encoding,
        }
    }
}

impl<P: Position> GeometryVariant for GeometryCollection<P> {
    const KIND: GeometryKind = GeometryKind::GeometryCollection;

    fn from_canonical(geometry: &Geometry) -> Result<Self> {
        Self::from_canonical_with(geometry, CollectionEncoding::default())
    }

    fn to_canonical(&self) -> Geometry {
        Geometry::GeometryCollection(geometry::GeometryCollection(
            self.geometries
                .iter()
                .map(GeoJsonGeometry::to_canonical)
                .collect(),
        ))
    }
}

/// The bare coordinates block of a Point, LineString or Polygon member.
struct MemberCoordinates<'a, P: Position>(&'a GeoJsonGeometry<P>);

impl<P: Position> Serialize for MemberCoordinates<'_, P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            GeoJsonGeometry::Point(point) => point.coordinates().serialize(serializer),
            GeoJsonGeometry::LineString(line) => line.coordinates().serialize(serializer),
            GeoJsonGeometry::Polygon(polygon) => polygon.coordinates().serialize(serializer),
            other => Err(S::Error::custom(format!(
                "{} cannot be written as a bare coordinates block.",
                other.kind()
            ))),
        }
    }
}

impl<P: Position> Serialize for GeometryCollection<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GeometryCollection", 1)?;
        match self.encoding {
            CollectionEncoding::Rfc7946 => state.serialize_field("geometries", &self.geometries)?,
            CollectionEncoding::Coordinates => {
                let blocks: Vec<_> = self.geometries.iter().map(MemberCoordinates).collect();
                state.serialize_field("coordinates", &blocks)?;
            }
        }
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(bound = "P: Position")]
struct RawCollection<P: Position> {
    geometries: Option<Vec<GeoJsonGeometry<P>>>,
    coordinates: Option<Vec<Value>>,
}

impl<'de, P: Position> Deserialize<'de> for GeometryCollection<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawCollection::<P>::deserialize(deserializer)?;
        let collection = match (raw.geometries, raw.coordinates) {
            (Some(geometries), None) => Self::new(geometries, CollectionEncoding::Rfc7946),
            (None, Some(blocks)) => blocks
                .into_iter()
                .map(member_from_coordinates)
                .collect::<Result<_>>()
                .and_then(|members| Self::new(members, CollectionEncoding::Coordinates)),
            (Some(_), Some(_)) => Err(Error::validation(
                "A GeometryCollection cannot have both 'geometries' and 'coordinates'.",
            )),
            (None, None) => Err(Error::validation(
                "A GeometryCollection needs either 'geometries' or 'coordinates'.",
            )),
        };
        collection.map_err(D::Error::custom)
    }
}

/// Member kind of a coordinates block, judged by the nesting depth of its first
/// elements. `None` when the block is too shallow to tell.
fn sniff_kind(block: &Value) -> Option<GeometryKind> {
    match block.as_array()?.first() {
        None | Some(Value::Number(_)) => Some(GeometryKind::Point),
        Some(Value::Array(line)) => match line.first()? {
            Value::Number(_) => Some(GeometryKind::LineString),
            Value::Array(ring) => match ring.first()? {
                Value::Number(_) => Some(GeometryKind::Polygon),
                _ => None,
            },
            _ => None,
        },
        Some(_) => None,
    }
}

fn member_from_coordinates<P: Position>(block: Value) -> Result<GeoJsonGeometry<P>> {
    let Some(kind) = sniff_kind(&block) else {
        return Err(Error::validation(format!(
            "Cannot tell the geometry kind of collection member {block}."
        )));
    };
    Ok(match kind {
        GeometryKind::Point => {
            let coordinates: PointCoordinates<P> = serde_json::from_value(block)?;
            GeoJsonGeometry::Point(coordinates.0.map_or_else(Point::empty, Point::new))
        }
        GeometryKind::LineString => {
            GeoJsonGeometry::LineString(LineString::new(serde_json::from_value(block)?))
        }
        _ => GeoJsonGeometry::Polygon(Polygon::new(serde_json::from_value(block)?)),
    })
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn mixed() -> Geometry {
        Geometry::GeometryCollection(geometry::GeometryCollection(vec![
            Geometry::Point(geometry::Point::new(10., 10.)),
            Geometry::Point(geometry::Point::empty()),
            Geometry::LineString([(15., 15.), (20., 20.)].into_iter().collect()),
            Geometry::Polygon(geometry::Polygon::new(
                [(0., 0.), (0., 4.), (4., 4.), (0., 0.)].into_iter().collect(),
                vec![],
            )),
        ]))
    }

    #[test]
    fn test_rfc7946_encoding() {
        let collection = GeometryCollection::<[f64; 2]>::from_canonical(&mixed()).unwrap();
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["geometries"][0], json!({"type": "Point", "coordinates": [10.0, 10.0]}));
        assert_eq!(value["geometries"][1], json!({"type": "Point", "coordinates": []}));
        assert!(value.get("coordinates").is_none());

        let decoded: GeometryCollection<[f64; 2]> = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.to_canonical(), mixed());
    }

    #[test]
    fn test_coordinates_encoding() {
        let collection = GeometryCollection::<[f64; 2]>::from_canonical_with(
            &mixed(),
            CollectionEncoding::Coordinates,
        )
        .unwrap();
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(
            value,
            json!({"coordinates": [
                [10.0, 10.0],
                [],
                [[15.0, 15.0], [20.0, 20.0]],
                [[[0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [0.0, 0.0]]]
            ]})
        );

        let decoded: GeometryCollection<AnyPosition> = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.encoding(), CollectionEncoding::Coordinates);
        assert_eq!(decoded.to_canonical(), mixed());
    }

    #[test]
    fn test_coordinates_encoding_limits_members() {
        let nested = Geometry::GeometryCollection(geometry::GeometryCollection(vec![
            Geometry::MultiPoint(geometry::MultiPoint(vec![geometry::Point::new(0., 0.)])),
        ]));
        assert!(GeometryCollection::<[f64; 2]>::from_canonical_with(
            &nested,
            CollectionEncoding::Coordinates
        )
        .is_err());
        assert!(GeometryCollection::<[f64; 2]>::from_canonical(&nested).is_ok());
    }

    #[test]
    fn test_ambiguous_blocks() {
        for block in [json!([[]]), json!([[[]]]), json!(["a"]), json!(5)] {
            assert_eq!(sniff_kind(&block), None, "{block}");
            assert!(serde_json::from_value::<GeometryCollection>(json!({"coordinates": [block]}))
                .is_err());
        }
    }

    #[test]
    fn test_needs_exactly_one_form() {
        assert!(serde_json::from_value::<GeometryCollection>(json!({})).is_err());
        assert!(serde_json::from_value::<GeometryCollection>(
            json!({"geometries": [], "coordinates": []})
        )
        .is_err());
        let empty: GeometryCollection = serde_json::from_value(json!({"geometries": []})).unwrap();
        assert!(empty.geometries().is_empty());
    }

    #[test]
    fn test_mixed_member_dimensions() {
        let result = serde_json::from_value::<GeometryCollection>(json!({"geometries": [
            {"type": "Point", "coordinates": [1, 2]},
            {"type": "Point", "coordinates": [1, 2, 3]}
        ]}));
        assert!(result.is_err());
    }
}

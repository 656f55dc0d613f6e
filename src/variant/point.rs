use serde::{de::Error as _, ser::SerializeSeq, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::position::{AnyPosition, Position};
use super::{mismatch, GeometryVariant};
use crate::error::Result;
use crate::geometry::{self, Geometry, GeometryKind};

/// A single position, or `[]` for the empty point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCoordinates<P: Position>(pub Option<P>);

impl<P: Position> PointCoordinates<P> {
    pub(crate) fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> PointCoordinates<Q> {
        PointCoordinates(self.0.map(f))
    }
}

impl<P: Position> Serialize for PointCoordinates<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.0 {
            Some(position) => position.serialize(serializer),
            None => serializer.serialize_seq(Some(0))?.end(),
        }
    }
}

impl<'de, P: Position> Deserialize<'de> for PointCoordinates<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if matches!(&value, Value::Array(items) if items.is_empty()) {
            return Ok(PointCoordinates(None));
        }
        serde_json::from_value(value)
            .map(|position| PointCoordinates(Some(position)))
            .map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Position")]
pub struct Point<P: Position = AnyPosition> {
    coordinates: PointCoordinates<P>,
}

impl<P: Position> Point<P> {
    #[must_use]
    pub fn new(position: P) -> Self {
        Self {
            coordinates: PointCoordinates(Some(position)),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            coordinates: PointCoordinates(None),
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> &PointCoordinates<P> {
        &self.coordinates
    }

    pub(crate) fn from_point(point: &geometry::Point) -> Result<Self> {
        Ok(Self {
            coordinates: PointCoordinates(point.0.as_ref().map(P::from_coord).transpose()?),
        })
    }

    pub(crate) fn to_point(&self) -> geometry::Point {
        geometry::Point(self.coordinates.0.as_ref().map(Position::to_coord))
    }

    pub(crate) fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> Point<Q> {
        Point {
            coordinates: self.coordinates.map(f),
        }
    }
}

impl<P: Position> GeometryVariant for Point<P> {
    const KIND: GeometryKind = GeometryKind::Point;

    fn from_canonical(geometry: &Geometry) -> Result<Self> {
        match geometry {
            Geometry::Point(point) => Self::from_point(point),
            other => Err(mismatch(Self::KIND, other)),
        }
    }

    fn to_canonical(&self) -> Geometry {
        Geometry::Point(self.to_point())
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_encode() {
        let origin = Geometry::Point(geometry::Point::new(0., 0.));
        let point = Point::<[f64; 2]>::from_canonical(&origin).unwrap();
        assert_eq!(
            serde_json::to_value(&point).unwrap(),
            json!({"coordinates": [0.0, 0.0]})
        );
    }

    #[test]
    fn test_empty_point() {
        let point: Point = serde_json::from_value(json!({"coordinates": []})).unwrap();
        assert_eq!(point, Point::empty());
        assert_eq!(point.to_canonical(), Geometry::Point(geometry::Point::empty()));
        assert_eq!(serde_json::to_value(&point).unwrap(), json!({"coordinates": []}));
    }

    #[test]
    fn test_dimension_is_fixed() {
        let raised = json!({"coordinates": [1, 2, 3]});
        assert!(serde_json::from_value::<Point<[f64; 2]>>(raised.clone()).is_err());
        assert!(serde_json::from_value::<Point<[f64; 3]>>(json!({"coordinates": [1, 2]})).is_err());
        let point: Point<[f64; 3]> = serde_json::from_value(raised).unwrap();
        assert_eq!(
            point.to_canonical(),
            Geometry::Point(geometry::Point::new_z(1., 2., 3.))
        );
    }

    #[test]
    fn test_wrong_kind() {
        let line = Geometry::LineString([(0., 0.), (1., 1.)].into_iter().collect());
        assert!(Point::<AnyPosition>::from_canonical(&line).is_err());
    }
}

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use super::position::{uniform_dimension, AnyPosition, Position};
use super::{mismatch, GeometryVariant};
use crate::error::{Error, Result};
use crate::geometry::{self, Geometry, GeometryKind};

/// At least two positions of one dimensionality.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent, bound = "P: Position")]
pub struct LineStringCoordinates<P: Position>(Vec<P>);

impl<P: Position> LineStringCoordinates<P> {
    /// # Errors
    ///
    /// Fails with fewer than two positions or mixed dimensionality.
    pub fn new(positions: Vec<P>) -> Result<Self> {
        if positions.len() < 2 {
            return Err(Error::validation(format!(
                "A LineString must have at least 2 positions, found {}.",
                positions.len()
            )));
        }
        uniform_dimension(&positions)?;
        Ok(Self(positions))
    }

    #[must_use]
    pub fn positions(&self) -> &[P] {
        &self.0
    }

    pub(crate) fn from_line(line: &geometry::LineString) -> Result<Self> {
        Self::new(line.0.iter().map(P::from_coord).collect::<Result<_>>()?)
    }

    pub(crate) fn to_line(&self) -> geometry::LineString {
        self.0.iter().map(Position::to_coord).collect()
    }

    pub(crate) fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> LineStringCoordinates<Q> {
        LineStringCoordinates(self.0.into_iter().map(f).collect())
    }
}

impl<'de, P: Position> Deserialize<'de> for LineStringCoordinates<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Self::new(Vec::deserialize(deserializer)?).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Position")]
pub struct LineString<P: Position = AnyPosition> {
    coordinates: LineStringCoordinates<P>,
}

impl<P: Position> LineString<P> {
    #[must_use]
    pub fn new(coordinates: LineStringCoordinates<P>) -> Self {
        Self { coordinates }
    }

    #[must_use]
    pub fn coordinates(&self) -> &LineStringCoordinates<P> {
        &self.coordinates
    }

    pub(crate) fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> LineString<Q> {
        LineString {
            coordinates: self.coordinates.map(f),
        }
    }
}

impl<P: Position> GeometryVariant for LineString<P> {
    const KIND: GeometryKind = GeometryKind::LineString;

    fn from_canonical(geometry: &Geometry) -> Result<Self> {
        match geometry {
            Geometry::LineString(line) => Ok(Self::new(LineStringCoordinates::from_line(line)?)),
            other => Err(mismatch(Self::KIND, other)),
        }
    }

    fn to_canonical(&self) -> Geometry {
        Geometry::LineString(self.coordinates.to_line())
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_min_length() {
        assert!(serde_json::from_value::<LineString>(json!({"coordinates": [[0, 0]]})).is_err());
        assert!(LineStringCoordinates::<[f64; 2]>::new(vec![]).is_err());
        let line: LineString =
            serde_json::from_value(json!({"coordinates": [[0, 0], [1, 1]]})).unwrap();
        assert_eq!(line.coordinates().positions().len(), 2);
    }

    #[test]
    fn test_mixed_dimensions() {
        let mixed = json!({"coordinates": [[0, 0], [1, 1, 1]]});
        assert!(serde_json::from_value::<LineString>(mixed).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let geometry = Geometry::LineString(
            [(10., 10., 1.), (20., 20., 1.), (21., 30., 1.)]
                .into_iter()
                .collect(),
        );
        let line = LineString::<[f64; 3]>::from_canonical(&geometry).unwrap();
        assert_eq!(line.to_canonical(), geometry);
        assert!(LineString::<[f64; 2]>::from_canonical(&geometry).is_err());
    }
}

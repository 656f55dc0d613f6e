use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use super::position::{uniform_dimension, AnyPosition, Position};
use super::{mismatch, GeometryVariant};
use crate::error::{Error, Result};
use crate::geometry::{self, Geometry, GeometryKind};

/// A closed ring: at least four positions, the last equal to the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent, bound = "P: Position")]
pub struct LinearRing<P: Position>(Vec<P>);

impl<P: Position> LinearRing<P> {
    /// # Errors
    ///
    /// Fails with fewer than four positions, an open ring or mixed dimensionality.
    pub fn new(positions: Vec<P>) -> Result<Self> {
        if positions.len() < 4 {
            return Err(Error::validation(format!(
                "A LinearRing must have at least 4 positions, found {}.",
                positions.len()
            )));
        }
        if positions.first() != positions.last() {
            return Err(Error::validation(
                "The first and last position of a LinearRing must be the same.",
            ));
        }
        uniform_dimension(&positions)?;
        Ok(Self(positions))
    }

    #[must_use]
    pub fn positions(&self) -> &[P] {
        &self.0
    }

    fn from_line(line: &geometry::LineString) -> Result<Self> {
        Self::new(line.0.iter().map(P::from_coord).collect::<Result<_>>()?)
    }

    fn to_line(&self) -> geometry::LineString {
        self.0.iter().map(Position::to_coord).collect()
    }

    fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> LinearRing<Q> {
        LinearRing(self.0.into_iter().map(f).collect())
    }
}

impl<'de, P: Position> Deserialize<'de> for LinearRing<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Self::new(Vec::deserialize(deserializer)?).map_err(D::Error::custom)
    }
}

/// Exterior ring followed by the holes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent, bound = "P: Position")]
pub struct PolygonCoordinates<P: Position>(Vec<LinearRing<P>>);

impl<P: Position> PolygonCoordinates<P> {
    /// # Errors
    ///
    /// Fails without an exterior ring or when rings differ in dimensionality.
    pub fn new(rings: Vec<LinearRing<P>>) -> Result<Self> {
        if rings.is_empty() {
            return Err(Error::validation(
                "A Polygon must have at least an exterior ring.",
            ));
        }
        uniform_dimension(rings.iter().flat_map(|ring| ring.0.iter()))?;
        Ok(Self(rings))
    }

    #[must_use]
    pub fn exterior(&self) -> &LinearRing<P> {
        &self.0[0]
    }

    #[must_use]
    pub fn interiors(&self) -> &[LinearRing<P>] {
        &self.0[1..]
    }

    #[must_use]
    pub fn rings(&self) -> &[LinearRing<P>] {
        &self.0
    }

    pub(crate) fn from_polygon(polygon: &geometry::Polygon) -> Result<Self> {
        Self::new(polygon.rings().map(LinearRing::from_line).collect::<Result<_>>()?)
    }

    pub(crate) fn to_polygon(&self) -> geometry::Polygon {
        geometry::Polygon::new(
            self.exterior().to_line(),
            self.interiors().iter().map(LinearRing::to_line).collect(),
        )
    }

    pub(crate) fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> PolygonCoordinates<Q> {
        PolygonCoordinates(self.0.into_iter().map(|ring| ring.map(f)).collect())
    }
}

impl<'de, P: Position> Deserialize<'de> for PolygonCoordinates<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Self::new(Vec::deserialize(deserializer)?).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Position")]
pub struct Polygon<P: Position = AnyPosition> {
    coordinates: PolygonCoordinates<P>,
}

impl<P: Position> Polygon<P> {
    #[must_use]
    pub fn new(coordinates: PolygonCoordinates<P>) -> Self {
        Self { coordinates }
    }

    #[must_use]
    pub fn coordinates(&self) -> &PolygonCoordinates<P> {
        &self.coordinates
    }

    pub(crate) fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> Polygon<Q> {
        Polygon {
            coordinates: self.coordinates.map(f),
        }
    }
}

impl<P: Position> GeometryVariant for Polygon<P> {
    const KIND: GeometryKind = GeometryKind::Polygon;

    fn from_canonical(geometry: &Geometry) -> Result<Self> {
        match geometry {
            Geometry::Polygon(polygon) => {
                Ok(Self::new(PolygonCoordinates::from_polygon(polygon)?))
            }
            other => Err(mismatch(Self::KIND, other)),
        }
    }

    fn to_canonical(&self) -> Geometry {
        Geometry::Polygon(self.coordinates.to_polygon())
    }
}

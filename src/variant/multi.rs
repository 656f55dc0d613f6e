//! `MultiPoint`, `MultiLineString` and `MultiPolygon` variants.
//!
//! Parts may be absent (an empty multi geometry), but every position across all
//! parts must share one dimensionality.
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use super::linestring::LineStringCoordinates;
use super::polygon::PolygonCoordinates;
use super::position::{uniform_dimension, AnyPosition, Position};
use super::{mismatch, GeometryVariant};
use crate::error::{Error, Result};
use crate::geometry::{self, Geometry, GeometryKind};

macro_rules! validated_coordinates {
    ($name:ident, $item:ty) => {
        impl<'de, P: Position> Deserialize<'de> for $name<P> {
            fn deserialize<D: Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                Self::new(Vec::<$item>::deserialize(deserializer)?).map_err(D::Error::custom)
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent, bound = "P: Position")]
pub struct MultiPointCoordinates<P: Position>(Vec<P>);

impl<P: Position> MultiPointCoordinates<P> {
    /// # Errors
    ///
    /// Fails on mixed dimensionality.
    pub fn new(positions: Vec<P>) -> Result<Self> {
        uniform_dimension(&positions)?;
        Ok(Self(positions))
    }

    #[must_use]
    pub fn positions(&self) -> &[P] {
        &self.0
    }

    fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> MultiPointCoordinates<Q> {
        MultiPointCoordinates(self.0.into_iter().map(f).collect())
    }
}

validated_coordinates!(MultiPointCoordinates, P);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent, bound = "P: Position")]
pub struct MultiLineStringCoordinates<P: Position>(Vec<LineStringCoordinates<P>>);

impl<P: Position> MultiLineStringCoordinates<P> {
    /// # Errors
    ///
    /// Fails when the lines differ in dimensionality.
    pub fn new(lines: Vec<LineStringCoordinates<P>>) -> Result<Self> {
        uniform_dimension(lines.iter().flat_map(LineStringCoordinates::positions))?;
        Ok(Self(lines))
    }

    #[must_use]
    pub fn lines(&self) -> &[LineStringCoordinates<P>] {
        &self.0
    }

    fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> MultiLineStringCoordinates<Q> {
        MultiLineStringCoordinates(self.0.into_iter().map(|line| line.map(f)).collect())
    }
}

validated_coordinates!(MultiLineStringCoordinates, LineStringCoordinates<P>);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent, bound = "P: Position")]
pub struct MultiPolygonCoordinates<P: Position>(Vec<PolygonCoordinates<P>>);

impl<P: Position> MultiPolygonCoordinates<P> {
    /// # Errors
    ///
    /// Fails when the polygons differ in dimensionality.
    pub fn new(polygons: Vec<PolygonCoordinates<P>>) -> Result<Self> {
        uniform_dimension(
            polygons
                .iter()
                .flat_map(PolygonCoordinates::rings)
                .flat_map(|ring| ring.positions()),
        )?;
        Ok(Self(polygons))
    }

    #[must_use]
    pub fn polygons(&self) -> &[PolygonCoordinates<P>] {
        &self.0
    }

    fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> MultiPolygonCoordinates<Q> {
        MultiPolygonCoordinates(self.0.into_iter().map(|polygon| polygon.map(f)).collect())
    }
}

validated_coordinates!(MultiPolygonCoordinates, PolygonCoordinates<P>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Position")]
pub struct MultiPoint<P: Position = AnyPosition> {
    coordinates: MultiPointCoordinates<P>,
}

impl<P: Position> MultiPoint<P> {
    #[must_use]
    pub fn new(coordinates: MultiPointCoordinates<P>) -> Self {
        Self { coordinates }
    }

    #[must_use]
    pub fn coordinates(&self) -> &MultiPointCoordinates<P> {
        &self.coordinates
    }

    pub(crate) fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> MultiPoint<Q> {
        MultiPoint {
            coordinates: self.coordinates.map(f),
        }
    }
}

impl<P: Position> GeometryVariant for MultiPoint<P> {
    const KIND: GeometryKind = GeometryKind::MultiPoint;

    fn from_canonical(geometry: &Geometry) -> Result<Self> {
        let Geometry::MultiPoint(points) = geometry else {
            return Err(mismatch(Self::KIND, geometry));
        };
        let positions = points
            .0
            .iter()
            .map(|point| match &point.0 {
                Some(coord) => P::from_coord(coord),
                None => Err(Error::validation(
                    "A MultiPoint cannot contain empty points.",
                )),
            })
            .collect::<Result<_>>()?;
        Ok(Self::new(MultiPointCoordinates::new(positions)?))
    }

    fn to_canonical(&self) -> Geometry {
        Geometry::MultiPoint(geometry::MultiPoint(
            self.coordinates
                .0
                .iter()
                .map(|position| geometry::Point(Some(position.to_coord())))
                .collect(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Position")]
pub struct MultiLineString<P: Position = AnyPosition> {
    coordinates: MultiLineStringCoordinates<P>,
}

impl<P: Position> MultiLineString<P> {
    #[must_use]
    pub fn new(coordinates: MultiLineStringCoordinates<P>) -> Self {
        Self { coordinates }
    }

    #[must_use]
    pub fn coordinates(&self) -> &MultiLineStringCoordinates<P> {
        &self.coordinates
    }

    pub(crate) fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> MultiLineString<Q> {
        MultiLineString {
            coordinates: self.coordinates.map(f),
        }
    }
}

impl<P: Position> GeometryVariant for MultiLineString<P> {
    const KIND: GeometryKind = GeometryKind::MultiLineString;

    fn from_canonical(geometry: &Geometry) -> Result<Self> {
        let Geometry::MultiLineString(lines) = geometry else {
            return Err(mismatch(Self::KIND, geometry));
        };
        let lines = lines
            .0
            .iter()
            .map(LineStringCoordinates::from_line)
            .collect::<Result<_>>()?;
        Ok(Self::new(MultiLineStringCoordinates::new(lines)?))
    }

    fn to_canonical(&self) -> Geometry {
        Geometry::MultiLineString(geometry::MultiLineString(
            self.coordinates
                .0
                .iter()
                .map(LineStringCoordinates::to_line)
                .collect(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Position")]
pub struct MultiPolygon<P: Position = AnyPosition> {
    coordinates: MultiPolygonCoordinates<P>,
}

impl<P: Position> MultiPolygon<P> {
    #[must_use]
    pub fn new(coordinates: MultiPolygonCoordinates<P>) -> Self {
        Self { coordinates }
    }

    #[must_use]
    pub fn coordinates(&self) -> &MultiPolygonCoordinates<P> {
        &self.coordinates
    }

    pub(crate) fn map<Q: Position>(self, f: &impl Fn(P) -> Q) -> MultiPolygon<Q> {
        MultiPolygon {
            coordinates: self.coordinates.map(f),
        }
    }
}

impl<P: Position> GeometryVariant for MultiPolygon<P> {
    const KIND: GeometryKind = GeometryKind::MultiPolygon;

    fn from_canonical(geometry: &Geometry) -> Result<Self> {
        let Geometry::MultiPolygon(polygons) = geometry else {
            return Err(mismatch(Self::KIND, geometry));
        };
        let polygons = polygons
            .0
            .iter()
            .map(PolygonCoordinates::from_polygon)
            .collect::<Result<_>>()?;
        Ok(Self::new(MultiPolygonCoordinates::new(polygons)?))
    }

    fn to_canonical(&self) -> Geometry {
        Geometry::MultiPolygon(geometry::MultiPolygon(
            self.coordinates
                .0
                .iter()
                .map(PolygonCoordinates::to_polygon)
                .collect(),
        ))
    }
}

//! The canonical, wire-format independent geometry model.
//!
//! A [`Geometry`] is what validated record fields hold. It knows its
//! [`GeometryKind`], whether it carries Z values and how to walk its coordinates;
//! it does not know anything about GeoJSON or WKT. Conversions to those formats live
//! in [`crate::variant`], [`crate::convert`] and [`crate::wkt`].
//!
//! ```rust
//! use serde_geofeature::geometry::{Coord, Geometry, GeometryKind, LineString};
//!
//! let line = Geometry::LineString(LineString(vec![
//!     Coord::xyz(0.0, 0.0, 5.0),
//!     Coord::xyz(1.0, 1.0, 7.0),
//! ]));
//! assert_eq!(line.kind(), GeometryKind::LineString);
//! assert!(line.has_z());
//! assert!(!line.force_2d().has_z());
//! ```
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coord {
    #[must_use]
    pub fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    #[must_use]
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    #[must_use]
    pub fn has_z(&self) -> bool {
        self.z.is_some()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f64::is_finite)
    }

    #[must_use]
    pub fn to_2d(self) -> Self {
        Self { z: None, ..self }
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Coord::xy(x, y)
    }
}

impl From<(f64, f64, f64)> for Coord {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Coord::xyz(x, y, z)
    }
}

impl From<Coord> for geo::Coord {
    fn from(coord: Coord) -> Self {
        geo::Coord {
            x: coord.x,
            y: coord.y,
        }
    }
}

impl From<geo::Coord> for Coord {
    fn from(coord: geo::Coord) -> Self {
        Coord::xy(coord.x, coord.y)
    }
}

/// A point; `Point(None)` is the empty point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point(pub Option<Coord>);

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Point(Some(Coord::xy(x, y)))
    }

    #[must_use]
    pub fn new_z(x: f64, y: f64, z: f64) -> Self {
        Point(Some(Coord::xyz(x, y, z)))
    }

    #[must_use]
    pub fn empty() -> Self {
        Point(None)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString(pub Vec<Coord>);

impl<C: Into<Coord>> FromIterator<C> for LineString {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        LineString(iter.into_iter().map(Into::into).collect())
    }
}

/// A polygon with one exterior ring and any number of holes.
///
/// An empty polygon has an empty exterior and no interiors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    exterior: LineString,
    interiors: Vec<LineString>,
}

impl Polygon {
    #[must_use]
    pub fn new(exterior: LineString, interiors: Vec<LineString>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    #[must_use]
    pub fn exterior(&self) -> &LineString {
        &self.exterior
    }

    #[must_use]
    pub fn interiors(&self) -> &[LineString] {
        &self.interiors
    }

    /// Exterior followed by the interiors; nothing for an empty polygon.
    pub fn rings(&self) -> impl Iterator<Item = &LineString> {
        let exterior = (!self.is_empty()).then_some(&self.exterior);
        exterior.into_iter().chain(self.interiors.iter())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exterior.0.is_empty() && self.interiors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPoint(pub Vec<Point>);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiLineString(pub Vec<LineString>);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPolygon(pub Vec<Polygon>);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryCollection(pub Vec<Geometry>);

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

/// Tag of the seven supported geometry kinds, spelled as in GeoJSON and WKT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 7] = [
        GeometryKind::Point,
        GeometryKind::LineString,
        GeometryKind::Polygon,
        GeometryKind::MultiPoint,
        GeometryKind::MultiLineString,
        GeometryKind::MultiPolygon,
        GeometryKind::GeometryCollection,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeometryKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::validation(format!("Unknown geometry type '{s}'.")))
    }
}

impl Geometry {
    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Whether any coordinate carries a Z value.
    #[must_use]
    pub fn has_z(&self) -> bool {
        self.coords().any(Coord::has_z)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords().next().is_none()
    }

    /// All coordinates in document order, descending into rings, parts and members.
    #[must_use]
    pub fn coords(&self) -> Box<dyn Iterator<Item = &Coord> + '_> {
        match self {
            Geometry::Point(point) => Box::new(point.0.iter()),
            Geometry::LineString(line) => Box::new(line.0.iter()),
            Geometry::Polygon(polygon) => Box::new(polygon.rings().flat_map(|ring| ring.0.iter())),
            Geometry::MultiPoint(points) => {
                Box::new(points.0.iter().filter_map(|point| point.0.as_ref()))
            }
            Geometry::MultiLineString(lines) => {
                Box::new(lines.0.iter().flat_map(|line| line.0.iter()))
            }
            Geometry::MultiPolygon(polygons) => Box::new(
                polygons
                    .0
                    .iter()
                    .flat_map(Polygon::rings)
                    .flat_map(|ring| ring.0.iter()),
            ),
            Geometry::GeometryCollection(collection) => {
                Box::new(collection.0.iter().flat_map(Geometry::coords))
            }
        }
    }

    /// Sub-geometries of multi and collection kinds; `None` for single geometries.
    #[must_use]
    pub fn parts(&self) -> Option<Vec<Geometry>> {
        match self {
            Geometry::Point(_) | Geometry::LineString(_) | Geometry::Polygon(_) => None,
            Geometry::MultiPoint(points) => {
                Some(points.0.iter().copied().map(Geometry::Point).collect())
            }
            Geometry::MultiLineString(lines) => {
                Some(lines.0.iter().cloned().map(Geometry::LineString).collect())
            }
            Geometry::MultiPolygon(polygons) => {
                Some(polygons.0.iter().cloned().map(Geometry::Polygon).collect())
            }
            Geometry::GeometryCollection(collection) => Some(collection.0.clone()),
        }
    }

    /// A copy of this geometry with every Z value dropped.
    #[must_use]
    pub fn force_2d(&self) -> Geometry {
        self.map_coords(Coord::to_2d)
    }

    #[must_use]
    pub fn map_coords(&self, f: impl Fn(Coord) -> Coord + Copy) -> Geometry {
        let line = |line: &LineString| LineString(line.0.iter().copied().map(f).collect());
        let polygon = |polygon: &Polygon| {
            Polygon::new(line(&polygon.exterior), polygon.interiors.iter().map(line).collect())
        };
        match self {
            Geometry::Point(point) => Geometry::Point(Point(point.0.map(f))),
            Geometry::LineString(l) => Geometry::LineString(line(l)),
            Geometry::Polygon(p) => Geometry::Polygon(polygon(p)),
            Geometry::MultiPoint(points) => Geometry::MultiPoint(MultiPoint(
                points.0.iter().map(|point| Point(point.0.map(f))).collect(),
            )),
            Geometry::MultiLineString(lines) => {
                Geometry::MultiLineString(MultiLineString(lines.0.iter().map(line).collect()))
            }
            Geometry::MultiPolygon(polygons) => {
                Geometry::MultiPolygon(MultiPolygon(polygons.0.iter().map(polygon).collect()))
            }
            Geometry::GeometryCollection(collection) => {
                Geometry::GeometryCollection(GeometryCollection(
                    collection.0.iter().map(|geom| geom.map_coords(f)).collect(),
                ))
            }
        }
    }
}

/// Planar projection onto `geo` types, used for bounds and overlay operations.
///
/// `geo` has no empty point, so an empty point becomes an empty `MultiPoint`.
impl From<&Geometry> for geo::Geometry<f64> {
    fn from(geom: &Geometry) -> Self {
        fn line(line: &LineString) -> geo::LineString<f64> {
            geo::LineString::new(line.0.iter().copied().map(Into::into).collect())
        }
        fn polygon(polygon: &Polygon) -> geo::Polygon<f64> {
            geo::Polygon::new(
                line(polygon.exterior()),
                polygon.interiors().iter().map(line).collect(),
            )
        }

        match geom {
            Geometry::Point(Point(Some(coord))) => {
                geo::Geometry::Point(geo::Point::from(geo::Coord::from(*coord)))
            }
            Geometry::Point(Point(None)) => geo::Geometry::MultiPoint(geo::MultiPoint::new(vec![])),
            Geometry::LineString(l) => geo::Geometry::LineString(line(l)),
            Geometry::Polygon(p) => geo::Geometry::Polygon(polygon(p)),
            Geometry::MultiPoint(points) => geo::Geometry::MultiPoint(geo::MultiPoint::new(
                points
                    .0
                    .iter()
                    .filter_map(|point| point.0)
                    .map(|coord| geo::Point::from(geo::Coord::from(coord)))
                    .collect(),
            )),
            Geometry::MultiLineString(lines) => geo::Geometry::MultiLineString(
                geo::MultiLineString::new(lines.0.iter().map(line).collect()),
            ),
            Geometry::MultiPolygon(polygons) => geo::Geometry::MultiPolygon(
                geo::MultiPolygon::new(polygons.0.iter().map(polygon).collect()),
            ),
            Geometry::GeometryCollection(collection) => geo::Geometry::GeometryCollection(
                geo::GeometryCollection(collection.0.iter().map(Into::into).collect()),
            ),
        }
    }
}

impl From<geo::Polygon<f64>> for Polygon {
    fn from(polygon: geo::Polygon<f64>) -> Self {
        let (exterior, interiors) = polygon.into_inner();
        let line = |line: geo::LineString<f64>| line.0.into_iter().map(Coord::from).collect();
        Polygon::new(line(exterior), interiors.into_iter().map(line).collect())
    }
}

impl From<geo::MultiPolygon<f64>> for MultiPolygon {
    fn from(polygons: geo::MultiPolygon<f64>) -> Self {
        MultiPolygon(polygons.0.into_iter().map(Polygon::from).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(
            [(0., 0.), (0., 40.), (40., 40.), (40., 0.), (0., 0.)]
                .into_iter()
                .collect(),
            vec![[(10., 10.), (10., 20.), (20., 20.), (10., 10.)]
                .into_iter()
                .collect()],
        )
    }

    #[test]
    fn test_kind_names() {
        for kind in GeometryKind::ALL {
            assert_eq!(kind.as_str().parse::<GeometryKind>().unwrap(), kind);
        }
        assert!("Circle".parse::<GeometryKind>().is_err());
    }

    #[test]
    fn test_coords_walks_rings() {
        let polygon = Geometry::Polygon(square());
        assert_eq!(polygon.coords().count(), 9);
        assert!(!polygon.has_z());
        assert!(!polygon.is_empty());
        assert!(Geometry::Polygon(Polygon::default()).is_empty());
    }

    #[test]
    fn test_has_z_in_collection() {
        let collection = Geometry::GeometryCollection(GeometryCollection(vec![
            Geometry::Point(Point::new(1., 2.)),
            Geometry::Point(Point::new_z(1., 2., 3.)),
        ]));
        assert!(collection.has_z());
        assert!(!collection.force_2d().has_z());
        assert!(!Geometry::GeometryCollection(GeometryCollection::default()).has_z());
    }

    #[test]
    fn test_force_2d_keeps_xy() {
        let line = Geometry::LineString([(1., 2., 3.), (4., 5., 6.)].into_iter().collect());
        let expected = Geometry::LineString([(1., 2.), (4., 5.)].into_iter().collect());
        assert_eq!(line.force_2d(), expected);
    }

    #[test]
    fn test_parts() {
        let points = Geometry::MultiPoint(MultiPoint(vec![Point::new(0., 0.), Point::new(1., 1.)]));
        let parts = points.parts().unwrap();
        assert_eq!(parts, vec![
            Geometry::Point(Point::new(0., 0.)),
            Geometry::Point(Point::new(1., 1.))
        ]);
        assert!(Geometry::Point(Point::new(0., 0.)).parts().is_none());
    }

    #[test]
    fn test_geo_projection() {
        let geo_geom: geo::Geometry<f64> = (&Geometry::Polygon(square())).into();
        match geo_geom {
            geo::Geometry::Polygon(polygon) => {
                assert_eq!(polygon.exterior().0.len(), 5);
                assert_eq!(polygon.interiors().len(), 1);
            }
            _ => panic!("Expected Polygon geometry"),
        }
    }
}

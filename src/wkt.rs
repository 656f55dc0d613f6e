//! Well-Known Text reading and writing for canonical geometries.
use geozero::{error::GeozeroError, GeozeroGeometry};

use crate::collector::GeometryBuilder;
use crate::error::{Error, Result};
use crate::geometry::{Coord, Geometry, LineString, Polygon};

/// Parses a WKT string, keeping Z values.
///
/// # Errors
///
/// Returns [`Error::InvalidWkt`] with the parser's error as its source.
pub fn from_wkt(text: &str) -> Result<Geometry> {
    let mut builder = GeometryBuilder::new();
    geozero::wkt::WktStr(text)
        .process_geom(&mut builder)
        .map_err(Error::InvalidWkt)?;
    builder.take_geometry().ok_or_else(|| {
        Error::InvalidWkt(GeozeroError::Geometry("No geometry found.".to_string()))
    })
}

/// Writes a geometry as WKT.
///
/// Geometries with Z values are tagged (`POINT Z (10 20 30)`). Members of a
/// `GeometryCollection` are tagged one by one, the collection itself never is.
///
/// # Errors
///
/// Fails with a validation error for a `MultiPoint` holding an empty point, and for a
/// geometry mixing 2D and 3D coordinates. WKT can express neither.
pub fn to_wkt(geometry: &Geometry) -> Result<String> {
    let mut writer = WktWriter::default();
    writer.geometry(geometry, 0)?;
    Ok(writer.out)
}

#[derive(Debug, Default)]
struct WktWriter {
    out: String,
}

impl WktWriter {
    fn comma(&mut self, idx: usize) {
        if idx > 0 {
            self.out.push(',');
        }
    }

    /// Writes the type tag. Returns `false` when the geometry was written as `EMPTY`.
    fn header(&mut self, tag: &str, with_z: bool, empty: bool, idx: usize) -> bool {
        self.comma(idx);
        self.out.push_str(tag);
        if empty {
            self.out.push_str(" EMPTY");
            return false;
        }
        if with_z {
            self.out.push_str(" Z ");
        }
        true
    }

    fn coord(&mut self, coord: &Coord, with_z: bool, idx: usize) -> Result<()> {
        self.comma(idx);
        self.out.push_str(&format!("{} {}", coord.x, coord.y));
        match (with_z, coord.z) {
            (true, Some(z)) => self.out.push_str(&format!(" {z}")),
            (true, None) | (false, Some(_)) => {
                return Err(Error::validation(
                    "Cannot write WKT for a geometry mixing 2D and 3D coordinates.",
                ))
            }
            (false, None) => {}
        }
        Ok(())
    }

    fn coords(&mut self, coords: &[Coord], with_z: bool) -> Result<()> {
        self.out.push('(');
        for (idx, coord) in coords.iter().enumerate() {
            self.coord(coord, with_z, idx)?;
        }
        self.out.push(')');
        Ok(())
    }

    /// An untagged line: a polygon ring or a `MultiLineString` member.
    fn line(&mut self, line: &LineString, with_z: bool, idx: usize) -> Result<()> {
        self.comma(idx);
        if line.0.is_empty() {
            self.out.push_str("EMPTY");
            return Ok(());
        }
        self.coords(&line.0, with_z)
    }

    fn rings(&mut self, polygon: &Polygon, with_z: bool) -> Result<()> {
        self.out.push('(');
        for (idx, ring) in polygon.rings().enumerate() {
            self.line(ring, with_z, idx)?;
        }
        self.out.push(')');
        Ok(())
    }

    fn geometry(&mut self, geometry: &Geometry, idx: usize) -> Result<()> {
        let with_z = geometry.has_z();
        match geometry {
            Geometry::Point(point) => {
                if self.header("POINT", with_z, point.0.is_none(), idx) {
                    self.coords(point.0.as_slice(), with_z)?;
                }
            }
            Geometry::LineString(line) => {
                if self.header("LINESTRING", with_z, line.0.is_empty(), idx) {
                    self.coords(&line.0, with_z)?;
                }
            }
            Geometry::Polygon(polygon) => {
                if self.header("POLYGON", with_z, polygon.is_empty(), idx) {
                    self.rings(polygon, with_z)?;
                }
            }
            Geometry::MultiPoint(points) => {
                if self.header("MULTIPOINT", with_z, points.0.is_empty(), idx) {
                    self.out.push('(');
                    for (i, point) in points.0.iter().enumerate() {
                        let Some(coord) = &point.0 else {
                            return Err(Error::validation(
                                "Cannot write WKT for a MultiPoint holding an empty point.",
                            ));
                        };
                        self.comma(i);
                        self.coords(std::slice::from_ref(coord), with_z)?;
                    }
                    self.out.push(')');
                }
            }
            Geometry::MultiLineString(lines) => {
                if self.header("MULTILINESTRING", with_z, lines.0.is_empty(), idx) {
                    self.out.push('(');
                    for (i, line) in lines.0.iter().enumerate() {
                        self.line(line, with_z, i)?;
                    }
                    self.out.push(')');
                }
            }
            Geometry::MultiPolygon(polygons) => {
                if self.header("MULTIPOLYGON", with_z, polygons.0.is_empty(), idx) {
                    self.out.push('(');
                    for (i, polygon) in polygons.0.iter().enumerate() {
                        self.comma(i);
                        if polygon.is_empty() {
                            self.out.push_str("EMPTY");
                        } else {
                            self.rings(polygon, with_z)?;
                        }
                    }
                    self.out.push(')');
                }
            }
            Geometry::GeometryCollection(collection) => {
                if self.header("GEOMETRYCOLLECTION", false, collection.0.is_empty(), idx) {
                    self.out.push('(');
                    for (i, member) in collection.0.iter().enumerate() {
                        self.geometry(member, i)?;
                    }
                    self.out.push(')');
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::error::Error as _;

    use super::*;
    use crate::geometry::{GeometryCollection, GeometryKind, MultiPoint, Point};

    #[test]
    fn test_parse_2d() {
        let geometry = from_wkt("POLYGON((0 0, 0 40, 40 40, 40 0, 0 0))").unwrap();
        assert_eq!(geometry.kind(), GeometryKind::Polygon);
        assert!(!geometry.has_z());
        assert_eq!(geometry.coords().count(), 5);
    }

    #[test]
    fn test_parse_3d() {
        let geometry = from_wkt("POINT Z (10 20 30)").unwrap();
        assert_eq!(geometry, Geometry::Point(Point::new_z(10., 20., 30.)));
    }

    #[test]
    fn test_invalid_wkt() {
        let err = from_wkt("not-a-wkt-string").unwrap_err();
        assert!(matches!(err, Error::InvalidWkt(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_write() {
        for (text, expected) in [
            ("POINT (10 20)", "POINT(10 20)"),
            ("POINT Z (10 20 3)", "POINT Z (10 20 3)"),
            ("POINT EMPTY", "POINT EMPTY"),
            ("LINESTRING (0 1, 1 2)", "LINESTRING(0 1,1 2)"),
            ("LINESTRING Z (0 1 2, 1 2 3)", "LINESTRING Z (0 1 2,1 2 3)"),
            (
                "POLYGON Z ((0 0 1, 0 1 1, 1 1 1, 0 0 1))",
                "POLYGON Z ((0 0 1,0 1 1,1 1 1,0 0 1))",
            ),
            ("MULTIPOINT Z ((0 0 1), (1 2 3))", "MULTIPOINT Z ((0 0 1),(1 2 3))"),
            (
                "GEOMETRYCOLLECTION(POINT Z (1 2 3), LINESTRING (0 0, 1 1))",
                "GEOMETRYCOLLECTION(POINT Z (1 2 3),LINESTRING(0 0,1 1))",
            ),
        ] {
            assert_eq!(to_wkt(&from_wkt(text).unwrap()).unwrap(), expected);
        }
    }

    #[test]
    fn test_roundtrip() {
        for text in [
            "LINESTRING(10 10, 20 20, 21 30)",
            "MULTIPOINT((0 0), (10 20), (15 20), (30 30))",
            "MULTIPOLYGON(((10 10, 10 20, 20 20, 20 15, 10 10)),((60 60, 70 70, 80 60, 60 60)))",
            "GEOMETRYCOLLECTION(POINT (10 10), POINT (30 30), LINESTRING (15 15, 20 20))",
            "POINT Z (10 20 3)",
            "LINESTRING Z (10 10 30, 20 20 30, 21 30 30)",
            "POLYGON Z ((0 0 30, 0 40 30, 40 40 30, 40 0 30, 0 0 30))",
            "MULTIPOINT Z ((0 0 30), (10 20 30))",
            "MULTILINESTRING Z ((10 10 30, 20 20 30), (15 15 30, 30 15 30))",
            "MULTIPOLYGON Z (((10 10 30, 10 20 30, 20 20 30, 10 10 30)))",
            "GEOMETRYCOLLECTION(POINT Z (10 10 30), LINESTRING Z (15 15 30, 20 20 30))",
        ] {
            let geometry = from_wkt(text).unwrap();
            assert_eq!(from_wkt(&to_wkt(&geometry).unwrap()).unwrap(), geometry);
        }
    }

    #[test]
    fn test_unwritable() {
        let holey = Geometry::MultiPoint(MultiPoint(vec![Point::new(1., 2.), Point::empty()]));
        assert!(to_wkt(&holey).is_err());

        let mut line: LineString = [(0., 0., 1.), (1., 1., 1.)].into_iter().collect();
        line.0[1].z = None;
        assert!(to_wkt(&Geometry::LineString(line)).is_err());

        let members = Geometry::GeometryCollection(GeometryCollection(vec![
            Geometry::Point(Point::new(1., 2.)),
            Geometry::Point(Point::new_z(1., 2., 3.)),
        ]));
        assert_eq!(
            to_wkt(&members).unwrap(),
            "GEOMETRYCOLLECTION(POINT(1 2),POINT Z (1 2 3))"
        );
    }
}

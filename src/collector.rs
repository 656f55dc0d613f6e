//! Bridges between geozero's event model and the canonical [`Geometry`].
//!
//! * [`GeometryBuilder`] is a [`GeomProcessor`] that assembles a [`Geometry`] from the
//!   events any geozero reader emits (WKT, `GeoJSON`, ...). Unlike geozero's own
//!   `GeoWriter` it keeps Z values.
//! * [`FeatureCollector`] adds the feature and property callbacks on top, collecting
//!   one [`CollectedFeature`] per feature of a datasource.
//! * [`Geometry`] implements [`GeozeroGeometry`], so it can be replayed into any
//!   geozero writer (this is how WKT is produced).
//!
//! # Example
//!
//! ```rust
//! use geozero::GeozeroDatasource;
//! use serde_geofeature::collector::FeatureCollector;
//! use serde_geofeature::geometry::GeometryKind;
//!
//! let geojson = r#"{
//!     "type": "Feature",
//!     "geometry": {
//!         "type": "Point",
//!         "coordinates": [102.0, 0.5, 10.0]
//!     },
//!     "properties": {
//!         "name": "Test Point",
//!         "value": 42
//!     }
//! }"#;
//!
//! let mut collector = FeatureCollector::new();
//! let mut reader = geozero::geojson::GeoJsonReader(geojson.as_bytes());
//! reader.process(&mut collector).unwrap();
//!
//! let feature = &collector.features[0];
//! assert_eq!(feature.geometry.kind(), GeometryKind::Point);
//! assert!(feature.geometry.has_z());
//! assert_eq!(feature.properties["value"], 42);
//! ```
#![allow(clippy::many_single_char_names)]
use geozero::{
    error::GeozeroError, ColumnValue, CoordDimensions, FeatureProcessor, GeomProcessor,
    GeozeroGeometry, PropertyProcessor,
};
use serde_json::{Map, Value};

use crate::geometry::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use crate::ser::property_value;

/// Geometry under construction; one frame per open `*_begin` event.
#[derive(Debug)]
enum Frame {
    Point(Option<Coord>),
    LineString(Vec<Coord>),
    Polygon(Vec<LineString>),
    MultiPoint(Vec<Point>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    Collection(Vec<Geometry>),
}

fn unexpected(event: &str) -> GeozeroError {
    GeozeroError::Geometry(format!("Unexpected {event} while building a geometry."))
}

fn unsupported(kind: &str) -> geozero::error::Result<()> {
    Err(GeozeroError::Geometry(format!(
        "{kind} geometries are not supported."
    )))
}

#[derive(Debug, Default)]
pub struct GeometryBuilder {
    stack: Vec<Frame>,
    geometry: Option<Geometry>,
}

impl GeometryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last completed top-level geometry, if any.
    pub fn take_geometry(&mut self) -> Option<Geometry> {
        self.geometry.take()
    }

    fn push_coord(&mut self, coord: Coord) -> geozero::error::Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Point(slot)) => *slot = Some(coord),
            Some(Frame::LineString(coords)) => coords.push(coord),
            Some(Frame::MultiPoint(points)) => points.push(Point(Some(coord))),
            _ => return Err(unexpected("coordinate")),
        }
        Ok(())
    }

    fn finish(&mut self, geometry: Geometry) -> geozero::error::Result<()> {
        match (self.stack.last_mut(), geometry) {
            (None, geometry) => self.geometry = Some(geometry),
            (Some(Frame::Collection(members)), geometry) => members.push(geometry),
            (Some(Frame::MultiPoint(points)), Geometry::Point(point)) => points.push(point),
            (Some(_), geometry) => return Err(unexpected(geometry.kind().as_str())),
        }
        Ok(())
    }

    fn pop(&mut self) -> geozero::error::Result<Frame> {
        self.stack.pop().ok_or_else(|| unexpected("end of geometry"))
    }
}

impl GeomProcessor for GeometryBuilder {
    fn dimensions(&self) -> CoordDimensions {
        CoordDimensions::xyz()
    }

    fn xy(&mut self, x: f64, y: f64, _idx: usize) -> geozero::error::Result<()> {
        self.push_coord(Coord::xy(x, y))
    }

    fn coordinate(
        &mut self,
        x: f64,
        y: f64,
        z: Option<f64>,
        _m: Option<f64>,
        _t: Option<f64>,
        _tm: Option<u64>,
        _idx: usize,
    ) -> geozero::error::Result<()> {
        self.push_coord(Coord { x, y, z })
    }

    fn empty_point(&mut self, _idx: usize) -> geozero::error::Result<()> {
        self.finish(Geometry::Point(Point::empty()))
    }

    fn point_begin(&mut self, _idx: usize) -> geozero::error::Result<()> {
        self.stack.push(Frame::Point(None));
        Ok(())
    }

    fn point_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        match self.pop()? {
            Frame::Point(coord) => self.finish(Geometry::Point(Point(coord))),
            _ => Err(unexpected("point end")),
        }
    }

    fn multipoint_begin(&mut self, size: usize, _idx: usize) -> geozero::error::Result<()> {
        self.stack.push(Frame::MultiPoint(Vec::with_capacity(size)));
        Ok(())
    }

    fn multipoint_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        match self.pop()? {
            Frame::MultiPoint(points) => self.finish(Geometry::MultiPoint(MultiPoint(points))),
            _ => Err(unexpected("multipoint end")),
        }
    }

    fn linestring_begin(
        &mut self,
        _tagged: bool,
        size: usize,
        _idx: usize,
    ) -> geozero::error::Result<()> {
        self.stack.push(Frame::LineString(Vec::with_capacity(size)));
        Ok(())
    }

    fn linestring_end(&mut self, tagged: bool, _idx: usize) -> geozero::error::Result<()> {
        let Frame::LineString(coords) = self.pop()? else {
            return Err(unexpected("linestring end"));
        };
        let line = LineString(coords);
        if tagged {
            return self.finish(Geometry::LineString(line));
        }
        match self.stack.last_mut() {
            Some(Frame::Polygon(rings)) => rings.push(line),
            Some(Frame::MultiLineString(lines)) => lines.push(line),
            _ => return Err(unexpected("untagged linestring")),
        }
        Ok(())
    }

    fn multilinestring_begin(&mut self, size: usize, _idx: usize) -> geozero::error::Result<()> {
        self.stack
            .push(Frame::MultiLineString(Vec::with_capacity(size)));
        Ok(())
    }

    fn multilinestring_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        match self.pop()? {
            Frame::MultiLineString(lines) => {
                self.finish(Geometry::MultiLineString(MultiLineString(lines)))
            }
            _ => Err(unexpected("multilinestring end")),
        }
    }

    fn polygon_begin(
        &mut self,
        _tagged: bool,
        size: usize,
        _idx: usize,
    ) -> geozero::error::Result<()> {
        self.stack.push(Frame::Polygon(Vec::with_capacity(size)));
        Ok(())
    }

    fn polygon_end(&mut self, tagged: bool, _idx: usize) -> geozero::error::Result<()> {
        let Frame::Polygon(rings) = self.pop()? else {
            return Err(unexpected("polygon end"));
        };
        let mut rings = rings.into_iter();
        let exterior = rings.next().unwrap_or_default();
        let polygon = Polygon::new(exterior, rings.collect());
        if tagged {
            return self.finish(Geometry::Polygon(polygon));
        }
        match self.stack.last_mut() {
            Some(Frame::MultiPolygon(polygons)) => polygons.push(polygon),
            _ => return Err(unexpected("untagged polygon")),
        }
        Ok(())
    }

    fn multipolygon_begin(&mut self, size: usize, _idx: usize) -> geozero::error::Result<()> {
        self.stack.push(Frame::MultiPolygon(Vec::with_capacity(size)));
        Ok(())
    }

    fn multipolygon_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        match self.pop()? {
            Frame::MultiPolygon(polygons) => {
                self.finish(Geometry::MultiPolygon(MultiPolygon(polygons)))
            }
            _ => Err(unexpected("multipolygon end")),
        }
    }

    fn geometrycollection_begin(&mut self, size: usize, _idx: usize) -> geozero::error::Result<()> {
        self.stack.push(Frame::Collection(Vec::with_capacity(size)));
        Ok(())
    }

    fn geometrycollection_end(&mut self, _idx: usize) -> geozero::error::Result<()> {
        match self.pop()? {
            Frame::Collection(members) => {
                self.finish(Geometry::GeometryCollection(GeometryCollection(members)))
            }
            _ => Err(unexpected("geometrycollection end")),
        }
    }

    fn circularstring_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        unsupported("CircularString")
    }

    fn compoundcurve_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        unsupported("CompoundCurve")
    }

    fn curvepolygon_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        unsupported("CurvePolygon")
    }

    fn multicurve_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        unsupported("MultiCurve")
    }

    fn multisurface_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        unsupported("MultiSurface")
    }

    fn triangle_begin(
        &mut self,
        _tagged: bool,
        _size: usize,
        _idx: usize,
    ) -> geozero::error::Result<()> {
        unsupported("Triangle")
    }

    fn polyhedralsurface_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        unsupported("PolyhedralSurface")
    }

    fn tin_begin(&mut self, _size: usize, _idx: usize) -> geozero::error::Result<()> {
        unsupported("Tin")
    }
}

/// Geometry and raw properties of one feature read from a datasource.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedFeature {
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Default)]
pub struct FeatureCollector {
    pub features: Vec<CollectedFeature>,

    current_geometry: GeometryBuilder,
    current_properties: Map<String, Value>,
}

impl FeatureCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PropertyProcessor for FeatureCollector {
    fn property(
        &mut self,
        _idx: usize,
        name: &str,
        value: &ColumnValue,
    ) -> geozero::error::Result<bool> {
        self.current_properties.insert(
            name.to_string(),
            property_value(value).map_err(|err| GeozeroError::Property(err.to_string()))?,
        );
        Ok(false)
    }
}

impl GeomProcessor for FeatureCollector {
    fn dimensions(&self) -> CoordDimensions {
        self.current_geometry.dimensions()
    }

    fn xy(&mut self, x: f64, y: f64, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.xy(x, y, idx)
    }

    fn coordinate(
        &mut self,
        x: f64,
        y: f64,
        z: Option<f64>,
        m: Option<f64>,
        t: Option<f64>,
        tm: Option<u64>,
        idx: usize,
    ) -> geozero::error::Result<()> {
        self.current_geometry.coordinate(x, y, z, m, t, tm, idx)
    }

    fn empty_point(&mut self, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.empty_point(idx)
    }

    fn point_begin(&mut self, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.point_begin(idx)
    }

    fn point_end(&mut self, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.point_end(idx)
    }

    fn multipoint_begin(&mut self, size: usize, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.multipoint_begin(size, idx)
    }

    fn multipoint_end(&mut self, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.multipoint_end(idx)
    }

    fn linestring_begin(
        &mut self,
        tagged: bool,
        size: usize,
        idx: usize,
    ) -> geozero::error::Result<()> {
        self.current_geometry.linestring_begin(tagged, size, idx)
    }

    fn linestring_end(&mut self, tagged: bool, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.linestring_end(tagged, idx)
    }

    fn multilinestring_begin(&mut self, size: usize, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.multilinestring_begin(size, idx)
    }

    fn multilinestring_end(&mut self, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.multilinestring_end(idx)
    }

    fn polygon_begin(
        &mut self,
        tagged: bool,
        size: usize,
        idx: usize,
    ) -> geozero::error::Result<()> {
        self.current_geometry.polygon_begin(tagged, size, idx)
    }

    fn polygon_end(&mut self, tagged: bool, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.polygon_end(tagged, idx)
    }

    fn multipolygon_begin(&mut self, size: usize, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.multipolygon_begin(size, idx)
    }

    fn multipolygon_end(&mut self, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.multipolygon_end(idx)
    }

    fn geometrycollection_begin(&mut self, size: usize, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.geometrycollection_begin(size, idx)
    }

    fn geometrycollection_end(&mut self, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.geometrycollection_end(idx)
    }

    fn circularstring_begin(&mut self, size: usize, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.circularstring_begin(size, idx)
    }

    fn compoundcurve_begin(&mut self, size: usize, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.compoundcurve_begin(size, idx)
    }

    fn curvepolygon_begin(&mut self, size: usize, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.curvepolygon_begin(size, idx)
    }

    fn multicurve_begin(&mut self, size: usize, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.multicurve_begin(size, idx)
    }

    fn multisurface_begin(&mut self, size: usize, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.multisurface_begin(size, idx)
    }

    fn triangle_begin(
        &mut self,
        tagged: bool,
        size: usize,
        idx: usize,
    ) -> geozero::error::Result<()> {
        self.current_geometry.triangle_begin(tagged, size, idx)
    }

    fn polyhedralsurface_begin(&mut self, size: usize, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.polyhedralsurface_begin(size, idx)
    }

    fn tin_begin(&mut self, size: usize, idx: usize) -> geozero::error::Result<()> {
        self.current_geometry.tin_begin(size, idx)
    }
}

impl FeatureProcessor for FeatureCollector {
    fn properties_begin(&mut self) -> geozero::error::Result<()> {
        self.current_properties = Map::new();
        Ok(())
    }

    fn feature_end(&mut self, _idx: u64) -> geozero::error::Result<()> {
        let geometry = self
            .current_geometry
            .take_geometry()
            .ok_or_else(|| GeozeroError::Geometry("No geometry found.".to_string()))?;
        self.features.push(CollectedFeature {
            geometry,
            properties: std::mem::take(&mut self.current_properties),
        });
        Ok(())
    }

    fn geometry_begin(&mut self) -> geozero::error::Result<()> {
        self.current_geometry = GeometryBuilder::new();
        Ok(())
    }
}

fn process_coord<P: GeomProcessor>(
    coord: &Coord,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    if processor.multi_dim() {
        processor.coordinate(coord.x, coord.y, coord.z, None, None, None, idx)
    } else {
        processor.xy(coord.x, coord.y, idx)
    }
}

fn process_line<P: GeomProcessor>(
    line: &LineString,
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    processor.linestring_begin(tagged, line.0.len(), idx)?;
    for (i, coord) in line.0.iter().enumerate() {
        process_coord(coord, i, processor)?;
    }
    processor.linestring_end(tagged, idx)
}

fn process_polygon<P: GeomProcessor>(
    polygon: &Polygon,
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    processor.polygon_begin(tagged, polygon.rings().count(), idx)?;
    for (i, ring) in polygon.rings().enumerate() {
        process_line(ring, false, i, processor)?;
    }
    processor.polygon_end(tagged, idx)
}

fn process_geometry<P: GeomProcessor>(
    geometry: &Geometry,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    match geometry {
        Geometry::Point(Point(Some(coord))) => {
            processor.point_begin(idx)?;
            process_coord(coord, 0, processor)?;
            processor.point_end(idx)
        }
        Geometry::Point(Point(None)) => processor.empty_point(idx),
        Geometry::LineString(line) => process_line(line, true, idx, processor),
        Geometry::Polygon(polygon) => process_polygon(polygon, true, idx, processor),
        Geometry::MultiPoint(points) => {
            processor.multipoint_begin(points.0.len(), idx)?;
            for (i, point) in points.0.iter().enumerate() {
                let coord = point.0.as_ref().ok_or_else(|| {
                    GeozeroError::Geometry("A MultiPoint cannot hold an empty point.".to_string())
                })?;
                process_coord(coord, i, processor)?;
            }
            processor.multipoint_end(idx)
        }
        Geometry::MultiLineString(lines) => {
            processor.multilinestring_begin(lines.0.len(), idx)?;
            for (i, line) in lines.0.iter().enumerate() {
                process_line(line, false, i, processor)?;
            }
            processor.multilinestring_end(idx)
        }
        Geometry::MultiPolygon(polygons) => {
            processor.multipolygon_begin(polygons.0.len(), idx)?;
            for (i, polygon) in polygons.0.iter().enumerate() {
                process_polygon(polygon, false, i, processor)?;
            }
            processor.multipolygon_end(idx)
        }
        Geometry::GeometryCollection(collection) => {
            processor.geometrycollection_begin(collection.0.len(), idx)?;
            for (i, member) in collection.0.iter().enumerate() {
                process_geometry(member, i, processor)?;
            }
            processor.geometrycollection_end(idx)
        }
    }
}

impl GeozeroGeometry for Geometry {
    fn process_geom<P: GeomProcessor>(&self, processor: &mut P) -> geozero::error::Result<()> {
        process_geometry(self, 0, processor)
    }

    fn dims(&self) -> CoordDimensions {
        if self.has_z() {
            CoordDimensions::xyz()
        } else {
            CoordDimensions::xy()
        }
    }
}

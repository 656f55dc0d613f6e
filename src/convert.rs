//! Conversions between canonical geometries and their GeoJSON variants, plus the
//! bounds and union helpers the feature adapter needs.
use geo::{BooleanOps, BoundingRect};
use serde::Serialize;
use tracing::trace;

use crate::error::{Error, Result};
use crate::geometry::{self, Geometry, GeometryKind};
use crate::options::CollectionEncoding;
use crate::variant::{AnyPosition, GeoJsonGeometry};

#[must_use]
pub fn geometry_kind_of(geometry: &Geometry) -> GeometryKind {
    geometry.kind()
}

/// Encodes a canonical geometry as a GeoJSON geometry object.
///
/// The 3D family is used when any coordinate has a Z value, the 2D family otherwise.
///
/// # Errors
///
/// Fails when the geometry cannot be encoded: an empty point inside a `MultiPoint`,
/// an empty `LineString` or `Polygon`, non-finite coordinates, mixed dimensionality,
/// or collection members the chosen encoding cannot hold.
pub fn to_variant(geometry: &Geometry, encoding: CollectionEncoding) -> Result<GeoJsonGeometry> {
    let kind = geometry.kind();
    let has_z = geometry.has_z();
    trace!(%kind, has_z, ?encoding, "Encoding geometry");
    let variant = if has_z {
        GeoJsonGeometry::<[f64; 3]>::from_canonical_with(geometry, encoding)
            .map(|variant| variant.map_positions(&AnyPosition::Xyz))
    } else {
        GeoJsonGeometry::<[f64; 2]>::from_canonical_with(geometry, encoding)
            .map(|variant| variant.map_positions(&AnyPosition::Xy))
    };
    variant.map_err(|err| match err {
        Error::Validation(reason) => Error::Validation(format!("Cannot encode {kind}: {reason}")),
        other => other,
    })
}

/// `[minx, miny, maxx, maxy]` or `[minx, miny, minz, maxx, maxy, maxz]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoundingBox {
    Xy([f64; 4]),
    Xyz([f64; 6]),
}

impl BoundingBox {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        match self {
            BoundingBox::Xy(bounds) => bounds,
            BoundingBox::Xyz(bounds) => bounds,
        }
    }
}

/// Bounds of a geometry, 3D when it has Z values.
///
/// A geometry without coordinates gets NaN bounds.
#[must_use]
pub fn bounding_box(geometry: &Geometry) -> BoundingBox {
    let (min, max) = geo::Geometry::from(geometry).bounding_rect().map_or(
        ((f64::NAN, f64::NAN), (f64::NAN, f64::NAN)),
        |rect| (rect.min().x_y(), rect.max().x_y()),
    );
    if !geometry.has_z() {
        return BoundingBox::Xy([min.0, min.1, max.0, max.1]);
    }
    let (min_z, max_z) = geometry
        .coords()
        .filter_map(|coord| coord.z)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), z| {
            (low.min(z), high.max(z))
        });
    BoundingBox::Xyz([min.0, min.1, min_z, max.0, max.1, max_z])
}

/// Union of a set of geometries.
///
/// 2D polygonal members are dissolved into one `MultiPolygon`. Everything else
/// (points, lines, 3D polygons, nested collections) is kept as is, so the result is a
/// `GeometryCollection` whenever such members exist.
#[must_use]
pub fn union(geometries: &[Geometry]) -> Geometry {
    let mut dissolved: Option<geo::MultiPolygon<f64>> = None;
    let mut rest = Vec::new();
    for geometry in geometries.iter().filter(|geometry| !geometry.is_empty()) {
        let polygons = match geometry {
            _ if geometry.has_z() => None,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => {
                match geo::Geometry::from(geometry) {
                    geo::Geometry::Polygon(polygon) => {
                        Some(geo::MultiPolygon::new(vec![polygon]))
                    }
                    geo::Geometry::MultiPolygon(polygons) => Some(polygons),
                    _ => None,
                }
            }
            _ => None,
        };
        match polygons {
            Some(polygons) => {
                dissolved = Some(match dissolved {
                    Some(acc) => acc.union(&polygons),
                    None => polygons,
                });
            }
            None => rest.push(geometry.clone()),
        }
    }
    trace!(
        members = geometries.len(),
        dissolved = dissolved.is_some(),
        kept = rest.len(),
        "Computed union"
    );

    let dissolved = dissolved.map(|polygons| Geometry::MultiPolygon(polygons.into()));
    match (dissolved, rest.is_empty()) {
        (Some(polygons), true) => polygons,
        (dissolved, _) => {
            rest.extend(dissolved);
            Geometry::GeometryCollection(geometry::GeometryCollection(rest))
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::{Point, Polygon};
    use crate::wkt::from_wkt;

    fn square(offset: f64, size: f64) -> Geometry {
        Geometry::Polygon(Polygon::new(
            [
                (offset, offset),
                (offset, offset + size),
                (offset + size, offset + size),
                (offset + size, offset),
                (offset, offset),
            ]
            .into_iter()
            .collect(),
            vec![],
        ))
    }

    #[test]
    fn test_to_variant_2d() {
        let variant = to_variant(&square(0., 40.), CollectionEncoding::default()).unwrap();
        assert_eq!(variant.kind(), GeometryKind::Polygon);
        assert_eq!(variant.dimension(), Some(2));
        assert_eq!(variant.to_canonical(), square(0., 40.));
    }

    #[test]
    fn test_to_variant_3d() {
        let geometry = from_wkt("MULTIPOINT Z ((0 0 1), (10 20 2))").unwrap();
        let variant = to_variant(&geometry, CollectionEncoding::default()).unwrap();
        assert_eq!(variant.dimension(), Some(3));
        assert_eq!(variant.to_canonical(), geometry);
    }

    #[test]
    fn test_to_variant_rejects_mixed_dimensions() {
        let geometry = Geometry::GeometryCollection(geometry::GeometryCollection(vec![
            Geometry::Point(Point::new(0., 0.)),
            Geometry::Point(Point::new_z(0., 0., 1.)),
        ]));
        let err = to_variant(&geometry, CollectionEncoding::default()).unwrap_err();
        assert!(err.to_string().contains("GeometryCollection"));
    }

    #[test]
    fn test_to_variant_rejects_empty_linestring() {
        let geometry = Geometry::LineString(geometry::LineString::default());
        assert!(to_variant(&geometry, CollectionEncoding::default()).is_err());
    }

    #[test]
    fn test_bounding_box_2d() {
        assert_eq!(
            bounding_box(&square(0., 40.)),
            BoundingBox::Xy([0., 0., 40., 40.])
        );
    }

    #[test]
    fn test_bounding_box_3d() {
        let point = Geometry::Point(Point::new_z(10., 20., 3.));
        assert_eq!(
            bounding_box(&point),
            BoundingBox::Xyz([10., 20., 3., 10., 20., 3.])
        );
        let line = from_wkt("LINESTRING Z (0 0 5, 2 1 -1)").unwrap();
        let bounds = bounding_box(&line);
        for (bound, expected) in bounds.as_slice().iter().zip([0., 0., -1., 2., 1., 5.]) {
            assert_relative_eq!(*bound, expected);
        }
    }

    #[test]
    fn test_bounding_box_empty() {
        let bounds = bounding_box(&Geometry::Point(Point::empty()));
        assert!(bounds.as_slice().iter().all(|bound| bound.is_nan()));
        assert_eq!(bounds.as_slice().len(), 4);
    }

    #[test]
    fn test_union_dissolves_polygons() {
        let merged = union(&[square(0., 10.), square(5., 10.)]);
        assert_eq!(merged.kind(), GeometryKind::MultiPolygon);
        assert_eq!(bounding_box(&merged), BoundingBox::Xy([0., 0., 15., 15.]));
    }

    #[test]
    fn test_union_keeps_points() {
        let merged = union(&[
            Geometry::Point(Point::new(0., 0.)),
            Geometry::Point(Point::new(10., 20.)),
        ]);
        assert_eq!(merged.kind(), GeometryKind::GeometryCollection);
        assert_eq!(bounding_box(&merged), BoundingBox::Xy([0., 0., 10., 20.]));
        assert_eq!(union(&[]).kind(), GeometryKind::GeometryCollection);
    }
}

//! Property-based round-trip tests for geometry conversion, field validation and the
//! feature adapter.
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_geofeature::convert::{bounding_box, to_variant, BoundingBox};
use serde_geofeature::feature::{from_feature_envelope, to_feature_envelope, FeatureRecord};
use serde_geofeature::field::{GeometryField, ZValues};
use serde_geofeature::geometry::{
    Coord, Geometry, GeometryCollection, GeometryKind, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use serde_geofeature::options::{CollectionEncoding, Options};
use serde_geofeature::variant::GeoJsonGeometry;
use serde_geofeature::wkt::{from_wkt, to_wkt};

/// Multiples of 1/8, so every ordinate has a short exact decimal form.
fn arb_ordinate(limit: i32) -> impl Strategy<Value = f64> {
    (-limit * 8..=limit * 8).prop_map(|steps| f64::from(steps) / 8.0)
}

fn arb_coord(with_z: bool) -> impl Strategy<Value = Coord> {
    (arb_ordinate(1000), arb_ordinate(1000), arb_ordinate(100)).prop_map(move |(x, y, z)| {
        if with_z {
            Coord::xyz(x, y, z)
        } else {
            Coord::xy(x, y)
        }
    })
}

fn arb_line(with_z: bool) -> impl Strategy<Value = LineString> {
    prop::collection::vec(arb_coord(with_z), 2..8).prop_map(LineString)
}

/// A closed ring of 4 to 8 positions.
fn arb_ring(with_z: bool) -> impl Strategy<Value = LineString> {
    prop::collection::vec(arb_coord(with_z), 3..8).prop_map(|mut coords| {
        coords.push(coords[0]);
        LineString(coords)
    })
}

fn arb_polygon(with_z: bool) -> impl Strategy<Value = Polygon> {
    (arb_ring(with_z), prop::collection::vec(arb_ring(with_z), 0..3))
        .prop_map(|(exterior, interiors)| Polygon::new(exterior, interiors))
}

/// Any geometry but collections, 2D or 3D throughout.
fn arb_simple(with_z: bool) -> impl Strategy<Value = Geometry> {
    prop_oneof![
        arb_coord(with_z).prop_map(|coord| Geometry::Point(Point(Some(coord)))),
        arb_line(with_z).prop_map(Geometry::LineString),
        arb_polygon(with_z).prop_map(Geometry::Polygon),
        prop::collection::vec(arb_coord(with_z), 1..5).prop_map(|coords| {
            Geometry::MultiPoint(MultiPoint(
                coords.into_iter().map(|coord| Point(Some(coord))).collect(),
            ))
        }),
        prop::collection::vec(arb_line(with_z), 1..4)
            .prop_map(|lines| Geometry::MultiLineString(MultiLineString(lines))),
        prop::collection::vec(arb_polygon(with_z), 1..3)
            .prop_map(|polygons| Geometry::MultiPolygon(MultiPolygon(polygons))),
    ]
}

fn arb_geometry(with_z: bool) -> impl Strategy<Value = Geometry> {
    prop_oneof![
        4 => arb_simple(with_z),
        1 => prop::collection::vec(arb_simple(with_z), 0..4)
            .prop_map(|members| Geometry::GeometryCollection(GeometryCollection(members))),
    ]
}

fn arb_any_geometry() -> impl Strategy<Value = Geometry> {
    any::<bool>().prop_flat_map(arb_geometry)
}

fn field(z_values: ZValues) -> GeometryField {
    GeometryField::new(&GeometryKind::ALL, z_values)
}

serde_geofeature::geometry_field!(
    mod any_kind = GeometryField::new(&GeometryKind::ALL, ZValues::Allow)
);

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Site {
    #[serde(with = "any_kind")]
    geometry: Geometry,
    name: String,
    rank: u32,
}

impl FeatureRecord for Site {
    const GEOMETRY: GeometryField = any_kind::FIELD;

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

proptest! {
    /// Encoding to GeoJSON and decoding again gives the same geometry.
    #[test]
    fn test_geojson_roundtrip(geometry in arb_any_geometry()) {
        let variant = to_variant(&geometry, CollectionEncoding::Rfc7946).unwrap();
        prop_assert_eq!(variant.kind(), geometry.kind());

        let text = serde_json::to_string(&variant).unwrap();
        let decoded: GeoJsonGeometry = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(decoded.to_canonical(), geometry);
    }

    /// The 3D family is used exactly when the geometry has Z values.
    #[test]
    fn test_dimension_follows_z(geometry in arb_any_geometry()) {
        let variant = to_variant(&geometry, CollectionEncoding::Rfc7946).unwrap();
        match variant.dimension() {
            Some(dimension) => prop_assert_eq!(dimension == 3, geometry.has_z()),
            None => prop_assert!(geometry.is_empty()),
        }
    }

    /// Serializing through a field and validating the text again gives the same geometry.
    #[test]
    fn test_wkt_roundtrip(geometry in arb_any_geometry()) {
        let allow = field(ZValues::Allow);
        let text = allow.serialize(&geometry).unwrap();
        prop_assert_eq!(allow.validate(text.as_str()).unwrap(), geometry.clone());
        prop_assert_eq!(from_wkt(&to_wkt(&geometry).unwrap()).unwrap(), geometry);
    }

    /// Strip equals the 2D version of the input.
    #[test]
    fn test_strip(geometry in arb_any_geometry()) {
        let stripped = field(ZValues::Strip).validate(geometry.clone()).unwrap();
        prop_assert!(!stripped.has_z());
        prop_assert_eq!(stripped, geometry.force_2d());
    }

    #[test]
    fn test_forbid_and_require(geometry in arb_any_geometry()) {
        prop_assume!(!geometry.is_empty());
        let forbidden = field(ZValues::Forbid).validate(geometry.clone());
        let required = field(ZValues::Required).validate(geometry.clone());
        prop_assert_eq!(forbidden.is_ok(), !geometry.has_z());
        prop_assert_eq!(required.is_ok(), geometry.has_z());
        prop_assert_eq!(field(ZValues::Allow).validate(geometry.clone()).unwrap(), geometry);
    }

    #[test]
    fn test_bounding_box_is_ordered(geometry in arb_any_geometry()) {
        prop_assume!(!geometry.is_empty());
        match bounding_box(&geometry) {
            BoundingBox::Xy([min_x, min_y, max_x, max_y]) => {
                prop_assert!(!geometry.has_z());
                prop_assert!(min_x <= max_x && min_y <= max_y);
            }
            BoundingBox::Xyz([min_x, min_y, min_z, max_x, max_y, max_z]) => {
                prop_assert!(geometry.has_z());
                prop_assert!(min_x <= max_x && min_y <= max_y && min_z <= max_z);
            }
        }
    }

    /// A record survives a trip through its GeoJSON feature.
    #[test]
    fn test_feature_roundtrip(
        geometry in arb_any_geometry(),
        name in "[a-z]{0,12}",
        rank in any::<u32>(),
    ) {
        let site = Site { geometry, name, rank };
        let feature = to_feature_envelope(&site, &Options::default()).unwrap();
        let text = serde_json::to_string(&feature).unwrap();
        let decoded: Site = from_feature_envelope(serde_json::from_str::<
            serde_geofeature::feature::Feature,
        >(&text).unwrap()).unwrap();
        prop_assert_eq!(decoded, site);
    }
}

use geozero::GeozeroDatasource;
use tracing::debug;

use crate::{
    collector::FeatureCollector,
    error::Result,
    feature::{record_from_parts, FeatureRecord},
};

/// Reads records from a `GeozeroDatasource`.
///
/// Works with any datasource geozero can read (`GeoJSON`, and every other format it
/// offers a reader for). Z values are kept, and every record goes through its geometry
/// field's validation, the same as [`crate::feature::from_feature_envelope`].
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use serde_geofeature::feature::FeatureRecord;
/// use serde_geofeature::field::GeometryField;
/// use serde_geofeature::geometry::Geometry;
/// use serde_geofeature::{from_datasource, geometry_field};
///
/// geometry_field!(mod location = serde_geofeature::field::GeometryField::new(
///     &[serde_geofeature::geometry::GeometryKind::Point],
///     serde_geofeature::field::ZValues::Allow,
/// ));
///
/// #[derive(Serialize, Deserialize)]
/// struct City {
///     #[serde(with = "location")]
///     geometry: Geometry,
///     name: String,
///     population: i64,
/// }
///
/// impl FeatureRecord for City {
///     const GEOMETRY: GeometryField = location::FIELD;
///
///     fn geometry(&self) -> &Geometry {
///         &self.geometry
///     }
/// }
///
/// let geojson = r#"{
///     "type": "Feature",
///     "geometry": {
///         "type": "Point",
///         "coordinates": [13.4, 52.5]
///     },
///     "properties": {
///         "name": "Berlin",
///         "population": 3669495
///     }
/// }"#;
///
/// let mut reader = geozero::geojson::GeoJsonReader(geojson.as_bytes());
/// let cities: Vec<City> = from_datasource(&mut reader).unwrap();
///
/// assert_eq!(cities.first().unwrap().name, "Berlin");
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The datasource processing fails
/// - A feature's geometry does not satisfy the record's geometry field
/// - A record cannot be deserialized from a feature's properties
pub fn from_datasource<T: FeatureRecord, S: GeozeroDatasource>(source: &mut S) -> Result<Vec<T>> {
    let mut collector = FeatureCollector::new();
    source.process(&mut collector)?;
    debug!(
        features = collector.features.len(),
        "Collected features from datasource"
    );

    collector
        .features
        .into_iter()
        .map(|feature| record_from_parts(feature.geometry, feature.properties))
        .collect()
}

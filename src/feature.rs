//! Typed records as GeoJSON `Feature` and `FeatureCollection` objects.
//!
//! A record is a serde struct with one geometry attribute, wired up through
//! [`FeatureRecord`]. Every other attribute becomes a feature property, in
//! declaration order. Decoding goes the other way: the geometry is decoded, merged
//! with the properties and the record is deserialized, so the geometry field's
//! validation runs again.
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::convert::{bounding_box, to_variant, union, BoundingBox};
use crate::error::{Error, Result};
use crate::field::GeometryField;
use crate::geometry::Geometry;
use crate::options::{CollectionEncoding, Options};
use crate::variant::{AnyPosition, GeoJsonGeometry, Position};

/// A serde record with a declared geometry attribute.
///
/// `GEOMETRY` is usually the `FIELD` constant of a module generated with
/// [`geometry_field!`](crate::geometry_field), the same module the attribute is
/// wired to with `#[serde(with = "...")]`.
pub trait FeatureRecord: Serialize + DeserializeOwned {
    /// Name of the geometry attribute as serialized.
    const GEOMETRY_FIELD: &'static str = "geometry";

    const GEOMETRY: GeometryField;

    fn geometry(&self) -> &Geometry;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
    FeatureCollection,
}

/// A GeoJSON `Feature`.
///
/// `bbox` is computed on output and ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Position")]
pub struct Feature<P: Position = AnyPosition> {
    pub r#type: FeatureType,
    pub geometry: GeoJsonGeometry<P>,
    #[serde(default, deserialize_with = "properties_or_empty")]
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none", skip_deserializing)]
    pub bbox: Option<BoundingBox>,
}

/// A GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "P: Position")]
pub struct FeatureCollection<P: Position = AnyPosition> {
    pub r#type: FeatureCollectionType,
    pub features: Vec<Feature<P>>,
    #[serde(skip_serializing_if = "Option::is_none", skip_deserializing)]
    pub bbox: Option<BoundingBox>,
}

fn properties_or_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Map<String, Value>, D::Error> {
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Builds the GeoJSON feature of a record.
///
/// # Errors
///
/// Fails when the record's geometry does not satisfy its declared field or cannot be
/// encoded, and with [`Error::Configuration`] when the record does not serialize to
/// a map holding its geometry attribute.
pub fn to_feature_envelope<T: FeatureRecord>(record: &T, options: &Options) -> Result<Feature> {
    let geometry = T::GEOMETRY.validate(record.geometry().clone())?;
    Ok(Feature {
        r#type: FeatureType::Feature,
        geometry: to_variant(&geometry, options.collection_encoding)?,
        properties: record_properties(record)?,
        bbox: options.include_bbox.then(|| bounding_box(&geometry)),
    })
}

fn record_properties<T: FeatureRecord>(record: &T) -> Result<Map<String, Value>> {
    let Value::Object(fields) = serde_json::to_value(record)? else {
        return Err(Error::Configuration(
            "A feature record must serialize to a map.".to_string(),
        ));
    };
    if !fields.contains_key(T::GEOMETRY_FIELD) {
        return Err(Error::Configuration(format!(
            "The record has no geometry attribute '{}'.",
            T::GEOMETRY_FIELD
        )));
    }
    Ok(fields
        .into_iter()
        .filter(|(key, _)| key != T::GEOMETRY_FIELD)
        .collect())
}

/// Builds a record from a GeoJSON feature.
///
/// # Errors
///
/// Fails when the feature's positions have a dimensionality the declared field does
/// not accept, or when the record cannot be deserialized from the merged geometry
/// and properties.
pub fn from_feature_envelope<T: FeatureRecord, P: Position>(feature: Feature<P>) -> Result<T> {
    check_wire_dimension(&T::GEOMETRY, &feature.geometry)?;
    record_from_parts(feature.geometry.to_canonical(), feature.properties)
}

fn check_wire_dimension<P: Position>(
    field: &GeometryField,
    geometry: &GeoJsonGeometry<P>,
) -> Result<()> {
    match (field.wire_dimension(), geometry.dimension()) {
        (Some(expected), Some(actual)) if expected != actual => {
            debug!(expected, actual, "Rejected feature geometry dimension");
            Err(Error::validation(format!(
                "The field accepts {expected}D positions, the feature has {actual}D positions."
            )))
        }
        _ => Ok(()),
    }
}

/// Deserializes a record from a decoded geometry and its properties.
///
/// The geometry is handed to the record as a GeoJSON geometry object, which every
/// geometry field accepts.
pub(crate) fn record_from_parts<T: FeatureRecord>(
    geometry: Geometry,
    mut properties: Map<String, Value>,
) -> Result<T> {
    let variant = to_variant(&geometry, CollectionEncoding::default())?;
    properties.insert(T::GEOMETRY_FIELD.to_string(), serde_json::to_value(variant)?);
    Ok(T::deserialize(Value::Object(properties))?)
}

/// Builds a feature collection of records, in input order.
///
/// # Errors
///
/// Fails when any record's geometry is not one of the declared kinds, or for any
/// reason [`to_feature_envelope`] fails.
pub fn to_feature_collection<T: FeatureRecord>(
    records: &[T],
    options: &Options,
) -> Result<FeatureCollection> {
    let mut geometries = Vec::with_capacity(records.len());
    let mut features = Vec::with_capacity(records.len());
    for record in records {
        let kind = record.geometry().kind();
        if !T::GEOMETRY.accepts(kind) {
            return Err(Error::validation(format!(
                "All features must be of type {}, found {kind}.",
                T::GEOMETRY
                    .kinds()
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
        let feature = to_feature_envelope(
            record,
            &Options {
                include_bbox: false,
                ..*options
            },
        )?;
        geometries.push(feature.geometry.to_canonical());
        features.push(feature);
    }
    debug!(features = features.len(), "Built feature collection");
    Ok(FeatureCollection {
        r#type: FeatureCollectionType::FeatureCollection,
        features,
        bbox: options
            .include_bbox
            .then(|| bounding_box(&union(&geometries))),
    })
}

/// Builds records from a feature collection, in feature order.
///
/// # Errors
///
/// Fails on the first feature [`from_feature_envelope`] rejects.
pub fn from_feature_collection<T: FeatureRecord, P: Position>(
    collection: FeatureCollection<P>,
) -> Result<Vec<T>> {
    collection
        .features
        .into_iter()
        .map(from_feature_envelope::<T, P>)
        .collect()
}

/// Writes a record as a GeoJSON feature string.
///
/// # Errors
///
/// See [`to_feature_envelope`].
pub fn to_geojson_string<T: FeatureRecord>(record: &T, options: &Options) -> Result<String> {
    Ok(serde_json::to_string(&to_feature_envelope(record, options)?)?)
}

/// Reads a record from a GeoJSON feature string.
///
/// # Errors
///
/// Fails when the text is not a valid GeoJSON feature, or see
/// [`from_feature_envelope`].
pub fn from_geojson_str<T: FeatureRecord>(text: &str) -> Result<T> {
    let feature: Feature = serde_json::from_str(text)?;
    from_feature_envelope(feature)
}

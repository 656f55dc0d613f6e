use geozero::ColumnValue;
use serde_json::Value;

/// Converts a datasource column value into the JSON value a record property is
/// deserialized from.
///
/// JSON columns are parsed rather than passed on as strings, so nested property
/// records survive the trip.
///
/// # Errors
///
/// Returns an error if a JSON column does not contain valid JSON.
pub fn property_value(value: &ColumnValue) -> serde_json::Result<Value> {
    Ok(match value {
        ColumnValue::Byte(val) => Value::from(*val),
        ColumnValue::UByte(val) => Value::from(*val),
        ColumnValue::Bool(val) => Value::from(*val),
        ColumnValue::Short(val) => Value::from(*val),
        ColumnValue::UShort(val) => Value::from(*val),
        ColumnValue::Int(val) => Value::from(*val),
        ColumnValue::UInt(val) => Value::from(*val),
        ColumnValue::Long(val) => Value::from(*val),
        ColumnValue::ULong(val) => Value::from(*val),
        ColumnValue::Float(val) => Value::from(f64::from(*val)),
        ColumnValue::Double(val) => Value::from(*val),
        ColumnValue::String(val) => Value::from(*val),
        ColumnValue::Json(val) => serde_json::from_str(val)?,
        ColumnValue::DateTime(val) => {
            let text: &str = val.as_ref();
            Value::from(text)
        }
        ColumnValue::Binary(val) => Value::from(val.to_vec()),
    })
}

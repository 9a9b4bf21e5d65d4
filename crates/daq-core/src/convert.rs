//! Casting raw driver values to a tag's declared data type.
//!
//! Two conversion paths exist:
//!
//! - [`cast`] applies the pipeline's own conversion rules: strings are parsed
//!   as numbers, numbers are rounded into integer types with a range check,
//!   booleans map to and from `1`/`0`, and everything can become a `String`.
//! - [`instantiate`] is a strict structured conversion through JSON, used as
//!   a second chance for values that [`cast`] rejects.
//!
//! A value is convertible if either path succeeds.

use crate::value::{DataType, TagValue};

const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Converts `value` to `target` using the pipeline's conversion rules.
///
/// Returns `None` if the value cannot be represented in the target type.
/// Values of [`DataType::Custom`] tags are returned unchanged.
#[must_use]
pub fn cast(value: &TagValue, target: &DataType) -> Option<TagValue> {
    match target {
        DataType::Custom(_) => Some(value.clone()),
        DataType::String => Some(match value {
            TagValue::String(s) => TagValue::String(s.clone()),
            other => TagValue::String(other.to_string()),
        }),
        DataType::ArbitraryObject => Some(match value {
            TagValue::Object(_) => value.clone(),
            other => TagValue::Object(other.to_json()),
        }),
        DataType::Array(element) => cast_array(value, element),
        DataType::Boolean => to_bool(value).map(TagValue::Boolean),
        DataType::Byte => to_i64(value)
            .and_then(|v| i8::try_from(v).ok())
            .map(TagValue::Byte),
        DataType::Short => to_i64(value)
            .and_then(|v| i16::try_from(v).ok())
            .map(TagValue::Short),
        DataType::Integer => to_i64(value)
            .and_then(|v| i32::try_from(v).ok())
            .map(TagValue::Integer),
        DataType::Long => to_i64(value).map(TagValue::Long),
        DataType::Float => to_number(value).and_then(Number::to_f32).map(TagValue::Float),
        DataType::Double => to_number(value).map(Number::to_f64).map(TagValue::Double),
    }
}

/// Converts `value` to `target` by strict structured deserialization.
///
/// Unlike [`cast`], no rounding or string parsing happens: the JSON form of
/// the value must already match the target type.
#[must_use]
pub fn instantiate(value: &TagValue, target: &DataType) -> Option<TagValue> {
    let json = value.to_json();
    match target {
        DataType::Boolean => serde_json::from_value(json).ok().map(TagValue::Boolean),
        DataType::Byte => serde_json::from_value(json).ok().map(TagValue::Byte),
        DataType::Short => serde_json::from_value(json).ok().map(TagValue::Short),
        DataType::Integer => serde_json::from_value(json).ok().map(TagValue::Integer),
        DataType::Long => serde_json::from_value(json).ok().map(TagValue::Long),
        DataType::Float => serde_json::from_value(json).ok().map(TagValue::Float),
        DataType::Double => serde_json::from_value(json).ok().map(TagValue::Double),
        DataType::String => serde_json::from_value(json).ok().map(TagValue::String),
        DataType::Array(_) | DataType::ArbitraryObject | DataType::Custom(_) => cast(value, target),
    }
}

/// True if `value` can be converted to `target` by either conversion path.
#[must_use]
pub fn is_convertible(value: &TagValue, target: &DataType) -> bool {
    cast(value, target).is_some() || instantiate(value, target).is_some()
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn to_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    fn to_f32(self) -> Option<f32> {
        let v = self.to_f64();
        if v.is_finite() && v.abs() > f64::from(f32::MAX) {
            return None;
        }
        Some(v as f32)
    }

    fn to_i64(self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(v),
            Self::Float(v) => {
                let rounded = v.round();
                (rounded.is_finite() && (I64_LOWER..I64_UPPER).contains(&rounded))
                    .then_some(rounded as i64)
            }
        }
    }

    fn is_one(self) -> Option<bool> {
        match self {
            Self::Int(1) => Some(true),
            Self::Int(0) => Some(false),
            Self::Int(_) => None,
            Self::Float(v) if (v - 1.0).abs() < f64::EPSILON => Some(true),
            Self::Float(v) if v.abs() < f64::EPSILON => Some(false),
            Self::Float(_) => None,
        }
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(v) = text.parse::<i64>() {
        return Some(Number::Int(v));
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite()).map(Number::Float)
}

fn json_number(json: &serde_json::Value) -> Option<Number> {
    use serde_json::Value;
    match json {
        Value::Bool(b) => Some(Number::Int(i64::from(*b))),
        Value::Number(n) => n
            .as_i64()
            .map(Number::Int)
            .or_else(|| n.as_f64().map(Number::Float)),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn to_number(value: &TagValue) -> Option<Number> {
    match value {
        TagValue::Boolean(b) => Some(Number::Int(i64::from(*b))),
        TagValue::Float(v) => Some(Number::Float(f64::from(*v))),
        TagValue::Double(v) => Some(Number::Float(*v)),
        TagValue::String(s) => parse_number(s),
        TagValue::Object(json) => json_number(json),
        TagValue::Array(_) => None,
        integral => integral.as_i64().map(Number::Int),
    }
}

fn to_i64(value: &TagValue) -> Option<i64> {
    to_number(value).and_then(Number::to_i64)
}

fn to_bool(value: &TagValue) -> Option<bool> {
    match value {
        TagValue::Boolean(b) => Some(*b),
        TagValue::String(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
        TagValue::String(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
        TagValue::Object(serde_json::Value::Bool(b)) => Some(*b),
        other => to_number(other).and_then(Number::is_one),
    }
}

fn cast_array(value: &TagValue, element: &DataType) -> Option<TagValue> {
    let items: Vec<TagValue> = match value {
        TagValue::Array(items) => items.clone(),
        TagValue::Object(serde_json::Value::Array(items)) => items
            .iter()
            .map(TagValue::from_json)
            .collect::<Option<Vec<_>>>()?,
        _ => return None,
    };
    items
        .iter()
        .map(|item| cast(item, element))
        .collect::<Option<Vec<_>>>()
        .map(TagValue::Array)
}

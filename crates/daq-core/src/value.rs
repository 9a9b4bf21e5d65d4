//! Tag values and declared data types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared data type of a tag.
///
/// Serialized as its type name, e.g. `"Integer"`, `"Double[]"` or
/// `"ArbitraryObject"`. Names that are not recognised become
/// [`DataType::Custom`]; values of custom types are neither checked nor cast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    /// `bool`
    Boolean,
    /// `i8`
    Byte,
    /// `i16`
    Short,
    /// `i32`
    Integer,
    /// `i64`
    Long,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// UTF-8 text.
    String,
    /// Homogeneous array of the inner type.
    Array(Box<DataType>),
    /// Any structured value, carried as JSON.
    ArbitraryObject,
    /// Type the pipeline does not know about.
    Custom(String),
}

impl DataType {
    /// Parses a type name. Never fails; unknown names become [`DataType::Custom`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if let Some(inner) = name.strip_suffix("[]") {
            return Self::Array(Box::new(Self::parse(inner)));
        }
        match name {
            "Boolean" => Self::Boolean,
            "Byte" => Self::Byte,
            "Short" => Self::Short,
            "Integer" => Self::Integer,
            "Long" => Self::Long,
            "Float" => Self::Float,
            "Double" => Self::Double,
            "String" => Self::String,
            "ArbitraryObject" => Self::ArbitraryObject,
            other => Self::Custom(other.to_string()),
        }
    }

    /// True for the integer and floating point types.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Byte | Self::Short | Self::Integer | Self::Long | Self::Float | Self::Double
        )
    }

    /// True for the integer types.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Integer | Self::Long)
    }

    /// False only for [`DataType::Custom`] (and arrays of it).
    #[must_use]
    pub fn is_known(&self) -> bool {
        match self {
            Self::Custom(_) => false,
            Self::Array(inner) => inner.is_known(),
            _ => true,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "Boolean"),
            Self::Byte => write!(f, "Byte"),
            Self::Short => write!(f, "Short"),
            Self::Integer => write!(f, "Integer"),
            Self::Long => write!(f, "Long"),
            Self::Float => write!(f, "Float"),
            Self::Double => write!(f, "Double"),
            Self::String => write!(f, "String"),
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::ArbitraryObject => write!(f, "ArbitraryObject"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

impl From<String> for DataType {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&str> for DataType {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.to_string()
    }
}

/// A single tag value as produced by a driver or after casting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TagValue {
    /// Boolean value.
    Boolean(bool),
    /// 8-bit integer.
    Byte(i8),
    /// 16-bit integer.
    Short(i16),
    /// 32-bit integer.
    Integer(i32),
    /// 64-bit integer.
    Long(i64),
    /// Single precision float.
    Float(f32),
    /// Double precision float.
    Double(f64),
    /// Text.
    String(String),
    /// Array of values.
    Array(Vec<TagValue>),
    /// Structured value.
    Object(serde_json::Value),
}

impl TagValue {
    /// Numeric view of the value, for integer and floating point variants.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Byte(v) => Some(f64::from(*v)),
            Self::Short(v) => Some(f64::from(*v)),
            Self::Integer(v) => Some(f64::from(*v)),
            Self::Long(v) => Some(*v as f64),
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer view of the value, for the integer variants only.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(i64::from(*v)),
            Self::Short(v) => Some(i64::from(*v)),
            Self::Integer(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// True for the integer and floating point variants.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }

    /// Plain JSON rendering, without variant tags.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Self::Boolean(v) => Value::Bool(*v),
            Self::Byte(v) => Value::from(*v),
            Self::Short(v) => Value::from(*v),
            Self::Integer(v) => Value::from(*v),
            Self::Long(v) => Value::from(*v),
            Self::Float(v) => {
                serde_json::Number::from_f64(f64::from(*v)).map_or(Value::Null, Value::Number)
            }
            Self::Double(v) => serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number),
            Self::String(v) => Value::String(v.clone()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(v) => v.clone(),
        }
    }

    /// Builds a value from plain JSON. `null` yields `None`.
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;
        match json {
            Value::Null => None,
            Value::Bool(v) => Some(Self::Boolean(*v)),
            Value::Number(n) => n.as_i64().map(Self::Long).or_else(|| n.as_f64().map(Self::Double)),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::Array),
            Value::Object(_) => Some(Self::Object(json.clone())),
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Array(_) | Self::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for TagValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i8> for TagValue {
    fn from(v: i8) -> Self {
        Self::Byte(v)
    }
}

impl From<i16> for TagValue {
    fn from(v: i16) -> Self {
        Self::Short(v)
    }
}

impl From<i32> for TagValue {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for TagValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for TagValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for TagValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

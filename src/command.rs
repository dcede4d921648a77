use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

pub type JsonMap = Map<String, JsonValue>;

/// A single request for the editor plugin.
///
/// Serializes to the wire envelope `{"type": <name>, "params": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "type")]
    pub name: String,
    #[serde(default)]
    pub params: JsonMap,
}

impl Command {
    pub fn new(name: impl Into<String>, params: JsonMap) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Caller supplied arguments rejected before anything is sent to the editor.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("Invalid {field} format. Must be a list of {expected} float values, got {got}.")]
    WrongArity {
        field: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{0}")]
    Missing(&'static str),
    #[error("Parameters must serialize to a JSON object")]
    NotAnObject,
    #[error("Failed to encode parameters: {0}")]
    Encode(#[from] serde_json::Error),
}

/// XYZ triple used for locations, rotations (pitch, yaw, roll) and scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3(pub [f64; 3]);

impl Vector3 {
    pub const ZERO: Vector3 = Vector3([0.0, 0.0, 0.0]);
    pub const ONE: Vector3 = Vector3([1.0, 1.0, 1.0]);

    pub fn parse(field: &'static str, values: &[f64]) -> Result<Self, ParamError> {
        match values {
            [x, y, z] => Ok(Vector3([*x, *y, *z])),
            _ => Err(ParamError::WrongArity {
                field,
                expected: 3,
                got: values.len(),
            }),
        }
    }

    /// Absent or empty input falls back to `default`.
    pub fn or_default(
        field: &'static str,
        values: Option<&[f64]>,
        default: Vector3,
    ) -> Result<Self, ParamError> {
        match values {
            None | Some([]) => Ok(default),
            Some(values) => Self::parse(field, values),
        }
    }

    /// Validates a triple only when one was supplied.
    pub fn optional(field: &'static str, values: Option<&[f64]>) -> Result<Option<Self>, ParamError> {
        values.map(|values| Self::parse(field, values)).transpose()
    }
}

/// Serializes a tool argument struct into a command parameter map.
pub fn params_of<T: Serialize>(args: &T) -> Result<JsonMap, ParamError> {
    match serde_json::to_value(args)? {
        JsonValue::Object(map) => Ok(map),
        _ => Err(ParamError::NotAnObject),
    }
}

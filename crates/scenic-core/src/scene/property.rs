//! Open key/value bags attached to diagram objects.
//!
//! Properties and style hints are ordered maps from string keys to a small
//! closed set of value variants, so that a scene survives a JSON round trip
//! without losing key order or value types.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping used for both `properties` and `style` of an object.
pub type Properties = IndexMap<String, PropertyValue>;

/// Property key holding an object's rotation in degrees.
pub const ROTATION: &str = "rotation";

/// Property key holding a body's mass.
pub const MASS: &str = "mass";

/// A single property value.
///
/// # Examples
///
/// ```
/// # use scenic_core::scene::PropertyValue;
/// let value: PropertyValue = serde_json::from_str("45").unwrap();
/// assert_eq!(value.as_number(), Some(45.0));
///
/// let value: PropertyValue = serde_json::from_str("\"red\"").unwrap();
/// assert_eq!(value.as_str(), Some("red"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    /// Returns the numeric value, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string value, if this is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

//! Snapshot value representation
//!
//! This module defines the [`StateValue`] enum, the unit of data an algorithm registers
//! in an [`AlgorithmState`](super::AlgorithmState). Values are tagged so that a frozen
//! payload can be decoded without knowing the algorithm that produced it.
//!
//! # Value Types
//!
//! - [`StateValue::Bool`], [`StateValue::Int`], [`StateValue::Float`], [`StateValue::Text`]:
//!   scalar variables
//! - [`StateValue::List`]: ordered collection (arrays, queues, paths)
//! - [`StateValue::Map`]: named sub-values (records, per-vertex labels)
//! - [`StateValue::Bytes`]: opaque serialized object, see
//!   [`AlgorithmState::add_object`](super::AlgorithmState::add_object)
//! - [`StateValue::Null`]: explicit absence of a value

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A value stored in an algorithm state snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum StateValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<StateValue>),
    Map(BTreeMap<String, StateValue>),
    Bytes(Vec<u8>),
}

impl StateValue {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, StateValue::Null)
    }

    /// Get the boolean value, returns None if not a Bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the integer value, returns None if not an Int
    pub fn as_int(&self) -> Option<i64> {
        match self {
            StateValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the float value; integers are widened
    pub fn as_float(&self) -> Option<f64> {
        match self {
            StateValue::Float(f) => Some(*f),
            StateValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StateValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[StateValue]> {
        match self {
            StateValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<StateValue>> {
        match self {
            StateValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, StateValue>> {
        match self {
            StateValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Collect a list of integers, returns None if any element is not an Int
    pub fn to_int_vec(&self) -> Option<Vec<i64>> {
        self.as_list()?.iter().map(StateValue::as_int).collect()
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Null => write!(f, "null"),
            StateValue::Bool(b) => write!(f, "{}", b),
            StateValue::Int(n) => write!(f, "{}", n),
            StateValue::Float(x) => write!(f, "{}", x),
            StateValue::Text(s) => write!(f, "{}", s),
            StateValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            StateValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            StateValue::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        StateValue::Bool(b)
    }
}

impl From<i64> for StateValue {
    fn from(n: i64) -> Self {
        StateValue::Int(n)
    }
}

impl From<i32> for StateValue {
    fn from(n: i32) -> Self {
        StateValue::Int(n as i64)
    }
}

impl From<usize> for StateValue {
    fn from(n: usize) -> Self {
        StateValue::Int(n as i64)
    }
}

impl From<f64> for StateValue {
    fn from(x: f64) -> Self {
        StateValue::Float(x)
    }
}

impl From<String> for StateValue {
    fn from(s: String) -> Self {
        StateValue::Text(s)
    }
}

impl From<&str> for StateValue {
    fn from(s: &str) -> Self {
        StateValue::Text(s.to_string())
    }
}

impl<T: Into<StateValue>> From<Vec<T>> for StateValue {
    fn from(items: Vec<T>) -> Self {
        StateValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<StateValue>> From<Option<T>> for StateValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(StateValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_vec_conversion() {
        let value = StateValue::from(vec![3i64, 1, 2]);
        assert_eq!(value.to_int_vec(), Some(vec![3, 1, 2]));

        let mixed = StateValue::List(vec![StateValue::Int(1), StateValue::Bool(true)]);
        assert_eq!(mixed.to_int_vec(), None);
    }

    #[test]
    fn test_display() {
        let value = StateValue::from(vec![1i64, 2]);
        assert_eq!(value.to_string(), "[1, 2]");
        assert_eq!(StateValue::from(None::<i64>).to_string(), "null");
    }
}

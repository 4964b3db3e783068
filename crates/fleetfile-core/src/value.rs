//! Record Values
//!
//! This module defines the `Value` type - a single typed field inside a
//! record - and the `Record` alias for an ordered sequence of them.
//!
//! ## Structure
//! A record is a flat list of values. Scalars (int, float, string, bytes)
//! and homogeneous lists of int, float, or string are supported. The shape
//! of a record (its length and per-position types) is captured by a
//! [`Schema`](crate::schema::Schema), inferred from the first record a
//! writer appends.
//!
//! ## Design Decisions
//! - `f64` everywhere; narrower floats widen losslessly on the way in
//! - No nested lists: the schema describes each position with a single
//!   [`FieldType`](crate::schema::FieldType) tag

use serde::{Deserialize, Serialize};

use crate::schema::FieldType;

/// A single typed field value within a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Integer scalar
    Int(i64),

    /// Float scalar
    Float(f64),

    /// String scalar
    Str(String),

    /// Raw byte string
    Bytes(Vec<u8>),

    /// List of integers
    IntList(Vec<i64>),

    /// List of floats
    FloatList(Vec<f64>),

    /// List of strings
    StrList(Vec<String>),
}

/// An ordered sequence of field values stored under one key
pub type Record = Vec<Value>;

impl Value {
    /// The field type tag describing this value's shape
    pub fn dtype(&self) -> FieldType {
        match self {
            Value::Int(_) => FieldType::Int,
            Value::Float(_) => FieldType::Float,
            Value::Str(_) => FieldType::Str,
            Value::Bytes(_) => FieldType::Bytes,
            Value::IntList(_) => FieldType::IntList,
            Value::FloatList(_) => FieldType::FloatList,
            Value::StrList(_) => FieldType::StrList,
        }
    }

    /// Estimate the size of this value's payload in bytes
    pub fn estimated_size(&self) -> usize {
        match self {
            Value::Int(_) | Value::Float(_) => 8,
            Value::Str(s) => s.len(),
            Value::Bytes(b) => b.len(),
            Value::IntList(v) => v.len() * 8,
            Value::FloatList(v) => v.len() * 8,
            Value::StrList(v) => v.iter().map(|s| s.len()).sum(),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::IntList(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::FloatList(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StrList(v)
    }
}

//! Record Schemas
//!
//! This module defines the schema describing every record in a store file:
//! an ordered list of named, typed fields.
//!
//! ## Where schemas come from
//! A store file holds exactly one schema. The writer infers it from the
//! first record appended, naming fields positionally (`_0`, `_1`, ...).
//! Every later record must match it. Readers decode the schema block once
//! at open time and validate each record against it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

/// The shape of a single record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Int,
    Float,
    Str,
    Bytes,
    IntList,
    FloatList,
    StrList,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Str => "str",
            FieldType::Bytes => "bytes",
            FieldType::IntList => "int_list",
            FieldType::FloatList => "float_list",
            FieldType::StrList => "str_list",
        };
        f.write_str(name)
    }
}

/// A named, typed field descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name (positional names `_0`, `_1`, ... when inferred)
    pub name: String,

    /// Field type
    pub dtype: FieldType,
}

/// Ordered field descriptors shared by every record in a store file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Infer a schema from a sample record, naming fields positionally
    pub fn from_record(record: &[Value]) -> Self {
        let fields = record
            .iter()
            .enumerate()
            .map(|(i, value)| Field {
                name: format!("_{}", i),
                dtype: value.dtype(),
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check that `record` has this schema's field count and types
    pub fn check_record(&self, record: &[Value]) -> Result<()> {
        if record.len() != self.fields.len() {
            return Err(Error::Codec(format!(
                "record has {} fields but the schema has {}",
                record.len(),
                self.fields.len()
            )));
        }
        for (field, value) in self.fields.iter().zip(record) {
            if value.dtype() != field.dtype {
                return Err(Error::Codec(format!(
                    "field {} expects {}, got {}",
                    field.name,
                    field.dtype,
                    value.dtype()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_names_fields_positionally() {
        let record = vec![Value::Int(1), Value::from("x"), Value::FloatList(vec![0.5])];
        let schema = Schema::from_record(&record);

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.fields()[0].name, "_0");
        assert_eq!(schema.fields()[1].name, "_1");
        assert_eq!(schema.fields()[2].name, "_2");
        assert_eq!(schema.fields()[0].dtype, FieldType::Int);
        assert_eq!(schema.fields()[1].dtype, FieldType::Str);
        assert_eq!(schema.fields()[2].dtype, FieldType::FloatList);
    }

    #[test]
    fn test_check_record_accepts_matching_shape() {
        let schema = Schema::from_record(&[Value::Int(1), Value::Float(2.0)]);
        assert!(schema.check_record(&[Value::Int(9), Value::Float(0.25)]).is_ok());
    }

    #[test]
    fn test_check_record_rejects_wrong_arity() {
        let schema = Schema::from_record(&[Value::Int(1)]);
        let err = schema
            .check_record(&[Value::Int(1), Value::Int(2)])
            .unwrap_err();
        assert!(matches!(err, Error::Codec(_)));
    }

    #[test]
    fn test_check_record_rejects_wrong_type() {
        let schema = Schema::from_record(&[Value::Int(1)]);
        let err = schema.check_record(&[Value::from("oops")]).unwrap_err();
        assert!(matches!(err, Error::Codec(msg) if msg.contains("_0")));
    }

    #[test]
    fn test_empty_record_schema() {
        let schema = Schema::from_record(&[]);
        assert!(schema.is_empty());
        assert!(schema.check_record(&[]).is_ok());
    }
}

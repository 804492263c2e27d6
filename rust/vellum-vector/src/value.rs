//! Loosely-typed values for type-generic callers.

use crate::logical_type::LogicalType;

/// A single value whose kind is only known at runtime.
///
/// Vectors accept and produce `Value`s through their object entry points
/// (`get_object`, `write_object`); each vector only accepts the variant matching its
/// logical type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Binary(Vec<u8>),
}

impl Value {
    /// Short name of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "string",
            Value::Binary(_) => "binary",
        }
    }

    /// The fixed-width logical type this value can be stored as, if any.
    pub fn logical_type(&self) -> Option<LogicalType> {
        match self {
            Value::I8(_) => Some(LogicalType::Int8),
            Value::I16(_) => Some(LogicalType::Int16),
            Value::I32(_) => Some(LogicalType::Int32),
            Value::I64(_) => Some(LogicalType::Int64),
            Value::F32(_) => Some(LogicalType::Float32),
            Value::F64(_) => Some(LogicalType::Float64),
            Value::Bool(_) | Value::Str(_) | Value::Binary(_) => None,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Value {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => Str,
    Vec<u8> => Binary,
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::Str(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Value::from(3i8).logical_type(), Some(LogicalType::Int8));
        assert_eq!(Value::from(3.5f64).logical_type(), Some(LogicalType::Float64));
        assert_eq!(Value::from("x").logical_type(), None);
        assert_eq!(Value::from("x").kind_name(), "string");
        assert_eq!(Value::from(vec![1u8]).kind_name(), "binary");
        assert_eq!(Value::from(true).kind_name(), "bool");
    }

    #[test]
    fn test_value_kind_names_match_logical_types() {
        for value in [
            Value::I8(0),
            Value::I16(0),
            Value::I32(0),
            Value::I64(0),
            Value::F32(0.0),
            Value::F64(0.0),
        ] {
            assert_eq!(value.logical_type().unwrap().name(), value.kind_name());
        }
    }
}

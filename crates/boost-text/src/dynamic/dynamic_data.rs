// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DynamicData container for runtime data manipulation.

use crate::dynamic::{Complex, PrimitiveKind, TypeDescriptor, TypeKind, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors for DynamicData operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DynamicDataError {
    #[error("field not found: {0}")]
    FieldNotFound(String),
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },
    #[error("invalid operation for type: {0}")]
    InvalidOperation(String),
    #[error("index out of bounds: {index} >= {length}")]
    IndexOutOfBounds { index: usize, length: usize },
}

/// A value paired with the schema it conforms to.
#[derive(Debug, Clone)]
pub struct DynamicData {
    descriptor: Arc<TypeDescriptor>,
    value: Value,
}

impl DynamicData {
    /// Create new DynamicData with default values.
    ///
    /// Custom and opaque types have no default and start out as an empty
    /// struct.
    pub fn new(descriptor: &Arc<TypeDescriptor>) -> Self {
        Self {
            descriptor: descriptor.clone(),
            value: default_value(&descriptor.kind),
        }
    }

    /// Create from an existing value, checking its shape against the schema.
    pub fn from_value(
        descriptor: &Arc<TypeDescriptor>,
        value: Value,
    ) -> Result<Self, DynamicDataError> {
        if !conforms(&value, &descriptor.kind) {
            return Err(DynamicDataError::TypeMismatch {
                expected: descriptor.name.clone(),
                got: value.kind_name().to_string(),
            });
        }
        Ok(Self {
            descriptor: descriptor.clone(),
            value,
        })
    }

    /// Get the type descriptor.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Get the type name.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Get a field value by name.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, DynamicDataError> {
        T::from_value(self.get_field(name)?)
    }

    /// Set a field value by name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), DynamicDataError> {
        let field = self
            .descriptor
            .field(name)
            .ok_or_else(|| DynamicDataError::FieldNotFound(name.to_string()))?;

        let value = value.into();
        if !conforms(&value, &field.type_desc.kind) {
            return Err(DynamicDataError::TypeMismatch {
                expected: field.type_desc.name.clone(),
                got: value.kind_name().to_string(),
            });
        }

        match &mut self.value {
            Value::Struct(fields) => {
                fields.insert(name.to_string(), value);
                Ok(())
            }
            _ => Err(DynamicDataError::InvalidOperation(
                "set requires struct type".into(),
            )),
        }
    }

    /// Get field by name.
    pub fn get_field(&self, name: &str) -> Result<&Value, DynamicDataError> {
        if self.descriptor.field(name).is_none() {
            return Err(DynamicDataError::FieldNotFound(name.to_string()));
        }

        match &self.value {
            Value::Struct(fields) => fields
                .get(name)
                .ok_or_else(|| DynamicDataError::FieldNotFound(name.to_string())),
            _ => Err(DynamicDataError::InvalidOperation(
                "get_field requires struct type".into(),
            )),
        }
    }

    /// Get sequence element by index.
    pub fn get_element(&self, index: usize) -> Result<&Value, DynamicDataError> {
        match &self.value {
            Value::Sequence(seq) | Value::Array(seq) => {
                seq.get(index).ok_or(DynamicDataError::IndexOutOfBounds {
                    index,
                    length: seq.len(),
                })
            }
            _ => Err(DynamicDataError::InvalidOperation(
                "get_element requires sequence/array type".into(),
            )),
        }
    }

    /// Push element to sequence.
    pub fn push_element(&mut self, value: impl Into<Value>) -> Result<(), DynamicDataError> {
        match &mut self.value {
            Value::Sequence(seq) => {
                seq.push(value.into());
                Ok(())
            }
            _ => Err(DynamicDataError::InvalidOperation(
                "push_element requires sequence type".into(),
            )),
        }
    }

    /// Insert or replace a map entry.
    pub fn insert_entry(
        &mut self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<(), DynamicDataError> {
        match &mut self.value {
            Value::Map(entries) => {
                insert_entry(entries, key.into(), value.into());
                Ok(())
            }
            _ => Err(DynamicDataError::InvalidOperation(
                "insert_entry requires map type".into(),
            )),
        }
    }

    /// Get sequence/array/map length.
    pub fn len(&self) -> Result<usize, DynamicDataError> {
        match &self.value {
            Value::Sequence(seq) | Value::Array(seq) => Ok(seq.len()),
            Value::Map(entries) => Ok(entries.len()),
            _ => Err(DynamicDataError::InvalidOperation(
                "len requires container type".into(),
            )),
        }
    }

    pub fn is_empty(&self) -> Result<bool, DynamicDataError> {
        self.len().map(|l| l == 0)
    }
}

impl PartialEq for DynamicData {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name == other.descriptor.name && self.value == other.value
    }
}

/// Replace the value for `key`, or append a new entry.
fn insert_entry(entries: &mut Vec<(Value, Value)>, key: Value, value: Value) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

/// Create default value for a type kind.
fn default_value(kind: &TypeKind) -> Value {
    match kind {
        TypeKind::Primitive(p) => default_primitive(*p),
        TypeKind::Struct(fields) => Value::Struct(
            fields
                .iter()
                .map(|f| (f.name.clone(), default_value(&f.type_desc.kind)))
                .collect(),
        ),
        TypeKind::Sequence(_) => Value::Sequence(Vec::new()),
        TypeKind::Array(arr) => {
            Value::Array(vec![default_value(&arr.element_type.kind); arr.length])
        }
        TypeKind::Map(_) => Value::Map(Vec::new()),
        TypeKind::Custom(_) | TypeKind::Opaque => Value::Struct(HashMap::new()),
    }
}

fn default_primitive(kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Bool => Value::Bool(false),
        PrimitiveKind::U8 => Value::U8(0),
        PrimitiveKind::U16 => Value::U16(0),
        PrimitiveKind::U32 => Value::U32(0),
        PrimitiveKind::U64 => Value::U64(0),
        PrimitiveKind::I8 => Value::I8(0),
        PrimitiveKind::I16 => Value::I16(0),
        PrimitiveKind::I32 => Value::I32(0),
        PrimitiveKind::I64 => Value::I64(0),
        PrimitiveKind::F32 => Value::F32(0.0),
        PrimitiveKind::F64 => Value::F64(0.0),
        PrimitiveKind::C64 => Value::Complex64(Complex::default()),
        PrimitiveKind::C128 => Value::Complex128(Complex::default()),
        PrimitiveKind::String => Value::String(String::new()),
    }
}

/// Whether `value` has the shape `kind` declares.
///
/// Custom types accept any value; their codec decides.
fn conforms(value: &Value, kind: &TypeKind) -> bool {
    match (kind, value) {
        (TypeKind::Primitive(p), v) => primitive_matches(*p, v),
        (TypeKind::Struct(fields), Value::Struct(map)) => fields.iter().all(|f| {
            map.get(&f.name)
                .is_some_and(|v| conforms(v, &f.type_desc.kind))
        }),
        (TypeKind::Sequence(seq), Value::Sequence(items)) => items
            .iter()
            .all(|v| conforms(v, &seq.element_type.kind)),
        (TypeKind::Array(arr), Value::Array(items)) => {
            items.len() == arr.length && items.iter().all(|v| conforms(v, &arr.element_type.kind))
        }
        (TypeKind::Map(map), Value::Map(entries)) => entries.iter().all(|(k, v)| {
            conforms(k, &map.key_type.kind) && conforms(v, &map.value_type.kind)
        }),
        (TypeKind::Custom(_), _) => true,
        _ => false,
    }
}

fn primitive_matches(kind: PrimitiveKind, value: &Value) -> bool {
    matches!(
        (kind, value),
        (PrimitiveKind::Bool, Value::Bool(_))
            | (PrimitiveKind::U8, Value::U8(_))
            | (PrimitiveKind::U16, Value::U16(_))
            | (PrimitiveKind::U32, Value::U32(_))
            | (PrimitiveKind::U64, Value::U64(_))
            | (PrimitiveKind::I8, Value::I8(_))
            | (PrimitiveKind::I16, Value::I16(_))
            | (PrimitiveKind::I32, Value::I32(_))
            | (PrimitiveKind::I64, Value::I64(_))
            | (PrimitiveKind::F32, Value::F32(_))
            | (PrimitiveKind::F64, Value::F64(_))
            | (PrimitiveKind::C64, Value::Complex64(_))
            | (PrimitiveKind::C128, Value::Complex128(_))
            | (PrimitiveKind::String, Value::String(_))
    )
}

/// Trait for converting from Value.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, DynamicDataError>;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, DynamicDataError> {
                match value {
                    Value::$variant(v) => Ok(v.clone()),
                    other => Err(DynamicDataError::TypeMismatch {
                        expected: $name.to_string(),
                        got: other.kind_name().to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(u8, U8, "u8");
impl_from_value!(u16, U16, "u16");
impl_from_value!(u32, U32, "u32");
impl_from_value!(u64, U64, "u64");
impl_from_value!(i8, I8, "i8");
impl_from_value!(i16, I16, "i16");
impl_from_value!(i32, I32, "i32");
impl_from_value!(i64, I64, "i64");
impl_from_value!(f32, F32, "f32");
impl_from_value!(f64, F64, "f64");
impl_from_value!(Complex<f32>, Complex64, "complex64");
impl_from_value!(Complex<f64>, Complex128, "complex128");
impl_from_value!(String, String, "string");

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, DynamicDataError> {
        Ok(value.clone())
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value types.

use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Complex number, real part first on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

/// A dynamic value that can hold any archivable type.
///
/// Maps compare as sets of entries: two maps holding the same pairs in a
/// different order are equal.
#[derive(Debug, Clone)]
pub enum Value {
    // Primitives
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Complex64(Complex<f32>),
    Complex128(Complex<f64>),
    String(String),

    // Composites
    Struct(HashMap<String, Value>),
    Sequence(Vec<Value>),
    Array(Vec<Value>),
    /// Entries in archive order.
    Map(Vec<(Value, Value)>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Complex64(a), Self::Complex64(b)) => a == b,
            (Self::Complex128(a), Self::Complex128(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) | (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => same_entries(a, b),
            _ => false,
        }
    }
}

/// Entry-for-entry match regardless of order.
fn same_entries(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
    for (i, (key, _)) in b.iter().enumerate() {
        buckets.entry(key.key_hash()).or_default().push(i);
    }

    a.iter().all(|(key, value)| {
        let Some(bucket) = buckets.get_mut(&key.key_hash()) else {
            return false;
        };
        match bucket
            .iter()
            .position(|&i| b[i].0 == *key && b[i].1 == *value)
        {
            Some(slot) => {
                bucket.swap_remove(slot);
                true
            }
            None => false,
        }
    })
}

/// Keep one entry per key; a later value replaces an earlier one in place.
pub(crate) fn merge_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Vec<(K, V)>
where
    K: Borrow<Value>,
{
    let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
    let mut merged: Vec<(K, V)> = Vec::new();

    for (key, value) in entries {
        let k: &Value = key.borrow();
        let bucket = buckets.entry(k.key_hash()).or_default();
        let found = bucket
            .iter()
            .copied()
            .find(|&i| Borrow::<Value>::borrow(&merged[i].0) == k);
        match found {
            Some(i) => merged[i].1 = value,
            None => {
                bucket.push(merged.len());
                merged.push((key, value));
            }
        }
    }
    merged
}

impl Value {
    /// Variant name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Complex64(_) => "complex64",
            Self::Complex128(_) => "complex128",
            Self::String(_) => "string",
            Self::Struct(_) => "struct",
            Self::Sequence(_) => "sequence",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    /// Hash consistent with `==`: values that compare equal hash equally.
    pub(crate) fn key_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash_into(&mut hasher);
        hasher.finish()
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        // 0.0 and -0.0 compare equal.
        fn bits32(v: f32) -> u32 {
            if v == 0.0 {
                0
            } else {
                v.to_bits()
            }
        }
        fn bits64(v: f64) -> u64 {
            if v == 0.0 {
                0
            } else {
                v.to_bits()
            }
        }

        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(v) => v.hash(state),
            Self::U8(v) => v.hash(state),
            Self::U16(v) => v.hash(state),
            Self::U32(v) => v.hash(state),
            Self::U64(v) => v.hash(state),
            Self::I8(v) => v.hash(state),
            Self::I16(v) => v.hash(state),
            Self::I32(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::F32(v) => bits32(*v).hash(state),
            Self::F64(v) => bits64(*v).hash(state),
            Self::Complex64(c) => (bits32(c.re), bits32(c.im)).hash(state),
            Self::Complex128(c) => (bits64(c.re), bits64(c.im)).hash(state),
            Self::String(v) => v.hash(state),
            Self::Struct(fields) => {
                let sum = fields.iter().fold(0u64, |acc, (name, v)| {
                    let mut hasher = DefaultHasher::new();
                    name.hash(&mut hasher);
                    v.hash_into(&mut hasher);
                    acc.wrapping_add(hasher.finish())
                });
                sum.hash(state);
            }
            Self::Sequence(items) | Self::Array(items) => {
                items.len().hash(state);
                for item in items {
                    item.hash_into(state);
                }
            }
            Self::Map(entries) => {
                let sum = entries.iter().fold(0u64, |acc, (k, v)| {
                    let mut hasher = DefaultHasher::new();
                    k.hash_into(&mut hasher);
                    v.hash_into(&mut hasher);
                    acc.wrapping_add(hasher.finish())
                });
                sum.hash(state);
            }
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Self::U8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Self::U16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Self::I8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Self::I16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a sequence or an array.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(v) | Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Entries of a map.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Value stored under `key` in a map.
    pub fn map_get(&self, key: &Value) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Try to get struct field.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Struct(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Try to get mutable struct field.
    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Self::Struct(fields) => fields.get_mut(name),
            _ => None,
        }
    }

    /// Set struct field.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) -> bool {
        match self {
            Self::Struct(fields) => {
                fields.insert(name.into(), value);
                true
            }
            _ => false,
        }
    }
}

// Conversion traits
macro_rules! impl_from_primitive {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_from_primitive!(bool, Bool);
impl_from_primitive!(u8, U8);
impl_from_primitive!(u16, U16);
impl_from_primitive!(u32, U32);
impl_from_primitive!(u64, U64);
impl_from_primitive!(i8, I8);
impl_from_primitive!(i16, I16);
impl_from_primitive!(i32, I32);
impl_from_primitive!(i64, I64);
impl_from_primitive!(f32, F32);
impl_from_primitive!(f64, F64);
impl_from_primitive!(Complex<f32>, Complex64);
impl_from_primitive!(Complex<f64>, Complex128);
impl_from_primitive!(String, String);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use boost_text::dynamic::{
    Complex, CustomCodec, PrimitiveKind, TypeDescriptor, TypeDescriptorBuilder, Value,
};
use boost_text::{ArchiveError, ArchiveReader, ArchiveWriter, ClassInfo, Marshaler, Unmarshaler};
use std::collections::HashMap;
use std::sync::Arc;

/// Route library logs to the test harness; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const HEADER64: &str = "22 serialization::archive 17 4429449220 ";
pub const HEADER32: &str = "22 serialization::archive 17 4429448196 ";

pub fn primitive(kind: PrimitiveKind) -> Arc<TypeDescriptor> {
    Arc::new(TypeDescriptor::primitive(kind))
}

/// `struct animal { std::string name; int16_t legs; int8_t tails; }`
pub fn animal_type() -> Arc<TypeDescriptor> {
    Arc::new(
        TypeDescriptorBuilder::new("animal")
            .string_field("name")
            .field("legs", PrimitiveKind::I16)
            .field("tails", PrimitiveKind::I8)
            .build(),
    )
}

pub fn animal(name: &str, legs: i16, tails: i8) -> Value {
    let mut fields = HashMap::new();
    fields.insert("name".to_string(), Value::from(name));
    fields.insert("legs".to_string(), Value::from(legs));
    fields.insert("tails".to_string(), Value::from(tails));
    Value::Struct(fields)
}

/// Hand-written codec producing the same bytes as [`animal_type`], class
/// info included.
#[derive(Debug)]
pub struct AnimalCodec;

impl Marshaler for AnimalCodec {
    fn marshal_boost(&self, value: &Value, w: &mut ArchiveWriter<'_>) -> boost_text::Result<()> {
        let field = |name: &str| value.get_field(name);
        let (Some(name), Some(legs), Some(tails)) = (
            field("name").and_then(Value::as_str),
            field("legs").and_then(Value::as_i16),
            field("tails").and_then(Value::as_i8),
        ) else {
            return Err(ArchiveError::TypeNotSupported);
        };

        w.write_type_descr(&ClassInfo::new("animal"))?;
        w.write_string(name)?;
        w.write_i16(legs)?;
        w.write_i8(tails)
    }
}

impl Unmarshaler for AnimalCodec {
    fn unmarshal_boost(&self, r: &mut ArchiveReader<'_>) -> boost_text::Result<Value> {
        r.read_type_descr("animal")?;
        let name = r.read_string()?;
        let legs = r.read_i16()?;
        let tails = r.read_i8()?;
        Ok(animal(&name, legs, tails))
    }
}

/// Self-encoding twin of [`animal_type`].
pub fn manimal_type() -> Arc<TypeDescriptor> {
    Arc::new(TypeDescriptor::custom("manimal", CustomCodec::new(AnimalCodec)))
}

/// One named value per supported shape.
pub fn type_cases() -> Vec<(&'static str, Arc<TypeDescriptor>, Value)> {
    let u8_type = primitive(PrimitiveKind::U8);
    let string = primitive(PrimitiveKind::String);

    vec![
        ("bool-false", primitive(PrimitiveKind::Bool), Value::Bool(false)),
        ("bool-true", primitive(PrimitiveKind::Bool), Value::Bool(true)),
        ("int8", primitive(PrimitiveKind::I8), Value::I8(0x11)),
        ("int16", primitive(PrimitiveKind::I16), Value::I16(0x2222)),
        ("int32", primitive(PrimitiveKind::I32), Value::I32(0x33333333)),
        (
            "int64",
            primitive(PrimitiveKind::I64),
            Value::I64(0x4444444444444444),
        ),
        ("uint8", primitive(PrimitiveKind::U8), Value::U8(0xff)),
        ("uint16", primitive(PrimitiveKind::U16), Value::U16(0x2222)),
        ("uint32", primitive(PrimitiveKind::U32), Value::U32(0x3333333)),
        (
            "uint64",
            primitive(PrimitiveKind::U64),
            Value::U64(0x444444444444444),
        ),
        ("float32", primitive(PrimitiveKind::F32), Value::F32(2.2)),
        ("float64", primitive(PrimitiveKind::F64), Value::F64(3.3)),
        (
            "cmplx64",
            primitive(PrimitiveKind::C64),
            Value::Complex64(Complex::new(2.0, 3.0)),
        ),
        (
            "cmplx128",
            primitive(PrimitiveKind::C128),
            Value::Complex128(Complex::new(4.0, 9.0)),
        ),
        (
            "[3]uint8",
            Arc::new(TypeDescriptor::array(u8_type.clone(), 3)),
            Value::from([0x11u8, 0x22, 0x33]),
        ),
        (
            "[]uint8",
            Arc::new(TypeDescriptor::sequence(u8_type.clone())),
            Value::from(vec![0x11u8, 0x22, 0x33, 0xff]),
        ),
        (
            "[]byte",
            Arc::new(TypeDescriptor::sequence(u8_type)),
            Value::from(b"hello".to_vec()),
        ),
        ("string", string.clone(), Value::from("hello")),
        (
            "map[string]string",
            Arc::new(TypeDescriptor::map(string.clone(), string.clone())),
            [("eins", "un"), ("zwei", "deux"), ("drei", "trois")]
                .into_iter()
                .collect(),
        ),
        ("struct", animal_type(), animal("pet", 4, 1)),
        ("struct-marshal", manimal_type(), animal("pet", 4, 1)),
        (
            "[]string",
            Arc::new(TypeDescriptor::sequence(string)),
            Value::from(vec!["s1", "s2", "s3"]),
        ),
        (
            "[]animal",
            Arc::new(TypeDescriptor::sequence(manimal_type())),
            Value::Sequence(vec![animal("tiger", 4, 1), animal("monkey", 4, 1)]),
        ),
    ]
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value encoder and decoder.
//!
//! Walks a [`Value`] along its [`TypeDescriptor`] and drives the primitive
//! reader/writer:
//!
//! | kind      | wire layout                                                 |
//! |-----------|-------------------------------------------------------------|
//! | primitive | one token (two for complex, length + payload for strings)   |
//! | struct    | class info (first occurrence), fields in declared order     |
//! | sequence  | class info, length, `0` (non-builtin elements only), items  |
//! | array     | class info, length, items                                   |
//! | map       | class info, length, `0`, `0`, key/value pairs (one per key) |
//! | custom    | whatever the type's own codec emits                         |
//!
//! Any error, structural or I/O, is latched in the underlying reader or
//! writer: after the first failure every call returns that same error and no
//! further bytes move.

use crate::arch::Arch;
use crate::config::ArchiveConfig;
use crate::dynamic::{merge_entries, DynamicData, PrimitiveKind, TypeDescriptor, TypeKind, Value};
use crate::error::{ArchiveError, Result};
use crate::header::Header;
use crate::reader::ArchiveReader;
use crate::writer::ArchiveWriter;
use std::collections::HashMap;
use std::fmt::Debug;
use std::io::{Read, Write};
use std::sync::Arc;
use tracing::warn;

/// Self-encoding hook.
///
/// Replaces the generic traversal for a [`TypeKind::Custom`] type, class
/// info included: an implementation that wants a descriptor on the wire
/// writes it with [`ArchiveWriter::write_type_descr`].
pub trait Marshaler: Debug + Send + Sync {
    fn marshal_boost(&self, value: &Value, w: &mut ArchiveWriter<'_>) -> Result<()>;
}

/// Self-decoding hook, the inverse of [`Marshaler`].
pub trait Unmarshaler: Debug + Send + Sync {
    fn unmarshal_boost(&self, r: &mut ArchiveReader<'_>) -> Result<Value>;
}

/// Writes values to a text archive.
///
/// The header goes out exactly once, in front of the first value.
pub struct Encoder<'a> {
    w: ArchiveWriter<'a>,
    header: Header,
    header_written: bool,
}

impl<'a> Encoder<'a> {
    pub fn new<W: Write + 'a>(w: W) -> Self {
        Self::with_arch(w, Arch::default())
    }

    pub fn with_arch<W: Write + 'a>(w: W, arch: Arch) -> Self {
        Self {
            w: ArchiveWriter::with_arch(w, arch),
            header: Header::ZERO,
            header_written: false,
        }
    }

    pub fn with_config<W: Write + 'a>(w: W, config: &ArchiveConfig) -> Self {
        let mut enc = Self::with_arch(w, config.arch);
        if let Some(header) = config.header {
            enc.set_header(header);
        }
        enc
    }

    /// Header to write instead of the profile default.
    ///
    /// Has no effect once the header is out.
    pub fn set_header(&mut self, header: Header) {
        if self.header_written {
            warn!("archive encoder: header already written, ignoring override");
            return;
        }
        self.header = header;
    }

    /// Header as set, or as written once the first value is out.
    pub fn header(&self) -> Header {
        self.header
    }

    pub fn arch(&self) -> Arch {
        self.w.arch()
    }

    /// Latched error, if any.
    pub fn err(&self) -> Option<&ArchiveError> {
        self.w.err()
    }

    fn ensure_header(&mut self) -> Result<()> {
        if !self.header_written {
            self.header_written = true;
            if self.header.is_zero() {
                self.header = self.w.arch().header();
            }
            self.w.write_header(&self.header)?;
        }
        match self.w.err() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Encode `data` along its own descriptor.
    pub fn encode(&mut self, data: &DynamicData) -> Result<()> {
        self.encode_value(data.value(), data.descriptor())
    }

    /// Encode `value` as an instance of `desc`.
    pub fn encode_value(&mut self, value: &Value, desc: &TypeDescriptor) -> Result<()> {
        self.ensure_header()?;
        let res = write_value(&mut self.w, value, desc);
        self.w.latch(res)
    }

    /// Raw primitive access, after the header.
    pub fn writer(&mut self) -> Result<&mut ArchiveWriter<'a>> {
        self.ensure_header()?;
        Ok(&mut self.w)
    }

    /// Write the header if nothing was encoded, then flush the sink.
    pub fn finish(mut self) -> Result<()> {
        self.ensure_header()?;
        self.w.flush_sink()
    }
}

/// Reads values from a text archive.
pub struct Decoder<'a> {
    r: ArchiveReader<'a>,
    header: Header,
}

impl<'a> Decoder<'a> {
    /// Create a decoder and consume the archive header.
    ///
    /// A bad header is not reported here: it is latched and returned by the
    /// first decode.
    pub fn new<R: Read + 'a>(r: R) -> Self {
        let mut r = ArchiveReader::new(r);
        let header = r.read_header().unwrap_or(Header::ZERO);
        Self { r, header }
    }

    /// Header read from the stream; [`Header::ZERO`] if it could not be read.
    pub fn header(&self) -> Header {
        self.header
    }

    /// Latched error, if any.
    pub fn err(&self) -> Option<&ArchiveError> {
        self.r.err()
    }

    fn check(&self) -> Result<()> {
        match self.r.err() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Decode one instance of `desc`.
    pub fn decode(&mut self, desc: &Arc<TypeDescriptor>) -> Result<DynamicData> {
        let value = self.decode_value(desc)?;
        DynamicData::from_value(desc, value)
            .map_err(|e| ArchiveError::mismatch(desc.name.clone(), e.to_string()))
    }

    /// Decode one instance of `desc` as a bare value.
    pub fn decode_value(&mut self, desc: &TypeDescriptor) -> Result<Value> {
        self.check()?;
        let res = read_value(&mut self.r, desc);
        self.r.latch(res)
    }

    /// Raw primitive access.
    pub fn reader(&mut self) -> Result<&mut ArchiveReader<'a>> {
        self.check()?;
        Ok(&mut self.r)
    }
}

fn mismatch(desc: &TypeDescriptor, value: &Value) -> ArchiveError {
    ArchiveError::mismatch(desc.name.clone(), value.kind_name())
}

fn write_value(w: &mut ArchiveWriter<'_>, value: &Value, desc: &TypeDescriptor) -> Result<()> {
    match &desc.kind {
        TypeKind::Primitive(p) => write_primitive(w, value, *p),
        TypeKind::Struct(fields) => {
            let Value::Struct(map) = value else {
                return Err(mismatch(desc, value));
            };
            w.write_type_descr(&desc.class_info())?;
            for field in fields {
                let field_value = map.get(&field.name).ok_or_else(|| {
                    ArchiveError::mismatch(format!("field {}", field.name), "missing field")
                })?;
                write_value(w, field_value, &field.type_desc)?;
            }
            Ok(())
        }
        TypeKind::Sequence(seq) => {
            let Value::Sequence(items) = value else {
                return Err(mismatch(desc, value));
            };
            w.write_type_descr(&desc.class_info())?;
            w.write_len(items.len())?;
            if !seq.element_type.is_builtin() {
                w.write_u32(0)?;
            }
            for item in items {
                write_value(w, item, &seq.element_type)?;
            }
            Ok(())
        }
        TypeKind::Array(arr) => {
            let Value::Array(items) = value else {
                return Err(mismatch(desc, value));
            };
            if items.len() != arr.length {
                return Err(ArchiveError::InvalidArrayLen);
            }
            w.write_type_descr(&desc.class_info())?;
            w.write_len(items.len())?;
            for item in items {
                write_value(w, item, &arr.element_type)?;
            }
            Ok(())
        }
        TypeKind::Map(map) => {
            let Value::Map(entries) = value else {
                return Err(mismatch(desc, value));
            };
            let entries = merge_entries(entries.iter().map(|(k, v)| (k, v)));
            w.write_type_descr(&desc.class_info())?;
            w.write_len(entries.len())?;
            w.write_u64(0)?;
            w.write_u8(0)?;
            for (key, item) in entries {
                write_value(w, key, &map.key_type)?;
                write_value(w, item, &map.value_type)?;
            }
            Ok(())
        }
        TypeKind::Custom(codec) => {
            let marshaler = codec
                .marshaler
                .as_ref()
                .ok_or(ArchiveError::TypeNotSupported)?;
            marshaler.marshal_boost(value, w)?;
            match w.err() {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
        TypeKind::Opaque => Err(ArchiveError::TypeNotSupported),
    }
}

fn write_primitive(w: &mut ArchiveWriter<'_>, value: &Value, kind: PrimitiveKind) -> Result<()> {
    match (kind, value) {
        (PrimitiveKind::Bool, Value::Bool(v)) => w.write_bool(*v),
        (PrimitiveKind::U8, Value::U8(v)) => w.write_u8(*v),
        (PrimitiveKind::U16, Value::U16(v)) => w.write_u16(*v),
        (PrimitiveKind::U32, Value::U32(v)) => w.write_u32(*v),
        (PrimitiveKind::U64, Value::U64(v)) => w.write_u64(*v),
        (PrimitiveKind::I8, Value::I8(v)) => w.write_i8(*v),
        (PrimitiveKind::I16, Value::I16(v)) => w.write_i16(*v),
        (PrimitiveKind::I32, Value::I32(v)) => w.write_i32(*v),
        (PrimitiveKind::I64, Value::I64(v)) => w.write_i64(*v),
        (PrimitiveKind::F32, Value::F32(v)) => w.write_f32(*v),
        (PrimitiveKind::F64, Value::F64(v)) => w.write_f64(*v),
        (PrimitiveKind::C64, Value::Complex64(v)) => w.write_c64(*v),
        (PrimitiveKind::C128, Value::Complex128(v)) => w.write_c128(*v),
        (PrimitiveKind::String, Value::String(v)) => w.write_string(v),
        (kind, value) => Err(ArchiveError::mismatch(kind.type_name(), value.kind_name())),
    }
}

fn read_value(r: &mut ArchiveReader<'_>, desc: &TypeDescriptor) -> Result<Value> {
    match &desc.kind {
        TypeKind::Primitive(p) => read_primitive(r, *p),
        TypeKind::Struct(fields) => {
            r.read_type_descr(&desc.name)?;
            let mut map = HashMap::with_capacity(fields.len());
            for field in fields {
                map.insert(field.name.clone(), read_value(r, &field.type_desc)?);
            }
            Ok(Value::Struct(map))
        }
        TypeKind::Sequence(seq) => {
            r.read_type_descr(&desc.name)?;
            let len = r.read_len()?;
            if !seq.element_type.is_builtin() {
                r.read_u32()?;
            }
            let mut items = Vec::new();
            for _ in 0..len {
                items.push(read_value(r, &seq.element_type)?);
            }
            Ok(Value::Sequence(items))
        }
        TypeKind::Array(arr) => {
            r.read_type_descr(&desc.name)?;
            let len = r.read_len()?;
            if len != arr.length as u64 {
                return Err(ArchiveError::InvalidArrayLen);
            }
            let mut items = Vec::with_capacity(arr.length);
            for _ in 0..arr.length {
                items.push(read_value(r, &arr.element_type)?);
            }
            Ok(Value::Array(items))
        }
        TypeKind::Map(map) => {
            r.read_type_descr(&desc.name)?;
            let len = r.read_len()?;
            r.read_u64()?;
            r.read_u8()?;
            let mut entries = Vec::new();
            for _ in 0..len {
                let key = read_value(r, &map.key_type)?;
                let item = read_value(r, &map.value_type)?;
                entries.push((key, item));
            }
            Ok(Value::Map(merge_entries(entries)))
        }
        TypeKind::Custom(codec) => {
            let unmarshaler = codec
                .unmarshaler
                .as_ref()
                .ok_or(ArchiveError::TypeNotSupported)?;
            let value = unmarshaler.unmarshal_boost(r)?;
            match r.err() {
                Some(err) => Err(err.clone()),
                None => Ok(value),
            }
        }
        TypeKind::Opaque => Err(ArchiveError::TypeNotSupported),
    }
}

fn read_primitive(r: &mut ArchiveReader<'_>, kind: PrimitiveKind) -> Result<Value> {
    Ok(match kind {
        PrimitiveKind::Bool => Value::Bool(r.read_bool()?),
        PrimitiveKind::U8 => Value::U8(r.read_u8()?),
        PrimitiveKind::U16 => Value::U16(r.read_u16()?),
        PrimitiveKind::U32 => Value::U32(r.read_u32()?),
        PrimitiveKind::U64 => Value::U64(r.read_u64()?),
        PrimitiveKind::I8 => Value::I8(r.read_i8()?),
        PrimitiveKind::I16 => Value::I16(r.read_i16()?),
        PrimitiveKind::I32 => Value::I32(r.read_i32()?),
        PrimitiveKind::I64 => Value::I64(r.read_i64()?),
        PrimitiveKind::F32 => Value::F32(r.read_f32()?),
        PrimitiveKind::F64 => Value::F64(r.read_f64()?),
        PrimitiveKind::C64 => Value::Complex64(r.read_c64()?),
        PrimitiveKind::C128 => Value::Complex128(r.read_c128()?),
        PrimitiveKind::String => Value::String(r.read_string()?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::TypeDescriptorBuilder;

    const HEADER64: &str = "22 serialization::archive 17 4429449220 ";

    fn encode_to_string(arch: Arch, f: impl FnOnce(&mut Encoder<'_>)) -> String {
        let mut buf = Vec::new();
        {
            let mut enc = Encoder::with_arch(&mut buf, arch);
            f(&mut enc);
        }
        String::from_utf8(buf).expect("utf-8")
    }

    #[test]
    fn test_header_written_once() {
        let int = TypeDescriptor::primitive(PrimitiveKind::I32);
        let out = encode_to_string(Arch::Width64, |enc| {
            enc.encode_value(&Value::I32(1), &int).expect("first");
            enc.encode_value(&Value::I32(-2), &int).expect("second");
        });
        assert_eq!(out, format!("{HEADER64}1 -2 "));
    }

    #[test]
    fn test_custom_header() {
        let out = encode_to_string(Arch::Width64, |enc| {
            enc.set_header(Header::new(19, 7));
            enc.writer().expect("writer");
            enc.set_header(Header::new(20, 8));
            assert_eq!(enc.header(), Header::new(19, 7));
        });
        assert_eq!(out, "22 serialization::archive 19 7 ");
    }

    #[test]
    fn test_struct_descriptor_elided() {
        let animal = TypeDescriptorBuilder::new("animal")
            .string_field("name")
            .field("legs", PrimitiveKind::I16)
            .build();
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), Value::from("pet"));
        fields.insert("legs".to_string(), Value::from(4i16));
        let value = Value::Struct(fields);

        let out = encode_to_string(Arch::Width64, |enc| {
            enc.encode_value(&value, &animal).expect("first");
            enc.encode_value(&value, &animal).expect("second");
        });
        assert_eq!(out, format!("{HEADER64}0 0 3 pet 4 3 pet 4 "));
    }

    #[test]
    fn test_sequence_reserved_field() {
        let cplx = Arc::new(TypeDescriptor::primitive(PrimitiveKind::C64));
        let desc = TypeDescriptor::sequence(cplx);
        let value = Value::Sequence(vec![Value::Complex64(crate::dynamic::Complex::new(
            2.0, 3.0,
        ))]);
        let out = encode_to_string(Arch::Width64, |enc| {
            enc.encode_value(&value, &desc).expect("encode");
        });
        assert_eq!(out, format!("{HEADER64}0 0 1 0 2 3 "));
    }

    #[test]
    fn test_mismatch_is_latched() {
        let boolean = TypeDescriptor::primitive(PrimitiveKind::Bool);
        let mut buf = Vec::new();
        let mut enc = Encoder::new(&mut buf);
        let err = enc.encode_value(&Value::I32(1), &boolean).unwrap_err();
        assert_eq!(err, ArchiveError::mismatch("bool", "i32"));
        assert_eq!(enc.encode_value(&Value::Bool(true), &boolean), Err(err));
    }

    #[test]
    fn test_decoder_reports_header_error_on_decode() {
        let mut dec = Decoder::new("".as_bytes());
        assert_eq!(dec.header(), Header::ZERO);
        let int = TypeDescriptor::primitive(PrimitiveKind::I32);
        assert_eq!(dec.decode_value(&int), Err(ArchiveError::NotBoost));
        assert!(dec.reader().is_err());
    }

    #[test]
    fn test_map_duplicate_key_replaces() {
        let string = Arc::new(TypeDescriptor::primitive(PrimitiveKind::String));
        let desc = TypeDescriptor::map(string.clone(), string);
        let input = format!("{HEADER64}0 0 2 0 0 1 a 1 x 1 a 1 y ");
        let mut dec = Decoder::new(input.as_bytes());
        let value = dec.decode_value(&desc).expect("decode");
        assert_eq!(
            value,
            Value::Map(vec![(Value::from("a"), Value::from("y"))])
        );
    }

    #[test]
    fn test_map_duplicate_key_merged_on_encode() {
        let string = Arc::new(TypeDescriptor::primitive(PrimitiveKind::String));
        let desc = TypeDescriptor::map(string.clone(), string);
        let value = Value::Map(vec![
            (Value::from("a"), Value::from("x")),
            (Value::from("b"), Value::from("z")),
            (Value::from("a"), Value::from("y")),
        ]);
        let out = encode_to_string(Arch::Width64, |enc| {
            enc.encode_value(&value, &desc).expect("encode");
        });
        assert_eq!(out, format!("{HEADER64}0 0 2 0 0 1 a 1 y 1 b 1 z "));
    }

    #[test]
    fn test_map_decoded_in_any_order() {
        let string = Arc::new(TypeDescriptor::primitive(PrimitiveKind::String));
        let desc = TypeDescriptor::map(string.clone(), string);
        let input = format!("{HEADER64}0 0 3 0 0 4 drei 5 trois 4 eins 2 un 4 zwei 4 deux ");
        let mut dec = Decoder::new(input.as_bytes());
        let value = dec.decode_value(&desc).expect("decode");
        let expected: Value = [("eins", "un"), ("zwei", "deux"), ("drei", "trois")]
            .into_iter()
            .collect();
        assert_eq!(value, expected);
    }
}

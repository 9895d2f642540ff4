// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.

use crate::codec::{Marshaler, Unmarshaler};
use crate::registry::ClassInfo;
use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// `std::complex<float>`.
    C64,
    /// `std::complex<double>`.
    C128,
    String,
}

impl PrimitiveKind {
    /// Name of the matching C++ type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "uint8_t",
            Self::U16 => "uint16_t",
            Self::U32 => "uint32_t",
            Self::U64 => "uint64_t",
            Self::I8 => "int8_t",
            Self::I16 => "int16_t",
            Self::I32 => "int32_t",
            Self::I64 => "int64_t",
            Self::F32 => "float",
            Self::F64 => "double",
            Self::C64 => "std::complex<float>",
            Self::C128 => "std::complex<double>",
            Self::String => "std::string",
        }
    }

    /// Whether the kind is a builtin of the archive format.
    ///
    /// Containers of non-builtin elements carry an extra reserved field.
    /// Complex numbers are class types on the wire, everything else is
    /// builtin.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::C64 | Self::C128)
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Struct with named fields, encoded in declaration order.
    Struct(Vec<FieldDescriptor>),
    /// Sequence (dynamic length).
    Sequence(SequenceDescriptor),
    /// Array (fixed length).
    Array(ArrayDescriptor),
    /// Associative container.
    Map(MapDescriptor),
    /// Type that encodes itself.
    Custom(CustomCodec),
    /// Type with no encoding in this format.
    Opaque,
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name; also the key of the type descriptor cache.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
    /// Class version written with the first occurrence.
    pub class_version: u32,
    /// Tracking level written with the first occurrence.
    pub tracking: u8,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            class_version: 0,
            tracking: 0,
        }
    }

    /// Create a primitive type descriptor named after the C++ type.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(kind.type_name(), TypeKind::Primitive(kind))
    }

    /// Create a struct type descriptor.
    pub fn struct_type(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Struct(fields))
    }

    /// `std::vector<T>`.
    pub fn sequence(element_type: Arc<TypeDescriptor>) -> Self {
        let name = format!("std::vector<{}>", element_type.name);
        Self::new(name, TypeKind::Sequence(SequenceDescriptor::new(element_type)))
    }

    /// `std::array<T, N>`.
    pub fn array(element_type: Arc<TypeDescriptor>, length: usize) -> Self {
        let name = format!("std::array<{}, {}>", element_type.name, length);
        Self::new(
            name,
            TypeKind::Array(ArrayDescriptor::new(element_type, length)),
        )
    }

    /// `std::map<K, V>`.
    pub fn map(key_type: Arc<TypeDescriptor>, value_type: Arc<TypeDescriptor>) -> Self {
        let name = format!("std::map<{}, {}>", key_type.name, value_type.name);
        Self::new(name, TypeKind::Map(MapDescriptor::new(key_type, value_type)))
    }

    /// Type encoded by its own marshal/unmarshal hooks.
    pub fn custom(name: impl Into<String>, codec: CustomCodec) -> Self {
        Self::new(name, TypeKind::Custom(codec))
    }

    /// Type that cannot be encoded.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Opaque)
    }

    pub fn with_class_version(mut self, version: u32) -> Self {
        self.class_version = version;
        self
    }

    pub fn with_tracking(mut self, tracking: u8) -> Self {
        self.tracking = tracking;
        self
    }

    /// Class-info record emitted for this type.
    pub fn class_info(&self) -> ClassInfo {
        ClassInfo::new(self.name.clone())
            .with_version(self.class_version)
            .with_tracking(self.tracking)
    }

    /// Check if this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    /// Check if this is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Whether the type is a builtin of the archive format.
    pub fn is_builtin(&self) -> bool {
        match &self.kind {
            TypeKind::Primitive(p) => p.is_builtin(),
            _ => false,
        }
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?.iter().position(|f| f.name == name)
    }
}

/// Field descriptor for struct members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// Sequence type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
}

impl SequenceDescriptor {
    pub fn new(element_type: Arc<TypeDescriptor>) -> Self {
        Self { element_type }
    }
}

/// Array type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
    /// Fixed length.
    pub length: usize,
}

impl ArrayDescriptor {
    /// Create array descriptor.
    pub fn new(element_type: Arc<TypeDescriptor>, length: usize) -> Self {
        Self {
            element_type,
            length,
        }
    }
}

/// Map type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDescriptor {
    pub key_type: Arc<TypeDescriptor>,
    pub value_type: Arc<TypeDescriptor>,
}

impl MapDescriptor {
    pub fn new(key_type: Arc<TypeDescriptor>, value_type: Arc<TypeDescriptor>) -> Self {
        Self {
            key_type,
            value_type,
        }
    }
}

/// Marshal/unmarshal hooks of a self-encoding type.
///
/// Either half may be missing; using the missing direction fails with
/// [`crate::ArchiveError::TypeNotSupported`].
#[derive(Debug, Clone, Default)]
pub struct CustomCodec {
    pub marshaler: Option<Arc<dyn Marshaler>>,
    pub unmarshaler: Option<Arc<dyn Unmarshaler>>,
}

impl CustomCodec {
    /// Codec with both directions served by `codec`.
    pub fn new<C>(codec: C) -> Self
    where
        C: Marshaler + Unmarshaler + 'static,
    {
        let codec = Arc::new(codec);
        Self {
            marshaler: Some(codec.clone()),
            unmarshaler: Some(codec),
        }
    }

    pub fn with_marshaler(mut self, marshaler: Arc<dyn Marshaler>) -> Self {
        self.marshaler = Some(marshaler);
        self
    }

    pub fn with_unmarshaler(mut self, unmarshaler: Arc<dyn Unmarshaler>) -> Self {
        self.unmarshaler = Some(unmarshaler);
        self
    }
}

impl PartialEq for CustomCodec {
    fn eq(&self, other: &Self) -> bool {
        fn same<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
        }
        same(&self.marshaler, &other.marshaler) && same(&self.unmarshaler, &other.unmarshaler)
    }
}

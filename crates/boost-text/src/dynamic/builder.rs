// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for TypeDescriptor.

use crate::dynamic::{FieldDescriptor, PrimitiveKind, TypeDescriptor};
use std::sync::Arc;

/// Builder for struct type descriptors.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    class_version: u32,
    tracking: u8,
}

impl TypeDescriptorBuilder {
    /// Create a new builder for a struct type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            class_version: 0,
            tracking: 0,
        }
    }

    /// Add a primitive field.
    pub fn field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::primitive(kind)))
    }

    /// Add a field with a type descriptor.
    pub fn field_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::String)
    }

    /// Add a `std::vector` field of primitives.
    pub fn sequence_field(self, name: impl Into<String>, element_kind: PrimitiveKind) -> Self {
        let element_type = Arc::new(TypeDescriptor::primitive(element_kind));
        self.field_with_type(name, Arc::new(TypeDescriptor::sequence(element_type)))
    }

    /// Add a `std::array` field of primitives.
    pub fn array_field(
        self,
        name: impl Into<String>,
        element_kind: PrimitiveKind,
        length: usize,
    ) -> Self {
        let element_type = Arc::new(TypeDescriptor::primitive(element_kind));
        self.field_with_type(name, Arc::new(TypeDescriptor::array(element_type, length)))
    }

    /// Add a nested struct field.
    pub fn nested_field(self, name: impl Into<String>, nested: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, nested)
    }

    /// Class version written with the first occurrence.
    pub fn class_version(mut self, version: u32) -> Self {
        self.class_version = version;
        self
    }

    /// Tracking level written with the first occurrence.
    pub fn tracking(mut self, tracking: u8) -> Self {
        self.tracking = tracking;
        self
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::struct_type(self.name, self.fields)
            .with_class_version(self.class_version)
            .with_tracking(self.tracking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::TypeKind;

    #[test]
    fn test_builder_fields_in_order() {
        let desc = TypeDescriptorBuilder::new("animal")
            .string_field("name")
            .field("legs", PrimitiveKind::I16)
            .field("tails", PrimitiveKind::I8)
            .class_version(1)
            .build();

        let names: Vec<_> = desc
            .fields()
            .expect("struct")
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, ["name", "legs", "tails"]);
        assert_eq!(desc.class_version, 1);
        assert_eq!(desc.field_index("tails"), Some(2));
    }

    #[test]
    fn test_builder_container_fields() {
        let desc = TypeDescriptorBuilder::new("zoo")
            .sequence_field("ids", PrimitiveKind::U32)
            .array_field("pos", PrimitiveKind::F64, 3)
            .build();

        let ids = desc.field("ids").expect("ids");
        assert_eq!(ids.type_desc.name, "std::vector<uint32_t>");
        let pos = desc.field("pos").expect("pos");
        assert!(matches!(&pos.type_desc.kind, TypeKind::Array(a) if a.length == 3));
    }
}

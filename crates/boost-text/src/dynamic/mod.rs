// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic types for archive values.
//!
//! Runtime schema and value model used by the encoder and decoder.
//!
//! # Features
//!
//! - **TypeDescriptor**: Runtime type description (primitives, structs, containers, custom codecs)
//! - **Value**: Tagged value tree mirroring the type kinds
//! - **DynamicData**: Value paired with its descriptor, with field access
//! - **Builder API**: Fluent interface for building struct descriptors
//!
//! # Example
//!
//! ```rust
//! use boost_text::dynamic::{DynamicData, PrimitiveKind, TypeDescriptorBuilder};
//! use std::sync::Arc;
//!
//! let descriptor = Arc::new(TypeDescriptorBuilder::new("animal")
//!     .string_field("name")
//!     .field("legs", PrimitiveKind::I16)
//!     .field("tails", PrimitiveKind::I8)
//!     .build());
//!
//! let mut data = DynamicData::new(&descriptor);
//! data.set("name", "pet").unwrap();
//! data.set("legs", 4i16).unwrap();
//!
//! let legs: i16 = data.get("legs").unwrap();
//! assert_eq!(legs, 4);
//! ```

mod builder;
mod dynamic_data;
mod type_descriptor;
mod value;

pub use builder::TypeDescriptorBuilder;
pub use dynamic_data::{DynamicData, DynamicDataError, FromValue};
pub(crate) use value::merge_entries;
pub use type_descriptor::{
    ArrayDescriptor, CustomCodec, FieldDescriptor, MapDescriptor, PrimitiveKind,
    SequenceDescriptor, TypeDescriptor, TypeKind,
};
pub use value::{Complex, Value};

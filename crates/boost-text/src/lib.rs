// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Boost.Serialization text archives
//!
//! Read and write the text archive format produced by Boost's
//! `text_oarchive`, driven by runtime type descriptors:
//! - Header with magic signature, library version and layout flags
//! - Class-info records written on the first occurrence of a type only
//! - 32-bit and 64-bit length profiles
//! - Custom marshal/unmarshal hooks for self-encoding types
//!
//! # Quick Start
//!
//! ```rust
//! use boost_text::dynamic::{DynamicData, PrimitiveKind, TypeDescriptorBuilder};
//! use boost_text::{Decoder, Encoder};
//! use std::sync::Arc;
//!
//! let animal = Arc::new(TypeDescriptorBuilder::new("animal")
//!     .string_field("name")
//!     .field("legs", PrimitiveKind::I16)
//!     .field("tails", PrimitiveKind::I8)
//!     .build());
//!
//! let mut data = DynamicData::new(&animal);
//! data.set("name", "pet").unwrap();
//! data.set("legs", 4i16).unwrap();
//! data.set("tails", 1i8).unwrap();
//!
//! let mut buf = Vec::new();
//! let mut enc = Encoder::new(&mut buf);
//! enc.encode(&data).unwrap();
//! enc.finish().unwrap();
//! assert_eq!(buf, b"22 serialization::archive 17 4429449220 0 0 3 pet 4 1 ");
//!
//! let mut dec = Decoder::new(buf.as_slice());
//! assert_eq!(dec.decode(&animal).unwrap(), data);
//! ```
//!
//! # Profiles
//!
//! | Profile | Length field | Header flags |
//! |---------|--------------|--------------|
//! | `Unspecified` | 64-bit | 64-bit |
//! | `HostWidth` | 64-bit | host pointer width |
//! | `Width32` | 32-bit | 32-bit |
//! | `Width64` | 64-bit | 64-bit |

pub mod arch;
pub mod codec;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod header;
pub mod reader;
pub mod registry;
pub mod writer;

pub use arch::{Arch, LenWidth, LIBRARY_VERSION};
pub use codec::{Decoder, Encoder, Marshaler, Unmarshaler};
pub use config::{ArchiveConfig, ArchiveConfigBuilder, ConfigError};
pub use error::{ArchiveError, Result};
pub use header::{Header, MAGIC_SIGNATURE};
pub use reader::ArchiveReader;
pub use registry::{ClassInfo, TypeRegistry};
pub use writer::ArchiveWriter;

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Archive header.
//!
//! # Format Overview
//!
//! ```text
//! 22 serialization::archive 17 4429449220 <values...>
//! ^^ ^^^^^^^^^^^^^^^^^^^^^^ ^^ ^^^^^^^^^^
//! |  magic signature        |  layout flags (u64)
//! |                         library version (u16)
//! length of the signature (profile width)
//! ```
//!
//! The layout flags pack the sizes of `int`, `long`, `float` and `double`
//! and an endianness marker, one byte each, least significant first.

use crate::arch::Arch;
use serde::{Deserialize, Serialize};

/// Signature opening every archive.
pub const MAGIC_SIGNATURE: &str = "serialization::archive";

const SIZEOF_INT: u64 = 4;
const SIZEOF_FLOAT: u64 = 4;
const SIZEOF_DOUBLE: u64 = 8;
const LITTLE_ENDIAN: u64 = 1;

/// Version record written once, right after the magic signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    /// Library version.
    pub version: u16,
    /// Layout flags.
    pub flags: u64,
}

impl Header {
    /// "Not customized" sentinel; replaced by the profile default at first write.
    pub const ZERO: Header = Header {
        version: 0,
        flags: 0,
    };

    pub fn new(version: u16, flags: u64) -> Self {
        Self { version, flags }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub(crate) fn layout_flags(long_size: u64) -> u64 {
        SIZEOF_INT | long_size << 8 | SIZEOF_FLOAT << 16 | SIZEOF_DOUBLE << 24 | LITTLE_ENDIAN << 32
    }

    /// Profile the layout flags describe, if they describe one.
    ///
    /// Informational only: decoders always parse lengths as 64-bit tokens,
    /// which accepts archives of either width.
    pub fn arch(&self) -> Option<Arch> {
        match (self.flags >> 8) & 0xff {
            4 => Some(Arch::Width32),
            8 => Some(Arch::Width64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sentinel() {
        assert!(Header::ZERO.is_zero());
        assert!(Header::default().is_zero());
        assert!(!Header::new(17, 0).is_zero());
    }

    #[test]
    fn test_arch_from_flags() {
        assert_eq!(Arch::Width32.header().arch(), Some(Arch::Width32));
        assert_eq!(Arch::Width64.header().arch(), Some(Arch::Width64));
        assert_eq!(Header::new(17, 0).arch(), None);
    }
}

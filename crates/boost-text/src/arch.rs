// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Architecture profile.
//!
//! Boost writes lengths as `std::size_t`, so the width of every
//! length field follows the pointer width of the machine that produced the
//! archive. The profile selects that width and the default header.

use crate::codec::Encoder;
use crate::header::Header;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Library version written in default headers.
pub const LIBRARY_VERSION: u16 = 17;

/// Width of a length field on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LenWidth {
    U32,
    U64,
}

/// Architecture profile of an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// No explicit choice; behaves like [`Arch::Width64`].
    #[default]
    Unspecified,
    /// Pointer width of the running host (selects the header only).
    #[serde(rename = "host")]
    HostWidth,
    /// 32-bit `size_t`.
    Width32,
    /// 64-bit `size_t`.
    Width64,
}

impl Arch {
    /// Default header for archives written under this profile.
    pub fn header(self) -> Header {
        let long_size = match self {
            Self::Width32 => 4,
            Self::Width64 | Self::Unspecified => 8,
            #[cfg(target_pointer_width = "32")]
            Self::HostWidth => 4,
            #[cfg(not(target_pointer_width = "32"))]
            Self::HostWidth => 8,
        };
        Header {
            version: LIBRARY_VERSION,
            flags: Header::layout_flags(long_size),
        }
    }

    /// Width of container and string length fields.
    pub fn len_width(self) -> LenWidth {
        match self {
            Self::Width32 => LenWidth::U32,
            Self::Unspecified | Self::HostWidth | Self::Width64 => LenWidth::U64,
        }
    }

    /// Create an encoder writing under this profile.
    pub fn encoder<'a, W: Write + 'a>(self, w: W) -> Encoder<'a> {
        Encoder::with_arch(w, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_width() {
        assert_eq!(Arch::Width32.len_width(), LenWidth::U32);
        assert_eq!(Arch::Width64.len_width(), LenWidth::U64);
        assert_eq!(Arch::Unspecified.len_width(), LenWidth::U64);
        assert_eq!(Arch::HostWidth.len_width(), LenWidth::U64);
    }

    #[test]
    fn test_default_headers() {
        assert_eq!(
            Arch::Width64.header(),
            Header {
                version: 17,
                flags: 0x1_08_04_08_04
            }
        );
        assert_eq!(
            Arch::Width32.header(),
            Header {
                version: 17,
                flags: 0x1_08_04_04_04
            }
        );
        assert_eq!(Arch::Unspecified.header(), Arch::Width64.header());
        assert!(!Arch::HostWidth.header().is_zero());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Arch::HostWidth).expect("serialize");
        assert_eq!(json, "\"host\"");
        let arch: Arch = serde_json::from_str("\"width32\"").expect("deserialize");
        assert_eq!(arch, Arch::Width32);
    }
}

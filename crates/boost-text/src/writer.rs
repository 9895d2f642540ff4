// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive writer.
//!
//! Mirror image of [`crate::reader`]: every numeric token is followed by one
//! `' '`, every payload by its length token and a trailing `' '`. The first
//! sink error is latched and returned by every later call.

use crate::arch::{Arch, LenWidth};
use crate::dynamic::Complex;
use crate::error::{ArchiveError, Result};
use crate::header::{Header, MAGIC_SIGNATURE};
use crate::registry::{ClassInfo, TypeRegistry};
use std::fmt::Display;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Writes primitives to a text archive.
pub struct ArchiveWriter<'a> {
    w: Box<dyn Write + 'a>,
    arch: Arch,
    types: TypeRegistry,
    err: Option<ArchiveError>,
}

/// Generate a token write for a numeric type.
macro_rules! impl_write_token {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, v: $type) -> Result<()> {
            self.write_token(v)
        }
    };
}

impl<'a> ArchiveWriter<'a> {
    pub fn new<W: Write + 'a>(w: W) -> Self {
        Self::with_arch(w, Arch::default())
    }

    pub fn with_arch<W: Write + 'a>(w: W, arch: Arch) -> Self {
        Self {
            w: Box::new(w),
            arch,
            types: TypeRegistry::new(),
            err: None,
        }
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    /// Latched error, if any.
    pub fn err(&self) -> Option<&ArchiveError> {
        self.err.as_ref()
    }

    /// Class-info records emitted so far.
    pub fn registry(&self) -> &TypeRegistry {
        &self.types
    }

    fn check(&self) -> Result<()> {
        match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub(crate) fn latch<T>(&mut self, res: Result<T>) -> Result<T> {
        if let Err(err) = &res {
            if self.err.is_none() {
                debug!("archive writer: latched error: {}", err);
                self.err = Some(err.clone());
            }
        }
        res
    }

    /// Write the magic signature and the header fields.
    pub fn write_header(&mut self, header: &Header) -> Result<()> {
        self.write_string(MAGIC_SIGNATURE)?;
        self.write_u16(header.version)?;
        self.write_u64(header.flags)?;
        debug!(
            "archive writer: header version={} flags={:#x}",
            header.version, header.flags
        );
        Ok(())
    }

    /// Emit the class-info record for `info` unless one was already emitted
    /// for the same name.
    pub fn write_type_descr(&mut self, info: &ClassInfo) -> Result<()> {
        self.check()?;

        if self.types.contains(&info.name) {
            trace!("archive writer: type descriptor {} elided", info.name);
            return Ok(());
        }

        self.write_u8(info.tracking)?;
        self.write_u32(info.version)?;
        debug!(
            "archive writer: type descriptor {} version={} tracking={}",
            info.name, info.version, info.tracking
        );
        self.types.insert(info.clone());
        Ok(())
    }

    /// Container or string length, at the width of the active profile.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        match self.arch.len_width() {
            LenWidth::U64 => self.write_u64(len as u64),
            LenWidth::U32 => {
                self.check()?;
                let res = u32::try_from(len).map_err(|_| ArchiveError::LengthOverflow(len));
                let len = self.latch(res)?;
                self.write_u32(len)
            }
        }
    }

    /// Length-prefixed raw payload.
    pub fn write_bytes(&mut self, payload: &[u8]) -> Result<()> {
        self.write_len(payload.len())?;
        let res = self
            .w
            .write_all(payload)
            .and_then(|()| self.w.write_all(b" "))
            .map_err(ArchiveError::from);
        self.latch(res)
    }

    pub fn write_string(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_u8(u8::from(v))
    }

    impl_write_token!(write_u8, u8);
    impl_write_token!(write_u16, u16);
    impl_write_token!(write_u32, u32);
    impl_write_token!(write_u64, u64);
    impl_write_token!(write_i8, i8);
    impl_write_token!(write_i16, i16);
    impl_write_token!(write_i32, i32);
    impl_write_token!(write_i64, i64);
    impl_write_token!(write_f32, f32);
    impl_write_token!(write_f64, f64);

    /// Complex number as two `f32` tokens, real part first.
    pub fn write_c64(&mut self, v: Complex<f32>) -> Result<()> {
        self.write_f32(v.re)?;
        self.write_f32(v.im)
    }

    /// Complex number as two `f64` tokens, real part first.
    pub fn write_c128(&mut self, v: Complex<f64>) -> Result<()> {
        self.write_f64(v.re)?;
        self.write_f64(v.im)
    }

    fn write_token<T: Display>(&mut self, v: T) -> Result<()> {
        self.check()?;
        let token = format!("{} ", v);
        let res = self.w.write_all(token.as_bytes()).map_err(ArchiveError::from);
        self.latch(res)
    }

    pub(crate) fn flush_sink(&mut self) -> Result<()> {
        self.check()?;
        let res = self.w.flush().map_err(ArchiveError::from);
        self.latch(res)
    }
}

impl Write for ArchiveWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(err) = &self.err {
            return Err(io::Error::new(io::ErrorKind::Other, err.clone()));
        }
        match self.w.write(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(e),
            Err(e) => {
                self.err = Some(ArchiveError::Io {
                    kind: e.kind(),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = &self.err {
            return Err(io::Error::new(io::ErrorKind::Other, err.clone()));
        }
        match self.w.flush() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(e),
            Err(e) => {
                self.err = Some(ArchiveError::Io {
                    kind: e.kind(),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink failing every write.
    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn written(arch: Arch, f: impl FnOnce(&mut ArchiveWriter<'_>)) -> String {
        let mut buf = Vec::new();
        {
            let mut w = ArchiveWriter::with_arch(&mut buf, arch);
            f(&mut w);
            assert!(w.err().is_none());
        }
        String::from_utf8(buf).expect("utf-8")
    }

    #[test]
    fn test_write_numeric_tokens() {
        let out = written(Arch::Width64, |w| {
            w.write_bool(true).expect("bool");
            w.write_i8(-2).expect("i8");
            w.write_u64(u64::MAX).expect("u64");
            w.write_f32(2.5).expect("f32");
            w.write_f64(0.1).expect("f64");
        });
        assert_eq!(out, "1 -2 18446744073709551615 2.5 0.1 ");
    }

    #[test]
    fn test_write_strings() {
        let out = written(Arch::Width64, |w| {
            w.write_string("hello").expect("hello");
            w.write_string("").expect("empty");
        });
        assert_eq!(out, "5 hello 0  ");
    }

    #[test]
    fn test_write_header() {
        let out = written(Arch::Width64, |w| {
            w.write_header(&Arch::Width64.header()).expect("header");
        });
        assert_eq!(out, "22 serialization::archive 17 4429449220 ");
    }

    #[test]
    fn test_type_descr_elided() {
        let out = written(Arch::Width64, |w| {
            let info = ClassInfo::new("animal").with_version(2).with_tracking(1);
            w.write_type_descr(&info).expect("first");
            w.write_type_descr(&info).expect("second");
            assert_eq!(w.registry().len(), 1);
        });
        assert_eq!(out, "1 2 ");
    }

    #[test]
    fn test_error_is_sticky() {
        let mut w = ArchiveWriter::new(FailingSink);
        let first = w.write_u32(1).unwrap_err();
        assert!(matches!(
            first,
            ArchiveError::Io {
                kind: io::ErrorKind::BrokenPipe,
                ..
            }
        ));
        assert_eq!(w.write_string("x"), Err(first.clone()));
        assert_eq!(w.err(), Some(&first));
        assert!(w.write(b"raw").is_err());
        assert!(w.flush().is_err());
        assert_eq!(w.flush_sink(), Err(first));
    }
}

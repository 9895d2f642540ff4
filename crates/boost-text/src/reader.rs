// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive reader.
//!
//! Tokens are ASCII decimal numbers terminated by a single `' '`. Strings
//! and byte payloads are a length token followed by the raw bytes and one
//! more delimiter.
//!
//! The reader keeps the first error it hits. Once latched, every operation
//! returns that error again without touching the source, so a caller can
//! chain reads and inspect the outcome once at the end.

use crate::arch::{Arch, LenWidth};
use crate::dynamic::Complex;
use crate::error::{ArchiveError, Result};
use crate::header::{Header, MAGIC_SIGNATURE};
use crate::registry::{ClassInfo, TypeRegistry};
use std::io::{self, BufRead, BufReader, Read};
use std::str::FromStr;
use tracing::{debug, trace};

const DELIMITER: u8 = b' ';

/// Reads primitives from a text archive.
pub struct ArchiveReader<'a> {
    r: BufReader<Box<dyn Read + 'a>>,
    arch: Arch,
    types: TypeRegistry,
    err: Option<ArchiveError>,
}

/// Generate a narrowing read on top of a 64-bit token read.
///
/// Out-of-range tokens are truncated, not rejected.
macro_rules! impl_read_narrow {
    ($name:ident, $wide:ident, $type:ty) => {
        pub fn $name(&mut self) -> Result<$type> {
            self.$wide().map(|v| v as $type)
        }
    };
}

impl<'a> ArchiveReader<'a> {
    pub fn new<R: Read + 'a>(r: R) -> Self {
        Self::with_arch(r, Arch::default())
    }

    pub fn with_arch<R: Read + 'a>(r: R, arch: Arch) -> Self {
        Self {
            r: BufReader::new(Box::new(r)),
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

    /// Class-info records consumed so far.
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
                debug!("archive reader: latched error: {}", err);
                self.err = Some(err.clone());
            }
        }
        res
    }

    /// Latch `err` in place of whatever is latched.
    fn fail(&mut self, err: ArchiveError) -> ArchiveError {
        debug!("archive reader: latched error: {}", err);
        self.err = Some(err.clone());
        err
    }

    /// Read the magic signature and the header fields.
    ///
    /// Any failure up to and including the signature is reported as
    /// [`ArchiveError::NotBoost`]; a failure in the fields that follow is
    /// reported as [`ArchiveError::InvalidHeader`].
    pub fn read_header(&mut self) -> Result<Header> {
        self.check()?;

        match self.read_bytes() {
            Ok(magic) if magic == MAGIC_SIGNATURE.as_bytes() => {}
            _ => return Err(self.fail(ArchiveError::NotBoost)),
        }

        let fields = self
            .read_u16()
            .and_then(|version| Ok(Header::new(version, self.read_u64()?)));
        match fields {
            Ok(header) => {
                debug!(
                    "archive reader: header version={} flags={:#x}",
                    header.version, header.flags
                );
                Ok(header)
            }
            Err(_) => Err(self.fail(ArchiveError::InvalidHeader)),
        }
    }

    /// Class-info record for `name`.
    ///
    /// The first call for a name consumes the record from the stream; later
    /// calls are answered from the registry and consume nothing.
    pub fn read_type_descr(&mut self, name: &str) -> Result<ClassInfo> {
        self.check()?;

        if let Some(info) = self.types.get(name) {
            trace!("archive reader: cached type descriptor for {}", name);
            return Ok(info.clone());
        }

        let record = self
            .read_u8()
            .and_then(|tracking| Ok((tracking, self.read_u32()?)));
        match record {
            Ok((tracking, version)) => {
                debug!(
                    "archive reader: type descriptor {} version={} tracking={}",
                    name, version, tracking
                );
                let info = ClassInfo::new(name)
                    .with_version(version)
                    .with_tracking(tracking);
                Ok(self.types.insert(info).clone())
            }
            Err(_) => Err(self.fail(ArchiveError::InvalidTypeDescr)),
        }
    }

    /// Container or string length, at the width of the active profile.
    ///
    /// Every profile but [`Arch::Width32`] parses a 64-bit token, which
    /// accepts archives written under either width.
    pub fn read_len(&mut self) -> Result<u64> {
        match self.arch.len_width() {
            LenWidth::U64 => self.read_u64(),
            LenWidth::U32 => self.read_u32().map(u64::from),
        }
    }

    /// Length-prefixed raw payload.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_len()?;
        let res = self.read_payload(len);
        self.latch(res)
    }

    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        let res = String::from_utf8(bytes).map_err(|_| ArchiveError::InvalidUtf8);
        self.latch(res)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|v| v != 0)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_parsed()
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_parsed()
    }

    impl_read_narrow!(read_u8, read_u64, u8);
    impl_read_narrow!(read_u16, read_u64, u16);
    impl_read_narrow!(read_u32, read_u64, u32);
    impl_read_narrow!(read_i8, read_i64, i8);
    impl_read_narrow!(read_i16, read_i64, i16);
    impl_read_narrow!(read_i32, read_i64, i32);

    /// Parsed as `f64`, then narrowed.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_f64().map(|v| v as f32)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_parsed()
    }

    /// Complex number as two `f32` tokens, real part first.
    pub fn read_c64(&mut self) -> Result<Complex<f32>> {
        let re = self.read_f32()?;
        let im = self.read_f32()?;
        Ok(Complex::new(re, im))
    }

    /// Complex number as two `f64` tokens, real part first.
    pub fn read_c128(&mut self) -> Result<Complex<f64>> {
        let re = self.read_f64()?;
        let im = self.read_f64()?;
        Ok(Complex::new(re, im))
    }

    fn read_parsed<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        ArchiveError: From<T::Err>,
    {
        self.check()?;
        let res = self
            .read_token()
            .and_then(|token| token.parse::<T>().map_err(ArchiveError::from));
        self.latch(res)
    }

    /// Bytes up to the next delimiter, delimiter consumed.
    fn read_token(&mut self) -> Result<String> {
        let mut token = Vec::new();
        self.r.read_until(DELIMITER, &mut token)?;
        if token.pop() != Some(DELIMITER) {
            return Err(ArchiveError::UnexpectedEof);
        }
        Ok(String::from_utf8_lossy(&token).into_owned())
    }

    fn read_payload(&mut self, len: u64) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        (&mut self.r).take(len).read_to_end(&mut payload)?;
        if (payload.len() as u64) < len {
            return Err(ArchiveError::UnexpectedEof);
        }
        self.skip_delimiter()?;
        Ok(payload)
    }

    /// Consume the delimiter after a payload. End of stream is accepted.
    fn skip_delimiter(&mut self) -> Result<()> {
        let next = self.r.fill_buf()?.first().copied();
        match next {
            None => Ok(()),
            Some(byte) => {
                self.r.consume(1);
                if byte == DELIMITER {
                    Ok(())
                } else {
                    Err(ArchiveError::NotADelimiter(byte))
                }
            }
        }
    }
}

impl Read for ArchiveReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(err) = &self.err {
            return Err(io::Error::new(io::ErrorKind::Other, err.clone()));
        }
        match self.r.read(buf) {
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
}

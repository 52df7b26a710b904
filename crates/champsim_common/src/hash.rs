//! Build identifiers derived from canonically serialized configurations.

use serde::{Serialize, Serializer};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake128;
use std::fmt;
use std::io;

/// Number of digest bytes kept from the SHAKE-128 output.
pub const BUILD_ID_BYTES: usize = 4;

/// Errors raised while turning a value into its canonical byte form.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// The value cannot be represented as JSON (e.g. a map with non-string keys).
    #[error("failed to serialize value for hashing: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

/// A short fingerprint of a build configuration.
///
/// Computed as the first four bytes of SHAKE-128 over the canonical JSON of
/// the configuration and rendered as eight lowercase hex characters. Used as a
/// path segment so that several build variants share one object directory.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildId([u8; BUILD_ID_BYTES]);

impl BuildId {
    /// Hashes raw bytes with SHAKE-128, keeping [`BUILD_ID_BYTES`] of output.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Shake128::default();
        hasher.update(data);
        let mut out = [0u8; BUILD_ID_BYTES];
        hasher.finalize_xof().read(&mut out);
        Self(out)
    }

    /// Hashes the canonical serialization of `value`.
    ///
    /// See [`canonical_json`] for the byte format.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self, HashError> {
        Ok(Self::from_bytes(&canonical_json(value)?))
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; BUILD_ID_BYTES] {
        &self.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuildId({self})")
    }
}

impl Serialize for BuildId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Serializes `value` to canonical JSON bytes.
///
/// The value is first converted to a [`serde_json::Value`], whose object map is
/// key-sorted, so struct fields and map entries always come out in the same
/// order regardless of how they were inserted. The text layout matches
/// Python's `json.dumps` defaults (`", "` and `": "` separators, non-ASCII
/// escaped as `\uXXXX`), which keeps identifiers stable against the
/// configure script for configurations whose keys were already sorted.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    let value = serde_json::to_value(value).map_err(|e| HashError::Serialization {
        reason: e.to_string(),
    })?;
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    value
        .serialize(&mut ser)
        .map_err(|e| HashError::Serialization {
            reason: e.to_string(),
        })?;
    Ok(buf)
}

/// Compact JSON with a space after separators and ASCII-only output.
struct SpacedAsciiFormatter;

impl serde_json::ser::Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

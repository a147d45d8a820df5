//! Object codec: canonical `"<kind> <len>\0<body>"` encoding

use super::cursor::ByteCursor;
use super::Hash;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Type tag for objects
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Opaque file contents
    Blob,
    /// A directory listing
    Tree,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            other => Err(Error::StorageCorruption(format!(
                "Unknown object kind: {}",
                other
            ))),
        }
    }
}

/// Produce the canonical encoding of an object body
pub fn encode(kind: ObjectKind, body: &[u8]) -> Vec<u8> {
    let header = format!("{} {}\0", kind, body.len());
    let mut out = Vec::with_capacity(header.len() + body.len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(body);
    out
}

/// An object held in memory: its kind plus the uncompressed body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    pub kind: ObjectKind,
    pub data: Vec<u8>,
}

impl Object {
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        Object { kind, data }
    }

    pub fn blob(data: impl Into<Vec<u8>>) -> Self {
        Object::new(ObjectKind::Blob, data.into())
    }

    /// Canonical bytes: header followed by body
    pub fn encode(&self) -> Vec<u8> {
        encode(self.kind, &self.data)
    }

    /// Compute the content hash over the canonical encoding
    pub fn hash(&self) -> Hash {
        let header = format!("{} {}\0", self.kind, self.data.len());
        Hash::digest_many(&[header.as_bytes(), &self.data])
    }

    /// Split canonical bytes back into kind and body.
    ///
    /// The header's declared length must match the body exactly.
    pub fn decode(encoded: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(encoded);
        let header = cursor
            .read_until(0)
            .ok_or_else(|| Error::StorageCorruption("Missing object header terminator".into()))?;
        let header = std::str::from_utf8(header)
            .map_err(|_| Error::StorageCorruption("Object header is not ASCII".into()))?;

        let (kind, len) = header
            .split_once(' ')
            .ok_or_else(|| Error::StorageCorruption(format!("Invalid object header: {}", header)))?;
        let kind: ObjectKind = kind.parse()?;
        let len: usize = len
            .parse()
            .map_err(|_| Error::StorageCorruption(format!("Invalid object length: {}", len)))?;

        let body = cursor.remaining();
        if body.len() != len {
            return Err(Error::MalformedObject(format!(
                "Header declares {} bytes, body has {}",
                len,
                body.len()
            )));
        }

        Ok(Object {
            kind,
            data: body.to_vec(),
        })
    }

    /// Get the size of the body
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

//! Loose-object store on the local filesystem
//!
//! Layout:
//! ```text
//! {objects_dir}/
//! ├── bd/
//! │   └── 9dbf5aae1a3862dd1526723246b20206e5fc37   # zlib(canonical encoding)
//! └── 4b/
//!     └── 825dc642cb6eb9a060e54bf8d69288fbee4904
//! ```
//!
//! Objects are immutable once written. A write goes to a temporary file in
//! the fan-out directory and is renamed into place, so readers never observe
//! a partially written object.

use crate::model::{Hash, Object, ObjectKind, Tree};
use crate::store::compress::{self, DEFAULT_LEVEL};
use crate::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A content-addressed object store backed by a directory of zlib files
#[derive(Debug, Clone)]
pub struct ObjectStore {
    /// The `objects` directory
    objects_dir: PathBuf,
    /// zlib level used for new objects
    compression_level: u32,
}

impl ObjectStore {
    /// Open a store rooted at an existing `objects` directory
    pub fn open(objects_dir: impl Into<PathBuf>) -> Self {
        Self::with_compression(objects_dir, DEFAULT_LEVEL)
    }

    /// Open a store that writes with the given zlib level
    pub fn with_compression(objects_dir: impl Into<PathBuf>, compression_level: u32) -> Self {
        ObjectStore {
            objects_dir: objects_dir.into(),
            compression_level,
        }
    }

    /// Get the objects directory
    pub fn path(&self) -> &Path {
        &self.objects_dir
    }

    /// Get the path where an object is (or would be) stored
    pub fn object_path(&self, hash: &Hash) -> PathBuf {
        self.objects_dir.join(hash.prefix()).join(hash.remainder())
    }

    /// Check if a hash exists
    pub fn exists(&self, hash: &Hash) -> bool {
        self.object_path(hash).is_file()
    }

    /// Encode, compress and persist a body of the given kind, returning its hash
    pub fn write(&self, kind: ObjectKind, body: &[u8]) -> Result<Hash> {
        let encoded = crate::model::encode(kind, body);
        self.write_encoded(&encoded)
    }

    /// Store an in-memory object, returning its hash
    pub fn put(&self, object: &Object) -> Result<Hash> {
        self.write(object.kind, &object.data)
    }

    /// Persist a tree, returning its hash
    pub fn put_tree(&self, tree: &Tree) -> Result<Hash> {
        self.write(ObjectKind::Tree, &tree.encode())
    }

    fn write_encoded(&self, encoded: &[u8]) -> Result<Hash> {
        let hash = Hash::digest(encoded);
        let path = self.object_path(&hash);

        // Identical key means identical content
        if path.is_file() {
            tracing::debug!(%hash, "object already present");
            return Ok(hash);
        }

        let compressed = compress::compress(encoded, self.compression_level)?;

        let fan_out = self.objects_dir.join(hash.prefix());
        fs::create_dir_all(&fan_out)?;

        let mut tmp = NamedTempFile::new_in(&fan_out)?;
        tmp.write_all(&compressed)?;
        tmp.as_file().sync_all()?;
        make_read_only(tmp.as_file())?;

        if let Err(err) = tmp.persist(&path) {
            // Another writer may have renamed the same object into place first
            if !path.is_file() {
                return Err(err.error.into());
            }
        }

        tracing::debug!(%hash, size = encoded.len(), stored = compressed.len(), "wrote object");
        Ok(hash)
    }

    /// Read and decompress an object, returning its canonical bytes
    pub fn read_raw(&self, hash: &Hash) -> Result<Vec<u8>> {
        let path = self.object_path(hash);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound(hash.to_hex()))
            }
            Err(e) => return Err(e.into()),
        };
        compress::decompress(&compressed)
    }

    /// Retrieve an object by hash
    pub fn read(&self, hash: &Hash) -> Result<Object> {
        Object::decode(&self.read_raw(hash)?)
    }

    /// Retrieve a blob's contents by hash
    pub fn read_blob(&self, hash: &Hash) -> Result<Vec<u8>> {
        let object = self.read(hash)?;
        expect_kind(&object, ObjectKind::Blob)?;
        Ok(object.data)
    }

    /// Retrieve and decode a tree by hash
    pub fn read_tree(&self, hash: &Hash) -> Result<Tree> {
        let object = self.read(hash)?;
        expect_kind(&object, ObjectKind::Tree)?;
        Tree::decode(&object.data)
    }
}

/// Loose objects are immutable, so they are stored read-only like git's
#[cfg(unix)]
fn make_read_only(file: &fs::File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o444))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_read_only(_file: &fs::File) -> Result<()> {
    Ok(())
}

fn expect_kind(object: &Object, expected: ObjectKind) -> Result<()> {
    if object.kind != expected {
        return Err(Error::ObjectTypeMismatch {
            expected: expected.as_str(),
            found: object.kind.as_str(),
        });
    }
    Ok(())
}

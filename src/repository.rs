//! High-level Repository API
//!
//! This module provides the main entry point for interacting with twig:
//! a repository root directory plus its metadata directory holding the
//! object store.

use crate::config::Config;
use crate::model::{Hash, Object, ObjectKind, TreeEntry};
use crate::store::ObjectStore;
use crate::tree::{TreeBuilder, TreeItem, TreeReader};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A repository rooted at a working directory
///
/// Provides a convenient API for:
/// - Hashing and storing file contents as blobs
/// - Reading objects back by hash
/// - Snapshotting the working directory as trees
/// - Listing stored trees
#[derive(Debug)]
pub struct Repository {
    /// Working directory root
    root: PathBuf,
    /// `<root>/<metadata_dir>`
    git_dir: PathBuf,
    store: ObjectStore,
    config: Config,
}

impl Repository {
    /// Create the metadata layout under `root` and open it.
    ///
    /// Re-initialising an existing repository keeps its objects and HEAD.
    pub fn init(root: impl AsRef<Path>, config: Config) -> Result<Self> {
        config.validate()?;
        let root = root.as_ref();
        let git_dir = root.join(&config.metadata_dir);

        fs::create_dir_all(git_dir.join("objects"))?;
        fs::create_dir_all(git_dir.join("refs").join("heads"))?;
        fs::create_dir_all(git_dir.join("refs").join("tags"))?;

        let head = git_dir.join("HEAD");
        if !head.exists() {
            fs::write(&head, format!("ref: refs/heads/{}\n", config.default_branch))?;
        }

        tracing::debug!(git_dir = %git_dir.display(), "initialized repository");
        Self::open(root, config)
    }

    /// Open an existing repository
    pub fn open(root: impl AsRef<Path>, config: Config) -> Result<Self> {
        config.validate()?;
        let root = root.as_ref().to_path_buf();
        let git_dir = root.join(&config.metadata_dir);
        let objects = git_dir.join("objects");
        if !objects.is_dir() {
            return Err(Error::NotARepository(root));
        }

        Ok(Repository {
            store: ObjectStore::with_compression(objects, config.compression_level),
            root,
            git_dir,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // === Blob Operations ===

    /// Compute a file's blob hash, storing the blob when `write` is set
    pub fn hash_file(&self, path: impl AsRef<Path>, write: bool) -> Result<Hash> {
        let contents = read_input(path.as_ref())?;
        if write {
            self.store.write(ObjectKind::Blob, &contents)
        } else {
            Ok(Object::blob(contents).hash())
        }
    }

    /// Store a file as a blob
    pub fn store_blob(&self, path: impl AsRef<Path>) -> Result<Hash> {
        self.hash_file(path, true)
    }

    /// Read any object by hex hash
    pub fn read_object(&self, hex: &str) -> Result<Object> {
        self.store.read(&Hash::from_hex(hex)?)
    }

    /// Read a blob's contents by hex hash
    pub fn read_blob(&self, hex: &str) -> Result<Vec<u8>> {
        self.store.read_blob(&Hash::from_hex(hex)?)
    }

    // === Tree Operations ===

    /// List a tree's entries, or only their names
    pub fn list_tree(&self, hex: &str, name_only: bool) -> Result<Vec<TreeItem>> {
        let hash = Hash::from_hex(hex)?;
        Ok(TreeReader::new(&self.store).list(&hash, name_only)?.collect())
    }

    /// List every file beneath a tree with its full path
    pub fn list_tree_recursive(&self, hex: &str) -> Result<Vec<(String, TreeEntry)>> {
        let hash = Hash::from_hex(hex)?;
        TreeReader::new(&self.store).list_recursive(&hash)
    }

    /// Snapshot the repository root
    pub fn write_tree(&self) -> Result<Hash> {
        self.write_tree_at(&self.root)
    }

    /// Snapshot an arbitrary directory into this repository's store
    pub fn write_tree_at(&self, dir: impl AsRef<Path>) -> Result<Hash> {
        TreeBuilder::new(&self.store, self.config.metadata_dir.as_str()).build(dir.as_ref())
    }
}

/// Compute a file's blob hash without a repository
pub fn hash_file(path: impl AsRef<Path>) -> Result<Hash> {
    Ok(Object::blob(read_input(path.as_ref())?).hash())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}

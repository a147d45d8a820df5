//! Content-addressed object store
//!
//! This module implements the storage layer: objects are stored as loose
//! files keyed by their SHA-1 hash and compressed with zlib.

pub mod compress;
mod file_store;

pub use file_store::ObjectStore;

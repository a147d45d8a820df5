//! # twig
//!
//! A minimal content-addressed object store with git-compatible objects.
//!
//! twig persists immutable content keyed by the SHA-1 digest of its
//! canonical encoding and reconstructs it on demand. Objects written by twig
//! are byte-for-byte readable by git, and vice versa for blobs and trees.
//!
//! ## Core Concepts
//!
//! - **Blobs**: Opaque file contents
//! - **Trees**: Sorted `(mode, name, hash)` listings of a directory
//! - **Hashes**: SHA-1 over `"<kind> <len>\0<body>"`
//! - **Loose objects**: zlib files under `objects/<2 hex>/<38 hex>`
//!
//! ## Example
//!
//! ```no_run
//! use twig::{Config, Repository};
//!
//! let repo = Repository::init(".", Config::default())?;
//! let blob = repo.store_blob("README.md")?;
//! let tree = repo.write_tree()?;
//! println!("{} {}", blob, tree);
//! # Ok::<(), twig::Error>(())
//! ```

pub mod config;
pub mod model;
pub mod store;
pub mod tree;

mod error;
mod repository;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{EntryMode, Hash, Object, ObjectKind, Tree, TreeEntry};
pub use repository::{hash_file, Repository};
pub use store::ObjectStore;
pub use tree::{TreeBuilder, TreeItem, TreeReader};

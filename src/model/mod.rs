//! Core data model types for twig

mod cursor;
mod hash;
mod object;
mod tree;

pub use cursor::ByteCursor;
pub use hash::{Hash, HASH_LEN};
pub use object::{encode, Object, ObjectKind};
pub use tree::{EntryMode, Tree, TreeEntry};

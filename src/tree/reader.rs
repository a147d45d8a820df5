//! Read stored trees back as entry listings

use crate::model::{Hash, TreeEntry};
use crate::store::ObjectStore;
use crate::Result;
use serde::Serialize;

/// One item produced by a listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TreeItem {
    /// The full `(mode, name, hash)` record
    Entry(TreeEntry),
    /// Just the name
    Name(String),
}

impl TreeItem {
    pub fn name(&self) -> &str {
        match self {
            TreeItem::Entry(entry) => &entry.name,
            TreeItem::Name(name) => name,
        }
    }
}

/// Reads tree objects out of a store
pub struct TreeReader<'a> {
    store: &'a ObjectStore,
}

impl<'a> TreeReader<'a> {
    pub fn new(store: &'a ObjectStore) -> Self {
        TreeReader { store }
    }

    /// List a tree's immediate entries in stored order.
    ///
    /// Fails with `ObjectTypeMismatch` if `hash` is not a tree.
    pub fn list(&self, hash: &Hash, name_only: bool) -> Result<impl Iterator<Item = TreeItem>> {
        let entries = self.store.read_tree(hash)?.into_entries();
        Ok(entries.into_iter().map(move |entry| {
            if name_only {
                TreeItem::Name(entry.name)
            } else {
                TreeItem::Entry(entry)
            }
        }))
    }

    /// List every non-tree entry beneath `hash` with its slash-joined path,
    /// descending into sub-trees depth-first in stored order.
    pub fn list_recursive(&self, hash: &Hash) -> Result<Vec<(String, TreeEntry)>> {
        let mut out = Vec::new();
        self.collect(hash, "", &mut out)?;
        Ok(out)
    }

    fn collect(&self, hash: &Hash, prefix: &str, out: &mut Vec<(String, TreeEntry)>) -> Result<()> {
        for entry in self.store.read_tree(hash)?.into_entries() {
            let path = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{}/{}", prefix, entry.name)
            };

            if entry.mode.is_tree() {
                self.collect(&entry.hash, &path, out)?;
            } else {
                out.push((path, entry));
            }
        }
        Ok(())
    }
}

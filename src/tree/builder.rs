//! Snapshot a directory into tree objects

use crate::model::{EntryMode, Hash, ObjectKind, Tree, TreeEntry};
use crate::store::ObjectStore;
use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Walks a directory and writes a blob per file and a tree per directory.
///
/// Symlinks are never followed, so the walk terminates on any filesystem.
/// Symlinks and special files are skipped.
pub struct TreeBuilder<'a> {
    store: &'a ObjectStore,
    /// Child name excluded at every level (the repository metadata directory)
    ignore: String,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(store: &'a ObjectStore, ignore: impl Into<String>) -> Self {
        TreeBuilder {
            store,
            ignore: ignore.into(),
        }
    }

    /// Write the tree for `root` and everything beneath it
    pub fn build(&self, root: &Path) -> Result<Hash> {
        let meta = match fs::metadata(root) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::InputNotFound(root.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        if !meta.is_dir() {
            return Err(Error::InputNotFound(root.to_path_buf()));
        }

        self.build_dir(root)
    }

    fn build_dir(&self, dir: &Path) -> Result<Hash> {
        tracing::debug!(dir = %dir.display(), "building tree");

        let mut entries = Vec::new();
        for child in fs::read_dir(dir)? {
            let child = child?;
            let path = child.path();
            let name = child
                .file_name()
                .into_string()
                .map_err(|_| Error::UnsupportedPath(path.clone()))?;

            if name == self.ignore {
                continue;
            }

            let file_type = fs::symlink_metadata(&path)?.file_type();
            let (mode, hash) = if file_type.is_file() {
                let contents = fs::read(&path)?;
                (EntryMode::File, self.store.write(ObjectKind::Blob, &contents)?)
            } else if file_type.is_dir() {
                (EntryMode::Directory, self.build_dir(&path)?)
            } else {
                tracing::warn!(path = %path.display(), "skipping entry that is neither file nor directory");
                continue;
            };

            let entry = TreeEntry::new(mode, name, hash)
                .map_err(|_| Error::UnsupportedPath(path.clone()))?;
            entries.push(entry);
        }

        // Sorting happens here, not in read_dir order
        let tree = Tree::new(entries);
        let hash = self.store.put_tree(&tree)?;
        tracing::debug!(dir = %dir.display(), %hash, entries = tree.len(), "wrote tree");
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempdir().unwrap();
        let store = ObjectStore::open(dir.path().join(".git").join("objects"));
        (dir, store)
    }

    #[test]
    fn test_empty_directory() {
        let (dir, store) = setup();
        let work = dir.path().join("empty");
        fs::create_dir(&work).unwrap();

        let hash = TreeBuilder::new(&store, ".git").build(&work).unwrap();
        assert_eq!(hash.to_hex(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
        assert!(store.read_tree(&hash).unwrap().is_empty());
    }

    #[test]
    fn test_excludes_metadata_directory() {
        let (dir, store) = setup();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let hash = TreeBuilder::new(&store, ".git").build(dir.path()).unwrap();
        let tree = store.read_tree(&hash).unwrap();
        let names: Vec<_> = tree.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt"]);
    }

    #[test]
    fn test_children_sorted() {
        let (dir, store) = setup();
        let work = dir.path().join("work");
        fs::create_dir_all(work.join("c")).unwrap();
        fs::write(work.join("b.txt"), "b").unwrap();
        fs::write(work.join("a.txt"), "a").unwrap();
        fs::write(work.join("c").join("inner"), "i").unwrap();

        let hash = TreeBuilder::new(&store, ".git").build(&work).unwrap();
        let tree = store.read_tree(&hash).unwrap();
        let listing: Vec<_> = tree
            .entries()
            .iter()
            .map(|e| (e.mode, e.name.as_str()))
            .collect();
        assert_eq!(
            listing,
            vec![
                (EntryMode::File, "a.txt"),
                (EntryMode::File, "b.txt"),
                (EntryMode::Directory, "c"),
            ]
        );
    }

    #[test]
    fn test_matches_git_tree_hash() {
        let (dir, store) = setup();
        let work = dir.path().join("work");
        fs::create_dir_all(work.join("sub")).unwrap();
        fs::write(work.join("hello.txt"), "hello\n").unwrap();
        fs::write(work.join("sub").join("x"), "x\n").unwrap();

        let hash = TreeBuilder::new(&store, ".git").build(&work).unwrap();
        assert_eq!(hash.to_hex(), "1a643be6d83409ed51cd1b27e18162b46b2b961d");
    }

    #[test]
    fn test_missing_root() {
        let (dir, store) = setup();
        let err = TreeBuilder::new(&store, ".git")
            .build(&dir.path().join("nope"))
            .unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }

    #[test]
    fn test_root_must_be_directory() {
        let (dir, store) = setup();
        let file = dir.path().join("file");
        fs::write(&file, "data").unwrap();

        let err = TreeBuilder::new(&store, ".git").build(&file).unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let (dir, store) = setup();
        let work = dir.path().join("work");
        fs::create_dir(&work).unwrap();
        fs::write(work.join("real.txt"), "real").unwrap();
        std::os::unix::fs::symlink(&work, work.join("loop")).unwrap();
        std::os::unix::fs::symlink(work.join("real.txt"), work.join("link.txt")).unwrap();

        let hash = TreeBuilder::new(&store, ".git").build(&work).unwrap();
        let tree = store.read_tree(&hash).unwrap();
        let names: Vec<_> = tree.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["real.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_unsupported() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (dir, store) = setup();
        let work = dir.path().join("work");
        fs::create_dir(&work).unwrap();
        let bad = work.join(OsStr::from_bytes(b"bad\xff"));
        if fs::write(&bad, "x").is_err() {
            // Some filesystems refuse non-UTF-8 names outright
            return;
        }

        let err = TreeBuilder::new(&store, ".git").build(&work).unwrap_err();
        match err {
            Error::UnsupportedPath(path) => assert_eq!(path, bad),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_sockets_are_skipped() {
        use std::os::unix::net::UnixListener;

        let (dir, store) = setup();
        let work = dir.path().join("work");
        fs::create_dir(&work).unwrap();
        let _listener = UnixListener::bind(work.join("sock")).unwrap();

        let hash = TreeBuilder::new(&store, ".git").build(&work).unwrap();
        assert_eq!(hash.to_hex(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");

        fs::write(work.join("kept.txt"), "kept").unwrap();
        let hash = TreeBuilder::new(&store, ".git").build(&work).unwrap();
        let tree = store.read_tree(&hash).unwrap();
        let names: Vec<_> = tree.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["kept.txt"]);
    }
}

//! Tree objects: ordered `(mode, name, hash)` entries

use super::cursor::ByteCursor;
use super::hash::HASH_LEN;
use super::Hash;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// File mode recorded for a tree entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum EntryMode {
    /// Regular file (100644)
    File,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Sub-tree (40000)
    Directory,
    /// Gitlink to another repository (160000)
    Submodule,
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::File => "100644",
            EntryMode::Executable => "100755",
            EntryMode::Symlink => "120000",
            EntryMode::Directory => "40000",
            EntryMode::Submodule => "160000",
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    /// The object kind this mode points at, as git prints it
    pub fn object_type(&self) -> &'static str {
        match self {
            EntryMode::Directory => "tree",
            EntryMode::Submodule => "commit",
            _ => "blob",
        }
    }
}

impl From<EntryMode> for &'static str {
    fn from(mode: EntryMode) -> Self {
        mode.as_str()
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "100644" => Ok(EntryMode::File),
            "100755" => Ok(EntryMode::Executable),
            "120000" => Ok(EntryMode::Symlink),
            "40000" | "040000" => Ok(EntryMode::Directory),
            "160000" => Ok(EntryMode::Submodule),
            other => Err(Error::MalformedObject(format!("Unknown entry mode: {}", other))),
        }
    }
}

/// One record in a tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub name: String,
    pub hash: Hash,
}

impl TreeEntry {
    /// Create an entry, rejecting names that cannot appear in a tree
    pub fn new(mode: EntryMode, name: impl Into<String>, hash: Hash) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(TreeEntry { mode, name, hash })
    }

    /// Append `"<mode> <name>\0<20 raw bytes>"` to `buf`
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.mode.as_str().as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(self.name.as_bytes());
        buf.push(0);
        buf.extend_from_slice(self.hash.as_bytes());
    }
}

impl fmt::Display for TreeEntry {
    /// Formats like `git ls-tree`: `<mode> <type> <hash>\t<name>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0>6} {} {}\t{}",
            self.mode.as_str(),
            self.mode.object_type(),
            self.hash,
            self.name
        )
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::MalformedObject(format!(
            "Invalid entry name: {:?}",
            name
        )));
    }
    if name.bytes().any(|b| b == 0 || b == b'/') {
        return Err(Error::MalformedObject(format!(
            "Entry name contains a forbidden byte: {:?}",
            name
        )));
    }
    Ok(())
}

/// A directory snapshot: entries kept sorted by name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree, sorting entries by the bytes of their names
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        Tree { entries }
    }

    /// Serialize all entries, in order, into a tree body
    pub fn encode(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for entry in &self.entries {
            entry.encode_into(&mut body);
        }
        body
    }

    /// Scan a tree body into entries.
    ///
    /// Entries are returned in stored order; ordering is not re-checked.
    pub fn decode(body: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(body);
        let mut entries = Vec::new();

        while !cursor.is_empty() {
            let offset = cursor.position();
            let token = cursor.read_until(0).ok_or_else(|| {
                Error::MalformedObject(format!("Unterminated entry at byte {}", offset))
            })?;
            let token = std::str::from_utf8(token).map_err(|_| {
                Error::MalformedObject(format!("Entry at byte {} is not UTF-8", offset))
            })?;
            let (mode, name) = token.split_once(' ').ok_or_else(|| {
                Error::MalformedObject(format!("Entry at byte {} has no mode separator", offset))
            })?;
            let mode: EntryMode = mode.parse()?;

            let raw = cursor.read_exact(HASH_LEN).ok_or_else(|| {
                Error::MalformedObject(format!("Truncated digest for entry {:?}", name))
            })?;
            let hash = Hash::from_slice(raw).ok_or_else(|| {
                Error::MalformedObject(format!("Truncated digest for entry {:?}", name))
            })?;

            tracing::trace!(%mode, entry = name, %hash, "decoded tree entry");
            entries.push(TreeEntry {
                mode,
                name: name.to_string(),
                hash,
            });
        }

        Ok(Tree { entries })
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TreeEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(mode: EntryMode, name: &str, content: &[u8]) -> TreeEntry {
        TreeEntry::new(mode, name, Hash::digest(content)).unwrap()
    }

    #[test]
    fn test_entries_sorted_by_name() {
        let tree = Tree::new(vec![
            entry(EntryMode::File, "b.txt", b"b"),
            entry(EntryMode::Directory, "c", b"c"),
            entry(EntryMode::File, "a.txt", b"a"),
        ]);
        let names: Vec<_> = tree.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
    }

    #[test]
    fn test_sorting_is_bytewise() {
        let tree = Tree::new(vec![
            entry(EntryMode::File, "a", b"1"),
            entry(EntryMode::File, "B", b"2"),
            entry(EntryMode::File, "_", b"3"),
        ]);
        let names: Vec<_> = tree.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "_", "a"]);
    }

    #[test]
    fn test_entry_wire_format() {
        let hash = Hash::from_bytes([0xab; 20]);
        let e = TreeEntry::new(EntryMode::Directory, "src", hash).unwrap();
        let mut buf = Vec::new();
        e.encode_into(&mut buf);

        let mut expected = b"40000 src\0".to_vec();
        expected.extend_from_slice(&[0xab; 20]);
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_decode_preserves_order_and_fields() {
        let tree = Tree::new(vec![
            entry(EntryMode::File, "hello world.txt", b"x"),
            entry(EntryMode::Executable, "run.sh", b"y"),
            entry(EntryMode::Directory, "sub", b"z"),
        ]);
        let decoded = Tree::decode(&tree.encode()).unwrap();
        assert_eq!(decoded, tree);
    }

    #[test]
    fn test_decode_does_not_resort() {
        let mut body = Vec::new();
        entry(EntryMode::File, "z", b"1").encode_into(&mut body);
        entry(EntryMode::File, "a", b"2").encode_into(&mut body);

        let decoded = Tree::decode(&body).unwrap();
        assert_eq!(decoded.entries()[0].name, "z");
        assert_eq!(decoded.entries()[1].name, "a");
    }

    #[test]
    fn test_decode_empty_body() {
        let tree = Tree::decode(b"").unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_decode_accepts_zero_padded_directory_mode() {
        let mut body = b"040000 dir\0".to_vec();
        body.extend_from_slice(&[7u8; 20]);
        let tree = Tree::decode(&body).unwrap();
        assert_eq!(tree.entries()[0].mode, EntryMode::Directory);
    }

    #[test]
    fn test_decode_truncated_digest() {
        let mut body = b"100644 file\0".to_vec();
        body.extend_from_slice(&[1u8; 12]);
        let err = Tree::decode(&body).unwrap_err();
        assert!(matches!(err, Error::MalformedObject(_)));
    }

    #[test]
    fn test_decode_missing_separator() {
        let mut body = b"100644file\0".to_vec();
        body.extend_from_slice(&[1u8; 20]);
        let err = Tree::decode(&body).unwrap_err();
        assert!(matches!(err, Error::MalformedObject(_)));
    }

    #[test]
    fn test_decode_unterminated_token() {
        let err = Tree::decode(b"100644 file").unwrap_err();
        assert!(matches!(err, Error::MalformedObject(_)));
    }

    #[test]
    fn test_decode_unknown_mode() {
        let mut body = b"777 file\0".to_vec();
        body.extend_from_slice(&[1u8; 20]);
        let err = Tree::decode(&body).unwrap_err();
        assert!(matches!(err, Error::MalformedObject(_)));
    }

    #[test]
    fn test_entry_name_validation() {
        let h = Hash::digest(b"x");
        assert!(TreeEntry::new(EntryMode::File, "", h).is_err());
        assert!(TreeEntry::new(EntryMode::File, "..", h).is_err());
        assert!(TreeEntry::new(EntryMode::File, "a/b", h).is_err());
        assert!(TreeEntry::new(EntryMode::File, "a\0b", h).is_err());
        assert!(TreeEntry::new(EntryMode::File, ".hidden", h).is_ok());
    }

    #[test]
    fn test_display_like_ls_tree() {
        let h = Hash::from_bytes([0u8; 20]);
        let dir = TreeEntry::new(EntryMode::Directory, "src", h).unwrap();
        assert_eq!(
            dir.to_string(),
            format!("040000 tree {}\tsrc", "0".repeat(40))
        );
        let file = TreeEntry::new(EntryMode::File, "a.txt", h).unwrap();
        assert!(file.to_string().starts_with("100644 blob "));
    }
}

//! Forward-only reader over a byte buffer

/// A cursor over a borrowed byte slice.
///
/// Tree bodies mix NUL-terminated text tokens with fixed-width binary
/// digests, so parsing needs both delimiter scans and exact-length reads.
/// Both return `None` without consuming anything when the buffer runs out.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        ByteCursor { buf, pos: 0 }
    }

    /// Read up to (not including) `delim`, then step past it
    pub fn read_until(&mut self, delim: u8) -> Option<&'a [u8]> {
        let rest = &self.buf[self.pos..];
        let idx = rest.iter().position(|&b| b == delim)?;
        self.pos += idx + 1;
        Some(&rest[..idx])
    }

    /// Read exactly `n` bytes
    pub fn read_exact(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let out = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(out)
    }

    /// Everything not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_until_consumes_delimiter() {
        let mut c = ByteCursor::new(b"abc\0def");
        assert_eq!(c.read_until(0), Some(&b"abc"[..]));
        assert_eq!(c.position(), 4);
        assert_eq!(c.remaining(), b"def");
    }

    #[test]
    fn test_read_until_missing_delimiter() {
        let mut c = ByteCursor::new(b"abc");
        assert_eq!(c.read_until(0), None);
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn test_read_exact() {
        let mut c = ByteCursor::new(b"0123456789");
        assert_eq!(c.read_exact(4), Some(&b"0123"[..]));
        assert_eq!(c.read_exact(7), None);
        assert_eq!(c.read_exact(6), Some(&b"456789"[..]));
        assert!(c.is_empty());
    }
}

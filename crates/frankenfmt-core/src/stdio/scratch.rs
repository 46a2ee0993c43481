//! Fixed-size working buffer owned by one formatting call.

/// Bytes of scratch space per formatting call.
pub const SCRATCH_CAPACITY: usize = 1024;

/// A write would exceed the scratch capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchFull;

/// Stack buffer with checked writes.
#[derive(Debug, Clone)]
pub struct Scratch<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> Default for Scratch<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Scratch<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: [0; N], len: 0 }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append `bytes`, or fail without writing anything.
    pub fn push(&mut self, bytes: &[u8]) -> Result<(), ScratchFull> {
        let end = self.len.checked_add(bytes.len()).ok_or(ScratchFull)?;
        let dst = self.buf.get_mut(self.len..end).ok_or(ScratchFull)?;
        dst.copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    /// Replace the contents with whatever `render` writes into the whole
    /// buffer. `render` returns the byte count it produced.
    pub fn fill<E>(
        &mut self,
        render: impl FnOnce(&mut [u8]) -> Result<usize, E>,
    ) -> Result<&[u8], E> {
        self.len = 0;
        let n = render(&mut self.buf)?.min(N);
        self.len = n;
        Ok(&self.buf[..n])
    }

    /// The whole buffer, for converters that report their own output length.
    pub fn space(&mut self) -> &mut [u8] {
        self.len = 0;
        &mut self.buf
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_is_checked() {
        let mut s = Scratch::<4>::new();
        assert_eq!(s.push(b"ab"), Ok(()));
        assert_eq!(s.push(b"cde"), Err(ScratchFull));
        assert_eq!(s.as_bytes(), b"ab");
        assert_eq!(s.push(b"cd"), Ok(()));
        assert_eq!(s.as_bytes(), b"abcd");
    }

    #[test]
    fn test_fill_replaces_contents() {
        let mut s = Scratch::<8>::new();
        s.push(b"old").unwrap();
        let out = s
            .fill(|buf| {
                buf[..2].copy_from_slice(b"hi");
                Ok::<_, ()>(2)
            })
            .unwrap();
        assert_eq!(out, b"hi");
        assert_eq!(s.as_bytes(), b"hi");
    }

    #[test]
    fn failed_fill_leaves_scratch_empty() {
        let mut s = Scratch::<8>::new();
        s.push(b"old").unwrap();
        assert_eq!(s.fill(|_| Err::<usize, _>("nope")), Err("nope"));
        assert!(s.as_bytes().is_empty());
    }

    #[test]
    fn test_default_capacity() {
        let s = Scratch::<SCRATCH_CAPACITY>::default();
        assert_eq!(s.capacity(), 1024);
    }
}

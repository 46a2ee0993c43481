//! Byte sinks the formatter writes into.
//!
//! A sink reports how many bytes of a chunk it took. Anything short of the
//! whole chunk ends the formatting call, so sinks that can make partial
//! progress should return the partial count rather than an error.

use std::io;

use thiserror::Error;

/// Failure reported by a sink that accepted nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("sink has no space left")]
    NoSpace,
    #[error("I/O error: {0}")]
    Io(io::ErrorKind),
}

/// Destination for formatted bytes.
pub trait ByteSink {
    /// Take bytes from `chunk`, returning how many were taken.
    ///
    /// `Err` means nothing was taken. The formatter never passes an empty
    /// chunk.
    fn write(&mut self, chunk: &[u8]) -> Result<usize, SinkError>;
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write(&mut self, chunk: &[u8]) -> Result<usize, SinkError> {
        (**self).write(chunk)
    }
}

impl ByteSink for Vec<u8> {
    fn write(&mut self, chunk: &[u8]) -> Result<usize, SinkError> {
        self.extend_from_slice(chunk);
        Ok(chunk.len())
    }
}

/// Bounded writer over a caller buffer.
///
/// Always reports the full chunk as accepted and keeps counting past the
/// end of the buffer, so a caller can format once into a small buffer and
/// learn the size it would have needed.
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    size: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, size: 0 }
    }

    /// Bytes offered so far, stored or not.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bytes actually stored in the buffer.
    #[must_use]
    pub fn stored(&self) -> usize {
        self.size.min(self.buf.len())
    }

    #[must_use]
    pub fn overflowed(&self) -> bool {
        self.size > self.buf.len()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.stored()]
    }
}

impl ByteSink for SliceSink<'_> {
    fn write(&mut self, chunk: &[u8]) -> Result<usize, SinkError> {
        let size = self
            .size
            .checked_add(chunk.len())
            .ok_or(SinkError::NoSpace)?;
        if self.size < self.buf.len() {
            let take = (self.buf.len() - self.size).min(chunk.len());
            self.buf[self.size..self.size + take].copy_from_slice(&chunk[..take]);
        }
        self.size = size;
        Ok(chunk.len())
    }
}

/// Adapter from [`io::Write`].
///
/// Retries interrupted writes. The first hard error is kept and can be
/// retrieved with [`IoSink::take_error`]; bytes already written before it are
/// reported as a short write.
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: io::Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, error: None }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> ByteSink for IoSink<W> {
    fn write(&mut self, chunk: &[u8]) -> Result<usize, SinkError> {
        let mut done = 0;
        while done < chunk.len() {
            let err = match self.inner.write(&chunk[done..]) {
                Ok(0) => io::Error::from(io::ErrorKind::WriteZero),
                Ok(n) => {
                    done += n;
                    continue;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => e,
            };
            let kind = err.kind();
            self.error = Some(err);
            return if done > 0 {
                Ok(done)
            } else {
                Err(SinkError::Io(kind))
            };
        }
        Ok(done)
    }
}

/// Closure adapter.
pub struct FnSink<F>(pub F);

impl<F> ByteSink for FnSink<F>
where
    F: FnMut(&[u8]) -> Result<usize, SinkError>,
{
    fn write(&mut self, chunk: &[u8]) -> Result<usize, SinkError> {
        (self.0)(chunk)
    }
}

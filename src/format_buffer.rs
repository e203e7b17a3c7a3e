use alloc::boxed::Box;
use alloc::vec;
use core::{
    cmp::min,
    fmt::{self, Write},
};

/// Heap buffer that formatted text is rendered into.
///
/// Capacity counts one byte for the terminating nul, so at most
/// `capacity() - 1` bytes of text fit.
#[derive(Debug, Default)]
pub struct FormatBuffer {
    buf: Option<Box<[u8]>>,
    #[cfg(test)]
    pub(crate) resizes: usize,
}

impl FormatBuffer {
    pub const fn new() -> Self {
        Self {
            buf: None,
            #[cfg(test)]
            resizes: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.as_ref().map_or(0, |buf| buf.len())
    }

    /// Drop the current allocation and, unless `size` is 0, allocate exactly
    /// `size` bytes.
    pub fn resize(&mut self, size: usize) {
        #[cfg(test)]
        {
            self.resizes += 1;
        }
        self.buf = None;
        if size > 0 {
            self.buf = Some(vec![0u8; size].into_boxed_slice());
        }
    }

    /// Render `args`, truncating to what fits, and return the full length the
    /// text would have had.
    pub fn format(&mut self, args: fmt::Arguments<'_>) -> Result<usize, fmt::Error> {
        let mut cursor = Cursor {
            buf: self.buf.as_deref_mut().unwrap_or(&mut []),
            pos: 0,
            len: 0,
        };
        cursor.write_fmt(args)?;
        if let Some(nul) = cursor.buf.get_mut(cursor.pos) {
            *nul = 0;
        }
        Ok(cursor.len)
    }

    /// The first `len` rendered bytes, clamped to what the buffer holds.
    pub fn text(&self, len: usize) -> &[u8] {
        match &self.buf {
            Some(buf) => &buf[..min(len, buf.len() - 1)],
            None => &[],
        }
    }
}

struct Cursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
    len: usize,
}

impl Write for Cursor<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.buf.len().saturating_sub(1) - self.pos;
        let copy_len = min(room, s.len());
        self.buf[self.pos..(self.pos + copy_len)].copy_from_slice(&s.as_bytes()[..copy_len]);
        self.pos += copy_len;
        self.len += s.len();
        Ok(())
    }
}

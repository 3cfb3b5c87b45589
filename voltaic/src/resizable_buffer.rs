use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

/// Configuration for a [`ResizableBuffer`].
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct Config {
    initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
        }
    }
}

impl Config {
    /// Number of bytes allocated when the buffer is created.
    ///
    /// A value of `0` defers the allocation to the first reservation.
    pub fn initial_capacity(mut self, value: usize) -> Self {
        self.initial_capacity = value;
        self
    }
}

/// A growable output buffer that values are formatted into in place.
///
/// Writing happens in two steps: [`reserve`][Self::reserve] guarantees that a number of unwritten
/// bytes is available at the write cursor and hands out a [`Reservation`] over them, and
/// [`Reservation::commit`] marks the prefix that was actually written as final content. The
/// reservation borrows the buffer exclusively, so it is impossible to hold on to a view of the
/// uncommitted region while another reservation moves the storage.
///
/// Growth is geometric, so a sequence of writes costs amortized O(1) per byte.
pub struct ResizableBuffer {
    // All of `buf` is initialized, `buf.len()` is the allocated length.
    buf: Vec<u8>,
    cursor: usize,
}

impl Default for ResizableBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResizableBuffer {
    /// Creates an empty buffer using the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty buffer using the given [`Config`].
    pub fn with_config(config: Config) -> Self {
        ResizableBuffer {
            buf: vec![0; config.initial_capacity],
            cursor: 0,
        }
    }

    /// Ensures that at least `len` unwritten bytes are available at the write cursor.
    ///
    /// If the current storage is too small it is replaced by a larger one, copying over all
    /// committed bytes. The returned [`Reservation`] dereferences to exactly `len` bytes starting at
    /// the write cursor. Their content is unspecified.
    #[inline]
    pub fn reserve(&mut self, len: usize) -> Reservation<'_> {
        if self.buf.len() - self.cursor < len {
            self.grow(len);
        }
        Reservation { buffer: self, len }
    }

    #[inline(never)]
    #[cold]
    fn grow(&mut self, len: usize) {
        let required = self
            .cursor
            .checked_add(len)
            .expect("buffer size overflows usize");
        let new_len = required.max(self.buf.len().saturating_mul(2));
        log::trace!("growing buffer from {} to {} bytes", self.buf.len(), new_len);

        // Only the committed prefix has to survive the move.
        self.buf.truncate(self.cursor);
        self.buf.resize(new_len, 0);
    }

    #[inline]
    fn commit(&mut self, len: usize) {
        debug_assert!(self.cursor + len <= self.buf.len());
        self.cursor += len;
    }

    /// Returns everything committed so far.
    #[inline]
    pub fn finalize(&self) -> &[u8] {
        &self.buf[..self.cursor]
    }

    /// Consumes the buffer, returning the committed bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.cursor);
        self.buf
    }

    /// Number of committed bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.cursor
    }

    /// Returns `true` if nothing was committed yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Number of bytes currently allocated, committed or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Discards all committed bytes, keeping the allocated storage.
    pub fn clear(&mut self) {
        self.cursor = 0;
    }

    /// Appends a slice of bytes.
    ///
    /// This is a reservation of `data.len()` bytes that is immediately filled and committed.
    #[inline]
    pub fn write_all(&mut self, data: &[u8]) {
        let mut reservation = self.reserve(data.len());
        reservation.copy_from_slice(data);
        reservation.commit(data.len());
    }
}

/// Writable view of the uncommitted bytes following the write cursor of a [`ResizableBuffer`].
///
/// Obtained from [`ResizableBuffer::reserve`]. Dropping a reservation without calling
/// [`commit`][Self::commit] leaves the buffer's content unchanged.
pub struct Reservation<'a> {
    buffer: &'a mut ResizableBuffer,
    len: usize,
}

impl Reservation<'_> {
    /// Marks the first `len` reserved bytes as final content and advances the write cursor.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the reserved length.
    #[inline]
    pub fn commit(self, len: usize) {
        assert!(
            len <= self.len,
            "committing {} bytes of a {} byte reservation",
            len,
            self.len
        );
        self.buffer.commit(len);
    }
}

impl Deref for Reservation<'_> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        let start = self.buffer.cursor;
        &self.buffer.buf[start..start + self.len]
    }
}

impl DerefMut for Reservation<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        let start = self.buffer.cursor;
        &mut self.buffer.buf[start..start + self.len]
    }
}

impl Write for ResizableBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_all(buf);
        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        ResizableBuffer::write_all(self, buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn empty() {
        let buffer = ResizableBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.finalize(), b"");
    }

    #[test]
    fn partial_commit() {
        let mut buffer = ResizableBuffer::new();
        let mut reservation = buffer.reserve(8);
        reservation[..3].copy_from_slice(b"abc");
        reservation.commit(3);

        assert_eq!(buffer.finalize(), b"abc");
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn dropped_reservation_commits_nothing() {
        let mut buffer = ResizableBuffer::new();
        buffer.write_all(b"x");
        {
            let mut reservation = buffer.reserve(4);
            reservation.copy_from_slice(b"yyyy");
        }
        buffer.write_all(b"z");

        assert_eq!(buffer.finalize(), b"xz");
    }

    #[test]
    fn growth_keeps_committed_bytes() {
        let mut buffer = ResizableBuffer::with_config(Config::default().initial_capacity(4));
        buffer.write_all(b"abc");
        assert_eq!(buffer.capacity(), 4);

        let mut reservation = buffer.reserve(10);
        assert_eq!(reservation.len(), 10);
        reservation[..5].copy_from_slice(b"defgh");
        reservation.commit(5);

        assert_eq!(buffer.capacity(), 13);
        assert_eq!(buffer.finalize(), b"abcdefgh");

        buffer.reserve(6).commit(0);
        assert_eq!(buffer.capacity(), 26);
        assert_eq!(buffer.finalize(), b"abcdefgh");
    }

    #[test]
    fn zero_initial_capacity() {
        let mut buffer = ResizableBuffer::with_config(Config::default().initial_capacity(0));
        assert_eq!(buffer.capacity(), 0);
        buffer.write_all(b"hello");
        assert_eq!(buffer.into_vec(), b"hello");
    }

    #[test]
    fn clear_keeps_storage() {
        let mut buffer = ResizableBuffer::new();
        buffer.write_all(&[1; 300]);
        let capacity = buffer.capacity();
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), capacity);
    }

    #[test]
    fn io_write() {
        let mut buffer = ResizableBuffer::new();
        write!(buffer, "{}-{}", 1, "two").unwrap();
        assert_eq!(buffer.finalize(), b"1-two");
    }

    #[test]
    #[should_panic]
    fn over_commit_panics() {
        let mut buffer = ResizableBuffer::new();
        buffer.reserve(2).commit(3);
    }

    #[quickcheck]
    fn finalized_is_concatenation(writes: Vec<(Vec<u8>, u8)>) -> bool {
        let mut buffer = ResizableBuffer::with_config(Config::default().initial_capacity(1));
        let mut expected = vec![];

        for (data, slack) in writes {
            let mut reservation = buffer.reserve(data.len() + slack as usize);
            reservation[..data.len()].copy_from_slice(&data);
            reservation.commit(data.len());
            expected.extend_from_slice(&data);
        }

        buffer.finalize() == &expected[..]
    }
}

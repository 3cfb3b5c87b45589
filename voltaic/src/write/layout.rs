//! Bounds checked output cursor shared by the formatters.
//!
//! Every operation returns `None` instead of writing past the end of the output, so formatters can
//! use `?` and report running out of space as formatting failure.
use std::fmt;

pub(crate) struct Out<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Out<'a> {
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Out { buf, pos: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pos
    }

    /// The bytes written so far.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// The whole underlying output, for in-place rearrangements after writing.
    #[inline]
    pub fn buf_mut(&mut self) -> &mut [u8] {
        &mut *self.buf
    }

    #[inline]
    pub fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.buf.len());
        self.pos = len;
    }

    #[inline]
    pub fn push(&mut self, byte: u8) -> Option<()> {
        *self.buf.get_mut(self.pos)? = byte;
        self.pos += 1;
        Some(())
    }

    #[inline]
    pub fn extend(&mut self, bytes: &[u8]) -> Option<()> {
        let end = self.pos.checked_add(bytes.len())?;
        self.buf.get_mut(self.pos..end)?.copy_from_slice(bytes);
        self.pos = end;
        Some(())
    }

    #[inline]
    pub fn fill(&mut self, byte: u8, count: usize) -> Option<()> {
        let end = self.pos.checked_add(count)?;
        self.buf.get_mut(self.pos..end)?.fill(byte);
        self.pos = end;
        Some(())
    }

    /// Writes the decimal digits of `value`, returning how many were written.
    #[inline]
    pub fn digits<I: itoap::Integer>(&mut self, value: I) -> Option<usize> {
        let mut rest = self.buf.get_mut(self.pos..)?;
        let len = itoap::write(&mut rest, value).ok()?;
        self.pos += len;
        Some(len)
    }

    /// Writes `value` using at least `width` digits, padding with leading zeros.
    #[inline]
    pub fn padded_digits(&mut self, value: u64, width: usize) -> Option<()> {
        let len = digit_count(value);
        if width > len {
            self.fill(b'0', width - len)?;
        }
        self.digits(value)?;
        Some(())
    }

    /// Writes a value below 100 as exactly two digits.
    #[inline]
    pub fn two_digits(&mut self, value: u32) -> Option<()> {
        debug_assert!(value < 100);
        self.push(b'0' + (value / 10) as u8)?;
        self.push(b'0' + (value % 10) as u8)
    }
}

impl fmt::Write for Out<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.extend(s.as_bytes()).ok_or(fmt::Error)
    }
}

/// Number of decimal digits of `value`, at least one.
pub(crate) fn digit_count(mut value: u64) -> usize {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}

/// Number of `,` separators needed when grouping `digits` integer digits by thousands.
#[inline]
pub(crate) fn separator_count(digits: usize) -> usize {
    digits.saturating_sub(1) / 3
}

/// Inserts thousands separators into the run of `digits` ASCII digits at `buf[start..]`.
///
/// The `tail_len` bytes following the digits are moved along. Returns the number of bytes the
/// content grew by, or `None` if `buf` is too short to hold the result.
pub(crate) fn group_thousands(
    buf: &mut [u8],
    start: usize,
    digits: usize,
    tail_len: usize,
) -> Option<usize> {
    let separators = separator_count(digits);
    if separators == 0 {
        return Some(0);
    }
    let digits_end = start + digits;
    let end = digits_end + tail_len;
    if end + separators > buf.len() {
        return None;
    }
    buf.copy_within(digits_end..end, digits_end + separators);

    let mut src = digits_end;
    let mut dst = digits_end + separators;
    let mut in_group = 0;
    while src > start {
        src -= 1;
        dst -= 1;
        buf[dst] = buf[src];
        in_group += 1;
        if in_group == 3 && src > start {
            dst -= 1;
            buf[dst] = b',';
            in_group = 0;
        }
    }
    Some(separators)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped(text: &str, tail_len: usize) -> String {
        let mut buf = [0u8; 64];
        buf[..text.len()].copy_from_slice(text.as_bytes());
        let grown = group_thousands(&mut buf, 1, text.len() - 1 - tail_len, tail_len).unwrap();
        String::from_utf8(buf[..text.len() + grown].to_vec()).unwrap()
    }

    #[test]
    fn grouping() {
        assert_eq!(grouped("-1", 0), "-1");
        assert_eq!(grouped("-123", 0), "-123");
        assert_eq!(grouped("-1234", 0), "-1,234");
        assert_eq!(grouped("+1234567.00", 3), "+1,234,567.00");
        assert_eq!(grouped("-123456.5", 2), "-123,456.5");
    }

    #[test]
    fn grouping_needs_room() {
        let mut buf = *b"x1234";
        assert_eq!(group_thousands(&mut buf, 1, 4, 0), None);
    }

    #[test]
    fn out_is_bounded() {
        let mut buf = [0u8; 4];
        let mut out = Out::new(&mut buf);
        assert_eq!(out.digits(123u32), Some(3));
        assert_eq!(out.extend(b"45"), None);
        assert_eq!(out.push(b'4'), Some(()));
        assert_eq!(out.push(b'5'), None);
        assert_eq!(out.written(), b"1234");
    }

    #[test]
    fn padding() {
        let mut buf = [0u8; 8];
        let mut out = Out::new(&mut buf);
        out.padded_digits(42, 5).unwrap();
        out.two_digits(7).unwrap();
        assert_eq!(out.written(), b"0004207");
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(u64::MAX), 20);
    }
}

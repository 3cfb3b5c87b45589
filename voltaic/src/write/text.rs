//! Locale-invariant text formatting of primitive values into a [`ResizableBuffer`].
//!
//! Every supported type implements [`Formattable`] and is written with [`try_write`]. A write
//! reserves the worst-case length of the type under the given [`Format`] (see [`max_len`]),
//! formats the value directly into the reservation, and commits exactly the bytes produced. No
//! intermediate strings are allocated.
//!
//! Supported formats per type:
//!
//! * Integers: `G` (default) and `D` write plain decimal digits. `D` takes a precision giving a
//!   minimum number of digits, `G` takes none. `N` groups thousands with `,` and appends `precision` zero decimals (default
//!   2). `X`/`x` write upper/lower case hexadecimal, negative values as two's complement of the
//!   type's width.
//! * `f32`/`f64`: `G` (default) writes the shortest text that parses back to the same value, or
//!   `precision` significant digits, switching to scientific notation for large and small
//!   exponents. `E`/`e` write scientific notation with `precision` decimals (default 6) and a three
//!   digit exponent. `F` and `N` write fixed point with `precision` decimals (default 2), `N` with
//!   grouped thousands. Non-finite values are written as `NaN`, `Infinity` and `-Infinity`.
//! * [`Decimal`][crate::Decimal]: `G` (default) writes all digits honoring the scale. `F`, `N` and
//!   `E` behave as for floats, rounding half away from zero.
//! * [`DateTime`][crate::DateTime]: `G` (default) `MM/dd/yyyy HH:mm:ss`, `O` ISO 8601 round trip
//!   format, `R` RFC 1123 and `l` lower case RFC 1123.
//! * [`DateTimeOffset`][crate::DateTimeOffset]: as `DateTime`. The default format and `O` append
//!   the offset, an explicit `G` writes the local date and time alone, and `R` and `l` write the
//!   UTC instant.
//! * [`TimeSpan`][crate::TimeSpan]: `c` (default) `[-][d.]hh:mm:ss[.fffffff]`, `G`
//!   `[-]d:hh:mm:ss.fffffff` and `g` `[-][d:]h:mm:ss[.FFFFFFF]`.
//!
//! Other symbols are not supported and make [`try_write`] return `false`.
use std::{fmt, str};

use super::layout::{group_thousands, separator_count, Out};
use crate::{Format, ResizableBuffer};

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Values that can be formatted by [`try_write`].
///
/// This trait is sealed, it is implemented for the primitive integer and float types, and for the
/// value types of this crate.
pub trait Formattable: sealed::Sealed + Copy {
    /// Worst-case number of bytes written for any value under `format`, or `None` if `format` is
    /// not supported for this type.
    #[doc(hidden)]
    fn max_len(format: Format) -> Option<usize>;

    /// Formats `self` into `out`, returning the number of bytes written.
    ///
    /// Returns `None` if `out` is too short or `format` is not supported.
    #[doc(hidden)]
    fn format_into(self, out: &mut [u8], format: Format) -> Option<usize>;
}

/// Worst-case number of bytes [`try_write`] reserves for values of type `T` under `format`.
///
/// Returns `None` if `format` is not supported for `T`.
#[inline]
pub fn max_len<T: Formattable>(format: Format) -> Option<usize> {
    T::max_len(format)
}

/// Writes the text form of `value` selected by `format`.
///
/// Returns `false` and leaves the buffer unchanged if the format is not supported for this type.
/// For supported formats this always succeeds, a `false` return would indicate that the reserved
/// worst-case length is wrong.
#[inline]
pub fn try_write<T: Formattable>(buffer: &mut ResizableBuffer, value: T, format: Format) -> bool {
    let Some(len) = T::max_len(format) else {
        return false;
    };
    let mut reservation = buffer.reserve(len);
    match value.format_into(&mut reservation, format) {
        Some(written) => {
            reservation.commit(written);
            true
        }
        None => false,
    }
}

/// Writes `value` in its default format.
#[inline]
pub fn try_write_default<T: Formattable>(buffer: &mut ResizableBuffer, value: T) -> bool {
    try_write(buffer, value, Format::DEFAULT)
}

const DISPLAY_SCRATCH_LEN: usize = 64;

/// `Display` implementation for value types, using their default format.
pub(crate) fn display<T: Formattable>(value: T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    display_with(value, Format::DEFAULT, f)
}

pub(crate) fn display_with<T: Formattable>(
    value: T,
    format: Format,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let mut scratch = [0u8; DISPLAY_SCRATCH_LEN];
    let len = value.format_into(&mut scratch, format).ok_or(fmt::Error)?;
    f.write_str(str::from_utf8(&scratch[..len]).map_err(|_| fmt::Error)?)
}

mod int_sealed {
    pub trait Sealed: itoap::Integer {}

    impl Sealed for i8 {}
    impl Sealed for u8 {}
    impl Sealed for i16 {}
    impl Sealed for u16 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
}

/// Primitive integer types supported by [`try_write`].
pub trait Integer: int_sealed::Sealed + Copy {
    /// Decimal digits of the value with the largest magnitude.
    #[doc(hidden)]
    const MAX_DIGITS: usize;
    /// Whether the type has negative values.
    #[doc(hidden)]
    const SIGNED: bool;
    /// Width in hexadecimal digits.
    #[doc(hidden)]
    const HEX_DIGITS: usize;

    /// Sign and magnitude.
    #[doc(hidden)]
    fn split(self) -> (bool, u64);

    /// The two's complement bit pattern, zero extended.
    #[doc(hidden)]
    fn bits(self) -> u64;
}

macro_rules! signed_integer_impl {
    ($t:ty, $u:ty, $digits:expr) => {
        impl Integer for $t {
            const MAX_DIGITS: usize = $digits;
            const SIGNED: bool = true;
            const HEX_DIGITS: usize = std::mem::size_of::<$t>() * 2;

            #[inline]
            fn split(self) -> (bool, u64) {
                (self < 0, self.unsigned_abs() as u64)
            }

            #[inline]
            fn bits(self) -> u64 {
                self as $u as u64
            }
        }
    };
}

macro_rules! unsigned_integer_impl {
    ($t:ty, $digits:expr) => {
        impl Integer for $t {
            const MAX_DIGITS: usize = $digits;
            const SIGNED: bool = false;
            const HEX_DIGITS: usize = std::mem::size_of::<$t>() * 2;

            #[inline]
            fn split(self) -> (bool, u64) {
                (false, self as u64)
            }

            #[inline]
            fn bits(self) -> u64 {
                self as u64
            }
        }
    };
}

signed_integer_impl!(i8, u8, 3);
signed_integer_impl!(i16, u16, 5);
signed_integer_impl!(i32, u32, 10);
signed_integer_impl!(i64, u64, 19);
unsigned_integer_impl!(u8, 3);
unsigned_integer_impl!(u16, 5);
unsigned_integer_impl!(u32, 10);
unsigned_integer_impl!(u64, 20);

impl<I: Integer> sealed::Sealed for I {}

impl<I: Integer> Formattable for I {
    fn max_len(format: Format) -> Option<usize> {
        let sign = I::SIGNED as usize;
        match format.symbol() {
            // Only `D` takes a minimum number of digits.
            None | Some(b'G' | b'g') if format.precision().is_some() => None,
            None | Some(b'G' | b'g' | b'D' | b'd') => {
                Some(sign + I::MAX_DIGITS.max(format.precision_or(0)))
            }
            Some(b'N' | b'n') => {
                let decimals = format.precision_or(2);
                Some(
                    sign + I::MAX_DIGITS
                        + separator_count(I::MAX_DIGITS)
                        + decimals
                        + (decimals > 0) as usize,
                )
            }
            Some(b'X' | b'x') => Some(I::HEX_DIGITS.max(format.precision_or(0))),
            _ => None,
        }
    }

    #[inline]
    fn format_into(self, out: &mut [u8], format: Format) -> Option<usize> {
        let mut out = Out::new(out);
        match format.symbol() {
            None | Some(b'G' | b'g') if format.precision().is_some() => return None,
            None | Some(b'G' | b'g' | b'D' | b'd') => match format.precision() {
                None => {
                    out.digits(self)?;
                }
                Some(min_digits) => {
                    let (negative, magnitude) = self.split();
                    if negative {
                        out.push(b'-')?;
                    }
                    out.padded_digits(magnitude, min_digits.into())?;
                }
            },
            Some(b'N' | b'n') => {
                let (negative, magnitude) = self.split();
                if negative {
                    out.push(b'-')?;
                }
                let start = out.len();
                let digits = out.digits(magnitude)?;
                let grown = group_thousands(out.buf_mut(), start, digits, 0)?;
                out.set_len(start + digits + grown);

                let decimals = format.precision_or(2);
                if decimals > 0 {
                    out.push(b'.')?;
                    out.fill(b'0', decimals)?;
                }
            }
            Some(symbol @ (b'X' | b'x')) => {
                write_hex(&mut out, self.bits(), symbol == b'x', format.precision_or(0))?;
            }
            _ => return None,
        }
        Some(out.len())
    }
}

fn write_hex(out: &mut Out, bits: u64, lower: bool, min_digits: usize) -> Option<()> {
    let alphabet: &[u8; 16] = if lower {
        b"0123456789abcdef"
    } else {
        b"0123456789ABCDEF"
    };
    let significant = ((64 - bits.leading_zeros() as usize) + 3) / 4;
    let len = significant.max(min_digits).max(1);
    for position in (0..len).rev() {
        let nibble = if position < 16 {
            (bits >> (position * 4)) & 0xf
        } else {
            0
        };
        out.push(alphabet[nibble as usize])?;
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    fn written<T: Formattable>(value: T, format: &str) -> String {
        let format = if format.is_empty() {
            Format::DEFAULT
        } else {
            Format::parse(format).unwrap()
        };
        let mut buffer = ResizableBuffer::new();
        assert!(try_write(&mut buffer, value, format));
        assert!(buffer.len() <= max_len::<T>(format).unwrap());
        String::from_utf8(buffer.into_vec()).unwrap()
    }

    #[test]
    fn general() {
        assert_eq!(written(0i32, ""), "0");
        assert_eq!(written(-1i8, ""), "-1");
        assert_eq!(written(i64::MIN, "G"), "-9223372036854775808");
        assert_eq!(written(u64::MAX, "D"), "18446744073709551615");
        assert_eq!(written(42u8, "D5"), "00042");
        assert_eq!(written(-42i16, "d4"), "-0042");
        assert_eq!(written(12345i32, "D2"), "12345");
    }

    #[test]
    fn grouped() {
        assert_eq!(written(i32::MIN, "N"), "-2,147,483,648.00");
        assert_eq!(written(i32::MIN, "N2"), "-2,147,483,648.00");
        assert_eq!(written(999i16, "N0"), "999");
        assert_eq!(written(1000u16, "n1"), "1,000.0");
        assert_eq!(written(i64::MIN, "N"), "-9,223,372,036,854,775,808.00");
        assert_eq!(written(u64::MAX, "N"), "18,446,744,073,709,551,615.00");
    }

    #[test]
    fn hex() {
        assert_eq!(written(255u8, "X"), "FF");
        assert_eq!(written(-1i8, "X"), "FF");
        assert_eq!(written(-1i32, "x"), "ffffffff");
        assert_eq!(written(0u64, "X"), "0");
        assert_eq!(written(0xabcu16, "X8"), "00000ABC");
        assert_eq!(written(i64::MIN, "X"), "8000000000000000");
    }

    #[test]
    fn documented_worst_cases() {
        let grouped = Format::from_symbol(b'N');
        assert_eq!(max_len::<i8>(grouped), Some(7));
        assert_eq!(max_len::<i16>(grouped), Some(10));
        assert_eq!(max_len::<i32>(grouped), Some(17));
        assert_eq!(max_len::<i64>(grouped), Some(29));
        assert_eq!(max_len::<u8>(grouped), Some(6));
        assert_eq!(max_len::<u16>(grouped), Some(9));
        assert_eq!(max_len::<u32>(grouped), Some(16));
        assert_eq!(max_len::<u64>(grouped), Some(29));
    }

    #[test]
    fn general_takes_no_precision() {
        let mut buffer = ResizableBuffer::new();
        assert!(!try_write(&mut buffer, 12345i32, Format::parse("G3").unwrap()));
        assert!(!try_write(&mut buffer, 7u8, Format::parse("g0").unwrap()));
        assert!(buffer.is_empty());
        assert_eq!(max_len::<i64>(Format::parse("G5").unwrap()), None);
        assert_eq!(written(12345i32, "D3"), "12345");
    }

    #[test]
    fn unsupported_symbol() {
        let mut buffer = ResizableBuffer::new();
        assert!(!try_write(&mut buffer, 1i32, Format::from_symbol(b'Q')));
        assert!(!try_write(&mut buffer, 1i32, Format::from_symbol(b'O')));
        assert!(buffer.is_empty());
        assert_eq!(max_len::<u32>(Format::from_symbol(b'Q')), None);
    }

    #[test]
    fn consecutive_writes() {
        let mut buffer = ResizableBuffer::with_config(crate::Config::default().initial_capacity(0));
        for value in [1i32, -20, 300] {
            assert!(try_write_default(&mut buffer, value));
            buffer.write_all(b",");
        }
        assert_eq!(buffer.finalize(), b"1,-20,300,");
    }

    fn boundary_round_trip<T>(values: &[T])
    where
        T: Formattable + str::FromStr + PartialEq + fmt::Debug,
        T::Err: fmt::Debug,
    {
        for &value in values {
            assert_eq!(written(value, "").parse::<T>().unwrap(), value);
            let grouped: String = written(value, "N0").chars().filter(|&c| c != ',').collect();
            assert_eq!(grouped.parse::<T>().unwrap(), value);
        }
    }

    #[test]
    fn boundaries() {
        boundary_round_trip(&[i8::MIN, -1, 0, i8::MAX]);
        boundary_round_trip(&[i16::MIN, -1, 0, i16::MAX]);
        boundary_round_trip(&[i32::MIN, -1, 0, i32::MAX]);
        boundary_round_trip(&[i64::MIN, -1, 0, i64::MAX]);
        boundary_round_trip(&[u8::MIN, u8::MAX]);
        boundary_round_trip(&[u16::MIN, u16::MAX]);
        boundary_round_trip(&[u32::MIN, u32::MAX]);
        boundary_round_trip(&[u64::MIN, u64::MAX]);
    }

    #[quickcheck]
    fn i64_round_trip(value: i64) -> bool {
        written(value, "").parse::<i64>() == Ok(value)
    }

    #[quickcheck]
    fn u32_grouped_round_trip(value: u32) -> bool {
        let text = written(value, "N");
        let digits: String = text
            .trim_end_matches(".00")
            .chars()
            .filter(|&c| c != ',')
            .collect();
        digits.parse::<u32>() == Ok(value)
    }
}

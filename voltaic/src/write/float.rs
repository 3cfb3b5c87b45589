use std::fmt::{self, Write as _};

use super::layout::{group_thousands, separator_count, Out};
use super::text::{sealed, Formattable};
use crate::Format;

// Longest `{:.99e}` output: sign, 100 digits, point and a `e-324` exponent.
const SCRATCH_LEN: usize = 112;

trait FloatRepr: num_traits::Float + fmt::LowerExp + fmt::Display {
    /// Significant digits needed to round trip every value.
    const SHORTEST_DIGITS: usize;
    /// Decimal exponent from which the shortest general format switches to scientific notation.
    const SCIENTIFIC_FROM: i32;
    /// Integer digits of the largest finite value.
    const MAX_INT_DIGITS: usize;
    /// Exponent digits needed in the general format.
    const EXPONENT_DIGITS: usize;
}

impl FloatRepr for f32 {
    const SHORTEST_DIGITS: usize = 9;
    const SCIENTIFIC_FROM: i32 = 7;
    const MAX_INT_DIGITS: usize = 39;
    const EXPONENT_DIGITS: usize = 2;
}

impl FloatRepr for f64 {
    const SHORTEST_DIGITS: usize = 17;
    const SCIENTIFIC_FROM: i32 = 15;
    const MAX_INT_DIGITS: usize = 309;
    const EXPONENT_DIGITS: usize = 3;
}

const NON_FINITE_LEN: usize = b"-Infinity".len();

fn max_len<F: FloatRepr>(format: Format) -> Option<usize> {
    let len = match format.symbol() {
        None | Some(b'G' | b'g') => match format.precision() {
            None | Some(0) => {
                let scientific = F::SHORTEST_DIGITS + 1 + 2 + F::EXPONENT_DIGITS;
                // `0.000` followed by all digits at the smallest fixed point exponent.
                let fixed = 5 + F::SHORTEST_DIGITS;
                1 + scientific.max(fixed)
            }
            Some(precision) => usize::from(precision) + 7,
        },
        Some(b'E' | b'e') => {
            let decimals = format.precision_or(6);
            3 + decimals + (decimals > 0) as usize + 4
        }
        Some(b'F' | b'f') => {
            let decimals = format.precision_or(2);
            1 + F::MAX_INT_DIGITS + decimals + (decimals > 0) as usize
        }
        Some(b'N' | b'n') => {
            let decimals = format.precision_or(2);
            1 + F::MAX_INT_DIGITS
                + separator_count(F::MAX_INT_DIGITS)
                + decimals
                + (decimals > 0) as usize
        }
        _ => return None,
    };
    Some(len.max(NON_FINITE_LEN))
}

/// Sign, significant digits and decimal exponent of a finite value.
///
/// The value is `d.ddd * 10^exponent` where `d.ddd` are the digits with a point after the first.
struct Scientific {
    negative: bool,
    digits: [u8; SCRATCH_LEN],
    len: usize,
    exponent: i32,
}

impl Scientific {
    /// Decomposes the output of `{:e}` or `{:.N$e}`.
    fn new<F: FloatRepr>(value: F, decimals: Option<usize>) -> Option<Self> {
        let mut scratch = [0u8; SCRATCH_LEN];
        let mut out = Out::new(&mut scratch);
        match decimals {
            None => write!(out, "{:e}", value).ok()?,
            Some(decimals) => write!(out, "{:.*e}", decimals, value).ok()?,
        }
        let text = out.written();

        let negative = text.first() == Some(&b'-');
        let mantissa_start = negative as usize;
        let exponent_pos = text.iter().position(|&byte| byte == b'e')?;
        let exponent = std::str::from_utf8(&text[exponent_pos + 1..])
            .ok()?
            .parse()
            .ok()?;

        let mut digits = [0u8; SCRATCH_LEN];
        let mut len = 0;
        for &byte in &text[mantissa_start..exponent_pos] {
            if byte != b'.' {
                digits[len] = byte;
                len += 1;
            }
        }
        Some(Scientific {
            negative,
            digits,
            len,
            exponent,
        })
    }

    fn digits(&self) -> &[u8] {
        &self.digits[..self.len]
    }

    fn trim_trailing_zeros(&mut self) {
        while self.len > 1 && self.digits[self.len - 1] == b'0' {
            self.len -= 1;
        }
    }
}

fn write_exponent(out: &mut Out, symbol: u8, exponent: i32, min_digits: usize) -> Option<()> {
    out.push(symbol)?;
    out.push(if exponent < 0 { b'-' } else { b'+' })?;
    out.padded_digits(u64::from(exponent.unsigned_abs()), min_digits)
}

fn write_general<F: FloatRepr>(out: &mut Out, value: F, format: Format, lower: bool) -> Option<()> {
    let precision = format.precision().filter(|&precision| precision > 0);
    let (scientific, threshold) = match precision {
        None => (Scientific::new(value, None)?, F::SCIENTIFIC_FROM),
        Some(precision) => {
            let mut scientific = Scientific::new(value, Some(usize::from(precision) - 1))?;
            scientific.trim_trailing_zeros();
            (scientific, i32::from(precision))
        }
    };

    if scientific.negative {
        out.push(b'-')?;
    }
    let digits = scientific.digits();
    let exponent = scientific.exponent;

    if value.is_zero() {
        out.push(b'0')?;
    } else if exponent >= threshold || exponent < -4 {
        out.push(digits[0])?;
        if digits.len() > 1 {
            out.push(b'.')?;
            out.extend(&digits[1..])?;
        }
        write_exponent(out, if lower { b'e' } else { b'E' }, exponent, 2)?;
    } else if exponent >= 0 {
        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            out.extend(digits)?;
            out.fill(b'0', int_len - digits.len())?;
        } else {
            out.extend(&digits[..int_len])?;
            out.push(b'.')?;
            out.extend(&digits[int_len..])?;
        }
    } else {
        out.extend(b"0.")?;
        out.fill(b'0', (-exponent - 1) as usize)?;
        out.extend(digits)?;
    }
    Some(())
}

fn write_exponential<F: FloatRepr>(
    out: &mut Out,
    value: F,
    decimals: usize,
    symbol: u8,
) -> Option<()> {
    let scientific = Scientific::new(value, Some(decimals))?;
    if scientific.negative {
        out.push(b'-')?;
    }
    let digits = scientific.digits();
    out.push(digits[0])?;
    if decimals > 0 {
        out.push(b'.')?;
        out.extend(&digits[1..])?;
    }
    write_exponent(out, symbol, scientific.exponent, 3)
}

fn write_fixed<F: FloatRepr>(out: &mut Out, value: F, decimals: usize, grouped: bool) -> Option<()> {
    let start = out.len();
    write!(out, "{:.*}", decimals, value).ok()?;
    if grouped {
        let digits_start = start + (out.written()[start..].first() == Some(&b'-')) as usize;
        let int_len = out.written()[digits_start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count();
        let tail_len = out.len() - digits_start - int_len;
        let grown = group_thousands(out.buf_mut(), digits_start, int_len, tail_len)?;
        let len = out.len() + grown;
        out.set_len(len);
    }
    Some(())
}

fn format_into<F: FloatRepr>(value: F, out: &mut [u8], format: Format) -> Option<usize> {
    let symbol = format.symbol().unwrap_or(b'G');
    if !matches!(
        symbol,
        b'G' | b'g' | b'E' | b'e' | b'F' | b'f' | b'N' | b'n'
    ) {
        return None;
    }

    let mut out = Out::new(out);
    if value.is_nan() {
        out.extend(b"NaN")?;
    } else if value.is_infinite() {
        out.extend(if value.is_sign_negative() {
            &b"-Infinity"[..]
        } else {
            &b"Infinity"[..]
        })?;
    } else {
        match symbol {
            b'G' | b'g' => write_general(&mut out, value, format, symbol == b'g')?,
            b'E' | b'e' => write_exponential(&mut out, value, format.precision_or(6), symbol)?,
            b'F' | b'f' => write_fixed(&mut out, value, format.precision_or(2), false)?,
            _ => write_fixed(&mut out, value, format.precision_or(2), true)?,
        }
    }
    Some(out.len())
}

impl sealed::Sealed for f32 {}
impl sealed::Sealed for f64 {}

impl Formattable for f32 {
    fn max_len(format: Format) -> Option<usize> {
        max_len::<f32>(format)
    }

    fn format_into(self, out: &mut [u8], format: Format) -> Option<usize> {
        format_into(self, out, format)
    }
}

impl Formattable for f64 {
    fn max_len(format: Format) -> Option<usize> {
        max_len::<f64>(format)
    }

    fn format_into(self, out: &mut [u8], format: Format) -> Option<usize> {
        format_into(self, out, format)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use crate::write::text::{max_len, try_write};
    use crate::{Format, ResizableBuffer};

    fn written<T: super::Formattable>(value: T, format: &str) -> String {
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
    fn shortest() {
        assert_eq!(written(0.0f64, ""), "0");
        assert_eq!(written(-0.0f64, ""), "-0");
        assert_eq!(written(1.5f64, ""), "1.5");
        assert_eq!(written(-123.25f64, ""), "-123.25");
        assert_eq!(written(0.1f64, ""), "0.1");
        assert_eq!(written(1e14f64, ""), "100000000000000");
        assert_eq!(written(1e15f64, ""), "1E+15");
        assert_eq!(written(0.0001f64, ""), "0.0001");
        assert_eq!(written(0.00001f64, ""), "1E-05");
        assert_eq!(written(f64::MAX, ""), "1.7976931348623157E+308");
        assert_eq!(written(f64::MIN, ""), "-1.7976931348623157E+308");
        assert_eq!(written(5e-324f64, ""), "5E-324");
        assert_eq!(written(1e7f32, ""), "1E+07");
        assert_eq!(written(f32::MAX, ""), "3.4028235E+38");
        assert_eq!(written(1.2345e-3f64, "g"), "0.0012345");
        assert_eq!(written(2.5e20f64, "g"), "2.5e+20");
    }

    #[test]
    fn general_precision() {
        assert_eq!(written(123.456f64, "G4"), "123.5");
        assert_eq!(written(123.456f64, "G2"), "1.2E+02");
        assert_eq!(written(100.0f64, "G5"), "100");
        assert_eq!(written(0.5f32, "G3"), "0.5");
        assert_eq!(written(1.0f64 / 3.0, "G0"), "0.3333333333333333");
    }

    #[test]
    fn exponential() {
        assert_eq!(written(1234.5678f64, "E"), "1.234568E+003");
        assert_eq!(written(-1234.5678f64, "e2"), "-1.23e+003");
        assert_eq!(written(0.0f64, "E0"), "0E+000");
        assert_eq!(written(f64::MIN_POSITIVE, "E3"), "2.225E-308");
        assert_eq!(written(1.0f32, "E1"), "1.0E+000");
    }

    #[test]
    fn fixed_and_grouped() {
        assert_eq!(written(1234.5678f64, "F"), "1234.57");
        assert_eq!(written(1234.5678f64, "F0"), "1235");
        assert_eq!(written(-1234567.891f64, "N"), "-1,234,567.89");
        assert_eq!(written(999.0f32, "N1"), "999.0");
        assert_eq!(written(0.125f64, "f3"), "0.125");
    }

    #[test]
    fn extreme_fixed() {
        let text = written(f64::MIN, "N99");
        assert!(text.starts_with("-179,769,313,486,231,57"));
        assert_eq!(text.len(), max_len::<f64>(Format::parse("N99").unwrap()).unwrap());
        assert!(written(f64::MAX, "F").len() <= 1 + 309 + 3);
    }

    #[test]
    fn non_finite() {
        for format in ["", "E0", "F", "N", "G3"] {
            assert_eq!(written(f64::NAN, format), "NaN");
            assert_eq!(written(f64::INFINITY, format), "Infinity");
            assert_eq!(written(f32::NEG_INFINITY, format), "-Infinity");
        }
    }

    #[test]
    fn boundaries_round_trip() {
        for value in [f64::MIN, -1.0, -0.0, 0.0, f64::MIN_POSITIVE, f64::EPSILON, f64::MAX] {
            let parsed: f64 = written(value, "").parse().unwrap();
            assert_eq!(parsed.to_bits(), value.to_bits());
        }
        for value in [f32::MIN, -1.0, -0.0, 0.0, f32::MIN_POSITIVE, f32::EPSILON, f32::MAX] {
            let parsed: f32 = written(value, "").parse().unwrap();
            assert_eq!(parsed.to_bits(), value.to_bits());
        }
        assert!(written(f64::NAN, "").parse::<f64>().unwrap().is_nan());
    }

    #[test]
    fn unsupported_symbol() {
        let mut buffer = ResizableBuffer::new();
        assert!(!try_write(&mut buffer, 1.0f64, Format::from_symbol(b'X')));
        assert!(!try_write(&mut buffer, 1.0f32, Format::from_symbol(b'D')));
        assert!(buffer.is_empty());
    }

    #[quickcheck]
    fn f64_round_trip(value: f64) -> bool {
        let parsed: f64 = written(value, "").parse().unwrap();
        parsed.to_bits() == value.to_bits() || (parsed.is_nan() && value.is_nan())
    }

    #[quickcheck]
    fn f32_round_trip(value: f32) -> bool {
        let parsed: f32 = written(value, "").parse().unwrap();
        parsed.to_bits() == value.to_bits() || (parsed.is_nan() && value.is_nan())
    }
}

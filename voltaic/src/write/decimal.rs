use super::layout::{group_thousands, separator_count, Out};
use super::text::{sealed, Formattable};
use crate::{Decimal, Format};

// Digits of `Decimal::MAX_MANTISSA`.
const MAX_DIGITS: usize = 29;

/// Stack copy of the decimal digits of a mantissa.
struct Digits {
    buf: [u8; 40],
    len: usize,
}

impl Digits {
    fn new(value: u128) -> Option<Self> {
        let mut buf = [0u8; 40];
        let len = Out::new(&mut buf).digits(value)?;
        Some(Digits { buf, len })
    }

    fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Divides by `10^places`, rounding half away from zero.
fn round_off(mantissa: u128, places: u32) -> u128 {
    if places == 0 {
        return mantissa;
    }
    let divisor = 10u128.pow(places);
    let quotient = mantissa / divisor;
    if (mantissa % divisor) * 2 >= divisor {
        quotient + 1
    } else {
        quotient
    }
}

/// Writes `digits` as a number with `scale` fractional digits.
fn write_scaled(out: &mut Out, digits: &[u8], scale: usize, grouped: bool) -> Option<()> {
    let start = out.len();
    let int_len = if digits.len() > scale {
        out.extend(&digits[..digits.len() - scale])?;
        digits.len() - scale
    } else {
        out.push(b'0')?;
        1
    };
    if grouped {
        let grown = group_thousands(out.buf_mut(), start, int_len, 0)?;
        out.set_len(start + int_len + grown);
    }
    if scale > 0 {
        out.push(b'.')?;
        if digits.len() < scale {
            out.fill(b'0', scale - digits.len())?;
            out.extend(digits)?;
        } else {
            out.extend(&digits[digits.len() - scale..])?;
        }
    }
    Some(())
}

fn write_fixed(out: &mut Out, value: Decimal, decimals: usize, grouped: bool) -> Option<()> {
    let scale = usize::from(value.scale());
    let mantissa = if decimals < scale {
        round_off(value.mantissa(), (scale - decimals) as u32)
    } else {
        value.mantissa()
    };
    if value.is_sign_negative() && mantissa != 0 {
        out.push(b'-')?;
    }
    let digits = Digits::new(mantissa)?;
    write_scaled(out, digits.as_slice(), scale.min(decimals), grouped)?;
    if decimals > scale {
        if scale == 0 {
            out.push(b'.')?;
        }
        out.fill(b'0', decimals - scale)?;
    }
    Some(())
}

fn write_exponential(out: &mut Out, value: Decimal, decimals: usize, symbol: u8) -> Option<()> {
    if value.is_sign_negative() {
        out.push(b'-')?;
    }

    let significant = decimals + 1;
    let mut mantissa = value.mantissa();
    let mut digit_len = Digits::new(mantissa)?.len;
    let mut exponent = digit_len as i32 - 1 - i32::from(value.scale());
    if mantissa == 0 {
        exponent = 0;
    }
    if digit_len > significant {
        mantissa = round_off(mantissa, (digit_len - significant) as u32);
        digit_len = significant;
        if mantissa >= 10u128.pow(significant as u32) {
            mantissa /= 10;
            exponent += 1;
        }
    }

    let digits = Digits::new(mantissa)?;
    let digits = digits.as_slice();
    out.push(digits[0])?;
    if decimals > 0 {
        out.push(b'.')?;
        out.extend(&digits[1..])?;
        out.fill(b'0', significant - digit_len)?;
    }
    out.push(symbol)?;
    out.push(if exponent < 0 { b'-' } else { b'+' })?;
    out.padded_digits(u64::from(exponent.unsigned_abs()), 3)
}

impl sealed::Sealed for Decimal {}

impl Formattable for Decimal {
    fn max_len(format: Format) -> Option<usize> {
        match format.symbol() {
            // Either all digits with a point, or `0.` followed by the maximum scale.
            None | Some(b'G' | b'g') => Some(1 + (MAX_DIGITS + 1).max(2 + 28)),
            Some(b'F' | b'f') => {
                let decimals = format.precision_or(2);
                Some(1 + MAX_DIGITS + (decimals > 0) as usize + decimals)
            }
            Some(b'N' | b'n') => {
                let decimals = format.precision_or(2);
                Some(
                    1 + MAX_DIGITS
                        + separator_count(MAX_DIGITS)
                        + (decimals > 0) as usize
                        + decimals,
                )
            }
            Some(b'E' | b'e') => {
                let decimals = format.precision_or(6);
                Some(2 + (decimals > 0) as usize + decimals + 5)
            }
            _ => None,
        }
    }

    fn format_into(self, out: &mut [u8], format: Format) -> Option<usize> {
        let mut out = Out::new(out);
        match format.symbol() {
            None | Some(b'G' | b'g') => {
                if self.is_sign_negative() {
                    out.push(b'-')?;
                }
                let digits = Digits::new(self.mantissa())?;
                write_scaled(&mut out, digits.as_slice(), self.scale().into(), false)?;
            }
            Some(b'F' | b'f') => write_fixed(&mut out, self, format.precision_or(2), false)?,
            Some(b'N' | b'n') => write_fixed(&mut out, self, format.precision_or(2), true)?,
            Some(symbol @ (b'E' | b'e')) => {
                write_exponential(&mut out, self, format.precision_or(6), symbol)?
            }
            _ => return None,
        }
        Some(out.len())
    }
}

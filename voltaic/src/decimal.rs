use std::{fmt, str::FromStr};

use crate::{ParseDecimalError, RangeError};

/// A 96-bit decimal floating point number.
///
/// The value is `mantissa / 10^scale` with a sign, where the mantissa has at most 96 bits and the
/// scale is at most 28. The representation is kept as given, so `1.5` and `1.50` are distinct
/// values that format differently. Zero is never negative.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    mantissa: u128,
    scale: u8,
    negative: bool,
}

impl Decimal {
    /// Largest supported mantissa, `2^96 - 1`.
    pub const MAX_MANTISSA: u128 = (1 << 96) - 1;
    /// Largest supported scale.
    pub const MAX_SCALE: u8 = 28;

    /// Zero.
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
        negative: false,
    };
    /// The largest representable value, `79228162514264337593543950335`.
    pub const MAX: Decimal = Decimal {
        mantissa: Self::MAX_MANTISSA,
        scale: 0,
        negative: false,
    };
    /// The smallest representable value, `-79228162514264337593543950335`.
    pub const MIN: Decimal = Decimal {
        mantissa: Self::MAX_MANTISSA,
        scale: 0,
        negative: true,
    };

    /// Creates the decimal `mantissa / 10^scale`.
    pub fn new(mantissa: i128, scale: u8) -> Result<Self, RangeError> {
        Self::from_parts(mantissa < 0, mantissa.unsigned_abs(), scale)
    }

    /// Creates a decimal from sign, absolute mantissa and scale.
    pub fn from_parts(negative: bool, mantissa: u128, scale: u8) -> Result<Self, RangeError> {
        if mantissa > Self::MAX_MANTISSA {
            return Err(RangeError::new("decimal mantissa"));
        }
        if scale > Self::MAX_SCALE {
            return Err(RangeError::new("decimal scale"));
        }
        Ok(Decimal {
            mantissa,
            scale,
            negative: negative && mantissa != 0,
        })
    }

    /// The absolute value of the mantissa.
    #[inline]
    pub fn mantissa(self) -> u128 {
        self.mantissa
    }

    /// Number of fractional decimal digits.
    #[inline]
    pub fn scale(self) -> u8 {
        self.scale
    }

    /// Returns `true` for values less than zero.
    #[inline]
    pub fn is_sign_negative(self) -> bool {
        self.negative
    }

    /// Returns `true` if the value is zero, at any scale.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.mantissa == 0
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Parses `[+-]digits[.digits]`. Leading zeros do not count towards the 96 bit limit, trailing
    /// fractional zeros are kept as part of the scale.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let bytes = text.as_bytes();
        let (negative, digits) = match bytes.first() {
            Some(b'-') => (true, &bytes[1..]),
            Some(b'+') => (false, &bytes[1..]),
            _ => (false, bytes),
        };

        let mut mantissa: u128 = 0;
        let mut scale: u32 = 0;
        let mut seen_point = false;
        let mut seen_digit = false;

        for &byte in digits {
            match byte {
                b'0'..=b'9' => {
                    seen_digit = true;
                    mantissa = mantissa
                        .checked_mul(10)
                        .and_then(|value| value.checked_add(u128::from(byte - b'0')))
                        .filter(|&value| value <= Self::MAX_MANTISSA)
                        .ok_or(RangeError::new("decimal mantissa"))?;
                    if seen_point {
                        scale += 1;
                    }
                }
                b'.' if !seen_point => seen_point = true,
                _ => return Err(ParseDecimalError::Invalid),
            }
        }

        if !seen_digit {
            return Err(ParseDecimalError::Invalid);
        }
        let scale = u8::try_from(scale)
            .ok()
            .filter(|&scale| scale <= Self::MAX_SCALE)
            .ok_or(RangeError::new("decimal scale"))?;

        Ok(Self::from_parts(negative, mantissa, scale)?)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::write::text::display(*self, f)
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse() -> Result<(), ParseDecimalError> {
        let value: Decimal = "-12.50".parse()?;
        assert!(value.is_sign_negative());
        assert_eq!(value.mantissa(), 1250);
        assert_eq!(value.scale(), 2);

        assert_eq!("+7".parse::<Decimal>()?, Decimal::new(7, 0)?);
        assert_eq!(".5".parse::<Decimal>()?, Decimal::new(5, 1)?);
        assert_eq!(
            "79228162514264337593543950335".parse::<Decimal>()?,
            Decimal::MAX
        );
        Ok(())
    }

    #[test]
    fn negative_zero_is_zero() -> Result<(), ParseDecimalError> {
        let value: Decimal = "-0.00".parse()?;
        assert!(!value.is_sign_negative());
        assert!(value.is_zero());
        Ok(())
    }

    #[test]
    fn parse_errors() {
        assert_matches!("".parse::<Decimal>(), Err(ParseDecimalError::Invalid));
        assert_matches!("-".parse::<Decimal>(), Err(ParseDecimalError::Invalid));
        assert_matches!("1.2.3".parse::<Decimal>(), Err(ParseDecimalError::Invalid));
        assert_matches!("1e5".parse::<Decimal>(), Err(ParseDecimalError::Invalid));
        assert_matches!(
            "79228162514264337593543950336".parse::<Decimal>(),
            Err(ParseDecimalError::OutOfRange(_))
        );
        assert_matches!(
            "0.00000000000000000000000000001".parse::<Decimal>(),
            Err(ParseDecimalError::OutOfRange(_))
        );
    }

    #[test]
    fn construction_limits() {
        assert!(Decimal::new(-(Decimal::MAX_MANTISSA as i128), 28).is_ok());
        assert_matches!(
            Decimal::new(Decimal::MAX_MANTISSA as i128 + 1, 0),
            Err(RangeError {
                component: "decimal mantissa"
            })
        );
        assert_matches!(
            Decimal::new(1, 29),
            Err(RangeError {
                component: "decimal scale"
            })
        );
    }
}

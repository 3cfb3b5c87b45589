use std::{fmt, str::FromStr};

use crate::FormatError;

/// A small format code selecting the textual layout of a formatted value.
///
/// A format consists of a symbol, an ASCII letter such as `G`, `N` or `O`, and an optional
/// precision between 0 and [`MAX_PRECISION`][Self::MAX_PRECISION]. Its textual form is the symbol
/// directly followed by the precision, e.g. `N2`. The meaning of symbol and precision depends on
/// the type being formatted, see [`write::text`][crate::write::text]. The [`DEFAULT`][Self::DEFAULT]
/// format has no symbol and selects each type's default layout.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Format {
    symbol: Option<u8>,
    precision: Option<u8>,
}

impl Format {
    /// Largest supported precision.
    pub const MAX_PRECISION: u8 = 99;

    /// The default format of every type.
    pub const DEFAULT: Format = Format {
        symbol: None,
        precision: None,
    };

    /// Creates a format from a symbol and an optional precision.
    pub fn new(symbol: char, precision: Option<u8>) -> Result<Self, FormatError> {
        if !symbol.is_ascii_alphabetic() {
            return Err(FormatError::InvalidSymbol { symbol });
        }
        if let Some(precision) = precision {
            if precision > Self::MAX_PRECISION {
                return Err(FormatError::PrecisionTooLarge {
                    precision: precision.into(),
                });
            }
        }
        Ok(Format {
            symbol: Some(symbol as u8),
            precision,
        })
    }

    /// Creates a format without precision.
    ///
    /// Symbols that are not ASCII letters are not rejected here, but no formatter accepts them.
    pub const fn from_symbol(symbol: u8) -> Self {
        Format {
            symbol: Some(symbol),
            precision: None,
        }
    }

    /// Parses the textual form of a format, e.g. `"N2"`.
    ///
    /// The empty string is rejected, use [`Format::DEFAULT`] instead.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let mut chars = text.chars();
        let symbol = chars.next().ok_or(FormatError::Empty)?;
        let rest = chars.as_str();

        if rest.is_empty() {
            return Self::new(symbol, None);
        }
        if !rest.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(FormatError::InvalidPrecision {
                text: rest.to_owned(),
            });
        }
        let precision = rest
            .parse::<u32>()
            .map_err(|_| FormatError::PrecisionTooLarge {
                precision: u32::MAX,
            })?;
        if precision > Self::MAX_PRECISION.into() {
            return Err(FormatError::PrecisionTooLarge { precision });
        }
        Self::new(symbol, Some(precision as u8))
    }

    /// The format symbol, `None` for the default format.
    #[inline]
    pub fn symbol(self) -> Option<u8> {
        self.symbol
    }

    /// The requested precision, if any.
    #[inline]
    pub fn precision(self) -> Option<u8> {
        self.precision
    }

    /// Returns a copy with the given precision.
    pub fn with_precision(self, precision: u8) -> Result<Self, FormatError> {
        if precision > Self::MAX_PRECISION {
            return Err(FormatError::PrecisionTooLarge {
                precision: precision.into(),
            });
        }
        Ok(Format {
            precision: Some(precision),
            ..self
        })
    }

    #[inline]
    pub(crate) fn precision_or(self, default: u8) -> usize {
        self.precision.unwrap_or(default) as usize
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Format({})", self)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(symbol) = self.symbol {
            write!(f, "{}", symbol as char)?;
        }
        if let Some(precision) = self.precision {
            write!(f, "{}", precision)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse() -> Result<(), FormatError> {
        let format = Format::parse("N2")?;
        assert_eq!(format.symbol(), Some(b'N'));
        assert_eq!(format.precision(), Some(2));

        let format: Format = "O".parse()?;
        assert_eq!(format, Format::from_symbol(b'O'));
        assert_eq!(format.precision(), None);

        assert_eq!(Format::parse("x99")?.precision(), Some(99));
        assert_eq!(Format::parse("D007")?.precision(), Some(7));
        Ok(())
    }

    #[test]
    fn parse_errors() {
        assert_matches!(Format::parse(""), Err(FormatError::Empty));
        assert_matches!(
            Format::parse("1"),
            Err(FormatError::InvalidSymbol { symbol: '1' })
        );
        assert_matches!(
            Format::parse("N-1"),
            Err(FormatError::InvalidPrecision { .. })
        );
        assert_matches!(
            Format::parse("N100"),
            Err(FormatError::PrecisionTooLarge { precision: 100 })
        );
        assert_matches!(
            Format::parse("N99999999999"),
            Err(FormatError::PrecisionTooLarge { .. })
        );
    }

    #[test]
    fn display() -> Result<(), FormatError> {
        assert_eq!(Format::parse("E10")?.to_string(), "E10");
        assert_eq!(Format::DEFAULT.to_string(), "");
        assert_eq!(Format::from_symbol(b'G').with_precision(3)?.to_string(), "G3");
        Ok(())
    }
}

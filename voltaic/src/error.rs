use thiserror::Error;

/// An invalid textual [`Format`][crate::Format] code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The format string was empty.
    #[error("empty format string")]
    Empty,
    /// The format symbol is not an ASCII letter.
    #[error("format symbol {symbol:?} is not an ASCII letter")]
    InvalidSymbol {
        /// The offending character.
        symbol: char,
    },
    /// The characters following the symbol are not a decimal precision.
    #[error("format precision {text:?} is not a decimal number")]
    InvalidPrecision {
        /// The text following the symbol.
        text: String,
    },
    /// The precision exceeds [`Format::MAX_PRECISION`][crate::Format::MAX_PRECISION].
    #[error("format precision {precision} exceeds the maximum of 99")]
    PrecisionTooLarge {
        /// The requested precision.
        precision: u32,
    },
}

/// A component of a value lies outside of its valid range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{component} out of range")]
pub struct RangeError {
    /// Name of the offending component.
    pub component: &'static str,
}

impl RangeError {
    pub(crate) fn new(component: &'static str) -> Self {
        RangeError { component }
    }
}

/// Failure to parse a [`Decimal`][crate::Decimal] from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseDecimalError {
    /// The text contains no digits or characters other than a sign, digits and one point.
    #[error("invalid decimal literal")]
    Invalid,
    /// The value needs more than 96 bits of mantissa or more than 28 fractional digits.
    #[error(transparent)]
    OutOfRange(#[from] RangeError),
}

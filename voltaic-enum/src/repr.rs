use std::{fmt, hash::Hash};

/// Width and signedness of the integer type underlying an enum.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[allow(missing_docs)]
pub enum UnderlyingKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl UnderlyingKind {
    /// Returns `true` for the signed kinds.
    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Width in bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::I8 | Self::U8 => 8,
            Self::I16 | Self::U16 => 16,
            Self::I32 | Self::U32 => 32,
            Self::I64 | Self::U64 => 64,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Integer types that can underlie a [`MappedEnum`][crate::MappedEnum].
///
/// Signed types convert natively from and to `i64` and unsigned types from and to `u64`. The other
/// pair is derived by reinterpreting the bits, so `from_u64(v.to_u64()) == v` holds for every
/// value of every kind. Conversions from a wider integer truncate.
///
/// This trait is sealed, other integer types such as `i128` or `usize` cannot underlie an enum.
pub trait Repr:
    sealed::Sealed + Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// The runtime tag of this type.
    const KIND: UnderlyingKind;

    /// Narrows a signed 64-bit value.
    fn from_i64(value: i64) -> Self;
    /// Widens to a signed 64-bit value.
    fn to_i64(self) -> i64;
    /// Narrows an unsigned 64-bit value.
    fn from_u64(value: u64) -> Self;
    /// Widens to an unsigned 64-bit value.
    fn to_u64(self) -> u64;

    /// The value if it is not negative.
    fn non_negative(self) -> Option<u64>;
}

macro_rules! signed_repr_impl {
    ($t:ty, $kind:ident) => {
        impl sealed::Sealed for $t {}

        impl Repr for $t {
            const KIND: UnderlyingKind = UnderlyingKind::$kind;

            #[inline]
            fn from_i64(value: i64) -> Self {
                value as $t
            }

            #[inline]
            fn to_i64(self) -> i64 {
                self as i64
            }

            #[inline]
            fn from_u64(value: u64) -> Self {
                Self::from_i64(value as i64)
            }

            #[inline]
            fn to_u64(self) -> u64 {
                self.to_i64() as u64
            }

            #[inline]
            fn non_negative(self) -> Option<u64> {
                u64::try_from(self.to_i64()).ok()
            }
        }
    };
}

macro_rules! unsigned_repr_impl {
    ($t:ty, $kind:ident) => {
        impl sealed::Sealed for $t {}

        impl Repr for $t {
            const KIND: UnderlyingKind = UnderlyingKind::$kind;

            #[inline]
            fn from_i64(value: i64) -> Self {
                Self::from_u64(value as u64)
            }

            #[inline]
            fn to_i64(self) -> i64 {
                self.to_u64() as i64
            }

            #[inline]
            fn from_u64(value: u64) -> Self {
                value as $t
            }

            #[inline]
            fn to_u64(self) -> u64 {
                self as u64
            }

            #[inline]
            fn non_negative(self) -> Option<u64> {
                Some(self.to_u64())
            }
        }
    };
}

signed_repr_impl!(i8, I8);
signed_repr_impl!(i16, I16);
signed_repr_impl!(i32, I32);
signed_repr_impl!(i64, I64);
unsigned_repr_impl!(u8, U8);
unsigned_repr_impl!(u16, U16);
unsigned_repr_impl!(u32, U32);
unsigned_repr_impl!(u64, U64);

//! Integer and text key conversions for enumerated types.
//!
//! A type opts in by implementing [`MappedEnum`], which declares its underlying integer type, its
//! enumerators with their optional keys and whether it is a string enum or a flags enum. The
//! [`EnumMap`] of a type is built from this declaration on first use and shared for the rest of the
//! process. It converts values from and to 64-bit integers regardless of the underlying width, and
//! from and to text keys in UTF-8 or UTF-16.
//!
//! ```rust
//! use voltaic_enum::{enum_map, Direction, Enumerator, MappedEnum};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! struct Color(u8);
//!
//! impl MappedEnum for Color {
//!     type Repr = u8;
//!
//!     fn enumerators() -> Vec<Enumerator<Self>> {
//!         vec![
//!             Enumerator::new("Red", Color(0)).key("red", Direction::Both),
//!             Enumerator::new("Green", Color(1)),
//!         ]
//!     }
//!
//!     fn from_repr(repr: u8) -> Self {
//!         Color(repr)
//!     }
//!
//!     fn to_repr(self) -> u8 {
//!         self.0
//!     }
//! }
//!
//! let map = enum_map::<Color>().unwrap();
//! assert_eq!(map.to_utf8_key(Color(0)).as_str(), "red");
//! assert_eq!(map.to_utf8_key(Color(1)).as_str(), "Green");
//! assert_eq!(map.try_from_key(b"red"), Some(Color(0)));
//! assert_eq!(map.from_i64(1), Color(1));
//! ```
#![warn(missing_docs)]

mod enum_map;
mod error;
mod registry;
mod repr;

pub use enum_map::{Direction, EnumMap, Enumerator, MappedEnum};
pub use error::EnumMapError;
pub use repr::{Repr, UnderlyingKind};

/// Returns the shared [`EnumMap`] of `E`, see [`EnumMap::get`].
#[inline]
pub fn enum_map<E: MappedEnum>() -> Result<&'static EnumMap<E>, EnumMapError> {
    EnumMap::get()
}

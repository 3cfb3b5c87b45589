//! Voltaic is the allocation-free formatting core of a text serializer.
//!
//! Serialized output is produced into a [`ResizableBuffer`], a growable byte buffer that hands out
//! write windows of a requested size. Each formatter in [`write::text`] reserves the worst-case
//! length of the value it is about to write, formats directly into the reserved bytes and commits
//! exactly what it produced. Apart from growing the buffer, writing a value never allocates.
//!
//! The crate also provides the value types that have no direct counterpart among Rust's primitive
//! types ([`Decimal`], [`DateTime`], [`DateTimeOffset`] and [`TimeSpan`]), a UTF-8 text blob with a
//! lazily computed UTF-16 form ([`Utf8Blob`]) and a map keyed by byte content ([`ContentMap`]).
//!
//! ```rust
//! use voltaic::{write::text::try_write, Format, ResizableBuffer};
//!
//! let mut buffer = ResizableBuffer::new();
//! assert!(try_write(&mut buffer, -1234i32, Format::DEFAULT));
//! buffer.write_all(b" ");
//! assert!(try_write(&mut buffer, 1234.5f64, "N1".parse().unwrap()));
//! assert_eq!(buffer.finalize(), b"-1234 1,234.5");
//! ```

#![warn(missing_docs)]
mod blob;
mod content_map;
pub mod datetime;
mod decimal;
mod error;
mod format;
mod resizable_buffer;
pub mod write;

pub use blob::Utf8Blob;
pub use content_map::ContentMap;
pub use datetime::{DateTime, DateTimeOffset, TimeSpan};
pub use decimal::Decimal;
pub use error::{FormatError, ParseDecimalError, RangeError};
pub use format::Format;
pub use resizable_buffer::{Config, Reservation, ResizableBuffer};

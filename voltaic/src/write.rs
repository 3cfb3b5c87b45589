//! Formatting values into a [`ResizableBuffer`][crate::ResizableBuffer].
//!
//! See [`text`] for the supported types and formats.
mod datetime;
mod decimal;
mod float;
mod layout;
pub mod text;

//! Owned files: opening with typed options, positioning, resizing and closing, plus convenience
//! methods that route reads and writes through the [transfer engine](crate::fs::transfer) and
//! flushes through the [durability controller](crate::fs::sync).
//!
//! # Access Mode
//! A [`File`] carries the mode it was opened with as a type parameter ([`ReadOnly`],
//! [`WriteOnly`] or [`ReadWrite`]), so reading from a write-only file or resizing a read-only one
//! doesn't compile.

mod access;
mod error;
mod file;
mod options;

pub use access::*;
pub use error::*;
pub use file::*;
pub use options::*;

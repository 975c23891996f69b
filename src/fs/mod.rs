//! Thin, strongly typed wrappers around Linux file descriptors, built around an exact-count
//! transfer engine.
//!
//! The module is split in three layers:
//! - [`transfer`] moves exactly N bytes between a buffer and a descriptor, absorbing partial
//!   transfers and signal interruptions.
//! - [`sync`] forces transferred data to stable storage, falling back from a data-only flush to a
//!   full one where the descriptor doesn't support the cheaper variant.
//! - [`file`] owns descriptors: opening, closing, seeking, resizing and the convenience methods
//!   that route through the two layers above.
//!
//! Both engines talk to descriptors only through the [`RawIo`] and [`RawSync`] traits, which are
//! implemented for this crate's [`Fd`] and [`File`](file::File) as well as for
//! [`std::fs::File`] and [`BorrowedFd`](std::os::fd::BorrowedFd).
#![cfg(target_os = "linux")]

pub mod file;
pub mod sync;
pub mod transfer;

mod errno;
mod error;
mod fd;
mod raw;
mod syscall;

pub use errno::*;
pub use error::*;
pub use fd::*;
pub use raw::*;

pub use file::File;
pub use sync::{DurabilityRequest, SyncStrength, flush};
pub use transfer::{TransferRequest, TransferResult, TransferStatus, transfer};

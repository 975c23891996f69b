//! Exact-count file I/O on top of raw POSIX descriptors.
//!
//! # Purpose
//! A single `read(2)` or `write(2)` is allowed to move fewer bytes than it was asked to, to be
//! interrupted by a signal before moving anything, to report end-of-file as a zero count or to
//! refuse to block on a non-blocking descriptor. Handling all of that correctly at every call site
//! is tedious and easy to get wrong, so this crate does it once: [`fs::transfer`] moves exactly N
//! bytes (or explains precisely why it could not) and [`fs::sync`] makes the result durable.
//!
//! # Method
//! Every syscall is wrapped by a thin function in the `fs` module that returns its own
//! [`Errno`](fs::Errno) as a value. Nothing else in the crate looks at the thread-local `errno`,
//! so an intervening call can never clobber the error that is being inspected.
//!
//! # Error Handling
//! Errors are strongly typed and statically dispatched: each cause is a (usually zero-sized)
//! struct that implements [`Error`](std::error::Error), and each operation returns an enum of only
//! the causes it can actually produce. Every error also reports its
//! [`ErrorClass`](fs::ErrorClass), which tells the caller whether it is looking at a bug in its own
//! usage, a would-block condition it may retry later, or a fatal failure. Interruption by a signal
//! is never an error: the engine retries it internally.
//!
//! # Dependencies
//! The [`fs`] module relies on `libc` for its syscall wrappers and on `tracing` for diagnostics.
//! Errors use `derive_more` to avoid some very repetitive `Display`/`From` implementations.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

#[cfg(feature = "fs")]
pub mod fs;

pub(crate) mod util;

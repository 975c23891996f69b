//! The durability controller: an optional step after a transfer that makes its data survive a
//! crash.

mod sync;
mod tests;

pub use sync::*;

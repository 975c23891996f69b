//! The exact-count transfer engine.
//!
//! A [`TransferRequest`] names a descriptor, a direction and a region of a caller-owned buffer.
//! [`transfer`] loops over primitive calls until the region has been moved, the stream has ended
//! or a non-retriable error occurs, and reports the outcome as a [`TransferResult`].
//!
//! ```no_run
//! use exact_io::fs::{File, TransferRequest, transfer};
//!
//! let file = File::options().read_only().open("/etc/hostname").unwrap();
//! let mut buf = [0_u8; 64];
//! let result = transfer(TransferRequest::read(&file, &mut buf));
//! println!("{} bytes, {:?}", result.bytes_transferred, result.status);
//! ```

mod engine;
mod error;
mod request;
mod result;
mod tests;

pub use engine::*;
pub use error::*;
pub use request::*;
pub use result::*;

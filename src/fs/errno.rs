use std::fmt::{self, Display, Formatter};
use std::io;

use libc::c_int;

/// An error code returned by a single primitive call.
///
/// Wrappers capture this immediately after the failing call and hand it back as a value, so it
/// can't be overwritten by whatever runs next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Errno(pub c_int);

impl Errno {
    /// Reads the calling thread's last OS error. Only meaningful directly after a call that
    /// reported failure.
    pub(crate) fn last() -> Errno {
        // raw_os_error is always Some when constructed from last_os_error.
        Errno(io::Error::last_os_error().raw_os_error().unwrap_or(0))
    }

    pub const fn code(self) -> c_int {
        self.0
    }
}

impl Display for Errno {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (os error {})", io::Error::from_raw_os_error(self.0).kind(), self.0)
    }
}

impl From<Errno> for io::Error {
    fn from(value: Errno) -> Self {
        io::Error::from_raw_os_error(value.0)
    }
}

/// The class of an error, which determines what a caller may do about it.
///
/// Interruptions without progress are retried internally and never surface as a value, so there
/// is no class for them here. End-of-stream is a [`TransferStatus`](super::TransferStatus), not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A violated precondition: bad descriptor, bad buffer, out-of-range count or argument. Never
    /// retried; the caller has a bug.
    Usage,
    /// A non-blocking descriptor had nothing ready. The caller decides when to try again.
    WouldBlock,
    /// The operation failed and reissuing it is unlikely to help.
    Fatal,
}

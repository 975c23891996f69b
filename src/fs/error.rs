use derive_more::{Display, Error};

use super::{ErrorClass, Errno};

/// Implemented by every error in this module and by each operation's error union.
pub trait Classify {
    fn class(&self) -> ErrorClass;
}

macro_rules! cause {
    ($name:ident, $class:ident, $msg:tt) => {
        #[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
        #[display($msg)]
        pub struct $name;

        impl Classify for $name {
            fn class(&self) -> ErrorClass {
                ErrorClass::$class
            }
        }
    };
}

/// Forwards [`Classify`] through every variant of an error union.
macro_rules! classify_union {
    ($union:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::fs::Classify for $union {
            fn class(&self) -> $crate::fs::ErrorClass {
                match self {
                    $(Self::$variant(e) => $crate::fs::Classify::class(e),)+
                }
            }
        }
    };
}

pub(crate) use classify_union;

// Usage: the caller broke a precondition.
cause!(BadFdError, Usage, "file descriptor is not open or not valid for this operation");
cause!(BadBufferError, Usage, "buffer lies outside the accessible address space");
cause!(InvalidArgumentError, Usage, "invalid argument for this descriptor");
cause!(CountOverflowError, Usage, "requested byte count exceeds the single-call limit");
cause!(RegionError, Usage, "requested region does not fit within the buffer");
cause!(OffsetOverflowError, Usage, "resulting file offset can't be represented");
cause!(NotSeekableError, Usage, "descriptor does not support positioning");
cause!(IsDirectoryError, Usage, "descriptor refers to a directory");

// Would-block: retry is the caller's decision.
cause!(WouldBlockError, WouldBlock, "operation would block but the descriptor is non-blocking");

// Fatal.
cause!(InterruptError, Fatal, "interrupted by signal");
cause!(IOError, Fatal, "error during I/O");
cause!(StorageExhaustedError, Fatal, "available storage space exhausted");
cause!(FileTooLargeError, Fatal, "file would exceed the maximum allowed size");
cause!(BrokenPipeError, Fatal, "reading end of the pipe or socket is closed");
cause!(WriteZeroError, Fatal, "descriptor accepted zero bytes of a non-empty write");
cause!(SyncUnsupportedError, Fatal, "sync not supported by file");
cause!(MetadataOverflowError, Fatal, "file metadata would overflow capacity");
cause!(OOMError, Fatal, "out of memory");
cause!(FileCountError, Fatal, "exceeded open file limit");
cause!(NotFoundError, Fatal, "a component of the provided path does not exist");
cause!(PermissionError, Fatal, "permission denied");
cause!(AlreadyExistsError, Fatal, "file already exists");
cause!(ReadOnlyFSError, Fatal, "file system is read-only");

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("unexpected OS error: {_0}")]
pub struct UnexpectedError(#[error(not(source))] pub Errno);

impl Classify for UnexpectedError {
    fn class(&self) -> ErrorClass {
        ErrorClass::Fatal
    }
}

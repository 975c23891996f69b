use derive_more::{Display, Error, From, IsVariant};
use libc::{EAGAIN, EBADF, EDQUOT, EFAULT, EFBIG, EINTR, EINVAL, EIO, EISDIR, ENOSPC, EOVERFLOW, EPIPE, ESPIPE};

use crate::fs::error::classify_union;
use crate::fs::*;

/// Why a transfer stopped before moving every requested byte.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum TransferError {
    // Usage
    BadFd(BadFdError),
    BadBuffer(BadBufferError),
    InvalidArgument(InvalidArgumentError),
    CountOverflow(CountOverflowError),
    Region(RegionError),
    OffsetOverflow(OffsetOverflowError),
    NotSeekable(NotSeekableError),
    IsDirectory(IsDirectoryError),
    // Would-block
    WouldBlock(WouldBlockError),
    // Fatal
    IO(IOError),
    StorageExhausted(StorageExhaustedError),
    FileTooLarge(FileTooLargeError),
    BrokenPipe(BrokenPipeError),
    WriteZero(WriteZeroError),
    Unexpected(UnexpectedError),
}

classify_union!(TransferError {
    BadFd, BadBuffer, InvalidArgument, CountOverflow, Region, OffsetOverflow, NotSeekable,
    IsDirectory, WouldBlock, IO, StorageExhausted, FileTooLarge, BrokenPipe, WriteZero, Unexpected,
});

/// What the engine does with a failed primitive call.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// Interrupted before moving anything: reissue the same call.
    Retry,
    Stop(TransferError),
}

impl Disposition {
    pub(crate) fn of(error: Errno) -> Disposition {
        if error.code() == EINTR {
            return Disposition::Retry;
        }
        Disposition::Stop(match error.code() {
            EAGAIN =>          WouldBlockError.into(),
            EBADF =>           BadFdError.into(),
            EFAULT =>          BadBufferError.into(),
            EINVAL =>          InvalidArgumentError.into(),
            EOVERFLOW =>       OffsetOverflowError.into(),
            ESPIPE =>          NotSeekableError.into(),
            EISDIR =>          IsDirectoryError.into(),
            EIO =>             IOError.into(),
            ENOSPC | EDQUOT => StorageExhaustedError.into(),
            EFBIG =>           FileTooLargeError.into(),
            EPIPE =>           BrokenPipeError.into(),
            _ =>               UnexpectedError(error).into(),
        })
    }
}

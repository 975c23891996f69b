use derive_more::{Display, Error, From, IsVariant};
use libc::{EBADF, EDQUOT, EINTR, EINVAL, EIO, ENOSPC, ENOTSUP, EROFS};
use tracing::debug;

use crate::fs::error::classify_union;
use crate::fs::{
    BadFdError, Errno, IOError, InterruptError, RawSync, StorageExhaustedError,
    SyncUnsupportedError, UnexpectedError,
};

/// How much of a file's state a flush forces to stable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrength {
    /// Data and all metadata (`fsync`).
    Full,
    /// Data and only the metadata needed to read it back (`fdatasync`).
    DataOnly,
}

/// A request to make everything written through `fd` so far durable.
#[derive(Debug)]
pub struct DurabilityRequest<'a, D: ?Sized> {
    pub fd: &'a D,
    pub strength: SyncStrength,
}

impl<'a, D: ?Sized> DurabilityRequest<'a, D> {
    pub const fn full(fd: &'a D) -> DurabilityRequest<'a, D> {
        DurabilityRequest {
            fd,
            strength: SyncStrength::Full,
        }
    }

    pub const fn data_only(fd: &'a D) -> DurabilityRequest<'a, D> {
        DurabilityRequest {
            fd,
            strength: SyncStrength::DataOnly,
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum SyncError {
    BadFd(BadFdError),
    Interrupt(InterruptError),
    IO(IOError),
    StorageExhausted(StorageExhaustedError),
    SyncUnsupported(SyncUnsupportedError),
    Unexpected(UnexpectedError),
}

classify_union!(SyncError { BadFd, Interrupt, IO, StorageExhausted, SyncUnsupported, Unexpected });

impl SyncError {
    pub(crate) fn interpret_raw_error(error: Errno) -> SyncError {
        match error.code() {
            EBADF =>                   BadFdError.into(),
            EINTR =>                   InterruptError.into(),
            EIO =>                     IOError.into(),
            EROFS | EINVAL | ENOTSUP => SyncUnsupportedError.into(),
            ENOSPC | EDQUOT =>         StorageExhaustedError.into(),
            _ =>                       UnexpectedError(error).into(),
        }
    }
}

/// Forces data previously written through the descriptor to stable storage.
///
/// A [`DataOnly`](SyncStrength::DataOnly) flush on a descriptor that doesn't support it is
/// upgraded to a [`Full`](SyncStrength::Full) one, which is a strictly stronger substitute. That is
/// the only fallback: every other failure, including an interruption, is returned as is and never
/// retried, since reissuing a failed flush establishes nothing about the data it was meant to
/// cover.
pub fn flush<D: RawSync + ?Sized>(request: DurabilityRequest<'_, D>) -> Result<(), SyncError> {
    let DurabilityRequest { fd, strength } = request;

    match fd.sync_raw(strength).map_err(SyncError::interpret_raw_error) {
        Err(SyncError::SyncUnsupported(_)) if strength == SyncStrength::DataOnly => {
            debug!("data-only sync unsupported by descriptor, falling back to full sync");
            fd.sync_raw(SyncStrength::Full).map_err(SyncError::interpret_raw_error)
        },
        Err(error) => {
            debug!(?strength, %error, "sync failed");
            Err(error)
        },
        Ok(()) => Ok(()),
    }
}

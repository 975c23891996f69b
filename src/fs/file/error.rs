use std::string::FromUtf8Error;

use derive_more::{Display, Error, From, IsVariant};
use libc::{
    EACCES, EBADF, EDQUOT, EEXIST, EFBIG, EINVAL, EIO, EISDIR, EMFILE, ENAMETOOLONG, ENFILE, ENOENT,
    ENOSPC, ENOTDIR, EOVERFLOW, EPERM, EROFS, ESPIPE, ELOOP,
};

use crate::fs::error::classify_union;
use crate::fs::transfer::TransferError;
use crate::fs::*;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum OpenError {
    NotFound(NotFoundError),
    Permission(PermissionError),
    AlreadyExists(AlreadyExistsError),
    IsDirectory(IsDirectoryError),
    InvalidArgument(InvalidArgumentError),
    FileCount(FileCountError),
    StorageExhausted(StorageExhaustedError),
    ReadOnlyFS(ReadOnlyFSError),
    Other(UnexpectedError),
}

classify_union!(OpenError {
    NotFound, Permission, AlreadyExists, IsDirectory, InvalidArgument, FileCount,
    StorageExhausted, ReadOnlyFS, Other,
});

impl OpenError {
    pub(crate) fn interpret_raw_error(error: Errno) -> OpenError {
        match error.code() {
            ENOENT | ENOTDIR =>         NotFoundError.into(),
            EACCES | EPERM =>           PermissionError.into(),
            EEXIST =>                   AlreadyExistsError.into(),
            EISDIR =>                   IsDirectoryError.into(),
            EINVAL | ENAMETOOLONG | ELOOP => InvalidArgumentError.into(),
            EMFILE | ENFILE =>          FileCountError.into(),
            ENOSPC | EDQUOT =>          StorageExhaustedError.into(),
            EROFS =>                    ReadOnlyFSError.into(),
            _ =>                        UnexpectedError(error).into(),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum SeekError {
    BadFd(BadFdError),
    InvalidArgument(InvalidArgumentError),
    OffsetOverflow(OffsetOverflowError),
    NotSeekable(NotSeekableError),
    Unexpected(UnexpectedError),
}

classify_union!(SeekError { BadFd, InvalidArgument, OffsetOverflow, NotSeekable, Unexpected });

impl SeekError {
    pub(crate) fn interpret_raw_error(error: Errno) -> SeekError {
        match error.code() {
            EBADF =>     BadFdError.into(),
            EINVAL =>    InvalidArgumentError.into(),
            EOVERFLOW => OffsetOverflowError.into(),
            ESPIPE =>    NotSeekableError.into(),
            _ =>         UnexpectedError(error).into(),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum ResizeError {
    BadFd(BadFdError),
    InvalidArgument(InvalidArgumentError),
    NotFound(NotFoundError),
    Permission(PermissionError),
    IsDirectory(IsDirectoryError),
    ReadOnlyFS(ReadOnlyFSError),
    FileTooLarge(FileTooLargeError),
    IO(IOError),
    Unexpected(UnexpectedError),
}

classify_union!(ResizeError {
    BadFd, InvalidArgument, NotFound, Permission, IsDirectory, ReadOnlyFS, FileTooLarge, IO,
    Unexpected,
});

impl ResizeError {
    pub(crate) fn interpret_raw_error(error: Errno) -> ResizeError {
        match error.code() {
            EBADF =>            BadFdError.into(),
            EINVAL =>           InvalidArgumentError.into(),
            ENOENT | ENOTDIR => NotFoundError.into(),
            EACCES | EPERM =>   PermissionError.into(),
            EISDIR =>           IsDirectoryError.into(),
            EROFS =>            ReadOnlyFSError.into(),
            EFBIG =>            FileTooLargeError.into(),
            EIO =>              IOError.into(),
            _ =>                UnexpectedError(error).into(),
        }
    }
}

/// A whole-file read that stopped before end-of-stream.
///
/// `bytes` holds everything taken from the descriptor before the failure. On a pipe or a
/// non-blocking descriptor those bytes can't be read again, so they travel with the error.
#[derive(Debug, Display, Clone, PartialEq, Eq, Error)]
#[display("{error} after reading {} bytes", bytes.len())]
pub struct PartialReadError {
    pub bytes: Vec<u8>,
    #[error(source)]
    pub error: TransferError,
}

impl Classify for PartialReadError {
    fn class(&self) -> ErrorClass {
        self.error.class()
    }
}

/// Reading a whole file into a string can fail in the transfer or in decoding. Either way the
/// bytes read are kept: [`FromUtf8Error::into_bytes`] recovers them from a decoding failure.
#[derive(Debug, Display, Clone, PartialEq, Eq, From, Error, IsVariant)]
pub enum ReadStringError {
    Read(PartialReadError),
    Utf8(FromUtf8Error),
}

impl Classify for ReadStringError {
    fn class(&self) -> ErrorClass {
        match self {
            ReadStringError::Read(e) => e.class(),
            ReadStringError::Utf8(_) => ErrorClass::Fatal,
        }
    }
}

use std::fmt::{self, Debug, Formatter};
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::os::fd::{AsRawFd, BorrowedFd, AsFd, RawFd};

use derive_more::{Display, Error, From, IsVariant};
use libc::{EBADF, EDQUOT, EFAULT, EINTR, EIO, ENOMEM, ENOSPC, EOVERFLOW, O_NONBLOCK, c_int};

use super::error::classify_union;
use super::raw::impl_raw_for_fd;
use super::{
    BadFdError, BadBufferError, IOError, InterruptError, InvalidArgumentError, MetadataOverflowError,
    OOMError, StorageExhaustedError, UnexpectedError, syscall,
};

/// An owned file descriptor. Closed when dropped.
pub struct Fd(pub(crate) c_int);

impl Fd {
    /// Takes ownership of a raw descriptor.
    ///
    /// # Safety
    /// `raw` must be an open descriptor that nothing else will close.
    pub const unsafe fn from_raw(raw: RawFd) -> Fd {
        Fd(raw)
    }

    pub fn metadata(&self) -> Result<Metadata, MetadataError> {
        match syscall::fstat(self.0) {
            Ok(raw) => Ok(Metadata::from_stat(&raw)),
            Err(e) => Err(match e.code() {
                EBADF =>     BadFdError.into(),
                EFAULT =>    BadBufferError.into(),
                ENOMEM =>    OOMError.into(),
                EOVERFLOW => MetadataOverflowError.into(),
                _ =>         UnexpectedError(e).into(),
            }),
        }
    }

    /// Switches the descriptor between blocking and non-blocking mode. In non-blocking mode a
    /// transfer that can't make progress returns
    /// [`WouldBlock`](super::transfer::TransferError::WouldBlock) instead of waiting.
    pub fn set_nonblocking(&self, value: bool) -> Result<(), FlagsError> {
        let flags = syscall::get_status_flags(self.0).map_err(FlagsError::interpret_raw_error)?;
        let updated = if value { flags | O_NONBLOCK } else { flags & !O_NONBLOCK };
        if updated != flags {
            syscall::set_status_flags(self.0, updated).map_err(FlagsError::interpret_raw_error)?;
        }
        Ok(())
    }

    pub fn is_nonblocking(&self) -> Result<bool, FlagsError> {
        let flags = syscall::get_status_flags(self.0).map_err(FlagsError::interpret_raw_error)?;
        Ok(flags & O_NONBLOCK != 0)
    }

    /// Closes the descriptor, reporting any error. The descriptor is released whatever the
    /// outcome, so it is never closed a second time on drop.
    pub fn close(self) -> Result<(), CloseError> {
        let this = ManuallyDrop::new(self);
        syscall::close(this.0).map_err(CloseError::interpret_raw_error)
    }

    /// Gives up ownership without closing.
    pub fn into_raw(self) -> RawFd {
        ManuallyDrop::new(self).0
    }
}

impl Deref for Fd {
    type Target = c_int;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRawFd for Fd {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

impl AsFd for Fd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        // SAFETY: self.0 stays open for as long as self is borrowed.
        unsafe { BorrowedFd::borrow_raw(self.0) }
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        if let Err(e) = syscall::close(self.0) {
            tracing::warn!(
                fd = self.0,
                error = %CloseError::interpret_raw_error(e),
                "error while dropping file descriptor"
            );
        }
    }
}

impl Debug for Fd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Fd({})", self.0)
    }
}

impl_raw_for_fd!(Fd);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum CloseError {
    BadFd(BadFdError),
    Interrupt(InterruptError),
    IO(IOError),
    StorageExhausted(StorageExhaustedError),
    Unexpected(UnexpectedError),
}

classify_union!(CloseError { BadFd, Interrupt, IO, StorageExhausted, Unexpected });

impl CloseError {
    pub(crate) fn interpret_raw_error(error: super::Errno) -> CloseError {
        match error.code() {
            EBADF =>           BadFdError.into(),
            EINTR =>           InterruptError.into(),
            EIO =>             IOError.into(),
            ENOSPC | EDQUOT => StorageExhaustedError.into(),
            _ =>               UnexpectedError(error).into(),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum FlagsError {
    BadFd(BadFdError),
    InvalidArgument(InvalidArgumentError),
    Unexpected(UnexpectedError),
}

classify_union!(FlagsError { BadFd, InvalidArgument, Unexpected });

impl FlagsError {
    pub(crate) fn interpret_raw_error(error: super::Errno) -> FlagsError {
        match error.code() {
            EBADF =>         BadFdError.into(),
            libc::EINVAL =>  InvalidArgumentError.into(),
            _ =>             UnexpectedError(error).into(),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum MetadataError {
    BadFd(BadFdError),
    BadBuffer(BadBufferError),
    OOM(OOMError),
    MetadataOverflow(MetadataOverflowError),
    Unexpected(UnexpectedError),
}

classify_union!(MetadataError { BadFd, BadBuffer, OOM, MetadataOverflow, Unexpected });

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    BlockDevice,
    CharDevice,
    Directory,
    Fifo,
    Symlink,
    Regular,
    Socket,
    Other,
}

impl FileType {
    pub(crate) const fn from_stat_mode(st_mode: u32) -> FileType {
        match st_mode & libc::S_IFMT {
            libc::S_IFBLK =>  FileType::BlockDevice,
            libc::S_IFCHR =>  FileType::CharDevice,
            libc::S_IFDIR =>  FileType::Directory,
            libc::S_IFIFO =>  FileType::Fifo,
            libc::S_IFLNK =>  FileType::Symlink,
            libc::S_IFREG =>  FileType::Regular,
            libc::S_IFSOCK => FileType::Socket,
            _ =>              FileType::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Metadata {
    pub size: u64,            // st_size
    pub file_type: FileType,  // st_mode
    pub mode: u32,            // st_mode & 0o7777
    pub block_size: u64,      // st_blksize
    pub blocks: u64,          // st_blocks
}

impl Metadata {
    #[allow(clippy::unnecessary_cast)]
    pub(crate) const fn from_stat(raw: &libc::stat) -> Metadata {
        Metadata {
            size: raw.st_size as u64,
            file_type: FileType::from_stat_mode(raw.st_mode),
            mode: raw.st_mode & 0o7777,
            block_size: raw.st_blksize as u64,
            blocks: raw.st_blocks as u64,
        }
    }
}

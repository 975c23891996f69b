use std::os::fd::BorrowedFd;

use libc::{c_int, off_t};

use super::{Errno, syscall};
use crate::fs::sync::SyncStrength;

/// The primitive transfer calls the [transfer engine](super::transfer) is built on.
///
/// Each method performs exactly one call and reports its outcome: a byte count (possibly short,
/// possibly zero) or the error code of that call. Implementations must not retry, loop or
/// interpret error codes; that is the engine's job.
///
/// Methods take `&self` because descriptors are shared handles. Positional methods don't use or
/// change the descriptor's position, so they may run concurrently on disjoint ranges.
pub trait RawIo {
    fn read_raw(&self, buf: &mut [u8]) -> Result<usize, Errno>;

    fn write_raw(&self, buf: &[u8]) -> Result<usize, Errno>;

    fn read_raw_at(&self, buf: &mut [u8], offset: u64) -> Result<usize, Errno>;

    fn write_raw_at(&self, buf: &[u8], offset: u64) -> Result<usize, Errno>;
}

/// The primitive flush call the [durability controller](super::sync) is built on.
pub trait RawSync {
    fn sync_raw(&self, strength: SyncStrength) -> Result<(), Errno>;
}

pub(crate) fn to_off(offset: u64) -> Result<off_t, Errno> {
    off_t::try_from(offset).map_err(|_| Errno(libc::EOVERFLOW))
}

/// Implements [`RawIo`] and [`RawSync`] for a descriptor type through its raw fd.
///
/// Generic types list their parameters in brackets first: `impl_raw_for_fd!([<'a>] BorrowedFd<'a>)`.
macro_rules! impl_raw_for_fd {
    ($ty:ident) => {
        $crate::fs::raw::impl_raw_for_fd!([] $ty);
    };
    ([$($gen:tt)*] $ty:ty) => {
        impl$($gen)* $crate::fs::RawIo for $ty {
            fn read_raw(&self, buf: &mut [u8]) -> Result<usize, $crate::fs::Errno> {
                $crate::fs::raw::read_fd(::std::os::fd::AsRawFd::as_raw_fd(self), buf)
            }

            fn write_raw(&self, buf: &[u8]) -> Result<usize, $crate::fs::Errno> {
                $crate::fs::raw::write_fd(::std::os::fd::AsRawFd::as_raw_fd(self), buf)
            }

            fn read_raw_at(&self, buf: &mut [u8], offset: u64) -> Result<usize, $crate::fs::Errno> {
                $crate::fs::raw::read_fd_at(::std::os::fd::AsRawFd::as_raw_fd(self), buf, offset)
            }

            fn write_raw_at(&self, buf: &[u8], offset: u64) -> Result<usize, $crate::fs::Errno> {
                $crate::fs::raw::write_fd_at(::std::os::fd::AsRawFd::as_raw_fd(self), buf, offset)
            }
        }

        impl$($gen)* $crate::fs::RawSync for $ty {
            fn sync_raw(
                &self,
                strength: $crate::fs::SyncStrength,
            ) -> Result<(), $crate::fs::Errno> {
                $crate::fs::raw::sync_fd(::std::os::fd::AsRawFd::as_raw_fd(self), strength)
            }
        }
    };
}

pub(crate) use impl_raw_for_fd;

pub(crate) fn read_fd(fd: c_int, buf: &mut [u8]) -> Result<usize, Errno> {
    tracing::trace!(fd, len = buf.len(), "read");
    syscall::read(fd, buf)
}

pub(crate) fn write_fd(fd: c_int, buf: &[u8]) -> Result<usize, Errno> {
    tracing::trace!(fd, len = buf.len(), "write");
    syscall::write(fd, buf)
}

pub(crate) fn read_fd_at(fd: c_int, buf: &mut [u8], offset: u64) -> Result<usize, Errno> {
    tracing::trace!(fd, len = buf.len(), offset, "pread");
    syscall::pread(fd, buf, to_off(offset)?)
}

pub(crate) fn write_fd_at(fd: c_int, buf: &[u8], offset: u64) -> Result<usize, Errno> {
    tracing::trace!(fd, len = buf.len(), offset, "pwrite");
    syscall::pwrite(fd, buf, to_off(offset)?)
}

pub(crate) fn sync_fd(fd: c_int, strength: SyncStrength) -> Result<(), Errno> {
    tracing::trace!(fd, ?strength, "sync");
    match strength {
        SyncStrength::Full => syscall::fsync(fd),
        SyncStrength::DataOnly => syscall::fdatasync(fd),
    }
}

impl_raw_for_fd!([] std::fs::File);
impl_raw_for_fd!([<'a>] BorrowedFd<'a>);

//! One wrapper per primitive. Each returns its outcome directly, with the error code captured
//! before anything else can run.

use std::ffi::CStr;

use libc::{c_int, mode_t, off_t, stat};

use super::Errno;

#[inline]
fn check_count(ret: isize) -> Result<usize, Errno> {
    match ret {
        -1 => Err(Errno::last()),
        count => Ok(count as usize),
    }
}

#[inline]
fn check_unit(ret: c_int) -> Result<(), Errno> {
    match ret {
        -1 => Err(Errno::last()),
        _ => Ok(()),
    }
}

pub(crate) fn read(fd: c_int, buf: &mut [u8]) -> Result<usize, Errno> {
    // SAFETY: The pointer and length come from a live mutable slice.
    check_count(unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) })
}

pub(crate) fn pread(fd: c_int, buf: &mut [u8], offset: off_t) -> Result<usize, Errno> {
    // SAFETY: The pointer and length come from a live mutable slice.
    check_count(unsafe { libc::pread(fd, buf.as_mut_ptr().cast(), buf.len(), offset) })
}

pub(crate) fn write(fd: c_int, buf: &[u8]) -> Result<usize, Errno> {
    // SAFETY: The pointer and length come from a live slice.
    check_count(unsafe { libc::write(fd, buf.as_ptr().cast(), buf.len()) })
}

pub(crate) fn pwrite(fd: c_int, buf: &[u8], offset: off_t) -> Result<usize, Errno> {
    // SAFETY: The pointer and length come from a live slice.
    check_count(unsafe { libc::pwrite(fd, buf.as_ptr().cast(), buf.len(), offset) })
}

pub(crate) fn fsync(fd: c_int) -> Result<(), Errno> {
    // SAFETY: No memory is passed to the kernel.
    check_unit(unsafe { libc::fsync(fd) })
}

pub(crate) fn fdatasync(fd: c_int) -> Result<(), Errno> {
    // SAFETY: No memory is passed to the kernel.
    check_unit(unsafe { libc::fdatasync(fd) })
}

pub(crate) fn open(path: &CStr, flags: c_int, mode: mode_t) -> Result<c_int, Errno> {
    // SAFETY: path is a valid nul-terminated string for the duration of the call.
    match unsafe { libc::open(path.as_ptr(), flags, mode as libc::c_uint) } {
        -1 => Err(Errno::last()),
        fd => Ok(fd),
    }
}

pub(crate) fn close(fd: c_int) -> Result<(), Errno> {
    // SAFETY: close releases fd whatever the outcome; callers never use it again.
    check_unit(unsafe { libc::close(fd) })
}

pub(crate) fn lseek(fd: c_int, offset: off_t, whence: c_int) -> Result<u64, Errno> {
    // SAFETY: No memory is passed to the kernel.
    match unsafe { libc::lseek(fd, offset, whence) } {
        -1 => Err(Errno::last()),
        pos => Ok(pos as u64),
    }
}

pub(crate) fn ftruncate(fd: c_int, len: off_t) -> Result<(), Errno> {
    // SAFETY: No memory is passed to the kernel.
    check_unit(unsafe { libc::ftruncate(fd, len) })
}

pub(crate) fn truncate(path: &CStr, len: off_t) -> Result<(), Errno> {
    // SAFETY: path is a valid nul-terminated string for the duration of the call.
    check_unit(unsafe { libc::truncate(path.as_ptr(), len) })
}

pub(crate) fn fstat(fd: c_int) -> Result<stat, Errno> {
    // SAFETY: stat is a plain C struct for which all-zero bytes are a valid value.
    let mut raw: stat = unsafe { std::mem::zeroed() };
    // SAFETY: raw is a valid, writable stat for fstat to fill.
    check_unit(unsafe { libc::fstat(fd, &mut raw) })?;
    Ok(raw)
}

pub(crate) fn get_status_flags(fd: c_int) -> Result<c_int, Errno> {
    // SAFETY: F_GETFL takes no pointer argument.
    match unsafe { libc::fcntl(fd, libc::F_GETFL) } {
        -1 => Err(Errno::last()),
        flags => Ok(flags),
    }
}

pub(crate) fn set_status_flags(fd: c_int, flags: c_int) -> Result<(), Errno> {
    // SAFETY: F_SETFL takes an integer argument.
    check_unit(unsafe { libc::fcntl(fd, libc::F_SETFL, flags) })
}

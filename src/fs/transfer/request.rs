use std::fmt::{self, Debug, Formatter};

use super::TransferError;
use crate::fs::{CountOverflowError, OffsetOverflowError, RegionError};

/// The largest count a single `read(2)` or `write(2)` is defined for (`SSIZE_MAX`).
pub const MAX_COUNT: usize = isize::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

pub(crate) enum Buffer<'a> {
    Read(&'a mut [u8]),
    Write(&'a [u8]),
}

impl Buffer<'_> {
    const fn len(&self) -> usize {
        match self {
            Buffer::Read(buf) => buf.len(),
            Buffer::Write(buf) => buf.len(),
        }
    }
}

/// A request to move exactly `count` bytes between a region of a caller-owned buffer and a
/// descriptor.
///
/// By default the region is the whole buffer and the transfer uses (and advances) the
/// descriptor's own position. [`starting_at`](Self::starting_at) and [`count`](Self::count) narrow
/// the region; [`at_offset`](Self::at_offset) makes the transfer positional.
pub struct TransferRequest<'a, D: ?Sized> {
    pub(crate) fd: &'a D,
    pub(crate) buf: Buffer<'a>,
    pub(crate) start: usize,
    pub(crate) count: usize,
    pub(crate) offset: Option<u64>,
}

impl<'a, D: ?Sized> TransferRequest<'a, D> {
    /// Fill `buf` from `fd`.
    pub fn read(fd: &'a D, buf: &'a mut [u8]) -> TransferRequest<'a, D> {
        let count = buf.len();
        TransferRequest {
            fd,
            buf: Buffer::Read(buf),
            start: 0,
            count,
            offset: None,
        }
    }

    /// Write all of `buf` to `fd`.
    pub const fn write(fd: &'a D, buf: &'a [u8]) -> TransferRequest<'a, D> {
        TransferRequest {
            fd,
            buf: Buffer::Write(buf),
            start: 0,
            count: buf.len(),
            offset: None,
        }
    }

    /// Begin the region `start` bytes into the buffer. The count is left as is, so set it
    /// afterwards if the region should still end at the end of the buffer.
    pub const fn starting_at(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub const fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Transfer at an explicit file offset without using or moving the descriptor's position.
    pub const fn at_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub const fn direction(&self) -> Direction {
        match self.buf {
            Buffer::Read(_) => Direction::Read,
            Buffer::Write(_) => Direction::Write,
        }
    }

    pub const fn requested(&self) -> usize {
        self.count
    }

    /// Checks the request against the buffer and the platform limits.
    pub(crate) fn validate(&self) -> Result<(), TransferError> {
        if self.count > MAX_COUNT {
            Err(CountOverflowError)?
        }
        match self.start.checked_add(self.count) {
            Some(end) if end <= self.buf.len() => (),
            _ => Err(RegionError)?,
        }
        if let Some(offset) = self.offset {
            match offset.checked_add(self.count as u64) {
                Some(end) if end <= i64::MAX as u64 => (),
                _ => Err(OffsetOverflowError)?,
            }
        }
        Ok(())
    }
}

impl<D: ?Sized> Debug for TransferRequest<'_, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferRequest")
            .field("direction", &self.direction())
            .field("buf_len", &self.buf.len())
            .field("start", &self.start)
            .field("count", &self.count)
            .field("offset", &self.offset)
            .finish()
    }
}

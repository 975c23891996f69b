use tracing::{debug, trace};

use super::request::Buffer;
use super::{Direction, Disposition, TransferRequest, TransferResult, TransferStatus};
use crate::fs::{Errno, RawIo, WriteZeroError};

/// Moves exactly the requested number of bytes, or explains precisely why it could not.
///
/// The loop keeps issuing primitive calls for whatever is left:
/// - A short count is normal progress, not an error; the rest is requested again.
/// - A zero-count read means end-of-stream. The transfer stops with
///   [`PartialEof`](TransferStatus::PartialEof) and no further calls are made.
/// - A call interrupted by a signal before moving anything is reissued immediately, as often as
///   it takes. It never shows up in the result.
/// - On a non-blocking descriptor with nothing ready the transfer stops with
///   [`WouldBlock`](super::TransferError::WouldBlock). Waiting for readiness and issuing a new
///   request for the remainder is up to the caller.
/// - Any other failure stops the transfer with the classified error.
///
/// In every case `bytes_transferred` counts what was actually moved, in order, from the start of
/// the region.
///
/// Requests that exceed [`MAX_COUNT`](super::MAX_COUNT), don't fit inside their buffer or whose
/// positional range can't be represented are refused before any call is made. Splitting a larger
/// transfer into chunks is the caller's policy.
pub fn transfer<D: RawIo + ?Sized>(request: TransferRequest<'_, D>) -> TransferResult {
    if let Err(error) = request.validate() {
        debug!(?request, %error, "refusing transfer");
        return TransferResult::new(0, TransferStatus::Error(error));
    }

    let direction = request.direction();
    let TransferRequest { fd, mut buf, start, count, offset } = request;
    let end = start + count;
    let mut cursor = 0;

    while cursor < count {
        let remaining = count - cursor;

        match step(fd, &mut buf, start + cursor..end, offset.map(|o| o + cursor as u64)) {
            Ok(0) if direction == Direction::Read => {
                debug!(transferred = cursor, requested = count, "end of stream");
                return TransferResult::new(cursor, TransferStatus::PartialEof);
            },
            Ok(0) => {
                debug!(transferred = cursor, requested = count, "write made no progress");
                return TransferResult::new(cursor, TransferStatus::Error(WriteZeroError.into()));
            },
            Ok(moved) => {
                debug_assert!(moved <= remaining, "primitive reported more bytes than requested");
                cursor += moved.min(remaining);
                if cursor < count {
                    trace!(moved, remaining = count - cursor, "partial transfer");
                }
            },
            Err(error) => match Disposition::of(error) {
                Disposition::Retry => {
                    debug!(transferred = cursor, "interrupted before any progress, retrying");
                },
                Disposition::Stop(error) => {
                    debug!(transferred = cursor, requested = count, %error, "transfer stopped");
                    return TransferResult::new(cursor, TransferStatus::Error(error));
                },
            },
        }
    }

    TransferResult::new(count, TransferStatus::Complete)
}

/// Issues exactly one primitive call for `range` of the buffer.
fn step<D: RawIo + ?Sized>(
    fd: &D,
    buf: &mut Buffer<'_>,
    range: std::ops::Range<usize>,
    offset: Option<u64>,
) -> Result<usize, Errno> {
    match (buf, offset) {
        (Buffer::Read(buf), None) => fd.read_raw(&mut buf[range]),
        (Buffer::Read(buf), Some(offset)) => fd.read_raw_at(&mut buf[range], offset),
        (Buffer::Write(buf), None) => fd.write_raw(&buf[range]),
        (Buffer::Write(buf), Some(offset)) => fd.write_raw_at(&buf[range], offset),
    }
}

#![cfg(test)]

use libc::{EAGAIN, EBADF, EINTR, EIO, ENOTTY};

use super::*;
use crate::fs::{Classify, ErrorClass, Errno, Fd, UnexpectedError, WouldBlockError};
use crate::util::mock::{ScriptedIo, Step};

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

fn pipe() -> (Fd, Fd) {
    let mut fds = [0; 2];
    // SAFETY: fds has room for the two descriptors pipe writes.
    assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0, "pipe should be created");
    // SAFETY: Both descriptors were just opened and are owned by nothing else.
    unsafe { (Fd::from_raw(fds[0]), Fd::from_raw(fds[1])) }
}

#[test]
fn test_write_split_across_limited_calls() {
    let fd = ScriptedIo::writing().limit(10);
    let data = b"This is a good string\0";
    assert_eq!(data.len(), 22);

    let result = transfer(TransferRequest::write(&fd, data));
    assert_eq!(
        result,
        TransferResult { bytes_transferred: 22, status: TransferStatus::Complete },
        "A descriptor limited to 10 bytes per call should still receive every byte."
    );
    assert_eq!(fd.calls(), 3, "22 bytes at 10 per call should take exactly 10 + 10 + 2.");
    assert_eq!(fd.written(), data, "Bytes should arrive in order.");
}

#[test]
fn test_partial_reads_reassemble_source() {
    let source = pattern(1000);
    let scripts: [&[usize]; 4] = [
        &[1, 1, 1],
        &[7, 300, 2, 90, 600],
        &[999, 1],
        &[250, 250, 250, 250],
    ];

    for script in scripts {
        let fd = ScriptedIo::reading(&source).script(script.iter().map(|n| Step::Move(*n)));
        let mut buf = vec![0_u8; 1000];

        let result = transfer(TransferRequest::read(&fd, &mut buf));
        assert!(result.is_complete(), "Partial reads summing to N should complete: {script:?}");
        assert_eq!(result.bytes_transferred, 1000);
        assert_eq!(buf, source, "Partial reads should reconstruct the source in order.");
    }
}

#[test]
fn test_eof_stops_without_further_calls() {
    let source = pattern(37);
    let fd = ScriptedIo::reading(&source);
    let mut buf = [0_u8; 100];

    let result = transfer(TransferRequest::read(&fd, &mut buf));
    assert_eq!(
        result,
        TransferResult { bytes_transferred: 37, status: TransferStatus::PartialEof },
        "A stream that ends early should report what it had."
    );
    assert_eq!(fd.calls(), 2, "The loop should stop at the first zero-count read.");
    assert_eq!(&buf[..37], &source[..]);
    assert!(buf[37..].iter().all(|b| *b == 0), "Nothing should be written past the end of data.");

    let fd = ScriptedIo::reading(&source).script([Step::Move(10), Step::Move(5), Step::Move(0)]);
    let result = transfer(TransferRequest::read(&fd, &mut buf));
    assert_eq!(result.bytes_transferred, 15);
    assert!(result.status.is_partial_eof());
    assert_eq!(fd.calls(), 3, "No call should follow end-of-stream even with data left behind.");
}

#[test]
fn test_interrupts_are_invisible() {
    let source = pattern(64);
    let mut script = vec![Step::Fail(EINTR); 500];
    script.push(Step::Move(3));
    script.extend([Step::Fail(EINTR), Step::Fail(EINTR), Step::Move(60)]);
    script.push(Step::Fail(EINTR));
    let fd = ScriptedIo::reading(&source).script(script);
    let mut buf = [0_u8; 64];

    let result = transfer(TransferRequest::read(&fd, &mut buf));
    assert_eq!(
        result,
        TransferResult { bytes_transferred: 64, status: TransferStatus::Complete },
        "Interruptions without progress should be retried until the transfer completes."
    );
    assert_eq!(fd.calls(), 500 + 1 + 2 + 1 + 1 + 1);
    assert_eq!(buf, source[..]);
}

#[test]
fn test_would_block_surfaces_once() {
    let source = pattern(20);
    let fd = ScriptedIo::reading(&source).script([Step::Move(8), Step::Fail(EAGAIN)]);
    let mut buf = [0_u8; 20];

    let result = transfer(TransferRequest::read(&fd, &mut buf));
    assert_eq!(
        result,
        TransferResult {
            bytes_transferred: 8,
            status: TransferStatus::Error(TransferError::WouldBlock(WouldBlockError)),
        },
        "Would-block should be reported with the progress made so far."
    );
    assert_eq!(fd.calls(), 2, "The engine shouldn't poll after would-block.");
    assert_eq!(result.error().map(|e| e.class()), Some(ErrorClass::WouldBlock));

    let result = transfer(TransferRequest::read(&fd, &mut buf).starting_at(8).count(12));
    assert!(result.is_complete(), "Reissuing for the remainder should finish the transfer.");
    assert_eq!(result.bytes_transferred, 12);
    assert_eq!(buf, source[..]);
}

#[test]
fn test_fatal_error_keeps_progress() {
    let fd = ScriptedIo::writing().script([Step::Move(4), Step::Fail(EIO)]);
    let data = pattern(16);

    let result = transfer(TransferRequest::write(&fd, &data));
    assert_eq!(result.bytes_transferred, 4, "Progress before the failure should be reported.");
    assert_eq!(result.error(), Some(TransferError::IO(crate::fs::IOError)));
    assert_eq!(result.error().map(|e| e.class()), Some(ErrorClass::Fatal));
    assert_eq!(fd.calls(), 2, "A fatal error should not be retried.");
    assert_eq!(fd.written(), &data[..4]);

    let fd = ScriptedIo::writing().script([Step::Fail(ENOTTY)]);
    let result = transfer(TransferRequest::write(&fd, &data));
    assert_eq!(
        result.error(),
        Some(TransferError::Unexpected(UnexpectedError(Errno(ENOTTY)))),
        "Unknown codes should still be classified, carrying the code."
    );
    assert_eq!(result.error().map(|e| e.class()), Some(ErrorClass::Fatal));
}

#[test]
fn test_write_zero_is_fatal() {
    let fd = ScriptedIo::writing().script([Step::Move(5), Step::Move(0)]);
    let data = pattern(10);

    let result = transfer(TransferRequest::write(&fd, &data));
    assert_eq!(result.bytes_transferred, 5);
    assert!(
        result.error().is_some_and(|e| e.is_write_zero()),
        "A write that accepts nothing should stop the loop instead of spinning."
    );
}

#[test]
fn test_usage_errors_make_no_calls() {
    let fd = ScriptedIo::reading(&pattern(64));
    let mut buf = [0_u8; 16];

    let result = transfer(TransferRequest::read(&fd, &mut buf).count(17));
    assert!(result.error().is_some_and(|e| e.is_region()), "Count past the buffer is refused.");

    let result = transfer(TransferRequest::read(&fd, &mut buf).starting_at(10).count(7));
    assert!(result.error().is_some_and(|e| e.is_region()), "Region past the buffer is refused.");

    let result = transfer(TransferRequest::read(&fd, &mut buf).count(MAX_COUNT + 1));
    assert!(result.error().is_some_and(|e| e.is_count_overflow()));

    let result = transfer(TransferRequest::read(&fd, &mut buf).at_offset(i64::MAX as u64 - 4));
    assert!(result.error().is_some_and(|e| e.is_offset_overflow()));
    assert_eq!(result.error().map(|e| e.class()), Some(ErrorClass::Usage));

    assert_eq!(fd.calls(), 0, "Refused requests must not reach the descriptor.");
    assert_eq!(result.bytes_transferred, 0);

    let fd = ScriptedIo::reading(&pattern(64)).script([Step::Fail(EBADF)]);
    let result = transfer(TransferRequest::read(&fd, &mut buf));
    assert!(result.error().is_some_and(|e| e.is_bad_fd()));
    assert_eq!(result.error().map(|e| e.class()), Some(ErrorClass::Usage));
}

#[test]
fn test_zero_count_is_complete() {
    let fd = ScriptedIo::writing();
    let result = transfer(TransferRequest::write(&fd, &[]));
    assert_eq!(result, TransferResult { bytes_transferred: 0, status: TransferStatus::Complete });
    assert_eq!(fd.calls(), 0, "Nothing to move means nothing to call.");
}

#[test]
fn test_positional_threads_offset() {
    let source = pattern(64);
    let fd = ScriptedIo::reading(&source).limit(4);
    let mut buf = [0_u8; 10];

    let result = transfer(TransferRequest::read(&fd, &mut buf).at_offset(5));
    assert!(result.is_complete());
    assert_eq!(buf, source[5..15]);
    assert_eq!(
        fd.offsets(),
        [Some(5), Some(9), Some(13)],
        "Each call should be issued at the offset advanced by the bytes already moved."
    );
    assert_eq!(fd.position(), 0, "Positional reads must not move the shared position.");

    let fd = ScriptedIo::writing().limit(3);
    let result = transfer(TransferRequest::write(&fd, b"abcdefg").at_offset(2));
    assert!(result.is_complete());
    assert_eq!(fd.written(), b"\0\0abcdefg");
    assert_eq!(fd.offsets(), [Some(2), Some(5), Some(8)]);
}

#[test]
fn test_region_within_buffer() {
    let fd = ScriptedIo::writing().limit(2);
    let data = b"0123456789";

    let result = transfer(TransferRequest::write(&fd, data).starting_at(3).count(5));
    assert!(result.is_complete());
    assert_eq!(fd.written(), b"34567", "Only the requested region should be written.");
}

#[test]
fn test_nonblocking_pipe() {
    let (read_end, write_end) = pipe();
    read_end.set_nonblocking(true).expect("flags should be settable on a pipe");

    let mut buf = [0_u8; 10];
    let result = transfer(TransferRequest::read(&read_end, &mut buf));
    assert_eq!(
        result.status,
        TransferStatus::Error(TransferError::WouldBlock(WouldBlockError)),
        "An empty non-blocking pipe should report would-block."
    );
    assert_eq!(result.bytes_transferred, 0);

    assert!(transfer(TransferRequest::write(&write_end, b"hello")).is_complete());
    let result = transfer(TransferRequest::read(&read_end, &mut buf));
    assert_eq!(result.bytes_transferred, 5, "Available bytes should be kept before would-block.");
    assert!(result.error().is_some_and(|e| e.is_would_block()));
    assert_eq!(&buf[..5], b"hello");

    write_end.close().expect("closing the write end should succeed");
    let result = transfer(TransferRequest::read(&read_end, &mut buf));
    assert_eq!(
        result,
        TransferResult { bytes_transferred: 0, status: TransferStatus::PartialEof },
        "A pipe with no writers left is at end-of-stream."
    );
}

#[test]
fn test_broken_pipe() {
    let (read_end, write_end) = pipe();
    drop(read_end);

    let result = transfer(TransferRequest::write(&write_end, b"nobody is listening"));
    assert!(result.error().is_some_and(|e| e.is_broken_pipe()));
    assert_eq!(result.error().map(|e| e.class()), Some(ErrorClass::Fatal));
}

#[test]
fn test_descriptor_types_share_the_engine() {
    let file = tempfile::tempfile().expect("temporary file should be created");
    let data = pattern(300);
    assert!(transfer(TransferRequest::write(&file, &data)).is_complete());

    let mut buf = vec![0_u8; 300];
    let borrowed = std::os::fd::AsFd::as_fd(&file);
    assert!(transfer(TransferRequest::read(&borrowed, &mut buf).at_offset(0)).is_complete());
    assert_eq!(buf, data, "A borrowed descriptor should read what the owned file wrote.");
}

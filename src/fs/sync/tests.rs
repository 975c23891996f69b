#![cfg(test)]

use std::io::Write;

use libc::{EINTR, EINVAL, EIO, ENOTSUP};

use super::*;
use crate::fs::{Classify, ErrorClass, IOError, InterruptError};
use crate::util::mock::ScriptedIo;

#[test]
fn test_data_only_falls_back_to_full() {
    let fd = ScriptedIo::writing().reject_sync(SyncStrength::DataOnly, EINVAL);

    assert_eq!(
        flush(DurabilityRequest::data_only(&fd)),
        Ok(()),
        "An unsupported data-only flush should succeed through a full flush."
    );
    assert_eq!(fd.syncs(), [SyncStrength::DataOnly, SyncStrength::Full]);

    let fd = ScriptedIo::writing().reject_sync(SyncStrength::DataOnly, ENOTSUP);
    assert_eq!(flush(DurabilityRequest::data_only(&fd)), Ok(()));
    assert_eq!(fd.syncs(), [SyncStrength::DataOnly, SyncStrength::Full]);
}

#[test]
fn test_both_unsupported_surfaces_error() {
    let fd = ScriptedIo::writing()
        .reject_sync(SyncStrength::DataOnly, EINVAL)
        .reject_sync(SyncStrength::Full, EINVAL);

    let result = flush(DurabilityRequest::data_only(&fd));
    assert!(
        result.is_err_and(|e| e.is_sync_unsupported()),
        "When neither flush is supported the full flush's error should be returned."
    );
    assert_eq!(result.map_err(|e| e.class()), Err(ErrorClass::Fatal));
    assert_eq!(fd.syncs().len(), 2, "Only one fallback should be attempted.");
}

#[test]
fn test_full_sync_has_no_fallback() {
    let fd = ScriptedIo::writing().reject_sync(SyncStrength::Full, EINVAL);

    assert!(flush(DurabilityRequest::full(&fd)).is_err_and(|e| e.is_sync_unsupported()));
    assert_eq!(fd.syncs(), [SyncStrength::Full], "A full flush has nothing stronger to fall to.");
}

#[test]
fn test_failures_are_not_retried() {
    let fd = ScriptedIo::writing().reject_sync(SyncStrength::DataOnly, EIO);
    assert_eq!(flush(DurabilityRequest::data_only(&fd)), Err(SyncError::IO(IOError)));
    assert_eq!(fd.syncs(), [SyncStrength::DataOnly], "I/O errors must not trigger the fallback.");

    let fd = ScriptedIo::writing().reject_sync(SyncStrength::Full, EINTR);
    assert_eq!(
        flush(DurabilityRequest::full(&fd)),
        Err(SyncError::Interrupt(InterruptError)),
        "An interrupted flush is reported, not reissued."
    );
    assert_eq!(fd.syncs().len(), 1);
}

#[test]
fn test_flush_real_file() {
    let mut file = tempfile::tempfile().expect("temporary file should be created");
    file.write_all(b"durable").expect("write should succeed");

    assert_eq!(flush(DurabilityRequest::full(&file)), Ok(()));
    assert_eq!(flush(DurabilityRequest::data_only(&file)), Ok(()));
}

#[test]
fn test_flush_pipe_is_unsupported() {
    let mut fds = [0; 2];
    // SAFETY: fds has room for the two descriptors pipe writes.
    assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
    // SAFETY: Both descriptors were just opened and are owned by nothing else.
    let (read_end, _write_end) = unsafe { (crate::fs::Fd::from_raw(fds[0]), crate::fs::Fd::from_raw(fds[1])) };

    let result = flush(DurabilityRequest::data_only(&read_end));
    assert!(
        result.is_err_and(|e| e.is_sync_unsupported()),
        "Pipes support neither flush, so the fallback's error should surface."
    );
}

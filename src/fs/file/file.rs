use std::ffi::CString;
use std::marker::PhantomData;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use libc::{SEEK_CUR, SEEK_END, SEEK_SET, c_int};
use tracing::debug;

use super::{
    AccessMode, OpenError, OpenOptions, PartialReadError, Read, ReadOnly, ReadStringError,
    ReadWrite, ResizeError, SeekError, Write, WriteOnly,
};
use crate::fs::raw::impl_raw_for_fd;
use crate::fs::sync::{DurabilityRequest, SyncError, flush};
use crate::fs::transfer::{TransferError, TransferRequest, TransferResult, TransferStatus, transfer};
use crate::fs::{
    CloseError, Errno, Fd, FileTooLargeError, FlagsError, InvalidArgumentError, Metadata,
    MetadataError, syscall,
};

/// Chunk size used by [`File::read_to_end`] when the file doesn't report a block size.
const DEFAULT_CHUNK: usize = 8 * 1024;

/// Upper bound on what [`File::read_to_end`] allocates ahead of the data. Sizes reported by
/// `fstat` can be huge for sparse or special files.
const MAX_PREALLOC: usize = 1024 * 1024;

/// Where a [`seek`](File::seek) offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Start,
    Current,
    End,
}

impl Origin {
    const fn whence(self) -> c_int {
        match self {
            Origin::Start => SEEK_SET,
            Origin::Current => SEEK_CUR,
            Origin::End => SEEK_END,
        }
    }
}

/// An open file, owning its descriptor. The access mode it was opened with is part of its type.
#[derive(Debug)]
pub struct File<A: AccessMode = ReadWrite> {
    pub(crate) _access: PhantomData<fn() -> A>,
    pub(crate) fd: Fd,
}

impl File {
    pub fn options() -> OpenOptions<ReadOnly> {
        OpenOptions::new()
    }
}

impl File<ReadOnly> {
    pub fn open<P: AsRef<Path>>(file_path: P) -> Result<File<ReadOnly>, OpenError> {
        OpenOptions::<ReadOnly>::new().open(file_path)
    }
}

impl File<WriteOnly> {
    /// Creates the file, or empties it if it exists, and opens it for writing; the same as
    /// `creat(2)`.
    pub fn create<P: AsRef<Path>>(file_path: P, file_mode: u32) -> Result<File<WriteOnly>, OpenError> {
        OpenOptions::<WriteOnly>::new()
            .create_or_empty()
            .mode(file_mode)
            .open(file_path)
    }
}

impl<A: AccessMode> File<A> {
    /// Moves the descriptor's position and returns the new offset from the start of the file.
    ///
    /// Seeking past the end is allowed. Reads from there report end-of-stream immediately and
    /// writes leave a gap that reads back as zeros.
    pub fn seek(&self, offset: i64, origin: Origin) -> Result<u64, SeekError> {
        syscall::lseek(*self.fd, offset, origin.whence()).map_err(SeekError::interpret_raw_error)
    }

    pub fn position(&self) -> Result<u64, SeekError> {
        self.seek(0, Origin::Current)
    }

    pub fn metadata(&self) -> Result<Metadata, MetadataError> {
        self.fd.metadata()
    }

    pub fn set_nonblocking(&self, value: bool) -> Result<(), FlagsError> {
        self.fd.set_nonblocking(value)
    }

    pub fn close(self) -> Result<(), CloseError> {
        self.fd.close()
    }
}

impl<A: Read> File<A> {
    /// Fills `buf` from the current position. See [`transfer`] for how partial reads, signals and
    /// end-of-stream are handled.
    pub fn read_exact(&self, buf: &mut [u8]) -> TransferResult {
        transfer(TransferRequest::read(self, buf))
    }

    /// Fills `buf` from `offset` without moving the position.
    pub fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> TransferResult {
        transfer(TransferRequest::read(self, buf).at_offset(offset))
    }

    /// Appends everything from the current position to the end of the file onto `buf`, returning
    /// the number of bytes appended.
    ///
    /// The buffer grows one chunk at a time and every chunk is a separate exact-count transfer, so
    /// the file may be larger than a single call could move. If a chunk fails, the bytes read
    /// before it stay in `buf`.
    pub fn read_to_end(&self, buf: &mut Vec<u8>) -> Result<usize, TransferError> {
        let (hint, chunk) = match self.metadata() {
            Ok(meta) if meta.block_size > 0 => (meta.size, meta.block_size as usize),
            Ok(meta) => (meta.size, DEFAULT_CHUNK),
            Err(_) => (0, DEFAULT_CHUNK),
        };
        let chunk = chunk.min(MAX_PREALLOC);
        buf.reserve(usize::try_from(hint).unwrap_or(MAX_PREALLOC).min(MAX_PREALLOC));
        let start = buf.len();

        loop {
            let len = buf.len();
            let want = chunk.max(buf.capacity() - len).min(MAX_PREALLOC);
            buf.resize(len + want, 0);

            let result = transfer(TransferRequest::read(self, buf).starting_at(len).count(want));
            buf.truncate(len + result.bytes_transferred);

            match result.status {
                TransferStatus::Complete => (),
                TransferStatus::PartialEof => return Ok(buf.len() - start),
                TransferStatus::Error(e) => return Err(e),
            }
        }
    }

    /// Reads from the current position to the end of the file.
    pub fn read_all_vec(&self) -> Result<Vec<u8>, PartialReadError> {
        let mut bytes = Vec::new();
        match self.read_to_end(&mut bytes) {
            Ok(_) => Ok(bytes),
            Err(error) => Err(PartialReadError { bytes, error }),
        }
    }

    pub fn read_all_string(&self) -> Result<String, ReadStringError> {
        Ok(String::from_utf8(self.read_all_vec()?)?)
    }
}

impl<A: Write> File<A> {
    /// Writes all of `buf` at the current position.
    pub fn write_all(&self, buf: &[u8]) -> TransferResult {
        transfer(TransferRequest::write(self, buf))
    }

    /// Writes all of `buf` at `offset` without moving the position.
    pub fn write_all_at(&self, buf: &[u8], offset: u64) -> TransferResult {
        transfer(TransferRequest::write(self, buf).at_offset(offset))
    }

    /// Sets the file's length. Growing fills the new space with zeros; shrinking discards the
    /// tail. The position is left where it was.
    pub fn resize(&self, len: u64) -> Result<(), ResizeError> {
        let len = libc::off_t::try_from(len).map_err(|_| ResizeError::from(FileTooLargeError))?;
        retry_interrupted(|| syscall::ftruncate(*self.fd, len))
            .map_err(ResizeError::interpret_raw_error)
    }

    /// Flushes data and metadata to stable storage.
    pub fn sync(&self) -> Result<(), SyncError> {
        flush(DurabilityRequest::full(self))
    }

    /// Flushes data and only the metadata needed to read it back, falling back to a full flush
    /// where that isn't supported.
    pub fn sync_data(&self) -> Result<(), SyncError> {
        flush(DurabilityRequest::data_only(self))
    }
}

impl<A: AccessMode> AsRawFd for File<A> {
    fn as_raw_fd(&self) -> RawFd {
        *self.fd
    }
}

impl<A: AccessMode> AsFd for File<A> {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl_raw_for_fd!([<A: AccessMode>] File<A>);

/// Sets the length of the file at `file_path` without opening it. See [`File::resize`].
pub fn resize_path<P: AsRef<Path>>(file_path: P, len: u64) -> Result<(), ResizeError> {
    let path = file_path.as_ref();
    let pathname = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| ResizeError::from(InvalidArgumentError))?;
    let len = libc::off_t::try_from(len).map_err(|_| ResizeError::from(FileTooLargeError))?;

    retry_interrupted(|| syscall::truncate(&pathname, len)).map_err(|e| {
        let error = ResizeError::interpret_raw_error(e);
        debug!(?path, %error, "resize failed");
        error
    })
}

fn retry_interrupted<T>(mut call: impl FnMut() -> Result<T, Errno>) -> Result<T, Errno> {
    loop {
        match call() {
            Err(e) if e.code() == libc::EINTR => debug!("interrupted, retrying"),
            other => return other,
        }
    }
}

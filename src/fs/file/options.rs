use std::ffi::CString;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use libc::{O_APPEND, O_CLOEXEC, O_CREAT, O_EXCL, O_NONBLOCK, O_SYNC, O_TRUNC, c_int, mode_t};
use tracing::debug;

use super::{AccessMode, File, OpenError, ReadOnly, ReadWrite, WriteOnly};
use crate::fs::{Fd, InvalidArgumentError, syscall};
use crate::util::fmt::DebugRaw;

/// What `open` does when the file does or doesn't exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Creation {
    /// Fail with [`NotFound`](super::OpenError::NotFound) if missing.
    #[default]
    NoCreate,
    CreateIfMissing,
    /// Create if missing, otherwise truncate to zero length.
    CreateOrEmpty,
    /// Fail with [`AlreadyExists`](super::OpenError::AlreadyExists) if present.
    CreateNew,
}

impl Creation {
    const fn flags(self) -> c_int {
        match self {
            Creation::NoCreate => 0,
            Creation::CreateIfMissing => O_CREAT,
            Creation::CreateOrEmpty => O_CREAT | O_TRUNC,
            Creation::CreateNew => O_CREAT | O_EXCL,
        }
    }
}

/// A builder struct to help with opening files, using customizable options and logical defaults.
/// Available via [`File::options`] to avoid additional use statements.
///
/// The access mode is part of the type, so a file opened read-only can't be handed to a method
/// that writes. Permission bits only matter when a file is created, and the kernel masks them with
/// the process umask before they hit the disk.
#[derive(Clone)]
pub struct OpenOptions<Access: AccessMode> {
    pub(crate) _access: PhantomData<fn() -> Access>,
    pub(crate) creation: Creation,
    pub(crate) flags: c_int,
    pub(crate) mode: mode_t,
}

macro_rules! set_flag {
    ($self:ident, $value:expr, $flag:expr) => {
        if $value {
            $self.flags |= $flag;
        } else {
            $self.flags &= !$flag;
        }
    };
}

macro_rules! get_flag {
    ($self:ident, $flag:expr) => {
        $self.flags & $flag != 0
    };
}

impl<A: AccessMode> OpenOptions<A> {
    pub(crate) const fn flags(&self) -> c_int {
        self.flags | self.creation.flags() | A::FLAGS | O_CLOEXEC
    }

    pub fn new() -> OpenOptions<A> {
        OpenOptions::<A>::default()
    }

    pub const fn read_only(self) -> OpenOptions<ReadOnly> {
        OpenOptions::<ReadOnly> {
            _access: PhantomData,
            creation: self.creation,
            flags: self.flags,
            mode: self.mode,
        }
    }

    pub const fn write_only(self) -> OpenOptions<WriteOnly> {
        OpenOptions::<WriteOnly> {
            _access: PhantomData,
            creation: self.creation,
            flags: self.flags,
            mode: self.mode,
        }
    }

    pub const fn read_write(self) -> OpenOptions<ReadWrite> {
        OpenOptions::<ReadWrite> {
            _access: PhantomData,
            creation: self.creation,
            flags: self.flags,
            mode: self.mode,
        }
    }

    pub const fn creation(&mut self, value: Creation) -> &mut Self {
        self.creation = value;
        self
    }

    pub const fn create_if_missing(&mut self) -> &mut Self {
        self.creation(Creation::CreateIfMissing)
    }

    pub const fn create_or_empty(&mut self) -> &mut Self {
        self.creation(Creation::CreateOrEmpty)
    }

    pub const fn create_new(&mut self) -> &mut Self {
        self.creation(Creation::CreateNew)
    }

    /// Permission bits for a newly created file. Defaults to `0o644`.
    pub const fn mode(&mut self, value: u32) -> &mut Self {
        self.mode = value as mode_t;
        self
    }

    pub const fn append(&mut self, value: bool) -> &mut Self {
        set_flag!(self, value, O_APPEND);
        self
    }

    /// Every write returns only once its data and metadata are durable, as if followed by a full
    /// [`flush`](crate::fs::sync::flush).
    pub const fn force_sync(&mut self, value: bool) -> &mut Self {
        set_flag!(self, value, O_SYNC);
        self
    }

    /// Transfers that can't make progress return
    /// [`WouldBlock`](crate::fs::transfer::TransferError::WouldBlock) instead of waiting.
    pub const fn non_blocking(&mut self, value: bool) -> &mut Self {
        set_flag!(self, value, O_NONBLOCK);
        self
    }

    pub(crate) fn open_raw<P: AsRef<Path>>(&self, file_path: P) -> Result<Fd, OpenError> {
        let path = file_path.as_ref();
        let pathname = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| OpenError::from(InvalidArgumentError))?;

        loop {
            match syscall::open(&pathname, self.flags(), self.mode) {
                Ok(fd) => return Ok(Fd(fd)),
                Err(e) if e.code() == libc::EINTR => {
                    debug!(?path, "open interrupted, retrying");
                },
                Err(e) => {
                    let error = OpenError::interpret_raw_error(e);
                    debug!(?path, %error, "open failed");
                    return Err(error);
                },
            }
        }
    }

    pub fn open<P: AsRef<Path>>(&self, file_path: P) -> Result<File<A>, OpenError> {
        Ok(File::<A> {
            _access: PhantomData,
            fd: self.open_raw(file_path)?,
        })
    }
}

// The Default derive macro doesn't like my spooky zero-variant enums.
impl<A: AccessMode> Default for OpenOptions<A> {
    fn default() -> Self {
        Self {
            _access: Default::default(),
            creation: Creation::NoCreate,
            mode: 0o644,
            flags: 0x0,
        }
    }
}

impl<A: AccessMode> Debug for OpenOptions<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenOptions")
            .field("<access>", &DebugRaw(A::NAME.to_owned()))
            .field("creation", &self.creation)
            .field("mode", &DebugRaw(format!("0o{:o}", self.mode)))
            .field("append", &get_flag!(self, O_APPEND))
            .field("force_sync", &get_flag!(self, O_SYNC))
            .field("non_blocking", &get_flag!(self, O_NONBLOCK))
            .finish()
    }
}

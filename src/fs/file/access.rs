use std::fmt::Debug;

use libc::{O_RDONLY, O_RDWR, O_WRONLY, c_int};

use crate::util::sealed::Sealed;

/// The access mode a [`File`](super::File) was opened with, checked at compile time.
///
/// Only the three modes below implement it. Methods that read require [`Read`] and methods that
/// write or resize require [`Write`].
pub trait AccessMode: Sealed + Debug {
    /// The `O_*` access flag passed to `open(2)`.
    const FLAGS: c_int;
    /// Shown in place of the mode's full type path by [`OpenOptions`](super::OpenOptions)' `Debug`.
    const NAME: &'static str;
}

pub trait Read: AccessMode {}

pub trait Write: AccessMode {}

macro_rules! access_mode {
    ($(#[$meta:meta])* $name:ident = $flag:ident $(: $($capability:ident),+)?) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub enum $name {}

        impl Sealed for $name {}

        impl AccessMode for $name {
            const FLAGS: c_int = $flag;
            const NAME: &'static str = stringify!($name);
        }

        $($(impl $capability for $name {})+)?
    };
}

access_mode!(
    /// Reads only. Opening a directory this way succeeds; reading from it does not.
    ReadOnly = O_RDONLY: Read
);

access_mode!(
    /// Writes only.
    WriteOnly = O_WRONLY: Write
);

access_mode!(ReadWrite = O_RDWR: Read, Write);

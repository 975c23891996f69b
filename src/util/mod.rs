pub mod fmt;
pub mod mock;
pub mod sealed;

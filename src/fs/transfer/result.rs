use derive_more::IsVariant;

use super::TransferError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum TransferStatus {
    /// Every requested byte was moved.
    Complete,
    /// The stream ended first. Only produced by reads.
    PartialEof,
    Error(TransferError),
}

/// The outcome of a [`transfer`](super::transfer). Progress made before an error is kept in
/// `bytes_transferred` rather than discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferResult {
    pub bytes_transferred: usize,
    pub status: TransferStatus,
}

impl TransferResult {
    pub(crate) const fn new(bytes_transferred: usize, status: TransferStatus) -> TransferResult {
        TransferResult {
            bytes_transferred,
            status,
        }
    }

    pub const fn is_complete(&self) -> bool {
        matches!(self.status, TransferStatus::Complete)
    }

    pub const fn error(&self) -> Option<TransferError> {
        match self.status {
            TransferStatus::Error(e) => Some(e),
            _ => None,
        }
    }

    /// The byte count, treating end-of-stream as success.
    pub const fn into_result(self) -> Result<usize, TransferError> {
        match self.status {
            TransferStatus::Error(e) => Err(e),
            _ => Ok(self.bytes_transferred),
        }
    }
}

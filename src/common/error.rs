// src/common/error.rs

use core::fmt::Debug;

#[derive(Debug, thiserror::Error)]
pub enum Error<E = ()>
where
    E: Debug, // Still need Debug for the generic Io error
{
    /// Underlying I/O error from the HAL implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// Operation timed out.
    #[error("Operation timed out")]
    Timeout,

    /// The transport reported busy when a new transfer was requested.
    #[error("Transport busy")]
    Busy,

    /// A queued transmission was requested while the previous one was still draining.
    #[error("Transmission already in progress")]
    TransmitInProgress,

    /// Buffer provided was too small.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// Bus address outside the 7-bit range.
    #[error("Invalid device address: {0:#04x}")]
    InvalidDeviceAddress(u8),

    /// Memory offset beyond the addressed device.
    #[error("EEPROM address out of range: {0:#06x}")]
    AddressOutOfRange(u32),

    /// Transfer length of zero, or larger than one page.
    #[error("Invalid transfer length: {0}")]
    InvalidLength(usize),

    /// Transfer would wrap inside its page and wrapping is disallowed.
    #[error("Transfer crosses a page boundary")]
    PageOverrun,

    /// A started transfer completed with a non-Ok status.
    #[error("Transfer failed: {0:?}")]
    TransferFailed(TransferStatus),
}

// Allow mapping from underlying HAL error if From is implemented
impl<E: Debug> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Io(e)
    }
}

impl<E: Debug> Error<E> {
    /// Re-types an error that carries no I/O payload.
    pub(crate) fn widen(err: Error<()>) -> Self {
        match err {
            Error::Io(()) => Error::TransferFailed(TransferStatus::Error),
            Error::Timeout => Error::Timeout,
            Error::Busy => Error::Busy,
            Error::TransmitInProgress => Error::TransmitInProgress,
            Error::BufferOverflow { needed, got } => Error::BufferOverflow { needed, got },
            Error::InvalidDeviceAddress(a) => Error::InvalidDeviceAddress(a),
            Error::AddressOutOfRange(a) => Error::AddressOutOfRange(a),
            Error::InvalidLength(n) => Error::InvalidLength(n),
            Error::PageOverrun => Error::PageOverrun,
            Error::TransferFailed(s) => Error::TransferFailed(s),
        }
    }
}

/// Completion status reported by a transport, mirroring the HAL status codes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferStatus {
    Ok,
    Error,
    Busy,
    Timeout,
}

impl<T, E: Debug> From<&Result<T, Error<E>>> for TransferStatus {
    fn from(result: &Result<T, Error<E>>) -> Self {
        match result {
            Ok(_) => TransferStatus::Ok,
            Err(Error::Busy) | Err(Error::TransmitInProgress) => TransferStatus::Busy,
            Err(Error::Timeout) => TransferStatus::Timeout,
            Err(Error::TransferFailed(status)) => *status,
            Err(_) => TransferStatus::Error,
        }
    }
}

/// Failure modes of the unsigned-integer text codec.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatError {
    /// No digits were found.
    #[error("No digits")]
    Empty,

    /// A character that is not a digit of the selected radix.
    #[error("Invalid character: {0:#04x}")]
    InvalidCharacter(u8),

    /// More digits than fit a 32-bit value in the selected radix.
    #[error("Too many digits")]
    TooManyDigits,

    /// Ten decimal digits that exceed 0xFFFFFFFF.
    #[error("Value exceeds 32 bits")]
    Overflow,

    /// Hex text without the leading `0x` / `0X`.
    #[error("Missing 0x prefix")]
    MissingHexPrefix,
}

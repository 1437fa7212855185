//! Error types returned by the driver.
//!
//! Every fallible operation surfaces one of the variants in [`Error`], so
//! callers can branch on the failure kind (retry on a failed wake, give up
//! on a hard bus fault) instead of re-deriving it from diagnostics.

use thiserror::Error;

/// Driver error, generic over the bus error type of the underlying
/// `embedded-hal` I2C implementation.
///
/// Validation failures are terminal for the command that produced them:
/// the driver returns the first failure it hits and skips the remaining
/// checks. No variant is ever retried internally except the bounded
/// busy-polling that ends in [`Error::Timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus itself failed (arbitration loss, bus fault, unexpected NACK
    /// outside the busy-polling window).
    #[error("i2c bus error")]
    I2c(E),

    /// The chip never answered where a response was required; a wake that
    /// goes unanswered reports this rather than a bus-level detail.
    #[error("no response from device")]
    NoResponse,

    /// The count byte leading the response does not equal the number of
    /// bytes actually received.
    #[error("response count mismatch: declared {declared}, received {received}")]
    LengthMismatch {
        /// Count byte as declared by the chip in byte 0 of the frame.
        declared: u8,
        /// Bytes actually pulled off the bus for this frame.
        received: u8,
    },

    /// The checksum recomputed over the received frame does not match the
    /// two trailing CRC bytes.
    #[error("response checksum mismatch")]
    ChecksumMismatch,

    /// The frame was structurally valid but its status or version byte was
    /// not the expected value; carries the byte that was seen.
    #[error("unexpected status byte {0:#04x}")]
    UnexpectedStatus(u8),

    /// The chip stayed busy past the bounded number of read attempts.
    #[error("device stayed busy past the retry budget")]
    Timeout,

    /// A response longer than the reception buffer was requested.
    #[error("response would overflow the reception buffer")]
    BufferOverflow,
}

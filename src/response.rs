//! Response frame buffering and validation.
//!
//! Everything the chip sends back has the shape:
//!
//! ```text
//! [count, data ..., crc_lo, crc_hi]
//! ```
//!
//! where `count` is the total frame length including itself and the two
//! trailing CRC bytes. A [`Response`] accumulates those bytes across one or
//! more bounded bus reads, then validates the whole frame at once:
//!
//! 1. [`check_length`](Response::check_length) — the declared count must
//!    equal the number of bytes actually received.
//! 2. [`check_checksum`](Response::check_checksum) — the CRC recomputed
//!    over `[count, data ...]` must equal the trailing two bytes.
//!
//! The order is fixed: a checksum computed over a wrongly sized run is
//! meaningless, so the length check always runs first (see
//! [`validate`](Response::validate)). Only after both checks pass is
//! [`payload`](Response::payload) meaningful. A frame is accepted or
//! rejected as a whole; there is no partial acceptance.

use heapless::Vec;

use crate::consts::{MAX_RESPONSE_LEN, MIN_RESPONSE_LEN};
use crate::crc;
use crate::error::Error;

/// Buffered response frame received from the chip.
///
/// Owned by the driver and reset at the start of every reception, so no
/// bytes from a previous command can leak into the current frame. Bounded
/// to [`MAX_RESPONSE_LEN`] bytes; an over-long reception is reported as
/// [`Error::BufferOverflow`] instead of silently truncating.
#[derive(Debug)]
pub struct Response {
    buf: Vec<u8, MAX_RESPONSE_LEN>,
}

impl Response {
    /// Creates an empty reception buffer.
    pub(crate) fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Empties the buffer and zeroes the fill count for a new frame.
    pub(crate) fn reset(&mut self) {
        self.buf.clear();
    }

    /// Appends one received chunk.
    pub(crate) fn extend<E>(&mut self, chunk: &[u8]) -> Result<(), Error<E>> {
        self.buf
            .extend_from_slice(chunk)
            .map_err(|()| Error::BufferOverflow)
    }

    /// Number of bytes received so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been received yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The raw frame, count byte and CRC trailer included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Checks that the count byte declared by the chip matches the number
    /// of bytes actually received.
    ///
    /// Frames shorter than the protocol's 4-byte minimum are rejected
    /// outright.
    pub fn check_length<E>(&self) -> Result<(), Error<E>> {
        let declared = self.buf.first().copied().unwrap_or(0);
        let received = self.buf.len() as u8;
        if self.buf.len() < MIN_RESPONSE_LEN || usize::from(declared) != self.buf.len() {
            #[cfg(feature = "log")]
            log::debug!("message count error: declared {declared:#04x}, received {received:#04x}");
            #[cfg(feature = "defmt-0-3")]
            defmt::debug!(
                "message count error: declared {}, received {}",
                declared,
                received
            );
            return Err(Error::LengthMismatch { declared, received });
        }
        Ok(())
    }

    /// Recomputes the CRC over `[count, data ...]` and checks it against
    /// the two trailing bytes, low byte first.
    ///
    /// Call after [`check_length`](Response::check_length); on a frame of
    /// unverified length the recomputed run may be wrong even when every
    /// byte arrived intact.
    pub fn check_checksum<E>(&self) -> Result<(), Error<E>> {
        let Some(crc_at) = self.buf.len().checked_sub(2).filter(|&n| n > 0) else {
            return Err(Error::ChecksumMismatch);
        };
        let (lo, hi) = crc::compute(&self.buf[..crc_at]);
        if self.buf[crc_at] != lo || self.buf[crc_at + 1] != hi {
            #[cfg(feature = "log")]
            log::debug!(
                "message crc error: computed {lo:#04x} {hi:#04x}, received {:#04x} {:#04x}",
                self.buf[crc_at],
                self.buf[crc_at + 1]
            );
            #[cfg(feature = "defmt-0-3")]
            defmt::debug!(
                "message crc error: computed {} {}, received {} {}",
                lo,
                hi,
                self.buf[crc_at],
                self.buf[crc_at + 1]
            );
            return Err(Error::ChecksumMismatch);
        }
        Ok(())
    }

    /// Runs the length check, then the checksum check.
    pub fn validate<E>(&self) -> Result<(), Error<E>> {
        self.check_length()?;
        self.check_checksum()
    }

    /// The data bytes between the count byte and the CRC trailer.
    ///
    /// Only meaningful after [`validate`](Response::validate) has passed;
    /// on a frame too short to carry any payload this is empty.
    pub fn payload(&self) -> &[u8] {
        match self.buf.len().checked_sub(2) {
            Some(end) if end >= 1 => &self.buf[1..end],
            _ => &[],
        }
    }
}

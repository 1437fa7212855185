//! Constants for the ATECCX08A I2C protocol.
//!
//! This module defines the word addresses, timing requirements, and frame
//! sizes used by the driver when talking to an ATECC508A/ATECC608A.
//!
//! These values come from the Microchip datasheets and the CryptoAuth
//! application notes, adapted for embedded use in constrained environments.
//!
//! ## Key Concepts
//!
//! - **Word addresses**: The first byte of every write transaction, telling
//!   the IC what the transaction is (a command, or an idle request).
//! - **Wake timing**: The chip only listens after a wake condition (SDA held
//!   low for tWLO) followed by a quiet period (tWHI).
//! - **Frame sizes**: Every response is `count + data + crc[0] + crc[1]`,
//!   where `count` includes itself and both CRC bytes.
//! - **Chunking**: Bus reads are bounded to 32 bytes per transaction, so
//!   longer frames are pulled in several reads.
//!
//! These values should be used wherever framing or timing logic is
//! implemented to keep message boundaries consistent across the driver.

/// Default 7-bit I2C address of a fresh ATECCX08A (software definable).
pub const DEFAULT_ADDRESS: u8 = 0x60;

/// Bus address written to (with no payload) to generate the wake condition.
///
/// Addressing 0x00 at standard speed holds SDA low for longer than tWLO,
/// which is what actually wakes the chip; the write itself is expected to
/// be NACKed.
pub const WAKE_BUS_ADDRESS: u8 = 0x00;

/// Word address prefixed to every framed command packet.
pub const WORD_ADDRESS_COMMAND: u8 = 0x03;

/// Word address sent alone to put the chip into idle mode.
pub const WORD_ADDRESS_IDLE: u8 = 0x02;

/// Minimum wake-low duration (tWLO) in microseconds.
///
/// Satisfied implicitly by the zero-byte write to [`WAKE_BUS_ADDRESS`] at
/// 100 kHz; kept here for documentation and for transports that generate
/// the wake condition by other means.
pub const WAKE_LOW_DURATION_US: u32 = 60;

/// Wake-high delay to data communication (tWHI) in microseconds.
///
/// The chip needs this long after the wake condition before it will answer
/// on the bus.
pub const WAKE_HIGH_DELAY_US: u32 = 1500;

/// Status byte reported in the wake response after a successful wake.
pub const WAKE_STATUS_SUCCESS: u8 = 0x11;

/// Third data byte of the Info (Revision mode) response on every ECC508A.
///
/// The fourth byte carries the silicon revision and varies between chips.
pub const INFO_DEVICE_REVISION: u8 = 0x50;

/// Maximum number of bytes pulled from the bus in a single read.
///
/// Matches the classic Wire buffer limit; responses longer than this are
/// received in multiple chunks.
pub const BUS_CHUNK_LEN: usize = 32;

/// Total length of the wake response frame (count + status + 2 CRC bytes).
pub const WAKE_RESPONSE_LEN: u8 = 4;

/// Total length of the Info command response frame.
pub const INFO_RESPONSE_LEN: u8 = 7;

/// Number of random payload bytes returned by the Random command.
pub const RANDOM_LEN: usize = 32;

/// Total length of the Random command response frame.
pub const RANDOM_RESPONSE_LEN: u8 = 35;

/// Smallest frame the chip ever sends (the 4-byte status frame).
pub const MIN_RESPONSE_LEN: usize = 4;

/// Largest frame this driver's command set ever receives.
///
/// Sizes the reception buffer; 32 payload bytes plus the count byte and the
/// two trailing CRC bytes.
pub const MAX_RESPONSE_LEN: usize = 35;

/// Post-transmit execution time of the Info command, in milliseconds.
pub const INFO_EXEC_TIME_MS: u32 = 1;

/// Post-transmit execution time of the Random command, in milliseconds.
pub const RANDOM_EXEC_TIME_MS: u32 = 23;

/// Chunk read attempts tolerated before reception gives up with a timeout.
pub const RX_MAX_RETRIES: u8 = 10;

/// Pause between chunk read attempts while the chip is still busy, in
/// microseconds.
pub const RX_RETRY_DELAY_US: u32 = 500;

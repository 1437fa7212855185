//! Command packet construction for the ATECCX08A.
//!
//! Every command sent to the chip has the same fixed shape:
//!
//! ```text
//! [word_address, count, opcode, param1, param2a, param2b, crc_lo, crc_hi]
//! ```
//!
//! - `word_address` marks the transaction as a command (0x03) and is not
//!   counted by `count`.
//! - `count` covers everything after the word address, itself and the two
//!   CRC bytes included, so it is always 7 for this command set.
//! - The CRC is computed over `[count, opcode, param1, param2a, param2b]`,
//!   i.e. `count - 2` bytes.
//!
//! Packets are built fresh per command, transmitted once as a single bus
//! write, and never mutated after the checksum is in place.

use crate::consts::WORD_ADDRESS_COMMAND;
use crate::crc;

/// Command opcodes understood by the ATECCX08A family.
///
/// The driver currently drives [`Info`](Opcode::Info) and
/// [`Random`](Opcode::Random) end to end; the remaining opcodes document
/// the chip's command set and frame identically through
/// [`CommandPacket::build`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Opcode {
    /// Return data at a specific zone and address.
    Read = 0x02,
    /// Write data to a specific zone and address.
    Write = 0x12,
    /// Load a nonce or pass-through value into TempKey.
    Nonce = 0x16,
    /// Lock the configuration and/or the data and OTP zones.
    Lock = 0x17,
    /// Create and return a 32-byte random number.
    Random = 0x1b,
    /// Return device state information (revision, in mode 0x00).
    Info = 0x30,
    /// Create a key pair and store the private half in a key slot.
    GenKey = 0x40,
    /// Create an ECC signature from TempKey and a designated key slot.
    Sign = 0x41,
    /// Verify an ECDSA signature against a message and public key.
    Verify = 0x45,
    /// Compute a SHA-256 or HMAC/SHA digest.
    Sha = 0x47,
}

/// Total bytes in a framed command, word address included.
pub const PACKET_LEN: usize = 8;

/// Value of the count byte for every command this driver frames: opcode,
/// three parameter bytes, the count byte itself, and two CRC bytes.
pub const PACKET_COUNT: u8 = 0x07;

/// A fully framed, checksummed command ready for transmission.
///
/// Built by [`CommandPacket::build`]; the byte layout is documented at the
/// module level. The whole packet is sent as one bus write via
/// [`as_bytes`](CommandPacket::as_bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct CommandPacket {
    bytes: [u8; PACKET_LEN],
}

impl CommandPacket {
    /// Frames `opcode` with the three parameter bytes and appends the
    /// checksum.
    ///
    /// `param2a` and `param2b` are the low and high halves of the chip's
    /// 16-bit Param2 field, in that order.
    pub fn build(opcode: Opcode, param1: u8, param2a: u8, param2b: u8) -> Self {
        let mut bytes = [
            WORD_ADDRESS_COMMAND,
            PACKET_COUNT,
            opcode as u8,
            param1,
            param2a,
            param2b,
            0,
            0,
        ];
        let (lo, hi) = crc::compute(&bytes[1..6]);
        bytes[6] = lo;
        bytes[7] = hi;
        Self { bytes }
    }

    /// The framed packet, word address first, for a single bus write.
    pub fn as_bytes(&self) -> &[u8; PACKET_LEN] {
        &self.bytes
    }
}

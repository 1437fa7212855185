//! Bit-serial CRC-16 used by the CryptoAuth frame format.
//!
//! Polynomial 0x8005, zero seed, input bits taken least-significant first,
//! register XORed on data/carry mismatch. This matches the reference
//! routine in Microchip's data-zone CRC application note; it is not the
//! table-driven CRC-16/CCITT and cannot be swapped for one.

const POLYNOMIAL: u16 = 0x8005;

/// Computes the frame checksum over `data`, returning `(lo, hi)` in the
/// order the chip transmits them.
pub(crate) fn compute(data: &[u8]) -> (u8, u8) {
    let mut register: u16 = 0;
    for byte in data {
        for bit in 0..8 {
            let data_bit = (byte >> bit) & 0x01;
            let crc_bit = (register >> 15) as u8;
            register <<= 1;
            if data_bit != crc_bit {
                register ^= POLYNOMIAL;
            }
        }
    }
    ((register & 0x00ff) as u8, (register >> 8) as u8)
}

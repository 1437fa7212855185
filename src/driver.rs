//! I2C driver for the ATECCX08A cryptographic co-processor.
//!
//! This module provides the [`Ateccx08a`] struct, which drives the chip's
//! half-duplex command/response protocol over any `embedded-hal` 1.0 I2C
//! bus: wake sequencing with the chip's mandated timing, framed command
//! transmission, chunked response reception, and CRC validation.
//!
//! ## Command pipeline
//!
//! Every command runs the same sequence: wake, build packet, transmit,
//! wait the command's execution time, receive the response in bounded
//! chunks, put the chip into idle, then validate the declared count and
//! the checksum before any payload byte is trusted.
//!
//! The wake at the head of every command is unconditional. The chip drops
//! back to sleep on its own after a watchdog interval (1.3–1.7 s), the
//! driver does not track that timer, and the only reliable "are you awake"
//! query is the wake sequence itself.
//!
//! ## Blocking model
//!
//! All operations are synchronous and run to completion; the driver
//! assumes exclusive ownership of the bus for the duration of one
//! wake-to-idle sequence. In a multi-task host, guard the whole command
//! with one mutual exclusion section, not the individual bus transactions.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
//! use ateccx08a::consts::DEFAULT_ADDRESS;
//! use ateccx08a::driver::Ateccx08a;
//!
//! # let expectations = [
//! #     I2cTransaction::write(0x00, vec![]),
//! #     I2cTransaction::read(DEFAULT_ADDRESS, vec![0x04, 0x11, 0x33, 0x43]),
//! # ];
//! # let i2c = I2cMock::new(&expectations);
//! let mut device = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);
//! device.wake()?;
//! # let (mut i2c, _) = device.release();
//! # i2c.done();
//! # Ok::<(), ateccx08a::error::Error<embedded_hal::i2c::ErrorKind>>(())
//! ```
//!
//! For the frame layout, see [`crate::packet`] and [`crate::response`].

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::consts::{
    BUS_CHUNK_LEN, INFO_DEVICE_REVISION, INFO_EXEC_TIME_MS, INFO_RESPONSE_LEN, RANDOM_EXEC_TIME_MS,
    RANDOM_LEN, RANDOM_RESPONSE_LEN, RX_MAX_RETRIES, RX_RETRY_DELAY_US, WAKE_BUS_ADDRESS,
    WAKE_HIGH_DELAY_US, WAKE_RESPONSE_LEN, WAKE_STATUS_SUCCESS, WORD_ADDRESS_IDLE,
};
use crate::error::Error;
use crate::packet::{CommandPacket, Opcode};
use crate::response::Response;

/// Power states of the chip, as last observed by the driver.
///
/// Advisory only: the chip auto-sleeps after its internal watchdog expires
/// (1.3–1.7 s after wake) without telling anyone, so a stored
/// [`Awake`](DeviceState::Awake) must never be relied upon. Every command
/// path re-wakes unconditionally instead of trusting this value.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum DeviceState {
    ///   Low-power state; the chip ignores all bus traffic until the next
    ///   wake condition. Also where the chip lands after its watchdog.
    #[default]
    Sleeping,
    ///   The chip acknowledged a wake condition and accepts commands.
    Awake,
    ///   Low-power state entered on request after a command; TempKey and
    ///   the RNG seed registers are retained, but no transactions are
    ///   accepted until the next wake.
    Idle,
}

/// Driver for an ATECC508A/ATECC608A on an I2C bus.
///
/// Owns the bus handle, the delay provider, and the reception buffer, so
/// no scratch state is shared between instances and one instance is one
/// logical actor on the bus.
///
/// ## Type Parameters
///
/// - `I2C`: A type implementing [`embedded_hal::i2c::I2c`]
/// - `D`: A type implementing [`embedded_hal::delay::DelayNs`] for the
///   chip's wake and execution delays
///
/// ## Example
///
/// ```rust
/// # use embedded_hal_mock::eh1::delay::NoopDelay;
/// # use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
/// use ateccx08a::consts::DEFAULT_ADDRESS;
/// use ateccx08a::driver::Ateccx08a;
///
/// # let info_response = vec![0x07, 0x00, 0x00, 0x50, 0x00, 0x03, 0x91];
/// # let expectations = [
/// #     I2cTransaction::write(0x00, vec![]),
/// #     I2cTransaction::read(DEFAULT_ADDRESS, vec![0x04, 0x11, 0x33, 0x43]),
/// #     I2cTransaction::write(
/// #         DEFAULT_ADDRESS,
/// #         vec![0x03, 0x07, 0x30, 0x00, 0x00, 0x00, 0x03, 0x5d],
/// #     ),
/// #     I2cTransaction::read(DEFAULT_ADDRESS, info_response),
/// #     I2cTransaction::write(DEFAULT_ADDRESS, vec![0x02]),
/// # ];
/// # let i2c = I2cMock::new(&expectations);
/// let mut device = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);
/// device.info()?;
/// # let (mut i2c, _) = device.release();
/// # i2c.done();
/// # Ok::<(), ateccx08a::error::Error<embedded_hal::i2c::ErrorKind>>(())
/// ```
#[derive(Debug)]
pub struct Ateccx08a<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    state: DeviceState,
    response: Response,
}

impl<I2C, D> Ateccx08a<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Creates a driver for the chip at the given 7-bit address.
    ///
    /// # Arguments
    /// - `i2c`: The bus peripheral, owned exclusively by this driver.
    /// - `delay`: Delay provider honoring the chip's timing constraints.
    /// - `address`: 7-bit device address,
    ///   [`DEFAULT_ADDRESS`](crate::consts::DEFAULT_ADDRESS) on a fresh
    ///   chip.
    ///
    /// # Notes
    /// No bus traffic happens here; call [`wake`](Ateccx08a::wake) to
    /// verify the chip is present and responding.
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            state: DeviceState::Sleeping,
            response: Response::new(),
        }
    }

    /// Releases the bus and delay peripherals, consuming the driver.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// The chip's power state as last observed (see [`DeviceState`] for
    /// why this is advisory only).
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Wakes the chip and verifies its wake status frame.
    ///
    /// Generates the wake condition (SDA held low past tWLO by addressing
    /// 0x00 with no payload), waits the mandated tWHI quiet period, then
    /// reads the 4-byte status frame and validates its count, checksum,
    /// and status byte (0x11 on a successful wake).
    ///
    /// # Errors
    /// - [`Error::NoResponse`] if the chip never answers
    /// - [`Error::LengthMismatch`] / [`Error::ChecksumMismatch`] if the
    ///   frame is malformed
    /// - [`Error::UnexpectedStatus`] if the frame is intact but the status
    ///   byte is not 0x11
    ///
    /// There is no internal retry; a failed wake leaves the chip's state
    /// unknown and the caller decides whether to try again.
    pub fn wake(&mut self) -> Result<(), Error<I2C::Error>> {
        self.state = DeviceState::Sleeping;

        // The chip is not listening yet, so the NACK on the wake write is
        // expected and ignored.
        let _ = self.i2c.write(WAKE_BUS_ADDRESS, &[]);
        self.delay.delay_us(WAKE_HIGH_DELAY_US);

        if let Err(error) = self.receive_response(WAKE_RESPONSE_LEN) {
            return Err(match error {
                Error::I2c(_) | Error::Timeout => Error::NoResponse,
                other => other,
            });
        }
        self.response.validate()?;

        let status = self.response.payload().first().copied().unwrap_or(0);
        if status != WAKE_STATUS_SUCCESS {
            #[cfg(feature = "log")]
            log::debug!("wake status {status:#04x}, expected {WAKE_STATUS_SUCCESS:#04x}");
            #[cfg(feature = "defmt-0-3")]
            defmt::debug!("wake status {}, expected {}", status, WAKE_STATUS_SUCCESS);
            return Err(Error::UnexpectedStatus(status));
        }

        self.state = DeviceState::Awake;
        Ok(())
    }

    /// Puts the chip into idle mode.
    ///
    /// Sends the one-byte idle word address; the chip sends no response,
    /// so this is fire-and-forget by design. Idle stops the watchdog from
    /// forcing a full sleep and retains TempKey and the RNG seed.
    ///
    /// Safe to call without a confirmed wake; a sleeping chip ignores the
    /// write.
    pub fn idle(&mut self) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[WORD_ADDRESS_IDLE])
            .map_err(Error::I2c)?;
        self.state = DeviceState::Idle;
        Ok(())
    }

    /// Runs one framed command through the full pipeline and returns the
    /// validated response.
    ///
    /// Wakes the chip, transmits `packet` as a single bus write, waits
    /// `exec_time_ms` for the chip to execute, receives `response_len`
    /// bytes in bounded chunks, idles the chip, then validates count and
    /// checksum. The returned frame has passed both checks; semantic
    /// checks on the payload are the caller's.
    ///
    /// This is the escape hatch for commands the driver does not wrap;
    /// [`info`](Ateccx08a::info) and [`random`](Ateccx08a::random) are
    /// built on it.
    pub fn execute(
        &mut self,
        packet: CommandPacket,
        exec_time_ms: u32,
        response_len: u8,
    ) -> Result<&Response, Error<I2C::Error>> {
        self.wake()?;
        self.i2c
            .write(self.address, packet.as_bytes())
            .map_err(Error::I2c)?;
        self.delay.delay_ms(exec_time_ms);
        self.receive_response(response_len)?;
        self.idle()?;
        self.response.validate()?;
        Ok(&self.response)
    }

    /// Sends the Info command in Revision mode and verifies the device
    /// revision byte.
    ///
    /// Every ECC508A answers `0x00 0x00 0x50 0x00`, where the third byte
    /// is always 0x50 and the fourth carries the silicon revision.
    ///
    /// # Errors
    /// [`Error::UnexpectedStatus`] with the byte seen if the response is
    /// structurally valid but the revision byte is not 0x50, plus any
    /// pipeline error from [`execute`](Ateccx08a::execute).
    pub fn info(&mut self) -> Result<(), Error<I2C::Error>> {
        let packet = CommandPacket::build(Opcode::Info, 0x00, 0x00, 0x00);
        let response = self.execute(packet, INFO_EXEC_TIME_MS, INFO_RESPONSE_LEN)?;

        let revision = response.payload().get(2).copied().unwrap_or(0);
        if revision != INFO_DEVICE_REVISION {
            return Err(Error::UnexpectedStatus(revision));
        }
        Ok(())
    }

    /// Asks the chip's random number generator for a fresh 32-byte value.
    ///
    /// The whole payload of the Random command response is returned; use
    /// the narrower accessors when less entropy is needed.
    pub fn random(&mut self) -> Result<[u8; RANDOM_LEN], Error<I2C::Error>> {
        let packet = CommandPacket::build(Opcode::Random, 0x00, 0x00, 0x00);
        let response = self.execute(packet, RANDOM_EXEC_TIME_MS, RANDOM_RESPONSE_LEN)?;

        let mut bytes = [0u8; RANDOM_LEN];
        bytes.copy_from_slice(response.payload());
        Ok(bytes)
    }

    /// A fresh random byte (the leading byte of a new 32-byte query).
    pub fn random_u8(&mut self) -> Result<u8, Error<I2C::Error>> {
        Ok(self.random()?[0])
    }

    /// A fresh random `u16` from the leading two bytes of a new 32-byte
    /// query, most-significant byte first.
    pub fn random_u16(&mut self) -> Result<u16, Error<I2C::Error>> {
        let bytes = self.random()?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// A fresh random `u32` from the leading four bytes of a new 32-byte
    /// query, most-significant byte first.
    pub fn random_u32(&mut self) -> Result<u32, Error<I2C::Error>> {
        let bytes = self.random()?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Pulls `total_length` response bytes into the reception buffer in
    /// chunks of at most [`BUS_CHUNK_LEN`] bytes per bus transaction.
    ///
    /// A NACK means the chip is still executing; reception backs off
    /// briefly and retries the same chunk, up to
    /// [`RX_MAX_RETRIES`] consecutive attempts before giving up with
    /// [`Error::Timeout`]. Any other bus fault propagates as
    /// [`Error::I2c`] immediately.
    fn receive_response(&mut self, total_length: u8) -> Result<(), Error<I2C::Error>> {
        self.response.reset();
        let mut remaining = usize::from(total_length);
        let mut chunk = [0u8; BUS_CHUNK_LEN];
        let mut attempts: u8 = 0;

        while remaining > 0 {
            let request = remaining.min(BUS_CHUNK_LEN);
            match self.i2c.read(self.address, &mut chunk[..request]) {
                Ok(()) => {
                    self.response.extend(&chunk[..request])?;
                    remaining -= request;
                    attempts = 0;
                }
                Err(error) if matches!(error.kind(), ErrorKind::NoAcknowledge(_)) => {
                    attempts += 1;
                    if attempts > RX_MAX_RETRIES {
                        #[cfg(feature = "log")]
                        log::debug!("device still busy after {RX_MAX_RETRIES} read attempts");
                        #[cfg(feature = "defmt-0-3")]
                        defmt::debug!("device still busy after {} read attempts", RX_MAX_RETRIES);
                        return Err(Error::Timeout);
                    }
                    self.delay.delay_us(RX_RETRY_DELAY_US);
                }
                Err(error) => return Err(Error::I2c(error)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_ADDRESS;
    use crate::crc;
    use embedded_hal::i2c::NoAcknowledgeSource;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const WAKE_FRAME: [u8; 4] = [0x04, 0x11, 0x33, 0x43];

    fn frame(data: &[u8]) -> Vec<u8> {
        let mut bytes = vec![(data.len() + 3) as u8];
        bytes.extend_from_slice(data);
        let (lo, hi) = crc::compute(&bytes);
        bytes.push(lo);
        bytes.push(hi);
        bytes
    }

    fn packet_bytes(opcode: u8) -> Vec<u8> {
        let body = [0x07, opcode, 0x00, 0x00, 0x00];
        let (lo, hi) = crc::compute(&body);
        let mut bytes = vec![0x03];
        bytes.extend_from_slice(&body);
        bytes.push(lo);
        bytes.push(hi);
        bytes
    }

    fn wake_expectations() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(0x00, vec![]),
            I2cTransaction::read(DEFAULT_ADDRESS, WAKE_FRAME.to_vec()),
        ]
    }

    fn random_expectations(data: &[u8; 32]) -> Vec<I2cTransaction> {
        let response = frame(data);
        let mut expectations = wake_expectations();
        expectations.push(I2cTransaction::write(DEFAULT_ADDRESS, packet_bytes(0x1b)));
        // 35 bytes arrive as a full 32-byte chunk plus a 3-byte remainder.
        expectations.push(I2cTransaction::read(
            DEFAULT_ADDRESS,
            response[..32].to_vec(),
        ));
        expectations.push(I2cTransaction::read(
            DEFAULT_ADDRESS,
            response[32..].to_vec(),
        ));
        expectations.push(I2cTransaction::write(DEFAULT_ADDRESS, vec![0x02]));
        expectations
    }

    fn finish<D>(driver: Ateccx08a<I2cMock, D>)
    where
        D: DelayNs,
    {
        let (mut i2c, _) = driver.release();
        i2c.done();
    }

    #[test]
    fn wake_succeeds_on_documented_frame() {
        let i2c = I2cMock::new(&wake_expectations());
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);

        driver.wake().unwrap();
        assert_eq!(driver.state(), DeviceState::Awake);
        finish(driver);
    }

    #[test]
    fn wake_fails_on_bad_status_frame() {
        // Frame from the failed-wake scenario; its checksum is also bogus,
        // so the structural checks reject it before the status byte is
        // ever consulted.
        let expectations = [
            I2cTransaction::write(0x00, vec![]),
            I2cTransaction::read(DEFAULT_ADDRESS, vec![0x04, 0x01, 0x99, 0x99]),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);

        assert!(driver.wake().is_err());
        assert_eq!(driver.state(), DeviceState::Sleeping);
        finish(driver);
    }

    #[test]
    fn wake_reports_unexpected_status() {
        // Structurally valid frame carrying the wrong status byte.
        let expectations = [
            I2cTransaction::write(0x00, vec![]),
            I2cTransaction::read(DEFAULT_ADDRESS, frame(&[0x01])),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);

        assert_eq!(driver.wake(), Err(Error::UnexpectedStatus(0x01)));
        finish(driver);
    }

    #[test]
    fn wake_reports_no_response_on_bus_fault() {
        let expectations = [
            I2cTransaction::write(0x00, vec![]),
            I2cTransaction::read(DEFAULT_ADDRESS, vec![0x00; 4]).with_error(ErrorKind::Other),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);

        assert_eq!(driver.wake(), Err(Error::NoResponse));
        finish(driver);
    }

    #[test]
    fn wake_reports_no_response_when_device_stays_silent() {
        let mut expectations = vec![I2cTransaction::write(0x00, vec![])];
        for _ in 0..=RX_MAX_RETRIES {
            expectations.push(
                I2cTransaction::read(DEFAULT_ADDRESS, vec![0x00; 4])
                    .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
            );
        }
        let i2c = I2cMock::new(&expectations);
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);

        assert_eq!(driver.wake(), Err(Error::NoResponse));
        finish(driver);
    }

    #[test]
    fn idle_is_fire_and_forget() {
        let expectations = [I2cTransaction::write(DEFAULT_ADDRESS, vec![0x02])];
        let i2c = I2cMock::new(&expectations);
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);

        driver.idle().unwrap();
        assert_eq!(driver.state(), DeviceState::Idle);
        finish(driver);
    }

    #[test]
    fn info_verifies_device_revision() {
        let mut expectations = wake_expectations();
        expectations.push(I2cTransaction::write(DEFAULT_ADDRESS, packet_bytes(0x30)));
        expectations.push(I2cTransaction::read(
            DEFAULT_ADDRESS,
            frame(&[0x00, 0x00, 0x50, 0x00]),
        ));
        expectations.push(I2cTransaction::write(DEFAULT_ADDRESS, vec![0x02]));
        let i2c = I2cMock::new(&expectations);
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);

        driver.info().unwrap();
        assert_eq!(driver.state(), DeviceState::Idle);
        finish(driver);
    }

    #[test]
    fn info_rejects_unknown_revision() {
        let mut expectations = wake_expectations();
        expectations.push(I2cTransaction::write(DEFAULT_ADDRESS, packet_bytes(0x30)));
        expectations.push(I2cTransaction::read(
            DEFAULT_ADDRESS,
            frame(&[0x00, 0x00, 0x51, 0x00]),
        ));
        expectations.push(I2cTransaction::write(DEFAULT_ADDRESS, vec![0x02]));
        let i2c = I2cMock::new(&expectations);
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);

        assert_eq!(driver.info(), Err(Error::UnexpectedStatus(0x51)));
        finish(driver);
    }

    #[test]
    fn random_receives_chunked_payload() {
        let mut data = [0u8; 32];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = i as u8;
        }
        let i2c = I2cMock::new(&random_expectations(&data));
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);

        assert_eq!(driver.random().unwrap(), data);
        assert_eq!(driver.state(), DeviceState::Idle);
        finish(driver);
    }

    #[test]
    fn random_rejects_truncated_count() {
        // 35 bytes actually arrive but the chip's count byte claims 0x22.
        let mut response = frame(&[0xa5; 32]);
        response[0] = 0x22;
        let mut expectations = wake_expectations();
        expectations.push(I2cTransaction::write(DEFAULT_ADDRESS, packet_bytes(0x1b)));
        expectations.push(I2cTransaction::read(
            DEFAULT_ADDRESS,
            response[..32].to_vec(),
        ));
        expectations.push(I2cTransaction::read(
            DEFAULT_ADDRESS,
            response[32..].to_vec(),
        ));
        expectations.push(I2cTransaction::write(DEFAULT_ADDRESS, vec![0x02]));
        let i2c = I2cMock::new(&expectations);
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);

        assert_eq!(
            driver.random(),
            Err(Error::LengthMismatch {
                declared: 0x22,
                received: 35
            })
        );
        finish(driver);
    }

    #[test]
    fn random_times_out_when_device_stays_busy() {
        let mut expectations = wake_expectations();
        expectations.push(I2cTransaction::write(DEFAULT_ADDRESS, packet_bytes(0x1b)));
        for _ in 0..=RX_MAX_RETRIES {
            expectations.push(
                I2cTransaction::read(DEFAULT_ADDRESS, vec![0x00; 32])
                    .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
            );
        }
        let i2c = I2cMock::new(&expectations);
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);

        assert_eq!(driver.random(), Err(Error::Timeout));
        finish(driver);
    }

    #[test]
    fn random_integer_accessors_are_big_endian() {
        let mut data = [0u8; 32];
        data[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

        let i2c = I2cMock::new(&random_expectations(&data));
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);
        assert_eq!(driver.random_u32().unwrap(), 0xdead_beef);
        finish(driver);

        let i2c = I2cMock::new(&random_expectations(&data));
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);
        assert_eq!(driver.random_u16().unwrap(), 0xdead);
        finish(driver);

        let i2c = I2cMock::new(&random_expectations(&data));
        let mut driver = Ateccx08a::new(i2c, NoopDelay::new(), DEFAULT_ADDRESS);
        assert_eq!(driver.random_u8().unwrap(), 0xde);
        finish(driver);
    }
}

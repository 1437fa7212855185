//! # ateccx08a
//!
//! A portable, no_std Rust driver for the ATECCX08A family of I2C
//! cryptographic co-processors (ATECC508A, ATECC608A), as found on the
//! SparkFun Cryptographic Co-Processor and similar breakouts.
//!
//! The chip does the cryptography; this driver does the protocol:
//! - the sleep/wake/idle state sequence with the chip-mandated timing
//! - fixed-shape command framing (word address, count, opcode, parameters,
//!   CRC) over `embedded-hal` I2C
//! - chunked response reception bounded to 32 bytes per bus transaction
//! - count and CRC validation before any payload byte is exposed
//!
//! ## Crate features
//! | Feature     | Description |
//! |-------------|-------------|
//! | `std`       | Disables `#![no_std]`; enables `std` in `thiserror` and `log` |
//! | `defmt-0-3` | Emits validation diagnostics through `defmt` |
//! | `log`       | Emits validation diagnostics through `log` |
//!
//! ## Usage
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
//! ## Integration Notes
//!
//! - The chip auto-sleeps 1.3–1.7 s after waking; every command in this
//!   driver re-wakes unconditionally, so callers never need to track that.
//! - Operations are blocking and half-duplex; give one driver instance
//!   exclusive ownership of the bus for the whole wake-to-idle sequence.
//! - Only the Info and Random commands are wrapped; other commands of the
//!   family can be framed with [`packet::CommandPacket::build`] and driven
//!   through [`driver::Ateccx08a::execute`].
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded
//! environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub use heapless;

pub mod consts;
pub(crate) mod crc;
pub mod driver;
pub mod error;
pub mod packet;
pub mod response;

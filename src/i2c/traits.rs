// Licensed under the Apache-2.0 license

//! # I2C Hardware Abstraction Traits
//!
//! Small traits, each with one responsibility, composed by the concrete
//! controller driver:
//!
//! ```text
//! I2cHardwareCore (bring-up, side-band outputs)
//!     ├── I2cMaster (plain embedded-hal style transfers)
//!     └── SubAddressedMaster (register-file devices: address + sub-address)
//! ```
//!
//! Device drivers such as the codec client are generic over
//! [`SubAddressedMaster`], so they run unchanged against real hardware or a
//! simulated controller.

use crate::i2c::common::SubAddress;
use embedded_hal::i2c::{AddressMode, Operation, SevenBitAddress};

/// Core controller interface every implementation provides.
pub trait I2cHardwareCore {
    /// Hardware-specific error type that implements embedded-hal error traits
    type Error: embedded_hal::i2c::Error + core::fmt::Debug;

    /// Bring the controller up. Must run once before any transfer.
    ///
    /// # Errors
    ///
    /// Implementations that talk to hardware synchronously may report a
    /// controller that does not come out of reset.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Drive the controller's general purpose output lines.
    ///
    /// Independent of any transfer in progress.
    fn set_gpo(&mut self, value: u32);
}

/// Plain master transfers, mirroring `embedded_hal::i2c::I2c`.
///
/// # Examples
///
/// ```rust,no_run
/// use axi_iic_ddk::i2c::traits::I2cMaster;
///
/// fn read_sensor<T: I2cMaster>(mut i2c: T) -> Result<u16, T::Error> {
///     let mut data = [0u8; 2];
///     i2c.read(0x48u8, &mut data)?;
///     Ok(u16::from_be_bytes(data))
/// }
/// ```
pub trait I2cMaster<A: AddressMode = SevenBitAddress>: I2cHardwareCore {
    /// Write `bytes` to the slave at `addr`, ending with STOP.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid input or when a bounded wait expires.
    fn write(&mut self, addr: A, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buffer` from the slave at `addr`, ending with STOP.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid input or when a bounded wait expires.
    fn read(&mut self, addr: A, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read with a repeated START between the two phases.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid input or when a bounded wait expires.
    fn write_read(&mut self, addr: A, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Run `ops_slice` as one bus transaction: one START, a repeated START
    /// on each direction change, one STOP at the end.
    ///
    /// # Errors
    ///
    /// Returns an error if any operation is invalid or a bounded wait
    /// expires. Nothing is enqueued when validation fails.
    fn transaction_slice(
        &mut self,
        addr: A,
        ops_slice: &mut [Operation<'_>],
    ) -> Result<(), Self::Error>;
}

/// Register-file access: every transfer starts by setting the device's
/// internal pointer with an 8- or 16-bit sub-address.
pub trait SubAddressedMaster: I2cHardwareCore {
    /// Write `bytes` to consecutive registers starting at `sub`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid input or when a bounded wait expires.
    fn write_registers(
        &mut self,
        addr: SevenBitAddress,
        sub: SubAddress,
        bytes: &[u8],
    ) -> Result<(), Self::Error>;

    /// Read `buffer.len()` consecutive registers starting at `sub`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid input or when a bounded wait expires.
    fn read_registers(
        &mut self,
        addr: SevenBitAddress,
        sub: SubAddress,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Write a single register.
    ///
    /// # Errors
    ///
    /// See [`SubAddressedMaster::write_registers`].
    fn write_register(
        &mut self,
        addr: SevenBitAddress,
        sub: SubAddress,
        value: u8,
    ) -> Result<(), Self::Error> {
        self.write_registers(addr, sub, &[value])
    }

    /// Read a single register.
    ///
    /// # Errors
    ///
    /// See [`SubAddressedMaster::read_registers`].
    fn read_register(&mut self, addr: SevenBitAddress, sub: SubAddress) -> Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_registers(addr, sub, &mut value)?;
        let [value] = value;
        Ok(value)
    }

    /// Read `N` consecutive registers into a fixed-size array.
    ///
    /// # Errors
    ///
    /// See [`SubAddressedMaster::read_registers`].
    fn read_many<const N: usize>(
        &mut self,
        addr: SevenBitAddress,
        sub: SubAddress,
    ) -> Result<[u8; N], Self::Error> {
        let mut buffer = [0u8; N];
        self.read_registers(addr, sub, &mut buffer)?;
        Ok(buffer)
    }
}

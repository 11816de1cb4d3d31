// Licensed under the Apache-2.0 license

//! ADAU1761 control-port client.
//!
//! The codec object holds configuration only; the bus is borrowed for each
//! call, so one controller can serve other devices between codec accesses.
//!
//! ```rust,no_run
//! # use axi_iic_ddk::codec::adau1761::{Adau1761, CodecConfig, CodecError};
//! # use axi_iic_ddk::common::NoOpLogger;
//! # use axi_iic_ddk::i2c::traits::SubAddressedMaster;
//! # use embedded_hal::delay::DelayNs;
//! fn bring_up<B: SubAddressedMaster, D: DelayNs>(
//!     bus: &mut B,
//!     delay: &mut D,
//! ) -> Result<(), CodecError<B::Error>> {
//!     let mut codec = Adau1761::new(CodecConfig::default(), NoOpLogger);
//!     codec.init(bus, delay)
//! }
//! ```

use crate::codec::pll::{PllControl, PLL_BLOCK_LEN};
use crate::codec::registers::{
    RegisterInitEntry, CLKCTRL_COREN, DEFAULT_ADDRESS, DEFAULT_INIT, R0_CLKCTRL, R1_PLL, R_BASE,
};
use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{poll_until, SubAddress, WaitPolicy};
use crate::i2c::traits::SubAddressedMaster;
use core::fmt;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::SevenBitAddress;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CodecError<E> {
    /// A control-port transfer failed.
    Bus(E),
    /// The PLL did not report lock within the configured wait.
    PllLockTimeout,
}

impl<E> From<E> for CodecError<E> {
    fn from(err: E) -> Self {
        CodecError::Bus(err)
    }
}

impl<E: fmt::Display> fmt::Display for CodecError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Bus(err) => write!(f, "codec bus error: {err}"),
            CodecError::PllLockTimeout => f.write_str("codec PLL did not lock"),
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct CodecConfig {
    pub address: SevenBitAddress,
    /// Written to `R1_PLL` before the core clock is enabled.
    pub pll: PllControl,
    /// Bound on the PLL lock wait; only used when `pll` has PLLEN set.
    pub lock_wait: WaitPolicy,
    /// Written to `R0_CLKCTRL` once the clock source is stable.
    pub clock_control: u8,
    pub init_table: &'static [RegisterInitEntry],
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            pll: PllControl::DISABLED,
            lock_wait: WaitPolicy::Infinite,
            clock_control: CLKCTRL_COREN,
            init_table: DEFAULT_INIT,
        }
    }
}

fn register(offset: u8) -> SubAddress {
    SubAddress::Word(R_BASE + u16::from(offset))
}

pub struct Adau1761<L: Logger = NoOpLogger> {
    config: CodecConfig,
    logger: L,
}

impl<L: Logger> Adau1761<L> {
    pub fn new(config: CodecConfig, logger: L) -> Self {
        Self { config, logger }
    }

    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn logger_mut(&mut self) -> &mut L {
        &mut self.logger
    }

    /// Write one control register.
    ///
    /// # Errors
    ///
    /// Returns the bus error of the failed transfer.
    pub fn poke<B: SubAddressedMaster>(
        &self,
        bus: &mut B,
        offset: u8,
        value: u8,
    ) -> Result<(), B::Error> {
        bus.write_register(self.config.address, register(offset), value)
    }

    /// Write consecutive control registers starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns the bus error of the failed transfer.
    pub fn poke_many<B: SubAddressedMaster>(
        &self,
        bus: &mut B,
        offset: u8,
        bytes: &[u8],
    ) -> Result<(), B::Error> {
        bus.write_registers(self.config.address, register(offset), bytes)
    }

    /// Read one control register.
    ///
    /// # Errors
    ///
    /// Returns the bus error of the failed transfer.
    pub fn peek<B: SubAddressedMaster>(&self, bus: &mut B, offset: u8) -> Result<u8, B::Error> {
        bus.read_register(self.config.address, register(offset))
    }

    /// Read consecutive control registers starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns the bus error of the failed transfer.
    pub fn peek_many<B: SubAddressedMaster>(
        &self,
        bus: &mut B,
        offset: u8,
        buffer: &mut [u8],
    ) -> Result<(), B::Error> {
        bus.read_registers(self.config.address, register(offset), buffer)
    }

    /// Current contents of the PLL control block.
    ///
    /// # Errors
    ///
    /// Returns the bus error of the failed transfer.
    pub fn read_pll<B: SubAddressedMaster>(&self, bus: &mut B) -> Result<PllControl, B::Error> {
        let block = bus.read_many::<PLL_BLOCK_LEN>(self.config.address, register(R1_PLL))?;
        Ok(PllControl::from_block(block))
    }

    /// Bring the codec from reset to the configured state.
    ///
    /// Programs the PLL, waits for lock when the PLL is enabled, enables the
    /// core clock and replays the init table. Stops at the first failure;
    /// registers written before it keep their new values.
    ///
    /// # Errors
    ///
    /// [`CodecError::Bus`] for a failed transfer, [`CodecError::PllLockTimeout`]
    /// when a bounded lock wait expires.
    pub fn init<B, D>(&mut self, bus: &mut B, delay: &mut D) -> Result<(), CodecError<B::Error>>
    where
        B: SubAddressedMaster,
        D: DelayNs,
    {
        let current = self.read_pll(bus)?;
        self.logger.debug(format_args!(
            "adau1761: pll block at reset {:02x?}",
            current.to_block()
        ));

        let pll = self.config.pll;
        self.poke_many(bus, R1_PLL, &pll.to_block())?;

        if pll.is_enabled() {
            self.logger.info(format_args!("adau1761: waiting for pll lock"));
            let locked = poll_until(delay, self.config.lock_wait, || {
                self.read_pll(bus).map(|block| block.is_locked())
            })?;
            if !locked {
                self.logger.error(format_args!("adau1761: pll lock timeout"));
                return Err(CodecError::PllLockTimeout);
            }
        }

        self.poke(bus, R0_CLKCTRL, self.config.clock_control)?;

        let table = self.config.init_table;
        for entry in table {
            self.poke(bus, entry.offset, entry.value)?;
        }

        self.logger.info(format_args!(
            "adau1761: {} registers initialised at {:#04x}",
            table.len(),
            self.config.address
        ));
        Ok(())
    }
}

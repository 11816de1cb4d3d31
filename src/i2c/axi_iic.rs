// Licensed under the Apache-2.0 license

//! Master-mode driver for the Xilinx AXI IIC controller in dynamic mode.
//!
//! In dynamic mode every transmit-FIFO word carries a payload byte plus
//! START/STOP control bits, and a read is requested by queueing the slave
//! address with the read bit followed by a byte count. The driver never
//! uses interrupts: completion is observed by polling the status register
//! (bus busy, TX FIFO empty, RX FIFO empty), and it never assumes a FIFO
//! depth; it always waits for empty / non-empty.
//!
//! Every wait goes through the configured [`WaitPolicy`]. The default,
//! [`WaitPolicy::Infinite`], spins until the hardware condition holds, so a
//! slave holding the bus hangs the caller. A bounded policy turns the same
//! situation into [`Error::Timeout`].
//!
//! # Ownership
//!
//! One `AxiIic` owns one controller and every operation takes `&mut self`,
//! so transactions cannot interleave. Sharing the bus between tasks needs a
//! lock around whole transactions, not around register accesses.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{
    cr, poll_until, reg, Direction, FramedWord, I2cConfig, Status, SubAddress, WaitCondition,
    MAX_READ_LEN, RX_FIFO_DEPTH,
};
use crate::i2c::traits::{I2cHardwareCore, I2cMaster, SubAddressedMaster};
use crate::mmio::RegisterBlock;
use core::convert::Infallible;
use core::fmt;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, Operation, SevenBitAddress};

/// Highest 7-bit slave address.
const MAX_ADDRESS: u8 = 0x7F;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A bounded wait expired before the hardware condition held.
    Timeout(WaitCondition),
    /// A transfer was attempted before [`AxiIic::init`].
    NotInitialized,
    /// Slave address does not fit in 7 bits.
    InvalidAddress,
    /// Zero-length write or read.
    EmptyBuffer,
    /// Read longer than one count word can request.
    BufferTooLong,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Timeout(condition) => write!(f, "timed out waiting for {condition:?}"),
            Error::NotInitialized => f.write_str("controller not initialized"),
            Error::InvalidAddress => f.write_str("slave address out of 7-bit range"),
            Error::EmptyBuffer => f.write_str("zero-length transfer"),
            Error::BufferTooLong => f.write_str("read longer than 255 bytes"),
        }
    }
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        // The controller reports neither NACK nor arbitration loss in the
        // status bits this driver polls.
        ErrorKind::Other
    }
}

pub struct AxiIic<R: RegisterBlock, D: DelayNs, L: Logger = NoOpLogger> {
    regs: R,
    delay: D,
    config: I2cConfig,
    logger: L,
    initialized: bool,
}

impl<R: RegisterBlock, D: DelayNs, L: Logger> AxiIic<R, D, L> {
    pub fn new(regs: R, delay: D, config: I2cConfig, logger: L) -> Self {
        Self {
            regs,
            delay,
            config,
            logger,
            initialized: false,
        }
    }

    /// Reset the TX FIFO and enable the controller.
    ///
    /// The RX FIFO threshold is programmed even though no interrupt is used;
    /// the controller expects it before first use.
    pub fn init(&mut self) {
        self.regs.write8(reg::RX_FIFO_PIRQ, self.config.rx_fifo_depth);
        self.regs.write8(reg::CR, cr::TXRST);
        self.regs.write8(reg::CR, cr::EN);
        self.initialized = true;

        self.logger.info(format_args!(
            "axi-iic: enabled, rx threshold {:#04x}",
            self.config.rx_fifo_depth
        ));
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn set_gpo(&mut self, value: u32) {
        self.regs.write32(reg::GPO, value);
    }

    pub fn status(&mut self) -> Status {
        Status::from_bits(self.regs.read8(reg::SR))
    }

    #[must_use]
    pub fn config(&self) -> &I2cConfig {
        &self.config
    }

    pub fn logger_mut(&mut self) -> &mut L {
        &mut self.logger
    }

    #[must_use]
    pub fn registers(&self) -> &R {
        &self.regs
    }

    pub fn release(self) -> (R, D, L) {
        (self.regs, self.delay, self.logger)
    }

    /// Write `bytes` to consecutive registers at `sub`; the last byte
    /// carries STOP.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyBuffer`] for an empty `bytes`; [`Error::NotInitialized`],
    /// [`Error::InvalidAddress`] or [`Error::Timeout`] otherwise.
    pub fn write_registers(
        &mut self,
        addr: SevenBitAddress,
        sub: SubAddress,
        bytes: &[u8],
    ) -> Result<(), Error> {
        self.check_target(addr)?;
        if bytes.is_empty() {
            return Err(Error::EmptyBuffer);
        }

        self.begin()?;
        self.push(FramedWord::start(addr, Direction::Write));
        self.push_sub_address(sub);
        self.push_payload(bytes, true);
        self.finish_write()
    }

    /// Set the register pointer to `sub`, then read `buffer.len()` bytes
    /// after a repeated START.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyBuffer`] or [`Error::BufferTooLong`] for an unusable
    /// `buffer`; [`Error::NotInitialized`], [`Error::InvalidAddress`] or
    /// [`Error::Timeout`] otherwise.
    pub fn read_registers(
        &mut self,
        addr: SevenBitAddress,
        sub: SubAddress,
        buffer: &mut [u8],
    ) -> Result<(), Error> {
        self.check_target(addr)?;
        let count = read_count(buffer.len())?;

        self.begin()?;
        self.push(FramedWord::start(addr, Direction::Write));
        self.push_sub_address(sub);
        self.push(FramedWord::start(addr, Direction::Read));
        self.push(FramedWord::read_count(count, true));
        self.wait_tx_empty()?;
        self.receive(buffer)?;
        self.wait_bus_idle()
    }

    /// Run `ops` as a single transaction.
    ///
    /// Adjacent operations of the same kind are merged without a repeated
    /// START, as `embedded_hal::i2c::I2c::transaction` requires. Every
    /// operation is validated before the first word is queued.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyBuffer`] for an empty operation, [`Error::BufferTooLong`]
    /// for a run of reads over 255 bytes; [`Error::NotInitialized`],
    /// [`Error::InvalidAddress`] or [`Error::Timeout`] otherwise.
    pub fn transaction(
        &mut self,
        addr: SevenBitAddress,
        ops: &mut [Operation<'_>],
    ) -> Result<(), Error> {
        self.check_target(addr)?;
        validate_operations(ops)?;
        if ops.is_empty() {
            return Ok(());
        }

        self.begin()?;

        let mut index = 0;
        let mut last_dir = Direction::Write;
        while index < ops.len() {
            let (end, len) = run_of(ops, index);
            let is_last = end == ops.len();
            let run = end - index;

            if matches!(ops.get(index), Some(Operation::Read(_))) {
                self.push(FramedWord::start(addr, Direction::Read));
                self.push(FramedWord::read_count(read_count(len)?, is_last));
                self.wait_tx_empty()?;
                for op in ops.iter_mut().skip(index).take(run) {
                    if let Operation::Read(buffer) = op {
                        self.receive(buffer)?;
                    }
                }
                last_dir = Direction::Read;
            } else {
                self.push(FramedWord::start(addr, Direction::Write));
                for (pos, op) in ops.iter().skip(index).take(run).enumerate() {
                    if let Operation::Write(bytes) = op {
                        self.push_payload(bytes, is_last && pos + 1 == run);
                    }
                }
                last_dir = Direction::Write;
            }
            index = end;
        }

        match last_dir {
            Direction::Write => self.finish_write(),
            Direction::Read => self.wait_bus_idle(),
        }
    }

    fn check_target(&self, addr: SevenBitAddress) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        if addr > MAX_ADDRESS {
            return Err(Error::InvalidAddress);
        }
        Ok(())
    }

    /// Wait for the previous transaction to finish and discard whatever an
    /// aborted read left in the RX FIFO.
    ///
    /// Each poll pops at most one FIFO depth of bytes, so a controller whose
    /// RX-empty flag never sets runs into the wait policy like any other
    /// wait.
    fn begin(&mut self) -> Result<(), Error> {
        self.wait_bus_idle()?;
        self.wait_tx_empty()?;

        let mut drained = 0u32;
        let regs = &mut self.regs;
        let empty = poll_until(&mut self.delay, self.config.wait, || {
            for _ in 0..RX_FIFO_DEPTH {
                if Status::from_bits(regs.read8(reg::SR)).rx_empty() {
                    return Ok::<_, Infallible>(true);
                }
                let _ = regs.read8(reg::RX_FIFO);
                drained = drained.saturating_add(1);
            }
            Ok(false)
        })
        .unwrap_or_else(|never| match never {});

        if drained > 0 {
            self.logger
                .debug(format_args!("axi-iic: discarded {drained} stale rx bytes"));
        }
        if empty {
            Ok(())
        } else {
            self.timed_out(WaitCondition::RxDrained)
        }
    }

    fn push(&mut self, word: FramedWord) {
        self.regs.write16(reg::TX_FIFO, word.bits());
    }

    fn push_sub_address(&mut self, sub: SubAddress) {
        let (bytes, len) = sub.to_bytes();
        for &byte in bytes.iter().take(len) {
            self.push(FramedWord::data(byte));
        }
    }

    fn push_payload(&mut self, bytes: &[u8], stop_after_last: bool) {
        if let Some((&last, head)) = bytes.split_last() {
            for &byte in head {
                self.push(FramedWord::data(byte));
            }
            self.push(if stop_after_last {
                FramedWord::stop(last)
            } else {
                FramedWord::data(last)
            });
        }
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        for slot in buffer.iter_mut() {
            self.wait_rx_data()?;
            *slot = self.regs.read8(reg::RX_FIFO);
        }
        Ok(())
    }

    /// TX FIFO empty only means the bytes left the queue; the bus cycle is
    /// over once busy clears.
    fn finish_write(&mut self) -> Result<(), Error> {
        self.wait_tx_empty()?;
        self.wait_bus_idle()
    }

    fn wait_bus_idle(&mut self) -> Result<(), Error> {
        self.wait_status(WaitCondition::BusIdle, |s| !s.bus_busy())
    }

    fn wait_tx_empty(&mut self) -> Result<(), Error> {
        self.wait_status(WaitCondition::TxEmpty, Status::tx_empty)
    }

    fn wait_rx_data(&mut self) -> Result<(), Error> {
        self.wait_status(WaitCondition::RxData, |s| !s.rx_empty())
    }

    fn wait_status(
        &mut self,
        condition: WaitCondition,
        done: fn(Status) -> bool,
    ) -> Result<(), Error> {
        let regs = &mut self.regs;
        let ready = poll_until(&mut self.delay, self.config.wait, || {
            Ok::<_, Infallible>(done(Status::from_bits(regs.read8(reg::SR))))
        })
        .unwrap_or_else(|never| match never {});

        if ready {
            Ok(())
        } else {
            self.timed_out(condition)
        }
    }

    fn timed_out(&mut self, condition: WaitCondition) -> Result<(), Error> {
        let status = self.status();
        self.logger.error(format_args!(
            "axi-iic: timeout waiting for {condition:?}, status {:#04x}",
            status.bits()
        ));
        Err(Error::Timeout(condition))
    }
}

/// End index (exclusive) and total byte count of the run of same-kind
/// operations starting at `start`.
fn run_of(ops: &[Operation<'_>], start: usize) -> (usize, usize) {
    let is_read = matches!(ops.get(start), Some(Operation::Read(_)));
    let mut end = start;
    let mut len = 0;
    for op in ops.iter().skip(start) {
        match op {
            Operation::Read(buffer) if is_read => len += buffer.len(),
            Operation::Write(bytes) if !is_read => len += bytes.len(),
            _ => break,
        }
        end += 1;
    }
    (end, len)
}

fn validate_operations(ops: &[Operation<'_>]) -> Result<(), Error> {
    let has_empty = ops.iter().any(|op| match op {
        Operation::Read(buffer) => buffer.is_empty(),
        Operation::Write(bytes) => bytes.is_empty(),
    });
    if has_empty {
        return Err(Error::EmptyBuffer);
    }

    let mut index = 0;
    while index < ops.len() {
        let (end, len) = run_of(ops, index);
        if matches!(ops.get(index), Some(Operation::Read(_))) {
            read_count(len)?;
        }
        index = end;
    }
    Ok(())
}

fn read_count(len: usize) -> Result<u8, Error> {
    if len == 0 {
        return Err(Error::EmptyBuffer);
    }
    if len > MAX_READ_LEN {
        return Err(Error::BufferTooLong);
    }
    u8::try_from(len).map_err(|_| Error::BufferTooLong)
}

impl<R: RegisterBlock, D: DelayNs, L: Logger> I2cHardwareCore for AxiIic<R, D, L> {
    type Error = Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        AxiIic::init(self);
        Ok(())
    }

    fn set_gpo(&mut self, value: u32) {
        AxiIic::set_gpo(self, value);
    }
}

impl<R: RegisterBlock, D: DelayNs, L: Logger> I2cMaster for AxiIic<R, D, L> {
    fn write(&mut self, addr: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error> {
        self.transaction(addr, &mut [Operation::Write(bytes)])
    }

    fn read(&mut self, addr: SevenBitAddress, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.transaction(addr, &mut [Operation::Read(buffer)])
    }

    fn write_read(
        &mut self,
        addr: SevenBitAddress,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.transaction(addr, &mut [Operation::Write(bytes), Operation::Read(buffer)])
    }

    fn transaction_slice(
        &mut self,
        addr: SevenBitAddress,
        ops_slice: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transaction(addr, ops_slice)
    }
}

impl<R: RegisterBlock, D: DelayNs, L: Logger> SubAddressedMaster for AxiIic<R, D, L> {
    fn write_registers(
        &mut self,
        addr: SevenBitAddress,
        sub: SubAddress,
        bytes: &[u8],
    ) -> Result<(), Self::Error> {
        AxiIic::write_registers(self, addr, sub, bytes)
    }

    fn read_registers(
        &mut self,
        addr: SevenBitAddress,
        sub: SubAddress,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        AxiIic::read_registers(self, addr, sub, buffer)
    }
}

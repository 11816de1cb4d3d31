// Licensed under the Apache-2.0 license

//! Common types and constants for the AXI IIC driver.
//!
//! This module holds the register map of the controller, the transmit-FIFO
//! word encoding used in dynamic controller mode, the status flags the engine
//! polls, and the driver configuration.

use embedded_hal::delay::DelayNs;
use fugit::MicrosDurationU32;

/// Register offsets from the controller base.
pub mod reg {
    /// Control register.
    pub const CR: usize = 0x100;
    /// Status register.
    pub const SR: usize = 0x104;
    /// Transmit FIFO; 16-bit writes of [`FramedWord`](super::FramedWord).
    pub const TX_FIFO: usize = 0x108;
    /// Receive FIFO; pops one byte per read.
    pub const RX_FIFO: usize = 0x10C;
    /// Receive FIFO programmable depth interrupt register.
    pub const RX_FIFO_PIRQ: usize = 0x120;
    /// General purpose output register.
    pub const GPO: usize = 0x124;
}

/// Control register bits.
pub mod cr {
    pub const EN: u8 = 1 << 0;
    pub const TXRST: u8 = 1 << 1;
}

/// Deepest receive FIFO threshold the controller accepts.
pub const RX_FIFO_PIRQ_MAX: u8 = 0x0F;

/// Receive FIFO depth in bytes.
pub const RX_FIFO_DEPTH: usize = RX_FIFO_PIRQ_MAX as usize + 1;

/// Largest read a single count word can request.
pub const MAX_READ_LEN: usize = u8::MAX as usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

/// Register offset inside a slave device, sent right after the address byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubAddress {
    /// One sub-address byte.
    Byte(u8),
    /// Two sub-address bytes, high byte first.
    Word(u16),
}

impl SubAddress {
    /// Bytes in bus order.
    #[must_use]
    pub fn to_bytes(self) -> ([u8; 2], usize) {
        match self {
            SubAddress::Byte(sa) => ([sa, 0], 1),
            SubAddress::Word(sa) => (sa.to_be_bytes(), 2),
        }
    }
}

impl From<u8> for SubAddress {
    fn from(sa: u8) -> Self {
        SubAddress::Byte(sa)
    }
}

impl From<u16> for SubAddress {
    fn from(sa: u16) -> Self {
        SubAddress::Word(sa)
    }
}

/// One transmit-FIFO entry: a payload byte plus START/STOP control bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FramedWord(u16);

impl FramedWord {
    pub const START: u16 = 1 << 8;
    pub const STOP: u16 = 1 << 9;

    /// START (or repeated START) followed by the address byte.
    #[must_use]
    pub const fn start(addr: u8, dir: Direction) -> Self {
        Self(Self::START | ((addr as u16) << 1) | dir as u16)
    }

    #[must_use]
    pub const fn data(byte: u8) -> Self {
        Self(byte as u16)
    }

    /// Last byte of a write; STOP follows it.
    #[must_use]
    pub const fn stop(byte: u8) -> Self {
        Self(Self::STOP | byte as u16)
    }

    /// Number of bytes to receive after a read address, optionally ending
    /// the transaction with STOP after the last one.
    #[must_use]
    pub const fn read_count(count: u8, stop: bool) -> Self {
        if stop {
            Self::stop(count)
        } else {
            Self::data(count)
        }
    }

    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn payload(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    #[must_use]
    pub const fn is_start(self) -> bool {
        self.0 & Self::START != 0
    }

    #[must_use]
    pub const fn is_stop(self) -> bool {
        self.0 & Self::STOP != 0
    }
}

/// Snapshot of the status register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Status(u8);

impl Status {
    pub const BB: u8 = 1 << 2;
    pub const RX_EMPTY: u8 = 1 << 6;
    pub const TX_EMPTY: u8 = 1 << 7;

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn bus_busy(self) -> bool {
        self.0 & Self::BB != 0
    }

    #[must_use]
    pub const fn rx_empty(self) -> bool {
        self.0 & Self::RX_EMPTY != 0
    }

    #[must_use]
    pub const fn tx_empty(self) -> bool {
        self.0 & Self::TX_EMPTY != 0
    }
}

/// Hardware condition a poll loop waits for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitCondition {
    /// Bus-busy flag clear.
    BusIdle,
    /// Transmit FIFO drained.
    TxEmpty,
    /// At least one received byte available.
    RxData,
    /// Receive FIFO emptied of bytes left by an earlier transfer.
    RxDrained,
    /// Codec PLL reports lock.
    PllLock,
}

/// How long a poll loop may spin before giving up.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Spin until the condition holds, however long that takes.
    #[default]
    Infinite,
    /// Poll every `poll_interval`; fail once `timeout` has elapsed.
    Bounded {
        timeout: MicrosDurationU32,
        poll_interval: MicrosDurationU32,
    },
}

impl WaitPolicy {
    /// Number of polls allowed after the first one, `None` when unbounded.
    ///
    /// A zero `poll_interval` counts, and is slept, as one microsecond.
    #[must_use]
    pub fn max_polls(&self) -> Option<u32> {
        match *self {
            WaitPolicy::Infinite => None,
            WaitPolicy::Bounded {
                timeout,
                poll_interval,
            } => {
                let interval = poll_interval.ticks().max(1);
                Some(timeout.ticks().div_ceil(interval))
            }
        }
    }
}

/// Poll `ready` until it reports `true` or `policy` runs out.
///
/// Returns `Ok(false)` only for a bounded policy whose budget expired;
/// under [`WaitPolicy::Infinite`] this returns once the condition holds.
///
/// # Errors
///
/// Propagates the first error returned by `ready`.
pub fn poll_until<D, E, F>(delay: &mut D, policy: WaitPolicy, mut ready: F) -> Result<bool, E>
where
    D: DelayNs,
    F: FnMut() -> Result<bool, E>,
{
    if ready()? {
        return Ok(true);
    }

    match policy {
        WaitPolicy::Infinite => loop {
            core::hint::spin_loop();
            if ready()? {
                return Ok(true);
            }
        },
        WaitPolicy::Bounded { poll_interval, .. } => {
            let polls = policy.max_polls().unwrap_or(0);
            let interval_us = poll_interval.ticks().max(1);
            for _ in 0..polls {
                delay.delay_us(interval_us);
                if ready()? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct I2cConfig {
    pub rx_fifo_depth: u8,
    pub wait: WaitPolicy,
}

pub struct I2cConfigBuilder {
    rx_fifo_depth: u8,
    wait: WaitPolicy,
}

impl Default for I2cConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for I2cConfig {
    fn default() -> Self {
        I2cConfigBuilder::new().build()
    }
}

impl I2cConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rx_fifo_depth: RX_FIFO_PIRQ_MAX,
            wait: WaitPolicy::Infinite,
        }
    }
    #[must_use]
    pub fn rx_fifo_depth(mut self, depth: u8) -> Self {
        self.rx_fifo_depth = depth;
        self
    }
    #[must_use]
    pub fn wait(mut self, policy: WaitPolicy) -> Self {
        self.wait = policy;
        self
    }
    #[must_use]
    pub fn timeout(mut self, timeout: MicrosDurationU32, poll_interval: MicrosDurationU32) -> Self {
        self.wait = WaitPolicy::Bounded {
            timeout,
            poll_interval,
        };
        self
    }
    #[must_use]
    pub fn build(self) -> I2cConfig {
        I2cConfig {
            rx_fifo_depth: self.rx_fifo_depth.min(RX_FIFO_PIRQ_MAX),
            wait: self.wait,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framed_word_encoding() {
        let start = FramedWord::start(0x3B, Direction::Write);
        assert_eq!(start.bits(), 0x176);
        assert!(start.is_start());
        assert!(!start.is_stop());

        let restart = FramedWord::start(0x3B, Direction::Read);
        assert_eq!(restart.bits(), 0x177);

        assert_eq!(FramedWord::stop(0x01).bits(), 0x201);
        assert_eq!(FramedWord::read_count(6, true).bits(), 0x206);
        assert_eq!(FramedWord::read_count(6, false).bits(), 0x006);
        assert_eq!(FramedWord::data(0xA5).payload(), 0xA5);
    }

    #[test]
    fn test_sub_address_bus_order() {
        assert_eq!(SubAddress::Word(0x4002).to_bytes(), ([0x40, 0x02], 2));
        assert_eq!(SubAddress::Byte(0x7F).to_bytes(), ([0x7F, 0x00], 1));
        assert_eq!(SubAddress::from(0x12u8), SubAddress::Byte(0x12));
        assert_eq!(SubAddress::from(0x1234u16), SubAddress::Word(0x1234));
    }

    #[test]
    fn test_status_flags() {
        let idle = Status::from_bits(Status::TX_EMPTY | Status::RX_EMPTY);
        assert!(!idle.bus_busy());
        assert!(idle.tx_empty());
        assert!(idle.rx_empty());

        let busy = Status::from_bits(Status::BB);
        assert!(busy.bus_busy());
        assert!(!busy.tx_empty());
        assert!(!busy.rx_empty());
    }

    #[test]
    fn test_wait_policy_poll_budget() {
        assert_eq!(WaitPolicy::Infinite.max_polls(), None);

        let bounded = WaitPolicy::Bounded {
            timeout: MicrosDurationU32::micros(1_000),
            poll_interval: MicrosDurationU32::micros(10),
        };
        assert_eq!(bounded.max_polls(), Some(100));

        let uneven = WaitPolicy::Bounded {
            timeout: MicrosDurationU32::micros(25),
            poll_interval: MicrosDurationU32::micros(10),
        };
        assert_eq!(uneven.max_polls(), Some(3));

        let zero_interval = WaitPolicy::Bounded {
            timeout: MicrosDurationU32::micros(5),
            poll_interval: MicrosDurationU32::micros(0),
        };
        assert_eq!(zero_interval.max_polls(), Some(5));
    }

    struct CountingDelay {
        calls: u32,
        total_us: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.calls += 1;
            self.total_us += ns / 1_000;
        }
    }

    #[test]
    fn test_poll_until_gives_up_after_budget() {
        let mut delay = CountingDelay { calls: 0, total_us: 0 };
        let policy = WaitPolicy::Bounded {
            timeout: MicrosDurationU32::micros(50),
            poll_interval: MicrosDurationU32::micros(10),
        };
        let mut polls = 0;

        let ready = poll_until(&mut delay, policy, || -> Result<bool, ()> {
            polls += 1;
            Ok(false)
        });

        assert_eq!(ready, Ok(false));
        assert_eq!(polls, 6);
        assert_eq!(delay.calls, 5);
        assert_eq!(delay.total_us, 50);
    }

    #[test]
    fn test_zero_poll_interval_still_waits_out_the_timeout() {
        let mut delay = CountingDelay { calls: 0, total_us: 0 };
        let policy = WaitPolicy::Bounded {
            timeout: MicrosDurationU32::micros(100),
            poll_interval: MicrosDurationU32::micros(0),
        };

        let ready = poll_until(&mut delay, policy, || -> Result<bool, ()> { Ok(false) });

        assert_eq!(ready, Ok(false));
        assert_eq!(delay.calls, 100);
        assert_eq!(delay.total_us, 100);
    }

    #[test]
    fn test_poll_until_returns_as_soon_as_ready() {
        let mut delay = CountingDelay { calls: 0, total_us: 0 };
        let mut polls = 0;

        let ready = poll_until(&mut delay, WaitPolicy::Infinite, || -> Result<bool, ()> {
            polls += 1;
            Ok(polls == 4)
        });

        assert_eq!(ready, Ok(true));
        assert_eq!(polls, 4);
        assert_eq!(delay.calls, 0);
    }

    #[test]
    fn test_poll_until_propagates_errors() {
        let mut delay = CountingDelay { calls: 0, total_us: 0 };

        let ready = poll_until(&mut delay, WaitPolicy::Infinite, || -> Result<bool, &str> {
            Err("bus fault")
        });

        assert_eq!(ready, Err("bus fault"));
    }

    #[test]
    fn test_config_builder_clamps_fifo_depth() {
        let config = I2cConfigBuilder::new().rx_fifo_depth(0x40).build();
        assert_eq!(config.rx_fifo_depth, RX_FIFO_PIRQ_MAX);

        let config = I2cConfig::default();
        assert_eq!(config.rx_fifo_depth, RX_FIFO_PIRQ_MAX);
        assert_eq!(config.wait, WaitPolicy::Infinite);
    }
}

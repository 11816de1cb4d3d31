// Licensed under the Apache-2.0 license

//! Simulated AXI IIC controller for unit tests.
//!
//! `MockAxiIic` implements [`RegisterBlock`] and interprets the transmit-FIFO
//! words the engine pushes, the same way the controller does in dynamic mode.
//! Slaves are register files with an auto-incrementing pointer; a read from
//! an address with no device attached returns `0xFF` (bus pulled high).

use crate::common::{LogLevel, Logger};
use crate::i2c::common::{reg, FramedWord, Status};
use crate::mmio::RegisterBlock;
use embedded_hal::delay::DelayNs;
use std::collections::{HashMap, VecDeque};

/// Register access observed by the simulated controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Control(u8),
    RxThreshold(u8),
    Tx(FramedWord),
    RxPop(u8),
    Status(Status),
    Gpo(u32),
}

/// Bus-level view of one addressed phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transfer {
    /// Bytes written after an address with the write bit, sub-address included.
    Write { addr: u8, bytes: Vec<u8> },
    /// Byte count requested after an address with the read bit.
    Read { addr: u8, len: usize },
}

struct Latch {
    reg: u16,
    mask: u8,
    reads_left: u32,
}

struct Device {
    sub_width: usize,
    regs: HashMap<u16, u8>,
    pointer: u16,
    latches: Vec<Latch>,
}

impl Device {
    fn read(&mut self) -> u8 {
        let reg = self.pointer;
        self.pointer = self.pointer.wrapping_add(1);

        for latch in self.latches.iter_mut().filter(|l| l.reg == reg) {
            if latch.reads_left > 0 {
                latch.reads_left -= 1;
                if latch.reads_left == 0 {
                    *self.regs.entry(reg).or_insert(0) |= latch.mask;
                }
            }
        }
        self.regs.get(&reg).copied().unwrap_or(0)
    }

    fn write(&mut self, value: u8) {
        self.regs.insert(self.pointer, value);
        self.pointer = self.pointer.wrapping_add(1);
    }
}

enum Phase {
    Idle,
    Write { addr: u8, bytes: Vec<u8> },
    ReadCount { addr: u8 },
}

pub struct MockAxiIic {
    events: Vec<Event>,
    transfers: Vec<Transfer>,
    devices: HashMap<u8, Device>,
    rx: VecDeque<u8>,
    phase: Phase,
    in_transaction: bool,
    tx_pending: u32,
    busy_hold: u32,
    tx_latency: u32,
    stop_latency: u32,
    stuck_busy: bool,
    control: u8,
    rx_threshold: u8,
    gpo: u32,
}

impl MockAxiIic {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            transfers: Vec::new(),
            devices: HashMap::new(),
            rx: VecDeque::new(),
            phase: Phase::Idle,
            in_transaction: false,
            tx_pending: 0,
            busy_hold: 0,
            tx_latency: 0,
            stop_latency: 0,
            stuck_busy: false,
            control: 0,
            rx_threshold: 0,
            gpo: 0,
        }
    }

    /// Status reads that report the TX FIFO non-empty after each push, and
    /// status reads (once TX drained) that keep bus-busy set after STOP.
    pub fn with_latency(mut self, tx_latency: u32, stop_latency: u32) -> Self {
        self.tx_latency = tx_latency;
        self.stop_latency = stop_latency;
        self
    }

    /// Attach a slave with `sub_width` sub-address bytes.
    pub fn add_device(&mut self, addr: u8, sub_width: usize) {
        self.devices.insert(
            addr,
            Device {
                sub_width,
                regs: HashMap::new(),
                pointer: 0,
                latches: Vec::new(),
            },
        );
    }

    pub fn set_register(&mut self, addr: u8, reg: u16, value: u8) {
        if let Some(device) = self.devices.get_mut(&addr) {
            device.regs.insert(reg, value);
        }
    }

    pub fn register(&self, addr: u8, reg: u16) -> Option<u8> {
        self.devices
            .get(&addr)
            .and_then(|device| device.regs.get(&reg).copied())
    }

    /// Set `mask` in register `reg` on the `reads`-th bus read of it.
    pub fn latch_after_reads(&mut self, addr: u8, reg: u16, mask: u8, reads: u32) {
        if let Some(device) = self.devices.get_mut(&addr) {
            device.latches.push(Latch {
                reg,
                mask,
                reads_left: reads,
            });
        }
    }

    /// Leave bytes in the RX FIFO, as an aborted read would.
    pub fn preload_rx(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn stuck_busy(&mut self, stuck: bool) {
        self.stuck_busy = stuck;
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn tx_words(&self) -> Vec<FramedWord> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Tx(word) => Some(*word),
                _ => None,
            })
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
        self.transfers.clear();
    }

    pub fn control(&self) -> u8 {
        self.control
    }

    pub fn rx_threshold(&self) -> u8 {
        self.rx_threshold
    }

    pub fn gpo(&self) -> u32 {
        self.gpo
    }

    pub fn rx_pending(&self) -> usize {
        self.rx.len()
    }

    fn status_bits(&mut self) -> u8 {
        let mut bits = 0;
        if self.tx_pending == 0 {
            bits |= Status::TX_EMPTY;
        }
        if self.stuck_busy || self.in_transaction || self.busy_hold > 0 {
            bits |= Status::BB;
        }
        if self.rx.is_empty() {
            bits |= Status::RX_EMPTY;
        }

        if self.tx_pending > 0 {
            self.tx_pending -= 1;
        } else if self.busy_hold > 0 {
            self.busy_hold -= 1;
        }
        bits
    }

    fn close_phase(&mut self) {
        if let Phase::Write { addr, bytes } = core::mem::replace(&mut self.phase, Phase::Idle) {
            self.transfers.push(Transfer::Write { addr, bytes });
        }
    }

    fn accept(&mut self, word: FramedWord) {
        self.tx_pending = self.tx_latency;
        let payload = word.payload();

        if word.is_start() {
            self.close_phase();
            self.in_transaction = true;
            let addr = payload >> 1;
            self.phase = if payload & 1 == 1 {
                Phase::ReadCount { addr }
            } else {
                if let Some(device) = self.devices.get_mut(&addr) {
                    device.pointer = 0;
                }
                Phase::Write {
                    addr,
                    bytes: Vec::new(),
                }
            };
        } else {
            match &mut self.phase {
                Phase::Write { addr, bytes } => {
                    if let Some(device) = self.devices.get_mut(&*addr) {
                        if bytes.len() < device.sub_width {
                            device.pointer = (device.pointer << 8) | u16::from(payload);
                        } else {
                            device.write(payload);
                        }
                    }
                    bytes.push(payload);
                }
                Phase::ReadCount { addr } => {
                    let addr = *addr;
                    let len = usize::from(payload);
                    for _ in 0..len {
                        let byte = self
                            .devices
                            .get_mut(&addr)
                            .map_or(0xFF, |device| device.read());
                        self.rx.push_back(byte);
                    }
                    self.transfers.push(Transfer::Read { addr, len });
                    self.phase = Phase::Idle;
                }
                Phase::Idle => panic!("data word {:#05x} outside a transaction", word.bits()),
            }
        }

        if word.is_stop() {
            self.close_phase();
            self.in_transaction = false;
            self.busy_hold = self.stop_latency;
        }
    }
}

impl Default for MockAxiIic {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBlock for MockAxiIic {
    fn read8(&mut self, offset: usize) -> u8 {
        match offset {
            reg::SR => {
                let bits = self.status_bits();
                self.events.push(Event::Status(Status::from_bits(bits)));
                bits
            }
            reg::RX_FIFO => {
                let byte = self.rx.pop_front().unwrap_or(0);
                self.events.push(Event::RxPop(byte));
                byte
            }
            reg::CR => self.control,
            _ => panic!("unexpected 8-bit read at {offset:#x}"),
        }
    }

    fn read16(&mut self, offset: usize) -> u16 {
        panic!("unexpected 16-bit read at {offset:#x}")
    }

    fn read32(&mut self, offset: usize) -> u32 {
        match offset {
            reg::GPO => self.gpo,
            _ => panic!("unexpected 32-bit read at {offset:#x}"),
        }
    }

    fn write8(&mut self, offset: usize, value: u8) {
        match offset {
            reg::CR => {
                self.control = value;
                if value & crate::i2c::common::cr::TXRST != 0 {
                    self.tx_pending = 0;
                }
                self.events.push(Event::Control(value));
            }
            reg::RX_FIFO_PIRQ => {
                self.rx_threshold = value;
                self.events.push(Event::RxThreshold(value));
            }
            _ => panic!("unexpected 8-bit write at {offset:#x}"),
        }
    }

    fn write16(&mut self, offset: usize, value: u16) {
        match offset {
            reg::TX_FIFO => {
                let word = FramedWord::from_bits(value);
                self.events.push(Event::Tx(word));
                self.accept(word);
            }
            _ => panic!("unexpected 16-bit write at {offset:#x}"),
        }
    }

    fn write32(&mut self, offset: usize, value: u32) {
        match offset {
            reg::GPO => {
                self.gpo = value;
                self.events.push(Event::Gpo(value));
            }
            _ => panic!("unexpected 32-bit write at {offset:#x}"),
        }
    }
}

/// Delay that only counts how often and how long it was asked to wait.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub calls: u32,
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.total_ns += u64::from(ns);
    }
}

/// Logger that keeps every line.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    pub lines: Vec<(LogLevel, String)>,
}

impl RecordingLogger {
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.lines
            .iter()
            .any(|(l, line)| *l == level && line.contains(needle))
    }
}

impl Logger for RecordingLogger {
    fn log(&mut self, level: LogLevel, args: core::fmt::Arguments<'_>) {
        self.lines.push((level, args.to_string()));
    }
}

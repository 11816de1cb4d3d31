// Licensed under the Apache-2.0 license

//! Audio board bring-up: enable the AXI IIC controller, light the status
//! LEDs, configure the ADAU1761 for line-in passthrough, then count a
//! heartbeat on the LEDs.

#![no_std]
#![no_main]

use axi_iic_ddk::codec::{Adau1761, CodecConfig};
use axi_iic_ddk::common::{LogLevel, Logger, NoOpLogger, WriteLogger};
use axi_iic_ddk::i2c::{AxiIic, I2cConfig};
use axi_iic_ddk::mmio::{Mmio, RegisterBlock};
use core::convert::Infallible;
use cortex_m_rt::entry;
use embedded_hal::delay::DelayNs;
use panic_halt as _;

const IIC_BASE: usize = 0x4080_0000;
const UART_BASE: usize = 0x4060_0000;
const CPU_HZ: u32 = 100_000_000;

const GPO_BOOT: u32 = 0x55;
const GPO_FAULT: u32 = 0xFF;
const HEARTBEAT_MS: u32 = 500;

/// Busy-wait delay calibrated from the core clock.
struct SpinDelay;

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = u64::from(ns) * u64::from(CPU_HZ) / 1_000_000_000;
        cortex_m::asm::delay(u32::try_from(cycles).unwrap_or(u32::MAX).max(1));
    }
}

/// Transmit side of an AXI UART Lite, used as the log console.
struct UartLite {
    regs: Mmio,
}

impl UartLite {
    const TX_FIFO: usize = 0x04;
    const STATUS: usize = 0x08;
    const TX_FULL: u32 = 1 << 3;
}

impl embedded_io::ErrorType for UartLite {
    type Error = Infallible;
}

impl embedded_io::Write for UartLite {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &byte in buf {
            while self.regs.read32(Self::STATUS) & Self::TX_FULL != 0 {
                core::hint::spin_loop();
            }
            self.regs.write32(Self::TX_FIFO, u32::from(byte));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[entry]
fn main() -> ! {
    // SAFETY: fixed addresses of the controllers in the FPGA design; each is
    // wrapped exactly once here.
    let (iic_regs, uart_regs) = unsafe { (Mmio::new(IIC_BASE), Mmio::new(UART_BASE)) };
    let console = WriteLogger::new(UartLite { regs: uart_regs }, LogLevel::Info);

    let mut i2c = AxiIic::new(iic_regs, SpinDelay, I2cConfig::default(), NoOpLogger);
    i2c.init();
    i2c.set_gpo(GPO_BOOT);

    let mut codec = Adau1761::new(CodecConfig::default(), console);
    let mut delay = SpinDelay;
    match codec.init(&mut i2c, &mut delay) {
        Ok(()) => codec
            .logger_mut()
            .info(format_args!("audio-io: codec ready")),
        Err(err) => {
            i2c.set_gpo(GPO_FAULT);
            codec
                .logger_mut()
                .error(format_args!("audio-io: codec init failed: {err:?}"));
            loop {
                cortex_m::asm::wfi();
            }
        }
    }

    // The LEDs show the low bits of an 8-bit beat counter.
    let mut beats: u8 = 0;
    loop {
        delay.delay_ms(HEARTBEAT_MS);
        beats = beats.wrapping_add(1);
        i2c.set_gpo(u32::from(beats));
    }
}

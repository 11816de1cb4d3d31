// Licensed under the Apache-2.0 license

//! ADAU1761 PLL control block (`R1_PLL`, six bytes, big-endian words).
//!
//! ```text
//! byte 0..2  M   denominator (fractional mode)
//! byte 2..4  N   numerator (fractional mode)
//! byte 4     0 R[3:0] X[1:0] Type
//! byte 5     0 .. Lock PLLEN
//! ```
//!
//! The block must be written as a whole; the lock bit is read-only.

use zerocopy::byteorder::big_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

pub const PLL_BLOCK_LEN: usize = 6;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
#[repr(C)]
pub struct PllControl {
    pub m: U16,
    pub n: U16,
    pub config: u8,
    pub control: u8,
}

impl PllControl {
    pub const PLLEN: u8 = 1 << 0;
    pub const LOCK: u8 = 1 << 1;

    const TYPE_FRACTIONAL: u8 = 1 << 0;
    const X_SHIFT: u8 = 1;
    const X_MASK: u8 = 0b11;
    const R_SHIFT: u8 = 3;
    const R_MASK: u8 = 0b1111;

    /// PLL bypassed; the core clock runs straight from MCLK.
    pub const DISABLED: Self = Self {
        m: U16::ZERO,
        n: U16::ZERO,
        config: 0,
        control: 0,
    };

    /// Enabled integer-mode PLL: output `MCLK / (X + 1) * R`.
    #[must_use]
    pub fn integer(r: u8, x: u8) -> Self {
        Self {
            m: U16::ZERO,
            n: U16::ZERO,
            config: Self::encode_config(r, x, false),
            control: Self::PLLEN,
        }
    }

    /// Enabled fractional-mode PLL: output `MCLK / (X + 1) * (R + N / M)`.
    #[must_use]
    pub fn fractional(r: u8, x: u8, n: u16, m: u16) -> Self {
        Self {
            m: U16::new(m),
            n: U16::new(n),
            config: Self::encode_config(r, x, true),
            control: Self::PLLEN,
        }
    }

    /// View six bytes read from the codec.
    #[must_use]
    pub fn from_block(block: [u8; PLL_BLOCK_LEN]) -> Self {
        zerocopy::transmute!(block)
    }

    #[must_use]
    pub fn to_block(self) -> [u8; PLL_BLOCK_LEN] {
        zerocopy::transmute!(self)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.control & Self::PLLEN != 0
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.control & Self::LOCK != 0
    }

    #[must_use]
    pub fn is_fractional(&self) -> bool {
        self.config & Self::TYPE_FRACTIONAL != 0
    }

    #[must_use]
    pub fn r(&self) -> u8 {
        (self.config >> Self::R_SHIFT) & Self::R_MASK
    }

    #[must_use]
    pub fn x(&self) -> u8 {
        (self.config >> Self::X_SHIFT) & Self::X_MASK
    }

    fn encode_config(r: u8, x: u8, fractional: bool) -> u8 {
        ((r & Self::R_MASK) << Self::R_SHIFT)
            | ((x & Self::X_MASK) << Self::X_SHIFT)
            | if fractional { Self::TYPE_FRACTIONAL } else { 0 }
    }
}

impl Default for PllControl {
    fn default() -> Self {
        Self::DISABLED
    }
}

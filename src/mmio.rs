// Licensed under the Apache-2.0 license

//! Register access layer.
//!
//! Drivers never touch raw pointers; they talk to a [`RegisterBlock`], which
//! is addressed by byte offset from the peripheral base. [`Mmio`] binds the
//! trait to real memory-mapped I/O; unit tests bind it to a simulated
//! peripheral instead.

use core::ptr::{read_volatile, write_volatile};

/// Offset-addressed access to a peripheral's register window.
///
/// Reads take `&mut self` because some registers (FIFO data ports) have
/// side effects on read.
pub trait RegisterBlock {
    fn read8(&mut self, offset: usize) -> u8;
    fn read16(&mut self, offset: usize) -> u16;
    fn read32(&mut self, offset: usize) -> u32;

    fn write8(&mut self, offset: usize, value: u8);
    fn write16(&mut self, offset: usize, value: u16);
    fn write32(&mut self, offset: usize, value: u32);
}

impl<T: RegisterBlock + ?Sized> RegisterBlock for &mut T {
    fn read8(&mut self, offset: usize) -> u8 {
        (**self).read8(offset)
    }

    fn read16(&mut self, offset: usize) -> u16 {
        (**self).read16(offset)
    }

    fn read32(&mut self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    fn write8(&mut self, offset: usize, value: u8) {
        (**self).write8(offset, value);
    }

    fn write16(&mut self, offset: usize, value: u16) {
        (**self).write16(offset, value);
    }

    fn write32(&mut self, offset: usize, value: u32) {
        (**self).write32(offset, value);
    }
}

/// Volatile memory-mapped register window starting at `base`.
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// # Safety
    ///
    /// `base` must be the address of a mapped peripheral register window
    /// large enough for every offset the owning driver uses, and the
    /// returned value must be the only accessor of that window.
    #[must_use]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterBlock for Mmio {
    #[inline(always)]
    fn read8(&mut self, offset: usize) -> u8 {
        // SAFETY: `Mmio::new` contract covers every offset the driver uses.
        unsafe { read_volatile((self.base + offset) as *const u8) }
    }

    #[inline(always)]
    fn read16(&mut self, offset: usize) -> u16 {
        // SAFETY: see `read8`.
        unsafe { read_volatile((self.base + offset) as *const u16) }
    }

    #[inline(always)]
    fn read32(&mut self, offset: usize) -> u32 {
        // SAFETY: see `read8`.
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline(always)]
    fn write8(&mut self, offset: usize, value: u8) {
        // SAFETY: see `read8`.
        unsafe { write_volatile((self.base + offset) as *mut u8, value) }
    }

    #[inline(always)]
    fn write16(&mut self, offset: usize, value: u16) {
        // SAFETY: see `read8`.
        unsafe { write_volatile((self.base + offset) as *mut u16, value) }
    }

    #[inline(always)]
    fn write32(&mut self, offset: usize, value: u32) {
        // SAFETY: see `read8`.
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}

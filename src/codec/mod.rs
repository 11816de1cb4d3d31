// Licensed under the Apache-2.0 license

//! Audio codec clients built on the sub-addressed I2C master traits.

pub mod adau1761;
pub mod pll;
pub mod registers;

pub use adau1761::{Adau1761, CodecConfig, CodecError};
pub use pll::PllControl;

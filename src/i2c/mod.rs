// Licensed under the Apache-2.0 license

//! I2C master support for the Xilinx AXI IIC controller.
//!
//! [`axi_iic::AxiIic`] is the register-level engine; [`traits`] describes
//! what device drivers may rely on; [`i2c_controller::I2cController`] adapts
//! any master to `embedded_hal::i2c::I2c`.

pub mod axi_iic;
pub mod common;
pub mod i2c_controller;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use axi_iic::{AxiIic, Error};
pub use common::{I2cConfig, I2cConfigBuilder, SubAddress, WaitCondition, WaitPolicy};

// Licensed under the Apache-2.0 license

// Driver code must not panic on bad input: unwrap and slice indexing are
// rejected outside tests.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::indexing_slicing))]
#![cfg_attr(not(test), warn(clippy::expect_used))]
#![cfg_attr(not(test), no_std)]
pub mod codec;
pub mod common;
pub mod i2c;
pub mod mmio;

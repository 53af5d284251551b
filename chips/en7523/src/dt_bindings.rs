// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Identifiers shared with the hardware description.
//!
//! Consumers name an EN7523 clock by the provider node plus one of these
//! indices, so the values are ABI and must not be renumbered.

pub mod clock {
    pub const GSW: usize = 0;
    pub const EMI: usize = 1;
    pub const BUS: usize = 2;
    pub const SLIC: usize = 3;
    pub const SPI: usize = 4;
    pub const NPU: usize = 5;
    pub const CRYPTO: usize = 6;
    pub const PCIE: usize = 7;

    /// Size of the exported clock table.
    pub const NUM_CLOCKS: usize = 8;
}

// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Register layout of the EN7523 system control unit (SCU).
//!
//! The clock driver gets two windows: the main SCU block, which holds the
//! clock selector and divider registers, and the network processor (NP)
//! block, which holds PCIe control and the reset controller. Offsets are in
//! bytes from the start of the respective window.

use tock_registers::register_bitfields;

/// Main SCU block.
pub const REG_GSW_CLK_DIV_SEL: usize = 0x1b4;
pub const REG_EMI_CLK_DIV_SEL: usize = 0x1b8;
pub const REG_BUS_CLK_DIV_SEL: usize = 0x1bc;
pub const REG_SPI_CLK_DIV_SEL: usize = 0x1c4;
pub const REG_SPI_CLK_FREQ_SEL: usize = 0x1c8;
pub const REG_NPU_CLK_DIV_SEL: usize = 0x1fc;
pub const REG_CRYPTO_CLKSRC: usize = 0x200;

/// NP block.
pub const REG_PCI_CONTROL: usize = 0x88;
pub const REG_RESET_CONTROL: usize = 0x834;

register_bitfields![u32,
    pub PCI_CONTROL [
        /// Endpoint reset output (PERST#) for the first port
        PERSTOUT OFFSET(29) NUMBITS(1) [],
        /// Endpoint reset output (PERST#) for the second port
        PERSTOUT1 OFFSET(26) NUMBITS(1) [],
        /// Reference clock enable
        REFCLK OFFSET(22) NUMBITS(1) []
    ],
    pub RESET_CONTROL [
        /// PCIe hierarchy bridge reset, active low
        PCIEHB OFFSET(29) NUMBITS(1) [],
        /// PCIe lane 1 reset, active low
        PCIE1 OFFSET(27) NUMBITS(1) [],
        /// PCIe lane 2 reset, active low
        PCIE2 OFFSET(26) NUMBITS(1) []
    ]
];

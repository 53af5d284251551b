// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! PCIe reference clock gate.
//!
//! Turning the PCIe reference clock on is only useful together with a reset
//! of the PCIe core and the downstream endpoint, so enabling the gate runs the
//! full sequence:
//!
//! ```text
//! PERSTOUT/PERSTOUT1 low  -- 1 ms --
//! REFCLK on               -- 1 ms --
//! PCIe resets asserted    -- 1 ms --  released  -- 100 ms --
//!                                     asserted  -- 5 ms --
//! PERSTOUT/PERSTOUT1 low  -- 1 ms --  high      -- 250 ms --
//! ```
//!
//! Every delay is a settling time required by the hardware. Disabling only
//! stops the reference clock; the next enable starts from reset again.

use embedded_hal::delay::DelayNs;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};

use crate::config::CONFIG;
use crate::hil::clock::ClockGate;
use crate::scu::{PCI_CONTROL, REG_PCI_CONTROL, REG_RESET_CONTROL, RESET_CONTROL};
use crate::window::{RegisterWindow, WindowRegister};
use crate::ErrorCode;

const PERST_SETUP_MS: u32 = 1;
const REFCLK_SETTLE_MS: u32 = 1;
const RESET_ASSERT_MS: u32 = 1;
const RESET_RELEASE_MS: u32 = 100;
const RESET_REASSERT_MS: u32 = 5;
const PERST_ASSERT_MS: u32 = 1;
const PERST_RELEASE_MS: u32 = 250;

/// Gate for the PCIe reference clock in the NP register block.
pub struct PcieGate<W: RegisterWindow, D: DelayNs> {
    np_base: W,
    delay: D,
}

impl<W: RegisterWindow, D: DelayNs> PcieGate<W, D> {
    pub const NAME: &'static str = "pcie";

    /// Take over the PCIe clock. The clock is stopped before the gate is
    /// returned, so its state is always known.
    pub fn new(np_base: W, delay: D) -> PcieGate<W, D> {
        let mut gate = PcieGate { np_base, delay };
        gate.disable();
        gate
    }

    fn pci_control(&self) -> WindowRegister<'_, W, PCI_CONTROL::Register> {
        self.np_base.register(REG_PCI_CONTROL)
    }

    fn reset_control(&self) -> WindowRegister<'_, W, RESET_CONTROL::Register> {
        self.np_base.register(REG_RESET_CONTROL)
    }

    fn wait_ms(&mut self, ms: u32, step: &str) {
        if CONFIG.trace_pcie_reset {
            log::debug!("pcie: {}, wait {} ms", step, ms);
        }
        self.delay.delay_ms(ms);
    }
}

impl<W: RegisterWindow, D: DelayNs> ClockGate for PcieGate<W, D> {
    fn is_enabled(&self) -> bool {
        self.pci_control().is_set(PCI_CONTROL::REFCLK)
    }

    fn enable(&mut self) -> Result<(), ErrorCode> {
        let perst_low = PCI_CONTROL::PERSTOUT::CLEAR + PCI_CONTROL::PERSTOUT1::CLEAR;
        let perst_high = PCI_CONTROL::PERSTOUT::SET + PCI_CONTROL::PERSTOUT1::SET;
        // The core resets are active low.
        let resets_asserted = RESET_CONTROL::PCIEHB::CLEAR
            + RESET_CONTROL::PCIE1::CLEAR
            + RESET_CONTROL::PCIE2::CLEAR;
        let resets_released =
            RESET_CONTROL::PCIEHB::SET + RESET_CONTROL::PCIE1::SET + RESET_CONTROL::PCIE2::SET;

        // Endpoint held in reset while the reference clock comes up.
        let pci = self.pci_control().extract();
        self.pci_control().modify_no_read(pci, perst_low);
        self.wait_ms(PERST_SETUP_MS, "PERST asserted");
        self.pci_control()
            .modify_no_read(pci, perst_low + PCI_CONTROL::REFCLK::SET);
        self.wait_ms(REFCLK_SETTLE_MS, "REFCLK on");

        // Pulse the PCIe core resets. All three writes start from the same
        // snapshot of the reset controller.
        let reset = self.reset_control().extract();
        self.reset_control().modify_no_read(reset, resets_asserted);
        self.wait_ms(RESET_ASSERT_MS, "core reset asserted");
        self.reset_control().modify_no_read(reset, resets_released);
        self.wait_ms(RESET_RELEASE_MS, "core reset released");
        self.reset_control().modify_no_read(reset, resets_asserted);
        self.wait_ms(RESET_REASSERT_MS, "core reset asserted again");

        // Only then let the endpoint out of reset.
        let pci = self.pci_control().extract();
        self.pci_control().modify_no_read(pci, perst_low);
        self.wait_ms(PERST_ASSERT_MS, "PERST asserted");
        self.pci_control().modify_no_read(pci, perst_high);
        self.wait_ms(PERST_RELEASE_MS, "PERST released");

        Ok(())
    }

    fn disable(&mut self) {
        self.pci_control().modify(PCI_CONTROL::REFCLK::CLEAR);
    }
}

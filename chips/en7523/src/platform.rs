// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Services the EN7523 drivers expect from the platform.
//!
//! Device enumeration, register mapping, the clock framework and the GPIO
//! subsystem all belong to the platform. The drivers only reach them through
//! the traits below.

use crate::clk::ClockTable;
use crate::hil::clock::ClockGate;
use crate::window::RegisterWindow;
use crate::ErrorCode;

/// A driver that binds to devices by compatible string.
pub trait Driver {
    /// Driver name as registered with the platform.
    const NAME: &'static str;

    /// Compatible strings this driver binds to.
    const OF_MATCH: &'static [&'static str];

    fn matches(compatible: &str) -> bool {
        Self::OF_MATCH.iter().any(|c| *c == compatible)
    }
}

/// A device the platform has enumerated and is attaching a driver to.
pub trait PlatformDevice {
    type Window: RegisterWindow;
    /// Handle to the device's node in the hardware description.
    type Node: Copy;

    fn name(&self) -> &str;

    fn of_node(&self) -> Self::Node;

    /// Map the device's `index`-th register resource.
    fn map_resource(&self, index: usize) -> Result<Self::Window, ErrorCode>;
}

/// The clock framework that registered clocks are handed to.
pub trait ClockFramework {
    /// Reference to a registered clock.
    type Handle;
    type Node;

    /// Register a read-only clock that always runs at `rate` Hz.
    fn register_fixed_rate(
        &mut self,
        name: &'static str,
        rate: u32,
    ) -> Result<Self::Handle, ErrorCode>;

    /// Register a gated clock. The framework takes ownership of the gate.
    fn register_gate<G: ClockGate + 'static>(
        &mut self,
        name: &'static str,
        gate: G,
    ) -> Result<Self::Handle, ErrorCode>;

    /// Publish `clocks` so consumers of `node` can look clocks up by index.
    fn add_provider(
        &mut self,
        node: Self::Node,
        clocks: ClockTable<Self::Handle>,
    ) -> Result<(), ErrorCode>;
}

/// The GPIO subsystem that controllers are registered with.
pub trait GpioSubsystem {
    /// Register a controller with `ngpio` lines. Returns the global number
    /// assigned to its first line.
    fn add_chip(&mut self, label: &str, ngpio: usize) -> Result<u32, ErrorCode>;
}

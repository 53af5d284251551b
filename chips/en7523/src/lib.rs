// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Peripheral drivers for the EcoNet EN7523 SoC.
//!
//! Two independent drivers live here, both bound once at device attach time:
//!
//! - [`clk`] reads the clock configuration latched in the SCU register block,
//!   registers one read-only fixed-rate clock per clock line and a gated PCIe
//!   reference clock, and publishes them keyed by the identifiers in
//!   [`dt_bindings::clock`].
//! - [`gpio`] configures pin direction on the 32-line GPIO controller and
//!   forwards value reads and writes to a generic bit-banked base.
//!
//! Neither driver touches memory directly. Register blocks arrive as
//! [`RegisterWindow`](window::RegisterWindow)s mapped by the platform, which
//! keeps the rate arithmetic and the PCIe reset sequence testable on a host.

#![no_std]

pub mod bgpio;
pub mod clk;
pub mod dt_bindings;
pub mod errorcode;
pub mod gpio;
pub mod hil;
pub mod pcie;
pub mod platform;
pub mod scu;
pub mod window;

mod config;

pub use crate::errorcode::ErrorCode;

// This is used to run the tests on a host
#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(test)]
mod fakes;

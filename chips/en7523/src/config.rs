// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Data structure for storing compile-time configuration options of the
//! EN7523 drivers.
//!
//! Options are plain `const` values so every code path is type-checked even
//! when the option is off; the compiler folds the disabled branches away.

/// Data structure holding compile-time configuration options.
///
/// To change the configuration, modify the relevant values in the `CONFIG`
/// constant object defined at the end of this file.
pub(crate) struct Config {
    /// Whether the clock driver should log the selector, divider and output
    /// rate it resolves for every clock line.
    pub(crate) debug_clock_rates: bool,

    /// Whether the PCIe gate should log every register write and delay of its
    /// enable sequence. Useful when bringing up a board whose endpoint does
    /// not train.
    pub(crate) trace_pcie_reset: bool,
}

/// A unique instance of `Config` where compile-time configuration options are
/// defined. This is the only location in the crate where `cfg!` is used to
/// read Cargo features.
pub(crate) const CONFIG: Config = Config {
    debug_clock_rates: cfg!(feature = "debug_clock_rates"),
    trace_pcie_reset: cfg!(feature = "trace_pcie_reset"),
};

// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Interface for clocks that can be gated on and off.

use crate::ErrorCode;

/// Generic operations that a gated clock is expected to support.
///
/// Changing the gate takes `&mut self`: enabling may run a multi-step
/// hardware sequence that must not interleave with another enable or disable
/// of the same clock.
pub trait ClockGate {
    /// Whether the clock is currently running, as reported by the hardware.
    fn is_enabled(&self) -> bool;

    /// Start the clock. Returns once the clock is usable.
    fn enable(&mut self) -> Result<(), ErrorCode>;

    /// Stop the clock.
    fn disable(&mut self);
}

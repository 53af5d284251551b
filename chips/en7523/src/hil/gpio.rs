// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Interfaces for GPIO controllers.

use crate::ErrorCode;

/// Which way a line is configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Raw line value access, as provided by a generic bit-banked controller.
///
/// Implementations do not check `line`; callers validate it against
/// `ngpio()` first.
pub trait GenericGpio {
    /// Number of lines backed by the data register.
    fn ngpio(&self) -> usize;

    /// Current level of `line`.
    fn get(&self, line: usize) -> bool;

    /// Drive `line` to `value`. Has no visible effect unless the line is an
    /// output.
    fn set(&self, line: usize, value: bool);
}

/// A GPIO controller as seen by the GPIO subsystem.
///
/// All operations fail with `ErrorCode::INVAL` for `line >= ngpio()`.
pub trait GpioChip {
    fn ngpio(&self) -> usize;

    fn get_direction(&self, line: usize) -> Result<Direction, ErrorCode>;

    fn direction_input(&self, line: usize) -> Result<(), ErrorCode>;

    /// Make `line` an output, driving `value` on it.
    fn direction_output(&self, line: usize, value: bool) -> Result<(), ErrorCode>;

    fn get(&self, line: usize) -> Result<bool, ErrorCode>;

    fn set(&self, line: usize, value: bool) -> Result<(), ErrorCode>;
}

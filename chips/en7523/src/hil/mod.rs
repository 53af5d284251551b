// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Hardware interface layer (HIL) traits implemented by the EN7523 drivers.

pub mod clock;
pub mod gpio;

// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! GPIO controller of the EN7523.
//!
//! The controller has 32 lines. Line levels live in a single data register
//! handled by the generic bit-banked base ([`Bgpio`]). Direction is a 2-bit
//! field per line, split over two registers of 16 lines each; only the low
//! bit of each field is used. A separate output-enable register has one bit
//! per line and is kept in step with the direction bit.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let gpio = GpioDriver::probe(&dev, &mut gpio_subsystem)?;
//! gpio.direction_output(17, true)?;
//!
//! let mut led = gpio.line(17)?;
//! led.set_low()?;
//! ```

use core::marker::PhantomData;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};
use tock_registers::fields::Field;
use tock_registers::interfaces::{Readable, Writeable};

use crate::bgpio::Bgpio;
use crate::hil::gpio::{Direction, GenericGpio, GpioChip};
use crate::platform::{Driver, GpioSubsystem, PlatformDevice};
use crate::window::RegisterWindow;
use crate::ErrorCode;

pub const ECONET_GPIO_MAX: usize = 32;

/// Lines per direction register.
const LINES_PER_DIR: usize = 16;

pub struct EconetGpio<W: RegisterWindow, B: GenericGpio = Bgpio<W>> {
    gc: B,
    dir: [W; 2],
    output: W,
    base: u32,
}

impl<W: RegisterWindow, B: GenericGpio> EconetGpio<W, B> {
    /// `dir` holds the direction registers for lines 0-15 and 16-31, in that
    /// order. `base` is the global number of line 0.
    pub fn new(gc: B, dir: [W; 2], output: W, base: u32) -> EconetGpio<W, B> {
        EconetGpio {
            gc,
            dir,
            output,
            base,
        }
    }

    /// Global number of line 0, as assigned by the GPIO subsystem.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Handle to a single line.
    pub fn line(&self, line: usize) -> Result<GpioLine<'_, Self>, ErrorCode> {
        GpioLine::new(self, line)
    }

    fn check(&self, line: usize) -> Result<(), ErrorCode> {
        if line < ECONET_GPIO_MAX {
            Ok(())
        } else {
            Err(ErrorCode::INVAL)
        }
    }

    fn dir_field(line: usize) -> Field<u32, ()> {
        Field::new(1, (line % LINES_PER_DIR) * 2)
    }

    fn output_field(line: usize) -> Field<u32, ()> {
        Field::new(1, line)
    }

    fn set_direction(
        &self,
        line: usize,
        direction: Direction,
        value: bool,
    ) -> Result<(), ErrorCode> {
        self.check(line)?;

        let dir = self.dir[line / LINES_PER_DIR].register::<()>(0);
        let output = self.output.register::<()>(0);
        let dir_val = dir.extract();
        let output_val = output.extract();

        let out = (direction == Direction::Output) as u32;
        dir.modify_no_read(dir_val, Self::dir_field(line).val(out));
        output.modify_no_read(output_val, Self::output_field(line).val(out));

        if direction == Direction::Output {
            self.gc.set(line, value);
        }
        Ok(())
    }
}

impl<W: RegisterWindow, B: GenericGpio> GpioChip for EconetGpio<W, B> {
    fn ngpio(&self) -> usize {
        ECONET_GPIO_MAX
    }

    fn get_direction(&self, line: usize) -> Result<Direction, ErrorCode> {
        self.check(line)?;
        let dir = self.dir[line / LINES_PER_DIR].register::<()>(0);
        if dir.is_set(Self::dir_field(line)) {
            Ok(Direction::Output)
        } else {
            Ok(Direction::Input)
        }
    }

    fn direction_input(&self, line: usize) -> Result<(), ErrorCode> {
        self.set_direction(line, Direction::Input, false)
    }

    fn direction_output(&self, line: usize, value: bool) -> Result<(), ErrorCode> {
        self.set_direction(line, Direction::Output, value)
    }

    fn get(&self, line: usize) -> Result<bool, ErrorCode> {
        self.check(line)?;
        Ok(self.gc.get(line))
    }

    fn set(&self, line: usize, value: bool) -> Result<(), ErrorCode> {
        self.check(line)?;
        self.gc.set(line, value);
        Ok(())
    }
}

/// One line of a [`GpioChip`], usable wherever an `embedded-hal` pin is
/// expected.
///
/// The handle does not change the line's direction; configure it through the
/// chip first.
pub struct GpioLine<'a, C: GpioChip> {
    chip: &'a C,
    line: usize,
}

impl<'a, C: GpioChip> GpioLine<'a, C> {
    pub fn new(chip: &'a C, line: usize) -> Result<GpioLine<'a, C>, ErrorCode> {
        if line >= chip.ngpio() {
            return Err(ErrorCode::INVAL);
        }
        Ok(GpioLine { chip, line })
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn direction(&self) -> Result<Direction, ErrorCode> {
        self.chip.get_direction(self.line)
    }
}

impl<C: GpioChip> ErrorType for GpioLine<'_, C> {
    type Error = ErrorCode;
}

impl<C: GpioChip> InputPin for GpioLine<'_, C> {
    fn is_high(&mut self) -> Result<bool, ErrorCode> {
        self.chip.get(self.line)
    }

    fn is_low(&mut self) -> Result<bool, ErrorCode> {
        self.chip.get(self.line).map(|high| !high)
    }
}

impl<C: GpioChip> OutputPin for GpioLine<'_, C> {
    fn set_low(&mut self) -> Result<(), ErrorCode> {
        self.chip.set(self.line, false)
    }

    fn set_high(&mut self) -> Result<(), ErrorCode> {
        self.chip.set(self.line, true)
    }
}

// The data register reads back the driven level of an output line.
impl<C: GpioChip> StatefulOutputPin for GpioLine<'_, C> {
    fn is_set_high(&mut self) -> Result<bool, ErrorCode> {
        self.chip.get(self.line)
    }

    fn is_set_low(&mut self) -> Result<bool, ErrorCode> {
        self.chip.get(self.line).map(|high| !high)
    }
}

/// The `econet,en7523-gpio` driver.
pub struct GpioDriver<D: PlatformDevice> {
    _device: PhantomData<D>,
}

impl<D: PlatformDevice> Driver for GpioDriver<D> {
    const NAME: &'static str = "econet-gpio";
    const OF_MATCH: &'static [&'static str] = &["econet,en7523-gpio"];
}

impl<D: PlatformDevice> GpioDriver<D> {
    pub const DATA_RESOURCE: usize = 0;
    pub const DIR0_RESOURCE: usize = 1;
    pub const DIR1_RESOURCE: usize = 2;
    pub const OUTPUT_RESOURCE: usize = 3;

    /// Attach to `dev`: map the four register blocks, set up the generic
    /// base over the data register and register a 32-line controller with
    /// `subsystem`.
    pub fn probe<S: GpioSubsystem>(
        dev: &D,
        subsystem: &mut S,
    ) -> Result<EconetGpio<D::Window>, ErrorCode> {
        let data = dev.map_resource(Self::DATA_RESOURCE)?;
        let dir0 = dev.map_resource(Self::DIR0_RESOURCE)?;
        let dir1 = dev.map_resource(Self::DIR1_RESOURCE)?;
        let output = dev.map_resource(Self::OUTPUT_RESOURCE)?;

        let gc = Bgpio::new(data, 4).map_err(|err| {
            log::error!("unable to init generic GPIO");
            err
        })?;

        let base = subsystem.add_chip(dev.name(), ECONET_GPIO_MAX)?;

        Ok(EconetGpio::new(gc, [dir0, dir1], output, base))
    }
}

// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Generic bit-banked GPIO over a single data register.
//!
//! Bit `n` of the data register is the level of line `n`. Reads sample the
//! register directly. Writes go through a shadow copy of the register so that
//! setting one line never latches the input level of another line back into
//! the output latch.

use core::cell::Cell;

use tock_registers::fields::Field;
use tock_registers::interfaces::{Readable, Writeable};

use crate::hil::gpio::GenericGpio;
use crate::window::RegisterWindow;
use crate::ErrorCode;

/// Offset of the data register inside its window.
const DAT: usize = 0;

pub struct Bgpio<W: RegisterWindow> {
    dat: W,
    shadow: Cell<u32>,
    ngpio: usize,
}

impl<W: RegisterWindow> Bgpio<W> {
    /// Set up the controller over the data register in `dat`, which is
    /// `sz` bytes wide.
    ///
    /// Only 32-bit data registers are supported. The shadow starts out as
    /// the current contents of the register.
    pub fn new(dat: W, sz: usize) -> Result<Bgpio<W>, ErrorCode> {
        if sz != 4 {
            return Err(ErrorCode::INVAL);
        }

        let shadow = dat.register::<()>(DAT).get();
        Ok(Bgpio {
            dat,
            shadow: Cell::new(shadow),
            ngpio: sz * 8,
        })
    }

    fn line(line: usize) -> Field<u32, ()> {
        Field::new(1, line)
    }
}

impl<W: RegisterWindow> GenericGpio for Bgpio<W> {
    fn ngpio(&self) -> usize {
        self.ngpio
    }

    fn get(&self, line: usize) -> bool {
        self.dat.register::<()>(DAT).is_set(Self::line(line))
    }

    fn set(&self, line: usize, value: bool) {
        let shadow = Self::line(line).val(value as u32).modify(self.shadow.get());
        self.shadow.set(shadow);
        self.dat.register::<()>(DAT).set(shadow);
    }
}

#[cfg(test)]
mod tests {
    use super::Bgpio;
    use crate::fakes::{Event, FakeWindow};
    use crate::hil::gpio::GenericGpio;
    use crate::ErrorCode;

    #[test]
    fn only_32_bit_registers() {
        let dat = FakeWindow::new();
        assert_eq!(Bgpio::new(dat.clone(), 1).err(), Some(ErrorCode::INVAL));
        assert_eq!(Bgpio::new(dat.clone(), 8).err(), Some(ErrorCode::INVAL));
        assert_eq!(Bgpio::new(dat, 4).map(|gc| gc.ngpio()), Ok(32));
    }

    #[test]
    fn get_samples_the_data_register() {
        let dat = FakeWindow::new();
        let gc = Bgpio::new(dat.clone(), 4).unwrap();

        dat.preset(0, 1 << 31 | 1 << 3);
        assert!(gc.get(31));
        assert!(gc.get(3));
        assert!(!gc.get(4));
    }

    #[test]
    fn set_writes_through_the_shadow() {
        let dat = FakeWindow::new();
        dat.preset(0, 0x0000_0100);
        let gc = Bgpio::new(dat.clone(), 4).unwrap();

        // An input reading high must not end up in the output latch.
        dat.preset(0, 0x8000_0100);
        dat.clear_events();
        gc.set(0, true);
        gc.set(8, false);

        assert_eq!(
            dat.events(),
            vec![Event::Write(0, 0x0000_0101), Event::Write(0, 0x0000_0001)]
        );
    }
}

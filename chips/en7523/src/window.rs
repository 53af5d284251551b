// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Register windows: addressable handles over mapped register blocks.
//!
//! The platform binding layer maps each register block of a device and hands
//! it to the drivers as a [`RegisterWindow`]. Drivers only ever do 32-bit
//! accesses at byte offsets into a window. [`WindowRegister`] lifts one such
//! offset into a `tock-registers` register, so bitfields declared with
//! `register_bitfields!` can be read and modified the usual way:
//!
//! ```rust,ignore
//! let pci = np_base.register::<PCI_CONTROL::Register>(REG_PCI_CONTROL);
//! pci.modify(PCI_CONTROL::REFCLK::CLEAR);
//! ```

use core::marker::PhantomData;
use core::ptr;

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::RegisterLongName;

/// 32-bit register access into a mapped register block.
///
/// Offsets are in bytes from the start of the window and must be 4-byte
/// aligned.
pub trait RegisterWindow {
    fn read32(&self, offset: usize) -> u32;
    fn write32(&self, offset: usize, value: u32);

    /// View the 32-bit register at `offset` as a typed register with the
    /// bitfields of `R`.
    fn register<R: RegisterLongName>(&self, offset: usize) -> WindowRegister<'_, Self, R>
    where
        Self: Sized,
    {
        WindowRegister::new(self, offset)
    }
}

impl<W: RegisterWindow> RegisterWindow for &W {
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
}

/// One register inside a [`RegisterWindow`].
///
/// Every `get` and `set` goes straight to the window; nothing is cached.
pub struct WindowRegister<'a, W: RegisterWindow, R: RegisterLongName = ()> {
    window: &'a W,
    offset: usize,
    associated_register: PhantomData<R>,
}

impl<'a, W: RegisterWindow, R: RegisterLongName> WindowRegister<'a, W, R> {
    pub const fn new(window: &'a W, offset: usize) -> Self {
        WindowRegister {
            window,
            offset,
            associated_register: PhantomData,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<W: RegisterWindow, R: RegisterLongName> Readable for WindowRegister<'_, W, R> {
    type T = u32;
    type R = R;

    #[inline]
    fn get(&self) -> u32 {
        self.window.read32(self.offset)
    }
}

impl<W: RegisterWindow, R: RegisterLongName> Writeable for WindowRegister<'_, W, R> {
    type T = u32;
    type R = R;

    #[inline]
    fn set(&self, value: u32) {
        self.window.write32(self.offset, value)
    }
}

/// A register window backed by memory-mapped I/O.
pub struct MmioWindow {
    base: *mut u8,
    size: usize,
}

impl MmioWindow {
    /// Wrap a mapped register block.
    ///
    /// # Safety
    ///
    /// `base` must point to `size` bytes of device memory that stay mapped
    /// for the lifetime of the window, and no other code may hold a window
    /// over the same block while this one is in use.
    pub const unsafe fn new(base: *mut u8, size: usize) -> MmioWindow {
        MmioWindow { base, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn addr(&self, offset: usize) -> *mut u32 {
        debug_assert!(offset % 4 == 0, "unaligned register offset {:#x}", offset);
        debug_assert!(
            offset + 4 <= self.size,
            "register offset {:#x} outside {:#x} byte window",
            offset,
            self.size
        );
        self.base.wrapping_add(offset).cast::<u32>()
    }
}

impl RegisterWindow for MmioWindow {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        // Safety: the window covers `offset` and stays mapped (see `new`).
        unsafe { ptr::read_volatile(self.addr(offset)) }
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        // Safety: the window covers `offset` and stays mapped (see `new`).
        unsafe { ptr::write_volatile(self.addr(offset), value) }
    }
}

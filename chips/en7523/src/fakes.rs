// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Host-side stand-ins for the platform, used by the unit tests.
//!
//! Register windows are backed by a sparse map and log every access together
//! with every delay, in order, so tests can check exact hardware sequences.

use std::boxed::Box;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::clk::ClockTable;
use crate::hil::clock::ClockGate;
use crate::platform::{ClockFramework, GpioSubsystem, PlatformDevice};
use crate::window::RegisterWindow;
use crate::ErrorCode;

/// Something a driver did to the hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Read(usize, u32),
    Write(usize, u32),
    DelayMs(u32),
    DelayNs(u64),
}

#[derive(Default)]
struct Shared {
    regs: RefCell<BTreeMap<usize, u32>>,
    log: RefCell<Vec<Event>>,
}

/// Register window over fake memory. Registers never written read as zero.
///
/// Clones, siblings and delays created from a window share its memory and its
/// event log.
#[derive(Clone)]
pub struct FakeWindow {
    shared: Rc<Shared>,
    base: usize,
}

impl FakeWindow {
    pub fn new() -> FakeWindow {
        FakeWindow {
            shared: Rc::new(Shared::default()),
            base: 0,
        }
    }

    /// A window into the same memory starting at `base`. Events are logged
    /// with absolute addresses.
    pub fn sibling(&self, base: usize) -> FakeWindow {
        FakeWindow {
            shared: self.shared.clone(),
            base,
        }
    }

    /// Set a register behind the driver's back. Not logged.
    pub fn preset(&self, offset: usize, value: u32) {
        self.shared
            .regs
            .borrow_mut()
            .insert(self.base + offset, value);
    }

    /// Current contents of a register. Not logged.
    pub fn value(&self, offset: usize) -> u32 {
        self.shared
            .regs
            .borrow()
            .get(&(self.base + offset))
            .copied()
            .unwrap_or(0)
    }

    pub fn events(&self) -> Vec<Event> {
        self.shared.log.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.shared.log.borrow_mut().clear();
    }

    /// A delay provider that logs into this window's event log.
    pub fn delay(&self) -> FakeDelay {
        FakeDelay {
            shared: self.shared.clone(),
        }
    }

    fn record(&self, event: Event) {
        self.shared.log.borrow_mut().push(event);
    }
}

impl RegisterWindow for FakeWindow {
    fn read32(&self, offset: usize) -> u32 {
        let value = self.value(offset);
        self.record(Event::Read(self.base + offset, value));
        value
    }

    fn write32(&self, offset: usize, value: u32) {
        self.preset(offset, value);
        self.record(Event::Write(self.base + offset, value));
    }
}

/// Delay that returns immediately and logs how long it was asked to wait.
pub struct FakeDelay {
    shared: Rc<Shared>,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.shared.log.borrow_mut().push(Event::DelayNs(ns.into()));
    }

    fn delay_us(&mut self, us: u32) {
        self.shared
            .log
            .borrow_mut()
            .push(Event::DelayNs(u64::from(us) * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.shared.log.borrow_mut().push(Event::DelayMs(ms));
    }
}

/// What the fake clock framework hands back for a registered clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    Fixed(&'static str, u32),
    Gate(&'static str),
}

/// Clock framework that records registrations and can be told to refuse
/// them.
pub struct FakeClockFramework {
    fixed: Vec<(&'static str, u32)>,
    gates: Vec<Box<dyn ClockGate>>,
    provider: Option<(u32, ClockTable<Handle>)>,
    failing_fixed: Vec<(&'static str, ErrorCode)>,
    failing_gate: Option<ErrorCode>,
    failing_provider: Option<ErrorCode>,
}

impl FakeClockFramework {
    pub fn new() -> FakeClockFramework {
        FakeClockFramework {
            fixed: Vec::new(),
            gates: Vec::new(),
            provider: None,
            failing_fixed: Vec::new(),
            failing_gate: None,
            failing_provider: None,
        }
    }

    /// Refuse the fixed-rate clock called `name`.
    pub fn fail_fixed(&mut self, name: &'static str, err: ErrorCode) {
        self.failing_fixed.push((name, err));
    }

    pub fn fail_gate(&mut self, err: ErrorCode) {
        self.failing_gate = Some(err);
    }

    pub fn fail_provider(&mut self, err: ErrorCode) {
        self.failing_provider = Some(err);
    }

    /// Fixed-rate clocks accepted so far, in registration order.
    pub fn fixed(&self) -> Vec<(&'static str, u32)> {
        self.fixed.clone()
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    pub fn gate_is_enabled(&self, index: usize) -> Option<bool> {
        self.gates.get(index).map(|gate| gate.is_enabled())
    }

    pub fn provider(&self) -> Option<&(u32, ClockTable<Handle>)> {
        self.provider.as_ref()
    }
}

impl ClockFramework for FakeClockFramework {
    type Handle = Handle;
    type Node = u32;

    fn register_fixed_rate(&mut self, name: &'static str, rate: u32) -> Result<Handle, ErrorCode> {
        if let Some((_, err)) = self.failing_fixed.iter().find(|(n, _)| *n == name) {
            return Err(*err);
        }
        self.fixed.push((name, rate));
        Ok(Handle::Fixed(name, rate))
    }

    fn register_gate<G: ClockGate + 'static>(
        &mut self,
        name: &'static str,
        gate: G,
    ) -> Result<Handle, ErrorCode> {
        if let Some(err) = self.failing_gate {
            return Err(err);
        }
        self.gates.push(Box::new(gate));
        Ok(Handle::Gate(name))
    }

    fn add_provider(&mut self, node: u32, clocks: ClockTable<Handle>) -> Result<(), ErrorCode> {
        if let Some(err) = self.failing_provider {
            return Err(err);
        }
        self.provider = Some((node, clocks));
        Ok(())
    }
}

/// A device with a fixed list of register resources.
pub struct FakeDevice {
    name: &'static str,
    node: u32,
    windows: Vec<Result<FakeWindow, ErrorCode>>,
    mapped: RefCell<Vec<usize>>,
}

impl FakeDevice {
    pub fn new(name: &'static str, node: u32) -> FakeDevice {
        FakeDevice {
            name,
            node,
            windows: Vec::new(),
            mapped: RefCell::new(Vec::new()),
        }
    }

    /// Add the next register resource.
    pub fn with_window(mut self, window: FakeWindow) -> FakeDevice {
        self.windows.push(Ok(window));
        self
    }

    /// Add a register resource that fails to map with `err`.
    pub fn with_failing_window(mut self, err: ErrorCode) -> FakeDevice {
        self.windows.push(Err(err));
        self
    }

    /// Indices of every `map_resource` call, successful or not.
    pub fn mapped(&self) -> Vec<usize> {
        self.mapped.borrow().clone()
    }
}

impl PlatformDevice for FakeDevice {
    type Window = FakeWindow;
    type Node = u32;

    fn name(&self) -> &str {
        self.name
    }

    fn of_node(&self) -> u32 {
        self.node
    }

    fn map_resource(&self, index: usize) -> Result<FakeWindow, ErrorCode> {
        self.mapped.borrow_mut().push(index);
        self.windows
            .get(index)
            .cloned()
            .unwrap_or(Err(ErrorCode::NODEVICE))
    }
}

/// GPIO subsystem that hands out consecutive line numbers.
pub struct FakeGpioSubsystem {
    next_base: u32,
    chips: Vec<(String, usize)>,
    failing: Option<ErrorCode>,
}

impl FakeGpioSubsystem {
    pub fn new(first_base: u32) -> FakeGpioSubsystem {
        FakeGpioSubsystem {
            next_base: first_base,
            chips: Vec::new(),
            failing: None,
        }
    }

    pub fn fail(&mut self, err: ErrorCode) {
        self.failing = Some(err);
    }

    /// Label and line count of every registered controller.
    pub fn chips(&self) -> Vec<(String, usize)> {
        self.chips.clone()
    }
}

impl GpioSubsystem for FakeGpioSubsystem {
    fn add_chip(&mut self, label: &str, ngpio: usize) -> Result<u32, ErrorCode> {
        if let Some(err) = self.failing {
            return Err(err);
        }
        let base = self.next_base;
        self.next_base += ngpio as u32;
        self.chips.push((String::from(label), ngpio));
        Ok(base)
    }
}

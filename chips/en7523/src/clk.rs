// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! EN7523 clock driver.
//!
//! The boot firmware programs the SCU clock muxes and dividers; this driver
//! only reads them back. Each clock line is described by a [`ClockDesc`]: a
//! selector field that picks a base frequency, and an optional divider field.
//! At attach time every line is resolved to a rate and registered as a
//! fixed-rate clock, and the PCIe reference clock is registered as a
//! [`PcieGate`].
//!
//! Clocks are exported in a [`ClockTable`] indexed by
//! [`dt_bindings::clock`](crate::dt_bindings::clock).

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use tock_registers::fields::Field;
use tock_registers::interfaces::Readable;

use crate::config::CONFIG;
use crate::dt_bindings::clock;
use crate::pcie::PcieGate;
use crate::platform::{ClockFramework, Driver, PlatformDevice};
use crate::scu::*;
use crate::window::RegisterWindow;
use crate::ErrorCode;

/// Where the base frequency of a clock line comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseRate {
    /// A constant frequency in Hz. No register is read.
    Fixed(u32),
    /// A `bits` wide selector field at `shift` in the base register, used as
    /// an index into `values` (Hz). Selector values past the end of `values`
    /// resolve to 0 Hz.
    Selector {
        bits: u32,
        shift: u32,
        values: &'static [u32],
    },
}

impl BaseRate {
    pub const fn selector(bits: u32, shift: u32, values: &'static [u32]) -> BaseRate {
        assert!(bits > 0 && bits < 32 && shift + bits <= 32);
        BaseRate::Selector {
            bits,
            shift,
            values,
        }
    }
}

/// The divider field of a clock line.
///
/// A raw field value of `n` divides by `(n + 1) * step`, except that a raw
/// value of 0 divides by `val0` when `val0` is non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Divider {
    reg: Option<usize>,
    bits: u32,
    shift: u32,
    val0: u32,
    step: u32,
}

impl Divider {
    /// No divider field; the line runs at its base rate.
    pub const NONE: Divider = Divider {
        reg: None,
        bits: 0,
        shift: 0,
        val0: 0,
        step: 1,
    };

    /// A divider field in the clock's base register.
    ///
    /// The largest divider, `2^bits * step`, must fit in a `u32`.
    pub const fn new(bits: u32, shift: u32, step: u32) -> Divider {
        assert!(bits > 0 && bits < 32 && shift + bits <= 32);
        assert!(step > 0);
        assert!((1u64 << bits) * (step as u64) <= (u32::MAX as u64));
        Divider {
            reg: None,
            bits,
            shift,
            val0: 0,
            step,
        }
    }

    /// Read the field from `reg` instead of the clock's base register.
    pub const fn in_reg(self, reg: usize) -> Divider {
        Divider {
            reg: Some(reg),
            ..self
        }
    }

    /// Divide by `val0` when the raw field reads zero.
    pub const fn zero_divides_by(self, val0: u32) -> Divider {
        assert!(val0 > 0);
        Divider { val0, ..self }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    pub fn val0(&self) -> u32 {
        self.val0
    }

    pub fn step(&self) -> u32 {
        self.step
    }
}

/// Register layout of one clock line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockDesc {
    id: usize,
    name: &'static str,
    base_reg: usize,
    base: BaseRate,
    div: Divider,
}

impl ClockDesc {
    pub const fn new(id: usize, name: &'static str, base_reg: usize, base: BaseRate) -> ClockDesc {
        assert!(id < clock::NUM_CLOCKS);
        ClockDesc {
            id,
            name,
            base_reg,
            base,
            div: Divider::NONE,
        }
    }

    pub const fn with_divider(self, div: Divider) -> ClockDesc {
        ClockDesc { div, ..self }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn base_reg(&self) -> usize {
        self.base_reg
    }

    /// Width of the base selector field; 0 for a fixed base rate.
    pub fn base_bits(&self) -> u32 {
        match self.base {
            BaseRate::Fixed(_) => 0,
            BaseRate::Selector { bits, .. } => bits,
        }
    }

    pub fn base(&self) -> BaseRate {
        self.base
    }

    pub fn divider(&self) -> Divider {
        self.div
    }

    /// Register holding the divider field. Defaults to the base register.
    pub fn div_reg(&self) -> usize {
        self.div.reg.unwrap_or(self.base_reg)
    }
}

static GSW_BASE: [u32; 2] = [400_000_000, 500_000_000];
static EMI_BASE: [u32; 2] = [333_000_000, 400_000_000];
static BUS_BASE: [u32; 2] = [500_000_000, 540_000_000];
static SLIC_BASE: [u32; 2] = [100_000_000, 3_125_000];
static NPU_BASE: [u32; 3] = [333_000_000, 400_000_000, 500_000_000];

/// Table-driven clock lines, in registration order.
pub static EN7523_BASE_CLKS: [ClockDesc; 7] = [
    ClockDesc::new(
        clock::GSW,
        "gsw",
        REG_GSW_CLK_DIV_SEL,
        BaseRate::selector(1, 8, &GSW_BASE),
    )
    .with_divider(Divider::new(3, 0, 1)),
    ClockDesc::new(
        clock::EMI,
        "emi",
        REG_EMI_CLK_DIV_SEL,
        BaseRate::selector(1, 8, &EMI_BASE),
    )
    .with_divider(Divider::new(3, 0, 1)),
    ClockDesc::new(
        clock::BUS,
        "bus",
        REG_BUS_CLK_DIV_SEL,
        BaseRate::selector(1, 8, &BUS_BASE),
    )
    .with_divider(Divider::new(3, 0, 1)),
    ClockDesc::new(
        clock::SLIC,
        "slic",
        REG_SPI_CLK_FREQ_SEL,
        BaseRate::selector(1, 0, &SLIC_BASE),
    )
    .with_divider(
        Divider::new(5, 24, 2)
            .in_reg(REG_SPI_CLK_DIV_SEL)
            .zero_divides_by(20),
    ),
    ClockDesc::new(
        clock::SPI,
        "spi",
        REG_SPI_CLK_DIV_SEL,
        BaseRate::Fixed(400_000_000),
    )
    .with_divider(Divider::new(5, 8, 2).zero_divides_by(40)),
    ClockDesc::new(
        clock::NPU,
        "npu",
        REG_NPU_CLK_DIV_SEL,
        BaseRate::selector(2, 8, &NPU_BASE),
    )
    .with_divider(Divider::new(3, 0, 1)),
    // The crypto engine picks between the same two sources as EMI.
    ClockDesc::new(
        clock::CRYPTO,
        "crypto",
        REG_CRYPTO_CLKSRC,
        BaseRate::selector(1, 8, &EMI_BASE),
    ),
];

fn read_field<W: RegisterWindow>(base: &W, reg: usize, bits: u32, shift: u32) -> u32 {
    let field = Field::<u32, ()>::new((1 << bits) - 1, shift as usize);
    base.register::<()>(reg).read(field)
}

/// Base frequency of `desc` in Hz.
pub fn base_rate<W: RegisterWindow>(base: &W, desc: &ClockDesc) -> u32 {
    match desc.base {
        BaseRate::Fixed(rate) => rate,
        BaseRate::Selector {
            bits,
            shift,
            values,
        } => {
            let sel = read_field(base, desc.base_reg, bits, shift);
            values.get(sel as usize).copied().unwrap_or(0)
        }
    }
}

/// Divider applied to the base frequency of `desc`. Never 0.
pub fn divider<W: RegisterWindow>(base: &W, desc: &ClockDesc) -> u32 {
    let div = desc.div;
    if div.bits == 0 {
        return 1;
    }

    let raw = read_field(base, desc.div_reg(), div.bits, div.shift);
    if raw == 0 && div.val0 != 0 {
        return div.val0;
    }

    (raw + 1) * div.step
}

/// Output frequency of `desc` in Hz.
pub fn rate<W: RegisterWindow>(base: &W, desc: &ClockDesc) -> u32 {
    let base_rate = base_rate(base, desc);
    let div = divider(base, desc);
    let rate = base_rate / div;

    if CONFIG.debug_clock_rates {
        log::debug!(
            "clk {}: base {} Hz / {} = {} Hz",
            desc.name,
            base_rate,
            div,
            rate
        );
    }

    rate
}

/// Clocks exported by the provider, indexed by clock identifier.
///
/// A slot is `None` when registering that clock failed.
pub struct ClockTable<H> {
    clks: [Option<H>; clock::NUM_CLOCKS],
}

impl<H> ClockTable<H> {
    pub fn new() -> Self {
        ClockTable {
            clks: core::array::from_fn(|_| None),
        }
    }

    /// Number of identifiers the table answers for.
    pub fn clk_num(&self) -> usize {
        self.clks.len()
    }

    pub fn get(&self, id: usize) -> Option<&H> {
        self.clks.get(id).and_then(Option::as_ref)
    }

    // `id` comes from a `ClockDesc` or `dt_bindings::clock`, both below
    // `NUM_CLOCKS`.
    fn fill(&mut self, id: usize, clk: H) {
        self.clks[id] = Some(clk);
    }

    pub fn set(&mut self, id: usize, clk: Option<H>) -> Result<(), ErrorCode> {
        let slot = self.clks.get_mut(id).ok_or(ErrorCode::INVAL)?;
        *slot = clk;
        Ok(())
    }

    /// Resolve a consumer's clock index.
    ///
    /// Indices past the table are `INVAL`; identifiers whose clock failed to
    /// register are `NODEVICE`.
    pub fn lookup(&self, id: usize) -> Result<&H, ErrorCode> {
        match self.clks.get(id) {
            None => Err(ErrorCode::INVAL),
            Some(slot) => slot.as_ref().ok_or(ErrorCode::NODEVICE),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &H)> {
        self.clks
            .iter()
            .enumerate()
            .filter_map(|(id, clk)| clk.as_ref().map(|clk| (id, clk)))
    }
}

impl<H> Default for ClockTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Register every clock of the EN7523.
///
/// Table-driven lines are resolved against `base` and registered as fixed
/// rate clocks; a line that fails to register is logged and left out. The
/// PCIe gate is built over `np_base` and registered last. Nothing here is
/// fatal.
pub fn register_clocks<F, W, N, D>(
    framework: &mut F,
    base: &W,
    np_base: N,
    delay: D,
) -> ClockTable<F::Handle>
where
    F: ClockFramework,
    W: RegisterWindow,
    N: RegisterWindow + 'static,
    D: DelayNs + 'static,
{
    register_descs(framework, base, &EN7523_BASE_CLKS, np_base, delay)
}

fn register_descs<F, W, N, D>(
    framework: &mut F,
    base: &W,
    descs: &[ClockDesc],
    np_base: N,
    delay: D,
) -> ClockTable<F::Handle>
where
    F: ClockFramework,
    W: RegisterWindow,
    N: RegisterWindow + 'static,
    D: DelayNs + 'static,
{
    let mut clocks = ClockTable::new();

    for desc in descs {
        let rate = rate(base, desc);

        match framework.register_fixed_rate(desc.name, rate) {
            Ok(clk) => clocks.fill(desc.id, clk),
            Err(err) => {
                log::error!("Failed to register clk {}: {:?}", desc.name, err);
            }
        }
    }

    let pcie = PcieGate::new(np_base, delay);
    match framework.register_gate(PcieGate::<N, D>::NAME, pcie) {
        Ok(clk) => clocks.fill(clock::PCIE, clk),
        Err(err) => {
            log::warn!("failed to register pcie clock: {:?}", err);
        }
    }

    clocks
}

/// The `econet,en7523-scu` clock provider driver.
pub struct ClockDriver<D: PlatformDevice> {
    _device: PhantomData<D>,
}

impl<D: PlatformDevice> Driver for ClockDriver<D> {
    const NAME: &'static str = "clk-en7523";
    const OF_MATCH: &'static [&'static str] = &["econet,en7523-scu"];
}

impl<D: PlatformDevice> ClockDriver<D>
where
    D::Window: 'static,
{
    /// Resource index of the main SCU block.
    pub const BASE_RESOURCE: usize = 0;
    /// Resource index of the NP block.
    pub const NP_RESOURCE: usize = 1;

    /// Attach to `dev`: map both register blocks, register all clocks and
    /// publish them as the clock provider of the device's node.
    ///
    /// Failing to map either block, or to publish the provider, fails the
    /// attach. Failures of individual clocks do not.
    pub fn probe<F, Dl>(dev: &D, framework: &mut F, delay: Dl) -> Result<(), ErrorCode>
    where
        F: ClockFramework<Node = D::Node>,
        Dl: DelayNs + 'static,
    {
        let base = dev.map_resource(Self::BASE_RESOURCE)?;
        let np_base = dev.map_resource(Self::NP_RESOURCE)?;

        let clocks = register_clocks(framework, &base, np_base, delay);

        framework
            .add_provider(dev.of_node(), clocks)
            .map_err(|err| {
                log::error!(
                    "could not register clock provider: {}: {:?}",
                    dev.name(),
                    err
                );
                err
            })
    }
}

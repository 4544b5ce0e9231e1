// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Memory-mapped coprocessor peripherals of the NDS: the ARM9's hardware
//! divider and square root unit, and the DMA engines of both CPUs.
//!
//! The peripherals do not own the rest of the system. Memory, the
//! scheduler, the interrupt controller and the geometry FIFO are reached
//! through [CoprocBus], which the embedding system implements; everything
//! else is plain state owned by [Coproc].

pub mod addr;
pub mod dma;
pub mod interface;
mod io;
pub mod math;
pub mod scheduling;
#[cfg(test)]
mod tests;

use dma::Dmas;
pub use interface::{Access, CoprocBus};
use math::ArithmeticUnit;
pub use scheduling::CoprocEvent;

/// The CPU a device belongs to.
/// Things separated by CPU generally use [CpuDevice] for easy
/// access with [CpuKind::idx].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CpuKind {
    Arm7 = 0,
    Arm9 = 1,
}

impl CpuKind {
    #[inline]
    pub const fn idx(self) -> usize {
        self as usize
    }
}

/// Type for devices that both CPUs have.
pub type CpuDevice<T> = [T; 2];

/// All coprocessor state of the system.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Coproc {
    /// Divider and square root; only mapped for the ARM9.
    pub math: ArithmeticUnit,
    /// DMA engines, indexed by [CpuKind::idx].
    pub dmas: CpuDevice<Dmas>,
}

impl Coproc {
    /// Run a task that the scheduler found to be due.
    pub fn handle_event(&mut self, bus: &mut impl CoprocBus, event: CoprocEvent) {
        event.dispatch(self, bus);
    }

    /// Tell the DMA engine of the given CPU that the event `mode`
    /// happened. `mode` is in the CPU's own timing encoding;
    /// `channels` selects which channels may react to it.
    pub fn trigger_dma(
        &mut self,
        bus: &mut impl CoprocBus,
        cpu: CpuKind,
        mode: u8,
        channels: u8,
    ) {
        self.dmas[cpu.idx()].trigger(bus, mode, channels);
    }
}

impl Default for Coproc {
    fn default() -> Self {
        Self {
            math: ArithmeticUnit::default(),
            dmas: [Dmas::new(CpuKind::Arm7), Dmas::new(CpuKind::Arm9)],
        }
    }
}

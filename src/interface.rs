// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use common::{numutil::NumExt, TimeS};

use crate::{CoprocEvent, CpuKind};

/// Kind of a memory access.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Access {
    /// Instruction fetch.
    Code,
    /// Any other access. DMA transfers always use this.
    Data,
}

/// The parts of the system the coprocessors talk to.
/// Implemented by whatever owns the memory bus, the scheduler and
/// the interrupt controllers.
pub trait CoprocBus {
    /// Read a value of width `T` from the given CPU's address space.
    fn read<T: NumExt>(&mut self, cpu: CpuKind, addr: u32, access: Access) -> T;
    /// Write a value of width `T` into the given CPU's address space.
    fn write<T: NumExt>(&mut self, cpu: CpuKind, addr: u32, value: T, access: Access);

    /// Queue an event to run after the given amount of ticks.
    /// Every queued event must eventually be handed back to
    /// [crate::Coproc::handle_event]; dropping one stalls its DMA channel.
    /// Each trigger of a channel queues one event, so a bounded queue must
    /// hold every trigger the host can issue before the events run.
    fn schedule(&mut self, event: CoprocEvent, after: TimeS);
    /// Raise the given interrupt line on a CPU.
    fn send_interrupt(&mut self, cpu: CpuKind, line: u16);

    /// If the geometry command FIFO is less than half full.
    fn gxfifo_half_empty(&self) -> bool;
    /// If the system is running in GBA compatibility mode.
    fn gba_mode(&self) -> bool;
}

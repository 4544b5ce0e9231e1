// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use common::components::scheduler::Kind;

use crate::{Coproc, CoprocBus, CpuKind};

/// Tasks the coprocessors hand to the scheduler.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CoprocEvent {
    /// Run one burst of a DMA channel.
    DmaTransfer { cpu: CpuKind, channel: u8 },
}

impl CoprocEvent {
    pub fn dispatch(self, cp: &mut Coproc, bus: &mut impl CoprocBus) {
        match self {
            CoprocEvent::DmaTransfer { cpu, channel } => {
                cp.dmas[cpu.idx()].transfer(bus, channel as usize)
            }
        }
    }
}

impl Kind for CoprocEvent {}

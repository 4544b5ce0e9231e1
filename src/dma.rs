// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use common::{components::io::IoSection, numutil::NumExt, TimeS};
use modular_bitfield::{bitfield, specifiers::*, BitfieldSpecifier};

use crate::{Access, CoprocBus, CoprocEvent, CpuDevice, CpuKind};

/// Writable bits of SAD, per CPU and channel.
pub const SAD_MASK: CpuDevice<[u32; 4]> = [
    [0x07FF_FFFF, 0x0FFF_FFFF, 0x0FFF_FFFF, 0x0FFF_FFFF],
    [0x0FFF_FFFF; 4],
];
/// Writable bits of DAD, per CPU and channel.
pub const DAD_MASK: CpuDevice<[u32; 4]> = [
    [0x07FF_FFFF, 0x07FF_FFFF, 0x07FF_FFFF, 0x0FFF_FFFF],
    [0x0FFF_FFFF; 4],
];
/// Writable bits of CNT, per CPU and channel.
/// The ARM7 has a shorter word count (except on DMA3) and no
/// lowest timing bit.
pub const CNT_MASK: CpuDevice<[u32; 4]> = [
    [0xF7E0_3FFF, 0xF7E0_3FFF, 0xF7E0_3FFF, 0xF7E0_FFFF],
    [0xFFFF_FFFF; 4],
];

/// Units the geometry FIFO takes per request.
const GXFIFO_BURST: u32 = 112;
/// Delay between a transfer being requested and it starting.
const TRANSFER_DELAY: TimeS = 1;

#[derive(Default, Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Dma {
    pub sad: u32,
    pub dad: u32,
    pub ctrl: DmaControl,

    /// Internal source register
    src: u32,
    /// Internal destination register
    dst: u32,
    /// Internal word count; units left until the transfer is done
    remaining: u32,
}

impl Dma {
    pub fn current_src(&self) -> u32 {
        self.src
    }

    pub fn current_dst(&self) -> u32 {
        self.dst
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// The 4 DMA channels of one CPU.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Dmas {
    cpu: CpuKind,
    pub channels: [Dma; 4],
}

impl Dmas {
    pub fn new(cpu: CpuKind) -> Self {
        Self {
            cpu,
            channels: [Dma::default(); 4],
        }
    }

    pub fn sad_write(&mut self, idx: usize, value: IoSection<u32>) {
        value
            .mask(SAD_MASK[self.cpu.idx()][idx])
            .apply(&mut self.channels[idx].sad);
    }

    pub fn dad_write(&mut self, idx: usize, value: IoSection<u32>) {
        value
            .mask(DAD_MASK[self.cpu.idx()][idx])
            .apply(&mut self.channels[idx].dad);
    }

    /// Read CNT. In GBA mode, the word count half is write-only.
    pub fn cnt_read(&self, idx: usize, gba_mode: bool) -> u32 {
        let cnt = u32::from(self.channels[idx].ctrl);
        if gba_mode {
            cnt & 0xFFFF_0000
        } else {
            cnt
        }
    }

    /// Update a given DMA after its control register was written.
    pub fn cnt_write(&mut self, bus: &mut impl CoprocBus, idx: usize, value: IoSection<u32>) {
        let cpu = self.cpu;
        let channel = &mut self.channels[idx];
        let old_ctrl = channel.ctrl;
        let new_ctrl = value
            .mask(CNT_MASK[cpu.idx()][idx])
            .apply_io_ret(&mut channel.ctrl);

        // The geometry FIFO might already want data; every other
        // event only triggers when it happens
        if new_ctrl.dma_en() && new_ctrl.timing() == Timing::GxFifo && bus.gxfifo_half_empty() {
            Self::schedule_transfer(bus, cpu, idx);
        }

        if old_ctrl.dma_en() || !new_ctrl.dma_en() {
            return;
        }

        // Reload internal registers
        channel.src = channel.sad;
        channel.dst = channel.dad;
        channel.remaining = new_ctrl.count();
        log::debug!(
            "{cpu:?} DMA{idx} armed: 0x{:08X} -> 0x{:08X}, {} units, {:?}",
            channel.src,
            channel.dst,
            channel.remaining,
            new_ctrl.timing()
        );

        // Only arming starts immediate transfers, so a channel switched
        // to immediate while already enabled never runs
        if new_ctrl.timing() == Timing::Now {
            Self::schedule_transfer(bus, cpu, idx);
        }
    }

    /// An event happened; start all selected channels waiting for it.
    /// `mode` is in this CPU's own timing encoding.
    pub fn trigger(&mut self, bus: &mut impl CoprocBus, mode: u8, channels: u8) {
        // ARM7 timing does not use the lowest bit
        let mode = mode << (self.cpu == CpuKind::Arm7) as u8;
        for idx in 0..4 {
            let ctrl = self.channels[idx].ctrl;
            if channels.is_bit(idx as u16) && ctrl.dma_en() && ctrl.timing() as u8 == mode {
                Self::schedule_transfer(bus, self.cpu, idx);
            }
        }
    }

    /// Run one burst of the given channel.
    /// This does not check if the channel is still enabled, a transfer
    /// that was scheduled always runs.
    pub fn transfer(&mut self, bus: &mut impl CoprocBus, idx: usize) {
        let ctrl = self.channels[idx].ctrl;
        let timing = ctrl.timing();

        let transferred = if bus.gba_mode() && timing == Timing::Special && matches!(idx, 1 | 2) {
            // GBA sound FIFO: fixed burst into the FIFO register
            let src_step = Self::src_step(ctrl.src_addr()) * 4;
            self.perform_transfer::<u32>(bus, idx, 4, src_step, 0);
            4
        } else {
            let count = match timing {
                Timing::GxFifo => self.channels[idx].remaining.min(GXFIFO_BURST),
                _ => self.channels[idx].remaining,
            };
            let unit = if ctrl.is_32bit() { 4 } else { 2 };
            let src_step = Self::src_step(ctrl.src_addr()) * unit;
            let dst_step = Self::dst_step(ctrl.dest_addr()) * unit;
            if ctrl.is_32bit() {
                self.perform_transfer::<u32>(bus, idx, count, src_step, dst_step);
            } else {
                self.perform_transfer::<u16>(bus, idx, count, src_step, dst_step);
            }
            count
        };
        log::trace!("{:?} DMA{idx} moved {transferred} units", self.cpu);

        let channel = &mut self.channels[idx];
        if timing == Timing::GxFifo {
            // Keep feeding the FIFO until the count runs out
            channel.remaining -= transferred;
            if channel.remaining > 0 {
                if bus.gxfifo_half_empty() {
                    Self::schedule_transfer(bus, self.cpu, idx);
                }
                return;
            }
        }

        if ctrl.repeat_en() && timing != Timing::Now {
            channel.remaining = ctrl.count();
            if ctrl.dest_addr() == AddrControl::IncReload {
                channel.dst = channel.dad;
            }
            if timing == Timing::GxFifo && bus.gxfifo_half_empty() {
                Self::schedule_transfer(bus, self.cpu, idx);
            }
        } else {
            channel.ctrl.set_dma_en(false);
            log::debug!("{:?} DMA{idx} finished", self.cpu);
        }

        if ctrl.irq_en() {
            bus.send_interrupt(self.cpu, 8 + idx as u16);
        }
    }

    fn perform_transfer<T: NumExt>(
        &mut self,
        bus: &mut impl CoprocBus,
        idx: usize,
        count: u32,
        src_step: i32,
        dst_step: i32,
    ) {
        let cpu = self.cpu;
        let channel = &mut self.channels[idx];
        for _ in 0..count {
            let value = bus.read::<T>(cpu, channel.src, Access::Data);
            bus.write::<T>(cpu, channel.dst, value, Access::Data);
            channel.src = channel.src.wrapping_add_signed(src_step);
            channel.dst = channel.dst.wrapping_add_signed(dst_step);
        }
    }

    fn schedule_transfer(bus: &mut impl CoprocBus, cpu: CpuKind, idx: usize) {
        bus.schedule(
            CoprocEvent::DmaTransfer {
                cpu,
                channel: idx as u8,
            },
            TRANSFER_DELAY,
        );
    }

    /// Get the direction the SRC register moves in after every unit.
    /// The source only tells decrement apart from everything else.
    /// Multiply by the unit size for the actual step.
    fn src_step(control: AddrControl) -> i32 {
        match control {
            AddrControl::Decrement => -1,
            _ => 1,
        }
    }

    /// Get the direction the DST register moves in after every unit.
    fn dst_step(control: AddrControl) -> i32 {
        match control {
            AddrControl::Increment | AddrControl::IncReload => 1,
            AddrControl::Decrement | AddrControl::Fixed => -1,
        }
    }
}

#[bitfield]
#[repr(u32)]
#[derive(Debug, Default, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DmaControl {
    pub count: B21,
    pub dest_addr: AddrControl,
    pub src_addr: AddrControl,
    pub repeat_en: bool,
    pub is_32bit: bool,
    pub timing: Timing,
    pub irq_en: bool,
    pub dma_en: bool,
}

#[derive(BitfieldSpecifier, Debug, Copy, Clone, PartialEq, Eq)]
#[bits = 2]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AddrControl {
    Increment = 0,
    Decrement = 1,
    /// Counts up on the source and down on the destination.
    Fixed = 2,
    /// Increment, and reset to DAD when repeating. Destination only.
    IncReload = 3,
}

/// Start timing, in the ARM9's encoding. The ARM7 only has the even
/// values, its native timing N is stored as 2N.
#[derive(BitfieldSpecifier, Debug, Copy, Clone, PartialEq, Eq)]
#[bits = 3]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Timing {
    /// Start when enabled.
    Now = 0,
    VBlank = 1,
    HBlank = 2,
    DisplayStart = 3,
    MainMemoryDisplay = 4,
    DsCart = 5,
    /// GBA slot; in GBA mode, the sound FIFOs.
    Special = 6,
    /// Whenever the geometry FIFO is less than half full.
    GxFifo = 7,
}

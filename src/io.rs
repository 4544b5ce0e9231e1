// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use common::{
    components::io::{get_mmio_apply, section, set_mmio_apply, FAILED_READ, FAILED_WRITE},
    io16, io32, iow16, iow32,
    numutil::{NumExt, U64Ext},
};

use crate::{addr::*, math::Half, Coproc, CoprocBus, CpuKind};

impl Coproc {
    /// Read from the coprocessor registers as seen by the given CPU.
    pub fn get_mmio<T: NumExt>(&self, bus: &impl CoprocBus, cpu: CpuKind, addr: u32) -> T {
        let gba_mode = bus.gba_mode();
        get_mmio_apply(addr, |a| {
            let dmas = &self.dmas[cpu.idx()];
            for idx in 0..4 {
                let base = idx * DMA_STRIDE;
                io32!(a, DMA0SAD + base, dmas.channels[idx.us()].sad);
                io32!(a, DMA0DAD + base, dmas.channels[idx.us()].dad);
                io32!(a, DMA0CNT + base, dmas.cnt_read(idx.us(), gba_mode));
            }

            if cpu == CpuKind::Arm9 {
                let div = &self.math.div;
                io16!(a, DIVCNT, div.ctrl.into());
                io32!(a, DIV_NUMER_L, div.numer.low());
                io32!(a, DIV_NUMER_H, div.numer.high());
                io32!(a, DIV_DENOM_L, div.denom.low());
                io32!(a, DIV_DENOM_H, div.denom.high());
                io32!(a, DIV_RESULT_L, div.result.low());
                io32!(a, DIV_RESULT_H, div.result.high());
                io32!(a, DIVREM_RESULT_L, div.rem.low());
                io32!(a, DIVREM_RESULT_H, div.rem.high());

                let sqrt = &self.math.sqrt;
                io16!(a, SQRTCNT, sqrt.ctrl.into());
                io32!(a, SQRT_RESULT, sqrt.result);
                io32!(a, SQRT_PARAM_L, sqrt.input.low());
                io32!(a, SQRT_PARAM_H, sqrt.input.high());
            }

            log::info!("{cpu:?} read from unknown IO register 0x{a:X}");
            FAILED_READ
        })
    }

    /// Write to the coprocessor registers as seen by the given CPU.
    pub fn set_mmio<T: NumExt>(
        &mut self,
        bus: &mut impl CoprocBus,
        cpu: CpuKind,
        addr: u32,
        value: T,
    ) {
        set_mmio_apply(addr, value, |a, v, m| {
            let s16 = section::<u16>(a, v, m);
            let s32 = section::<u32>(a, v, m);

            let dmas = &mut self.dmas[cpu.idx()];
            for idx in 0..4 {
                let base = idx * DMA_STRIDE;
                iow32!(a, DMA0SAD + base, dmas.sad_write(idx.us(), s32));
                iow32!(a, DMA0DAD + base, dmas.dad_write(idx.us(), s32));
                iow32!(a, DMA0CNT + base, dmas.cnt_write(bus, idx.us(), s32));
            }

            if cpu == CpuKind::Arm9 {
                let math = &mut self.math;
                iow16!(a, DIVCNT, math.div_cnt_write(s16));
                iow32!(a, DIV_NUMER_L, math.div_numer_write(Half::Low, s32));
                iow32!(a, DIV_NUMER_H, math.div_numer_write(Half::High, s32));
                iow32!(a, DIV_DENOM_L, math.div_denom_write(Half::Low, s32));
                iow32!(a, DIV_DENOM_H, math.div_denom_write(Half::High, s32));
                iow16!(a, SQRTCNT, math.sqrt_cnt_write(s16));
                iow32!(a, SQRT_PARAM_L, math.sqrt_input_write(Half::Low, s32));
                iow32!(a, SQRT_PARAM_H, math.sqrt_input_write(Half::High, s32));
            }

            log::info!("{cpu:?} write to unknown IO register 0x{a:X}, value 0x{v:X}");
            FAILED_WRITE
        })
    }
}

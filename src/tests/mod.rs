// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Test harness: a flat RAM bus with a real scheduler behind it.

mod math;

use common::{
    components::scheduler::Scheduler, numutil::NumExt, options::SystemConfig, TimeS,
};

use crate::{Access, Coproc, CoprocBus, CoprocEvent, CpuKind};

/// Size of the test RAM; addresses wrap around it.
const RAM_SIZE: usize = 0x1_0000;

pub struct TestBus {
    pub ram: Vec<u8>,
    pub scheduler: Scheduler<CoprocEvent>,
    pub interrupts: Vec<(CpuKind, u16)>,
    /// Every write done through the bus: (cpu, address, value, width).
    pub writes: Vec<(CpuKind, u32, u32, u32)>,
    pub fifo_half_empty: bool,
    pub config: SystemConfig,
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            ram: vec![0; RAM_SIZE],
            scheduler: Scheduler::default(),
            interrupts: Vec::new(),
            writes: Vec::new(),
            fifo_half_empty: false,
            config: SystemConfig::default(),
        }
    }

    pub fn gba() -> Self {
        let mut bus = Self::new();
        bus.config.gba_mode = true;
        bus
    }

    pub fn word(&self, addr: u32) -> u32 {
        self.read_raw(addr, 4)
    }

    pub fn fill_words(&mut self, addr: u32, words: &[u32]) {
        for (i, word) in words.iter().enumerate() {
            self.write_raw(addr + i as u32 * 4, *word, 4);
        }
    }

    fn read_raw(&self, addr: u32, width: u32) -> u32 {
        (0..width).fold(0, |acc, i| {
            acc | (self.ram[(addr + i) as usize % RAM_SIZE] as u32) << (i * 8)
        })
    }

    fn write_raw(&mut self, addr: u32, value: u32, width: u32) {
        for i in 0..width {
            self.ram[(addr + i) as usize % RAM_SIZE] = (value >> (i * 8)) as u8;
        }
    }
}

impl CoprocBus for TestBus {
    fn read<T: NumExt>(&mut self, _cpu: CpuKind, addr: u32, access: Access) -> T {
        assert_eq!(access, Access::Data);
        T::from_u32(self.read_raw(addr, T::WIDTH))
    }

    fn write<T: NumExt>(&mut self, cpu: CpuKind, addr: u32, value: T, access: Access) {
        assert_eq!(access, Access::Data);
        self.writes.push((cpu, addr, value.u32(), T::WIDTH));
        self.write_raw(addr, value.u32(), T::WIDTH);
    }

    fn schedule(&mut self, event: CoprocEvent, after: TimeS) {
        self.scheduler.schedule(event, after);
    }

    fn send_interrupt(&mut self, cpu: CpuKind, line: u16) {
        self.interrupts.push((cpu, line));
    }

    fn gxfifo_half_empty(&self) -> bool {
        self.fifo_half_empty
    }

    fn gba_mode(&self) -> bool {
        self.config.gba_mode
    }
}

/// Advance time by one tick and run everything that became due.
/// Returns how many events ran.
pub fn step(cp: &mut Coproc, bus: &mut TestBus) -> usize {
    bus.scheduler.advance(1);
    let mut ran = 0;
    while let Some(event) = bus.scheduler.get_next_pending() {
        cp.handle_event(bus, event.kind);
        ran += 1;
    }
    ran
}

/// Run events until none are left. Returns how many events ran.
pub fn run_until_idle(cp: &mut Coproc, bus: &mut TestBus) -> usize {
    let mut ran = 0;
    while let Some(event) = bus.scheduler.pop() {
        cp.handle_event(bus, event.kind);
        ran += 1;
        assert!(ran < 10_000, "DMA never stopped scheduling itself");
    }
    ran
}

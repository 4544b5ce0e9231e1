// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! The ARM9's math coprocessor: a divider and a square root unit.
//! Both finish instantly here, so results are recomputed on every write
//! and the busy bits always read 0.

use common::{
    components::io::IoSection,
    numutil::{NumExt, U64Ext},
};
use modular_bitfield::{bitfield, specifiers::*, BitfieldSpecifier};

/// In 32-bit mode, the special results have their upper word inverted.
const UPPER_INVERT: u64 = 0xFFFF_FFFF_0000_0000;

/// Which half of a 64-bit register a write goes to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Half {
    Low,
    High,
}

impl Half {
    fn apply(self, reg: &mut u64, value: IoSection<u32>) {
        *reg = match self {
            Half::Low => reg.set_low(value.with(reg.low())),
            Half::High => reg.set_high(value.with(reg.high())),
        };
    }
}

/// Both math units.
#[derive(Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ArithmeticUnit {
    pub div: Div,
    pub sqrt: Sqrt,
}

impl ArithmeticUnit {
    pub fn div_cnt_write(&mut self, value: IoSection<u16>) {
        value.mask(0x3).apply_io(&mut self.div.ctrl);
        self.div.update();
    }

    pub fn div_numer_write(&mut self, half: Half, value: IoSection<u32>) {
        half.apply(&mut self.div.numer, value);
        self.div.update();
    }

    pub fn div_denom_write(&mut self, half: Half, value: IoSection<u32>) {
        half.apply(&mut self.div.denom, value);
        self.div.update();
    }

    pub fn sqrt_cnt_write(&mut self, value: IoSection<u16>) {
        value.mask(0x1).apply_io(&mut self.sqrt.ctrl);
        self.sqrt.update();
    }

    pub fn sqrt_input_write(&mut self, half: Half, value: IoSection<u32>) {
        half.apply(&mut self.sqrt.input, value);
        self.sqrt.update();
    }
}

#[derive(Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Div {
    pub ctrl: DivControl,
    pub numer: u64,
    pub denom: u64,
    pub result: u64,
    pub rem: u64,
}

impl Div {
    /// Recompute result and remainder from the current inputs.
    /// Neither division by zero nor overflow trap; both produce
    /// the same values the hardware does.
    pub fn update(&mut self) {
        self.ctrl.set_by_zero(self.denom == 0);
        (self.result, self.rem) = match self.ctrl.mode() {
            DivMode::Bit32 => Self::div32(self.numer.low() as i32, self.denom.low() as i32),
            DivMode::Bit64 => Self::div64(self.numer as i64, self.denom as i64, false),
            DivMode::Bit64By32 | DivMode::Bit64By32Mirror => {
                Self::div64(self.numer as i64, self.denom.low() as i32 as i64, true)
            }
        };
    }

    fn div32(numer: i32, denom: i32) -> (u64, u64) {
        match denom {
            -1 if numer == i32::MIN => (numer as i64 as u64 ^ UPPER_INVERT, 0),
            0 => {
                let result: i32 = if numer < 0 { 1 } else { -1 };
                (result as i64 as u64 ^ UPPER_INVERT, numer as i64 as u64)
            }
            _ => (
                (numer / denom) as i64 as u64,
                (numer % denom) as i64 as u64,
            ),
        }
    }

    fn div64(numer: i64, denom: i64, denom_32bit: bool) -> (u64, u64) {
        match denom {
            -1 if denom_32bit && numer == i64::MIN => (numer as u64, 0),
            0 => (if numer < 0 { 1 } else { u64::MAX }, numer as u64),
            _ => (
                numer.wrapping_div(denom) as u64,
                numer.wrapping_rem(denom) as u64,
            ),
        }
    }
}

#[bitfield]
#[repr(u16)]
#[derive(Debug, Default, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DivControl {
    pub mode: DivMode,
    #[skip]
    __: B12,
    #[skip(setters)]
    pub by_zero: bool,
    #[skip(setters)]
    pub busy: bool,
}

impl DivControl {
    fn set_by_zero(&mut self, by_zero: bool) {
        *self = DivControl::from(u16::from(*self).set_bit(14, by_zero));
    }
}

#[derive(BitfieldSpecifier, Debug, Copy, Clone, PartialEq, Eq)]
#[bits = 2]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DivMode {
    /// 32-bit numerator and denominator.
    Bit32 = 0,
    /// 64-bit numerator, 32-bit denominator.
    Bit64By32 = 1,
    /// 64-bit numerator and denominator.
    Bit64 = 2,
    /// Behaves like [DivMode::Bit64By32].
    Bit64By32Mirror = 3,
}

#[derive(Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Sqrt {
    pub ctrl: SqrtControl,
    pub input: u64,
    pub result: u32,
}

impl Sqrt {
    pub fn update(&mut self) {
        self.result = match self.ctrl.mode() {
            SqrtMode::Bit32 => self.input.low().isqrt(),
            // isqrt of a u64 always fits 32 bits
            SqrtMode::Bit64 => self.input.isqrt() as u32,
        };
    }
}

#[bitfield]
#[repr(u16)]
#[derive(Debug, Default, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SqrtControl {
    pub mode: SqrtMode,
    #[skip]
    __: B14,
    #[skip(setters)]
    pub busy: bool,
}

#[derive(BitfieldSpecifier, Debug, Copy, Clone, PartialEq, Eq)]
#[bits = 1]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SqrtMode {
    Bit32 = 0,
    Bit64 = 1,
}

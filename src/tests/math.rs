// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use common::{components::io::IoSection, numutil::U64Ext};
use proptest::prelude::*;

use super::TestBus;
use crate::{
    addr::*,
    math::{ArithmeticUnit, DivMode, Half, SqrtMode},
    Coproc, CpuKind,
};

/// Run a division, returning (result, remainder, by-zero flag).
fn divide(mode: u16, numer: u64, denom: u64) -> (u64, u64, bool) {
    let mut unit = ArithmeticUnit::default();
    unit.div_cnt_write(IoSection::full(mode));
    unit.div_numer_write(Half::Low, IoSection::full(numer.low()));
    unit.div_numer_write(Half::High, IoSection::full(numer.high()));
    unit.div_denom_write(Half::Low, IoSection::full(denom.low()));
    unit.div_denom_write(Half::High, IoSection::full(denom.high()));
    (unit.div.result, unit.div.rem, unit.div.ctrl.by_zero())
}

fn sqrt(mode: u16, input: u64) -> u32 {
    let mut unit = ArithmeticUnit::default();
    unit.sqrt_cnt_write(IoSection::full(mode));
    unit.sqrt_input_write(Half::Low, IoSection::full(input.low()));
    unit.sqrt_input_write(Half::High, IoSection::full(input.high()));
    unit.sqrt.result
}

#[test]
fn div32_truncates_towards_zero() {
    let (result, rem, by_zero) = divide(0, 7, -2i64 as u64);
    assert_eq!(result as i64, -3);
    assert_eq!(rem as i64, 1);
    assert!(!by_zero);

    let (result, rem, _) = divide(0, -7i64 as u64, 2);
    assert_eq!(result as i64, -3);
    assert_eq!(rem as i64, -1);
}

#[test]
fn div32_ignores_upper_words() {
    let (result, rem, _) = divide(0, 0xDEAD_BEEF_0000_0064, 0x1234_5678_0000_0007);
    assert_eq!(result, 14);
    assert_eq!(rem, 2);
}

#[test]
fn div32_overflow() {
    let (result, rem, by_zero) = divide(0, 0x8000_0000, 0xFFFF_FFFF);
    assert_eq!(result, 0x0000_0000_8000_0000);
    assert_eq!(rem, 0);
    assert!(!by_zero);
}

#[test]
fn div32_by_zero() {
    let (result, rem, by_zero) = divide(0, 5, 0);
    assert_eq!(result, 0x0000_0000_FFFF_FFFF);
    assert_eq!(rem, 5);
    assert!(by_zero);

    let (result, rem, by_zero) = divide(0, -5i32 as u32 as u64, 0);
    assert_eq!(result, 0xFFFF_FFFF_0000_0001);
    assert_eq!(rem as i64, -5);
    assert!(by_zero);
}

#[test]
fn div32_zero_flag_looks_at_full_denominator() {
    // Low word is 0, so the result is the by-zero one; the flag
    // however only gets set if all 64 bits are 0
    let (result, rem, by_zero) = divide(0, 5, 0x1_0000_0000);
    assert_eq!(result, 0x0000_0000_FFFF_FFFF);
    assert_eq!(rem, 5);
    assert!(!by_zero);
}

#[test]
fn div64_by_32_overflow() {
    for mode in [1, 3] {
        let (result, rem, by_zero) = divide(mode, i64::MIN as u64, 0xFFFF_FFFF);
        assert_eq!(result, i64::MIN as u64);
        assert_eq!(rem, 0);
        assert!(!by_zero);
    }
}

#[test]
fn div64_by_32_uses_low_denominator_only() {
    for mode in [1, 3] {
        let (result, rem, _) = divide(mode, 1 << 40, 0xDEAD_0000_0000_0003);
        assert_eq!(result, (1 << 40) / 3);
        assert_eq!(rem, (1 << 40) % 3);
    }
}

#[test]
fn div64_uses_full_denominator() {
    let (result, rem, _) = divide(2, (1 << 40) + 5, 1 << 33);
    assert_eq!(result, 128);
    assert_eq!(rem, 5);
}

#[test]
fn div64_min_by_minus_one_does_not_trap() {
    let (result, rem, by_zero) = divide(2, i64::MIN as u64, u64::MAX);
    assert_eq!(result, i64::MIN as u64);
    assert_eq!(rem, 0);
    assert!(!by_zero);
}

#[test]
fn div64_by_zero() {
    for mode in [1, 2, 3] {
        let (result, rem, by_zero) = divide(mode, 9, 0);
        assert_eq!(result, u64::MAX);
        assert_eq!(rem, 9);
        assert!(by_zero);

        let (result, rem, _) = divide(mode, -9i64 as u64, 0);
        assert_eq!(result, 1);
        assert_eq!(rem as i64, -9);
    }
}

#[test]
fn divcnt_write_only_changes_mode() {
    let mut unit = ArithmeticUnit::default();
    unit.div_cnt_write(IoSection::full(0xFFFF));
    assert_eq!(unit.div.ctrl.mode(), DivMode::Bit64By32Mirror);
    // Denominator is 0, so the flag is set by the division, not the write
    assert!(unit.div.ctrl.by_zero());
    assert!(!unit.div.ctrl.busy());
    assert_eq!(u16::from(unit.div.ctrl), 0x4003);

    unit.div_denom_write(Half::Low, IoSection::full(1));
    assert_eq!(u16::from(unit.div.ctrl), 0x0003);
}

#[test]
fn mode_write_recomputes() {
    let mut unit = ArithmeticUnit::default();
    unit.div_numer_write(Half::Low, IoSection::full(0));
    unit.div_numer_write(Half::High, IoSection::full(1));
    unit.div_denom_write(Half::Low, IoSection::full(2));
    // 32-bit mode only sees a numerator of 0
    assert_eq!(unit.div.result, 0);

    unit.div_cnt_write(IoSection::full(DivMode::Bit64By32 as u16));
    assert_eq!(unit.div.result, 1 << 31);
}

#[test]
fn partial_write_keeps_other_bits() {
    let mut unit = ArithmeticUnit::default();
    unit.div_numer_write(Half::Low, IoSection::full(0x1234_5678));
    unit.div_numer_write(Half::Low, IoSection::new(0xAB00, 0xFF00));
    assert_eq!(unit.div.numer, 0x1234_AB78);
}

#[test]
fn sqrt_exact_squares() {
    assert_eq!(sqrt(0, 0), 0);
    assert_eq!(sqrt(1, 0), 0);
    for k in [1u64, 2, 255, 4096, 65_535] {
        assert_eq!(sqrt(0, k * k), k as u32);
    }
    for k in [65_536u64, 0x1234_5678, 0xFFFF_FFFF] {
        assert_eq!(sqrt(1, k * k), k as u32);
    }
}

#[test]
fn sqrt_floors() {
    assert_eq!(sqrt(0, 15), 3);
    assert_eq!(sqrt(0, u32::MAX as u64), 0xFFFF);
    assert_eq!(sqrt(1, u64::MAX), 0xFFFF_FFFF);
}

#[test]
fn sqrt_32bit_ignores_upper_word() {
    assert_eq!(sqrt(0, 0xFFFF_FFFF_0000_0010), 4);
    assert_eq!(sqrt(1, 0x0000_0001_0000_0000), 0x1_0000);
}

#[test]
fn sqrt_mode_write_recomputes() {
    let mut unit = ArithmeticUnit::default();
    unit.sqrt_input_write(Half::High, IoSection::full(4));
    assert_eq!(unit.sqrt.result, 0);
    unit.sqrt_cnt_write(IoSection::full(0xFFFF));
    assert_eq!(unit.sqrt.ctrl.mode(), SqrtMode::Bit64);
    assert_eq!(u16::from(unit.sqrt.ctrl), 1);
    assert_eq!(unit.sqrt.result, 0x2_0000);
}

#[test]
fn mmio_division() {
    let mut cp = Coproc::default();
    let mut bus = TestBus::new();
    cp.set_mmio(&mut bus, CpuKind::Arm9, 0x0400_0000 | DIVCNT, 1u16);
    // Numerator written in halfwords: 0x0000_0001_0000_0000
    cp.set_mmio(&mut bus, CpuKind::Arm9, 0x0400_0000 | DIV_NUMER_L, 0u16);
    cp.set_mmio(&mut bus, CpuKind::Arm9, 0x0400_0000 | DIV_NUMER_H, 1u16);
    cp.set_mmio(&mut bus, CpuKind::Arm9, 0x0400_0000 | DIV_DENOM_L, 16u32);

    let lo: u32 = cp.get_mmio(&bus, CpuKind::Arm9, 0x0400_0000 | DIV_RESULT_L);
    let hi: u32 = cp.get_mmio(&bus, CpuKind::Arm9, 0x0400_0000 | DIV_RESULT_H);
    assert_eq!((hi, lo), (0, 0x1000_0000));
    let rem: u32 = cp.get_mmio(&bus, CpuKind::Arm9, 0x0400_0000 | DIVREM_RESULT_L);
    assert_eq!(rem, 0);
    let cnt: u16 = cp.get_mmio(&bus, CpuKind::Arm9, 0x0400_0000 | DIVCNT);
    assert_eq!(cnt, 1);
}

#[test]
fn mmio_sqrt_byte_writes() {
    let mut cp = Coproc::default();
    let mut bus = TestBus::new();
    cp.set_mmio(&mut bus, CpuKind::Arm9, SQRT_PARAM_L + 1, 0x01u8);
    assert_eq!(cp.math.sqrt.input, 0x100);
    let result: u32 = cp.get_mmio(&bus, CpuKind::Arm9, SQRT_RESULT);
    assert_eq!(result, 16);
}

#[test]
fn math_is_not_mapped_for_arm7() {
    let mut cp = Coproc::default();
    let mut bus = TestBus::new();
    cp.set_mmio(&mut bus, CpuKind::Arm7, SQRT_PARAM_L, 81u32);
    assert_eq!(cp.math.sqrt.input, 0);

    cp.set_mmio(&mut bus, CpuKind::Arm9, SQRT_PARAM_L, 81u32);
    let seen_by_arm7: u32 = cp.get_mmio(&bus, CpuKind::Arm7, SQRT_RESULT);
    let seen_by_arm9: u32 = cp.get_mmio(&bus, CpuKind::Arm9, SQRT_RESULT);
    assert_eq!(seen_by_arm7, 0);
    assert_eq!(seen_by_arm9, 9);
}

proptest! {
    #[test]
    fn div32_identity(n in any::<i32>(), d in any::<i32>()) {
        prop_assume!(d != 0 && !(n == i32::MIN && d == -1));
        let (result, rem, by_zero) = divide(0, n as u32 as u64, d as u32 as u64);
        let (result, rem) = (result as i64, rem as i64);
        prop_assert!(!by_zero);
        prop_assert_eq!(result * d as i64 + rem, n as i64);
        prop_assert!(rem == 0 || rem.signum() == (n as i64).signum());
    }

    #[test]
    fn div64_by_32_identity(n in any::<i64>(), d in any::<i32>(), mode in prop_oneof![Just(1u16), Just(3u16)]) {
        prop_assume!(d != 0 && !(n == i64::MIN && d == -1));
        let (result, rem, _) = divide(mode, n as u64, d as u32 as u64);
        let (result, rem) = (result as i64, rem as i64);
        prop_assert_eq!(result.wrapping_mul(d as i64).wrapping_add(rem), n);
        prop_assert!(rem == 0 || rem.signum() == n.signum());
        prop_assert!(rem.unsigned_abs() < (d as i64).unsigned_abs());
    }

    #[test]
    fn div64_identity(n in any::<i64>(), d in any::<i64>()) {
        prop_assume!(d != 0 && !(n == i64::MIN && d == -1));
        let (result, rem, by_zero) = divide(2, n as u64, d as u64);
        let (result, rem) = (result as i64, rem as i64);
        prop_assert!(!by_zero);
        prop_assert_eq!(result.wrapping_mul(d).wrapping_add(rem), n);
        prop_assert!(rem == 0 || rem.signum() == n.signum());
    }

    #[test]
    fn div_by_zero_any_mode(n in any::<u64>(), mode in 0u16..4) {
        let (result, rem, by_zero) = divide(mode, n, 0);
        prop_assert!(by_zero);
        if mode == 0 {
            prop_assert_eq!(rem as i64, n.low() as i32 as i64);
        } else {
            prop_assert_eq!(rem, n);
        }
        // Low word is always +-1
        let negative = if mode == 0 { (n.low() as i32) < 0 } else { (n as i64) < 0 };
        prop_assert_eq!(result.low(), if negative { 1 } else { u32::MAX });
    }

    #[test]
    fn sqrt64_is_floor(x in any::<u64>()) {
        let root = sqrt(1, x) as u128;
        prop_assert!(root * root <= x as u128);
        prop_assert!((root + 1) * (root + 1) > x as u128);
    }

    #[test]
    fn sqrt_is_monotonic(a in any::<u64>(), b in any::<u64>(), mode in 0u16..2) {
        let (lo, hi) = if mode == 0 {
            (a.low().min(b.low()) as u64, a.low().max(b.low()) as u64)
        } else {
            (a.min(b), a.max(b))
        };
        prop_assert!(sqrt(mode, lo) <= sqrt(mode, hi));
    }
}

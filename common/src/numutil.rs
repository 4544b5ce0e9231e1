// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

use core::ops::BitAnd;

/// Trait for the integer widths a register or bus access can have.
pub trait NumExt: BitAnd<Output = Self> + Copy + PartialEq + Default {
    /// Width in bytes.
    const WIDTH: u32;

    /// Is the given bit set?
    fn is_bit(&self, bit: u16) -> bool;
    /// Set the given bit.
    fn set_bit(self, bit: u16, state: bool) -> Self;

    /// Convert to u32
    fn u32(self) -> u32;
    /// Convert to usize
    fn us(self) -> usize;
    /// Convert from u32, truncating
    fn from_u32(from: u32) -> Self;
}

macro_rules! num_ext_impl {
    ($ty:ident, $w:expr) => {
        impl NumExt for $ty {
            const WIDTH: u32 = $w;

            #[inline(always)]
            fn is_bit(&self, bit: u16) -> bool {
                (self & (1 << bit)) != 0
            }

            #[inline(always)]
            fn set_bit(self, bit: u16, state: bool) -> $ty {
                (self & !(1 << bit)) | ((state as $ty) << bit)
            }

            #[inline(always)]
            fn u32(self) -> u32 {
                self as u32
            }

            #[inline(always)]
            fn us(self) -> usize {
                self as usize
            }

            #[inline(always)]
            fn from_u32(from: u32) -> Self {
                from as $ty
            }
        }
    };
}

num_ext_impl!(u8, 1);
num_ext_impl!(u16, 2);
num_ext_impl!(u32, 4);

/// Make a dword out of its two 32-bit halves.
#[inline(always)]
pub fn dword(lo: u32, hi: u32) -> u64 {
    ((hi as u64) << 32) | lo as u64
}

/// Access to the 32-bit halves of 64-bit registers, which the
/// bus only ever sees one at a time.
pub trait U64Ext {
    fn low(self) -> u32;
    fn high(self) -> u32;
    fn set_low(self, low: u32) -> u64;
    fn set_high(self, high: u32) -> u64;
}

impl U64Ext for u64 {
    #[inline(always)]
    fn low(self) -> u32 {
        self as u32
    }

    #[inline(always)]
    fn high(self) -> u32 {
        (self >> 32) as u32
    }

    #[inline(always)]
    fn set_low(self, low: u32) -> u64 {
        dword(low, self.high())
    }

    #[inline(always)]
    fn set_high(self, high: u32) -> u64 {
        dword(self.low(), high)
    }
}

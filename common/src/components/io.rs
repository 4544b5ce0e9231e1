// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

//! Splitting of bus accesses into per-register sections.
//! A bus access of any width is cut into pieces, each covering (part of) a
//! single register. Every piece carries a value and a byte mask, so a handler
//! only ever replaces the bits the guest actually wrote.

use core::marker::PhantomData;

use crate::numutil::NumExt;

/// Returned by a read handler when no register matched: value 0, 1 byte.
pub const FAILED_READ: (u32, u32, u32) = (0, 0, 1);
/// Returned by a write handler when no register matched: 1 byte consumed.
pub const FAILED_WRITE: (u32, u32) = (0, 1);

#[macro_export]
macro_rules! io16 {
    ($ma:expr, $addr:expr, $exec: expr) => {{
        if ($ma & !1) == $addr {
            let exec: u16 = { $exec };
            return (exec as u32, $ma & 1, 2);
        }
    }};
}

#[macro_export]
macro_rules! io32 {
    ($ma:expr, $addr:expr, $exec: expr) => {{
        if ($ma & !3) == $addr {
            let exec: u32 = { $exec };
            return (exec, $ma & 3, 4);
        }
    }};
}

#[macro_export]
macro_rules! iow16 {
    ($a:expr, $addr:expr, $exec: expr) => {{
        if ($a & !1) == $addr {
            let _exec: () = { $exec };
            return ($a & 1, 2);
        }
    }};
}

#[macro_export]
macro_rules! iow32 {
    ($a:expr, $addr:expr, $exec: expr) => {{
        if ($a & !3) == $addr {
            let _exec: () = { $exec };
            return ($a & 3, 4);
        }
    }};
}

/// Perform a read of width `T` at `addr`.
/// `inner` is called once per register touched and returns
/// (register value, offset of `addr` into the register, register size).
pub fn get_mmio_apply<T: NumExt>(addr: u32, mut inner: impl FnMut(u32) -> (u32, u32, u32)) -> T {
    let addr = addr & 0xFF_FFFF;
    let mut out = 0u32;

    let mut current_byte = 0;
    while current_byte < T::WIDTH {
        let (value, from_start_offset, reg_size) = inner(addr + current_byte);
        out |= (value >> (from_start_offset * 8)).wrapping_shl(current_byte * 8);
        current_byte += reg_size - from_start_offset;
    }

    T::from_u32(out)
}

/// Perform a write of width `T` at `addr`.
/// `inner` is called once per register touched with (address, value, mask)
/// and returns (offset of the address into the register, register size).
pub fn set_mmio_apply<T: NumExt>(
    addr: u32,
    value: T,
    mut inner: impl FnMut(u32, u32, u32) -> (u32, u32),
) {
    let addr = addr & 0xFF_FFFF;
    let mut value = value.u32();

    let mut current_byte = 0;
    let mut mask = u32::MAX >> ((4 - T::WIDTH) * 8);
    while current_byte < T::WIDTH {
        let (from_start_offset, reg_size) = inner(addr + current_byte, value, mask);
        let written = reg_size - from_start_offset;
        value = value.wrapping_shr(written * 8);
        mask = mask.wrapping_shr(written * 8);
        current_byte += written;
    }
}

/// Build the section of a register of width `T` that a write touches.
pub fn section<T: NumExt>(addr: u32, new: u32, mask: u32) -> IoSection<T> {
    let offs = addr & (T::WIDTH - 1);
    IoSection {
        value: new << (offs * 8),
        mask: mask << (offs * 8),
        _ph: PhantomData,
    }
}

/// A masked write to a register of width `T`.
/// Applying it computes `(old & !mask) | (value & mask)`.
#[derive(Copy, Clone, Debug)]
pub struct IoSection<T> {
    value: u32,
    mask: u32,
    _ph: PhantomData<T>,
}

impl<T: NumExt> IoSection<T> {
    /// A write of `value` to the bits set in `mask`.
    pub fn new(value: T, mask: T) -> Self {
        Self {
            value: value.u32(),
            mask: mask.u32(),
            _ph: PhantomData,
        }
    }

    /// A write of `value` to the entire register.
    pub fn full(value: T) -> Self {
        Self::new(value, T::from_u32(u32::MAX))
    }

    pub fn apply(&self, to: &mut T) {
        *to = self.with(*to);
    }

    /// Further restrict the bits this write may change.
    pub fn mask(mut self, mask: u32) -> Self {
        self.mask &= mask;
        self
    }

    pub fn apply_io<E>(&self, to: &mut E)
    where
        T: From<E>,
        E: Copy + From<T>,
    {
        *to = self.with((*to).into()).into();
    }

    pub fn apply_io_ret<E>(&self, to: &mut E) -> E
    where
        T: From<E>,
        E: Copy + From<T>,
    {
        self.apply_io(to);
        *to
    }

    pub fn with(&self, with: T) -> T {
        T::from_u32((with.u32() & !self.mask) | (self.value & self.mask))
    }
}

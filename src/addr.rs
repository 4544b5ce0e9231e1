// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

// DMA; channel N is at these plus N * DMA_STRIDE
pub const DMA0SAD: u32 = 0xB0;
pub const DMA0DAD: u32 = 0xB4;
pub const DMA0CNT: u32 = 0xB8;
pub const DMA_STRIDE: u32 = 0xC;

// Divider
pub const DIVCNT: u32 = 0x280;
pub const DIV_NUMER_L: u32 = 0x290;
pub const DIV_NUMER_H: u32 = 0x294;
pub const DIV_DENOM_L: u32 = 0x298;
pub const DIV_DENOM_H: u32 = 0x29C;
pub const DIV_RESULT_L: u32 = 0x2A0;
pub const DIV_RESULT_H: u32 = 0x2A4;
pub const DIVREM_RESULT_L: u32 = 0x2A8;
pub const DIVREM_RESULT_H: u32 = 0x2AC;

// Square root
pub const SQRTCNT: u32 = 0x2B0;
pub const SQRT_RESULT: u32 = 0x2B4;
pub const SQRT_PARAM_L: u32 = 0x2B8;
pub const SQRT_PARAM_H: u32 = 0x2BC;

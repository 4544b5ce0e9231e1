// Copyright (c) 2024 Leela Aurelia, git@elia.garden
//
// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL-2.0) or the
// GNU General Public License Version 3 (GPL-3).
// If a copy of these licenses was not distributed with this file, you can
// obtain them at https://mozilla.org/MPL/2.0/ and http://www.gnu.org/licenses/.

/// Configuration used when initializing the system.
/// These options don't change while a game is running.
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "serde_config", derive(serde::Deserialize, serde::Serialize))]
pub struct SystemConfig {
    /// If the system runs in GBA compatibility mode.
    /// This hides the low half of the DMA control registers from reads and
    /// turns DMA 1/2 in special timing into sound FIFO transfers.
    pub gba_mode: bool,
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the bridge.
//!
//! # Types
//!
//! - [`Percent`] - Speed or brightness request (0-100%)
//! - [`Level`] / [`LevelTable`] - Discrete actuator positions and their actions
//! - [`AccessoryId`] - Identifier of a bridged accessory

mod accessory_id;
mod level;
mod percent;

pub use accessory_id::AccessoryId;
pub use level::{Level, LevelTable};
pub use percent::Percent;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level mapping for continuous and toggle actuators.
//!
//! - [`nearest_index`] maps a requested value onto an ascending level table.
//!   Fans and basic lights use it to pick the action to dispatch.
//! - [`toggle_levels`], [`closest_toggle_index`] and [`plan_steps`] describe
//!   single-button devices that cycle through their levels, and compute how
//!   many presses reach a target. [`ToggleSpec`] bundles them per device.

mod resolver;
mod toggle;

pub use resolver::nearest_index;
pub use toggle::{ToggleSpec, TogglePlan, closest_toggle_index, plan_steps, toggle_levels};

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-accessory runtime state.

use crate::types::Percent;

/// Last known state of an accessory.
///
/// The bridge cannot read anything back from the devices it drives, so this
/// is what the controller sees on every read. It is updated when a write
/// arrives, before any action is dispatched.
///
/// # Examples
///
/// ```
/// use hcfan_lib::accessory::AccessoryRuntimeState;
/// use hcfan_lib::types::Percent;
///
/// let state = AccessoryRuntimeState::new(true, Percent::new(50).unwrap());
/// assert!(state.power);
/// assert_eq!(state.current_value.value(), 50);
/// assert_eq!(state.current_toggle_index, 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessoryRuntimeState {
    /// Whether the accessory is on.
    pub power: bool,
    /// Last requested speed or brightness.
    pub current_value: Percent,
    /// Position in the toggle sequence. Only meaningful for toggle lights.
    pub current_toggle_index: usize,
}

impl AccessoryRuntimeState {
    /// Creates a state with the given power and value.
    #[must_use]
    pub fn new(power: bool, current_value: Percent) -> Self {
        Self {
            power,
            current_value,
            current_toggle_index: 0,
        }
    }

    /// Sets the toggle sequence position.
    #[must_use]
    pub fn with_toggle_index(mut self, index: usize) -> Self {
        self.current_toggle_index = index;
        self
    }
}

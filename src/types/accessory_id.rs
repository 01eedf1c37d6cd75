// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stable accessory identifiers.

use std::fmt;

use uuid::Uuid;

/// Namespace for name-based accessory UUIDs.
const NAMESPACE: Uuid = Uuid::from_u128(0x6863_6661_6e00_4c69_6220_4163_6365_7373);

/// Identifier of a bridged accessory.
///
/// Derived from the accessory category, name and serial number, so the same
/// configuration yields the same ids across restarts and the controller keeps
/// its pairing, rooms and automations.
///
/// # Examples
///
/// ```
/// use hcfan_lib::types::AccessoryId;
///
/// let a = AccessoryId::derive("fan", "Ceiling Fan", "");
/// assert_eq!(a, AccessoryId::derive("fan", "Ceiling Fan", ""));
/// assert_ne!(a, AccessoryId::derive("lightbulb", "Ceiling Fan", ""));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessoryId(Uuid);

impl AccessoryId {
    /// Lowest instance id available to bridged accessories. Instance id 1
    /// belongs to the bridge itself.
    pub const FIRST_INSTANCE_ID: u64 = 2;

    /// Derives the id of an accessory.
    #[must_use]
    pub fn derive(category: &str, name: &str, serial: &str) -> Self {
        let key = format!("{category}\0{name}\0{serial}");
        Self(Uuid::new_v5(&NAMESPACE, key.as_bytes()))
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Returns the numeric instance id announced to the controller.
    ///
    /// Never below [`AccessoryId::FIRST_INSTANCE_ID`].
    #[must_use]
    pub fn instance_id(&self) -> u64 {
        let (high, _) = self.0.as_u64_pair();
        (high >> 1).max(Self::FIRST_INSTANCE_ID)
    }
}

impl fmt::Debug for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessoryId({})", self.instance_id())
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

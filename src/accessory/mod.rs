// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Virtual accessories exposed to the smart-home controller.
//!
//! Each accessory owns an [`AccessoryRuntimeState`] and a handle to a
//! [`Dispatch`] transport. The controller-side adapter calls
//! [`Accessory::read`] for characteristic reads, which answer from the cached
//! state, and [`Accessory::write`] for remote updates, which update the state
//! and dispatch the matching actions.
//!
//! Dispatch failures are logged and swallowed: the controller always sees
//! its write succeed, whatever happened to the physical device.
//!
//! # Accessories
//!
//! - [`FanAccessory`]: power, rotation speed, current fan state
//! - [`LightAccessory`]: power and, for basic and toggle lights, brightness

mod actuator;
mod fan;
mod light;
mod state;

pub use actuator::{PulseReport, ToggleActuator, emit_pulses};
pub use fan::FanAccessory;
pub use light::{LightAccessory, LightKind};
pub use state::AccessoryRuntimeState;

use crate::protocol::{Action, Dispatch};
use crate::types::{AccessoryId, Percent};

/// Identity shown to the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessoryInfo {
    /// Display name.
    pub name: String,
    /// Manufacturer.
    #[serde(default)]
    pub manufacturer: String,
    /// Model.
    #[serde(default)]
    pub model: String,
    /// Serial number.
    #[serde(default)]
    pub serial: String,
}

impl AccessoryInfo {
    /// Creates an identity with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the stable id of an accessory of `kind` with this identity.
    #[must_use]
    pub fn id_for(&self, kind: AccessoryKind) -> AccessoryId {
        AccessoryId::derive(kind.category(), &self.name, &self.serial)
    }
}

/// Actions that switch a device on and off.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PowerActions {
    /// Dispatched when the accessory is turned on.
    pub on: Action,
    /// Dispatched when the accessory is turned off.
    pub off: Action,
}

impl PowerActions {
    /// Returns the action for the requested power state.
    #[must_use]
    pub fn for_power(&self, on: bool) -> &Action {
        if on { &self.on } else { &self.off }
    }
}

/// Accessory category, as registered with the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessoryKind {
    /// A fan.
    Fan,
    /// A light bulb.
    Lightbulb,
}

impl AccessoryKind {
    /// Returns the category name used in logs and accessory ids.
    #[must_use]
    pub fn category(self) -> &'static str {
        match self {
            Self::Fan => "fan",
            Self::Lightbulb => "lightbulb",
        }
    }
}

/// Characteristics an accessory can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    /// Power state.
    On,
    /// Fan speed, 0-100.
    RotationSpeed,
    /// Light brightness, 0-100.
    Brightness,
    /// Whether the fan is idle or blowing air. Read-only.
    CurrentFanState,
}

/// Reported fan activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrentFanState {
    /// The fan is off.
    Idle,
    /// The fan is on.
    BlowingAir,
}

/// A characteristic value as exchanged with the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacteristicValue {
    /// A boolean, used by [`Characteristic::On`].
    Bool(bool),
    /// A number, used by speed and brightness.
    Number(f64),
    /// A fan activity state.
    FanState(CurrentFanState),
}

impl CharacteristicValue {
    /// Returns the value as a boolean, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as a clamped percentage, if it is a number.
    #[must_use]
    pub fn as_percent(&self) -> Option<Percent> {
        match self {
            Self::Number(n) => Some(Percent::from_request(*n)),
            _ => None,
        }
    }
}

impl From<Percent> for CharacteristicValue {
    fn from(value: Percent) -> Self {
        Self::Number(f64::from(value.value()))
    }
}

/// Entry points used by the controller-side adapter.
#[allow(async_fn_in_trait)]
pub trait Accessory {
    /// Returns the accessory identifier.
    fn id(&self) -> AccessoryId;

    /// Returns the identity shown to the controller.
    fn info(&self) -> &AccessoryInfo;

    /// Returns the accessory category.
    fn kind(&self) -> AccessoryKind;

    /// Returns the characteristics this accessory exposes.
    fn characteristics(&self) -> &'static [Characteristic];

    /// Returns the cached value of `characteristic`.
    ///
    /// Returns `None` if the accessory does not expose it.
    fn read(&self, characteristic: Characteristic) -> Option<CharacteristicValue>;

    /// Applies a remote update.
    ///
    /// Never fails: unsupported characteristics, mismatched values and
    /// dispatch failures are logged.
    async fn write(&self, characteristic: Characteristic, value: CharacteristicValue);
}

/// Dispatches `action`, logging the outcome. Returns whether it succeeded.
pub(crate) async fn dispatch_logged<D: Dispatch>(
    dispatcher: &D,
    accessory: &str,
    action: &Action,
) -> bool {
    tracing::debug!(accessory = %accessory, action = %action, "Dispatching action");

    match dispatcher.dispatch(action).await {
        Ok(response) => {
            tracing::debug!(
                accessory = %accessory,
                body = %response.body(),
                "Action dispatched"
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                accessory = %accessory,
                action = %action,
                error = %e,
                "Action failed"
            );
            false
        }
    }
}

/// Logs a write whose value does not fit the characteristic.
pub(crate) fn log_mismatched_write(
    accessory: &str,
    characteristic: Characteristic,
    value: CharacteristicValue,
) {
    tracing::warn!(
        accessory = %accessory,
        ?characteristic,
        ?value,
        "Ignoring write with unexpected value type"
    );
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory dispatcher shared by the accessory tests.

    use parking_lot::Mutex;

    use crate::error::DispatchError;
    use crate::protocol::{Action, Dispatch, DispatchResponse};

    /// Records every action; fails those listed in `failing`.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingDispatcher {
        actions: Mutex<Vec<Action>>,
        failing: Mutex<Vec<Action>>,
    }

    impl RecordingDispatcher {
        pub(crate) fn fail_on(&self, action: Action) {
            self.failing.lock().push(action);
        }

        pub(crate) fn actions(&self) -> Vec<Action> {
            self.actions.lock().clone()
        }

        pub(crate) fn count(&self, action: &Action) -> usize {
            self.actions.lock().iter().filter(|a| *a == action).count()
        }
    }

    impl Dispatch for RecordingDispatcher {
        async fn dispatch(&self, action: &Action) -> Result<DispatchResponse, DispatchError> {
            self.actions.lock().push(action.clone());
            if self.failing.lock().contains(action) {
                return Err(DispatchError::InvalidAddress(action.to_string()));
            }
            Ok(DispatchResponse::default())
        }
    }
}

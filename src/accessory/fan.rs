// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan accessory with a fixed set of speeds.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::protocol::Dispatch;
use crate::types::{AccessoryId, LevelTable, Percent};

use super::{
    Accessory, AccessoryInfo, AccessoryKind, AccessoryRuntimeState, Characteristic,
    CharacteristicValue, CurrentFanState, PowerActions, dispatch_logged, log_mismatched_write,
};

/// A fan driven by one action per configured speed.
///
/// Rotation speed requests are mapped onto the nearest configured speed. The
/// requested value, not the mapped one, is what the controller reads back.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use hcfan_lib::accessory::{AccessoryInfo, FanAccessory};
/// use hcfan_lib::protocol::{Action, HttpDispatcher};
/// use hcfan_lib::types::{Level, LevelTable, Percent};
///
/// # async fn example() -> hcfan_lib::Result<()> {
/// let speeds = LevelTable::new(vec![
///     Level::new(33, Action::http("http://fan.local/speed/1")),
///     Level::new(66, Action::http("http://fan.local/speed/2")),
///     Level::new(100, Action::http("http://fan.local/speed/3")),
/// ])?;
///
/// let fan = FanAccessory::new(AccessoryInfo::new("Bedroom Fan"), speeds, Arc::new(HttpDispatcher::new()?));
/// fan.set_speed(Percent::new(70)?).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FanAccessory<D> {
    id: AccessoryId,
    info: AccessoryInfo,
    speeds: LevelTable,
    power_actions: Option<PowerActions>,
    state: Mutex<AccessoryRuntimeState>,
    dispatcher: Arc<D>,
}

impl<D: Dispatch> FanAccessory<D> {
    const CHARACTERISTICS: &'static [Characteristic] = &[
        Characteristic::On,
        Characteristic::RotationSpeed,
        Characteristic::CurrentFanState,
    ];

    /// Creates a fan that starts off at speed 0.
    #[must_use]
    pub fn new(info: AccessoryInfo, speeds: LevelTable, dispatcher: Arc<D>) -> Self {
        Self {
            id: info.id_for(AccessoryKind::Fan),
            info,
            speeds,
            power_actions: None,
            state: Mutex::new(AccessoryRuntimeState::default()),
            dispatcher,
        }
    }

    /// Sets the actions dispatched on power changes.
    ///
    /// Without them, turning the fan off only updates the cached state.
    #[must_use]
    pub fn with_power_actions(mut self, power_actions: PowerActions) -> Self {
        self.power_actions = Some(power_actions);
        self
    }

    /// Sets the initial power state and speed.
    #[must_use]
    pub fn with_initial_state(self, power: bool, speed: Percent) -> Self {
        *self.state.lock() = AccessoryRuntimeState::new(power, speed);
        self
    }

    /// Returns the configured speeds.
    #[must_use]
    pub fn speeds(&self) -> &LevelTable {
        &self.speeds
    }

    /// Returns a copy of the runtime state.
    #[must_use]
    pub fn state(&self) -> AccessoryRuntimeState {
        *self.state.lock()
    }

    /// Returns whether the fan is on.
    #[must_use]
    pub fn power(&self) -> bool {
        self.state.lock().power
    }

    /// Returns the last requested speed.
    #[must_use]
    pub fn speed(&self) -> Percent {
        self.state.lock().current_value
    }

    /// Returns whether the fan is idle or blowing air.
    #[must_use]
    pub fn current_fan_state(&self) -> CurrentFanState {
        if self.power() {
            CurrentFanState::BlowingAir
        } else {
            CurrentFanState::Idle
        }
    }

    /// Turns the fan on or off.
    ///
    /// Turning on also restores the last requested speed.
    pub async fn set_power(&self, on: bool) {
        let speed = {
            let mut state = self.state.lock();
            state.power = on;
            state.current_value
        };

        tracing::info!(accessory = %self.info.name, power = on, "Set fan power");

        match &self.power_actions {
            Some(actions) => {
                dispatch_logged(&*self.dispatcher, &self.info.name, actions.for_power(on)).await;
            }
            None => {
                tracing::debug!(accessory = %self.info.name, "No power action configured");
            }
        }

        if on {
            self.dispatch_speed(speed).await;
        }
    }

    /// Sets the rotation speed.
    ///
    /// The action of the nearest configured speed is dispatched every time,
    /// even if it was already the active one.
    pub async fn set_speed(&self, speed: Percent) {
        self.state.lock().current_value = speed;
        self.dispatch_speed(speed).await;
    }

    async fn dispatch_speed(&self, speed: Percent) {
        let level = self.speeds.resolve(speed);

        tracing::info!(
            accessory = %self.info.name,
            requested = speed.value(),
            mapped = level.value(),
            "Requested speed mapped to configured level"
        );

        dispatch_logged(&*self.dispatcher, &self.info.name, level.action()).await;
    }
}

impl<D: Dispatch> Accessory for FanAccessory<D> {
    fn id(&self) -> AccessoryId {
        self.id
    }

    fn info(&self) -> &AccessoryInfo {
        &self.info
    }

    fn kind(&self) -> AccessoryKind {
        AccessoryKind::Fan
    }

    fn characteristics(&self) -> &'static [Characteristic] {
        Self::CHARACTERISTICS
    }

    fn read(&self, characteristic: Characteristic) -> Option<CharacteristicValue> {
        match characteristic {
            Characteristic::On => Some(CharacteristicValue::Bool(self.power())),
            Characteristic::RotationSpeed => Some(self.speed().into()),
            Characteristic::CurrentFanState => {
                Some(CharacteristicValue::FanState(self.current_fan_state()))
            }
            Characteristic::Brightness => None,
        }
    }

    async fn write(&self, characteristic: Characteristic, value: CharacteristicValue) {
        match (characteristic, value) {
            (Characteristic::On, CharacteristicValue::Bool(on)) => self.set_power(on).await,
            (Characteristic::RotationSpeed, value) => match value.as_percent() {
                Some(speed) => self.set_speed(speed).await,
                None => log_mismatched_write(&self.info.name, characteristic, value),
            },
            (Characteristic::On, value) => {
                log_mismatched_write(&self.info.name, characteristic, value);
            }
            (Characteristic::CurrentFanState | Characteristic::Brightness, _) => {
                tracing::warn!(
                    accessory = %self.info.name,
                    ?characteristic,
                    "Ignoring write to unsupported characteristic"
                );
            }
        }
    }
}

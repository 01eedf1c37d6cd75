// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light accessories.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::level::ToggleSpec;
use crate::protocol::Dispatch;
use crate::types::{AccessoryId, LevelTable, Percent};

use super::{
    Accessory, AccessoryInfo, AccessoryKind, AccessoryRuntimeState, Characteristic,
    CharacteristicValue, PowerActions, ToggleActuator, dispatch_logged, emit_pulses,
    log_mismatched_write,
};

/// How a light is driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightKind {
    /// Separate power actions plus one action per brightness level.
    Basic {
        /// Power on/off actions.
        power: PowerActions,
        /// Brightness levels.
        levels: LevelTable,
    },
    /// A single action that cycles through brightness levels.
    Toggle(ToggleSpec),
    /// On/off only.
    Switch(PowerActions),
}

impl LightKind {
    /// Returns the kind name, for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::Toggle(_) => "toggle",
            Self::Switch(_) => "switch",
        }
    }
}

/// A light bulb accessory.
///
/// Toggle lights reach a brightness by pulsing their single action, one
/// pulse per step with a settle delay in between. The new position is
/// recorded before the first pulse goes out, and overlapping requests are
/// serialized per light: while a sequence runs, only the most recent
/// waiting request is kept.
#[derive(Debug)]
pub struct LightAccessory<D> {
    id: AccessoryId,
    info: AccessoryInfo,
    kind: LightKind,
    state: Mutex<AccessoryRuntimeState>,
    actuator: ToggleActuator,
    dispatcher: Arc<D>,
}

impl<D: Dispatch> LightAccessory<D> {
    const DIMMABLE: &'static [Characteristic] = &[Characteristic::On, Characteristic::Brightness];
    const SWITCH: &'static [Characteristic] = &[Characteristic::On];

    /// Creates a light that starts off at brightness 0.
    #[must_use]
    pub fn new(info: AccessoryInfo, kind: LightKind, dispatcher: Arc<D>) -> Self {
        let light = Self {
            id: info.id_for(AccessoryKind::Lightbulb),
            info,
            kind,
            state: Mutex::new(AccessoryRuntimeState::default()),
            actuator: ToggleActuator::new(),
            dispatcher,
        };
        light.with_initial_state(false, Percent::MIN)
    }

    /// Sets the initial power state and brightness.
    ///
    /// Toggle lights snap the brightness to the closest generated level.
    #[must_use]
    pub fn with_initial_state(self, power: bool, brightness: Percent) -> Self {
        let state = match &self.kind {
            LightKind::Toggle(toggle) => {
                let plan = toggle.plan(0, brightness);
                AccessoryRuntimeState::new(power, plan.to_value).with_toggle_index(plan.to_index)
            }
            LightKind::Basic { .. } | LightKind::Switch(_) => {
                AccessoryRuntimeState::new(power, brightness)
            }
        };
        *self.state.lock() = state;
        self
    }

    /// Returns how this light is driven.
    #[must_use]
    pub fn light_kind(&self) -> &LightKind {
        &self.kind
    }

    /// Returns a copy of the runtime state.
    #[must_use]
    pub fn state(&self) -> AccessoryRuntimeState {
        *self.state.lock()
    }

    /// Returns whether the light is on.
    #[must_use]
    pub fn power(&self) -> bool {
        self.state.lock().power
    }

    /// Returns the cached brightness.
    #[must_use]
    pub fn brightness(&self) -> Percent {
        self.state.lock().current_value
    }

    /// Turns the light on or off.
    ///
    /// Toggle lights pulse down to brightness 0 when turned off and up to
    /// their brightest level when turned on. Their power flag follows the
    /// stop they end up on, so a superseded request leaves it untouched.
    pub async fn set_power(&self, on: bool) {
        tracing::info!(
            accessory = %self.info.name,
            kind = self.kind.name(),
            power = on,
            "Set light power"
        );

        match &self.kind {
            LightKind::Toggle(toggle) => {
                let target = if on { toggle.brightest() } else { Percent::MIN };
                self.toggle_to(toggle, target).await;
            }
            LightKind::Basic { power, .. } | LightKind::Switch(power) => {
                self.state.lock().power = on;
                dispatch_logged(&*self.dispatcher, &self.info.name, power.for_power(on)).await;
            }
        }
    }

    /// Sets the brightness.
    ///
    /// Basic lights dispatch the nearest configured level every time; toggle
    /// lights pulse only when the target level differs from the current one.
    /// Switch lights ignore brightness.
    pub async fn set_brightness(&self, brightness: Percent) {
        match &self.kind {
            LightKind::Toggle(toggle) => self.toggle_to(toggle, brightness).await,
            LightKind::Basic { levels, .. } => {
                self.state.lock().current_value = brightness;
                let level = levels.resolve(brightness);

                tracing::info!(
                    accessory = %self.info.name,
                    requested = brightness.value(),
                    mapped = level.value(),
                    "Requested brightness mapped to configured level"
                );

                dispatch_logged(&*self.dispatcher, &self.info.name, level.action()).await;
            }
            LightKind::Switch(_) => {
                tracing::warn!(
                    accessory = %self.info.name,
                    "Switch lights do not support brightness"
                );
            }
        }
    }

    async fn toggle_to(&self, toggle: &ToggleSpec, brightness: Percent) {
        let outcome = self
            .actuator
            .run(|| async {
                let (from, plan) = {
                    let mut state = self.state.lock();
                    let from = state.current_value;
                    let plan = toggle.plan(state.current_toggle_index, brightness);
                    state.current_toggle_index = plan.to_index;
                    state.current_value = plan.to_value;
                    state.power = plan.to_value != Percent::MIN;
                    (from, plan)
                };

                tracing::info!(
                    accessory = %self.info.name,
                    from = from.value(),
                    from_index = plan.from_index,
                    to = plan.to_value.value(),
                    to_index = plan.to_index,
                    steps = plan.steps,
                    "Planned toggle sequence"
                );

                emit_pulses(
                    &*self.dispatcher,
                    &self.info.name,
                    toggle.pulse_action(),
                    plan.steps,
                    toggle.settle_delay(),
                )
                .await
            })
            .await;

        match outcome {
            Some(report) if report.failed > 0 => {
                tracing::warn!(
                    accessory = %self.info.name,
                    failed = report.failed,
                    dispatched = report.dispatched,
                    "Toggle sequence finished with failed pulses"
                );
            }
            Some(_) => {}
            None => {
                tracing::warn!(
                    accessory = %self.info.name,
                    requested = brightness.value(),
                    "Toggle request superseded by a newer one"
                );
            }
        }
    }
}

impl<D: Dispatch> Accessory for LightAccessory<D> {
    fn id(&self) -> AccessoryId {
        self.id
    }

    fn info(&self) -> &AccessoryInfo {
        &self.info
    }

    fn kind(&self) -> AccessoryKind {
        AccessoryKind::Lightbulb
    }

    fn characteristics(&self) -> &'static [Characteristic] {
        match self.kind {
            LightKind::Switch(_) => Self::SWITCH,
            LightKind::Basic { .. } | LightKind::Toggle(_) => Self::DIMMABLE,
        }
    }

    fn read(&self, characteristic: Characteristic) -> Option<CharacteristicValue> {
        if !self.characteristics().contains(&characteristic) {
            return None;
        }
        match characteristic {
            Characteristic::On => Some(CharacteristicValue::Bool(self.power())),
            Characteristic::Brightness => Some(self.brightness().into()),
            Characteristic::RotationSpeed | Characteristic::CurrentFanState => None,
        }
    }

    async fn write(&self, characteristic: Characteristic, value: CharacteristicValue) {
        if !self.characteristics().contains(&characteristic) {
            tracing::warn!(
                accessory = %self.info.name,
                ?characteristic,
                "Ignoring write to unsupported characteristic"
            );
            return;
        }
        match (characteristic, value.as_bool(), value.as_percent()) {
            (Characteristic::On, Some(on), _) => self.set_power(on).await,
            (Characteristic::Brightness, _, Some(brightness)) => {
                self.set_brightness(brightness).await;
            }
            _ => log_mismatched_write(&self.info.name, characteristic, value),
        }
    }
}

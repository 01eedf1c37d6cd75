// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan configuration.

use std::sync::Arc;

use crate::accessory::{AccessoryInfo, FanAccessory, PowerActions};
use crate::error::ConfigError;
use crate::protocol::{Action, Dispatch};
use crate::types::{LevelTable, Percent};

use super::level_table;

/// One configured fan speed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpeedLevel {
    /// Speed percentage this level stands for.
    pub speed: i32,
    /// Action that selects this speed.
    #[serde(flatten)]
    pub action: Action,
}

/// Configuration of a fan accessory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FanConfig {
    /// Identity shown to the controller.
    #[serde(flatten)]
    pub info: AccessoryInfo,
    /// Whether the fan is reported on at startup.
    #[serde(default)]
    pub default_power_on: bool,
    /// Speed reported at startup.
    #[serde(default)]
    pub default_speed: Percent,
    /// Actions dispatched on power changes.
    #[serde(default)]
    pub power: Option<PowerActions>,
    /// Available speeds, in any order.
    pub speeds: Vec<SpeedLevel>,
}

impl FanConfig {
    /// Builds the speed table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if there are no speeds or one lies outside
    /// `1..=100`.
    pub fn level_table(&self) -> Result<LevelTable, ConfigError> {
        level_table(
            &self.info.name,
            "speed",
            self.speeds.iter().map(|level| (level.speed, &level.action)),
        )
    }

    /// Checks that this fan can be built.
    ///
    /// # Errors
    ///
    /// See [`FanConfig::level_table`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.info.name.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                accessory: self.info.name.clone(),
                field: "name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        self.level_table().map(|_| ())
    }

    /// Builds the fan accessory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build<D: Dispatch>(&self, dispatcher: Arc<D>) -> Result<FanAccessory<D>, ConfigError> {
        self.validate()?;

        let mut fan = FanAccessory::new(self.info.clone(), self.level_table()?, dispatcher)
            .with_initial_state(self.default_power_on, self.default_speed);
        if let Some(power) = &self.power {
            fan = fan.with_power_actions(power.clone());
        }
        Ok(fan)
    }
}

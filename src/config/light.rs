// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::accessory::{AccessoryInfo, LightAccessory, LightKind, PowerActions};
use crate::error::ConfigError;
use crate::level::ToggleSpec;
use crate::protocol::{Action, Dispatch};
use crate::types::Percent;

use super::level_table;

/// How a light is wired.
///
/// Unrecognised values deserialize to [`LightType::Unknown`] and are treated
/// as basic lights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightType {
    /// Power actions plus brightness levels.
    #[default]
    #[serde(alias = "BASIC")]
    Basic,
    /// A single pulse action cycling through brightness levels.
    #[serde(alias = "TOGGLE")]
    Toggle,
    /// On/off only.
    #[serde(alias = "SWITCH")]
    Switch,
    /// Anything else.
    #[serde(other)]
    Unknown,
}

/// One configured brightness level of a basic light.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BrightnessLevel {
    /// Brightness percentage this level stands for.
    pub brightness: i32,
    /// Action that selects this level.
    #[serde(flatten)]
    pub action: Action,
}

/// Settings of a basic light.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BasicLightConfig {
    /// Power on/off actions.
    pub power: PowerActions,
    /// Brightness levels, in any order.
    pub brightness_levels: Vec<BrightnessLevel>,
}

/// Settings of a toggle light.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ToggleConfig {
    /// Whether the generated brightness values increase along the cycle.
    #[serde(default)]
    pub ascending: bool,
    /// Number of stops in the cycle, "off" included.
    pub level_count: usize,
    /// Action emitted once per pulse.
    #[serde(flatten)]
    pub action: Action,
}

/// Configuration of a light accessory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LightConfig {
    /// Identity shown to the controller.
    #[serde(flatten)]
    pub info: AccessoryInfo,
    /// How the light is wired.
    #[serde(rename = "type", default)]
    pub light_type: LightType,
    /// Whether the light is reported on at startup.
    #[serde(default)]
    pub default_power_on: bool,
    /// Brightness reported at startup.
    #[serde(default)]
    pub default_brightness: Percent,
    /// Settings used when `type` is `basic`.
    #[serde(default)]
    pub basic: Option<BasicLightConfig>,
    /// Settings used when `type` is `toggle`.
    #[serde(default)]
    pub toggle: Option<ToggleConfig>,
    /// Settings used when `type` is `switch`.
    #[serde(default)]
    pub switch: Option<PowerActions>,
}

impl LightConfig {
    /// Returns the effective light type, mapping unknown types to basic.
    #[must_use]
    pub fn effective_type(&self) -> LightType {
        match self.light_type {
            LightType::Unknown => LightType::Basic,
            other => other,
        }
    }

    /// Builds the light kind from the section matching its type.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the section is missing or invalid.
    pub fn kind(&self, settle_delay: Duration) -> Result<LightKind, ConfigError> {
        let name = &self.info.name;

        match self.effective_type() {
            LightType::Basic | LightType::Unknown => {
                let basic = self.section(self.basic.as_ref(), "basic")?;
                let levels = level_table(
                    name,
                    "brightness",
                    basic
                        .brightness_levels
                        .iter()
                        .map(|level| (level.brightness, &level.action)),
                )?;
                Ok(LightKind::Basic {
                    power: basic.power.clone(),
                    levels,
                })
            }
            LightType::Toggle => {
                let toggle = self.section(self.toggle.as_ref(), "toggle")?;
                if !(1..=100).contains(&toggle.level_count) {
                    return Err(ConfigError::InvalidField {
                        accessory: name.clone(),
                        field: "level_count".to_string(),
                        message: format!("{} is outside 1..=100", toggle.level_count),
                    });
                }
                let spec = ToggleSpec::new(
                    toggle.level_count,
                    toggle.ascending,
                    toggle.action.clone(),
                    settle_delay,
                )
                .map_err(|e| ConfigError::InvalidField {
                    accessory: name.clone(),
                    field: "level_count".to_string(),
                    message: e.to_string(),
                })?;
                Ok(LightKind::Toggle(spec))
            }
            LightType::Switch => {
                let switch = self.section(self.switch.as_ref(), "switch")?;
                Ok(LightKind::Switch(switch.clone()))
            }
        }
    }

    /// Checks that this light can be built.
    ///
    /// # Errors
    ///
    /// See [`LightConfig::kind`].
    pub fn validate(&self, settle_delay: Duration) -> Result<(), ConfigError> {
        if self.info.name.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                accessory: self.info.name.clone(),
                field: "name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        self.kind(settle_delay).map(|_| ())
    }

    /// Builds the light accessory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build<D: Dispatch>(
        &self,
        settle_delay: Duration,
        dispatcher: Arc<D>,
    ) -> Result<LightAccessory<D>, ConfigError> {
        self.validate(settle_delay)?;

        if self.light_type == LightType::Unknown {
            tracing::warn!(
                accessory = %self.info.name,
                "Light has an unknown type, assuming basic"
            );
        }

        let kind = self.kind(settle_delay)?;
        Ok(LightAccessory::new(self.info.clone(), kind, dispatcher)
            .with_initial_state(self.default_power_on, self.default_brightness))
    }

    fn section<'a, T>(&self, section: Option<&'a T>, name: &str) -> Result<&'a T, ConfigError> {
        section.ok_or_else(|| ConfigError::MissingSection {
            accessory: self.info.name.clone(),
            section: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::testing::RecordingDispatcher;

    const SETTLE: Duration = Duration::from_millis(250);

    fn parse(json: &str) -> LightConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_toggle_light() {
        let light = parse(
            r#"{
                "name": "Lamp", "type": "toggle", "default_brightness": 60,
                "toggle": { "ascending": false, "level_count": 4, "topic": "lamp/toggle", "payload": "1" }
            }"#,
        );
        let kind = light.kind(SETTLE).unwrap();
        let LightKind::Toggle(spec) = kind else {
            panic!("expected toggle, got {kind:?}");
        };
        assert_eq!(spec.level_count(), 4);
        assert!(!spec.ascending());
        assert_eq!(spec.pulse_action(), &Action::mqtt("lamp/toggle", "1"));
        assert_eq!(spec.settle_delay(), SETTLE);
    }

    #[test]
    fn toggle_initial_state_snaps() {
        let light = parse(
            r#"{
                "name": "Lamp", "type": "toggle", "default_power_on": true, "default_brightness": 60,
                "toggle": { "level_count": 4, "url": "http://lamp/toggle" }
            }"#,
        )
        .build(SETTLE, Arc::new(RecordingDispatcher::default()))
        .unwrap();

        assert!(light.power());
        assert_eq!(light.brightness().value(), 50);
    }

    #[test]
    fn parses_basic_light() {
        let light = parse(
            r#"{
                "name": "Lamp", "type": "basic",
                "basic": {
                    "power": { "on": { "url": "http://lamp/on" }, "off": { "url": "http://lamp/off" } },
                    "brightness_levels": [
                        { "brightness": 100, "url": "http://lamp/100" },
                        { "brightness": 20, "url": "http://lamp/20" }
                    ]
                }
            }"#,
        );
        let LightKind::Basic { power, levels } = light.kind(SETTLE).unwrap() else {
            panic!("expected basic");
        };
        assert_eq!(power.on, Action::http("http://lamp/on"));
        assert_eq!(levels.values().collect::<Vec<_>>(), vec![20, 100]);
    }

    #[test]
    fn parses_switch_light() {
        let light = parse(
            r#"{
                "name": "Porch", "type": "switch",
                "switch": { "on": { "topic": "porch", "payload": "1" }, "off": { "topic": "porch", "payload": "0" } }
            }"#,
        );
        assert!(matches!(light.kind(SETTLE), Ok(LightKind::Switch(_))));
    }

    #[test]
    fn uppercase_type_accepted() {
        let light = parse(r#"{ "name": "Porch", "type": "SWITCH" }"#);
        assert_eq!(light.light_type, LightType::Switch);
    }

    #[test]
    fn unknown_type_falls_back_to_basic() {
        let light = parse(
            r#"{
                "name": "Lamp", "type": "dimmer",
                "basic": {
                    "power": { "on": { "url": "http://lamp/on" }, "off": { "url": "http://lamp/off" } },
                    "brightness_levels": [{ "brightness": 50, "url": "http://lamp/50" }]
                }
            }"#,
        );
        assert_eq!(light.light_type, LightType::Unknown);
        assert_eq!(light.effective_type(), LightType::Basic);
        assert!(matches!(light.kind(SETTLE), Ok(LightKind::Basic { .. })));
    }

    #[test]
    fn missing_type_defaults_to_basic() {
        let light = parse(r#"{ "name": "Lamp" }"#);
        assert_eq!(light.light_type, LightType::Basic);
        assert!(matches!(
            light.validate(SETTLE),
            Err(ConfigError::MissingSection { .. })
        ));
    }

    #[test]
    fn missing_toggle_section_rejected() {
        let light = parse(r#"{ "name": "Lamp", "type": "toggle" }"#);
        let err = light.validate(SETTLE).unwrap_err();
        assert_eq!(
            err.to_string(),
            "accessory 'Lamp' is missing its 'toggle' section"
        );
    }

    #[test]
    fn toggle_level_count_bounds() {
        for count in [0, 101] {
            let light = parse(&format!(
                r#"{{ "name": "Lamp", "type": "toggle",
                      "toggle": {{ "level_count": {count}, "url": "http://lamp/t" }} }}"#
            ));
            assert!(matches!(
                light.validate(SETTLE),
                Err(ConfigError::InvalidField { .. })
            ));
        }
    }

    #[test]
    fn basic_zero_brightness_rejected() {
        let light = parse(
            r#"{
                "name": "Lamp",
                "basic": {
                    "power": { "on": { "url": "http://lamp/on" }, "off": { "url": "http://lamp/off" } },
                    "brightness_levels": [{ "brightness": 0, "url": "http://lamp/0" }]
                }
            }"#,
        );
        assert!(matches!(
            light.validate(SETTLE),
            Err(ConfigError::InvalidField { .. })
        ));
    }
}

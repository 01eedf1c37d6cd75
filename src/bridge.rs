// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The set of accessories served to the controller.
//!
//! A [`Bridge`] is built once from a validated [`Config`]. The first
//! configured accessory (fans before lights) is the primary accessory; all
//! others are bridged behind it.

use std::sync::Arc;

use crate::accessory::{
    Accessory, AccessoryInfo, AccessoryKind, Characteristic, CharacteristicValue, FanAccessory,
    LightAccessory,
};
use crate::config::{Config, ServerSettings};
use crate::error::ConfigError;
use crate::protocol::{ActionDispatcher, Dispatch};
use crate::types::AccessoryId;

/// Any accessory the bridge can serve.
#[derive(Debug)]
pub enum BridgedAccessory<D> {
    /// A fan.
    Fan(FanAccessory<D>),
    /// A light.
    Light(LightAccessory<D>),
}

impl<D: Dispatch> Accessory for BridgedAccessory<D> {
    fn id(&self) -> AccessoryId {
        match self {
            Self::Fan(fan) => fan.id(),
            Self::Light(light) => light.id(),
        }
    }

    fn info(&self) -> &AccessoryInfo {
        match self {
            Self::Fan(fan) => fan.info(),
            Self::Light(light) => light.info(),
        }
    }

    fn kind(&self) -> AccessoryKind {
        match self {
            Self::Fan(fan) => fan.kind(),
            Self::Light(light) => light.kind(),
        }
    }

    fn characteristics(&self) -> &'static [Characteristic] {
        match self {
            Self::Fan(fan) => fan.characteristics(),
            Self::Light(light) => light.characteristics(),
        }
    }

    fn read(&self, characteristic: Characteristic) -> Option<CharacteristicValue> {
        match self {
            Self::Fan(fan) => fan.read(characteristic),
            Self::Light(light) => light.read(characteristic),
        }
    }

    async fn write(&self, characteristic: Characteristic, value: CharacteristicValue) {
        match self {
            Self::Fan(fan) => fan.write(characteristic, value).await,
            Self::Light(light) => light.write(characteristic, value).await,
        }
    }
}

/// Accessories built from one configuration, sharing one dispatcher.
#[derive(Debug)]
pub struct Bridge<D> {
    accessories: Vec<BridgedAccessory<D>>,
    server: ServerSettings,
}

impl<D: Dispatch> Bridge<D> {
    /// Builds every configured accessory on top of `dispatcher`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an accessory cannot be built.
    pub fn from_config(config: &Config, dispatcher: Arc<D>) -> Result<Self, ConfigError> {
        config.validate()?;

        let settle_delay = config.settle_delay();
        let mut accessories = Vec::with_capacity(config.fans.len() + config.lights.len());

        for fan in &config.fans {
            accessories.push(BridgedAccessory::Fan(fan.build(Arc::clone(&dispatcher))?));
        }
        for light in &config.lights {
            accessories.push(BridgedAccessory::Light(
                light.build(settle_delay, Arc::clone(&dispatcher))?,
            ));
        }

        for accessory in &accessories {
            tracing::info!(
                accessory = %accessory.info().name,
                id = %accessory.id(),
                kind = accessory.kind().category(),
                "Registered accessory"
            );
        }

        Ok(Self {
            accessories,
            server: config.server(),
        })
    }

    /// Returns the primary accessory.
    #[must_use]
    pub fn primary(&self) -> Option<&BridgedAccessory<D>> {
        self.accessories.first()
    }

    /// Returns the accessories bridged behind the primary one.
    #[must_use]
    pub fn bridged(&self) -> &[BridgedAccessory<D>] {
        self.accessories.get(1..).unwrap_or_default()
    }

    /// Returns every accessory, primary first.
    #[must_use]
    pub fn accessories(&self) -> &[BridgedAccessory<D>] {
        &self.accessories
    }

    /// Finds an accessory by id.
    #[must_use]
    pub fn get(&self, id: AccessoryId) -> Option<&BridgedAccessory<D>> {
        self.accessories.iter().find(|accessory| accessory.id() == id)
    }

    /// Returns the accessory server settings.
    #[must_use]
    pub fn server(&self) -> &ServerSettings {
        &self.server
    }
}

impl Bridge<ActionDispatcher> {
    /// Builds the bridge with the transports the configuration asks for.
    ///
    /// HTTP is always available. MQTT is connected only when `broker_uri` is
    /// set. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or a transport cannot
    /// be created.
    pub fn connect(config: &Config) -> crate::Result<Self> {
        #[allow(unused_mut)]
        let mut dispatcher = ActionDispatcher::new();

        #[cfg(feature = "http")]
        {
            dispatcher = dispatcher.with_http(crate::protocol::HttpDispatcher::new()?);
        }

        if let Some(uri) = &config.broker_uri {
            #[cfg(feature = "mqtt")]
            {
                dispatcher = dispatcher
                    .with_mqtt(crate::protocol::MqttDispatcher::connect(uri, &config.client_id)?);
            }
            #[cfg(not(feature = "mqtt"))]
            tracing::warn!(broker = %uri, "MQTT support is disabled, broker ignored");
        }

        Ok(Self::from_config(config, Arc::new(dispatcher))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::testing::RecordingDispatcher;
    use crate::protocol::Action;

    const CONFIG: &str = r#"{
        "pin": "11122333",
        "settle_delay_ms": 5,
        "lights": [{
            "name": "Lamp", "type": "toggle",
            "toggle": { "level_count": 4, "topic": "lamp/toggle", "payload": "1" }
        }],
        "fans": [{
            "name": "Fan",
            "speeds": [
                { "speed": 10, "topic": "fan/speed", "payload": "A" },
                { "speed": 50, "topic": "fan/speed", "payload": "B" },
                { "speed": 90, "topic": "fan/speed", "payload": "C" }
            ]
        }]
    }"#;

    fn bridge() -> (Bridge<RecordingDispatcher>, Arc<RecordingDispatcher>) {
        let config = Config::from_json(CONFIG).unwrap();
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let bridge = Bridge::from_config(&config, Arc::clone(&dispatcher)).unwrap();
        (bridge, dispatcher)
    }

    #[test]
    fn fans_come_first() {
        let (bridge, _) = bridge();

        assert_eq!(bridge.accessories().len(), 2);
        let primary = bridge.primary().unwrap();
        assert_eq!(primary.info().name, "Fan");
        assert_eq!(primary.kind(), AccessoryKind::Fan);
        assert_eq!(bridge.bridged().len(), 1);
        assert_eq!(bridge.bridged()[0].kind(), AccessoryKind::Lightbulb);
        assert_eq!(bridge.server().pin, "11122333");
    }

    #[test]
    fn lookup_by_id() {
        let (bridge, _) = bridge();
        let light_id = bridge.bridged()[0].id();

        assert_eq!(bridge.get(light_id).unwrap().info().name, "Lamp");
        assert!(bridge.get(AccessoryId::derive("fan", "Missing", "")).is_none());
    }

    #[test]
    fn ids_survive_a_rebuild() {
        let (first, _) = bridge();
        let (second, _) = bridge();

        let ids = |bridge: &Bridge<RecordingDispatcher>| {
            bridge.accessories().iter().map(Accessory::id).collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test]
    async fn writes_reach_the_accessory() {
        let (bridge, dispatcher) = bridge();
        let fan = bridge.primary().unwrap();

        fan.write(Characteristic::RotationSpeed, CharacteristicValue::Number(40.0))
            .await;

        assert_eq!(dispatcher.actions(), vec![Action::mqtt("fan/speed", "B")]);
        assert_eq!(
            fan.read(Characteristic::RotationSpeed),
            Some(CharacteristicValue::Number(40.0))
        );
    }

    #[test]
    fn invalid_config_rejected() {
        let config = Config {
            fans: Vec::new(),
            lights: Vec::new(),
            ..Config::from_json(CONFIG).unwrap()
        };
        let result = Bridge::from_config(&config, Arc::new(RecordingDispatcher::default()));
        assert!(matches!(result, Err(ConfigError::NoAccessories)));
    }

    #[tokio::test]
    async fn connect_without_broker_uses_http_only() {
        let config = Config::from_json(CONFIG).unwrap();
        let bridge = Bridge::connect(&config).unwrap();
        assert_eq!(bridge.accessories().len(), 2);
    }
}

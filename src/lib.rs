// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `hcfan` Lib - bridge smart-home fans and lights to HTTP and MQTT devices.
//!
//! The controller sees virtual accessories with continuous 0-100 speed and
//! brightness values. The physical devices only understand a handful of
//! discrete actions: an HTTP GET or an MQTT publish per level, or a single
//! "toggle" pulse that cycles a lamp through its brightness stops. This
//! library maps one onto the other.
//!
//! # Supported Accessories
//!
//! - **Fans**: power actions plus one action per configured speed
//! - **Basic lights**: power actions plus one action per brightness level
//! - **Toggle lights**: one pulse action cycling through evenly spaced stops
//! - **Switch lights**: power actions only
//!
//! # Level Mapping
//!
//! Requested values are mapped onto the nearest configured level, ties going
//! to the higher level. Toggle lights compute how many pulses move the lamp
//! from its current stop to the requested one, and send them one at a time
//! with a settle delay after each.
//!
//! # Quick Start
//!
//! ```no_run
//! use hcfan_lib::{Accessory, Bridge, Characteristic, CharacteristicValue, Config};
//!
//! #[tokio::main]
//! async fn main() -> hcfan_lib::Result<()> {
//!     let config = Config::load("config.json")?;
//!     let bridge = Bridge::connect(&config)?;
//!
//!     if let Some(primary) = bridge.primary() {
//!         primary
//!             .write(Characteristic::On, CharacteristicValue::Bool(true))
//!             .await;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `http` (default): HTTP GET actions via `reqwest`
//! - `mqtt` (default): MQTT publish actions via `rumqttc`

pub mod accessory;
mod bridge;
pub mod config;
pub mod error;
pub mod level;
pub mod protocol;
pub mod types;

pub use accessory::{
    Accessory, AccessoryInfo, AccessoryKind, AccessoryRuntimeState, Characteristic,
    CharacteristicValue, CurrentFanState, FanAccessory, LightAccessory, LightKind, PowerActions,
};
pub use bridge::{Bridge, BridgedAccessory};
pub use config::{Config, ServerSettings};
pub use error::{ConfigError, DispatchError, Error, Result, ValueError};
pub use level::{TogglePlan, ToggleSpec};
pub use protocol::{Action, ActionDispatcher, Dispatch, DispatchResponse};
#[cfg(feature = "http")]
pub use protocol::HttpDispatcher;
#[cfg(feature = "mqtt")]
pub use protocol::MqttDispatcher;
pub use types::{AccessoryId, Level, LevelTable, Percent};

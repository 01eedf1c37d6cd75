// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `hcfan` library.
//!
//! Three families of failure exist:
//!
//! - [`ConfigError`]: the configuration cannot describe a working accessory.
//!   These are fatal at startup; the accessory must not be served.
//! - [`DispatchError`]: an action (HTTP GET or MQTT publish) failed. These are
//!   logged by the accessories and never reach the controller.
//! - [`ValueError`]: a strict constructor received an out-of-range value.
//!   Values requested by the controller go through clamping constructors
//!   instead and are never rejected.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An action could not be dispatched.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A level table was built without any levels.
    #[error("level table is empty")]
    EmptyLevelTable,
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid JSON or does not match the schema.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A level table has no entries.
    #[error("accessory '{accessory}' has no levels configured")]
    EmptyLevelTable {
        /// Name of the offending accessory.
        accessory: String,
    },

    /// A field holds a value the accessory cannot work with.
    #[error("accessory '{accessory}': invalid {field}: {message}")]
    InvalidField {
        /// Name of the offending accessory.
        accessory: String,
        /// The field that failed validation.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// A section required by the accessory type is missing.
    #[error("accessory '{accessory}' is missing its '{section}' section")]
    MissingSection {
        /// Name of the offending accessory.
        accessory: String,
        /// The missing section.
        section: String,
    },

    /// Two accessories of the same kind share a name and serial number.
    #[error("accessory '{accessory}' is configured more than once with the same serial")]
    DuplicateAccessory {
        /// Name of the duplicated accessory.
        accessory: String,
    },

    /// The MQTT broker URI cannot be used.
    #[error("invalid broker URI: {0}")]
    InvalidBrokerUri(String),

    /// No accessories are configured at all.
    #[error("no accessories configured")]
    NoAccessories,
}

/// Errors related to dispatching actions over HTTP or MQTT.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The HTTP endpoint answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The status code returned.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// MQTT publish failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// No transport is configured for this kind of action.
    #[error("no {0} transport configured")]
    TransportUnavailable(&'static str),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

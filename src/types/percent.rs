// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Percentage type for fan speed and brightness requests.
//!
//! Controllers express both rotation speed and brightness as a percentage.
//! Requests are never rejected: anything outside 0-100 is clamped to the
//! nearest bound before it reaches the level resolver.

use std::fmt;

use crate::error::ValueError;

/// A speed or brightness percentage (0-100).
///
/// # Examples
///
/// ```
/// use hcfan_lib::types::Percent;
///
/// let half = Percent::new(50).unwrap();
/// assert_eq!(half.value(), 50);
///
/// // Controller requests arrive as floats and are clamped
/// assert_eq!(Percent::from_request(140.0).value(), 100);
/// assert_eq!(Percent::from_request(-3.0).value(), 0);
///
/// assert!(Percent::new(101).is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Percent(u8);

impl Percent {
    /// 0%.
    pub const MIN: Self = Self(0);

    /// 100%.
    pub const MAX: Self = Self(100);

    /// Creates a new percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a percentage, clamping to the valid range.
    #[must_use]
    // Safe: clamped to 0..=100 first
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// Creates a percentage from a controller request.
    ///
    /// The fractional part is dropped and the result clamped to 0-100.
    /// `NaN` maps to 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_request(value: f64) -> Self {
        // `as` saturates and maps NaN to 0
        Self::clamped(value.trunc() as i64)
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the percentage as a signed level value.
    #[must_use]
    pub fn as_level_value(&self) -> i32 {
        i32::from(self.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<i64> for Percent {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= 100)
            .map(Self)
            .ok_or(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: value,
            })
    }
}

impl From<Percent> for i64 {
    fn from(value: Percent) -> Self {
        i64::from(value.0)
    }
}

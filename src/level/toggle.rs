// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Toggle actuators: devices driven by a single repeated pulse.
//!
//! A toggle light has one button. Each press moves it one stop further
//! around a fixed cycle of brightness levels, with "off" somewhere in the
//! cycle. Reaching a brightness means pressing the button the right number
//! of times, never backwards.
//!
//! The cycle is described by [`toggle_levels`]: `level_count` stops spaced
//! `100 / level_count` apart, listed in the order the pulses traverse them.

use std::time::Duration;

use crate::error::ValueError;
use crate::protocol::Action;
use crate::types::Percent;

/// Generates the cyclic brightness sequence of a toggle actuator.
///
/// Entry `i` of the ascending sequence is `i * (100 / level_count)`; the
/// descending sequence is the same values reversed. A pulse advances one
/// position in the returned order and wraps from the last entry to the
/// first.
///
/// # Examples
///
/// ```
/// use hcfan_lib::level::toggle_levels;
///
/// assert_eq!(toggle_levels(4, true), vec![0, 25, 50, 75]);
/// assert_eq!(toggle_levels(4, false), vec![75, 50, 25, 0]);
/// ```
#[must_use]
pub fn toggle_levels(level_count: usize, ascending: bool) -> Vec<i32> {
    if level_count == 0 {
        return Vec::new();
    }
    let step = i32::try_from(100 / level_count).unwrap_or_default();

    let mut levels: Vec<i32> = (0..level_count)
        .map(|index| {
            i32::try_from(index)
                .unwrap_or(i32::MAX)
                .saturating_mul(step)
        })
        .collect();
    if !ascending {
        levels.reverse();
    }
    levels
}

/// Returns the index of the sequence entry closest to `target`.
///
/// This is a plain linear scan over the generated sequence, not a search in
/// value order: the first entry with the minimum distance wins. Returns
/// `None` for an empty sequence.
#[must_use]
pub fn closest_toggle_index(levels: &[i32], target: i32) -> Option<usize> {
    let target = i64::from(target);
    let mut best: Option<(usize, i64)> = None;

    for (index, value) in levels.iter().enumerate() {
        let distance = (i64::from(*value) - target).abs();
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }

    best.map(|(index, _)| index)
}

/// Number of forward pulses to move from `current` to `target`.
///
/// The distance is `(target - current) mod level_count`: zero when both
/// indices match, otherwise strictly between 0 and `level_count`. Direction
/// is already encoded by the order of the generated sequence.
///
/// # Examples
///
/// ```
/// use hcfan_lib::level::plan_steps;
///
/// assert_eq!(plan_steps(0, 2, 4), 2);
/// assert_eq!(plan_steps(3, 1, 4), 2);
/// assert_eq!(plan_steps(1, 1, 4), 0);
/// ```
#[must_use]
pub fn plan_steps(current: usize, target: usize, level_count: usize) -> usize {
    if level_count == 0 {
        return 0;
    }
    let current = current % level_count;
    let target = target % level_count;
    (target + level_count - current) % level_count
}

/// Static description of a toggle actuator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleSpec<A = Action> {
    level_count: usize,
    ascending: bool,
    pulse_action: A,
    settle_delay: Duration,
}

impl<A> ToggleSpec<A> {
    /// Pause between pulses when none is configured.
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

    /// Creates a toggle description.
    ///
    /// `level_count` includes the "off" stop.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `level_count` is zero.
    pub fn new(
        level_count: usize,
        ascending: bool,
        pulse_action: A,
        settle_delay: Duration,
    ) -> Result<Self, ValueError> {
        if level_count == 0 {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: i64::MAX,
                actual: 0,
            });
        }
        Ok(Self {
            level_count,
            ascending,
            pulse_action,
            settle_delay,
        })
    }

    /// Returns the number of stops in the cycle, "off" included.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.level_count
    }

    /// Returns whether the generated values increase along the cycle.
    #[must_use]
    pub fn ascending(&self) -> bool {
        self.ascending
    }

    /// Returns the action emitted once per pulse.
    #[must_use]
    pub fn pulse_action(&self) -> &A {
        &self.pulse_action
    }

    /// Returns the pause enforced after every pulse.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Returns the brightness sequence traversed by pulses.
    #[must_use]
    pub fn levels(&self) -> Vec<i32> {
        toggle_levels(self.level_count, self.ascending)
    }

    /// Returns the sequence index closest to `brightness`.
    #[must_use]
    pub fn closest_index(&self, brightness: Percent) -> usize {
        // Never empty: level_count >= 1
        closest_toggle_index(&self.levels(), brightness.as_level_value()).unwrap_or_default()
    }

    /// Returns the brightest generated level.
    ///
    /// This is the first entry of a descending sequence and the last entry
    /// of an ascending one.
    #[must_use]
    pub fn brightest(&self) -> Percent {
        let levels = self.levels();
        let value = if self.ascending {
            levels.last()
        } else {
            levels.first()
        };
        Percent::clamped(value.copied().map_or(0, i64::from))
    }

    /// Plans the pulses needed to go from `current_index` to the level
    /// closest to `brightness`.
    #[must_use]
    pub fn plan(&self, current_index: usize, brightness: Percent) -> TogglePlan {
        let levels = self.levels();
        let target_index = closest_toggle_index(&levels, brightness.as_level_value())
            .unwrap_or_default();
        let target_value = levels
            .get(target_index)
            .copied()
            .map_or(Percent::MIN, |v| Percent::clamped(i64::from(v)));

        TogglePlan {
            from_index: current_index,
            to_index: target_index,
            to_value: target_value,
            steps: plan_steps(current_index, target_index, self.level_count),
        }
    }
}

/// Outcome of planning a toggle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TogglePlan {
    /// Sequence index the actuator starts from.
    pub from_index: usize,
    /// Sequence index the actuator ends on.
    pub to_index: usize,
    /// Brightness of the final stop.
    pub to_value: Percent,
    /// Number of pulses to emit.
    pub steps: usize,
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nearest-level resolution over an ascending level table.

use crate::error::ValueError;

/// Returns the index of the value closest to `target`.
///
/// `values` must be sorted ascending. The scan stops at the first value
/// `>= target`; an exact match is therefore always the candidate itself.
/// When `target` sits between two values the closer one wins, and an equal
/// distance resolves to the upper neighbour. Targets outside the table clamp
/// to the first or last index.
///
/// # Errors
///
/// Returns `ValueError::EmptyLevelTable` if `values` yields nothing.
///
/// # Examples
///
/// ```
/// use hcfan_lib::level::nearest_index;
///
/// assert_eq!(nearest_index([10, 50, 90], 40), Ok(1));
/// assert_eq!(nearest_index([10, 50, 90], 30), Ok(1)); // tie goes up
/// assert_eq!(nearest_index([10, 50, 90], 100), Ok(2));
/// ```
pub fn nearest_index<I>(values: I, target: i32) -> Result<usize, ValueError>
where
    I: IntoIterator<Item = i32>,
{
    let target = i64::from(target);
    let mut lower: Option<i64> = None;
    let mut last = None;

    for (index, value) in values.into_iter().enumerate() {
        let value = i64::from(value);
        if value >= target {
            return Ok(match lower {
                Some(lower) if value - target > target - lower => index - 1,
                _ => index,
            });
        }
        lower = Some(value);
        last = Some(index);
    }

    last.ok_or(ValueError::EmptyLevelTable)
}

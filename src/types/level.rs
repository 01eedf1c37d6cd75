// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Discrete actuator levels.
//!
//! A [`LevelTable`] is the ordered set of positions a continuous actuator
//! (a fan with a few speeds, a light with a few brightness presets) can be
//! driven to. Each [`Level`] pairs the value it represents with the action
//! that puts the device there.

use crate::error::ValueError;
use crate::level::nearest_index;
use crate::protocol::Action;

use super::Percent;

/// A single actuator position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level<A = Action> {
    value: i32,
    action: A,
}

impl<A> Level<A> {
    /// Creates a new level.
    #[must_use]
    pub fn new(value: i32, action: A) -> Self {
        Self { value, action }
    }

    /// Returns the value this level represents.
    #[must_use]
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Returns the action that drives the device to this level.
    #[must_use]
    pub fn action(&self) -> &A {
        &self.action
    }
}

/// Levels sorted ascending by value.
///
/// The sort is stable, so levels sharing a value keep their configuration
/// order. Tables are never empty and never change after construction.
///
/// # Examples
///
/// ```
/// use hcfan_lib::types::{Level, LevelTable, Percent};
///
/// let table = LevelTable::new(vec![
///     Level::new(90, "high"),
///     Level::new(10, "low"),
///     Level::new(50, "medium"),
/// ])
/// .unwrap();
///
/// let level = table.resolve(Percent::new(40).unwrap());
/// assert_eq!(level.value(), 50);
/// assert_eq!(*level.action(), "medium");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable<A = Action> {
    levels: Vec<Level<A>>,
}

impl<A> LevelTable<A> {
    /// Builds a table from levels in any order.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::EmptyLevelTable` if `levels` is empty.
    pub fn new(mut levels: Vec<Level<A>>) -> Result<Self, ValueError> {
        if levels.is_empty() {
            return Err(ValueError::EmptyLevelTable);
        }
        levels.sort_by_key(Level::value);
        Ok(Self { levels })
    }

    /// Returns the number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the level at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Level<A>> {
        self.levels.get(index)
    }

    /// Iterates over the levels in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = &Level<A>> {
        self.levels.iter()
    }

    /// Iterates over the level values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = i32> + '_ {
        self.levels.iter().map(Level::value)
    }

    /// Returns the index of the level closest to `target`.
    ///
    /// See [`nearest_index`] for the tie-break rules.
    #[must_use]
    pub fn nearest_index(&self, target: Percent) -> usize {
        // Non-empty by construction
        nearest_index(self.values(), target.as_level_value()).unwrap_or_default()
    }

    /// Returns the level closest to `target`.
    #[must_use]
    pub fn resolve(&self, target: Percent) -> &Level<A> {
        &self.levels[self.nearest_index(target)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sorts_ascending() {
        let table = LevelTable::new(vec![
            Level::new(90, 'c'),
            Level::new(10, 'a'),
            Level::new(50, 'b'),
        ])
        .unwrap();
        assert_eq!(table.values().collect::<Vec<_>>(), vec![10, 50, 90]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn table_sort_is_stable_for_duplicates() {
        let table = LevelTable::new(vec![
            Level::new(50, "first"),
            Level::new(10, "low"),
            Level::new(50, "second"),
        ])
        .unwrap();
        let actions: Vec<_> = table.iter().map(|l| *l.action()).collect();
        assert_eq!(actions, vec!["low", "first", "second"]);
    }

    #[test]
    fn empty_table_rejected() {
        let result = LevelTable::<()>::new(Vec::new());
        assert_eq!(result.unwrap_err(), ValueError::EmptyLevelTable);
    }

    #[test]
    fn resolve_clamps_to_bounds() {
        let table = LevelTable::new(vec![Level::new(20, "low"), Level::new(80, "high")]).unwrap();
        assert_eq!(*table.resolve(Percent::MIN).action(), "low");
        assert_eq!(*table.resolve(Percent::MAX).action(), "high");
    }

    #[test]
    fn resolve_duplicate_values_picks_first_configured() {
        let table = LevelTable::new(vec![
            Level::new(50, "first"),
            Level::new(50, "second"),
        ])
        .unwrap();
        assert_eq!(*table.resolve(Percent::new(50).unwrap()).action(), "first");
    }
}

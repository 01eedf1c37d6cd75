// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Paced pulse emission for toggle actuators.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use crate::protocol::{Action, Dispatch};

use super::dispatch_logged;

/// Outcome of a pulse sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseReport {
    /// Pulses sent, successful or not.
    pub dispatched: usize,
    /// Pulses whose dispatch failed.
    pub failed: usize,
}

/// Dispatches `action` `steps` times, sleeping `settle_delay` after each.
///
/// The sleep also follows the last pulse. A failed pulse is logged and the
/// sequence carries on.
pub async fn emit_pulses<D: Dispatch>(
    dispatcher: &D,
    accessory: &str,
    action: &Action,
    steps: usize,
    settle_delay: Duration,
) -> PulseReport {
    let mut report = PulseReport::default();

    for pulse in 1..=steps {
        tracing::trace!(accessory = %accessory, pulse, steps, "Sending toggle pulse");
        if !dispatch_logged(dispatcher, accessory, action).await {
            report.failed += 1;
        }
        report.dispatched += 1;
        tokio::time::sleep(settle_delay).await;
    }

    report
}

/// Serializes toggle sequences of one accessory.
///
/// At most one sequence runs at a time. A request that is still waiting
/// when a newer one arrives is dropped: only the latest waiting request runs
/// once the current sequence completes.
#[derive(Debug, Default)]
pub struct ToggleActuator {
    latest: AtomicU64,
    running: Mutex<()>,
}

impl ToggleActuator {
    /// Creates an idle actuator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `job` after every earlier sequence has finished.
    ///
    /// Returns `None` without calling `job` if a newer request arrived while
    /// this one was waiting.
    pub async fn run<F, Fut, T>(&self, job: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let _guard = self.running.lock().await;

        if self.latest.load(Ordering::Acquire) != ticket {
            return None;
        }
        Some(job().await)
    }
}

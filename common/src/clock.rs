// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::Utc;

/// A trait for reading the current wall-clock time.
///
/// Implementations return the time as milliseconds since the Unix epoch,
/// the unit every position sample uses for its timestamps.
///
/// Unlike a monotonic time source the returned value may jump when the
/// system clock is adjusted. Consumers compare it against timestamps that
/// were taken from the same kind of clock.
pub trait Clock {
    /// Returns the current time in epoch milliseconds.
    fn now_millis(&self) -> i64;
}

/// A [`Clock`] implementation that reads the system's UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        SystemClock
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

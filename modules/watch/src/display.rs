// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use algorithm::Hundredths;
use common::position::PositionError;
use common::record::{DisplayState, NIL};

/// Owns the live display fields.
#[derive(Debug, Default)]
pub struct DisplayUpdater {
    state: DisplayState,
}

impl DisplayUpdater {
    pub fn new() -> Self {
        DisplayUpdater::default()
    }

    /// Overwrites all fields with the newest sample.
    pub fn update(&mut self, latitude: Hundredths, longitude: Hundredths, time: String) {
        self.state = DisplayState {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            time,
        };
    }

    /// Shows a source error in the latitude field and clears the others.
    pub fn show_error(&mut self, error: &PositionError) {
        self.state = DisplayState {
            latitude: error.message(),
            longitude: NIL.to_string(),
            time: NIL.to_string(),
        };
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }
}

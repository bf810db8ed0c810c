// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::position::PositionSample;

/// Holds the sample every new reading is compared against.
///
/// The reference is unset until the first sample arrives. From then on it
/// slides: after each processed sample it is replaced by that sample, the
/// tracker never keeps a fixed baseline.
#[derive(Debug, Default)]
pub struct ReferenceTracker {
    reference: Option<PositionSample>,
}

impl ReferenceTracker {
    pub fn new() -> Self {
        ReferenceTracker::default()
    }

    /// Sets the reference to `sample` if no reference exists yet.
    ///
    /// Returns the current reference.
    pub fn initialize_if_absent(&mut self, sample: &PositionSample) -> &PositionSample {
        self.reference.get_or_insert(*sample)
    }

    /// Replaces the reference with `sample` unconditionally.
    pub fn advance(&mut self, sample: &PositionSample) {
        self.reference = Some(*sample);
    }

    pub fn current(&self) -> Option<&PositionSample> {
        self.reference.as_ref()
    }
}

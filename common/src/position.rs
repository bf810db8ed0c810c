// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::error::SampleError;
use serde::{Deserialize, Serialize};

/// The coordinates of a single geolocation reading.
///
/// Latitude and longitude are kept exactly as the source delivered them.
/// A source may hand over values that are not finite (e.g. `NaN`), such
/// values are only rejected at the parse boundary
/// [`PositionSample::finite_coordinates`].
///
/// # Fields
///
/// - `latitude` – The latitude in decimal degrees (positive for north, negative for south).
/// - `longitude` – The longitude in decimal degrees (positive for east, negative for west).
/// - `accuracy` – The optional accuracy radius of the reading in meters.
///
/// # Example
///
/// ```rust
/// use common::position::Coordinates;
///
/// let coords = Coordinates::new(59.9139, 10.7522);
/// assert_eq!(coords.accuracy, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl Coordinates {
    /// Creates new [`Coordinates`] without accuracy information.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
            accuracy: None,
        }
    }

    /// Returns a copy of the coordinates carrying the given accuracy radius.
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }
}

/// Represents one geolocation reading pushed by a position sample source.
///
/// A sample is immutable once received. The `timestamp` is the time the
/// source took the reading, the `capture_time` is the wall-clock time the
/// reading was received. Both are epoch milliseconds.
///
/// The serde representation uses camelCase field names and keeps the field
/// declaration order, it is the representation the deviation report dumps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSample {
    pub coords: Coordinates,
    pub timestamp: i64,
    pub capture_time: i64,
}

impl PositionSample {
    /// Creates a new [`PositionSample`].
    ///
    /// # Arguments
    ///
    /// * `coords` – The coordinates of the reading.
    /// * `timestamp` – Epoch milliseconds of the reading.
    /// * `capture_time` – Epoch milliseconds at which the reading was received.
    ///
    /// # Example
    ///
    /// ```rust
    /// use common::position::{Coordinates, PositionSample};
    ///
    /// let sample = PositionSample::new(Coordinates::new(60.0, 10.0), 1_000, 1_000);
    /// assert_eq!(sample.coords.latitude, 60.0);
    /// ```
    pub fn new(coords: Coordinates, timestamp: i64, capture_time: i64) -> Self {
        PositionSample {
            coords,
            timestamp,
            capture_time,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Returns latitude and longitude if both are finite numbers.
    ///
    /// This is the only place where a sample's coordinates are validated,
    /// every consumer that needs numbers goes through it.
    ///
    /// # Errors
    ///
    /// [`SampleError::NotFinite`] for the first coordinate that is `NaN` or infinite.
    pub fn finite_coordinates(&self) -> Result<(f64, f64), SampleError> {
        Ok((
            finite_coordinate(self.coords.latitude)?,
            finite_coordinate(self.coords.longitude)?,
        ))
    }
}

/// Accepts a coordinate only if it is a finite number.
pub fn finite_coordinate(value: f64) -> Result<f64, SampleError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SampleError::NotFinite(value))
    }
}

/// Parses the textual representation of a coordinate.
///
/// Surrounding whitespace is ignored. Empty text, text that is not a
/// number and numbers that are not finite (`NaN`, `inf`) are rejected.
///
/// # Example
///
/// ```rust
/// use common::position::parse_coordinate;
///
/// assert_eq!(parse_coordinate(" 60.25 "), Ok(60.25));
/// assert!(parse_coordinate("NaN").is_err());
/// assert!(parse_coordinate("").is_err());
/// ```
pub fn parse_coordinate(text: &str) -> Result<f64, SampleError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SampleError::Empty);
    }
    let value = text
        .parse::<f64>()
        .map_err(|_| SampleError::NotANumber(text.to_string()))?;
    finite_coordinate(value)
}

/// Lookup table for the error codes of a position sample source.
const ERROR_PHRASES: [&str; 4] = [
    "unknown error",
    "permission denied (you didn't enable positioning)",
    "position unavailable",
    "timed out",
];

/// An error reported by a position sample source instead of a sample.
///
/// The code follows the geolocation convention:
/// 0 unknown, 1 permission denied, 2 position unavailable, 3 timed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionError {
    pub code: u16,
}

impl PositionError {
    pub fn new(code: u16) -> Self {
        PositionError { code }
    }

    /// Returns the human readable phrase of the error code.
    ///
    /// Codes outside of the lookup table are reported as unknown error.
    pub fn phrase(&self) -> &'static str {
        ERROR_PHRASES
            .get(usize::from(self.code))
            .copied()
            .unwrap_or(ERROR_PHRASES[0])
    }

    /// Returns the message that is shown to the user for this error.
    pub fn message(&self) -> String {
        format!(
            "Error occurred. Error code: {}: {}",
            self.code,
            self.phrase()
        )
    }
}

// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Deviation detection between two position samples.
//!
//! A candidate sample is compared against a reference sample on three
//! dimensions: latitude, longitude and elapsed wall-clock time. Latitude
//! and longitude are rounded to two decimals before they are compared.

use common::error::SampleError;
use common::position::{PositionSample, finite_coordinate};
use std::collections::BTreeSet;
use std::fmt;
use strum_macros::{Display, EnumIter};
use tracing::trace;

/// Latitude tolerance in hundredths of a degree (0.01°).
pub const LATITUDE_TOLERANCE: Hundredths = Hundredths(1);

/// Longitude tolerance in hundredths of a degree (0.04°).
pub const LONGITUDE_TOLERANCE: Hundredths = Hundredths(4);

/// Time tolerance in milliseconds.
pub const TIME_TOLERANCE_MS: i64 = 60_000;

/// Coordinates with a magnitude at or above this value are rejected, their
/// hundredths and the tolerance band around them would not fit an `i64`.
pub const MAX_COORDINATE_MAGNITUDE: f64 = 1e15;

/// A coordinate rounded to two decimal places.
///
/// The value is held as an integer count of hundredths so that the
/// tolerance band can be compared without floating point error. The exact
/// stored value of the `f64` is rounded, ties are rounded away from zero.
///
/// # Example
///
/// ```rust
/// use algorithm::Hundredths;
///
/// assert_eq!(Hundredths::round(60.009999).unwrap().to_string(), "60.01");
/// assert_eq!(Hundredths::round(59.915).unwrap().to_string(), "59.91");
/// assert_eq!(Hundredths::round(-0.125).unwrap().to_string(), "-0.13");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hundredths(pub i64);

impl Hundredths {
    /// Rounds a coordinate in decimal degrees to two decimals.
    ///
    /// # Errors
    ///
    /// [`SampleError::NotFinite`] for `NaN` or infinite values and
    /// [`SampleError::OutOfRange`] for values whose magnitude reaches
    /// [`MAX_COORDINATE_MAGNITUDE`].
    pub fn round(value: f64) -> Result<Self, SampleError> {
        let value = finite_coordinate(value)?;
        if value.abs() >= MAX_COORDINATE_MAGNITUDE {
            return Err(SampleError::OutOfRange(value));
        }

        // An f64 lies exactly between two hundredths only if it is an odd
        // multiple of 1/8. Those have exactly three decimals.
        let eighths = value * 8.0;
        if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
            let text = format!("{:.3}", value);
            let truncated = parse_hundredths(&text[..text.len() - 1], value)?;
            let away_from_zero = if value < 0.0 { -1 } else { 1 };
            return Ok(Hundredths(truncated + away_from_zero));
        }

        // Fixed precision formatting rounds the exact binary value.
        parse_hundredths(&format!("{:.2}", value), value).map(Hundredths)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

fn parse_hundredths(text: &str, value: f64) -> Result<i64, SampleError> {
    text.replace('.', "")
        .parse::<i64>()
        .map_err(|_| SampleError::OutOfRange(value))
}

/// Validates and rounds both coordinates of a sample.
pub fn round_coordinates(sample: &PositionSample) -> Result<(Hundredths, Hundredths), SampleError> {
    let (latitude, longitude) = sample.finite_coordinates()?;
    Ok((Hundredths::round(latitude)?, Hundredths::round(longitude)?))
}

impl fmt::Display for Hundredths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// A dimension on which a candidate sample can deviate from its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Dimension {
    Latitude,
    Longitude,
    Time,
}

/// The set of dimensions that deviated in one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviationFlags(BTreeSet<Dimension>);

impl DeviationFlags {
    pub fn new() -> Self {
        DeviationFlags::default()
    }

    pub fn insert(&mut self, dimension: Dimension) {
        self.0.insert(dimension);
    }

    pub fn contains(&self, dimension: Dimension) -> bool {
        self.0.contains(&dimension)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Dimension> for DeviationFlags {
    fn from_iter<I: IntoIterator<Item = Dimension>>(iter: I) -> Self {
        DeviationFlags(iter.into_iter().collect())
    }
}

/// The per dimension tolerances used by [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerances {
    pub latitude: Hundredths,
    pub longitude: Hundredths,
    pub time_ms: i64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            latitude: LATITUDE_TOLERANCE,
            longitude: LONGITUDE_TOLERANCE,
            time_ms: TIME_TOLERANCE_MS,
        }
    }
}

/// The result of comparing a candidate sample against its reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// The dimensions on which the candidate left the tolerance band.
    pub deviations: DeviationFlags,

    /// Only set when no dimension deviated. Has the form
    /// `"<refLat>===<candLat>\n<refLon>===<candLon>"`.
    pub diagnostic: Option<String>,
}

impl Evaluation {
    pub fn has_deviation(&self) -> bool {
        !self.deviations.is_empty()
    }
}

/// Why [`evaluate`] did not compare the two samples.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationSkip {
    /// The candidate has no usable coordinates, the whole sample is dropped.
    CandidateUnparseable(SampleError),

    /// The reference has no usable coordinates, only the comparison is dropped.
    ReferenceUnparseable(SampleError),
}

/// Returns `true` when `candidate` lies outside of the open band
/// `(reference - tolerance, reference + tolerance)`.
///
/// A difference exactly equal to the tolerance is a deviation.
pub fn deviates(reference: i64, candidate: i64, tolerance: i64) -> bool {
    let is_not_lower = reference.saturating_sub(tolerance) < candidate;
    let is_not_higher = reference.saturating_add(tolerance) > candidate;
    !(is_not_lower && is_not_higher)
}

/// Compares a candidate sample against the reference sample.
///
/// Latitude and longitude of both samples are rounded to two decimals
/// before comparison. The time dimension compares the wall-clock time of
/// the evaluation (`now_millis`) against the candidate's own timestamp, it
/// measures how old the candidate is when it gets processed and not the
/// distance between the two samples.
///
/// # Parameters
/// - `reference`: The sample the candidate is compared against.
/// - `candidate`: The newly received sample.
/// - `now_millis`: The current wall-clock time in epoch milliseconds.
/// - `tolerances`: The per dimension tolerances.
///
/// # Returns
/// The [`Evaluation`] or an [`EvaluationSkip`] naming the sample that has
/// unusable coordinates. The candidate is checked first.
pub fn evaluate(
    reference: &PositionSample,
    candidate: &PositionSample,
    now_millis: i64,
    tolerances: &Tolerances,
) -> Result<Evaluation, EvaluationSkip> {
    let (candidate_lat, candidate_lon) =
        round_coordinates(candidate).map_err(EvaluationSkip::CandidateUnparseable)?;
    let (reference_lat, reference_lon) =
        round_coordinates(reference).map_err(EvaluationSkip::ReferenceUnparseable)?;

    let mut deviations = DeviationFlags::new();
    if deviates(
        reference_lat.value(),
        candidate_lat.value(),
        tolerances.latitude.value(),
    ) {
        deviations.insert(Dimension::Latitude);
    }
    if deviates(
        reference_lon.value(),
        candidate_lon.value(),
        tolerances.longitude.value(),
    ) {
        deviations.insert(Dimension::Longitude);
    }
    if deviates(now_millis, candidate.timestamp, tolerances.time_ms) {
        deviations.insert(Dimension::Time);
    }
    trace!(
        "evaluated {reference_lat}/{reference_lon} against {candidate_lat}/{candidate_lon}, deviations: {:?}",
        deviations
    );

    let diagnostic = deviations.is_empty().then(|| {
        format!(
            "{}==={}\n{}==={}",
            reference_lat, candidate_lat, reference_lon, candidate_lon
        )
    });
    Ok(Evaluation {
        deviations,
        diagnostic,
    })
}

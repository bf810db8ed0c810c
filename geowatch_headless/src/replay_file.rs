// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::position::{Coordinates, PositionError, parse_coordinate};
use gnss::replay_source::ReplayEntry;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// One line of a replay file.
///
/// Columns: `latitude,longitude,age_ms,error_code`. A line with an error
/// code replays a source error, the coordinates are ignored then.
#[derive(Debug, Deserialize)]
struct ReplayRecord {
    #[serde(default)]
    latitude: String,
    #[serde(default)]
    longitude: String,
    #[serde(default)]
    age_ms: Option<i64>,
    #[serde(default)]
    error_code: Option<u16>,
}

/// Coordinates that are not numbers are replayed as `NaN`, like a source
/// that delivers garbage. The watch skips such samples.
fn coordinate_or_nan(text: &str, line: usize) -> f64 {
    parse_coordinate(text).unwrap_or_else(|e| {
        warn!("Line {}: unusable coordinate replayed as NaN. Reason: {}", line, e);
        f64::NAN
    })
}

fn to_entry(record: ReplayRecord, line: usize) -> ReplayEntry {
    if let Some(code) = record.error_code {
        return ReplayEntry::Error(PositionError::new(code));
    }
    ReplayEntry::Sample {
        coords: Coordinates::new(
            coordinate_or_nan(&record.latitude, line),
            coordinate_or_nan(&record.longitude, line),
        ),
        age_ms: record.age_ms.unwrap_or(0),
    }
}

pub fn read_replay_entries<R: std::io::Read>(reader: R) -> Result<Vec<ReplayEntry>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();
    for (index, result) in rdr.deserialize::<ReplayRecord>().enumerate() {
        entries.push(to_entry(result?, index + 2));
    }
    debug!("length of replay entries: {}", entries.len());
    Ok(entries)
}

pub fn read_replay_file(file_path: &Path) -> Result<Vec<ReplayEntry>, csv::Error> {
    let file = std::fs::File::open(file_path)?;
    read_replay_entries(file)
}

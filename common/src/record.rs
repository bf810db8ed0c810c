// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder text for fields that have no value to show.
pub const NIL: &str = "-";

/// The two tables a rendered row can be appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    /// Readings with at least one deviating dimension.
    Deviation,

    /// Readings that stayed within every tolerance.
    NoDeviation,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Deviation => write!(f, "deviation"),
            TableKind::NoDeviation => write!(f, "no deviation"),
        }
    }
}

/// A single rendered field of a row.
///
/// `error` marks a field whose dimension deviated from the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    pub error: bool,
}

impl Cell {
    pub fn new(text: impl Into<String>, error: bool) -> Self {
        Cell {
            text: text.into(),
            error,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error {
            write!(f, "[!] {}", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

/// One row of a record table: formatted time, latitude and longitude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRow {
    pub table: TableKind,
    pub time: Cell,
    pub latitude: Cell,
    pub longitude: Cell,
}

impl fmt::Display for RenderedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.time, self.latitude, self.longitude)
    }
}

/// The three live display fields.
///
/// Always reflects the newest usable sample, or the last source error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub latitude: String,
    pub longitude: String,
    pub time: String,
}

impl Default for DisplayState {
    fn default() -> Self {
        DisplayState {
            latitude: NIL.to_string(),
            longitude: NIL.to_string(),
            time: NIL.to_string(),
        }
    }
}

// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use algorithm::{DeviationFlags, Dimension, Hundredths};
use common::record::{Cell, RenderedRow, TableKind};
use std::fmt;
use tracing::debug;

/// Text of the placeholder row shown while a table is empty.
pub const NO_RECORDS: &str = "No records yet";

/// Builds the row for a sample.
///
/// The latitude and longitude are shown with two decimals. `extra` is
/// appended to the longitude text separated by `" - "`. Every field whose
/// dimension is in `deviations` is marked as error.
///
/// # Parameters
/// - `table`: The table the row belongs to.
/// - `time`: The already formatted timestamp of the sample.
/// - `latitude`, `longitude`: The sample's rounded coordinates.
/// - `deviations`: The dimensions that deviated.
/// - `extra`: Optional annotation of rows without deviation.
pub fn render_row(
    table: TableKind,
    time: String,
    latitude: Hundredths,
    longitude: Hundredths,
    deviations: &DeviationFlags,
    extra: Option<&str>,
) -> RenderedRow {
    let longitude_text = match extra {
        Some(extra) => format!("{} - {}", longitude, extra),
        None => longitude.to_string(),
    };
    RenderedRow {
        table,
        time: Cell::new(time, deviations.contains(Dimension::Time)),
        latitude: Cell::new(
            latitude.to_string(),
            deviations.contains(Dimension::Latitude),
        ),
        longitude: Cell::new(longitude_text, deviations.contains(Dimension::Longitude)),
    }
}

/// An append-only table of rendered rows.
///
/// A new table shows a placeholder row, it is removed when the first row is
/// appended and never comes back.
#[derive(Debug)]
pub struct RecordTable {
    kind: TableKind,
    rows: Vec<RenderedRow>,
    placeholder: bool,
}

impl RecordTable {
    pub fn new(kind: TableKind) -> Self {
        RecordTable {
            kind,
            rows: Vec::new(),
            placeholder: true,
        }
    }

    /// Appends a row.
    ///
    /// Returns `true` if this call removed the placeholder row, i.e. the row
    /// is the first one of the table.
    pub fn append(&mut self, row: RenderedRow) -> bool {
        let removed_placeholder = self.placeholder;
        if removed_placeholder {
            debug!("Removing placeholder of {} table", self.kind);
            self.placeholder = false;
        }
        self.rows.push(row);
        removed_placeholder
    }

    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    pub fn has_placeholder(&self) -> bool {
        self.placeholder
    }
}

impl fmt::Display for RecordTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} table", self.kind)?;
        if self.placeholder {
            return writeln!(f, "{NO_RECORDS}");
        }
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(table: TableKind, deviations: &DeviationFlags, extra: Option<&str>) -> RenderedRow {
        render_row(
            table,
            "14. nov., 22:13:20".to_string(),
            Hundredths(6002),
            Hundredths(1000),
            deviations,
            extra,
        )
    }

    #[test]
    fn marks_deviating_fields() {
        let deviations: DeviationFlags = [Dimension::Latitude, Dimension::Time].into_iter().collect();
        let row = row(TableKind::Deviation, &deviations, None);
        assert_eq!(row.time, Cell::new("14. nov., 22:13:20", true));
        assert_eq!(row.latitude, Cell::new("60.02", true));
        assert_eq!(row.longitude, Cell::new("10.00", false));
    }

    #[test]
    fn appends_extra_to_longitude() {
        let row = row(
            TableKind::NoDeviation,
            &DeviationFlags::new(),
            Some("60.02===60.02\n10.00===10.00"),
        );
        assert_eq!(row.longitude.text, "10.00 - 60.02===60.02\n10.00===10.00");
        assert!(!row.longitude.error);
    }

    #[test]
    fn placeholder_is_removed_once() {
        let mut table = RecordTable::new(TableKind::Deviation);
        assert!(table.has_placeholder());
        assert_eq!(table.to_string(), "deviation table\nNo records yet\n");

        assert!(table.append(row(TableKind::Deviation, &DeviationFlags::new(), None)));
        assert!(!table.has_placeholder());
        assert!(!table.append(row(TableKind::Deviation, &DeviationFlags::new(), None)));
        assert_eq!(table.rows().len(), 2);
        assert_eq!(
            table.to_string(),
            "deviation table\n14. nov., 22:13:20 | 60.02 | 10.00\n14. nov., 22:13:20 | 60.02 | 10.00\n"
        );
    }
}

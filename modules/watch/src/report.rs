// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::position::PositionSample;
use serde_json::Value;
use tracing::{debug, error};

/// Header that starts every block of the report.
pub const BLOCK_HEADER: &str = "Position:\n";

/// Append-only text log of every sample that deviated from its reference.
///
/// Each block is [`BLOCK_HEADER`] followed by a field by field dump of the
/// sample. The log lives as long as the session and is never truncated.
#[derive(Debug, Default)]
pub struct ReportAccumulator {
    text: String,
    blocks: usize,
}

impl ReportAccumulator {
    pub fn new() -> Self {
        ReportAccumulator::default()
    }

    /// Appends a block for the given deviating sample.
    pub fn record_deviation(&mut self, sample: &PositionSample) {
        let value = match serde_json::to_value(sample) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize sample for the report. Error: {}", e);
                return;
            }
        };
        self.text.push_str(BLOCK_HEADER);
        self.text.push_str(&recursive_dump(&value, 1));
        self.blocks += 1;
        debug!("Recorded deviation block {}", self.blocks);
    }

    /// Returns the accumulated report verbatim, empty if nothing deviated yet.
    pub fn export_text(&self) -> &str {
        &self.text
    }

    pub fn block_count(&self) -> usize {
        self.blocks
    }
}

/// Dumps every field of `value`, descending into nested objects.
///
/// Scalars are rendered as `"<tabs><field>: <value>;\n"`, nested objects
/// as `"<tabs><field>: \n"` followed by their own dump one tab deeper.
/// `level` is the number of tabs used for the top-level fields. Values that
/// are not objects or arrays have no fields and produce no output.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use watch::report::recursive_dump;
///
/// let dump = recursive_dump(&json!({"coords": {"latitude": 60.5}, "timestamp": 7}), 1);
/// assert_eq!(dump, "\tcoords: \n\t\tlatitude: 60.5;\n\ttimestamp: 7;\n");
/// ```
pub fn recursive_dump(value: &Value, level: usize) -> String {
    let mut dump = String::new();
    match value {
        Value::Object(map) => {
            for (field, value) in map {
                dump_field(&mut dump, field, value, level);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                dump_field(&mut dump, &index.to_string(), value, level);
            }
        }
        _ => (),
    }
    dump
}

fn dump_field(dump: &mut String, field: &str, value: &Value, level: usize) {
    let indent = "\t".repeat(level);
    match value {
        Value::Object(_) | Value::Array(_) | Value::Null => {
            dump.push_str(&format!("{indent}{field}: \n"));
            dump.push_str(&recursive_dump(value, level + 1));
        }
        scalar => {
            dump.push_str(&format!("{indent}{field}: {};\n", render_scalar(scalar)));
        }
    }
}

/// Integral numbers are printed without a fractional part.
fn render_scalar(value: &Value) -> String {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                int.to_string()
            } else if let Some(uint) = number.as_u64() {
                uint.to_string()
            } else {
                let float = number.as_f64().unwrap_or(f64::NAN);
                if float.fract() == 0.0 && float.abs() < 1e15 {
                    format!("{:.0}", float)
                } else {
                    float.to_string()
                }
            }
        }
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::{DateTime, FixedOffset, Local, Locale, TimeZone};
use common::record::NIL;
use std::fmt::Display;
use tracing::warn;

/// Turns an epoch millisecond timestamp into the text shown to the user.
pub trait TimestampFormatter {
    fn format(&self, epoch_millis: i64) -> String;
}

/// Day, abbreviated month and 24 hour time.
const FORMAT: &str = "%-d. %b, %H:%M:%S";

#[derive(Debug, Clone, Copy)]
enum Zone {
    Fixed(FixedOffset),
    Local,
}

/// Formats timestamps the way a Norwegian (nb-NO) locale shows a short
/// month, the day and a 24 hour time, e.g. `"18. okt., 14:03:05"`.
///
/// Without an explicit offset the local timezone is used with the offset
/// valid at each timestamp, so daylight saving changes are honored.
#[derive(Debug, Clone, Copy)]
pub struct NorwegianTimestampFormatter {
    zone: Zone,
}

impl NorwegianTimestampFormatter {
    /// Creates a formatter for the given UTC offset.
    pub fn new(offset: FixedOffset) -> Self {
        NorwegianTimestampFormatter {
            zone: Zone::Fixed(offset),
        }
    }

    /// Creates a formatter for a UTC offset given in minutes.
    ///
    /// Returns `None` if the offset is out of range (more than a day).
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(NorwegianTimestampFormatter::new)
    }

    /// Creates a formatter for the local timezone.
    pub fn local() -> Self {
        NorwegianTimestampFormatter { zone: Zone::Local }
    }
}

impl Default for NorwegianTimestampFormatter {
    fn default() -> Self {
        NorwegianTimestampFormatter::local()
    }
}

fn format_in<Tz: TimeZone>(time: DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.format_localized(FORMAT, Locale::nb_NO).to_string()
}

impl TimestampFormatter for NorwegianTimestampFormatter {
    fn format(&self, epoch_millis: i64) -> String {
        let Some(utc) = DateTime::from_timestamp_millis(epoch_millis) else {
            warn!("Timestamp {} is out of range", epoch_millis);
            return NIL.to_string();
        };
        match self.zone {
            Zone::Fixed(offset) => format_in(utc.with_timezone(&offset)),
            Zone::Local => format_in(utc.with_timezone(&Local)),
        }
    }
}

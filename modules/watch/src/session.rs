// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::clipboard::Clipboard;
use crate::display::DisplayUpdater;
use crate::format::{NorwegianTimestampFormatter, TimestampFormatter};
use crate::reference::ReferenceTracker;
use crate::report::ReportAccumulator;
use crate::table::{RecordTable, render_row};
use algorithm::{Evaluation, EvaluationSkip, Hundredths, Tolerances, evaluate, round_coordinates};
use common::clock::{Clock, SystemClock};
use common::error::SampleError;
use common::position::{PositionError, PositionSample};
use common::record::{DisplayState, RenderedRow, TableKind};
use tracing::{debug, info, warn};

/// What happened to a sample handed to [`WatchSession::on_sample`].
#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    /// The sample's coordinates are unusable. Nothing changed.
    Skipped(SampleError),

    /// The reference has unusable coordinates, the sample was shown and
    /// became the reference without being compared.
    Unevaluated,

    /// The sample was compared, rendered into a table and shown.
    Evaluated {
        evaluation: Evaluation,
        row: RenderedRow,
    },
}

/// The state of one watch session.
///
/// Owns the reference sample, the report, both record tables and the live
/// display. Every sample and every source error is processed to completion
/// before the next one, the session is never shared between handlers.
///
/// # Type Parameters
/// - `C`: The wall-clock used for the time dimension. Defaults to [`SystemClock`].
/// - `F`: The formatter for shown timestamps. Defaults to [`NorwegianTimestampFormatter`].
pub struct WatchSession<C: Clock = SystemClock, F: TimestampFormatter = NorwegianTimestampFormatter>
{
    clock: C,
    formatter: F,
    clipboard: Box<dyn Clipboard + Send>,
    tolerances: Tolerances,
    reference: ReferenceTracker,
    report: ReportAccumulator,
    deviation_table: RecordTable,
    no_deviation_table: RecordTable,
    display: DisplayUpdater,
    copy_enabled: bool,
}

impl<C: Clock, F: TimestampFormatter> WatchSession<C, F> {
    pub fn new(clock: C, formatter: F, clipboard: Box<dyn Clipboard + Send>) -> Self {
        WatchSession {
            clock,
            formatter,
            clipboard,
            tolerances: Tolerances::default(),
            reference: ReferenceTracker::new(),
            report: ReportAccumulator::new(),
            deviation_table: RecordTable::new(TableKind::Deviation),
            no_deviation_table: RecordTable::new(TableKind::NoDeviation),
            display: DisplayUpdater::new(),
            copy_enabled: false,
        }
    }

    /// Processes a newly received sample.
    ///
    /// 1. The first sample ever received becomes the reference.
    /// 2. A sample with unusable coordinates is dropped, nothing else changes.
    /// 3. The sample is compared against the reference. A deviating sample is
    ///    recorded in the report and rendered into the deviation table,
    ///    otherwise it is rendered into the no deviation table.
    /// 4. The display shows the sample and the sample becomes the reference.
    pub fn on_sample(&mut self, sample: &PositionSample) -> SampleOutcome {
        let reference = *self.reference.initialize_if_absent(sample);

        let (latitude, longitude) = match round_coordinates(sample) {
            Ok(coordinates) => coordinates,
            Err(e) => {
                debug!("Skipping sample with unusable coordinates. Reason: {}", e);
                return SampleOutcome::Skipped(e);
            }
        };
        let time = self.formatter.format(sample.timestamp);

        let outcome = match evaluate(
            &reference,
            sample,
            self.clock.now_millis(),
            &self.tolerances,
        ) {
            Ok(evaluation) => {
                let row = self.render(sample, &evaluation, time.clone(), latitude, longitude);
                SampleOutcome::Evaluated { evaluation, row }
            }
            Err(EvaluationSkip::CandidateUnparseable(e)) => {
                debug!("Skipping sample with unusable coordinates. Reason: {}", e);
                return SampleOutcome::Skipped(e);
            }
            Err(EvaluationSkip::ReferenceUnparseable(e)) => {
                warn!("Reference has unusable coordinates, not comparing. Reason: {}", e);
                SampleOutcome::Unevaluated
            }
        };

        self.display.update(latitude, longitude, time);
        self.reference.advance(sample);
        outcome
    }

    fn render(
        &mut self,
        sample: &PositionSample,
        evaluation: &Evaluation,
        time: String,
        latitude: Hundredths,
        longitude: Hundredths,
    ) -> RenderedRow {
        let (table, kind) = if evaluation.has_deviation() {
            self.report.record_deviation(sample);
            (&mut self.deviation_table, TableKind::Deviation)
        } else {
            (&mut self.no_deviation_table, TableKind::NoDeviation)
        };
        let row = render_row(
            kind,
            time,
            latitude,
            longitude,
            &evaluation.deviations,
            evaluation.diagnostic.as_deref(),
        );
        info!("New row in {} table: {}", kind, row);
        if table.append(row.clone()) && !self.copy_enabled {
            info!("Copying the report is enabled");
            self.copy_enabled = true;
        }
        row
    }

    /// Shows an error of the position sample source.
    ///
    /// The reference and the report stay untouched, a later sample resumes
    /// normal operation.
    pub fn on_error(&mut self, error: &PositionError) {
        warn!("Position source error {}: {}", error.code, error.phrase());
        self.display.show_error(error);
    }

    /// Copies the report to the clipboard.
    ///
    /// Does nothing while copying is disabled, i.e. before the first row was
    /// rendered into any table. Returns the copied text.
    pub fn copy_report(&mut self) -> Option<String> {
        if !self.copy_enabled {
            debug!("Ignoring copy request, no row rendered yet");
            return None;
        }
        let text = self.report.export_text().to_string();
        self.clipboard.copy(&text);
        Some(text)
    }

    pub fn copy_enabled(&self) -> bool {
        self.copy_enabled
    }

    pub fn display(&self) -> &DisplayState {
        self.display.state()
    }

    pub fn reference(&self) -> Option<&PositionSample> {
        self.reference.current()
    }

    pub fn report(&self) -> &ReportAccumulator {
        &self.report
    }

    pub fn deviation_table(&self) -> &RecordTable {
        &self.deviation_table
    }

    pub fn no_deviation_table(&self) -> &RecordTable {
        &self.no_deviation_table
    }
}

// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! The deviation watch.
//!
//! Listens for position samples, compares each one against the previous
//! sample and keeps the record tables, the live display and the deviation
//! report of the session.

pub mod clipboard;
pub mod display;
pub mod format;
pub mod reference;
pub mod report;
pub mod session;
pub mod table;
pub mod test_helper;

use async_trait::async_trait;
use common::clock::Clock;
use format::TimestampFormatter;
use module_core::{
    DisplayStatePtr, EventKind, Module, ModuleCtx, RenderedRowPtr, ReportTextPtr,
};
use session::{SampleOutcome, WatchSession};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

/// The `DeviationWatch` module feeds every event of the position sample
/// source into its [`WatchSession`].
///
/// All events are handled one after another by the module's task, so no
/// two handlers ever work on the session at the same time. Changes are
/// announced on the bus as [`EventKind::RowRenderedEvent`],
/// [`EventKind::DisplayUpdatedEvent`] and [`EventKind::ReportCopiedEvent`].
pub struct DeviationWatch<C: Clock, F: TimestampFormatter> {
    ctx: ModuleCtx,
    session: WatchSession<C, F>,
}

impl<C: Clock, F: TimestampFormatter> DeviationWatch<C, F> {
    pub fn new(ctx: ModuleCtx, session: WatchSession<C, F>) -> Self {
        DeviationWatch { ctx, session }
    }

    pub fn session(&self) -> &WatchSession<C, F> {
        &self.session
    }

    fn on_sample(&mut self, sample: &common::position::PositionSample) {
        match self.session.on_sample(sample) {
            SampleOutcome::Skipped(_) => return,
            SampleOutcome::Unevaluated => (),
            SampleOutcome::Evaluated { row, .. } => {
                self.publish(EventKind::RowRenderedEvent(RenderedRowPtr::new(row)));
            }
        }
        self.publish_display();
    }

    fn on_error(&mut self, error: &common::position::PositionError) {
        self.session.on_error(error);
        self.publish_display();
    }

    fn on_copy_request(&mut self) {
        if let Some(text) = self.session.copy_report() {
            self.publish(EventKind::ReportCopiedEvent(ReportTextPtr::new(text)));
        }
    }

    fn publish_display(&self) {
        self.publish(EventKind::DisplayUpdatedEvent(DisplayStatePtr::new(
            self.session.display().clone(),
        )));
    }

    fn publish(&self, kind: EventKind) {
        if self.ctx.publish_event(kind).is_err() {
            debug!("No subscriber for watch event");
        }
    }
}

#[async_trait]
impl<C, F> Module for DeviationWatch<C, F>
where
    C: Clock + Send,
    F: TimestampFormatter + Send,
{
    /// Runs the module's event loop until a `QuitEvent` is received.
    async fn run(&mut self) -> Result<(), ()> {
        info!("Deviation watch started");
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            match event.kind {
                                EventKind::QuitEvent => run = false,
                                EventKind::PositionSampleEvent(sample) => {
                                    debug!("Position sample received in DeviationWatch module");
                                    self.on_sample(&sample);
                                }
                                EventKind::PositionErrorEvent(error) => {
                                    debug!("Position error received in DeviationWatch module");
                                    self.on_error(&error);
                                }
                                EventKind::CopyReportRequestEvent => {
                                    debug!("Copy report request received in DeviationWatch module");
                                    self.on_copy_request();
                                }
                                _ => (),
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("DeviationWatch lagged behind, {} events skipped", skipped);
                        }
                        Err(RecvError::Closed) => {
                            error!("Event bus closed, stopping DeviationWatch");
                            run = false;
                        }
                    }
                }
            }
        }
        info!(
            "Deviation watch stopped with {} deviating and {} regular rows",
            self.session.deviation_table().rows().len(),
            self.session.no_deviation_table().rows().len()
        );
        Ok(())
    }
}

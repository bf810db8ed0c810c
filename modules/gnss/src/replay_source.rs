// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::clock::{Clock, SystemClock};
use common::position::{Coordinates, PositionError, PositionSample};
use module_core::{Event, EventKind, Module, ModuleCtx, PositionSamplePtr};
use std::{
    io::{Error, ErrorKind},
    sync::Arc,
    time::Duration,
};
use tracing::{debug, error, info};

/// One scripted reading of a [`ReplayGnssModule`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplayEntry {
    /// A sample with the given coordinates. `age_ms` is how old the reading
    /// is when it gets published.
    Sample { coords: Coordinates, age_ms: i64 },

    /// The source fails to deliver a reading.
    Error(PositionError),
}

/// Replays the scripted entries, one per tick.
struct ReplaySourceRuntime<C: Clock> {
    entries: Vec<ReplayEntry>,
    next_entry: usize,
    repeat: bool,
    clock: C,
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl<C: Clock> ReplaySourceRuntime<C> {
    /// Publishes the next entry.
    ///
    /// Returns `false` once every entry was published and the source does
    /// not repeat.
    fn handle_tick(&mut self) -> bool {
        if self.next_entry >= self.entries.len() {
            if !self.repeat {
                return false;
            }
            debug!("Replay finished, starting over");
            self.next_entry = 0;
        }
        let entry = self.entries[self.next_entry];
        self.next_entry += 1;

        let kind = match entry {
            ReplayEntry::Sample { coords, age_ms } => {
                let now = self.clock.now_millis();
                EventKind::PositionSampleEvent(PositionSamplePtr::new(PositionSample::new(
                    coords,
                    now - age_ms,
                    now,
                )))
            }
            ReplayEntry::Error(error) => EventKind::PositionErrorEvent(error),
        };
        let _ = self.sender.send(Event { kind });
        true
    }
}

#[derive(Clone)]
struct ReplayGnssModuleConfig {
    entries: Vec<ReplayEntry>,
    interval: Duration,
    repeat: bool,
}

/// A position sample source that publishes a fixed list of entries in a
/// constant interval.
///
/// Samples are stamped when they are published: the timestamp is the
/// current time minus the entry's age, the capture time is the current time.
pub struct ReplayGnssModule<C: Clock = SystemClock> {
    ctx: ModuleCtx,
    config: Arc<ReplayGnssModuleConfig>,
    clock: Option<C>,
}

impl ReplayGnssModule<SystemClock> {
    pub fn new(
        ctx: ModuleCtx,
        entries: &[ReplayEntry],
        interval: Duration,
        repeat: bool,
    ) -> Result<Self, Error> {
        ReplayGnssModule::new_with_clock(ctx, entries, interval, repeat, SystemClock::new())
    }
}

impl<C: Clock> ReplayGnssModule<C> {
    /// Creates a replay source with a custom clock.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidData`] if `entries` is empty or `interval` is zero.
    pub fn new_with_clock(
        ctx: ModuleCtx,
        entries: &[ReplayEntry],
        interval: Duration,
        repeat: bool,
        clock: C,
    ) -> Result<Self, Error> {
        if entries.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "entries parameter is empty",
            ));
        }
        if interval.is_zero() {
            return Err(Error::new(ErrorKind::InvalidData, "interval must not be zero"));
        }
        Ok(ReplayGnssModule {
            ctx,
            config: Arc::new(ReplayGnssModuleConfig {
                entries: entries.to_vec(),
                interval,
                repeat,
            }),
            clock: Some(clock),
        })
    }
}

#[async_trait::async_trait]
impl<C: Clock + Send + 'static> Module for ReplayGnssModule<C> {
    async fn run(&mut self) -> Result<(), ()> {
        let Some(clock) = self.clock.take() else {
            error!("ReplayGnssModule can only run once");
            return Err(());
        };
        let config = self.config.clone();
        let sender = self.ctx.sender.clone();
        let replay_task_handle = tokio::spawn(async move {
            replay_task(sender, config, clock).await;
        });
        info!("Replay source started");
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                match event {
                    Ok(event) => {
                        if let EventKind::QuitEvent = event.kind {
                            replay_task_handle.abort();
                            run = false;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        replay_task_handle.abort();
                        run = false;
                    }
                    Err(e) => debug!("Replay source receive error: {}", e),
                    }
                }
            }
        }
        Ok(())
    }
}

async fn replay_task<C: Clock>(
    sender: tokio::sync::broadcast::Sender<Event>,
    config: Arc<ReplayGnssModuleConfig>,
    clock: C,
) {
    let mut timer = tokio::time::interval(config.interval);
    let mut runtime = ReplaySourceRuntime {
        entries: config.entries.clone(),
        next_entry: 0,
        repeat: config.repeat,
        clock,
        sender,
    };
    loop {
        timer.tick().await;
        if !runtime.handle_tick() {
            info!("Replay finished after {} entries", runtime.entries.len());
            break;
        }
    }
}

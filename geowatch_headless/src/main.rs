// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

mod replay_file;

use clap::{CommandFactory, Parser};
use common::clock::SystemClock;
use dirs::data_local_dir;
use gnss::replay_source::ReplayGnssModule;
use module_core::{Event, EventBus, EventKind, Module};
use replay_file::read_replay_file;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use watch::DeviationWatch;
use watch::clipboard::FileClipboard;
use watch::format::NorwegianTimestampFormatter;
use watch::session::WatchSession;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file with the readings to replay (latitude,longitude,age_ms,error_code).
    #[arg(short = 'f', long)]
    replay_file: Option<PathBuf>,
    /// Milliseconds between two replayed readings.
    #[arg(short, long, default_value_t = 1000)]
    interval_ms: u64,
    /// Start over after the last reading.
    #[arg(short, long)]
    repeat: bool,
    /// File the report is copied to. Defaults to the local data directory.
    #[arg(long)]
    report_file: Option<PathBuf>,
    /// UTC offset in minutes used to show timestamps. Defaults to the local offset.
    #[arg(long, allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,
}

/// Settings of one watch run, resolved from the command line.
#[derive(Debug)]
struct WatchConfig {
    replay_file: PathBuf,
    interval: Duration,
    repeat: bool,
    report_file: PathBuf,
    formatter: NorwegianTimestampFormatter,
}

impl WatchConfig {
    fn from_cli(cli: &Cli) -> Result<Self, ()> {
        let Some(replay_file) = cli.replay_file.clone() else {
            error!("Geolocation is not supported: no position source given. Use --replay-file");
            let _ = Cli::command().print_help();
            return Err(());
        };
        let report_file = match &cli.report_file {
            Some(path) => path.clone(),
            None => get_default_report_file()?,
        };
        let formatter = match cli.utc_offset_minutes {
            Some(minutes) => NorwegianTimestampFormatter::with_offset_minutes(minutes)
                .ok_or_else(|| error!("UTC offset of {} minutes is out of range", minutes))?,
            None => NorwegianTimestampFormatter::local(),
        };
        Ok(WatchConfig {
            replay_file,
            interval: Duration::from_millis(cli.interval_ms),
            repeat: cli.repeat,
            report_file,
            formatter,
        })
    }
}

fn get_default_report_file() -> Result<PathBuf, ()> {
    let mut report_file = data_local_dir().ok_or_else(|| {
        error!("Could not determine local data directory");
    })?;
    report_file.push("geowatch");
    report_file.push("report.txt");
    Ok(report_file)
}

fn create_replay_module(
    eb: &EventBus,
    config: &WatchConfig,
) -> Result<ReplayGnssModule<SystemClock>, ()> {
    let entries = read_replay_file(&config.replay_file).map_err(|e| {
        error!(
            "Failed to read replay file {}. Error: {}",
            config.replay_file.display(),
            e
        );
    })?;
    ReplayGnssModule::new(eb.context(), &entries, config.interval, config.repeat).map_err(|e| {
        error!("Failed to create ReplayGnssModule. Error: {}", e);
    })
}

/// Ctrl-C copies the report and stops all modules.
fn install_quit_handler(eb: &EventBus) -> Result<(), ()> {
    let sender = eb.context().sender;
    ctrlc::set_handler(move || {
        info!("Stopping, copying report...");
        let _ = sender.send(Event {
            kind: EventKind::CopyReportRequestEvent,
        });
        let _ = sender.send(Event {
            kind: EventKind::QuitEvent,
        });
    })
    .map_err(|e| error!("Failed to install Ctrl-C handler. Error: {}", e))
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = WatchConfig::from_cli(&cli)?;
    let eb = EventBus::default();
    let mut source = create_replay_module(&eb, &config)?;
    let session = WatchSession::new(
        SystemClock::new(),
        config.formatter,
        Box::new(FileClipboard::new(&config.report_file)),
    );
    let mut watch = DeviationWatch::new(eb.context(), session);
    install_quit_handler(&eb)?;

    info!(
        "Watching {}, report goes to {}",
        config.replay_file.display(),
        config.report_file.display()
    );
    let (source_result, watch_result) = tokio::join!(source.run(), watch.run());
    print!("{}", watch.session().deviation_table());
    print!("{}", watch.session().no_deviation_table());
    source_result.and(watch_result)
}

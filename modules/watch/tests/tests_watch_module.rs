// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::position::{Coordinates, PositionError, PositionSample};
use common::record::TableKind;
use common::test_helper::test_clock::TestClock;
use module_core::{
    Event, EventBus, EventKind, EventKindType, Module, PositionSamplePtr, payload_ref,
    test_helper::{collect_events, stop_module, wait_for_event},
};
use std::time::Duration;
use tokio::task::JoinHandle;
use watch::DeviationWatch;
use watch::session::WatchSession;
use watch::test_helper::{EpochFormatter, MemoryClipboard};

const T: i64 = 1_700_000_000_000;
const TIMEOUT: Duration = Duration::from_millis(100);

fn create_module(eb: &EventBus, clipboard: MemoryClipboard) -> JoinHandle<Result<(), ()>> {
    let ctx = eb.context();
    tokio::spawn(async move {
        let session = WatchSession::new(
            TestClock::starting_at(T),
            EpochFormatter,
            Box::new(clipboard),
        );
        let mut watch = DeviationWatch::new(ctx, session);
        watch.run().await
    })
}

fn publish_sample(eb: &EventBus, latitude: f64, longitude: f64) {
    eb.publish(&Event {
        kind: EventKind::PositionSampleEvent(PositionSamplePtr::new(PositionSample::new(
            Coordinates::new(latitude, longitude),
            T,
            T,
        ))),
    });
}

#[tokio::test]
#[test_log::test]
async fn renders_row_and_updates_display_for_sample() {
    let eb = EventBus::default();
    let mut receiver = eb.subscribe();
    let mut watch = create_module(&eb, MemoryClipboard::default());

    publish_sample(&eb, 60.00, 10.00);

    let row_event = wait_for_event(&mut receiver, TIMEOUT, EventKindType::RowRenderedEvent).await;
    let row = payload_ref!(row_event.kind, EventKind::RowRenderedEvent).unwrap();
    assert_eq!(row.table, TableKind::NoDeviation);
    assert_eq!(row.latitude.text, "60.00");

    let display_event =
        wait_for_event(&mut receiver, TIMEOUT, EventKindType::DisplayUpdatedEvent).await;
    let display = payload_ref!(display_event.kind, EventKind::DisplayUpdatedEvent).unwrap();
    assert_eq!(display.latitude, "60.00");
    assert_eq!(display.longitude, "10.00");
    assert_eq!(display.time, format!("t={T}"));

    stop_module(&eb, &mut watch).await;
}

#[tokio::test]
#[test_log::test]
async fn deviation_is_rendered_into_deviation_table() {
    let eb = EventBus::default();
    let mut receiver = eb.subscribe();
    let mut watch = create_module(&eb, MemoryClipboard::default());

    publish_sample(&eb, 60.00, 10.00);
    publish_sample(&eb, 60.02, 10.00);

    let rows = collect_events(&mut receiver, TIMEOUT, EventKindType::RowRenderedEvent).await;
    let tables: Vec<TableKind> = rows
        .iter()
        .filter_map(|event| payload_ref!(event.kind, EventKind::RowRenderedEvent))
        .map(|row| row.table)
        .collect();
    assert_eq!(tables, vec![TableKind::NoDeviation, TableKind::Deviation]);
    let deviating = payload_ref!(rows[1].kind, EventKind::RowRenderedEvent).unwrap();
    assert!(deviating.latitude.error);
    assert!(!deviating.longitude.error);

    stop_module(&eb, &mut watch).await;
}

#[tokio::test]
#[test_log::test]
async fn unparseable_sample_publishes_nothing() {
    let eb = EventBus::default();
    let mut receiver = eb.subscribe();
    let mut watch = create_module(&eb, MemoryClipboard::default());

    publish_sample(&eb, 60.00, 10.00);
    wait_for_event(&mut receiver, TIMEOUT, EventKindType::DisplayUpdatedEvent).await;

    publish_sample(&eb, f64::NAN, 10.00);
    let displays =
        collect_events(&mut receiver, TIMEOUT, EventKindType::DisplayUpdatedEvent).await;
    assert!(displays.is_empty());

    stop_module(&eb, &mut watch).await;
}

#[tokio::test]
#[test_log::test]
async fn source_error_is_shown() {
    let eb = EventBus::default();
    let mut receiver = eb.subscribe();
    let mut watch = create_module(&eb, MemoryClipboard::default());

    eb.publish(&Event {
        kind: EventKind::PositionErrorEvent(PositionError::new(1)),
    });

    let event = wait_for_event(&mut receiver, TIMEOUT, EventKindType::DisplayUpdatedEvent).await;
    let display = payload_ref!(event.kind, EventKind::DisplayUpdatedEvent).unwrap();
    assert_eq!(
        display.latitude,
        "Error occurred. Error code: 1: permission denied (you didn't enable positioning)"
    );
    assert_eq!(display.longitude, "-");
    assert_eq!(display.time, "-");

    stop_module(&eb, &mut watch).await;
}

#[tokio::test]
#[test_log::test]
async fn copy_request_copies_report() {
    let eb = EventBus::default();
    let mut receiver = eb.subscribe();
    let clipboard = MemoryClipboard::default();
    let mut watch = create_module(&eb, clipboard.clone());

    eb.publish(&Event {
        kind: EventKind::CopyReportRequestEvent,
    });
    publish_sample(&eb, 60.00, 10.00);
    publish_sample(&eb, 61.00, 10.00);
    eb.publish(&Event {
        kind: EventKind::CopyReportRequestEvent,
    });

    let copied =
        collect_events(&mut receiver, TIMEOUT, EventKindType::ReportCopiedEvent).await;
    assert_eq!(copied.len(), 1);
    let text = payload_ref!(copied[0].kind, EventKind::ReportCopiedEvent).unwrap();
    assert!(text.starts_with("Position:\n"));
    assert!(text.contains("\t\tlatitude: 61;\n"));
    assert_eq!(clipboard.copies(), vec![(**text).clone()]);

    stop_module(&eb, &mut watch).await;
}

use common::position::{Coordinates, PositionError, PositionSample};
use module_core::{
    Event, EventBus, EventKind, EventKindType, PositionSamplePtr, payload_ref,
    test_helper::{collect_events, wait_for_event},
};
use std::time::Duration;

#[tokio::test]
#[test_log::test]
pub async fn events_delivered() {
    let event_bus = EventBus::new();
    let mut receiver = event_bus.subscribe();
    let event = Event {
        kind: EventKind::QuitEvent,
    };
    event_bus.publish(&event);
    let received_event = tokio::time::timeout(Duration::from_millis(100), receiver.recv())
        .await
        .expect("Failed to receive event in required time")
        .unwrap();
    assert_eq!(received_event.event_type(), event.event_type());
}

#[tokio::test]
#[test_log::test]
pub async fn test_wait_for_event_skips_other_events() {
    let event_bus = EventBus::new();
    let ctx = event_bus.context();
    let mut receiver = event_bus.subscribe();
    let sample = PositionSamplePtr::new(PositionSample::new(
        Coordinates::new(60.0, 10.0),
        1_000,
        1_000,
    ));

    ctx.publish_event(EventKind::CopyReportRequestEvent)
        .expect("Failed to publish copy request");
    ctx.publish_event(EventKind::PositionSampleEvent(sample.clone()))
        .expect("Failed to publish sample");

    let event = wait_for_event(
        &mut receiver,
        Duration::from_millis(100),
        EventKindType::PositionSampleEvent,
    )
    .await;
    assert_eq!(
        **payload_ref!(event.kind, EventKind::PositionSampleEvent).unwrap(),
        *sample
    );
}

#[tokio::test]
#[test_log::test]
pub async fn test_collect_events() {
    let event_bus = EventBus::new();
    let mut receiver = event_bus.subscribe();
    for code in 0..3 {
        event_bus.publish(&Event {
            kind: EventKind::PositionErrorEvent(PositionError::new(code)),
        });
        event_bus.publish(&Event {
            kind: EventKind::CopyReportRequestEvent,
        });
    }

    let events = collect_events(
        &mut receiver,
        Duration::from_millis(50),
        EventKindType::PositionErrorEvent,
    )
    .await;
    let codes: Vec<u16> = events
        .iter()
        .filter_map(|event| payload_ref!(event.kind, EventKind::PositionErrorEvent))
        .map(|error| error.code)
        .collect();
    assert_eq!(codes, vec![0, 1, 2]);
}

#[test]
pub fn publish_without_subscriber_is_discarded() {
    let event_bus = EventBus::new();
    event_bus.publish(&Event {
        kind: EventKind::QuitEvent,
    });

    let module_core::ModuleCtx { sender, receiver } = event_bus.context();
    drop(receiver);
    assert!(
        sender
            .send(Event {
                kind: EventKind::QuitEvent
            })
            .is_err()
    );
}

use crate::{Event, EventBus, EventKind, EventKindType};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{timeout, timeout_at};

/// Sends a quit signal to a running module and waits for it to stop gracefully.
///
/// This function publishes a [`QuitEvent`](EventKind::QuitEvent) through the given [`EventBus`],
/// signaling the target module to terminate. It then waits asynchronously for the module’s task
/// (represented by the provided [`tokio::task::JoinHandle`]) to complete within a fixed timeout.
///
/// # Arguments
/// * `event_bus` – A reference to the [`EventBus`] used to send the quit event.
/// * `handle` – A mutable reference to the [`JoinHandle`](tokio::task::JoinHandle) of the running module’s task.
///
/// # Panics
/// This function panics if:
/// - The module does not stop within the timeout duration.
/// - The task returns an error (`Err(())`).
pub async fn stop_module(
    event_bus: &EventBus,
    handle: &mut tokio::task::JoinHandle<Result<(), ()>>,
) {
    event_bus.publish(&Event {
        kind: EventKind::QuitEvent,
    });
    timeout(std::time::Duration::from_millis(100), handle)
        .await
        .expect("Module doesn't handle quit event in timeout")
        .expect("Module task panicked")
        .expect("Module returned an error");
}

/// Waits asynchronously for a specific type of [`Event`] to be received on a
/// [`tokio::sync::broadcast::Receiver`] within a given duration.
///
/// Events of other types are skipped, a lagging receiver continues with the
/// oldest event still buffered.
///
/// # Panics
///
/// This function panics if no matching event is received within the specified
/// `duration`.
///
/// # Returns
///
/// Returns the first [`Event`] whose [`EventKind`] discriminant matches
/// `exp_event`.
pub async fn wait_for_event(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    duration: std::time::Duration,
    exp_event: EventKindType,
) -> Event {
    let deadline = tokio::time::Instant::now() + duration;
    loop {
        match timeout_at(deadline, rx.recv()).await {
            Ok(Ok(event)) if EventKindType::from(&event.kind) == exp_event => return event,
            Ok(Ok(_)) | Ok(Err(RecvError::Lagged(_))) => continue,
            _ => break,
        }
    }
    panic!("Failed to receive event of type {:?}", exp_event);
}

/// Collects every event of the given type that arrives within `duration`.
///
/// Unlike [`wait_for_event`] this never panics, an empty vector means no
/// matching event was published.
pub async fn collect_events(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    duration: std::time::Duration,
    exp_event: EventKindType,
) -> Vec<Event> {
    let deadline = tokio::time::Instant::now() + duration;
    let mut events = Vec::new();
    loop {
        match timeout_at(deadline, rx.recv()).await {
            Ok(Ok(event)) => {
                if EventKindType::from(&event.kind) == exp_event {
                    events.push(event);
                }
            }
            Ok(Err(RecvError::Lagged(_))) => continue,
            _ => break,
        }
    }
    events
}

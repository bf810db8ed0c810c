// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::position::{PositionError, PositionSample};
use common::record::{DisplayState, RenderedRow};
use strum_macros::EnumDiscriminants;

/// Represents a high-level event in the system.
///
/// Each `Event` wraps an [`EventKind`], which defines the actual type
/// and data carried by the event.
///
/// This structure is designed to be passed through an [`EventBus`]
/// between asynchronous modules.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// The inner event type and associated data.
    pub kind: EventKind,
}

impl Event {
    /// Returns the payload-free type of this event.
    pub fn event_type(&self) -> EventKindType {
        EventKindType::from(&self.kind)
    }
}

/// A thread-safe, reference-counted pointer to a [`PositionSample`].
///
/// This type alias wraps a [`PositionSample`] inside an [`Arc`](std::sync::Arc),
/// allowing multiple modules to share ownership of the same sample without
/// copying it.
pub type PositionSamplePtr = std::sync::Arc<PositionSample>;

/// A thread-safe, reference-counted pointer to a [`RenderedRow`].
pub type RenderedRowPtr = std::sync::Arc<RenderedRow>;

/// A thread-safe, reference-counted pointer to a [`DisplayState`].
pub type DisplayStatePtr = std::sync::Arc<DisplayState>;

/// A thread-safe, reference-counted pointer to the exported report text.
pub type ReportTextPtr = std::sync::Arc<String>;

/// Enumerates the different kinds of events that can be emitted
/// and transmitted via the [`EventBus`].
///
/// The payload-free discriminants are available as [`EventKindType`].
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKindType))]
#[strum_discriminants(derive(Hash))]
pub enum EventKind {
    /// Indicates that a module shall terminate.
    QuitEvent,

    /// A new reading of the position sample source.
    PositionSampleEvent(PositionSamplePtr),

    /// The position sample source failed to deliver a reading.
    PositionErrorEvent(PositionError),

    /// The user asks to copy the deviation report.
    CopyReportRequestEvent,

    /// The deviation report was handed over to the clipboard.
    ReportCopiedEvent(ReportTextPtr),

    /// A row was appended to one of the record tables.
    RowRenderedEvent(RenderedRowPtr),

    /// The live display fields changed.
    DisplayUpdatedEvent(DisplayStatePtr),
}

/// Returns a reference to the payload of an [`EventKind`] variant, or
/// `None` if the event is of a different variant.
///
/// ```
/// use module_core::{EventKind, payload_ref};
/// use common::position::PositionError;
///
/// let kind = EventKind::PositionErrorEvent(PositionError::new(2));
/// assert_eq!(payload_ref!(kind, EventKind::PositionErrorEvent).unwrap().code, 2);
/// assert!(payload_ref!(kind, EventKind::PositionSampleEvent).is_none());
/// ```
#[macro_export]
macro_rules! payload_ref {
    ($kind:expr, $variant:path) => {
        match &$kind {
            $variant(payload) => Some(payload),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    };
}

/// A simple asynchronous event bus for publishing and subscribing to [`Event`]s.
///
/// The event bus uses a [`tokio::sync::broadcast::channel`] under the hood,
/// allowing multiple receivers to listen for the same stream of events.
///
/// Each published event is cloned and distributed to all active subscribers.
/// If no subscribers exist at the time of publication, the event is discarded silently.
pub struct EventBus {
    /// The broadcast sender used internally to distribute events.
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new [`EventBus`] with a fixed buffer capacity of 100 messages.
    ///
    /// When the buffer is full, the oldest messages are dropped automatically
    /// as new ones are published.
    pub fn new() -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(100);
        EventBus { sender }
    }

    /// Subscribes to the event bus and returns a [`tokio::sync::broadcast::Receiver`].
    ///
    /// The returned receiver will receive all future events published after the
    /// subscription is created.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publishes an [`Event`] to all active subscribers.
    ///
    /// If no subscribers exist, the event is discarded silently.
    pub fn publish(&self, event: &Event) {
        let _ = self.sender.send(event.clone());
    }

    /// Creates a [`ModuleCtx`] bound to this [`EventBus`].
    pub fn context(&self) -> ModuleCtx {
        ModuleCtx::new(self)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Defines the common interface for an asynchronous module
/// that can be executed and communicate via the [`EventBus`].
#[async_trait::async_trait]
pub trait Module {
    /// Runs the module asynchronously until completion.
    ///
    /// This function typically contains the module's main event loop,
    /// reacting to messages received through the [`ModuleCtx`].
    async fn run(&mut self) -> Result<(), ()>;
}

/// Provides a module-scoped context for interacting with the [`EventBus`].
///
/// Each `ModuleCtx` owns both a sender and a receiver, allowing the module
/// to both publish and listen for events.
pub struct ModuleCtx {
    /// The broadcast sender used to publish events.
    pub sender: tokio::sync::broadcast::Sender<Event>,

    /// The broadcast receiver used to listen for events.
    pub receiver: tokio::sync::broadcast::Receiver<Event>,
}

impl ModuleCtx {
    /// Constructs a new [`ModuleCtx`] from the given [`EventBus`].
    ///
    /// Clones the internal broadcast sender and creates a new receiver.
    pub fn new(event_bus: &EventBus) -> Self {
        ModuleCtx {
            sender: event_bus.sender.clone(),
            receiver: event_bus.subscribe(),
        }
    }

    /// Publishes an event of the given kind.
    ///
    /// # Errors
    ///
    /// Returns the event back if no receiver is subscribed to the bus.
    pub fn publish_event(
        &self,
        kind: EventKind,
    ) -> Result<(), tokio::sync::broadcast::error::SendError<Event>> {
        self.sender.send(Event { kind }).map(|_| ())
    }
}

pub mod test_helper;

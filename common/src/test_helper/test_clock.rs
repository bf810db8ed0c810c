use crate::clock::Clock;
use std::sync::mpsc;

/// A test implementation of [`Clock`] that allows deterministic control
/// of the wall-clock time in unit tests.
///
/// Internally, it uses an [`mpsc::channel`] to receive externally
/// provided epoch milliseconds, and a [`std::cell::Cell`] to hold the
/// latest received value.
pub struct TestClock {
    sender: mpsc::Sender<i64>,
    receiver: mpsc::Receiver<i64>,
    now: std::cell::Cell<i64>,
}

impl Default for TestClock {
    /// Creates a new instance with an internal channel for sending
    /// times and an initial time of zero.
    fn default() -> Self {
        let (tx, rx) = mpsc::channel::<i64>();
        Self {
            sender: tx,
            receiver: rx,
            // Not synchronized, but sufficient for test usage.
            now: std::cell::Cell::new(0),
        }
    }
}

impl TestClock {
    /// Creates a test clock that starts at the given epoch milliseconds.
    pub fn starting_at(now: i64) -> Self {
        let clock = TestClock::default();
        clock.now.set(now);
        clock
    }

    /// Returns a clone of the internal sender used to provide
    /// times from outside the test clock.
    pub fn sender(&self) -> mpsc::Sender<i64> {
        self.sender.clone()
    }

    /// Drains the channel and returns the latest time held by this clock.
    fn receive(&self) -> i64 {
        while let Ok(now) = self.receiver.try_recv() {
            self.now.set(now);
        }
        self.now.get()
    }
}

impl Clock for TestClock {
    fn now_millis(&self) -> i64 {
        self.receive()
    }
}

/// Sends the given epoch milliseconds through the provided sender to
/// update a [`TestClock`] instance.
///
/// Panics if sending fails, for example if the receiver has been dropped.
pub fn set_now(sender: &mpsc::Sender<i64>, now: i64) {
    sender
        .send(now)
        .unwrap_or_else(|_| panic!("Failed to send time to the test clock"));
}

//! Presentation events emitted by a session.
//!
//! Audio, speech and visual effects live outside the engine. They subscribe
//! through [`Notifier`] and never feed anything back.

use std::sync::Mutex;

use serde::Serialize;
use tracing::debug;

/// A discrete moment the presentation layer may react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    SessionStart,
    Correct,
    Incorrect,
    Timeout,
    /// The streak just reached `length` (3 or more).
    Streak { length: u32 },
    TimerWarning { remaining: u32 },
    SessionEnd,
}

/// Fire-and-forget sink for [`GameEvent`]s.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: GameEvent);
}

/// Logs every event at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: GameEvent) {
        debug!(?event, "game event");
    }
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<GameEvent>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far.
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn count(&self, event: GameEvent) -> usize {
        self.events().iter().filter(|e| **e == event).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: GameEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(GameEvent::SessionStart);
        notifier.notify(GameEvent::Streak { length: 3 });
        notifier.notify(GameEvent::SessionStart);

        assert_eq!(
            notifier.events(),
            vec![
                GameEvent::SessionStart,
                GameEvent::Streak { length: 3 },
                GameEvent::SessionStart
            ]
        );
        assert_eq!(notifier.count(GameEvent::SessionStart), 2);
    }
}

use chrono::{DateTime, Duration, Utc};

//
// ─── CLOCK ─────────────────────────────────────────────────────────────────────
//

/// A simple clock abstraction for deterministic session timestamps in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

//
// ─── COUNTDOWN ─────────────────────────────────────────────────────────────────
//

/// Result of advancing a countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running { remaining: u32 },
    /// Remaining time just reached the warning threshold.
    Warning { remaining: u32 },
    /// Remaining time just reached zero.
    Expired,
    /// The countdown is not running; the tick had no effect.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownState {
    Idle,
    Running,
    Cancelled,
    Expired,
}

/// Per-question countdown with 1-second granularity.
///
/// The value only moves when [`Countdown::tick`] is called; whoever owns the
/// timer source drives it. Once cancelled or expired it ignores further ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    warning_at: u32,
    state: CountdownState,
}

impl Countdown {
    /// A countdown that was never started.
    #[must_use]
    pub fn idle(duration_secs: u32) -> Self {
        Self {
            remaining: duration_secs,
            warning_at: 0,
            state: CountdownState::Idle,
        }
    }

    #[must_use]
    pub fn start(duration_secs: u32, warning_at: u32) -> Self {
        Self {
            remaining: duration_secs,
            warning_at,
            state: CountdownState::Running,
        }
    }

    pub fn tick(&mut self) -> Tick {
        if self.state != CountdownState::Running {
            return Tick::Stopped;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = CountdownState::Expired;
            Tick::Expired
        } else if self.remaining == self.warning_at {
            Tick::Warning {
                remaining: self.remaining,
            }
        } else {
            Tick::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Stop the countdown, keeping the remaining time for scoring.
    pub fn cancel(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Cancelled;
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.state == CountdownState::Expired
    }
}

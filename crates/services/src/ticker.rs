//! Async countdown driver.
//!
//! One ticker runs per issued question. It sends the question's token once per
//! period; the session drops ticks whose token is stale, and the handle aborts
//! the task when the question resolves.

use std::time::Duration;

use shapes_core::model::QuestionToken;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Owns a running ticker task. Dropping the handle cancels it.
#[derive(Debug)]
pub struct TickerHandle {
    token: QuestionToken,
    task: JoinHandle<()>,
}

impl TickerHandle {
    #[must_use]
    pub fn token(&self) -> QuestionToken {
        self.token
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start sending `token` on `ticks` every `period`, first tick one period from now.
///
/// The task stops on its own once the receiver is gone.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
#[must_use]
pub fn spawn_ticker(
    token: QuestionToken,
    period: Duration,
    ticks: UnboundedSender<QuestionToken>,
) -> TickerHandle {
    let task = tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if ticks.send(token).is_err() {
                break;
            }
        }
    });
    TickerHandle { token, task }
}

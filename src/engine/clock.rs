use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running(u32),
    /// Reported once, on the tick that reaches zero.
    Expired,
    Stopped,
}

/// Remaining-seconds state of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    expiry_signalled: bool,
}

impl Countdown {
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            remaining: duration_seconds,
            expiry_signalled: false,
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.expiry_signalled
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.expiry_signalled {
            return TickOutcome::Stopped;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expiry_signalled = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining)
        }
    }
}

/// Timer task delivering one tick per period. The next tick is not scheduled
/// until the previous one has been taken, so a late consumer gets at most one
/// catch-up tick. Dropping the clock cancels the task.
pub struct CountdownClock {
    cancel: CancellationToken,
    ticks: mpsc::Receiver<()>,
    task: JoinHandle<()>,
}

impl CountdownClock {
    pub fn start(period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let (tx, ticks) = mpsc::channel(1);
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }
                tokio::select! {
                    _ = token.cancelled() => break,
                    taken = hand_over(&tx) => {
                        if taken.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("countdown clock stopped");
        });

        Self {
            cancel,
            ticks,
            task,
        }
    }

    /// Waits for the next tick. `None` once the clock has been stopped.
    pub async fn tick(&mut self) -> Option<()> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.ticks.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Sends one tick and waits until the receiver has taken it.
async fn hand_over(tx: &mpsc::Sender<()>) -> Result<(), mpsc::error::SendError<()>> {
    tx.send(()).await?;
    // Capacity is 1: a free slot means the tick was received.
    drop(tx.reserve().await?);
    Ok(())
}

impl Drop for CountdownClock {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

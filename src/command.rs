//! Submit remote commands and wait for them to finish.

use crate::remote::{CommandApi, CommandSpec, CommandStatus};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Default delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Default upper bound on how long to wait for a command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(600_000);

/// Shortest timeout honoured; anything below falls back to the default.
const MIN_TIMEOUT: Duration = Duration::from_millis(1000);

/// Time source for polling loops.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polling cadence and bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollSettings {
    pub fn from_millis(interval_ms: u64, timeout_ms: u64) -> Self {
        let timeout = Duration::from_millis(timeout_ms);
        Self {
            interval: Duration::from_millis(interval_ms),
            timeout: if timeout < MIN_TIMEOUT { DEFAULT_TIMEOUT } else { timeout },
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Drives one command at a time to a terminal status.
pub struct CommandOrchestrator<'a, A: ?Sized, C: ?Sized> {
    api: &'a A,
    clock: &'a C,
    settings: PollSettings,
}

impl<'a, A, C> CommandOrchestrator<'a, A, C>
where
    A: CommandApi + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(api: &'a A, clock: &'a C, settings: PollSettings) -> Self {
        Self { api, clock, settings }
    }

    /// Submit `spec` and block until it completes, fails or times out.
    ///
    /// Returns `true` only for `completed`. A submission without an id is a
    /// failure and is not polled. On timeout the remote command is left
    /// running.
    pub async fn submit_and_await(&self, spec: &CommandSpec) -> bool {
        let command = match self.api.submit_command(spec).await {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("Failed to submit {}: {}", spec.name, e);
                return false;
            }
        };

        let Some(id) = command.id else {
            tracing::warn!("{}: command did not return a valid id", spec.name);
            return false;
        };

        tracing::info!("{} command queued: id={}", spec.name, id);
        self.await_completion(id).await
    }

    /// Poll command `id` until it reaches a terminal status or times out.
    pub async fn await_completion(&self, id: i64) -> bool {
        let start = self.clock.now();

        while self.clock.now().duration_since(start) <= self.settings.timeout {
            let status = match self.api.command(id).await {
                Ok(command) => command.status,
                Err(e) => {
                    tracing::warn!("Failed to fetch status of command {}: {}", id, e);
                    return false;
                }
            };

            match status {
                CommandStatus::Completed => {
                    tracing::info!("Command {} completed", id);
                    return true;
                }
                CommandStatus::Failed => {
                    tracing::warn!("Command {} failed", id);
                    return false;
                }
                CommandStatus::Queued | CommandStatus::Running => {
                    tracing::debug!("Command {} status: {:?}", id, status);
                }
            }

            self.clock.sleep(self.settings.interval).await;
        }

        tracing::warn!(
            "Timeout: command {} did not complete within {} seconds",
            id,
            self.settings.timeout.as_secs()
        );
        false
    }
}

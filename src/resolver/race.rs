//! Concurrent provider race with a deadline.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{sleep_until, Instant};

use crate::lookup::{AddressProvider, AddressRecord, LookupError, ResolutionOutcome};
use crate::resolver::policy::RacePolicy;

/// Result reported by one provider task.
struct Completion {
    provider: String,
    result: Result<AddressRecord, LookupError>,
}

/// Provider tasks spawned for one resolution.
///
/// Dropping the scope aborts whatever is still running, so a resolution that
/// returns early (or is itself dropped) leaves no task behind.
struct TaskScope {
    handles: Vec<AbortHandle>,
}

impl TaskScope {
    fn with_capacity(n: usize) -> Self {
        Self {
            handles: Vec::with_capacity(n),
        }
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// Query every provider concurrently and settle on one outcome.
///
/// With [`RacePolicy::FailFast`] the first completion decides, success or
/// not. With [`RacePolicy::FirstSuccess`] the first success decides and the
/// first failure is only reported once every provider has failed. If nothing
/// decides the race before `timeout`, the outcome is [`LookupError::Timeout`].
pub async fn resolve(
    code: &str,
    providers: &[Arc<dyn AddressProvider>],
    timeout: Duration,
    policy: RacePolicy,
) -> ResolutionOutcome {
    if providers.is_empty() {
        return Err(LookupError::NoProviders);
    }

    let started = Instant::now();
    let deadline = started + timeout;

    // One slot per provider: a send can never block, even after we stop listening.
    let (tx, mut rx) = mpsc::channel::<Completion>(providers.len());
    let mut scope = TaskScope::with_capacity(providers.len());

    for provider in providers {
        let provider = Arc::clone(provider);
        let code = code.to_owned();
        let tx = tx.clone();
        let handle = tokio::spawn(async move {
            let result = provider.fetch(&code).await;
            let _ = tx.try_send(Completion {
                provider: provider.name().to_owned(),
                result,
            });
        });
        scope.handles.push(handle.abort_handle());
    }
    drop(tx);

    let mut first_failure: Option<LookupError> = None;

    loop {
        tokio::select! {
            completion = rx.recv() => {
                let Some(Completion { provider, result }) = completion else {
                    // Every task is gone; only reachable once all have failed or panicked.
                    return Err(first_failure.unwrap_or_else(|| {
                        LookupError::Transport("provider tasks ended without a result".into())
                    }));
                };

                match result {
                    Ok(record) => {
                        tracing::debug!(
                            provider = %provider,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Provider won the race"
                        );
                        return Ok(record);
                    }
                    Err(e) => {
                        tracing::debug!(
                            provider = %provider,
                            kind = %e.kind(),
                            error = %e,
                            "Provider failed"
                        );
                        match policy {
                            RacePolicy::FailFast => return Err(e),
                            RacePolicy::FirstSuccess => {
                                first_failure.get_or_insert(e);
                            }
                        }
                    }
                }
            }
            _ = sleep_until(deadline) => {
                tracing::debug!(
                    timeout_ms = timeout.as_millis() as u64,
                    providers = scope.handles.len(),
                    "Resolution timed out"
                );
                return Err(LookupError::Timeout(timeout));
            }
        }
    }
}

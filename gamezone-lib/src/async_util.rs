//! Drive a library task while forwarding its progress events.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

/// Upper bound on draining events after the task returns. Protects against
/// a sender clone leaked into a detached task.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `task` to completion, calling `on_event` for each event it emits.
///
/// Events still queued when the task returns are delivered before the
/// result is handed back.
pub async fn run_with_events<F, E, R>(
    task: F,
    mut events: mpsc::UnboundedReceiver<E>,
    mut on_event: impl FnMut(E),
) -> R
where
    F: Future<Output = R>,
{
    tokio::pin!(task);

    let result = loop {
        tokio::select! {
            r = &mut task => break Some(r),
            event = events.recv() => match event {
                Some(e) => on_event(e),
                None => break None,
            },
        }
    };

    match result {
        Some(r) => {
            let deadline = Instant::now() + DRAIN_TIMEOUT;
            loop {
                match tokio::time::timeout_at(deadline, events.recv()).await {
                    Ok(Some(e)) => on_event(e),
                    Ok(None) => break,
                    Err(_) => {
                        log::warn!(
                            "gave up draining events after {}s; a sender is still alive",
                            DRAIN_TIMEOUT.as_secs()
                        );
                        break;
                    }
                }
            }
            r
        }
        // Every sender dropped before the task finished; nothing left to forward.
        None => task.await,
    }
}

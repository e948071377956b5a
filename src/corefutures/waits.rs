use futures::task::Context;
use std::future::Future;
use std::pin::Pin;
use std::task::Poll;
use tracing::warn;
use crate::executor::context::with_context;
use super::trigger::Trigger;

/* Waits register with the executor the first time they are polled, through
 * the context of the coroutine being polled. After that they are just a
 * Trigger which the executor fires when the wait is over.
 */

enum WaitKind {
    Ticks(u64),
    Seconds(f64)
}

/// Future returned by `wait_ticks()`, `next_frame()` and `wait_seconds()`.
pub struct Wait {
    kind: WaitKind,
    trigger: Option<Trigger<()>>
}

impl Wait {
    fn new(kind: WaitKind) -> Wait {
        Wait { kind, trigger: None }
    }

    fn register(&self, trigger: &Trigger<()>) -> bool {
        let trigger = trigger.clone();
        match self.kind {
            WaitKind::Ticks(ticks) => with_context(|c| c.add_ticks_timer(ticks,move || trigger.fire(()))),
            WaitKind::Seconds(seconds) => with_context(|c| c.add_timer(seconds,move || trigger.fire(())))
        }.is_some()
    }
}

impl Future for Wait {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, ctx: &mut Context) -> Poll<()> {
        if self.trigger.is_none() {
            let trigger = Trigger::new();
            if !self.register(&trigger) {
                warn!("wait used outside a coroutine, continuing immediately");
                return Poll::Ready(());
            }
            self.trigger = Some(trigger);
        }
        match self.trigger.as_mut() {
            Some(trigger) => Pin::new(trigger).poll(ctx),
            None => Poll::Ready(())
        }
    }
}

/// Suspend the current coroutine until `ticks` frames later.
///
/// `wait_ticks(0)` lets everything else runnable this frame go first and then resumes within the same frame.
pub fn wait_ticks(ticks: u64) -> Wait { Wait::new(WaitKind::Ticks(ticks)) }

/// Suspend the current coroutine until the next frame. The equivalent of yielding null from a coroutine.
pub fn next_frame() -> Wait { wait_ticks(1) }

/// Suspend the current coroutine until at least `seconds` have passed on the executor's clock.
pub fn wait_seconds(seconds: f64) -> Wait { Wait::new(WaitKind::Seconds(seconds)) }

/// The index of the frame the calling coroutine is running in, or None when not called from a coroutine.
pub fn current_frame() -> Option<u64> {
    with_context(|c| c.tick_index())
}

use futures::task::ArcWake;
use std::sync::Arc;
use std::sync::atomic::{ AtomicBool, Ordering };
use super::handle::CoroutineHandle;
use super::link::Link;

/* Each coroutine has one CoroutineWaker behind all its Wakers. Waking it,
 * possibly from another thread, just queues the handle on the executor's
 * ready link. A coroutine is queued at most once between polls: the flag is
 * rearmed immediately before each poll so wakes during the poll still count.
 */

pub(crate) struct CoroutineWaker {
    handle: CoroutineHandle,
    ready: Link<CoroutineHandle>,
    queued: AtomicBool
}

impl CoroutineWaker {
    pub(crate) fn new(handle: &CoroutineHandle, ready: &Link<CoroutineHandle>) -> Arc<CoroutineWaker> {
        Arc::new(CoroutineWaker {
            handle: handle.clone(),
            ready: ready.clone(),
            queued: AtomicBool::new(false)
        })
    }

    pub(crate) fn rearm(&self) {
        self.queued.store(false,Ordering::SeqCst);
    }
}

impl ArcWake for CoroutineWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        if !arc_self.queued.swap(true,Ordering::SeqCst) {
            arc_self.ready.add(arc_self.handle.clone());
        }
    }
}

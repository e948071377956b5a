use std::cell::RefCell;
use super::handle::CoroutineHandle;
use super::link::Link;
use super::request::Request;

/* While the executor polls a coroutine, that coroutine's context is installed
 * in a thread local. This is what lets the free-standing waits (next_frame(),
 * wait_seconds(), ...) reach the executor without being passed anything. The
 * previous context is restored on exit, even on unwind, so executors may nest.
 */

thread_local! {
    static CURRENT: RefCell<Option<CoroutineContext>> = RefCell::new(None);
}

#[derive(Clone)]
pub(crate) struct CoroutineContext {
    handle: CoroutineHandle,
    requests: Link<Request>,
    tick_index: u64
}

impl CoroutineContext {
    pub(crate) fn new(handle: &CoroutineHandle, requests: &Link<Request>, tick_index: u64) -> CoroutineContext {
        CoroutineContext {
            handle: handle.clone(),
            requests: requests.clone(),
            tick_index
        }
    }

    pub(crate) fn tick_index(&self) -> u64 { self.tick_index }

    pub(crate) fn add_ticks_timer<T>(&self, ticks: u64, callback: T) where T: FnOnce() + 'static {
        self.requests.add(Request::Ticks(self.handle.clone(),self.tick_index+ticks,Box::new(callback)));
    }

    pub(crate) fn add_timer<T>(&self, timeout: f64, callback: T) where T: FnOnce() + 'static {
        self.requests.add(Request::Timer(self.handle.clone(),timeout,Box::new(callback)));
    }
}

pub(crate) struct ContextGuard(Option<CoroutineContext>);

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.0.take();
        CURRENT.with(|c| { *c.borrow_mut() = previous; });
    }
}

pub(crate) fn enter(context: CoroutineContext) -> ContextGuard {
    ContextGuard(CURRENT.with(|c| c.borrow_mut().replace(context)))
}

pub(crate) fn with_context<F,R>(cb: F) -> Option<R> where F: FnOnce(&CoroutineContext) -> R {
    let context = CURRENT.with(|c| c.borrow().clone());
    context.as_ref().map(cb)
}

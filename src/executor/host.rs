use hashbrown::HashSet;
use std::future::Future;
use std::sync::{ Arc, Mutex };
use tracing::trace;
use crate::task::task::Coroutine;
use super::handle::CoroutineHandle;
use super::link::Link;
use super::request::Request;

/// A clonable handle for starting and stopping coroutines on an `Executor`.
///
/// This is what actions and queues are given to start their work. Starting and stopping only queue a request: the
/// executor acts on it during its next tick (or the current one, if called from inside a running coroutine). A Host is
/// tied to the executor's thread.
#[derive(Clone)]
pub struct Host {
    requests: Link<Request>,
    alive: Arc<Mutex<HashSet<CoroutineHandle>>>
}

impl Host {
    pub(crate) fn new(requests: &Link<Request>, alive: &Arc<Mutex<HashSet<CoroutineHandle>>>) -> Host {
        Host {
            requests: requests.clone(),
            alive: alive.clone()
        }
    }

    /// Start running the given future as a coroutine.
    pub fn start<T>(&self, future: T, name: &str) -> CoroutineHandle where T: Future<Output=()> + 'static {
        self.start_pin(Box::pin(future),name)
    }

    /// Start running the given pinned future as a coroutine.
    pub fn start_pin(&self, future: Coroutine, name: &str) -> CoroutineHandle {
        let handle = CoroutineHandle::new();
        trace!(coroutine=%handle,coroutine_name=name,"coroutine submitted");
        lock!(self.alive).insert(handle.clone());
        self.requests.add(Request::Start(handle.clone(),name.to_string(),future));
        handle
    }

    /// Stop the given coroutine, dropping it at its current suspension point. Unknown handles are ignored.
    pub fn stop(&self, handle: &CoroutineHandle) {
        self.requests.add(Request::Stop(handle.clone()));
    }

    /// True from submission until the coroutine completes or is stopped.
    pub fn is_alive(&self, handle: &CoroutineHandle) -> bool {
        lock!(self.alive).contains(handle)
    }

    /// Number of coroutines submitted and not yet completed or stopped.
    pub fn alive_count(&self) -> usize {
        lock!(self.alive).len()
    }
}

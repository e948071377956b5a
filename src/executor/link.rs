use std::sync::{ Arc, Mutex };

/* A Link is a clonable back-channel into the executor. Anything holding a copy
 * (hosts, coroutine contexts, wakers) can add to it at any time; the executor
 * drains it at the points in a tick where it is safe to act on the contents.
 */

pub(crate) struct Link<T>(Arc<Mutex<Vec<T>>>);

// derive would demand T: Clone
impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        Link(self.0.clone())
    }
}

impl<T> Link<T> {
    pub(crate) fn new() -> Link<T> {
        Link(Arc::new(Mutex::new(Vec::new())))
    }

    pub(crate) fn add(&self, item: T) {
        lock!(self.0).push(item);
    }

    pub(crate) fn drain(&self) -> Vec<T> {
        std::mem::replace(&mut *lock!(self.0),Vec::new())
    }

    pub(crate) fn is_empty(&self) -> bool {
        lock!(self.0).is_empty()
    }
}

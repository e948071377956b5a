use futures::task::{ Context, Waker };
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{ Arc, Mutex };
use std::task::Poll;

struct TriggerState<T> {
    value: Option<T>,
    wakers: Vec<Waker>
}

/// A Trigger is pending until `fire(value)` is called, after which it is ready with (a clone of) that value.
///
/// Any number of clones may be awaited, from any number of coroutines, and `fire()` may be called from any thread.
/// Only the first `fire()` counts. Used for the executor's own waits but handy for tasks which must wait on some
/// outside event, such as a script step or a test.
pub struct Trigger<T>(Arc<Mutex<TriggerState<T>>>);

impl<T> fmt::Debug for Trigger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"Trigger({})",if self.is_fired() { "fired" } else { "pending" })
    }
}

// derive would demand T: Clone
impl<T> Clone for Trigger<T> {
    fn clone(&self) -> Self {
        Trigger(self.0.clone())
    }
}

impl<T> Default for Trigger<T> {
    fn default() -> Self { Trigger::new() }
}

impl<T> Trigger<T> {
    /// Create Trigger in pending state.
    pub fn new() -> Trigger<T> {
        Trigger(Arc::new(Mutex::new(TriggerState {
            value: None,
            wakers: vec![]
        })))
    }

    /// Fire the trigger, waking everything awaiting it. Later calls are ignored.
    pub fn fire(&self, value: T) {
        let wakers = {
            let mut state = lock!(self.0);
            if state.value.is_some() { return; }
            state.value = Some(value);
            state.wakers.drain(..).collect::<Vec<_>>()
        };
        for waker in wakers {
            waker.wake();
        }
    }

    pub fn is_fired(&self) -> bool {
        lock!(self.0).value.is_some()
    }
}

impl<T> Future for Trigger<T> where T: Clone {
    type Output = T;

    fn poll(self: Pin<&mut Self>, ctx: &mut Context) -> Poll<T> {
        let mut state = lock!(self.0);
        if let Some(value) = state.value.clone() {
            return Poll::Ready(value);
        }
        if !state.wakers.iter().any(|w| w.will_wake(ctx.waker())) {
            state.wakers.push(ctx.waker().clone());
        }
        Poll::Pending
    }
}

#[cfg(test)]
mod test {
    use futures::executor::block_on;
    use futures::future::join;
    use std::thread;
    use super::*;

    #[test]
    pub fn test_trigger_fires_once() {
        let t = Trigger::new();
        assert!(!t.is_fired());
        t.fire(3);
        t.fire(4);
        assert!(t.is_fired());
        assert_eq!(3,block_on(t.clone()));
        assert_eq!(3,block_on(t));
    }

    #[test]
    pub fn test_trigger_many_waiters() {
        let t = Trigger::new();
        let t2 = t.clone();
        let firer = thread::spawn(move || {
            thread::sleep(std::time::Duration::from_millis(5));
            t2.fire("go".to_string());
        });
        let (a,b) = block_on(join(t.clone(),t.clone()));
        assert_eq!("go",a);
        assert_eq!("go",b);
        firer.join().expect("firer");
    }
}

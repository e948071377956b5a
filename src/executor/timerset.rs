use std::collections::BTreeMap;
use super::handle::CoroutineHandle;

/* A TimerSet holds callbacks keyed by when they are due, in whatever units the
 * key type measures (tick indexes or clock times). Each timer belongs to a
 * coroutine. Timers of coroutines which have gone away are dropped rather than
 * run, either eagerly through forget() or lazily when they come due.
 */

struct Timeout {
    owner: CoroutineHandle,
    callback: Box<dyn FnOnce() + 'static>
}

pub(super) struct TimerSet<T> where T: Ord {
    timeouts: BTreeMap<T,Vec<Timeout>>
}

impl<T> TimerSet<T> where T: Ord + Clone {
    pub(super) fn new() -> TimerSet<T> {
        TimerSet {
            timeouts: BTreeMap::new()
        }
    }

    #[cfg(test)]
    pub(super) fn add<C>(&mut self, owner: &CoroutineHandle, when: T, callback: C) where C: FnOnce() + 'static {
        self.add_boxed(owner,when,Box::new(callback));
    }

    pub(super) fn add_boxed(&mut self, owner: &CoroutineHandle, when: T, callback: Box<dyn FnOnce() + 'static>) {
        self.timeouts.entry(when).or_insert_with(Vec::new).push(Timeout {
            owner: owner.clone(),
            callback
        });
    }

    /* returns number of callbacks run */
    pub(super) fn run<F>(&mut self, now: &T, alive: F) -> usize where F: Fn(&CoroutineHandle) -> bool {
        let mut fired = 0;
        while let Some(min) = self.min() {
            if &min > now { break; }
            if let Some(timeouts) = self.timeouts.remove(&min) {
                for timeout in timeouts {
                    if alive(&timeout.owner) {
                        (timeout.callback)();
                        fired += 1;
                    }
                }
            }
        }
        fired
    }

    pub(super) fn forget(&mut self, owner: &CoroutineHandle) {
        for list in self.timeouts.values_mut() {
            list.retain(|t| &t.owner != owner);
        }
        self.timeouts.retain(|_,list| list.len() > 0);
    }

    pub(super) fn min(&self) -> Option<T> {
        self.timeouts.keys().next().cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.timeouts.values().map(|x| x.len()).sum()
    }
}

#[cfg(test)]
mod test {
    use ordered_float::OrderedFloat;
    use std::sync::{ Arc, Mutex };
    use super::*;

    #[test]
    pub fn test_timer() {
        let owner = CoroutineHandle::new();
        let mut timers : TimerSet<OrderedFloat<f64>> = TimerSet::new();
        assert_eq!(0,timers.run(&OrderedFloat(0.),|_| true));
        let shared = Arc::new(Mutex::new(false));
        let shared2 = shared.clone();
        assert_eq!(None,timers.min());
        timers.add(&owner,OrderedFloat(1.),move || { *shared2.lock().unwrap() = true });
        assert_eq!(Some(OrderedFloat(1.)),timers.min());
        timers.add(&owner,OrderedFloat(0.1),|| {});
        assert_eq!(Some(OrderedFloat(0.1)),timers.min());
        timers.add(&owner,OrderedFloat(1.1),|| {});
        assert_eq!(3,timers.len());
        assert_eq!(1,timers.run(&OrderedFloat(0.5),|_| true));
        assert!(!*shared.lock().unwrap());
        assert_eq!(1,timers.run(&OrderedFloat(1.),|_| true));
        assert!(*shared.lock().unwrap());
        assert_eq!(Some(OrderedFloat(1.1)),timers.min());
        timers.run(&OrderedFloat(1.5),|_| true);
        assert_eq!(0,timers.len());
        assert_eq!(None,timers.min());
    }

    #[test]
    pub fn test_dead_owners() {
        let h1 = CoroutineHandle::new();
        let h2 = CoroutineHandle::new();
        let h3 = CoroutineHandle::new();
        let mut timers : TimerSet<u64> = TimerSet::new();
        let count = Arc::new(Mutex::new(0));
        for (h,when) in &[(&h1,1),(&h2,2),(&h3,2)] {
            let count2 = count.clone();
            timers.add(h,*when,move || { *count2.lock().unwrap() += 1; });
        }
        timers.forget(&h1);
        assert_eq!(2,timers.len());
        assert_eq!(Some(2),timers.min());
        /* h3 died without forget(): skipped when due */
        assert_eq!(1,timers.run(&5,|h| h != &h3));
        assert_eq!(1,*count.lock().unwrap());
        assert_eq!(0,timers.len());
    }
}

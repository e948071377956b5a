use ordered_float::OrderedFloat;
use crate::integration::integration::SleepQuantity;
use super::handle::CoroutineHandle;
use super::timerset::TimerSet;

/* ExecutorTimings keeps the executor's notion of time: the index of the
 * current tick (frame) and the two kinds of pending wait, by frame count and
 * by clock time.
 */

pub(crate) struct ExecutorTimings {
    timers: TimerSet<OrderedFloat<f64>>,
    ticks: TimerSet<u64>,
    tick_index: u64
}

impl ExecutorTimings {
    pub(crate) fn new() -> ExecutorTimings {
        ExecutorTimings {
            timers: TimerSet::new(),
            ticks: TimerSet::new(),
            tick_index: 0
        }
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick_index += 1;
    }

    pub(crate) fn get_tick_index(&self) -> u64 { self.tick_index }

    pub(crate) fn add_timer(&mut self, owner: &CoroutineHandle, now: f64, timeout: f64, callback: Box<dyn FnOnce() + 'static>) {
        self.timers.add_boxed(owner,OrderedFloat(now+timeout),callback);
    }

    pub(crate) fn add_tick(&mut self, owner: &CoroutineHandle, tick: u64, callback: Box<dyn FnOnce() + 'static>) {
        self.ticks.add_boxed(owner,tick,callback);
    }

    pub(crate) fn run<F>(&mut self, now: f64, alive: F) -> usize where F: Fn(&CoroutineHandle) -> bool {
        let tick_index = self.tick_index;
        self.timers.run(&OrderedFloat(now),&alive) + self.ticks.run(&tick_index,&alive)
    }

    pub(crate) fn forget(&mut self, owner: &CoroutineHandle) {
        self.timers.forget(owner);
        self.ticks.forget(owner);
    }

    pub(crate) fn calculate_sleep(&self, now: f64) -> SleepQuantity {
        if self.ticks.len() > 0 {
            SleepQuantity::None
        } else if let Some(timer) = self.timers.min() {
            SleepQuantity::Time((timer.0-now).max(0.))
        } else {
            SleepQuantity::Forever
        }
    }
}

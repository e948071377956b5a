/// What the executor would like the host to do between ticks.
///
/// The executor is driven by the host (typically once per rendered frame). After each tick it reports how long the
/// host could wait before the next tick is worthwhile. Frame-locked hosts can ignore this; hosts which only tick on
/// demand can use it to idle.
#[derive(Clone,Debug,PartialEq)]
pub enum SleepQuantity {
    /// Something is runnable or waiting on a frame count. Tick again on the next frame.
    None,
    /// Nothing can happen until this many time units have elapsed.
    Time(f64),
    /// Nothing can happen until something outside the executor wakes a coroutine or starts a new one.
    Forever
}

/// The host side of an executor: a clock and somewhere to report idleness.
///
/// Time units are whatever the integration chooses. The waits in this crate (`wait_seconds()`) assume seconds.
pub trait Integration {
    /// The current time.
    fn current_time(&self) -> f64;

    /// Called once at the end of every tick.
    fn sleep(&self, quantity: SleepQuantity);
}

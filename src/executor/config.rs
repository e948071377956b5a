/* An ExecutorConfig bounds how much work one tick may do. Both limits exist
 * because the environment is non-preemptive: a coroutine which keeps yielding
 * with wait_ticks(0) would otherwise hold the frame forever.
 */

/// Settings which bound the work done by a single `Executor::tick()`.
#[derive(Clone,Debug,PartialEq)]
pub struct ExecutorConfig {
    slice: f64,
    max_passes: usize
}

impl ExecutorConfig {
    /// `slice` is the time, in the integration's units, after which no further passes are started in this tick.
    /// `max_passes` caps the number of service-and-poll passes per tick regardless of time. It is at least one.
    pub fn new(slice: f64, max_passes: usize) -> ExecutorConfig {
        ExecutorConfig {
            slice,
            max_passes: max_passes.max(1)
        }
    }

    pub fn get_slice(&self) -> f64 { self.slice }
    pub fn get_max_passes(&self) -> usize { self.max_passes }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        ExecutorConfig::new(0.010,64)
    }
}

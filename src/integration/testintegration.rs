use std::sync::{ Arc, Mutex, MutexGuard };
use super::integration::{ Integration, SleepQuantity };

/* TestIntegration is a deterministic clock for tests. Time only moves when
 * set, and the most recent sleeps reported by the executor are recorded so
 * tests can check what the executor asked for.
 */

/* Sleeps are reported once per tick, so the record is capped. */
const MAX_SLEEPS: usize = 256;

/// A hand-driven clock which records recent sleep requests. For tests and tools, not for real hosts.
///
/// Only the last `MAX_SLEEPS` (256) sleeps are kept. Clones share the same clock, so keep one and hand a clone to
/// the `Executor`.
#[derive(Clone)]
pub struct TestIntegration {
    timer: Arc<Mutex<f64>>,
    sleeps: Arc<Mutex<Vec<SleepQuantity>>>
}

impl TestIntegration {
    pub fn new() -> TestIntegration {
        TestIntegration {
            timer: Arc::new(Mutex::new(0.)),
            sleeps: Arc::new(Mutex::new(vec![]))
        }
    }

    pub fn get_time(&self) -> f64 { *lock!(self.timer) }
    pub fn set_time(&self, t: f64) { *lock!(self.timer) = t; }
    pub fn advance(&self, dt: f64) { *lock!(self.timer) += dt; }

    /// Recent sleeps, oldest first. Tests may drain this.
    pub fn get_sleeps(&self) -> MutexGuard<'_,Vec<SleepQuantity>> { lock!(self.sleeps) }

    pub fn last_sleep(&self) -> Option<SleepQuantity> { lock!(self.sleeps).last().cloned() }
}

impl Integration for TestIntegration {
    fn current_time(&self) -> f64 { *lock!(self.timer) }

    fn sleep(&self, quantity: SleepQuantity) {
        let mut sleeps = lock!(self.sleeps);
        if sleeps.len() >= MAX_SLEEPS {
            let excess = sleeps.len()+1-MAX_SLEEPS;
            sleeps.drain(..excess);
        }
        sleeps.push(quantity);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_shared_clock() {
        let integration = TestIntegration::new();
        let other = integration.clone();
        other.set_time(2.);
        other.advance(0.5);
        assert_eq!(2.5,integration.current_time());
        integration.sleep(SleepQuantity::Forever);
        assert_eq!(Some(SleepQuantity::Forever),other.last_sleep());
        assert_eq!(1,other.get_sleeps().len());
    }

    #[test]
    pub fn test_sleeps_capped() {
        let integration = TestIntegration::new();
        for i in 0..(MAX_SLEEPS*3) {
            integration.sleep(SleepQuantity::Time(i as f64));
        }
        assert_eq!(MAX_SLEEPS,integration.get_sleeps().len());
        assert_eq!(Some(SleepQuantity::Time((MAX_SLEEPS*2) as f64)),integration.get_sleeps().first().cloned());
        assert_eq!(Some(SleepQuantity::Time((MAX_SLEEPS*3-1) as f64)),integration.last_sleep());
        integration.get_sleeps().clear();
        integration.sleep(SleepQuantity::None);
        assert_eq!(vec![SleepQuantity::None],*integration.get_sleeps());
    }
}

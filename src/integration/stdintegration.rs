use std::sync::{ Arc, Mutex };
use std::time::Instant;
use super::integration::{ Integration, SleepQuantity };

/// Wall-clock integration: time is seconds since creation.
///
/// The latest sleep request is kept for hosts which want to idle when nothing is scheduled.
#[derive(Clone)]
pub struct StdIntegration {
    epoch: Instant,
    last_sleep: Arc<Mutex<Option<SleepQuantity>>>
}

impl StdIntegration {
    pub fn new() -> StdIntegration {
        StdIntegration {
            epoch: Instant::now(),
            last_sleep: Arc::new(Mutex::new(None))
        }
    }

    pub fn last_sleep(&self) -> Option<SleepQuantity> { lock!(self.last_sleep).clone() }
}

impl Integration for StdIntegration {
    fn current_time(&self) -> f64 { self.epoch.elapsed().as_secs_f64() }
    fn sleep(&self, quantity: SleepQuantity) { *lock!(self.last_sleep) = Some(quantity); }
}

use std::time::Duration;

/// Settings for an `ActionQueue`.
#[derive(Clone,Debug,PartialEq)]
pub struct QueueConfig {
    name: String,
    drain_poll_interval: Duration
}

impl QueueConfig {
    /// `name` labels the queue in logs and errors. A producer blocked in `wait_until_drained()` rechecks the queue at
    /// least every `drain_poll_interval` even if it hears nothing.
    pub fn new(name: &str, drain_poll_interval: Duration) -> QueueConfig {
        QueueConfig {
            name: name.to_string(),
            drain_poll_interval
        }
    }

    pub fn get_name(&self) -> &str { &self.name }
    pub fn get_drain_poll_interval(&self) -> Duration { self.drain_poll_interval }
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig::new("actions",Duration::from_millis(30))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_default() {
        let cfg = QueueConfig::default();
        assert_eq!("actions",cfg.get_name());
        assert_eq!(Duration::from_millis(30),cfg.get_drain_poll_interval());
    }
}

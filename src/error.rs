use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong when building actions or waiting on a queue.
///
/// Scheduling itself never fails: a second start of a running action is reported by
/// `Action::try_start()` returning false, and a faulting task is recorded on its action.
#[derive(Debug,Error,Clone,PartialEq,Eq)]
pub enum Error {
    /// An action was built from an empty list of tasks.
    #[error("an action needs at least one task")]
    NoTasks,

    /// A producer waited for a queue to drain but the queue was stopped with work outstanding.
    #[error("action queue '{0}' was stopped before it drained")]
    QueueStopped(String),

    /// A bounded wait for a queue to drain ran out of time.
    #[error("action queue '{0}' did not drain within {1:?}")]
    DrainTimeout(String,Duration)
}

pub type Result<T> = std::result::Result<T,Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_messages() {
        assert_eq!("an action needs at least one task",Error::NoTasks.to_string());
        let e = Error::QueueStopped("stacks".to_string());
        assert_eq!("action queue 'stacks' was stopped before it drained",e.to_string());
        let e = Error::DrainTimeout("stacks".to_string(),Duration::from_millis(10));
        assert_eq!("action queue 'stacks' did not drain within 10ms",e.to_string());
    }
}

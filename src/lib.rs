//! Serialise groups of cooperative coroutines, requested from any thread, onto one frame-driven consumer thread.
//!
//! Producers build an [`Action`] out of one or more [`Task`]s and [`enqueue`](ActionQueue::enqueue) it. The thread
//! which owns the [`Executor`] ticks it once per frame and pumps the [`ActionQueue`], which starts each action's
//! tasks together and only moves to the next action once all of them are done.
//!
//! ```no_run
//! use coroutine_actions::{ Action, ActionQueue, Executor, StdIntegration, Task1, next_frame };
//! use std::time::Duration;
//!
//! let queue = ActionQueue::new();
//! queue.enqueue(Action::single(Task1::new(|frames: u32| async move {
//!     for _ in 0..frames { next_frame().await; }
//! },10)));
//! let mut executor = Executor::new(StdIntegration::new());
//! executor.start(queue.run_until_empty(&executor.host()),"drain");
//! executor.run_until(Duration::from_millis(16),|x| x.is_idle());
//! ```

#[macro_use]
mod macros;

mod error;

pub mod integration {
    pub mod integration;
    pub mod stdintegration;
    pub mod testintegration;
}

pub(crate) mod executor {
    pub(crate) mod config;
    pub(crate) mod container;
    pub(crate) mod context;
    pub(crate) mod executor;
    pub(crate) mod handle;
    pub(crate) mod host;
    pub(crate) mod link;
    pub(crate) mod request;
    pub(crate) mod timerset;
    pub(crate) mod timings;
    pub(crate) mod wake;
}

pub(crate) mod corefutures {
    pub(crate) mod trigger;
    pub(crate) mod waits;
}

pub(crate) mod task {
    pub(crate) mod task;
    #[cfg(test)]
    pub(crate) mod faketask;
}

pub(crate) mod action {
    pub(crate) mod action;
    pub(crate) mod fault;
}

pub(crate) mod queue {
    pub(crate) mod actionqueue;
    pub(crate) mod config;
}

pub use crate::action::action::{ Action, ActionState };
pub use crate::action::fault::{ ActionFault, TaskFault };
pub use crate::corefutures::trigger::Trigger;
pub use crate::corefutures::waits::{ current_frame, next_frame, wait_seconds, wait_ticks, Wait };
pub use crate::error::{ Error, Result };
pub use crate::executor::config::ExecutorConfig;
pub use crate::executor::executor::Executor;
pub use crate::executor::handle::CoroutineHandle;
pub use crate::executor::host::Host;
pub use crate::integration::integration::{ Integration, SleepQuantity };
pub use crate::integration::stdintegration::StdIntegration;
pub use crate::integration::testintegration::TestIntegration;
pub use crate::queue::actionqueue::ActionQueue;
pub use crate::queue::config::QueueConfig;
pub use crate::task::task::{ Coroutine, Task, Task0, Task1, Task2, Task3, Task4 };

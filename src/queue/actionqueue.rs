use std::collections::VecDeque;
use std::future::Future;
use std::mem;
use std::sync::{ Arc, Condvar, Mutex, MutexGuard };
use std::time::{ Duration, Instant };
use tracing::{ debug, info, warn };
use crate::action::action::{ Action, ActionState };
use crate::action::fault::ActionFault;
use crate::corefutures::waits::next_frame;
use crate::error::{ Error, Result };
use crate::executor::host::Host;
use super::config::QueueConfig;

struct QueueState {
    pending: VecDeque<Action>,
    current: Option<Arc<Action>>,
    starting: bool,
    stopping: bool,
    completed: u64,
    faults: Vec<ActionFault>
}

impl QueueState {
    fn is_empty(&self) -> bool { self.pending.is_empty() && self.current.is_none() }
}

struct QueueShared {
    config: QueueConfig,
    state: Mutex<QueueState>,
    drained: Condvar
}

/// A FIFO of actions, run one at a time.
///
/// Any thread may `enqueue()`. One consumer, the thread owning the executor, calls `pump()` once per frame (or runs
/// `run()` or `run_until_empty()` as a coroutine, which does that for it). Each pump starts the next action only
/// once the current one has stopped running, so actions never overlap and run in the order they were enqueued.
///
/// Clones share the same queue.
#[derive(Clone)]
pub struct ActionQueue(Arc<QueueShared>);

impl ActionQueue {
    pub fn new() -> ActionQueue { ActionQueue::with_config(QueueConfig::default()) }

    pub fn with_config(config: QueueConfig) -> ActionQueue {
        ActionQueue(Arc::new(QueueShared {
            config,
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                current: None,
                starting: false,
                stopping: false,
                completed: 0,
                faults: vec![]
            }),
            drained: Condvar::new()
        }))
    }

    pub fn name(&self) -> &str { self.0.config.get_name() }

    fn state(&self) -> MutexGuard<'_,QueueState> { lock!(self.0.state) }

    /// Add an action to the back of the queue. Never blocks beyond a short lock, from any thread.
    pub fn enqueue(&self, action: Action) {
        let mut state = self.state();
        debug!(queue=%self.name(),action=action.identity(),action_name=%action.name(),pending=state.pending.len()+1,"action enqueued");
        state.pending.push_back(action);
    }

    /// True when nothing is pending and there is no current action.
    pub fn is_empty(&self) -> bool { self.state().is_empty() }

    /// Number of actions waiting behind the current one.
    pub fn len(&self) -> usize { self.state().pending.len() }

    pub fn is_stopping(&self) -> bool { self.state().stopping }

    /// Actions which have run to the end (with or without faults) rather than being stopped.
    pub fn completed(&self) -> u64 { self.state().completed }

    /// State of the current action, if any.
    pub fn current_state(&self) -> Option<ActionState> {
        self.state().current.as_ref().map(|a| a.state())
    }

    /// Faults collected from finished actions since last asked.
    pub fn take_faults(&self) -> Vec<ActionFault> {
        mem::replace(&mut self.state().faults,vec![])
    }

    fn retire(&self, state: &mut QueueState, action: &Action) {
        match action.state() {
            ActionState::Stopped => {
                debug!(queue=%self.name(),action=action.identity(),action_name=%action.name(),"stopped action retired");
                return;
            },
            ActionState::Faulted => {
                for fault in action.faults() {
                    let fault = ActionFault::new(action.name(),action.identity(),fault);
                    warn!(queue=%self.name(),action=action.identity(),"action faulted: {}",fault);
                    state.faults.push(fault);
                }
            },
            _ => {}
        }
        debug!(queue=%self.name(),action=action.identity(),action_name=%action.name(),"action complete");
        state.completed += 1;
    }

    /// Move the queue on by at most one action. Call from the executor's thread, once per frame.
    ///
    /// Does nothing while the current action runs. Otherwise the current action is retired and, unless the queue is
    /// stopping, the next one is started. The queue is not locked while the action starts, so task entry points may
    /// use the queue.
    pub fn pump(&self, host: &Host) {
        let next = {
            let mut state = self.state();
            if state.starting { return; }
            if let Some(current) = &state.current {
                if current.is_running() { return; }
            }
            if let Some(finished) = state.current.take() {
                self.retire(&mut state,&finished);
            }
            let next = if state.stopping { None } else { state.pending.pop_front() };
            match next {
                Some(next) => {
                    debug!(queue=%self.name(),action=next.identity(),action_name=%next.name(),pending=state.pending.len(),"action advancing");
                    let next = Arc::new(next);
                    state.current = Some(next.clone());
                    state.starting = true;
                    next
                },
                None => {
                    if state.is_empty() {
                        self.0.drained.notify_all();
                    }
                    return;
                }
            }
        };
        next.try_start(host);
        let stopping = {
            let mut state = self.state();
            state.starting = false;
            state.stopping
        };
        /* an entry point stopped the queue while the action was starting */
        if stopping {
            next.stop();
        }
    }

    /// A coroutine which pumps the queue every frame until the queue is stopped.
    pub fn run(&self, host: &Host) -> impl Future<Output=()> + 'static {
        let queue = self.clone();
        let host = host.clone();
        async move {
            info!(queue=%queue.name(),"queue running");
            while !queue.is_stopping() {
                queue.pump(&host);
                next_frame().await;
            }
            info!(queue=%queue.name(),"queue run ended");
        }
    }

    /// A coroutine which pumps the queue every frame until it is empty or stopped.
    pub fn run_until_empty(&self, host: &Host) -> impl Future<Output=()> + 'static {
        let queue = self.clone();
        let host = host.clone();
        async move {
            while !queue.is_stopping() && !queue.is_empty() {
                queue.pump(&host);
                if queue.is_empty() { break; }
                next_frame().await;
            }
            debug!(queue=%queue.name(),"queue drained");
        }
    }

    /// Stop the current action, if any, and stop advancing. Pending actions stay queued until `resume()` or `clear()`.
    pub fn stop(&self) {
        let current = {
            let mut state = self.state();
            state.stopping = true;
            info!(queue=%self.name(),pending=state.pending.len(),"queue stopping");
            self.0.drained.notify_all();
            state.current.clone()
        };
        if let Some(current) = current {
            current.stop();
        }
    }

    /// Let a stopped queue advance again.
    pub fn resume(&self) {
        let mut state = self.state();
        if state.stopping {
            info!(queue=%self.name(),pending=state.pending.len(),"queue resuming");
        }
        state.stopping = false;
    }

    /// Drop every pending action, returning how many there were. The current action is unaffected.
    pub fn clear(&self) -> usize {
        let mut state = self.state();
        let dropped = state.pending.len();
        state.pending.clear();
        if dropped > 0 {
            info!(queue=%self.name(),dropped,"pending actions cleared");
        }
        if state.is_empty() {
            self.0.drained.notify_all();
        }
        dropped
    }

    fn wait_drained(&self, timeout: Option<Duration>) -> Result<()> {
        let deadline = timeout.map(|t| Instant::now()+t);
        let mut state = self.state();
        loop {
            if state.is_empty() { return Ok(()); }
            if state.stopping {
                return Err(Error::QueueStopped(self.name().to_string()));
            }
            let mut interval = self.0.config.get_drain_poll_interval();
            if let (Some(deadline),Some(timeout)) = (deadline,timeout) {
                let now = Instant::now();
                if now >= deadline {
                    return Err(Error::DrainTimeout(self.name().to_string(),timeout));
                }
                interval = interval.min(deadline-now);
            }
            state = match self.0.drained.wait_timeout(state,interval) {
                Ok((state,_)) => state,
                Err(_) => { panic!("poisoned lock waiting on queue {}",self.name()); }
            };
        }
    }

    /// Block until the queue is empty. Call from a producer thread, never from the executor's thread.
    ///
    /// Fails if the queue is stopped while work is outstanding.
    pub fn wait_until_drained(&self) -> Result<()> {
        self.wait_drained(None)
    }

    /// As `wait_until_drained()` but gives up after `timeout`.
    pub fn wait_until_drained_for(&self, timeout: Duration) -> Result<()> {
        self.wait_drained(Some(timeout))
    }
}

impl Default for ActionQueue {
    fn default() -> Self { ActionQueue::new() }
}

use futures::future::{ AbortHandle, Abortable };
use futures::FutureExt;
use std::fmt;
use std::panic::{ self, AssertUnwindSafe };
use std::sync::{ Arc, Mutex };
use tracing::{ debug, trace, warn };
use crate::error::{ Error, Result };
use crate::executor::handle::CoroutineHandle;
use crate::executor::host::Host;
use crate::task::task::Task;
use super::fault::TaskFault;

identitynumber!(IDENTITY);

/// Where an action is in its life. Derived from its slots each time it is asked.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub enum ActionState {
    /// Never started.
    Idle,
    /// At least one task still running.
    Running,
    /// Every task of the latest run completed.
    Finished,
    /// The latest run was stopped.
    Stopped,
    /// The latest run ended but at least one task panicked.
    Faulted
}

struct RunningTask {
    handle: CoroutineHandle,
    abort: AbortHandle
}

struct ActionSlots {
    running: Vec<Option<RunningTask>>,
    faults: Vec<TaskFault>,
    generation: u64,
    started: bool,
    stopped: bool
}

/* Each task coroutine carries a SlotGuard. However the coroutine ends (it
 * completes, panics, is aborted or is dropped by its executor) the guard
 * clears its slot. Slots belonging to an earlier run are left alone.
 */
struct SlotGuard {
    slots: Arc<Mutex<ActionSlots>>,
    generation: u64,
    index: usize,
    fault: Option<TaskFault>
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let mut slots = lock!(self.slots);
        if slots.generation != self.generation { return; }
        if let Some(slot) = slots.running.get_mut(self.index) {
            *slot = None;
        }
        if let Some(fault) = self.fault.take() {
            slots.faults.push(fault);
        }
    }
}

/// A group of tasks which start together and are done when all of them are done.
///
/// An action is built on any thread (usually by whoever decides an animation is needed) and started on the executor's
/// thread with `try_start()`. It can be stopped from anywhere. Once its run is over it may be started again.
pub struct Action {
    identity: u64,
    name: String,
    tasks: Vec<Box<dyn Task>>,
    slots: Arc<Mutex<ActionSlots>>
}

impl Action {
    /// Create an action from its tasks. At least one task is needed.
    pub fn new<I>(tasks: I) -> Result<Action> where I: IntoIterator<Item=Box<dyn Task>> {
        let identity = IDENTITY.next();
        Action::build(identity,&format!("action-{}",identity),tasks)
    }

    /// As `new()`, with a name to show in logs and faults.
    pub fn named<I>(name: &str, tasks: I) -> Result<Action> where I: IntoIterator<Item=Box<dyn Task>> {
        Action::build(IDENTITY.next(),name,tasks)
    }

    /// An action of exactly one task.
    pub fn single<T>(task: T) -> Action where T: Task + 'static {
        let identity = IDENTITY.next();
        Action::make(identity,&format!("action-{}",identity),vec![task.boxed()])
    }

    fn build<I>(identity: u64, name: &str, tasks: I) -> Result<Action> where I: IntoIterator<Item=Box<dyn Task>> {
        let tasks = tasks.into_iter().collect::<Vec<_>>();
        if tasks.len() == 0 {
            return Err(Error::NoTasks);
        }
        Ok(Action::make(identity,name,tasks))
    }

    fn make(identity: u64, name: &str, tasks: Vec<Box<dyn Task>>) -> Action {
        let running = tasks.iter().map(|_| None).collect();
        Action {
            identity,
            name: name.to_string(),
            tasks,
            slots: Arc::new(Mutex::new(ActionSlots {
                running,
                faults: vec![],
                generation: 0,
                started: false,
                stopped: false
            }))
        }
    }

    pub fn identity(&self) -> u64 { self.identity }
    pub fn name(&self) -> &str { &self.name }
    pub fn len(&self) -> usize { self.tasks.len() }

    /// Start every task on the given host unless the action is already running. Returns whether it started.
    ///
    /// Each task's entry point runs with no locks held, so it may use the queue or the action. A task whose entry
    /// point panics is recorded as a fault rather than started.
    pub fn try_start(&self, host: &Host) -> bool {
        if self.is_running() {
            trace!(action=self.identity,action_name=%self.name,"action already running");
            return false;
        }
        let coroutines = self.tasks.iter().map(|task| {
            panic::catch_unwind(AssertUnwindSafe(|| task.run()))
        }).collect::<Vec<_>>();
        let mut slots = lock!(self.slots);
        if slots.running.iter().any(|x| x.is_some()) {
            trace!(action=self.identity,action_name=%self.name,"action started elsewhere meanwhile");
            return false;
        }
        slots.generation += 1;
        slots.started = true;
        slots.stopped = false;
        slots.faults.clear();
        let generation = slots.generation;
        debug!(action=self.identity,action_name=%self.name,tasks=self.tasks.len(),"action starting");
        for (index,coroutine) in coroutines.into_iter().enumerate() {
            let name = format!("{}/{}",self.name,index);
            let coroutine = match coroutine {
                Ok(coroutine) => coroutine,
                Err(payload) => {
                    let fault = TaskFault::from_panic(index,payload.as_ref());
                    warn!(task=%name,"entry point failed: {}",fault);
                    slots.faults.push(fault);
                    continue;
                }
            };
            let (abort,registration) = AbortHandle::new_pair();
            let mut guard = SlotGuard {
                slots: self.slots.clone(),
                generation,
                index,
                fault: None
            };
            let coroutine = Abortable::new(AssertUnwindSafe(coroutine).catch_unwind(),registration);
            let task_name = name.clone();
            let handle = host.start(async move {
                if let Ok(Err(payload)) = coroutine.await {
                    let fault = TaskFault::from_panic(index,payload.as_ref());
                    warn!(task=%task_name,"{}",fault);
                    guard.fault = Some(fault);
                }
                drop(guard);
            },&name);
            slots.running[index] = Some(RunningTask { handle, abort });
        }
        true
    }

    /// Abandon every running task at its current suspension point. Does nothing if not running.
    pub fn stop(&self) {
        let running = {
            let mut slots = lock!(self.slots);
            let running = slots.running.iter_mut().filter_map(|x| x.take()).collect::<Vec<_>>();
            if running.len() > 0 {
                slots.stopped = true;
            }
            running
        };
        if running.len() == 0 { return; }
        debug!(action=self.identity,action_name=%self.name,tasks=running.len(),"action stopped");
        for task in running {
            trace!(coroutine=%task.handle,"aborting task");
            task.abort.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        lock!(self.slots).running.iter().any(|x| x.is_some())
    }

    pub fn state(&self) -> ActionState {
        let slots = lock!(self.slots);
        if slots.running.iter().any(|x| x.is_some()) {
            ActionState::Running
        } else if !slots.started {
            ActionState::Idle
        } else if slots.stopped {
            ActionState::Stopped
        } else if slots.faults.len() > 0 {
            ActionState::Faulted
        } else {
            ActionState::Finished
        }
    }

    /// Faults from the latest run.
    pub fn faults(&self) -> Vec<TaskFault> {
        lock!(self.slots).faults.clone()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("identity",&self.identity)
            .field("name",&self.name)
            .field("tasks",&self.tasks.len())
            .field("state",&self.state())
            .finish()
    }
}

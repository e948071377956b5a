use std::sync::{ Arc, Mutex };
use crate::corefutures::trigger::Trigger;
use crate::corefutures::waits::next_frame;
use super::task::{ Coroutine, Task };

/* A controllable task for tests. It logs "start:label" when run, optionally
 * waits some frames and then on a gate, optionally panics, and finally logs
 * "end:label".
 */

#[derive(Clone)]
pub(crate) struct FakeTask {
    label: String,
    frames: u64,
    gate: Option<Trigger<()>>,
    panics: bool,
    log: Arc<Mutex<Vec<String>>>
}

impl FakeTask {
    pub(crate) fn new(label: &str, log: &Arc<Mutex<Vec<String>>>) -> FakeTask {
        FakeTask {
            label: label.to_string(),
            frames: 0,
            gate: None,
            panics: false,
            log: log.clone()
        }
    }

    pub(crate) fn frames(mut self, frames: u64) -> FakeTask {
        self.frames = frames;
        self
    }

    pub(crate) fn gated(mut self, gate: &Trigger<()>) -> FakeTask {
        self.gate = Some(gate.clone());
        self
    }

    pub(crate) fn panicking(mut self) -> FakeTask {
        self.panics = true;
        self
    }
}

impl Task for FakeTask {
    fn run(&self) -> Coroutine {
        let task = self.clone();
        Box::pin(async move {
            task.log.lock().unwrap().push(format!("start:{}",task.label));
            for _ in 0..task.frames {
                next_frame().await;
            }
            if let Some(gate) = task.gate.clone() {
                gate.await;
            }
            if task.panics {
                panic!("fake task {} failed",task.label);
            }
            task.log.lock().unwrap().push(format!("end:{}",task.label));
        })
    }
}

pub(crate) fn new_log() -> Arc<Mutex<Vec<String>>> { Arc::new(Mutex::new(vec![])) }

pub(crate) fn read_log(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> { log.lock().unwrap().clone() }

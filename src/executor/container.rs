use binary_heap_plus::{ BinaryHeap, MinComparator };
use hashbrown::HashMap;
use std::sync::Arc;
use crate::task::task::Coroutine;
use super::handle::CoroutineHandle;
use super::wake::CoroutineWaker;

/* A CoroutineContainer stores the coroutines an executor is currently running.
 * Entries live in a vector of slots. Freed slots are reused lowest-first so the
 * vector stays compact, and a hash from handle to slot lets stale handles (of
 * coroutines which have finished or been stopped) be detected cheaply.
 */

pub(crate) struct CoroutineEntry {
    pub(crate) name: String,
    pub(crate) future: Coroutine,
    pub(crate) waker: Arc<CoroutineWaker>
}

pub(crate) struct CoroutineContainer {
    free_slots: BinaryHeap<usize,MinComparator>,
    entries: Vec<Option<CoroutineEntry>>,
    index: HashMap<CoroutineHandle,usize>
}

impl CoroutineContainer {
    pub(crate) fn new() -> CoroutineContainer {
        CoroutineContainer {
            free_slots: BinaryHeap::new_min(),
            entries: Vec::new(),
            index: HashMap::new()
        }
    }

    pub(crate) fn insert(&mut self, handle: &CoroutineHandle, entry: CoroutineEntry) -> usize {
        self.remove(handle);
        let slot = self.free_slots.pop().unwrap_or_else(|| {
            self.entries.push(None);
            self.entries.len()-1
        });
        self.entries[slot] = Some(entry);
        self.index.insert(handle.clone(),slot);
        slot
    }

    pub(crate) fn remove(&mut self, handle: &CoroutineHandle) -> Option<CoroutineEntry> {
        let slot = self.index.remove(handle)?;
        self.free_slots.push(slot);
        self.entries[slot].take()
    }

    pub(crate) fn get_mut(&mut self, handle: &CoroutineHandle) -> Option<&mut CoroutineEntry> {
        let slot = *self.index.get(handle)?;
        self.entries.get_mut(slot).and_then(|x| x.as_mut())
    }

    pub(crate) fn contains(&self, handle: &CoroutineHandle) -> bool {
        self.index.contains_key(handle)
    }

    pub(crate) fn len(&self) -> usize { self.index.len() }
}

use std::fmt;

identitynumber!(IDENTITY);

/// Names one coroutine started on an `Executor`.
///
/// Handles are allocated when a coroutine is submitted, before the executor has seen it, and are never reused.
#[derive(Clone,PartialEq,Eq,Hash,Debug)]
pub struct CoroutineHandle(u64);

impl CoroutineHandle {
    pub(crate) fn new() -> CoroutineHandle {
        CoroutineHandle(IDENTITY.next())
    }

    /// Unique identity of this coroutine.
    pub fn identity(&self) -> u64 { self.0 }
}

impl fmt::Display for CoroutineHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,"#{}",self.0)
    }
}

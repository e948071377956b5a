use std::sync::atomic::{ AtomicU64, Ordering };

/* Poisoned mutexes mean a coroutine or producer panicked while holding crate
 * state. Nothing sensible can be done with that state afterwards, so treat it
 * as fatal and say where it happened.
 */
macro_rules! lock {
    ($x: expr) => {{
        match $x.lock() {
            Ok(v) => v,
            Err(_) => {
                panic!("poisoned lock at {}/{}/{}",file!(),line!(),column!());
            }
        }
    }}
}

/* Process-unique, never reused numbers for executors, coroutines and actions. */
pub(crate) struct IdentityNumber(AtomicU64);

impl IdentityNumber {
    pub(crate) fn new() -> IdentityNumber {
        IdentityNumber(AtomicU64::new(1))
    }

    pub(crate) fn next(&self) -> u64 {
        self.0.fetch_add(1,Ordering::Relaxed)
    }
}

macro_rules! identitynumber {
    ($name:ident) => {
        lazy_static::lazy_static! {
            static ref $name : crate::macros::IdentityNumber = crate::macros::IdentityNumber::new();
        }
    }
}

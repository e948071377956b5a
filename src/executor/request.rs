use crate::task::task::Coroutine;
use super::handle::CoroutineHandle;

/* Requests are how hosts and running coroutines ask the executor to do
 * things. They travel over a Link and are serviced between polls.
 */

pub(crate) enum Request {
    Start(CoroutineHandle,String,Coroutine),
    Stop(CoroutineHandle),
    /* absolute tick index */
    Ticks(CoroutineHandle,u64,Box<dyn FnOnce() + 'static>),
    /* relative time */
    Timer(CoroutineHandle,f64,Box<dyn FnOnce() + 'static>)
}

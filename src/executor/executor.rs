use futures::task::{ waker_ref, ArcWake };
use hashbrown::HashSet;
use std::future::Future;
use std::sync::{ Arc, Mutex };
use std::task::{ Context, Poll };
use std::thread;
use std::time::Duration;
use tracing::{ debug, trace };
use crate::integration::integration::{ Integration, SleepQuantity };
use crate::task::task::Coroutine;
use super::config::ExecutorConfig;
use super::container::{ CoroutineContainer, CoroutineEntry };
use super::context::{ self, CoroutineContext };
use super::handle::CoroutineHandle;
use super::host::Host;
use super::link::Link;
use super::request::Request;
use super::timings::ExecutorTimings;
use super::wake::CoroutineWaker;

identitynumber!(IDENTITY);

/// Runs coroutines cooperatively on the thread which owns it, one frame at a time.
///
/// The owner calls `tick()` once per frame. Each tick fires due waits, acts on start and stop requests, and polls
/// every coroutine which has been woken, repeating until nothing more can happen this frame or the configured
/// limits are reached. Coroutines only ever run inside `tick()` and never preemptively.
pub struct Executor {
    identity: u64,
    config: ExecutorConfig,
    integration: Box<dyn Integration>,
    coroutines: CoroutineContainer,
    timings: ExecutorTimings,
    requests: Link<Request>,
    ready: Link<CoroutineHandle>,
    alive: Arc<Mutex<HashSet<CoroutineHandle>>>,
    host: Host
}

impl Executor {
    /// Create an executor with default limits, using the given integration as clock.
    pub fn new<T>(integration: T) -> Executor where T: Integration + 'static {
        Executor::with_config(integration,ExecutorConfig::default())
    }

    pub fn with_config<T>(integration: T, config: ExecutorConfig) -> Executor where T: Integration + 'static {
        let identity = IDENTITY.next();
        debug!(executor=identity,"executor starting");
        let requests = Link::new();
        let alive = Arc::new(Mutex::new(HashSet::new()));
        Executor {
            identity,
            config,
            integration: Box::new(integration),
            coroutines: CoroutineContainer::new(),
            timings: ExecutorTimings::new(),
            host: Host::new(&requests,&alive),
            requests,
            ready: Link::new(),
            alive
        }
    }

    pub fn identity(&self) -> u64 { self.identity }
    pub fn get_config(&self) -> &ExecutorConfig { &self.config }

    /// A handle for starting and stopping coroutines on this executor from elsewhere on this thread.
    pub fn host(&self) -> Host { self.host.clone() }

    /// Start a coroutine. It first runs during the next tick.
    pub fn start<T>(&self, future: T, name: &str) -> CoroutineHandle where T: Future<Output=()> + 'static {
        self.host.start(future,name)
    }

    /// Stop a coroutine. It is dropped during the next tick without being polled again.
    pub fn stop(&self, handle: &CoroutineHandle) {
        self.host.stop(handle);
    }

    /// The index of the current tick. The first tick is number one.
    pub fn get_tick_index(&self) -> u64 { self.timings.get_tick_index() }

    /// Number of coroutines submitted and not yet completed or stopped.
    pub fn len(&self) -> usize { self.host.alive_count() }

    pub fn is_idle(&self) -> bool { self.len() == 0 }

    fn start_coroutine(&mut self, handle: CoroutineHandle, name: String, future: Coroutine) {
        trace!(coroutine=%handle,coroutine_name=%name,"coroutine started");
        let waker = CoroutineWaker::new(&handle,&self.ready);
        self.coroutines.insert(&handle,CoroutineEntry {
            name,
            future,
            waker: waker.clone()
        });
        ArcWake::wake_by_ref(&waker);
    }

    fn remove_coroutine(&mut self, handle: &CoroutineHandle, stopped: bool) {
        if let Some(entry) = self.coroutines.remove(handle) {
            if stopped {
                debug!(coroutine=%handle,coroutine_name=%entry.name,"coroutine stopped");
            } else {
                trace!(coroutine=%handle,coroutine_name=%entry.name,"coroutine finished");
            }
        }
        self.timings.forget(handle);
        lock!(self.alive).remove(handle);
    }

    /* returns true if any requests were processed */
    fn service(&mut self) -> bool {
        let mut any = false;
        loop {
            let requests = self.requests.drain();
            if requests.len() == 0 { break; }
            any = true;
            let now = self.integration.current_time();
            for request in requests {
                match request {
                    Request::Start(handle,name,future) => {
                        self.start_coroutine(handle,name,future);
                    },
                    Request::Stop(handle) => {
                        self.remove_coroutine(&handle,true);
                    },
                    Request::Ticks(handle,tick,callback) => {
                        if self.coroutines.contains(&handle) {
                            self.timings.add_tick(&handle,tick,callback);
                        }
                    },
                    Request::Timer(handle,timeout,callback) => {
                        if self.coroutines.contains(&handle) {
                            self.timings.add_timer(&handle,now,timeout,callback);
                        }
                    }
                }
            }
        }
        any
    }

    fn run_timers(&mut self) -> bool {
        let now = self.integration.current_time();
        let coroutines = &self.coroutines;
        self.timings.run(now,|h| coroutines.contains(h)) > 0
    }

    fn poll_coroutine(&mut self, handle: &CoroutineHandle) -> bool {
        let coroutine_context = CoroutineContext::new(handle,&self.requests,self.timings.get_tick_index());
        let out = {
            let entry = match self.coroutines.get_mut(handle) {
                Some(entry) => entry,
                None => { return false; }
            };
            entry.waker.rearm();
            let waker = entry.waker.clone();
            let waker = waker_ref(&waker);
            let mut ctx = Context::from_waker(&*waker);
            let _guard = context::enter(coroutine_context);
            entry.future.as_mut().poll(&mut ctx)
        };
        if let Poll::Ready(()) = out {
            self.remove_coroutine(handle,false);
        }
        true
    }

    /* returns true if anything was polled */
    fn execute_ready(&mut self) -> bool {
        let mut polled = false;
        for handle in self.ready.drain() {
            polled |= self.poll_coroutine(&handle);
        }
        polled
    }

    fn calculate_sleep(&self) -> SleepQuantity {
        if !self.ready.is_empty() || !self.requests.is_empty() {
            SleepQuantity::None
        } else {
            self.timings.calculate_sleep(self.integration.current_time())
        }
    }

    /// Run one frame.
    pub fn tick(&mut self) {
        self.timings.advance_tick();
        let expiry = self.integration.current_time() + self.config.get_slice();
        let mut passes = 0;
        loop {
            let fired = self.run_timers();
            let serviced = self.service();
            let polled = self.execute_ready();
            passes += 1;
            if !(fired || serviced || polled) { break; }
            if passes >= self.config.get_max_passes() { break; }
            if self.integration.current_time() >= expiry { break; }
        }
        trace!(executor=self.identity,tick=self.timings.get_tick_index(),passes,running=self.coroutines.len(),"tick complete");
        self.integration.sleep(self.calculate_sleep());
    }

    /// Tick once every `frame` of wall-clock time until `done` says to stop. `done` is checked after each tick.
    pub fn run_until<F>(&mut self, frame: Duration, mut done: F) where F: FnMut(&Executor) -> bool {
        loop {
            self.tick();
            if done(self) { break; }
            thread::sleep(frame);
        }
    }
}

#[cfg(test)]
mod test {
    use futures::executor::block_on;
    use std::sync::{ Arc, Mutex };
    use crate::corefutures::trigger::Trigger;
    use crate::corefutures::waits::{ current_frame, next_frame, wait_seconds, wait_ticks };
    use crate::integration::testintegration::TestIntegration;
    use super::*;

    struct DropFlag(Arc<Mutex<bool>>);

    impl Drop for DropFlag {
        fn drop(&mut self) { *self.0.lock().unwrap() = true; }
    }

    #[test]
    pub fn test_executor_smoke() {
        let integration = TestIntegration::new();
        let mut x = Executor::new(integration.clone());
        let steps = Arc::new(Mutex::new(0));
        let steps2 = steps.clone();
        let h = x.start(async move {
            *steps2.lock().unwrap() += 1;
            next_frame().await;
            *steps2.lock().unwrap() += 1;
            next_frame().await;
            *steps2.lock().unwrap() += 1;
        },"smoke");
        assert!(x.host().is_alive(&h));
        assert_eq!(0,*steps.lock().unwrap());
        x.tick();
        assert_eq!(1,*steps.lock().unwrap());
        x.tick();
        assert_eq!(2,*steps.lock().unwrap());
        assert!(!x.is_idle());
        x.tick();
        assert_eq!(3,*steps.lock().unwrap());
        assert!(!x.host().is_alive(&h));
        assert!(x.is_idle());
        assert_eq!(3,x.get_tick_index());
    }

    #[test]
    pub fn test_zero_ticks_yields_within_frame() {
        let integration = TestIntegration::new();
        let mut x = Executor::new(integration.clone());
        let count = Arc::new(Mutex::new(0));
        let count2 = count.clone();
        x.start(async move {
            for _ in 0..3 {
                wait_ticks(0).await;
                *count2.lock().unwrap() += 1;
            }
        },"yielder");
        x.tick();
        assert_eq!(3,*count.lock().unwrap());
        assert!(x.is_idle());
    }

    #[test]
    pub fn test_max_passes_bounds_tick() {
        let integration = TestIntegration::new();
        let mut x = Executor::with_config(integration.clone(),ExecutorConfig::new(10.,2));
        let count = Arc::new(Mutex::new(0));
        let count2 = count.clone();
        x.start(async move {
            for _ in 0..10 {
                wait_ticks(0).await;
                *count2.lock().unwrap() += 1;
            }
        },"busy");
        x.tick();
        assert!(*count.lock().unwrap() < 10);
        for _ in 0..20 {
            x.tick();
        }
        assert_eq!(10,*count.lock().unwrap());
    }

    #[test]
    pub fn test_wait_seconds() {
        let integration = TestIntegration::new();
        let mut x = Executor::new(integration.clone());
        let done = Arc::new(Mutex::new(false));
        let done2 = done.clone();
        x.start(async move {
            wait_seconds(5.).await;
            *done2.lock().unwrap() = true;
        },"sleeper");
        x.tick();
        assert_eq!(Some(SleepQuantity::Time(5.)),integration.last_sleep());
        integration.set_time(4.);
        x.tick();
        assert!(!*done.lock().unwrap());
        integration.set_time(5.);
        x.tick();
        assert!(*done.lock().unwrap());
        assert_eq!(Some(SleepQuantity::Forever),integration.last_sleep());
    }

    #[test]
    pub fn test_sleep_none_while_waiting_frames() {
        let integration = TestIntegration::new();
        let mut x = Executor::new(integration.clone());
        x.start(async move {
            loop { next_frame().await; }
        },"spinner");
        x.tick();
        assert_eq!(Some(SleepQuantity::None),integration.last_sleep());
    }

    #[test]
    pub fn test_stop_drops_coroutine() {
        let integration = TestIntegration::new();
        let mut x = Executor::new(integration.clone());
        let dropped = Arc::new(Mutex::new(false));
        let dropped2 = dropped.clone();
        let h = x.start(async move {
            let _flag = DropFlag(dropped2);
            Trigger::<()>::new().await;
        },"forever");
        x.tick();
        assert!(!*dropped.lock().unwrap());
        assert_eq!(Some(SleepQuantity::Forever),integration.last_sleep());
        x.stop(&h);
        assert!(!*dropped.lock().unwrap());
        x.tick();
        assert!(*dropped.lock().unwrap());
        assert!(x.is_idle());
        /* stopping again is harmless */
        x.stop(&h);
        x.tick();
    }

    #[test]
    pub fn test_external_wake() {
        let integration = TestIntegration::new();
        let mut x = Executor::new(integration.clone());
        let trigger = Trigger::new();
        let trigger2 = trigger.clone();
        let got = Arc::new(Mutex::new(None));
        let got2 = got.clone();
        x.start(async move {
            let v = trigger2.await;
            *got2.lock().unwrap() = Some(v);
        },"waiter");
        x.tick();
        x.tick();
        assert_eq!(None,*got.lock().unwrap());
        std::thread::spawn(move || trigger.fire(7)).join().expect("firer");
        x.tick();
        assert_eq!(Some(7),*got.lock().unwrap());
    }

    #[test]
    pub fn test_start_from_coroutine() {
        let integration = TestIntegration::new();
        let mut x = Executor::new(integration.clone());
        let host = x.host();
        let log = Arc::new(Mutex::new(vec![]));
        let (log2,log3) = (log.clone(),log.clone());
        x.start(async move {
            log2.lock().unwrap().push("parent");
            host.start(async move {
                log3.lock().unwrap().push("child");
            },"child");
        },"parent");
        x.tick();
        assert_eq!(vec!["parent","child"],*log.lock().unwrap());
        assert!(x.is_idle());
    }

    #[test]
    pub fn test_frame_numbers() {
        let integration = TestIntegration::new();
        let mut x = Executor::new(integration.clone());
        let frames = Arc::new(Mutex::new(vec![]));
        let frames2 = frames.clone();
        x.start(async move {
            frames2.lock().unwrap().push(current_frame());
            wait_ticks(2).await;
            frames2.lock().unwrap().push(current_frame());
        },"counter");
        for _ in 0..4 {
            x.tick();
        }
        assert_eq!(vec![Some(1),Some(3)],*frames.lock().unwrap());
        assert_eq!(None,current_frame());
    }

    #[test]
    pub fn test_wait_outside_executor() {
        block_on(next_frame());
        block_on(wait_seconds(100.));
    }
}

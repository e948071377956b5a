use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// A coroutine as run by the executor. Coroutines run only on the executor's thread so need not be `Send`.
pub type Coroutine = Pin<Box<dyn Future<Output=()>>>;

/// An entry point bound to its arguments.
///
/// Tasks are built on whichever thread decides some work is needed and then moved to the thread which runs them,
/// hence `Send + Sync`. `run()` may be called more than once: each call produces a fresh coroutine.
pub trait Task: Send + Sync {
    fn run(&self) -> Coroutine;

    fn boxed(self) -> Box<dyn Task> where Self: Sized + 'static { Box::new(self) }
}

impl fmt::Debug for dyn Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f,"Task") }
}

/// A task taking no arguments.
pub struct Task0<F> {
    entry: F
}

impl<F,Fut> Task0<F> where F: Fn() -> Fut + Send + Sync + 'static, Fut: Future<Output=()> + 'static {
    pub fn new(entry: F) -> Task0<F> { Task0 { entry } }
}

impl<F,Fut> Task for Task0<F> where F: Fn() -> Fut + Send + Sync + 'static, Fut: Future<Output=()> + 'static {
    fn run(&self) -> Coroutine { Box::pin((self.entry)()) }
}

macro_rules! task_arity {
    ($(#[$meta:meta])* $name:ident, $($arg:ident $val:ident),+) => {
        $(#[$meta])*
        pub struct $name<F,$($arg),+> {
            entry: F,
            args: ($($arg,)+)
        }

        impl<F,Fut,$($arg),+> $name<F,$($arg),+>
                where F: Fn($($arg),+) -> Fut + Send + Sync + 'static,
                      Fut: Future<Output=()> + 'static,
                      $($arg: Clone + Send + Sync + 'static),+ {
            pub fn new(entry: F, $($val: $arg),+) -> $name<F,$($arg),+> {
                $name { entry, args: ($($val,)+) }
            }

            pub fn args(&self) -> &($($arg,)+) { &self.args }
        }

        impl<F,Fut,$($arg),+> Task for $name<F,$($arg),+>
                where F: Fn($($arg),+) -> Fut + Send + Sync + 'static,
                      Fut: Future<Output=()> + 'static,
                      $($arg: Clone + Send + Sync + 'static),+ {
            fn run(&self) -> Coroutine {
                let ($($val,)+) = self.args.clone();
                Box::pin((self.entry)($($val),+))
            }
        }
    };
}

task_arity!(
    /// A task taking one argument, cloned into each run.
    Task1, A a);
task_arity!(
    /// A task taking two arguments, cloned into each run.
    Task2, A a, B b);
task_arity!(Task3, A a, B b, C c);
task_arity!(Task4, A a, B b, C c, D d);

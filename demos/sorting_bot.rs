/* A text-mode sorting bot.
 *
 * A script thread bubble-sorts a list. At each step it queues an action which
 * highlights the script line being run and animates the stacks of cubes, then
 * blocks until the queue has drained. The main thread owns the executor and
 * plays the animations, one action at a time.
 *
 * RUST_LOG=coroutine_actions=debug shows the queue at work.
 */

use anyhow::{ anyhow, bail, Result };
use coroutine_actions::{
    wait_seconds, Action, ActionQueue, Executor, QueueConfig, StdIntegration, Task, Task1, Task2, Task3
};
use std::sync::{ Arc, Mutex };
use std::sync::atomic::{ AtomicBool, Ordering };
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const STACK_COUNT: usize = 10;
const MAX_CUBES_PER_STACK: usize = 10;
const SETUP_INTERVAL: f64 = 0.02;
const FLASH_TIMES: usize = 2;
const FLASH_INTERVAL: f64 = 0.08;
const STEP_WAIT: f64 = 0.05;

#[derive(Clone,Copy,PartialEq)]
enum StackState {
    Normal,
    BeingCompared,
    BeingSwapped
}

struct Stacks {
    heights: Vec<usize>,
    states: Vec<StackState>
}

type Board = Arc<Mutex<Stacks>>;

fn with_board<F,R>(board: &Board, cb: F) -> R where F: FnOnce(&mut Stacks) -> R {
    match board.lock() {
        Ok(mut stacks) => cb(&mut stacks),
        Err(poisoned) => cb(&mut poisoned.into_inner())
    }
}

fn draw(board: &Board) {
    let line = with_board(board,|stacks| {
        stacks.heights.iter().zip(stacks.states.iter()).map(|(height,state)| {
            let mark = match state {
                StackState::Normal => ' ',
                StackState::BeingCompared => '?',
                StackState::BeingSwapped => '~'
            };
            format!("{:02}{}",height,mark)
        }).collect::<Vec<_>>().join(" ")
    });
    println!("  [{}]",line);
}

async fn setup(board: Board, index: usize, height: usize) {
    for h in 0..=height {
        with_board(&board,|stacks| { stacks.heights[index] = h; });
        wait_seconds(SETUP_INTERVAL).await;
    }
}

async fn flash(board: &Board, a: usize, b: usize, state: StackState) {
    for _ in 0..FLASH_TIMES {
        for s in &[state,StackState::Normal] {
            with_board(board,|stacks| {
                stacks.states[a] = *s;
                stacks.states[b] = *s;
            });
            draw(board);
            wait_seconds(FLASH_INTERVAL).await;
        }
    }
}

async fn compare(board: Board, a: usize, b: usize) {
    flash(&board,a,b,StackState::BeingCompared).await;
}

async fn swap(board: Board, a: usize, b: usize) {
    flash(&board,a,b,StackState::BeingSwapped).await;
    with_board(&board,|stacks| stacks.heights.swap(a,b));
    draw(&board);
}

async fn highlight(line: String) {
    println!("> {}",line);
    wait_seconds(STEP_WAIT).await;
}

async fn output(text: String) {
    println!("{}",text);
}

struct Script {
    queue: ActionQueue,
    board: Board
}

impl Script {
    fn step(&self, name: &str, tasks: Vec<Box<dyn Task>>) -> Result<()> {
        self.queue.enqueue(Action::named(name,tasks)?);
        self.queue.wait_until_drained()?;
        Ok(())
    }

    fn say(&self, text: &str) -> Result<()> {
        self.step("output",vec![Task1::new(output,text.to_string()).boxed()])
    }

    fn run(&self, mut values: Vec<usize>) -> Result<Vec<usize>> {
        if values.len() > STACK_COUNT {
            self.say(&format!("The length of data exceeds the limit 0-{}.",STACK_COUNT))?;
            bail!("too many values");
        }
        if let Some((i,_)) = values.iter().enumerate().find(|(_,v)| **v > MAX_CUBES_PER_STACK) {
            self.say(&format!("The value data[{}] exceeds the limit 0-{}.",i,MAX_CUBES_PER_STACK))?;
            bail!("value out of range");
        }
        self.say(&format!("Data to sort: data = {:?}",values))?;
        let tasks = values.iter().enumerate().map(|(i,v)| {
            Task3::new(setup,self.board.clone(),i,*v).boxed()
        }).collect::<Vec<_>>();
        self.step("setup",tasks)?;
        draw(&self.board);
        let n = values.len();
        for pass in 0..n {
            for j in 0..n.saturating_sub(pass+1) {
                self.step("compare",vec![
                    Task1::new(highlight,format!("if data[{}] > data[{}]:",j,j+1)).boxed(),
                    Task3::new(compare,self.board.clone(),j,j+1).boxed()
                ])?;
                if values[j] > values[j+1] {
                    values.swap(j,j+1);
                    self.step("swap",vec![
                        Task1::new(highlight,format!("data[{}], data[{}] = data[{}], data[{}]",j,j+1,j+1,j)).boxed(),
                        Task3::new(swap,self.board.clone(),j,j+1).boxed()
                    ])?;
                }
            }
        }
        self.step("done",vec![Task2::new(|text: String, values: Vec<usize>| async move {
            println!("{} {:?}",text,values);
        },"Done.".to_string(),values.clone()).boxed()])?;
        Ok(values)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let values = vec![5,2,8,1,9,3,7];
    let board = Arc::new(Mutex::new(Stacks {
        heights: vec![0;values.len()],
        states: vec![StackState::Normal;values.len()]
    }));
    let queue = ActionQueue::with_config(QueueConfig::new("sorting-bot",Duration::from_millis(30)));
    let finished = Arc::new(AtomicBool::new(false));
    let script = {
        let script = Script { queue: queue.clone(), board: board.clone() };
        let finished = finished.clone();
        thread::spawn(move || {
            let out = script.run(values);
            finished.store(true,Ordering::SeqCst);
            out
        })
    };
    let mut executor = Executor::new(StdIntegration::new());
    let pump = executor.start(queue.run(&executor.host()),"pump");
    executor.run_until(Duration::from_millis(16),|_| finished.load(Ordering::SeqCst));
    queue.stop();
    executor.run_until(Duration::from_millis(16),|x| !x.host().is_alive(&pump));
    let sorted = script.join().map_err(|_| anyhow!("script thread panicked"))??;
    info!(?sorted,completed=queue.completed(),"script finished");
    for fault in queue.take_faults() {
        eprintln!("fault: {}",fault);
    }
    Ok(())
}

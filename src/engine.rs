//! Background simulation engine
//!
//! Two timers drive the game. The tick thread fires every 20ms and is the
//! sole owner of `GameState`: it drains queued commands, samples the shared
//! input state, runs one tick and republishes a snapshot. The countdown
//! thread fires every second and only ever *signals* (`CountdownTick`);
//! the tick thread performs the actual reset. Readers clone snapshots and
//! never contend with the simulation for more than a mutex copy.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::consts::{COUNTDOWN_PERIOD_MS, TICK_PERIOD_MS};
use crate::sim::{self, Command, GamePhase, GameState, Snapshot, TickInput};
use crate::store::PrefStore;

/// Injectable time source, in milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from process-local origin
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Currently-held movement keys and aim point, written by the input layer
/// and sampled once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Aim point already translated to world coordinates
    pub aim: Vec2,
}

impl InputState {
    fn to_tick_input(self) -> TickInput {
        TickInput {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
            aim: self.aim,
        }
    }
}

/// Handle to the running simulation
#[derive(Debug)]
pub struct Engine {
    running: Arc<AtomicBool>,
    input: Arc<Mutex<InputState>>,
    snapshot: Arc<Mutex<Snapshot>>,
    commands: Sender<Command>,
    tick_thread: Option<JoinHandle<()>>,
    countdown_thread: Option<JoinHandle<()>>,
}

impl Engine {
    /// Spawn the tick and countdown threads around a fresh game state
    pub fn start(seed: u64, store: Box<dyn PrefStore>, clock: Arc<dyn Clock>) -> Self {
        let mut state = GameState::new(seed, store);

        let running = Arc::new(AtomicBool::new(true));
        let input = Arc::new(Mutex::new(InputState::default()));
        let snapshot = Arc::new(Mutex::new(state.snapshot()));
        let (commands, command_rx) = mpsc::channel::<Command>();

        let tick_thread = {
            let running = Arc::clone(&running);
            let input = Arc::clone(&input);
            let snapshot = Arc::clone(&snapshot);
            let clock = Arc::clone(&clock);
            thread::spawn(move || {
                let period = Duration::from_millis(TICK_PERIOD_MS);
                while running.load(Ordering::Relaxed) {
                    let started = Instant::now();
                    let now_ms = clock.now_ms();

                    for command in command_rx.try_iter() {
                        sim::apply_command(&mut state, command);
                    }

                    let tick_input = lock_unpoisoned(&input).to_tick_input();

                    // One broken tick must not take the loop down with it
                    let result = catch_unwind(AssertUnwindSafe(|| {
                        sim::tick(&mut state, &tick_input, now_ms);
                    }));
                    if result.is_err() {
                        log::error!("tick panicked at t={now_ms}ms; state kept, continuing");
                    }

                    *lock_unpoisoned(&snapshot) = state.snapshot();

                    let elapsed = started.elapsed();
                    if elapsed < period {
                        thread::sleep(period - elapsed);
                    }
                }
                log::info!("tick thread stopped");
            })
        };

        let countdown_thread = {
            let running = Arc::clone(&running);
            let snapshot = Arc::clone(&snapshot);
            let commands = commands.clone();
            thread::spawn(move || {
                let period = Duration::from_millis(COUNTDOWN_PERIOD_MS);
                while running.load(Ordering::Relaxed) {
                    thread::sleep(period);
                    let game_over = lock_unpoisoned(&snapshot).phase == GamePhase::GameOver;
                    if game_over && commands.send(Command::CountdownTick).is_err() {
                        break;
                    }
                }
                log::info!("countdown thread stopped");
            })
        };

        Self {
            running,
            input,
            snapshot,
            commands,
            tick_thread: Some(tick_thread),
            countdown_thread: Some(countdown_thread),
        }
    }

    /// Queue a discrete event for the next tick
    pub fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            log::warn!("command dropped, tick thread is gone: {command:?}");
        }
    }

    /// Replace the held-input state
    pub fn set_input(&self, input: InputState) {
        *lock_unpoisoned(&self.input) = input;
    }

    /// Modify the held-input state in place
    pub fn update_input(&self, update: impl FnOnce(&mut InputState)) {
        update(&mut lock_unpoisoned(&self.input));
    }

    /// Latest published snapshot; cheap enough to call every frame
    pub fn snapshot(&self) -> Snapshot {
        lock_unpoisoned(&self.snapshot).clone()
    }

    /// Stop both threads and wait for them
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.tick_thread.take()
            && handle.join().is_err()
        {
            log::error!("tick thread terminated abnormally");
        }
        if let Some(handle) = self.countdown_thread.take()
            && handle.join().is_err()
        {
            log::error!("countdown thread terminated abnormally");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Lock a mutex, recovering the data from a poisoned lock. Snapshot and
/// input slots hold plain value types, so a writer panicking mid-store
/// cannot leave them logically torn.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Rotating hero carousel.
//!
//! [`CarouselState`] is the pure state machine. [`CarouselTimer`] is the
//! autoplay clock: a spawned task that sends [`AppEvent::CarouselTick`] into
//! the event loop and is aborted when dropped. [`Carousel`] ties the two
//! together so that the timer only exists while the carousel is showing and
//! not paused.

use crate::app::AppEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Default autoplay period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(6);

/// Index and pause flag over `len` slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    index: usize,
    paused: bool,
    len: usize,
}

impl CarouselState {
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            paused: false,
            len,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Autoplay step. Ignored while paused.
    pub fn tick(&mut self) -> bool {
        if self.paused || self.len == 0 {
            return false;
        }
        self.index = (self.index + 1) % self.len;
        true
    }

    pub fn hover_enter(&mut self) {
        self.paused = true;
    }

    pub fn hover_leave(&mut self) {
        self.paused = false;
    }

    /// Jump to slide `i`. Out-of-range indices are ignored.
    pub fn select(&mut self, i: usize) -> bool {
        if i >= self.len {
            return false;
        }
        self.index = i;
        true
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }
}

/// Autoplay clock for one hero set. Aborted on drop, after which no tick
/// is delivered.
#[derive(Debug)]
pub struct CarouselTimer {
    handle: JoinHandle<()>,
}

impl CarouselTimer {
    /// Spawn a task that sends a tick tagged with `generation` and `arm`
    /// every `period`, starting one period from now.
    pub fn arm(period: Duration, generation: u64, arm: u64, tx: mpsc::Sender<AppEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let tick = AppEvent::CarouselTick { generation, arm };
                if tx.send(tick).await.is_err() {
                    // Event loop gone
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for CarouselTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A live carousel: state plus a timer armed only while active and not
/// paused.
///
/// Every re-arm bumps `arm`, so a tick queued by a released timer is
/// dropped instead of advancing the fresh period early.
#[derive(Debug)]
pub struct Carousel {
    state: CarouselState,
    generation: u64,
    arm: u64,
    period: Duration,
    tx: mpsc::Sender<AppEvent>,
    timer: Option<CarouselTimer>,
}

impl Carousel {
    /// Start a carousel over `len` slides at index 0, unpaused. No timer is
    /// armed when `len == 0`.
    pub fn new(len: usize, generation: u64, period: Duration, tx: mpsc::Sender<AppEvent>) -> Self {
        let mut carousel = Self {
            state: CarouselState::new(len),
            generation,
            arm: 0,
            period,
            tx,
            timer: None,
        };
        carousel.sync_timer();
        carousel
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn index(&self) -> usize {
        self.state.index()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn arm(&self) -> u64 {
        self.arm
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    fn sync_timer(&mut self) {
        let should_run = !self.state.is_empty() && !self.state.is_paused();
        match (should_run, self.timer.is_some()) {
            (true, false) => {
                self.arm = self.arm.wrapping_add(1);
                self.timer = Some(CarouselTimer::arm(
                    self.period,
                    self.generation,
                    self.arm,
                    self.tx.clone(),
                ));
            }
            (false, true) => self.timer = None,
            _ => {}
        }
    }

    /// Apply a timer tick. Ticks from another generation or a released
    /// timer are ignored. Returns true when the visible slide changed.
    pub fn on_tick(&mut self, generation: u64, arm: u64) -> bool {
        if generation != self.generation || arm != self.arm {
            tracing::trace!(
                generation,
                arm,
                current = self.generation,
                "Dropping stale carousel tick"
            );
            return false;
        }
        self.state.tick()
    }

    pub fn hover_enter(&mut self) {
        self.state.hover_enter();
        self.sync_timer();
    }

    pub fn hover_leave(&mut self) {
        self.state.hover_leave();
        self.sync_timer();
    }

    pub fn select(&mut self, i: usize) -> bool {
        self.state.select(i)
    }

    pub fn next(&mut self) {
        self.state.next();
    }

    pub fn prev(&mut self) {
        self.state.prev();
    }
}

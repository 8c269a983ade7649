//! Counters and timers shared by all worker threads.
//!
//! Timers are started with **StatTimer::start()** and stop when the
//! returned guard goes out of scope.

// std
use std::time::{Duration, Instant};
// others
use atomic::{Atomic, Ordering};
use tracing::info;

#[derive(Default)]
pub struct StatTimer {
    nanos: Atomic<u64>,
    count: Atomic<u64>,
}

pub struct StatTimerGuard<'a> {
    timer: &'a StatTimer,
    start: Instant,
}

impl StatTimer {
    pub fn start(&self) -> StatTimerGuard<'_> {
        StatTimerGuard {
            timer: self,
            start: Instant::now(),
        }
    }
    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl<'a> Drop for StatTimerGuard<'a> {
    fn drop(&mut self) {
        let elapsed: u64 = self.start.elapsed().as_nanos() as u64;
        self.timer.nanos.fetch_add(elapsed, Ordering::Relaxed);
        self.timer.count.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Default)]
pub struct Statistics {
    pub splits: StatTimer,
    pub dicing: StatTimer,
    pub diceable: StatTimer,
    pub project: StatTimer,
    pub grids: Atomic<u64>,
    pub micro_polygons: Atomic<u64>,
    pub culled: Atomic<u64>,
    pub discarded: Atomic<u64>,
    pub errors: Atomic<u64>,
}

impl Statistics {
    pub fn inc(counter: &Atomic<u64>, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }
    pub fn get(counter: &Atomic<u64>) -> u64 {
        counter.load(Ordering::Relaxed)
    }
    pub fn report(&self) {
        info!(
            "grids: {}, micropolygons: {}, culled: {}, discarded: {}, errors: {}",
            Statistics::get(&self.grids),
            Statistics::get(&self.micro_polygons),
            Statistics::get(&self.culled),
            Statistics::get(&self.discarded),
            Statistics::get(&self.errors)
        );
        for (name, timer) in [
            ("splits", &self.splits),
            ("dicing", &self.dicing),
            ("diceable", &self.diceable),
            ("project", &self.project),
        ]
        .iter()
        {
            info!("{:>8}: {:>8} calls {:?}", name, timer.count(), timer.total());
        }
    }
}

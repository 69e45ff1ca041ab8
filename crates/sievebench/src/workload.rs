//! Workloads driven against a shared cache

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use rand::Rng;
use sievecache::{SieveCache, StatsSnapshot};

/// Operation mix to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Workload {
    /// 70% add, 20% get, 10% delete over twice the capacity, with periodic
    /// bursts of fresh keys that force evictions
    Churn,
    /// 60% get, 30% add, 10% delete on random keys over twice the capacity
    Mixed,
}

/// Keys added in one burst, as a fraction of capacity
const BURST_DIVISOR: usize = 10;

/// Operations between bursts
const BURST_INTERVAL: usize = 10_000;

/// Outcome of one workload run
#[derive(Debug)]
pub struct Report {
    /// Cache operations issued across all threads
    pub operations: u64,
    /// Wall time for the whole run
    pub elapsed: Duration,
    /// Cache counters at the end of the run
    pub stats: StatsSnapshot,
    /// Entries left in the cache
    pub len: usize,
}

impl Report {
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.operations as f64 / secs
        }
    }
}

/// Run `workload` with `operations` split evenly over `threads`
pub fn run(
    cache: &Arc<SieveCache<u64, u64>>,
    workload: Workload,
    operations: usize,
    threads: usize,
) -> Report {
    let per_thread = (operations / threads).max(1);
    let start = Instant::now();

    let operations = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let cache = Arc::clone(cache);
                s.spawn(move || match workload {
                    Workload::Churn => churn(&cache, per_thread, t),
                    Workload::Mixed => mixed(&cache, per_thread),
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(0))
            .sum::<u64>()
    });

    Report {
        operations,
        elapsed: start.elapsed(),
        stats: cache.stats().snapshot(),
        len: cache.len(),
    }
}

fn churn(cache: &SieveCache<u64, u64>, operations: usize, thread_id: usize) -> u64 {
    let capacity = cache.capacity();
    let span = capacity * 2;
    let offset = thread_id * capacity / 4;
    let mut issued = 0u64;

    for i in 0..operations {
        let key = ((i + offset) % span) as u64;

        match i % 10 {
            0..=6 => {
                cache.add(key, i as u64);
            }
            7 | 8 => {
                cache.get(&key);
            }
            _ => {
                cache.delete(&key);
            }
        }
        issued += 1;

        if i > 0 && i % BURST_INTERVAL == 0 {
            for j in 0..capacity / BURST_DIVISOR {
                let fresh = (i + j + span + offset) as u64;
                cache.add(fresh, (i + j) as u64);
                issued += 1;
            }
        }
    }

    issued
}

fn mixed(cache: &SieveCache<u64, u64>, operations: usize) -> u64 {
    let span = cache.capacity() as u64 * 2;
    let mut rng = rand::thread_rng();

    for _ in 0..operations {
        let key = rng.gen_range(0..span);
        match rng.gen_range(0..10) {
            0..=5 => {
                cache.get(&key);
            }
            6..=8 => {
                cache.add(key, key);
            }
            _ => {
                cache.delete(&key);
            }
        }
    }

    operations as u64
}

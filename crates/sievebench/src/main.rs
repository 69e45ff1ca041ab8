//! sievebench - drive sievecache with synthetic workloads

mod workload;

use std::io;
use std::sync::Arc;

use anyhow::{ensure, Result};
use clap::Parser;
use sievecache::{CacheConfig, SieveCache};
use tracing::info;

use crate::workload::Workload;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of entries)
    #[arg(short, long, default_value_t = 8192)]
    capacity: usize,

    /// Total operations across all threads
    #[arg(short, long, default_value_t = 1_000_000)]
    operations: usize,

    /// Worker threads sharing the cache
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// Operation mix
    #[arg(short, long, value_enum, default_value_t = Workload::Churn)]
    workload: Workload,

    /// Reserve cache storage up front
    #[arg(long)]
    preallocate: bool,

    /// Print the cache contents after the run
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    ensure!(args.threads > 0, "--threads must be at least 1");

    let config = CacheConfig::new(args.capacity).preallocate(args.preallocate);
    let cache = Arc::new(SieveCache::with_config(config)?);

    info!(
        "Running {:?} workload: {} operations, {} threads, capacity {}",
        args.workload, args.operations, args.threads, args.capacity
    );

    let report = workload::run(&cache, args.workload, args.operations, args.threads);

    info!(
        "Completed {} operations in {:.3}s ({:.0} ops/sec)",
        report.operations,
        report.elapsed.as_secs_f64(),
        report.ops_per_sec()
    );
    info!("Cache: {}/{} entries, {}", report.len, cache.capacity(), report.stats);

    if args.dump {
        cache.dump(&mut io::stdout().lock())?;
    }

    Ok(())
}

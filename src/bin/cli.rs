use clap::{Parser, Subcommand};
use hostpool::{
    CountingAllocator, ElementKind, MemoryPool, PoolConfig, PoolConfigBuilder, Result,
};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "hostpool-cli", version, about = "hostpool caching memory pool CLI tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a multi-threaded allocate/release workload and report pool behaviour
    Stress {
        /// Worker threads
        #[arg(short, long, default_value_t = 4)]
        threads: usize,
        /// Allocate/release rounds per thread
        #[arg(short, long, default_value_t = 10_000)]
        iterations: usize,
        /// Element counts to cycle through
        #[arg(short, long, value_delimiter = ',', default_value = "1,256,1000,4096,65536")]
        counts: Vec<usize>,
        /// Buffers each thread holds before releasing them
        #[arg(long, default_value_t = 4)]
        hold: usize,
        /// Registry size that triggers a sweep
        #[arg(long)]
        max_buffers: Option<usize>,
        /// Locked bytes that trigger a sweep
        #[arg(long)]
        max_bytes: Option<usize>,
    },
    /// Print the configuration resolved from the environment
    Config,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Stress {
            threads,
            iterations,
            counts,
            hold,
            max_buffers,
            max_bytes,
        } => {
            let base = PoolConfig::from_env()?;
            let config = PoolConfigBuilder::new()
                .max_buffers(max_buffers.unwrap_or(base.max_buffers))
                .max_bytes(max_bytes.unwrap_or(base.max_bytes))
                .build()?;
            run_stress(config, threads, iterations, &counts, hold)
        }
        Command::Config => {
            let config = PoolConfig::from_env()?;
            println!("max_buffers: {}", config.max_buffers);
            println!("max_bytes:   {}", config.max_bytes);
            println!("granularity: {}", hostpool::GRANULARITY);
            Ok(())
        }
    }
}

fn run_stress(
    config: PoolConfig,
    threads: usize,
    iterations: usize,
    counts: &[usize],
    hold: usize,
) -> Result<()> {
    if counts.is_empty() {
        return Err(hostpool::PoolError::invalid_parameter(
            "counts",
            "At least one element count is required",
        ));
    }

    let pool = MemoryPool::with_allocator(config, CountingAllocator::new())?;
    let hold = hold.max(1);

    println!(
        "Running {} threads x {} iterations (max_buffers={}, max_bytes={})",
        threads,
        iterations,
        pool.config().max_buffers,
        pool.config().max_bytes
    );
    println!(
        "Element kinds: {}",
        ElementKind::ALL
            .iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let start = Instant::now();
    std::thread::scope(|scope| -> Result<()> {
        let workers: Vec<_> = (0..threads)
            .map(|worker| {
                let pool = &pool;
                scope.spawn(move || -> Result<()> {
                    let mut held = Vec::with_capacity(hold);
                    for i in 0..iterations {
                        let kind = ElementKind::ALL[(worker + i) % ElementKind::ALL.len()];
                        let count = counts[(worker * 7 + i) % counts.len()];
                        held.push(pool.allocate_kind(kind, count)?);

                        if held.len() == hold {
                            for handle in held.drain(..) {
                                unsafe { pool.release(handle) };
                            }
                        }
                    }
                    for handle in held {
                        unsafe { pool.release(handle) };
                    }
                    Ok(())
                })
            })
            .collect();

        for worker in workers {
            worker
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
        }
        Ok(())
    })?;
    let elapsed = start.elapsed();

    let usage = pool.query_usage();
    let stats = pool.stats();
    let calls = pool.allocator().counters();

    println!("Completed in {:?}", elapsed);
    println!(
        "Usage: total {} bytes / {} buffers, locked {} bytes / {} buffers",
        usage.total_bytes, usage.total_buffers, usage.locked_bytes, usage.locked_buffers
    );
    println!("{}", stats.summary());
    println!(
        "Underlying allocator: {} acquisitions, {} releases, {} bytes acquired",
        calls.acquisitions, calls.releases, calls.bytes_acquired
    );

    let report = pool.shutdown();
    println!(
        "Shutdown released {} buffers ({} bytes)",
        report.buffers, report.bytes
    );

    Ok(())
}

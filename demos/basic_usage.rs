//! Basic task pool usage example
//!
//! Demonstrates pool creation, task submission, shutdown, and statistics.
//!
//! Run with: RUST_LOG=debug cargo run --example basic_usage

use rust_task_pool::prelude::*;
use std::thread;
use std::time::Duration;

struct Checksum {
    label: String,
    data: Vec<u8>,
}

impl Task for Checksum {
    fn run(&mut self) -> Result<()> {
        let sum: u32 = self.data.iter().map(|&b| u32::from(b)).sum();
        println!("  {} -> {}", self.label, sum);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.label
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Rust Task Pool - Basic Usage Example ===\n");

    let config = ThreadPoolConfig::new(4).with_thread_name_prefix("demo");
    let pool = ThreadPool::with_config(config)?;

    println!("1. Starting pool with {} workers", pool.num_threads());
    pool.start()?;

    println!("\n2. Submitting closures:");
    for i in 0..10 {
        let id = pool.execute(move || {
            println!(
                "  Task {} running on {}",
                i,
                thread::current().name().unwrap_or("?")
            );
            thread::sleep(Duration::from_millis(20));
            Ok(())
        })?;
        println!("  queued {}", id);
    }

    println!("\n3. Submitting custom tasks:");
    for i in 0..3 {
        pool.submit(Checksum {
            label: format!("block-{}", i),
            data: vec![i as u8; 64],
        })?;
    }

    println!("\n4. A failing task and a panicking task:");
    pool.execute(|| Err(PoolError::other("disk full")))?;
    pool.execute(|| panic!("corrupt header"))?;

    println!("\n5. Shutting down (queued tasks are drained)...");
    pool.shutdown()?;
    match pool.execute(|| Ok(())) {
        Err(e) => println!("  late submission rejected: {}", e),
        Ok(id) => println!("  unexpected: {} accepted", id),
    }
    pool.join()?;

    println!("\n6. Statistics:");
    let stats = pool.stats();
    println!("   submitted: {}", stats.tasks_submitted);
    println!("   completed: {}", stats.tasks_completed);
    println!("   failed:    {}", stats.tasks_failed);
    println!("   panicked:  {}", stats.tasks_panicked);
    for (i, worker) in pool.get_stats().iter().enumerate() {
        println!(
            "   worker {}: {} tasks, avg {:.2}μs",
            i,
            worker.get_tasks_run(),
            worker.get_average_busy_time_us()
        );
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}

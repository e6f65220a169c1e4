/// Worker pool for batch commands.
/// Files are independent, so `fmt` and `check` fan out over rayon.

use anyhow::Result;

/// Initialize the global rayon thread pool with half the cores, at least one.
pub fn init_thread_pool() -> Result<usize> {
    let cores = num_cpus::get();
    let workers = worker_count(cores);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    tracing::debug!(workers, cores, "initialized thread pool");

    Ok(workers)
}

fn worker_count(cores: usize) -> usize {
    std::cmp::max(1, cores / 2)
}

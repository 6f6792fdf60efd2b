//! Fixed-size pool of search workers over one shared vocabulary.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc;

use super::optimizer::LocalSearch;
use super::worker::{CheckpointError, Command, WorkerHandle, WorkerStatus};
use crate::compute::{FragmentPool, GuessSelector, TreeBuilder};
use crate::schema::{ConfigError, GeneratorConfig, Vocabulary};

/// Independent workers plus the coordinator-side controls over them.
///
/// Workers share nothing but the read-only vocabulary and fragment pool;
/// the global best is aggregated from their published statuses on demand.
pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    running: bool,
}

impl WorkerPool {
    /// Validate `config` and spawn `config.workers` paused workers.
    pub fn new(vocabulary: Arc<Vocabulary>, config: &GeneratorConfig) -> Result<Self, PoolError> {
        config.validate()?;

        let pool = Arc::new(FragmentPool::new(&vocabulary));
        log::info!(
            "Starting {} workers over {} words ({} fragments)",
            config.workers,
            vocabulary.len(),
            pool.len()
        );
        let builder = TreeBuilder::new(vocabulary, GuessSelector::new(pool));

        let workers = (0..config.workers)
            .map(|id| {
                let seed = config.random_seed.map(|s| s.wrapping_add(id as u64));
                let search = LocalSearch::new(builder.clone(), config.search.clone(), seed)?;
                WorkerHandle::spawn(id, search).map_err(PoolError::Spawn)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            workers,
            running: false,
        })
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resume every worker.
    pub fn start(&mut self) -> Result<(), PoolError> {
        self.broadcast(|| Command::Resume)?;
        self.running = true;
        Ok(())
    }

    /// Pause every worker after its current iteration.
    pub fn pause(&mut self) -> Result<(), PoolError> {
        self.broadcast(|| Command::Pause)?;
        self.running = false;
        Ok(())
    }

    /// Start a paused pool or pause a running one. Returns the new state.
    pub fn toggle_running(&mut self) -> Result<bool, PoolError> {
        if self.running {
            self.pause()?;
        } else {
            self.start()?;
        }
        Ok(self.running)
    }

    pub fn statuses(&self) -> Vec<WorkerStatus> {
        self.workers.iter().map(WorkerHandle::status).collect()
    }

    /// Lowest finite best average across workers, with the worker holding it.
    pub fn global_best(&self) -> Option<(usize, f64)> {
        self.statuses()
            .into_iter()
            .filter(|s| s.best_average.is_finite())
            .map(|s| (s.id, s.best_average))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Write worker `id`'s best tree to `path`, waiting for the worker to
    /// reach the end of its current iteration.
    pub fn checkpoint(&self, id: usize, path: &Path) -> Result<(), PoolError> {
        let worker = self.workers.get(id).ok_or(PoolError::UnknownWorker(id))?;
        let (reply, response) = mpsc::channel();
        worker
            .send(Command::Checkpoint {
                path: path.to_path_buf(),
                reply,
            })
            .map_err(|_| PoolError::Disconnected(id))?;
        response.recv().map_err(|_| PoolError::Disconnected(id))??;
        Ok(())
    }

    /// Checkpoint whichever worker currently holds the global best. Returns
    /// that worker's id.
    pub fn checkpoint_best(&self, path: &Path) -> Result<usize, PoolError> {
        let (id, average) = self
            .global_best()
            .ok_or(PoolError::Checkpoint(CheckpointError::NoTree))?;
        log::info!("Checkpointing global best {:.4} from worker {}", average, id);
        self.checkpoint(id, path)?;
        Ok(id)
    }

    /// Reset the worse-performing half of the workers. Returns the reset ids.
    ///
    /// Failed workers are left alone. The rest are ranked by best average,
    /// workers without a tree last, and everything from rank `len / 2` on is
    /// reset, so an odd count resets the larger half and a lone worker is
    /// always reset.
    pub fn restart_worst_half(&self) -> Result<Vec<usize>, PoolError> {
        let reset = worst_half(&self.statuses());
        for &id in &reset {
            self.workers[id]
                .send(Command::Reset)
                .map_err(|_| PoolError::Disconnected(id))?;
        }
        log::info!("Restarted workers {:?}", reset);
        Ok(reset)
    }

    /// Stop and join every worker.
    pub fn shutdown(&mut self) {
        for worker in &self.workers {
            // A disconnected worker has already exited.
            let _ = worker.send(Command::Stop);
        }
        for worker in &mut self.workers {
            worker.join();
        }
        self.running = false;
    }

    fn broadcast(&self, command: impl Fn() -> Command) -> Result<(), PoolError> {
        for worker in &self.workers {
            worker
                .send(command())
                .map_err(|_| PoolError::Disconnected(worker.id()))?;
        }
        Ok(())
    }
}

/// Ids of the non-failed workers ranked in the worse half, best first.
fn worst_half(statuses: &[WorkerStatus]) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = statuses
        .iter()
        .filter(|s| !s.is_failed())
        .map(|s| (s.id, s.best_average))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    let keep = ranked.len() / 2;
    ranked[keep..].iter().map(|&(id, _)| id).collect()
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Worker pool errors.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("No worker with id {0}")]
    UnknownWorker(usize),
    #[error("Worker {0} is no longer running")]
    Disconnected(usize),
    #[error("Checkpoint failed: {0}")]
    Checkpoint(#[from] CheckpointError),
}

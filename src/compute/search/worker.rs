//! Search workers: one OS thread per [`LocalSearch`], driven by commands.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, SendError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use super::optimizer::{LocalSearch, SearchPhase, SearchStats, StepOutcome};
use crate::tree::{CodecError, codec};

/// Commands accepted by a worker between iterations.
#[derive(Debug)]
pub enum Command {
    Resume,
    Pause,
    /// Write the worker's best tree to `path` and report on `reply`.
    Checkpoint {
        path: PathBuf,
        reply: Sender<Result<(), CheckpointError>>,
    },
    /// Discard the best tree and start seeding again.
    Reset,
    Stop,
}

/// Snapshot a worker publishes after every command and iteration.
#[derive(Debug, Clone)]
pub struct WorkerStatus {
    pub id: usize,
    pub phase: SearchPhase,
    pub running: bool,
    pub best_average: f64,
    pub seeding_rounds: usize,
    pub stats: SearchStats,
    /// Most recent improvement as `(previous, current)`.
    pub last_improvement: Option<(f64, f64)>,
    /// Why the worker failed, once it has.
    pub error: Option<String>,
}

impl WorkerStatus {
    fn new(id: usize, seeding_rounds: usize) -> Self {
        Self {
            id,
            phase: SearchPhase::Idle,
            running: false,
            best_average: f64::INFINITY,
            seeding_rounds,
            stats: SearchStats::default(),
            last_improvement: None,
            error: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.phase == SearchPhase::Failed
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker {}: ", self.id)?;
        match self.phase {
            SearchPhase::Failed => {
                return write!(f, "failed: {}", self.error.as_deref().unwrap_or("unknown error"));
            }
            SearchPhase::Seeding { round } => {
                write!(f, "seeding {}/{}", round, self.seeding_rounds)?
            }
            phase => write!(f, "{}", phase)?,
        }
        if !self.running {
            f.write_str(" (paused)")?;
        }
        if self.best_average.is_finite() {
            write!(f, ", best {:.4}", self.best_average)?;
        }
        if let Some((previous, current)) = self.last_improvement
            && previous.is_finite()
        {
            write!(f, ", last {:.4} -> {:.4}", previous, current)?;
        }
        write!(
            f,
            ", {} iterations ({} accepted)",
            self.stats.iterations, self.stats.accepted
        )
    }
}

/// Errors writing a worker checkpoint.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("Worker has no tree yet")]
    NoTree,
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Owning handle to a running worker thread.
pub struct WorkerHandle {
    id: usize,
    commands: Sender<Command>,
    status: Arc<Mutex<WorkerStatus>>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawn a paused worker thread named `worker-<id>`.
    pub fn spawn(id: usize, search: LocalSearch) -> io::Result<Self> {
        let (commands, receiver) = mpsc::channel();
        let status = Arc::new(Mutex::new(WorkerStatus::new(id, search.config().seeding_rounds)));
        let published = Arc::clone(&status);

        let thread = thread::Builder::new()
            .name(format!("worker-{}", id))
            .spawn(move || run(id, search, receiver, published))?;

        Ok(Self {
            id,
            commands,
            status,
            thread: Some(thread),
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn send(&self, command: Command) -> Result<(), SendError<Command>> {
        self.commands.send(command)
    }

    /// Latest published status.
    pub fn status(&self) -> WorkerStatus {
        lock(&self.status).clone()
    }

    /// Wait for the thread to exit. Only meaningful after [`Command::Stop`].
    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            log::error!("Worker {} panicked", self.id);
        }
    }
}

fn lock(status: &Mutex<WorkerStatus>) -> MutexGuard<'_, WorkerStatus> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run(
    id: usize,
    mut search: LocalSearch,
    commands: Receiver<Command>,
    status: Arc<Mutex<WorkerStatus>>,
) {
    let mut running = false;
    log::debug!("Worker {} started", id);

    loop {
        let failed = search.phase() == SearchPhase::Failed;
        let command = if running && !failed {
            match commands.try_recv() {
                Ok(command) => Some(command),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => break,
            }
        } else {
            match commands.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            }
        };

        if let Some(command) = command {
            match command {
                Command::Resume if failed => log::warn!("Worker {} has failed, ignoring resume", id),
                Command::Resume => running = true,
                Command::Pause => running = false,
                Command::Checkpoint { path, reply } => {
                    // The requester may have given up waiting.
                    let _ = reply.send(checkpoint(id, &search, &path));
                }
                Command::Reset if failed => log::warn!("Worker {} has failed, ignoring reset", id),
                Command::Reset => {
                    log::info!("Worker {} reset at {:.4}", id, search.best_average());
                    search.reset();
                    lock(&status).last_improvement = None;
                }
                Command::Stop => break,
            }
            publish(&status, &search, running);
            continue;
        }

        let previous_phase = search.phase();
        match search.step() {
            Ok(StepOutcome::Improved { previous, current }) => {
                if previous.is_finite() {
                    log::debug!("Worker {} improved {:.4} -> {:.4}", id, previous, current);
                }
                lock(&status).last_improvement = Some((previous, current));
            }
            Ok(StepOutcome::Unchanged) => {}
            Ok(StepOutcome::Halted) => running = false,
            Err(e) => {
                log::error!("Worker {} failed: {}", id, e);
                running = false;
                lock(&status).error = Some(e.to_string());
            }
        }
        if search.phase() == SearchPhase::Refining && previous_phase != SearchPhase::Refining {
            log::info!(
                "Worker {} finished seeding at {:.4}",
                id,
                search.best_average()
            );
        }
        publish(&status, &search, running);
    }

    log::debug!("Worker {} stopped", id);
}

fn publish(status: &Mutex<WorkerStatus>, search: &LocalSearch, running: bool) {
    let mut status = lock(status);
    status.phase = search.phase();
    status.running = running;
    status.best_average = search.best_average();
    status.stats = search.stats();
}

fn checkpoint(id: usize, search: &LocalSearch, path: &Path) -> Result<(), CheckpointError> {
    let tree = search.best_tree().ok_or(CheckpointError::NoTree)?;
    codec::save(tree, path)?;
    log::info!(
        "Worker {} checkpointed {} nodes ({:.4}) to {}",
        id,
        tree.node_count(),
        search.best_average(),
        path.display()
    );
    Ok(())
}

use thiserror::Error;

use crate::models::{ProcessorId, TimeStep, ID};

/// Contract violations reported by the scheduling hooks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("job {job} is already in the ready set")]
    AlreadyReady { job: ID },

    #[error("job {job} is already running on processor {processor}")]
    AlreadyRunning { job: ID, processor: ProcessorId },

    #[error("job {job} is not running on any processor")]
    NotRunning { job: ID },

    #[error("processor {processor} does not exist ({count} processors)")]
    UnknownProcessor { processor: ProcessorId, count: usize },
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("invalid task set: {0}")]
    InvalidTaskSet(#[from] TaskFileError),

    #[error("job {job} of task {task} missed its deadline at t = {t}")]
    DeadlineMissed { job: ID, task: ID, t: TimeStep },

    #[error("no accounting record for job {0}")]
    UnknownJob(ID),

    #[error("platform lock poisoned")]
    LockPoisoned,

    #[error("simulation worker for {0} processors panicked")]
    WorkerPanicked(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskFileError {
    #[error("task {task} has a zero period")]
    ZeroPeriod { task: ID },

    #[error("task {task} has a zero worst-case execution time")]
    ZeroWcet { task: ID },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one processor is required")]
    NoProcessors,

    #[error("at least one worker is required")]
    NoWorkers,

    #[error("missing argument '{0}'")]
    Missing(&'static str),
}

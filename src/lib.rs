//! Global deadline-monotonic scheduling for multiprocessor real-time systems.
//!
//! The decision core lives in [`scheduler`]: a policy owns the ready set and,
//! on each pass, admits at most one job onto the least urgent processor.
//! [`simulation`] is a small periodic-task host that drives it.

pub mod config;
pub mod logger;
pub mod models;
pub mod simulation;
pub mod utils;

pub use models::scheduler;
pub use models::{Job, Processor, ProcessorId, Reschedule, Task, TaskSet, TimeStep, ID};
pub use utils::{constants, errors};
pub use utils::{
    multiple_lcm, ConfigError, DeadlineKey, PolicyKind, SchedulingCode, SchedulingError, SimulationError,
    TaskFileError,
};

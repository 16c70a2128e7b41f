mod job;
pub mod processor;
pub mod scheduler;
pub mod task;
pub mod taskset;

pub use job::Job;
pub use processor::{Processor, Reschedule};
pub use task::Task;
pub use taskset::TaskSet;

pub type TimeStep = usize;

pub type ID = u32;

/// Index of a processor in the platform.
pub type ProcessorId = usize;

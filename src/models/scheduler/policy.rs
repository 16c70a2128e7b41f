use crate::models::{Job, Processor, ProcessorId, Reschedule};
use crate::SchedulingError;

use super::ReadySet;

/// "Run this job on this processor now."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub job: Job,
    pub processor: ProcessorId,
}

/// A global scheduling policy driven by the host's events.
///
/// The host owns the processors and passes them to every call. A policy owns
/// only its ready set.
pub trait SchedulingPolicy: Send {
    fn name(&self) -> &'static str;

    /// Jobs waiting for a processor.
    fn ready(&self) -> &ReadySet;

    /// A job became ready.
    ///
    /// # Returns
    /// The reschedule request for the job's home processor.
    fn on_activate(&mut self, job: Job, processors: &[Processor]) -> Result<Reschedule, SchedulingError>;

    /// A running job completed. Must be called before the host empties the
    /// processor it ran on.
    ///
    /// # Returns
    /// The reschedule request for the processor that was running the job.
    fn on_terminated(&mut self, job: &Job, processors: &[Processor]) -> Result<Reschedule, SchedulingError>;

    /// One scheduling pass requested by `requester`.
    ///
    /// Produces at most one assignment, which the host has to apply. A job
    /// displaced by the assignment is already back in the ready set.
    fn schedule(&mut self, requester: ProcessorId, processors: &[Processor]) -> Option<Assignment>;
}

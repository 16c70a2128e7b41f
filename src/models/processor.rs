use super::{Job, ProcessorId, ID};

/// A request, addressed to the host, to run a scheduling pass for `processor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reschedule {
    pub processor: ProcessorId,
}

/// An execution unit of the platform. Owned by the host; the scheduler only
/// reads which job it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Processor {
    id: ProcessorId,        // Index in the platform
    running: Option<Job>,   // Job currently executing here
}

impl Processor {
    pub fn new(id: ProcessorId) -> Self {
        Self { id, running: None }
    }

    /// Builds `count` idle processors numbered from 0.
    pub fn platform(count: usize) -> Vec<Processor> {
        (0..count).map(Processor::new).collect()
    }

    pub fn id(&self) -> ProcessorId {
        self.id
    }

    pub fn running(&self) -> Option<&Job> {
        self.running.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_none()
    }

    pub fn is_running(&self, job_id: ID) -> bool {
        self.running.map_or(false, |job| job.id() == job_id)
    }

    /// Puts `job` on the processor and returns the job it displaced, if any.
    pub fn set_running(&mut self, job: Job) -> Option<Job> {
        self.running.replace(job)
    }

    /// Empties the processor and returns the job that was running.
    pub fn clear(&mut self) -> Option<Job> {
        self.running.take()
    }

    pub fn request_reschedule(&self) -> Reschedule {
        Reschedule { processor: self.id }
    }
}

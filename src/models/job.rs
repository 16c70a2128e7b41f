use crate::DeadlineKey;

use super::{ProcessorId, TimeStep, ID};

/// One activation of a task.
///
/// A job is an identity plus its deadlines. Where it currently is (ready,
/// running or retired) is tracked by the ready set and the processors, never
/// on the job itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    id: ID,                         // Unique identifier for the job, in creation order
    task_id: ID,                    // Identifier for the associated task
    home: ProcessorId,              // Processor given first chance to run the job
    release: TimeStep,              // Activation instant
    wcet: TimeStep,                 // Execution demand
    task_deadline: TimeStep,        // Relative deadline of the task
    absolute_deadline: TimeStep,    // Absolute deadline for the job (including offsets)
}

impl Job {
    pub fn new(
        id: ID,
        task_id: ID,
        home: ProcessorId,
        release: TimeStep,
        wcet: TimeStep,
        task_deadline: TimeStep,
        absolute_deadline: TimeStep,
    ) -> Self {
        Self {
            id,
            task_id,
            home,
            release,
            wcet,
            task_deadline,
            absolute_deadline,
        }
    }

    pub fn id(&self) -> ID {
        self.id
    }

    pub fn task_id(&self) -> ID {
        self.task_id
    }

    pub fn home(&self) -> ProcessorId {
        self.home
    }

    pub fn release(&self) -> TimeStep {
        self.release
    }

    pub fn wcet(&self) -> TimeStep {
        self.wcet
    }

    pub fn task_deadline(&self) -> TimeStep {
        self.task_deadline
    }

    pub fn absolute_deadline(&self) -> TimeStep {
        self.absolute_deadline
    }

    /// The deadline used as priority under `key`. Smaller is more urgent.
    pub fn deadline(&self, key: DeadlineKey) -> TimeStep {
        match key {
            DeadlineKey::Absolute => self.absolute_deadline,
            DeadlineKey::Relative => self.task_deadline,
        }
    }

    pub fn deadline_missed(&self, t: TimeStep) -> bool {
        t >= self.absolute_deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_key() {
        let job = Job::new(1, 2, 0, 10, 3, 5, 15);
        assert_eq!(job.deadline(DeadlineKey::Absolute), 15);
        assert_eq!(job.deadline(DeadlineKey::Relative), 5);
    }

    #[test]
    fn test_deadline_missed() {
        let job = Job::new(1, 2, 0, 10, 3, 5, 15);
        assert!(!job.deadline_missed(14));
        assert!(job.deadline_missed(15));
    }
}

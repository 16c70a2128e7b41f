use crate::models::{Job, ID};
use crate::{DeadlineKey, SchedulingError};

/// Jobs eligible to run that no processor holds.
///
/// Membership is keyed by job id. Order is irrelevant, so removal swaps the
/// last element into place.
#[derive(Debug, Clone, Default)]
pub struct ReadySet {
    jobs: Vec<Job>,
}

impl ReadySet {
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn contains(&self, job_id: ID) -> bool {
        self.jobs.iter().any(|job| job.id() == job_id)
    }

    pub fn iter(&self) -> std::slice::Iter<Job> {
        self.jobs.iter()
    }

    pub fn insert(&mut self, job: Job) -> Result<(), SchedulingError> {
        if self.contains(job.id()) {
            return Err(SchedulingError::AlreadyReady { job: job.id() });
        }
        self.jobs.push(job);
        Ok(())
    }

    pub fn remove(&mut self, job_id: ID) -> Option<Job> {
        let index = self.jobs.iter().position(|job| job.id() == job_id)?;
        Some(self.jobs.swap_remove(index))
    }

    /// The most urgent ready job: smallest deadline under `key`, then
    /// smallest job id.
    pub fn earliest(&self, key: DeadlineKey) -> Option<&Job> {
        self.jobs.iter().min_by_key(|job| (job.deadline(key), job.id()))
    }
}

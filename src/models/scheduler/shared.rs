use std::sync::{Mutex, MutexGuard};

use crate::models::{Job, Processor, ProcessorId, Reschedule};
use crate::SimulationError;

use super::{Assignment, SchedulingPolicy};

struct PlatformState {
    policy: Box<dyn SchedulingPolicy>,
    processors: Vec<Processor>,
}

/// A policy and its processors behind a single lock, for hosts that drive
/// the scheduler from several threads.
///
/// Every hook, and every pass together with applying its assignment, runs
/// inside one critical section, so no thread can observe a job that is both
/// ready and running.
pub struct SharedPlatform {
    state: Mutex<PlatformState>,
}

impl SharedPlatform {
    pub fn new(policy: Box<dyn SchedulingPolicy>, processor_count: usize) -> Self {
        Self {
            state: Mutex::new(PlatformState {
                policy,
                processors: Processor::platform(processor_count),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<PlatformState>, SimulationError> {
        self.state.lock().map_err(|_| SimulationError::LockPoisoned)
    }

    pub fn activate(&self, job: Job) -> Result<Reschedule, SimulationError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        Ok(state.policy.on_activate(job, &state.processors)?)
    }

    /// Retires the job running on `processor`, if any.
    ///
    /// # Returns
    /// The finished job and the reschedule request for the freed processor.
    pub fn finish_running(&self, processor: ProcessorId) -> Result<Option<(Job, Reschedule)>, SimulationError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let job = match state.processors.get(processor).and_then(|cpu| cpu.running()) {
            Some(job) => *job,
            None => return Ok(None),
        };

        let request = state.policy.on_terminated(&job, &state.processors)?;
        state.processors[processor].clear();
        Ok(Some((job, request)))
    }

    /// Runs one pass for `requester` and applies its assignment.
    pub fn schedule(&self, requester: ProcessorId) -> Result<Option<Assignment>, SimulationError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let assignment = state.policy.schedule(requester, &state.processors);
        if let Some(assignment) = assignment {
            state.processors[assignment.processor].set_running(assignment.job);
        }
        Ok(assignment)
    }

    /// Copies of the ready jobs and of the processors, taken atomically.
    pub fn snapshot(&self) -> Result<(Vec<Job>, Vec<Processor>), SimulationError> {
        let guard = self.lock()?;
        Ok((guard.policy.ready().iter().copied().collect(), guard.processors.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::models::scheduler::DMScheduler;
    use crate::models::ID;

    #[test]
    fn test_concurrent_hosts_keep_jobs_exclusive() {
        let processors = 4;
        let per_thread: ID = 25;
        let platform = Arc::new(SharedPlatform::new(Box::new(DMScheduler::default()), processors));

        let mut threads = vec![];
        for cpu in 0..processors {
            let platform = platform.clone();
            threads.push(thread::spawn(move || {
                let mut finished = 0;
                for i in 0..per_thread {
                    let id = cpu as ID * 1000 + i;
                    let deadline = ((i * 7 + cpu as ID * 3) % 20) as usize;
                    let request = platform.activate(Job::new(id, id, cpu, 0, 1, deadline, deadline)).unwrap();
                    while platform.schedule(request.processor).unwrap().is_some() {}

                    if i % 3 == 0 {
                        if let Some((_, request)) = platform.finish_running(cpu).unwrap() {
                            finished += 1;
                            while platform.schedule(request.processor).unwrap().is_some() {}
                        }
                    }
                }
                finished
            }));
        }

        let finished: usize = threads.into_iter().map(|handle| handle.join().unwrap()).sum();
        let (ready, cpus) = platform.snapshot().unwrap();

        let mut seen = HashSet::new();
        for job in ready.iter().chain(cpus.iter().filter_map(|c| c.running())) {
            assert!(seen.insert(job.id()), "job {} is in two places", job.id());
        }
        assert_eq!(seen.len() + finished, processors * per_thread as usize);
    }

    #[test]
    fn test_finish_idle_processor() {
        let platform = SharedPlatform::new(Box::new(DMScheduler::default()), 2);
        assert!(platform.finish_running(1).unwrap().is_none());
        assert!(platform.finish_running(9).unwrap().is_none());
    }
}

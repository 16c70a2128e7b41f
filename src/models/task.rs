use super::{job::Job, ProcessorId, TimeStep, ID};

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    id: ID,
    offset: TimeStep,            // O_i : Offset.
    wcet: TimeStep,              // C_i : Worst-case execution time.
    deadline: TimeStep,          // D_i : Relative deadline.
    period: TimeStep,            // T_i : Period.
    home: Option<ProcessorId>,   // Designated owner processor, if any.
    jobs_released: u32,
}

impl Task {
    pub fn new(
        id: ID,
        offset: TimeStep,
        wcet: TimeStep,
        deadline: TimeStep,
        period: TimeStep,
    ) -> Self {
        Self {
            id,
            offset,
            wcet,
            deadline,
            period,
            home: None,
            jobs_released: 0,
        }
    }

    /// Pins the task's jobs to a designated home processor.
    pub fn with_home(mut self, home: ProcessorId) -> Self {
        self.home = Some(home);
        self
    }

    pub fn id(&self) -> ID {
        self.id
    }

    pub fn offset(&self) -> TimeStep {
        self.offset
    }

    pub fn wcet(&self) -> TimeStep {
        self.wcet
    }

    pub fn deadline(&self) -> TimeStep {
        self.deadline
    }

    pub fn period(&self) -> TimeStep {
        self.period
    }

    pub fn home(&self) -> Option<ProcessorId> {
        self.home
    }

    pub fn jobs_released(&self) -> u32 {
        self.jobs_released
    }

    /// Releases a job if `t` is one of the task's activation instants.
    ///
    /// # Arguments
    /// * `t` - The current time step.
    /// * `job_id` - The run-wide sequence number given to the new job.
    /// * `home` - The processor asked to pick the job up first.
    ///
    /// # Returns
    /// The released job, or `None` when the task is not activated at `t`.
    pub fn spawn_job(&mut self, t: TimeStep, job_id: ID, home: ProcessorId) -> Option<Job> {
        // Not yet released
        if t < self.offset {
            return None;
        }
        // Not a time at which a job should be released
        if (t - self.offset) % self.period != 0 {
            return None;
        }
        self.jobs_released += 1;
        Some(Job::new(
            job_id,
            self.id,
            home,
            t,
            self.wcet,
            self.deadline,
            t + self.deadline,
        ))
    }
}

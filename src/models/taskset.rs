use crate::{multiple_lcm, TaskFileError};

use super::{Job, ProcessorId, Task, TimeStep, ID};

#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn new_empty() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn get_tasks(&self) -> &Vec<Task> {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<Task> {
        self.tasks.iter()
    }

    /// Rejects task parameters the simulation cannot run with.
    pub fn validate(&self) -> Result<(), TaskFileError> {
        for task in &self.tasks {
            if task.period() == 0 {
                return Err(TaskFileError::ZeroPeriod { task: task.id() });
            }
            if task.wcet() == 0 {
                return Err(TaskFileError::ZeroWcet { task: task.id() });
            }
        }
        Ok(())
    }

    /// Whether some task has a WCET larger than its relative deadline.
    pub fn has_overlong_task(&self) -> bool {
        self.tasks.iter().any(|t| t.wcet() > t.deadline())
    }

    pub fn is_synchronous(&self) -> bool {
        self.tasks.iter().all(|t| t.offset() == self.tasks[0].offset())
    }

    pub fn max_offset(&self) -> TimeStep {
        self.tasks.iter().map(|t| t.offset()).max().unwrap_or(0)
    }

    /// Least common multiple of the periods, `None` on overflow.
    pub fn hyperperiod(&self) -> Option<TimeStep> {
        multiple_lcm(&self.tasks.iter().map(|t| t.period()).collect::<Vec<_>>())
    }

    /// Interval over which simulating the task set is conclusive.
    ///
    /// # Returns
    /// * `(0, O_max + H)` for synchronous sets (all offsets equal).
    /// * `(0, O_max + 2H)` otherwise.
    /// * `None` when the end does not fit in a `TimeStep`.
    pub fn feasibility_interval(&self) -> Option<(TimeStep, TimeStep)> {
        let hyperperiod = self.hyperperiod()?;
        let span = if self.is_synchronous() {
            hyperperiod
        } else {
            hyperperiod.checked_mul(2)?
        };
        Some((0, self.max_offset().checked_add(span)?))
    }

    /// Releases every job activated at `current_time`.
    ///
    /// # Arguments
    /// * `current_time` - The current time step.
    /// * `next_id` - The run-wide job counter, advanced once per released job.
    /// * `home` - Chooses the home processor of a task's new job.
    pub fn release_jobs<F>(&mut self, current_time: TimeStep, next_id: &mut ID, home: F) -> Vec<Job>
    where
        F: Fn(&Task) -> ProcessorId,
    {
        let mut released = Vec::new();
        for task in self.tasks.iter_mut() {
            let processor = home(task);
            if let Some(job) = task.spawn_job(current_time, *next_id, processor) {
                *next_id += 1;
                released.push(job);
            }
        }
        released
    }
}

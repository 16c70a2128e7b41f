//! Unit-step host that drives a scheduling policy with periodic tasks.
//!
//! The host owns the processors, the job accounting and the queue of
//! reschedule requests. The policy only sees the processors through the
//! hooks and hands back assignments, which the host applies.

use std::collections::{HashMap, VecDeque};
use std::thread;

use log::{debug, info, trace};

use crate::models::scheduler::{build_policy, Assignment, ReadySet, SchedulingPolicy};
use crate::models::{Processor, ProcessorId, Reschedule, Task, TaskSet, TimeStep, ID};
use crate::{PolicyKind, SchedulingCode, SimulationError};

/// Longest horizon simulated when none is given explicitly.
pub const DEFAULT_MAX_HORIZON: TimeStep = 10_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub processors: usize,
    pub policy: PolicyKind,
    pub horizon: Option<TimeStep>,
    pub max_horizon: TimeStep,
}

impl Settings {
    pub fn new(processors: usize, policy: PolicyKind) -> Self {
        Self {
            processors,
            policy,
            horizon: None,
            max_horizon: DEFAULT_MAX_HORIZON,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub released: usize,
    pub completed: usize,
    pub preemptions: usize,
    pub migrations: usize,
    pub passes: usize,
}

#[derive(Debug)]
struct Accounting {
    remaining: TimeStep,                // Execution time left
    last_processor: Option<ProcessorId>, // Where the job last ran
}

pub struct Simulation {
    taskset: TaskSet,
    processors: Vec<Processor>,
    policy: Box<dyn SchedulingPolicy>,
    requests: VecDeque<Reschedule>,
    accounting: HashMap<ID, Accounting>,
    task_processor: HashMap<ID, ProcessorId>, // task -> processor its last job ran on
    next_job_id: ID,
    current_time: TimeStep,
    stats: Statistics,
}

impl Simulation {
    /// Fails when some task has a zero period or a zero WCET.
    pub fn new(
        taskset: TaskSet,
        policy: Box<dyn SchedulingPolicy>,
        processors: usize,
    ) -> Result<Self, SimulationError> {
        taskset.validate()?;
        Ok(Self {
            taskset,
            processors: Processor::platform(processors),
            policy,
            requests: VecDeque::new(),
            accounting: HashMap::new(),
            task_processor: HashMap::new(),
            next_job_id: 0,
            current_time: 0,
            stats: Statistics::default(),
        })
    }

    pub fn current_time(&self) -> TimeStep {
        self.current_time
    }

    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    pub fn ready(&self) -> &ReadySet {
        self.policy.ready()
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Runs until `horizon` or the first deadline miss. Deadlines falling
    /// exactly on `horizon` are checked too.
    pub fn run(&mut self, horizon: TimeStep) -> Result<SchedulingCode, SimulationError> {
        let mut outcome = Ok(());
        while self.current_time < horizon && outcome.is_ok() {
            outcome = self.step();
        }
        if outcome.is_ok() {
            outcome = self.check_deadlines();
        }

        match outcome {
            Ok(()) => Ok(SchedulingCode::SchedulableSimulated),
            Err(SimulationError::DeadlineMissed { job, task, t }) => {
                info!("job {} of task {} missed its deadline at t = {}", job, task, t);
                Ok(SchedulingCode::UnschedulableSimulated)
            }
            Err(err) => Err(err),
        }
    }

    /// Simulates one time unit.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        self.check_deadlines()?;
        self.release()?;
        self.dispatch()?;
        self.execute()?;
        self.current_time += 1;
        Ok(())
    }

    fn check_deadlines(&self) -> Result<(), SimulationError> {
        let t = self.current_time;
        let running = self.processors.iter().filter_map(|cpu| cpu.running());

        match self.policy.ready().iter().chain(running).find(|job| job.deadline_missed(t)) {
            Some(job) => Err(SimulationError::DeadlineMissed { job: job.id(), task: job.task_id(), t }),
            None => Ok(()),
        }
    }

    fn release(&mut self) -> Result<(), SimulationError> {
        let task_processor = &self.task_processor;
        let home = |task: &Task| {
            task_processor
                .get(&task.id())
                .copied()
                .or(task.home())
                .unwrap_or(0)
        };
        let released = self.taskset.release_jobs(self.current_time, &mut self.next_job_id, home);

        for job in released {
            trace!("t = {}: release job {} of task {}", self.current_time, job.id(), job.task_id());
            self.accounting.insert(
                job.id(),
                Accounting {
                    remaining: job.wcet(),
                    last_processor: None,
                },
            );
            let request = self.policy.on_activate(job, &self.processors)?;
            self.requests.push_back(request);
            self.stats.released += 1;
        }
        Ok(())
    }

    /// Serves pending reschedule requests. A pass that yields an assignment is
    /// repeated for the same processor until it yields nothing.
    fn dispatch(&mut self) -> Result<(), SimulationError> {
        while let Some(request) = self.requests.pop_front() {
            self.stats.passes += 1;
            if let Some(assignment) = self.policy.schedule(request.processor, &self.processors) {
                self.apply(assignment)?;
                self.requests.push_front(request);
            }
        }
        Ok(())
    }

    fn apply(&mut self, assignment: Assignment) -> Result<(), SimulationError> {
        let Assignment { job, processor } = assignment;

        if let Some(displaced) = self.processors[processor].set_running(job) {
            trace!("t = {}: job {} preempted on processor {}", self.current_time, displaced.id(), processor);
            self.stats.preemptions += 1;
        }

        let record = self
            .accounting
            .get_mut(&job.id())
            .ok_or(SimulationError::UnknownJob(job.id()))?;
        if record.last_processor.map_or(false, |last| last != processor) {
            self.stats.migrations += 1;
        }
        record.last_processor = Some(processor);
        self.task_processor.insert(job.task_id(), processor);
        Ok(())
    }

    fn execute(&mut self) -> Result<(), SimulationError> {
        for index in 0..self.processors.len() {
            let job = match self.processors[index].running() {
                Some(job) => *job,
                None => continue,
            };

            let record = self
                .accounting
                .get_mut(&job.id())
                .ok_or(SimulationError::UnknownJob(job.id()))?;
            record.remaining -= 1;
            if record.remaining > 0 {
                continue;
            }

            let request = self.policy.on_terminated(&job, &self.processors)?;
            self.processors[index].clear();
            self.accounting.remove(&job.id());
            self.requests.push_back(request);
            self.stats.completed += 1;
            trace!("t = {}: job {} completed on processor {}", self.current_time + 1, job.id(), index);
        }
        Ok(())
    }
}

/// Simulates `taskset` under `settings`, with the trivial shortcuts first.
pub fn simulate(taskset: TaskSet, settings: &Settings) -> Result<SchedulingCode, SimulationError> {
    taskset.validate()?;

    if taskset.is_empty() {
        return Ok(SchedulingCode::SchedulableShortcut);
    }

    if taskset.has_overlong_task() {
        return Ok(SchedulingCode::UnschedulableShortcut);
    }

    let horizon = match settings.horizon {
        Some(horizon) => horizon,
        None => {
            let Some((_, end)) = taskset.feasibility_interval() else {
                info!("feasibility interval does not fit in a time step");
                return Ok(SchedulingCode::CannotTell);
            };
            if end > settings.max_horizon {
                info!("feasibility interval {} exceeds the limit {}", end, settings.max_horizon);
                return Ok(SchedulingCode::CannotTell);
            }
            end
        }
    };

    let policy = build_policy(settings.policy);
    debug!(
        "simulating {} tasks on {} processors with {} over [0, {})",
        taskset.len(),
        settings.processors,
        policy.name(),
        horizon
    );

    let mut simulation = Simulation::new(taskset, policy, settings.processors)?;
    let code = simulation.run(horizon)?;
    info!("{} processors: {:?} {:?}", settings.processors, code, simulation.stats());
    Ok(code)
}

/// Simulates `taskset` on 1 to `settings.processors` processors, running at
/// most `workers` independent simulations at a time.
pub fn sweep(
    taskset: &TaskSet,
    settings: &Settings,
    workers: usize,
) -> Vec<(usize, Result<SchedulingCode, SimulationError>)> {
    let counts: Vec<usize> = (1..=settings.processors).collect();
    let mut results = Vec::with_capacity(counts.len());

    for batch in counts.chunks(workers.max(1)) {
        let mut threads = vec![];
        for &count in batch {
            let taskset = taskset.clone();
            let settings = Settings {
                processors: count,
                ..settings.clone()
            };
            threads.push((count, thread::spawn(move || simulate(taskset, &settings))));
        }

        for (count, handle) in threads {
            let result = handle
                .join()
                .unwrap_or(Err(SimulationError::WorkerPanicked(count)));
            results.push((count, result));
        }
    }

    results
}

use std::cmp::Ordering;

use log::{debug, trace, warn};

use crate::models::{Job, Processor, ProcessorId, Reschedule};
use crate::{DeadlineKey, SchedulingError};

use super::{Assignment, ReadySet, SchedulingPolicy};

/// Global deadline-monotonic scheduler.
///
/// Any processor may receive any job. Each pass admits the most urgent ready
/// job onto the least urgent processor if that processor is idle or runs a
/// job with a strictly later deadline.
#[derive(Debug, Clone, Default)]
pub struct DMScheduler {
    key: DeadlineKey,   // Deadline used as priority
    ready: ReadySet,    // Jobs waiting for a processor
}

impl DMScheduler {
    pub fn new(key: DeadlineKey) -> Self {
        Self {
            key,
            ready: ReadySet::new(),
        }
    }

    /// Orders processors from best to worst preemption victim.
    ///
    /// Idle processors come first, then busy ones by decreasing deadline of
    /// their running job. Ties go to `requester`, then to the lower id.
    fn victim_order(&self, a: &Processor, b: &Processor, requester: ProcessorId) -> Ordering {
        let by_running = match (a.running(), b.running()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => y.deadline(self.key).cmp(&x.deadline(self.key)),
        };

        by_running
            .then_with(|| (b.id() == requester).cmp(&(a.id() == requester)))
            .then_with(|| a.id().cmp(&b.id()))
    }

    fn victim<'a>(&self, requester: ProcessorId, processors: &'a [Processor]) -> Option<&'a Processor> {
        processors
            .iter()
            .min_by(|a, b| self.victim_order(a, b, requester))
    }
}

impl SchedulingPolicy for DMScheduler {
    fn name(&self) -> &'static str {
        match self.key {
            DeadlineKey::Absolute => "dm",
            DeadlineKey::Relative => "dm-relative",
        }
    }

    fn ready(&self) -> &ReadySet {
        &self.ready
    }

    fn on_activate(&mut self, job: Job, processors: &[Processor]) -> Result<Reschedule, SchedulingError> {
        let home = match processors.get(job.home()) {
            Some(home) => home,
            None => {
                let err = SchedulingError::UnknownProcessor { processor: job.home(), count: processors.len() };
                warn!("rejecting activation: {}", err);
                return Err(err);
            }
        };

        if let Some(cpu) = processors.iter().find(|p| p.is_running(job.id())) {
            let err = SchedulingError::AlreadyRunning { job: job.id(), processor: cpu.id() };
            warn!("rejecting activation: {}", err);
            return Err(err);
        }

        if let Err(err) = self.ready.insert(job) {
            warn!("rejecting activation: {}", err);
            return Err(err);
        }

        trace!("job {} ready, deadline {}", job.id(), job.deadline(self.key));
        Ok(home.request_reschedule())
    }

    fn on_terminated(&mut self, job: &Job, processors: &[Processor]) -> Result<Reschedule, SchedulingError> {
        match processors.iter().find(|p| p.is_running(job.id())) {
            Some(cpu) => {
                trace!("job {} terminated on processor {}", job.id(), cpu.id());
                Ok(cpu.request_reschedule())
            }
            None => {
                let err = SchedulingError::NotRunning { job: job.id() };
                warn!("rejecting termination: {}", err);
                Err(err)
            }
        }
    }

    fn schedule(&mut self, requester: ProcessorId, processors: &[Processor]) -> Option<Assignment> {
        let job = *self.ready.earliest(self.key)?;
        let cpu_min = self.victim(requester, processors)?;

        let admit = match cpu_min.running() {
            None => true,
            Some(running) => running.deadline(self.key) > job.deadline(self.key),
        };

        if !admit {
            return None;
        }

        self.ready.remove(job.id());
        if let Some(displaced) = cpu_min.running() {
            debug!(
                "job {} (deadline {}) displaces job {} (deadline {}) on processor {}",
                job.id(),
                job.deadline(self.key),
                displaced.id(),
                displaced.deadline(self.key),
                cpu_min.id()
            );
            let reinserted = self.ready.insert(*displaced);
            debug_assert!(reinserted.is_ok(), "displaced job {} is already ready", displaced.id());
            if let Err(err) = reinserted {
                warn!("displaced job was already ready: {}", err);
            }
        } else {
            debug!("job {} admitted on idle processor {}", job.id(), cpu_min.id());
        }

        Some(Assignment {
            job,
            processor: cpu_min.id(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ID;

    fn job(id: ID, deadline: usize) -> Job {
        Job::new(id, id, 0, 0, 1, deadline, deadline)
    }

    fn apply(processors: &mut [Processor], assignment: Assignment) {
        processors[assignment.processor].set_running(assignment.job);
    }

    fn ready_ids(scheduler: &DMScheduler) -> Vec<ID> {
        let mut ids: Vec<ID> = scheduler.ready().iter().map(|j| j.id()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_empty_ready_set() {
        let mut scheduler = DMScheduler::default();
        let processors = Processor::platform(2);

        assert_eq!(scheduler.schedule(0, &processors), None);
    }

    #[test]
    fn test_idle_platform_prefers_requester() {
        let mut scheduler = DMScheduler::default();
        let processors = Processor::platform(2);
        scheduler.on_activate(job(1, 5), &processors).unwrap();

        let assignment = scheduler.schedule(0, &processors).unwrap();
        assert_eq!(assignment, Assignment { job: job(1, 5), processor: 0 });
        assert!(scheduler.ready().is_empty());

        let mut scheduler = DMScheduler::default();
        scheduler.on_activate(job(1, 5), &processors).unwrap();
        assert_eq!(scheduler.schedule(1, &processors).unwrap().processor, 1);
    }

    #[test]
    fn test_preempts_lowest_priority_processor() {
        let mut scheduler = DMScheduler::default();
        let mut processors = Processor::platform(2);
        processors[0].set_running(job(1, 10));
        processors[1].set_running(job(2, 3));
        scheduler.on_activate(job(3, 1), &processors).unwrap();

        let assignment = scheduler.schedule(0, &processors).unwrap();
        assert_eq!(assignment, Assignment { job: job(3, 1), processor: 0 });
        assert_eq!(ready_ids(&scheduler), vec![1]);
        // Displaced job keeps its deadline.
        assert_eq!(scheduler.ready().iter().next().unwrap().absolute_deadline(), 10);
    }

    #[test]
    fn test_victim_ignores_requester_when_busy_elsewhere_is_later() {
        let mut scheduler = DMScheduler::default();
        let mut processors = Processor::platform(2);
        processors[0].set_running(job(1, 3));
        processors[1].set_running(job(2, 10));
        scheduler.on_activate(job(3, 1), &processors).unwrap();

        assert_eq!(scheduler.schedule(0, &processors).unwrap().processor, 1);
    }

    #[test]
    fn test_idle_processor_beats_busy_one_on_equal_deadline() {
        let mut scheduler = DMScheduler::default();
        let mut processors = Processor::platform(2);
        processors[0].set_running(job(1, 5));
        scheduler.on_activate(job(2, 5), &processors).unwrap();

        let assignment = scheduler.schedule(0, &processors).unwrap();
        assert_eq!(assignment, Assignment { job: job(2, 5), processor: 1 });
        assert!(scheduler.ready().is_empty());
    }

    #[test]
    fn test_no_preemption_for_later_or_equal_deadline() {
        let mut scheduler = DMScheduler::default();
        let mut processors = Processor::platform(1);
        processors[0].set_running(job(1, 5));

        scheduler.on_activate(job(2, 10), &processors).unwrap();
        assert_eq!(scheduler.schedule(0, &processors), None);
        assert_eq!(ready_ids(&scheduler), vec![2]);

        scheduler.on_activate(job(3, 5), &processors).unwrap();
        assert_eq!(scheduler.schedule(0, &processors), None);
        assert_eq!(ready_ids(&scheduler), vec![2, 3]);
        assert!(processors[0].is_running(1));
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let mut scheduler = DMScheduler::default();
        let mut processors = Processor::platform(2);
        processors[0].set_running(job(1, 4));
        processors[1].set_running(job(2, 9));
        scheduler.on_activate(job(3, 6), &processors).unwrap();

        let assignment = scheduler.schedule(1, &processors).unwrap();
        apply(&mut processors, assignment);

        assert_eq!(scheduler.schedule(1, &processors), None);
        assert_eq!(scheduler.schedule(0, &processors), None);
        assert_eq!(ready_ids(&scheduler), vec![2]);
    }

    #[test]
    fn test_equal_busy_processors_keep_work_on_requester() {
        let mut processors = Processor::platform(3);
        processors[0].set_running(job(1, 8));
        processors[1].set_running(job(2, 8));
        processors[2].set_running(job(3, 8));

        for requester in 0..3 {
            let mut scheduler = DMScheduler::default();
            scheduler.on_activate(job(4, 2), &processors).unwrap();
            assert_eq!(scheduler.schedule(requester, &processors).unwrap().processor, requester);
        }
    }

    #[test]
    fn test_unknown_requester_falls_back_to_lowest_id() {
        let mut scheduler = DMScheduler::default();
        let processors = Processor::platform(2);
        scheduler.on_activate(job(1, 5), &processors).unwrap();

        assert_eq!(scheduler.schedule(42, &processors).unwrap().processor, 0);
    }

    #[test]
    fn test_relative_key_orders_by_task_deadline() {
        let mut scheduler = DMScheduler::new(DeadlineKey::Relative);
        let mut processors = Processor::platform(1);
        // Relative deadline 3, absolute 100.
        processors[0].set_running(Job::new(1, 1, 0, 97, 1, 3, 100));
        // Relative deadline 5, absolute 20.
        scheduler.on_activate(Job::new(2, 2, 0, 15, 1, 5, 20), &processors).unwrap();

        assert_eq!(scheduler.name(), "dm-relative");
        assert_eq!(scheduler.schedule(0, &processors), None);

        let mut scheduler = DMScheduler::new(DeadlineKey::Absolute);
        scheduler.on_activate(Job::new(2, 2, 0, 15, 1, 5, 20), &processors).unwrap();
        assert_eq!(scheduler.schedule(0, &processors).unwrap().job.id(), 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "is already ready")]
    fn test_displacing_a_job_that_is_also_ready() {
        let mut scheduler = DMScheduler::default();
        let mut processors = Processor::platform(1);
        scheduler.on_activate(job(1, 10), &processors).unwrap();
        // The host runs job 1 without going through a pass.
        processors[0].set_running(job(1, 10));
        scheduler.on_activate(job(2, 1), &processors).unwrap();

        scheduler.schedule(0, &processors);
    }

    #[test]
    fn test_activate_contract_violations() {
        let mut scheduler = DMScheduler::default();
        let mut processors = Processor::platform(2);
        processors[1].set_running(job(1, 5));

        assert_eq!(
            scheduler.on_activate(job(1, 5), &processors),
            Err(SchedulingError::AlreadyRunning { job: 1, processor: 1 })
        );

        assert_eq!(scheduler.on_activate(job(2, 5), &processors), Ok(Reschedule { processor: 0 }));
        assert_eq!(
            scheduler.on_activate(job(2, 5), &processors),
            Err(SchedulingError::AlreadyReady { job: 2 })
        );

        let homeless = Job::new(3, 3, 7, 0, 1, 5, 5);
        assert_eq!(
            scheduler.on_activate(homeless, &processors),
            Err(SchedulingError::UnknownProcessor { processor: 7, count: 2 })
        );
        assert_eq!(ready_ids(&scheduler), vec![2]);
    }

    #[test]
    fn test_activate_requests_home_processor() {
        let mut scheduler = DMScheduler::default();
        let processors = Processor::platform(3);

        let request = scheduler.on_activate(Job::new(1, 1, 2, 0, 1, 5, 5), &processors).unwrap();
        assert_eq!(request, Reschedule { processor: 2 });
    }

    #[test]
    fn test_terminated_requests_freed_processor() {
        let mut scheduler = DMScheduler::default();
        let mut processors = Processor::platform(2);
        processors[1].set_running(job(1, 5));
        scheduler.on_activate(job(2, 9), &processors).unwrap();

        assert_eq!(scheduler.on_terminated(&job(1, 5), &processors), Ok(Reschedule { processor: 1 }));
        assert_eq!(ready_ids(&scheduler), vec![2]);

        processors[1].clear();
        assert_eq!(
            scheduler.on_terminated(&job(1, 5), &processors),
            Err(SchedulingError::NotRunning { job: 1 })
        );
    }
}

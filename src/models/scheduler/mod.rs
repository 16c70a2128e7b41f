pub mod dm_scheduler;
pub mod policy;
pub mod ready_set;
pub mod shared;

pub use dm_scheduler::DMScheduler;
pub use policy::{Assignment, SchedulingPolicy};
pub use ready_set::ReadySet;
pub use shared::SharedPlatform;

use crate::PolicyKind;

/// Builds the policy selected at startup.
pub fn build_policy(kind: PolicyKind) -> Box<dyn SchedulingPolicy> {
    match kind {
        PolicyKind::DeadlineMonotonic | PolicyKind::RelativeDeadlineMonotonic => {
            Box::new(DMScheduler::new(kind.deadline_key()))
        }
    }
}

pub mod constants;
pub mod errors;
pub mod lcm;

pub use constants::{DeadlineKey, PolicyKind, SchedulingCode};
pub use errors::{ConfigError, SchedulingError, SimulationError, TaskFileError};
pub use lcm::multiple_lcm;

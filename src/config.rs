use clap::ArgMatches;
use log::LevelFilter;

use crate::simulation::{Settings, DEFAULT_MAX_HORIZON};
use crate::{ConfigError, PolicyKind, TimeStep};

/// Typed view of the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub task_file: String,
    pub processors: usize,
    pub policy: PolicyKind,
    pub horizon: Option<TimeStep>,
    pub max_horizon: TimeStep,
    pub workers: usize,
    pub sweep: bool,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let task_file = matches
            .get_one::<String>("task_file")
            .cloned()
            .ok_or(ConfigError::Missing("task_file"))?;

        let processors = *matches.get_one::<usize>("m").ok_or(ConfigError::Missing("m"))?;
        if processors == 0 {
            return Err(ConfigError::NoProcessors);
        }

        let workers = matches.get_one::<usize>("workers").copied().unwrap_or(1);
        if workers == 0 {
            return Err(ConfigError::NoWorkers);
        }

        let log_level = if matches.get_flag("quiet") {
            LevelFilter::Error
        } else {
            match matches.get_count("verbose") {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        };

        Ok(Self {
            task_file,
            processors,
            policy: matches.get_one::<PolicyKind>("policy").copied().unwrap_or_default(),
            horizon: matches.get_one::<TimeStep>("horizon").copied(),
            max_horizon: matches.get_one::<TimeStep>("max_horizon").copied().unwrap_or(DEFAULT_MAX_HORIZON),
            workers,
            sweep: matches.get_flag("sweep"),
            log_level,
        })
    }

    pub fn settings(&self) -> Settings {
        Settings {
            processors: self.processors,
            policy: self.policy,
            horizon: self.horizon,
            max_horizon: self.max_horizon,
        }
    }
}

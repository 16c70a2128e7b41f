use std::error::Error;
use std::process;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use csv::{ReaderBuilder, Trim};

use dm_global::config::Config;
use dm_global::logger::Logger;
use dm_global::simulation::{simulate, sweep};
use dm_global::{PolicyKind, SchedulingCode, Task, TaskSet, TimeStep};

/// Exit status for unreadable input or a failed run.
const EXIT_FAILURE: i32 = 5;

/// Reads a task set file and returns a `TaskSet`
///
/// Each line is `offset, wcet, deadline, period[, home]`, without header.
pub fn read_task_file(file_path: &str) -> Result<TaskSet, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(file_path)?;
    let mut tasks = Vec::new();

    let mut id = 1;

    for result in rdr.records() {
        let record = result?;
        if record.len() < 4 {
            return Err(format!("line {}: expected at least 4 fields, found {}", id, record.len()).into());
        }

        let offset: TimeStep = record[0].parse()?;
        let computation_time: TimeStep = record[1].parse()?;
        let deadline: TimeStep = record[2].parse()?;
        let period: TimeStep = record[3].parse()?;

        let mut task = Task::new(id, offset, computation_time, deadline, period);
        if let Some(home) = record.get(4).filter(|field| !field.is_empty()) {
            task = task.with_home(home.parse()?);
        }

        tasks.push(task);
        id += 1;
    }

    let taskset = TaskSet::new(tasks);
    taskset.validate()?;
    Ok(taskset)
}

pub fn build_cli_command() -> Command {
    Command::new("dm-global")
        .version("0.1.0")
        .about("Simulates global deadline-monotonic scheduling of a periodic task set")
        .disable_version_flag(true)

        .arg(Arg::new("task_file")
            .required(true)
            .help("Path to the task set file"))

        .arg(Arg::new("m")
            .required(true)
            .value_parser(value_parser!(usize))
            .help("Number of processors"))

        .arg(Arg::new("policy")
            .short('p')
            .long("policy")
            .value_parser(value_parser!(PolicyKind))
            .default_value("dm")
            .help("Scheduling policy (dm or dm-relative)"))

        .arg(Arg::new("horizon")
            .short('t')
            .long("horizon")
            .value_parser(value_parser!(TimeStep))
            .help("Number of time steps to simulate (default: feasibility interval)"))

        .arg(Arg::new("max_horizon")
            .long("max-horizon")
            .value_parser(value_parser!(TimeStep))
            .help("Give up when the feasibility interval is longer than this"))

        .arg(Arg::new("workers")
            .short('w')
            .long("workers")
            .value_parser(value_parser!(usize))
            .default_value("4")
            .help("Number of simulations run in parallel with --sweep"))

        .arg(Arg::new("sweep")
            .long("sweep")
            .action(ArgAction::SetTrue)
            .help("Simulate on every processor count from 1 to m"))

        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .help("Log more (repeat for debug and trace)"))

        .arg(Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .conflicts_with("verbose")
            .help("Only log errors"))
}

fn main() {
    // cargo run <task_file> <m> [-p dm|dm-relative] [-t horizon] [-w workers] [--sweep] [-v|-q]
    // example : cargo run tasks.csv 4 -p dm --sweep -w 8
    let matches: ArgMatches = build_cli_command().get_matches();

    let config = match Config::from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid arguments: {}", e);
            process::exit(EXIT_FAILURE);
        }
    };

    if let Err(e) = Logger::install(config.log_level) {
        eprintln!("Cannot install logger: {}", e);
    }

    // Read tasks from file
    let taskset = match read_task_file(&config.task_file) {
        Ok(taskset) => taskset,
        Err(e) => {
            eprintln!("Error reading task file: {}", e);
            process::exit(EXIT_FAILURE);
        }
    };

    if config.sweep {
        let mut last = SchedulingCode::CannotTell;
        let mut fewest = None;
        for (count, result) in sweep(&taskset, &config.settings(), config.workers) {
            match result {
                Ok(code) => {
                    println!("{:>4} processors: {:?}", count, code);
                    if code.is_schedulable() && fewest.is_none() {
                        fewest = Some(count);
                    }
                    last = code;
                }
                Err(e) => {
                    eprintln!("Simulation on {} processors failed: {}", count, e);
                    process::exit(EXIT_FAILURE);
                }
            }
        }
        match fewest {
            Some(count) => println!("Schedulable from {} processors", count),
            None => println!("Not schedulable on up to {} processors", config.settings().processors),
        }
        process::exit(last as i32);
    }

    match simulate(taskset, &config.settings()) {
        Ok(code) => {
            println!("{:?}", code);
            process::exit(code as i32);
        }
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}

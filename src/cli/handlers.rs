use tracing::debug;

use crate::cli::commands::Cli;
use crate::cli::output::{command_help, format_help, format_task_table};
use crate::io::config_io::{self, ConfigError};
use crate::io::store_io::{self, StoreError};
use crate::model::config::{Settings, TaskRules};
use crate::model::task::{Store, Task, TaskId, TaskStatus, Timestamp};
use crate::ops::task_ops::{self, TaskError};

/// Everything that can stop a command from completing
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("command '{0}' does not exist (try `tasker help`)")]
    UnknownCommand(String),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not format output: {0}")]
    Output(#[from] serde_json::Error),
}

/// A fully validated request for one repository operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { description: String },
    Update { id: TaskId, description: String },
    Delete { id: TaskId },
    Mark { id: TaskId, status: TaskStatus },
    List { status: Option<String> },
    Help,
}

/// What a successful command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Task),
    Updated(TaskId),
    Deleted(TaskId),
    Marked(TaskId, TaskStatus),
    Listed(Vec<Task>),
    Help,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Command {
    /// Map a command name and its raw positional arguments to a command.
    pub fn parse(name: &str, args: &[String]) -> Result<Command, CommandError> {
        let command = match name {
            "add" => {
                let [description] = expect_args::<1>(name, args)?;
                Command::Add {
                    description: description.clone(),
                }
            }
            "update" => {
                let [id, description] = expect_args::<2>(name, args)?;
                Command::Update {
                    id: parse_id(id)?,
                    description: description.clone(),
                }
            }
            "delete" => {
                let [id] = expect_args::<1>(name, args)?;
                Command::Delete { id: parse_id(id)? }
            }
            "mark-in-progress" => {
                let [id] = expect_args::<1>(name, args)?;
                Command::Mark {
                    id: parse_id(id)?,
                    status: TaskStatus::InProgress,
                }
            }
            "mark-done" => {
                let [id] = expect_args::<1>(name, args)?;
                Command::Mark {
                    id: parse_id(id)?,
                    status: TaskStatus::Done,
                }
            }
            "list" => match args {
                [] => Command::List { status: None },
                [status] => Command::List {
                    status: Some(status.clone()),
                },
                _ => return Err(usage_error(name)),
            },
            "help" => {
                let [] = expect_args::<0>(name, args)?;
                Command::Help
            }
            _ => return Err(CommandError::UnknownCommand(name.to_string())),
        };
        Ok(command)
    }

    /// Whether the store has to be written back after this command
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Command::List { .. } | Command::Help)
    }
}

fn expect_args<'a, const N: usize>(
    name: &str,
    args: &'a [String],
) -> Result<&'a [String; N], CommandError> {
    args.try_into().map_err(|_| usage_error(name))
}

fn usage_error(name: &str) -> CommandError {
    let usage = command_help(name).map_or(name, |c| c.usage);
    TaskError::Validation(format!("wrong number of arguments, usage: tasker {}", usage)).into()
}

/// Parse a task id typed on the command line
pub fn parse_id(raw: &str) -> Result<TaskId, TaskError> {
    let n: i64 = raw
        .trim()
        .parse()
        .map_err(|_| TaskError::Validation(format!("id must be an integer, got '{}'", raw)))?;
    if n < 1 {
        return Err(TaskError::Validation(
            "id must be an integer greater than 0".into(),
        ));
    }
    TaskId::try_from(n).map_err(|_| TaskError::Validation(format!("id {} is out of range", n)))
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Apply one command to an in-memory store.
pub fn execute(
    command: Command,
    store: &mut Store,
    rules: &TaskRules,
    now: Timestamp,
) -> Result<Outcome, TaskError> {
    match command {
        Command::Add { description } => {
            let task = task_ops::add_task(store, &description, rules, now)?;
            Ok(Outcome::Added(task.clone()))
        }
        Command::Update { id, description } => {
            task_ops::update_task(store, id, &description, rules, now)?;
            Ok(Outcome::Updated(id))
        }
        Command::Delete { id } => {
            task_ops::delete_task(store, id)?;
            Ok(Outcome::Deleted(id))
        }
        Command::Mark { id, status } => {
            task_ops::mark_task(store, id, status, now)?;
            Ok(Outcome::Marked(id, status))
        }
        Command::List { status } => {
            let tasks = task_ops::list_tasks(store, status.as_deref())?;
            Ok(Outcome::Listed(tasks.into_iter().cloned().collect()))
        }
        Command::Help => Ok(Outcome::Help),
    }
}

/// One load, operate, save cycle against the store file.
pub fn run(command: Command, settings: &Settings) -> Result<Outcome, CommandError> {
    let mut store = store_io::load_store(&settings.store_path)?;
    let mutating = command.is_mutating();
    debug!(?command, "executing");

    let outcome = execute(command, &mut store, &settings.rules, Timestamp::now())?;

    if mutating {
        store_io::save_store(&settings.store_path, &store)?;
    }
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), CommandError> {
    let command = match cli.command.as_deref() {
        Some(name) => Command::parse(name, &cli.args)?,
        None => Command::Help,
    };

    // help never reads the config or touches the store
    let outcome = match command {
        Command::Help => Outcome::Help,
        command => {
            let settings = config_io::load_settings(cli.file)?;
            run(command, &settings)?
        }
    };
    print_outcome(&outcome, cli.json)
}

fn print_outcome(outcome: &Outcome, json: bool) -> Result<(), CommandError> {
    match outcome {
        Outcome::Added(task) => println!("Task added with ID {}", task.id),
        Outcome::Updated(id) => println!("Task {} updated", id),
        Outcome::Deleted(id) => println!("Task {} deleted", id),
        Outcome::Marked(id, status) => println!("Task {} marked as {}", id, status),
        Outcome::Listed(tasks) => {
            if json {
                println!("{}", serde_json::to_string_pretty(tasks)?);
            } else {
                let refs: Vec<&Task> = tasks.iter().collect();
                print_lines(&format_task_table(&refs));
            }
        }
        Outcome::Help => print_lines(&format_help()),
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "tasker",
    about = concat!("tasker v", env!("CARGO_PKG_VERSION"), " - track small tasks in a JSON file"),
    version,
    allow_negative_numbers = true,
    after_help = "Run `tasker help` for the list of commands with examples."
)]
pub struct Cli {
    /// Task store file (overrides TASKER_FILE and the config file)
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Print `list` output as JSON
    #[arg(long)]
    pub json: bool,

    /// One of: add, update, delete, mark-in-progress, mark-done, list, help
    pub command: Option<String>,

    /// Positional arguments for the command
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

use crate::model::task::Task;
use crate::util::unicode::pad_left;

// ---------------------------------------------------------------------------
// Command reference
// ---------------------------------------------------------------------------

/// One entry of the command reference
pub struct CommandHelp {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub example: &'static str,
}

pub const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "add",
        usage: "add <description>",
        summary: "add a new task. 1 positional argument - description",
        example: "`add \"go to job\"`",
    },
    CommandHelp {
        name: "update",
        usage: "update <id> <description>",
        summary: "update description of the task. 2 positional args: id, description",
        example: "`update 1 \"go to job and gym\"`",
    },
    CommandHelp {
        name: "delete",
        usage: "delete <id>",
        summary: "delete a task. 1 positional arg - id",
        example: "`delete 1`",
    },
    CommandHelp {
        name: "mark-done",
        usage: "mark-done <id>",
        summary: "mark a task as done. 1 positional arg - id",
        example: "`mark-done 1`",
    },
    CommandHelp {
        name: "mark-in-progress",
        usage: "mark-in-progress <id>",
        summary: "mark a task as in-progress. 1 positional arg - id",
        example: "`mark-in-progress 1`",
    },
    CommandHelp {
        name: "list",
        usage: "list [todo|in-progress|done]",
        summary: "print tasks. Nothing or 1 positional arg - done/in-progress/todo",
        example: "`list`, `list todo`",
    },
    CommandHelp {
        name: "help",
        usage: "help",
        summary: "print this list of commands",
        example: "`help`",
    },
];

const HELP_NAME_WIDTH: usize = 18;

pub fn command_help(name: &str) -> Option<&'static CommandHelp> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// The `help` listing: name, summary and an example per command
pub fn format_help() -> Vec<String> {
    let mut lines = Vec::new();
    for cmd in COMMANDS {
        lines.push(format!("{:<width$}{}", cmd.name, cmd.summary, width = HELP_NAME_WIDTH));
        lines.push(format!(
            "{}Example: {}",
            " ".repeat(HELP_NAME_WIDTH),
            cmd.example
        ));
        lines.push(String::new());
    }
    lines
}

// ---------------------------------------------------------------------------
// Task table
// ---------------------------------------------------------------------------

const ID_WIDTH: usize = 2;
const DESCRIPTION_WIDTH: usize = 30;
const STATUS_WIDTH: usize = 11;
const STAMP_WIDTH: usize = 16;
const SEPARATOR: &str = " | ";
const RULE_WIDTH: usize = 87;

fn table_row(id: &str, description: &str, status: &str, created: &str, updated: &str) -> String {
    [
        pad_left(id, ID_WIDTH),
        pad_left(description, DESCRIPTION_WIDTH),
        pad_left(status, STATUS_WIDTH),
        pad_left(created, STAMP_WIDTH),
        pad_left(updated, STAMP_WIDTH),
    ]
    .join(SEPARATOR)
}

/// Render tasks as a fixed-width table. Header and rule are always present.
pub fn format_task_table(tasks: &[&Task]) -> Vec<String> {
    let mut lines = Vec::with_capacity(tasks.len() + 2);
    lines.push(table_row("id", "description", "status", "created", "updated"));
    lines.push("-".repeat(RULE_WIDTH));
    for task in tasks {
        lines.push(table_row(
            &task.id.to_string(),
            &task.description,
            task.status.as_str(),
            task.created.as_str(),
            task.updated.as_str(),
        ));
    }
    lines
}

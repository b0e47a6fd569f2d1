use clap::Parser;
use std::path::PathBuf;

mod command;
pub use command::TaskCommand;

const COMMANDS_HELP: &str = "\
Commands:
  get_tasks_by_date <YYYY-MM-DD>     Tasks completed on a date
  get_tasks_by_category <category>   Tasks in a category
  get_pending_tasks                  Tasks not started yet
  get_in_progress_tasks              Tasks currently in progress
  get_all_tasks_sorted               All tasks, most recently done first
  mark_in_progress <task name>       Start working on a task
  <task name>                        Complete an in-progress task

Run without a command to start a chat session (type 'exit' or 'quit' to leave).";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, after_help = COMMANDS_HELP)]
pub struct Cli {
    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Task file to use instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,

    /// Task command and its argument; omit to start chatting
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}

impl Cli {
    /// The command line words rejoined the way they were typed.
    pub fn command_text(&self) -> Option<String> {
        if self.words.is_empty() {
            None
        } else {
            Some(self.words.join(" "))
        }
    }
}

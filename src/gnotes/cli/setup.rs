use clap::{Args, CommandFactory, Parser, Subcommand};
use gnotes::model::{parse_priority, NoteId};

#[derive(Parser, Debug)]
#[command(
    name = "gnotes",
    bin_name = "gnotes",
    version,
    disable_help_subcommand = true
)]
#[command(
    about = "Todo notes kept in a single synced JSON document",
    long_about = "Todo notes kept in a single synced JSON document.\n\n\
                  Run without a command to open the full-screen view."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Notes(NoteCommands),

    /// Show or set configuration
    Config {
        key: Option<String>,
        value: Option<String>,
    },

    /// Print help for gnotes or one of its commands
    Help { command: Option<String> },
}

/// Commands that work on the note store.
#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Quick add a note from the command line
    Qa {
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },

    /// Add a note in your editor
    #[command(alias = "a")]
    Add,

    /// Edit a note in your editor
    #[command(alias = "e")]
    Edit { id: NoteId },

    /// Mark a note as done
    #[command(alias = "md")]
    Done { id: NoteId },

    /// Mark a note as not done
    Undone { id: NoteId },

    /// Set the priority of a note (0-5)
    #[command(alias = "p")]
    Prio { id: NoteId, priority: String },

    /// Show a note in full
    #[command(alias = "s")]
    Show { id: NoteId },

    /// Remove a note
    #[command(alias = "rm")]
    Remove { id: NoteId },

    /// Remove all notes
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// List all notes
    #[command(alias = "ls")]
    List(ListArgs),

    /// List notes that are not done
    #[command(alias = "td")]
    Todo(ListArgs),

    /// Add a tag to a note
    #[command(alias = "t")]
    Tag { id: NoteId, tag: String },

    /// Remove a tag from a note
    #[command(alias = "rt")]
    Rtag { id: NoteId, tag: String },

    /// Remove all tags from a note
    #[command(alias = "ct")]
    Ctags { id: NoteId },

    /// List the tags in use
    Tags,

    /// Set the due date of a note, omit the date to clear it
    #[command(alias = "d")]
    Due {
        id: NoteId,
        #[arg(num_args = 0..)]
        date: Vec<String>,
    },

    /// Open every url found in a note in the browser
    #[command(alias = "u")]
    Urls { id: NoteId },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Sort keys, e.g. "-prio,due"
    #[arg(short, long, allow_hyphen_values = true)]
    pub order: Option<String>,

    /// Only notes containing this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only notes with at least this priority
    #[arg(short = 'p', long = "prio", value_parser = priority_arg)]
    pub prio: Option<u8>,

    /// Only notes with this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Print full notes instead of a table
    #[arg(short, long)]
    pub long: bool,
}

fn priority_arg(value: &str) -> Result<u8, String> {
    parse_priority(value).map_err(|e| e.to_string())
}

/// Prints top level help, or the help of `command` when it names one.
pub fn print_help(command: Option<&str>) -> gnotes::error::Result<()> {
    let mut cmd = Cli::command();
    let sub = command.and_then(|name| cmd.find_subcommand(name).cloned());
    match sub {
        Some(sub) => {
            let bin_name = format!("gnotes {}", sub.get_name());
            sub.bin_name(bin_name).print_help()?
        }
        None => cmd.print_help()?,
    }
    Ok(())
}

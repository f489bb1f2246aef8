use crate::export::ReportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rAttendance
/// CLI application to reconcile scanned attendance against event rosters with SQLite
#[derive(Parser)]
#[command(
    name = "rattendance",
    version = env!("CARGO_PKG_VERSION"),
    about = "A simple attendance CLI: record scanned check-ins per session and export reports using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create, list or delete events
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Manage an event roster
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },

    /// List the students of an event with their per-session presence
    Students {
        #[arg(long = "event", help = "Event id")]
        event: i64,
    },

    /// Record scanned tokens for an event session
    ///
    /// Tokens are taken from the command line, or read one per line from
    /// standard input when none are given.
    Scan {
        #[arg(long = "event", help = "Event id")]
        event: i64,

        #[arg(long = "session", help = "Session: morning, afternoon or evening (default from config)")]
        session: Option<String>,

        /// Tokens to process, in order
        tokens: Vec<String>,
    },

    /// Add a token that is not on the roster and check it in
    Admit {
        #[arg(long = "event", help = "Event id")]
        event: i64,

        #[arg(long = "token", help = "Scanned token (roll number)")]
        token: String,

        #[arg(long = "name", help = "Student name (defaults to the roll number)")]
        name: Option<String>,

        #[arg(long = "session", help = "Session: morning, afternoon or evening (default from config)")]
        session: Option<String>,
    },

    /// Print the attendance records of an event
    Records {
        #[arg(long = "event", help = "Event id")]
        event: i64,

        #[arg(long = "session", help = "Only records of this session")]
        session: Option<String>,

        #[arg(long = "json", help = "Print records as JSON")]
        json: bool,
    },

    /// Export attendance records to CSV or TXT
    Export {
        #[arg(long = "event", help = "Event id")]
        event: i64,

        #[arg(long = "format", value_enum, default_value = "csv", help = "Report format")]
        format: ReportFormat,

        #[arg(long = "session", help = "Only records of this session")]
        session: Option<String>,

        #[arg(
            long = "file",
            conflicts_with = "dir",
            help = "Output file (default: <event_name>.<format> in export_dir)"
        )]
        file: Option<String>,

        #[arg(long = "dir", help = "Output directory (overrides export_dir)")]
        dir: Option<String>,

        #[arg(long = "force", help = "Overwrite the output file without asking")]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long = "file", help = "Destination file for the backup")]
        file: String,

        #[arg(long = "compress", help = "Zip the backup file")]
        compress: bool,

        #[arg(long = "force", help = "Overwrite the destination without asking")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum EventAction {
    /// Create a new event
    Create {
        /// Event name
        name: String,
    },

    /// List events, newest first
    List,

    /// Delete an event with its roster and records
    Delete {
        /// Event id
        id: i64,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum RosterAction {
    /// Import `roll,name` rows from a CSV file
    Import {
        #[arg(long = "event", help = "Event id")]
        event: i64,

        #[arg(long = "file", help = "CSV file with roll number and name columns")]
        file: String,
    },
}

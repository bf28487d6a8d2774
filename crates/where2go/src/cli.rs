//! Clap derive structures for the `where2go` CLI.
//!
//! Compiled into build.rs as well, so it may only use clap and std.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// where2go -- admin client for the Where2Go travel catalog
#[derive(Debug, Parser)]
#[command(
    name = "where2go",
    version,
    about = "Manage the Where2Go travel catalog from the command line",
    long_about = "Sign in to a Where2Go backend and manage its states, cities and\n\
        destinations. The session cookie is kept per profile, so one login\n\
        serves every later command until `where2go logout`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "WHERE2GO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend origin (overrides profile)
    #[arg(long, short = 'b', env = "WHERE2GO_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WHERE2GO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "WHERE2GO_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "WHERE2GO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Color if stderr is a terminal
    Auto,
    Always,
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and keep the session for later commands
    Login(LoginArgs),

    /// Sign out and forget the saved session
    Logout,

    /// Show the signed-in admin
    Whoami,

    /// Browse and edit states
    #[command(alias = "st")]
    States(StatesArgs),

    /// Browse and edit cities
    #[command(alias = "ci")]
    Cities(CitiesArgs),

    /// Browse destinations
    #[command(alias = "dest")]
    Destinations(DestinationsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username or email (falls back to the profile, then a prompt)
    #[arg(long, short = 'i', env = "WHERE2GO_IDENTIFIER")]
    pub identifier: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

// ── States ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatesArgs {
    #[command(subcommand)]
    pub command: StatesCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatesCommand {
    /// List states
    #[command(alias = "ls")]
    List,

    /// Show a state and its cities
    Show {
        /// State ID
        id: String,
    },

    /// Create a state, or update one with --id
    Save(StateSaveArgs),
}

#[derive(Debug, Args)]
pub struct StateSaveArgs {
    /// State to update; omit to create
    #[arg(long)]
    pub id: Option<String>,

    /// State name
    #[arg(long)]
    pub name: Option<String>,

    /// Orphan city to attach (repeatable)
    #[arg(long = "city", value_name = "CITY_ID")]
    pub cities: Vec<String>,

    /// Read `{id?, name, cities}` from a JSON file; flags override it
    #[arg(long, short = 'F', value_name = "PATH")]
    pub from_file: Option<PathBuf>,
}

// ── Cities ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CitiesArgs {
    #[command(subcommand)]
    pub command: CitiesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CitiesCommand {
    /// List cities
    #[command(alias = "ls")]
    List,

    /// Show a city and its destinations
    Show {
        /// City ID
        id: String,
    },

    /// List cities not attached to any state
    Orphans,

    /// Create a city, or update one with --id
    Save(CitySaveArgs),
}

#[derive(Debug, Args)]
pub struct CitySaveArgs {
    /// City to update; omit to create
    #[arg(long)]
    pub id: Option<String>,

    /// City name (at least three characters)
    #[arg(long)]
    pub name: Option<String>,

    /// Six-digit pincode, e.g. 411001 or "411 001"
    #[arg(long)]
    pub pincode: Option<String>,

    /// Orphan destination to attach (repeatable)
    #[arg(long = "destination", value_name = "DESTINATION_ID")]
    pub destinations: Vec<String>,

    /// Read `{id?, name, pincode, destinations}` from a JSON file; flags override it
    #[arg(long, short = 'F', value_name = "PATH")]
    pub from_file: Option<PathBuf>,
}

// ── Destinations ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DestinationsArgs {
    #[command(subcommand)]
    pub command: DestinationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DestinationsCommand {
    /// List destinations
    #[command(alias = "ls")]
    List,

    /// List destinations not attached to any city
    Orphans,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

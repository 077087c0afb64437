//! Clap derive structures for the `scaledeck` CLI.
//!
//! Also compiled by `build.rs` for man page generation, so this module may
//! only depend on `clap` and `clap_complete`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// scaledeck -- admin console for Headscale servers
#[derive(Debug, Parser)]
#[command(
    name = "scaledeck",
    version,
    about = "Administer a Headscale server from the command line",
    long_about = "List, inspect and clean up Headscale users, nodes and keys,\n\
        and export them as JSON, YAML or CSV.",
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
    /// Server profile to use
    #[arg(long, short = 'p', env = "SCALEDECK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Headscale server URL (overrides profile)
    #[arg(long, short = 's', env = "SCALEDECK_SERVER", global = true)]
    pub server: Option<String>,

    /// Headscale API key
    #[arg(long, env = "SCALEDECK_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SCALEDECK_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SCALEDECK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SCALEDECK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage nodes (machines)
    #[command(alias = "n", alias = "machines")]
    Nodes(NodesArgs),

    /// List pre-auth keys
    #[command(alias = "pak")]
    Preauthkeys(PreAuthKeysArgs),

    /// Manage API keys
    Apikeys(ApiKeysArgs),

    /// Show the ACL policy
    Policy(PolicyArgs),

    /// Check server health
    Health,

    /// Export cached resources to files
    Export(ExportArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users, optionally narrowed to one
    #[command(alias = "ls")]
    List(UserQuery),

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User ID
        id: String,
    },
}

/// At most one lookup key; the server accepts a single filter.
#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct UserQuery {
    /// Match by user ID
    #[arg(long)]
    pub id: Option<String>,

    /// Match by user name
    #[arg(long)]
    pub name: Option<String>,

    /// Match by email address
    #[arg(long)]
    pub email: Option<String>,
}

// ── Nodes ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List all nodes
    #[command(alias = "ls")]
    List,

    /// Show one node
    Get {
        /// Node ID
        id: String,
    },

    /// Delete a node
    #[command(alias = "rm")]
    Delete {
        /// Node ID
        id: String,
    },
}

// ── Pre-auth keys ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PreAuthKeysArgs {
    #[command(subcommand)]
    pub command: PreAuthKeysCommand,
}

#[derive(Debug, Subcommand)]
pub enum PreAuthKeysCommand {
    /// List pre-auth keys across users
    #[command(alias = "ls")]
    List {
        /// Only these user IDs (repeatable); defaults to every user
        #[arg(long = "user", short = 'u')]
        users: Vec<String>,
    },
}

// ── API keys ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ApiKeysArgs {
    #[command(subcommand)]
    pub command: ApiKeysCommand,
}

#[derive(Debug, Subcommand)]
pub enum ApiKeysCommand {
    /// List API keys
    #[command(alias = "ls")]
    List,

    /// Delete an API key by prefix, or by numeric ID with --id
    #[command(alias = "rm")]
    Delete {
        /// Key prefix as listed (decorations are stripped), or ID with --id
        key: String,

        /// Treat KEY as a numeric ID
        #[arg(long)]
        id: bool,
    },

    /// Expire an API key
    Expire {
        /// Key prefix as listed
        prefix: String,
    },
}

// ── Policy ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

#[derive(Debug, Subcommand)]
pub enum PolicyCommand {
    /// Print the raw policy document
    Get,
}

// ── Export ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// File format
    #[arg(long, short = 'f', default_value = "json")]
    pub format: ExportFormatArg,

    /// Resources to include (repeatable); defaults to all
    #[arg(long = "resource", short = 'r', value_delimiter = ',')]
    pub resources: Vec<ExportResourceArg>,

    /// Include the metadata block in JSON and YAML output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub metadata: bool,

    /// Write JSON content into the .yaml file
    #[arg(long)]
    pub yaml_as_json: bool,

    /// Output directory (defaults to the configured export_dir, else ".")
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Json,
    Csv,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportResourceArg {
    Users,
    Nodes,
    #[value(alias = "preauthkeys")]
    PreAuthKeys,
    #[value(alias = "apikeys")]
    ApiKeys,
    Policy,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the resolved configuration (secrets masked)
    Show,

    /// Set a profile field (server, ca_cert, insecure, timeout, api_key_env)
    Set {
        /// Field name
        key: String,
        /// New value
        value: String,
    },

    /// Store an API key for the active profile in the system keyring
    SetKey,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

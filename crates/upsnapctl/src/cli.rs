//! Clap derive structures for the `upsnapctl` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// upsnapctl -- manage UpSnap devices and device groups
#[derive(Debug, Parser)]
#[command(
    name = "upsnapctl",
    version,
    about = "Manage UpSnap devices and device groups from the command line",
    long_about = "Create, read, update and delete the devices and device groups \
        held by an UpSnap backend.\n\n\
        Each invocation authenticates once with username and password and \
        performs a single operation.",
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
    #[arg(long, short = 'p', env = "UPSNAP_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 'H', env = "UPSNAP_HOST", global = true)]
    pub host: Option<String>,

    /// Login identity (overrides profile)
    #[arg(long, short = 'u', env = "UPSNAP_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "UPSNAP_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "UPSNAP_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "UPSNAP_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

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
    /// Plain text, identifier only (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage wake-on-LAN devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage device groups
    #[command(alias = "g")]
    Groups(GroupsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// Create a device
    Create(DeviceSpec),

    /// Show a device
    Get {
        /// Device record ID
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        id: String,
    },

    /// Replace every field of a device
    ///
    /// Optional fields left out are cleared on the backend.
    Update {
        /// Device record ID
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        id: String,

        #[command(flatten)]
        spec: DeviceSpec,
    },

    /// Delete a device (succeeds if already absent)
    #[command(alias = "rm")]
    Delete {
        /// Device record ID
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        id: String,
    },
}

/// The full desired field set of a device.
#[derive(Debug, Args)]
pub struct DeviceSpec {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// IPv4 address
    #[arg(long)]
    pub ip: String,

    /// MAC address
    #[arg(long)]
    pub mac: String,

    /// Subnet mask
    #[arg(long)]
    pub netmask: String,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,

    /// Web link, opened in a new tab by the dashboard
    #[arg(long)]
    pub link: Option<String>,

    /// Device group ID (repeatable, order is kept)
    #[arg(long = "group", value_name = "ID")]
    pub groups: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GROUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// Create a device group
    Create {
        /// Group name
        #[arg(long)]
        name: String,
    },

    /// Show a device group
    Get {
        /// Group record ID
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        id: String,
    },

    /// Rename a device group
    Update {
        /// Group record ID
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        id: String,

        /// New group name
        #[arg(long)]
        name: String,
    },

    /// Delete a device group (succeeds if already absent)
    #[command(alias = "rm")]
    Delete {
        /// Group record ID
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display the current configuration (secrets redacted)
    Show,

    /// Add or replace a profile
    Init {
        /// Backend base URL (e.g., http://upsnap.lan:8090)
        #[arg(long)]
        host: String,

        /// Login identity
        #[arg(long)]
        username: String,

        /// Environment variable holding the password
        #[arg(long)]
        password_env: Option<String>,

        /// Make this the default profile
        #[arg(long)]
        set_default: bool,
    },

    /// Store a password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

//! Clap derive structures for the `sensordesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use sensordesk_core::{SensorCategory, SensorColor, SensorId, SortOrder, Visibility};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sensordesk -- administer sensors and users from the command line
#[derive(Debug, Parser)]
#[command(
    name = "sensordesk",
    version,
    about = "Manage sensors and users from the command line",
    long_about = "A command-line front-end for the sensor administration backend.\n\n\
        Listing and searching are best-effort: failures are reported on stderr\n\
        and the command still completes. Login and logout fail loudly.",
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
    #[arg(long, short = 'p', env = "SENSORDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 's', env = "SENSORDESK_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SENSORDESK_OUTPUT",
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
    #[arg(long, short = 'k', env = "SENSORDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SENSORDESK_TIMEOUT", global = true)]
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
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
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
    /// Sign in and remember the session
    Login(LoginArgs),

    /// Sign out and forget the session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Browse, search and edit sensors
    #[command(alias = "s")]
    Sensors(SensorsArgs),

    /// Manage user accounts
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email, then prompts)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prefer the keyring or SENSORDESK_PASSWORD)
    #[arg(long, hide_env = true, env = "SENSORDESK_PASSWORD")]
    pub password: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SENSORS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SensorsArgs {
    #[command(subcommand)]
    pub command: SensorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SensorsCommand {
    /// List one page of sensors
    #[command(alias = "ls")]
    List {
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,

        /// Page size (defaults to the profile's page size)
        #[arg(long)]
        size: Option<u32>,

        /// Sort key
        #[arg(long, default_value = "name")]
        sort: String,
    },

    /// Show one sensor
    Get {
        /// Sensor ID
        id: SensorId,
    },

    /// Search sensors by term, or interactively with --live
    Search {
        /// Search term
        #[arg(required_unless_present = "live", conflicts_with = "live")]
        term: Option<String>,

        /// Search as you type
        #[arg(long)]
        live: bool,
    },

    /// Create a sensor
    Add {
        /// Sensor name
        #[arg(long)]
        name: String,

        /// What the sensor measures
        #[arg(long, value_parser = parse_enum::<SensorCategory>)]
        category: Option<SensorCategory>,

        /// Display color
        #[arg(long, value_parser = parse_enum::<SensorColor>)]
        color: Option<SensorColor>,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,

        /// private or public
        #[arg(long, default_value = "private", value_parser = parse_enum::<Visibility>)]
        visibility: Visibility,
    },

    /// Change fields of an existing sensor
    Edit {
        /// Sensor ID
        id: SensorId,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New category
        #[arg(long, value_parser = parse_enum::<SensorCategory>)]
        category: Option<SensorCategory>,

        /// New color
        #[arg(long, value_parser = parse_enum::<SensorColor>)]
        color: Option<SensorColor>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New visibility
        #[arg(long, value_parser = parse_enum::<Visibility>)]
        visibility: Option<Visibility>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// Show one user
    Get {
        /// User UUID
        uuid: Uuid,
    },

    /// Search users by name or email
    #[command(alias = "ls")]
    List {
        /// Substring to match
        #[arg(long, default_value = "")]
        search: String,

        /// Order by name: asc, desc or none
        #[arg(long, default_value = "none", value_parser = parse_enum::<SortOrder>)]
        sort: SortOrder,
    },

    /// Create a user (admin only)
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Phone number, e.g. +351912345678
        #[arg(long)]
        phone: String,

        /// Picture URL, or an image file to inline as a data URL
        #[arg(long)]
        picture: Option<String>,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },

    /// Change fields of an existing user
    Edit {
        /// User UUID
        uuid: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Picture URL or image file; empty removes it
        #[arg(long)]
        picture: Option<String>,

        /// Set the admin role on or off
        #[arg(long)]
        admin: Option<bool>,
    },
}

/// `value_parser` adapter for the strum-derived domain enums.
fn parse_enum<T>(raw: &str) -> Result<T, String>
where
    T: std::str::FromStr + strum::VariantNames,
{
    raw.parse().map_err(|_| {
        format!(
            "'{raw}' is not one of: {}",
            T::VARIANTS.join(", ").to_lowercase()
        )
    })
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
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (e.g., "server", "email", "password_policy")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

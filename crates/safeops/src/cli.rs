//! Clap derive structures for the `safeops` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use safeops_core::{HazardStatus, Likelihood, RiskLevel, Severity, UserRole};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// safeops -- manage venues, risk assessments, and approvals
#[derive(Debug, Parser)]
#[command(
    name = "safeops",
    version,
    about = "Manage SafeOps venues and risk-assessment worksheets from the command line",
    long_about = "A CLI for the SafeOps workplace-safety backend.\n\n\
        Lists and edits venues and Risk Assessment Worksheets (RAWs),\n\
        drives the submit/approve/reject lifecycle, and can follow the\n\
        backend's realtime change feed.",
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
    #[arg(long, short = 'p', env = "SAFEOPS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'b', env = "SAFEOPS_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Service API key
    #[arg(long, env = "SAFEOPS_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SAFEOPS_OUTPUT",
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
    #[arg(long, short = 'k', env = "SAFEOPS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (defaults to the profile's value)
    #[arg(long, env = "SAFEOPS_TIMEOUT", global = true)]
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
    /// Manage venues and their hazards
    #[command(alias = "v")]
    Venues(VenuesArgs),

    /// Manage Risk Assessment Worksheets
    #[command(alias = "r")]
    Raws(RawsArgs),

    /// View notifications
    #[command(alias = "n")]
    Notifications(NotificationsArgs),

    /// Account operations (sign-up, sign-in, whoami)
    Account(AccountArgs),

    /// Follow the realtime change feed and live store state
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VENUES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VenuesArgs {
    #[command(subcommand)]
    pub command: VenuesCommand,
}

#[derive(Debug, Subcommand)]
pub enum VenuesCommand {
    /// List venues, most recently updated first
    #[command(alias = "ls")]
    List {
        /// Substring match on name, address, or postal code
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Get one venue
    Get {
        /// Venue ID
        venue: Uuid,
    },

    /// Create a venue
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        postal_code: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,

        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
    },

    /// Update venue fields
    Update {
        /// Venue ID
        venue: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        postal_code: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<f64>,
    },

    /// List a venue's hazards, worst first
    Hazards {
        /// Venue ID
        venue: Uuid,
    },

    /// Attach a hazard to a venue
    AddHazard {
        /// Venue ID
        venue: Uuid,

        #[arg(long)]
        category: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        severity: Severity,

        #[arg(long)]
        likelihood: Likelihood,

        /// Initial lifecycle status
        #[arg(long, default_value = "open")]
        status: HazardStatus,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RAWS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RawsArgs {
    #[command(subcommand)]
    pub command: RawsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RawsCommand {
    /// List RAWs, most recently updated first
    #[command(alias = "ls")]
    List {
        /// Only RAWs authored by this user
        #[arg(long)]
        user: Option<Uuid>,
    },

    /// Get one RAW with its hazards
    Get {
        /// RAW ID
        raw: Uuid,
    },

    /// Create a RAW (status defaults to draft, risk level to medium)
    Create {
        /// Author's user ID
        #[arg(long)]
        user: Uuid,

        /// Venue the assessment covers
        #[arg(long)]
        venue: Uuid,

        #[arg(long)]
        risk_level: Option<RiskLevel>,
    },

    /// Update RAW fields
    Update {
        /// RAW ID
        raw: Uuid,

        #[arg(long)]
        venue: Option<Uuid>,

        #[arg(long)]
        risk_level: Option<RiskLevel>,
    },

    /// Submit a draft RAW for approval
    Submit {
        /// RAW ID
        raw: Uuid,

        /// Author's user ID (receives the submission notification)
        #[arg(long)]
        user: Uuid,
    },

    /// Approve a submitted RAW
    Approve {
        /// RAW ID
        raw: Uuid,

        /// Approver's user ID
        #[arg(long)]
        approver: Uuid,
    },

    /// Reject a submitted RAW with comments
    Reject {
        /// RAW ID
        raw: Uuid,

        /// Approver's user ID
        #[arg(long)]
        approver: Uuid,

        /// Why the RAW was rejected
        #[arg(long)]
        comments: String,
    },

    /// Delete a RAW
    Delete {
        /// RAW ID
        raw: Uuid,
    },

    /// List a RAW's hazards, worst first
    Hazards {
        /// RAW ID
        raw: Uuid,
    },

    /// Attach a hazard to a RAW
    AddHazard {
        /// RAW ID
        raw: Uuid,

        #[arg(long)]
        description: String,

        #[arg(long)]
        severity: Severity,

        #[arg(long)]
        likelihood: Likelihood,

        #[arg(long, default_value = "")]
        controls: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NOTIFICATIONS / ACCOUNT / WATCH / CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List a user's notifications, newest first
    #[command(alias = "ls")]
    List {
        /// User ID
        #[arg(long)]
        user: Uuid,
    },
}

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Register an account and create its profile
    SignUp {
        #[arg(long)]
        email: String,

        #[arg(long)]
        full_name: String,

        #[arg(long)]
        role: UserRole,
    },

    /// Sign in and print the access token
    SignIn {
        #[arg(long)]
        email: String,
    },

    /// Revoke an access token
    SignOut {
        #[arg(long, env = "SAFEOPS_ACCESS_TOKEN", hide_env = true)]
        access_token: String,
    },

    /// Show the profile behind an access token
    Whoami {
        #[arg(long, env = "SAFEOPS_ACCESS_TOKEN", hide_env = true)]
        access_token: String,
    },
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Only watch one relation (venues | raws)
    #[arg(long)]
    pub only: Option<WatchTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WatchTarget {
    Venues,
    Raws,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the resolved configuration
    Show,

    /// Store an API key in the system keyring for a profile
    SetKey {
        /// Profile name
        #[arg(long, default_value = "default")]
        profile: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

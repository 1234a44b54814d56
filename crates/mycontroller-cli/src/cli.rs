//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mycontroller_types::RetentionDuration;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "mcsettings")]
#[command(author, version, about = "Manage MyController server settings", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// MyController server URL (overrides config)
    #[arg(short, long, global = true, env = "MC_SERVER_URL")]
    pub server: Option<String>,

    /// Use this configuration file instead of the default one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `--json` wins over `--format`.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the settings of one screen
    Show {
        #[arg(value_enum)]
        screen: Screen,
    },

    /// Change settings
    Set {
        #[command(subcommand)]
        target: SetTarget,
    },

    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Settings screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Screen {
    /// Location and controller settings
    System,
    /// Sensor variable units
    Units,
    /// Email, SMS and Pushbullet
    Notifications,
    /// MySensors defaults
    Mysensors,
    /// Chart defaults and data retention
    Metrics,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SetTarget {
    /// Server location used for sunrise and sunset
    Location {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true, requires = "longitude")]
        latitude: Option<f64>,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true, requires = "latitude")]
        longitude: Option<f64>,

        /// Use the position from the [location] section of the config file
        #[arg(long, conflicts_with_all = ["latitude", "longitude"])]
        locate: bool,
    },

    /// Core controller settings
    Controller {
        /// Node alive check interval in minutes
        #[arg(long)]
        alive_check_minutes: Option<f64>,

        /// Page refresh time in seconds
        #[arg(long)]
        page_refresh_seconds: Option<f64>,

        /// Language id (e.g. en_us)
        #[arg(long)]
        language: Option<String>,

        /// Resources log level
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Display unit of a sensor variable type
    Unit {
        /// Variable type (e.g. V_TEMP)
        variable: String,

        /// Unit to display (e.g. °C)
        unit: String,
    },

    /// Outgoing email server
    Email {
        #[arg(long)]
        smtp_host: Option<String>,

        #[arg(long)]
        smtp_port: Option<u16>,

        #[arg(long)]
        smtp_username: Option<String>,

        #[arg(long)]
        smtp_password: Option<String>,

        #[arg(long)]
        enable_ssl: Option<bool>,

        #[arg(long)]
        from_address: Option<String>,
    },

    /// SMS gateway
    Sms {
        #[arg(long)]
        vendor: Option<String>,

        #[arg(long)]
        auth_sid: Option<String>,

        #[arg(long)]
        auth_token: Option<String>,

        #[arg(long)]
        phone_number: Option<String>,
    },

    /// Pushbullet account
    Pushbullet {
        #[arg(long)]
        access_token: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Default firmware for MySensors nodes
    Mysensors {
        /// Firmware reference id
        #[arg(long)]
        default_firmware: String,
    },

    /// Chart defaults
    Metrics {
        /// Default chart time range (e.g. 1h, 6h, 1d)
        #[arg(long)]
        default_time_range: RetentionDuration,
    },

    /// Metrics data retention windows (e.g. 7d, 12h, 30m)
    Retention {
        #[arg(long)]
        raw_data: Option<RetentionDuration>,

        #[arg(long)]
        one_minute: Option<RetentionDuration>,

        #[arg(long)]
        five_minutes: Option<RetentionDuration>,

        #[arg(long)]
        one_hour: Option<RetentionDuration>,

        #[arg(long)]
        six_hours: Option<RetentionDuration>,

        #[arg(long)]
        twelve_hours: Option<RetentionDuration>,

        #[arg(long)]
        one_day: Option<RetentionDuration>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}

/// Configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// MyController server URL
    ServerUrl,
    /// Basic auth user name
    Username,
    /// Basic auth password
    Password,
    /// Language for CLI messages
    Language,
    /// Disable colored output
    NoColor,
    /// Skip confirmation prompts
    AssumeYes,
}

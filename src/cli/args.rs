use clap::{Parser, Subcommand};

use crate::alerts::AlertFilter;
pub use crate::export::ExportFormat;
use crate::models::{MetricKind, QualityTier, SensorStatus};

#[derive(Parser)]
#[command(name = "airwatch")]
#[command(about = "Indoor air-quality dashboard for school buildings")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Override timezone
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON output format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable colorized table output
    #[arg(long, global = true)]
    pub colored: bool,

    /// Seed for generated trend data (0 = random)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Username for the access gate
    #[arg(short, long, global = true, env = "AIRWATCH_USER")]
    pub user: Option<String>,

    /// Password for the access gate
    #[arg(short, long, global = true, env = "AIRWATCH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize fresh configuration
    Init,
    /// Set configuration value
    Set {
        /// Configuration key (e.g., display.timezone)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Subcommand)]
pub enum Commands {
    /// List classrooms with their current readings and quality tiers
    Rooms {
        /// Only rooms in this building
        #[arg(long)]
        building: Option<String>,

        /// Only rooms whose overall tier matches (good, moderate, poor, critical)
        #[arg(long)]
        tier: Option<QualityTier>,
    },

    /// Show one classroom in detail, including its 24h trend
    Room {
        /// Room id
        id: String,
    },

    /// List alerts, unresolved first, then by severity
    Alerts {
        /// Which alerts to show (active, resolved, all)
        #[arg(long, default_value = "active")]
        status: AlertFilter,

        /// Resolve the given alert ids before listing
        #[arg(long, value_delimiter = ',')]
        resolve: Vec<String>,
    },

    /// List sensors
    Sensors {
        /// Only sensors installed in this room
        #[arg(long)]
        room: Option<String>,

        /// Only sensors with this status (active, inactive, maintenance)
        #[arg(long)]
        status: Option<SensorStatus>,
    },

    /// Show the reference threshold table
    Thresholds,

    /// Building-wide statistics per metric
    Analysis {
        /// Limit to one metric (co2, pm25, temperature, humidity)
        #[arg(long)]
        metric: Option<MetricKind>,
    },

    /// Classify a single reading
    Classify {
        /// Metric (co2, pm25, temperature, humidity)
        metric: String,
        /// Reading value
        value: f64,
    },

    /// Export a report snapshot
    Export {
        /// Export format (defaults to export.default_format)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        /// Output path (file, or directory for workbook)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Interactive full-screen dashboard
    Dashboard {
        /// Clock refresh interval in seconds (defaults to general.refresh_interval_secs)
        #[arg(long)]
        refresh_secs: Option<u64>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::date_format::{parse_timezone, DateFormat};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    pub output: OutputConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub refresh_interval_secs: u64,
    pub fixture_seed: u64, // 0 = random trend data each run
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: String, // "table" or "json"
    pub colored: bool,
    pub decimal_places: u8,
    pub date_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub directory: String,
    pub default_format: String, // "report", "workbook" or "json"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig {
                refresh_interval_secs: 30,
                fixture_seed: 0,
            },
            output: OutputConfig {
                format: "table".to_string(),
                colored: false,
                decimal_places: 1,
                date_format: "yyyy-mm-dd".to_string(),
            },
            display: DisplayConfig {
                timezone: "UTC".to_string(),
            },
            export: ExportConfig {
                directory: ".".to_string(),
                default_format: "report".to_string(),
            },
            dashboard: DashboardConfig { tick_rate_ms: 200 },
        }
    }
}

impl Config {
    /// Load from an explicit path, creating it with defaults if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = self.to_commented_toml();

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// TOML with a comment block above every option
    pub fn to_commented_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# airwatch Configuration File\n");
        output.push_str("# Indoor air-quality dashboard - Configuration Options\n");
        output.push_str("#\n");
        output.push_str("# All settings have sensible defaults and can be overridden via CLI flags.\n");
        output.push('\n');

        section(&mut output, "GENERAL SETTINGS");
        output.push_str("[general]\n");
        output.push_str("# How often the dashboard refreshes its \"last update\" clock (seconds)\n");
        output.push_str("# Only the displayed time changes; readings are fixture data\n");
        output.push_str(&format!("refresh_interval_secs = {}\n", self.general.refresh_interval_secs));
        output.push('\n');
        output.push_str("# Seed for the generated 24h trend data\n");
        output.push_str("#   0   - Different random trends on every run (default)\n");
        output.push_str("#   N>0 - Same trends on every run, useful for screenshots and demos\n");
        output.push_str(&format!("fixture_seed = {}\n", self.general.fixture_seed));
        output.push('\n');

        section(&mut output, "OUTPUT SETTINGS");
        output.push_str("[output]\n");
        output.push_str("# Default output format:\n");
        output.push_str("#   \"table\" - Human-readable tables (recommended for terminal use)\n");
        output.push_str("#   \"json\"  - Machine-readable JSON (good for scripting)\n");
        output.push_str("# Can be overridden with --json flag\n");
        output.push_str(&format!("format = \"{}\"\n", self.output.format));
        output.push('\n');
        output.push_str("# Color quality tiers in tables (green/yellow/orange/red)\n");
        output.push_str("# Can be overridden with --colored flag\n");
        output.push_str(&format!("colored = {}\n", self.output.colored));
        output.push('\n');
        output.push_str("# Decimal places for averages and readings in tables\n");
        output.push_str(&format!("decimal_places = {}\n", self.output.decimal_places));
        output.push('\n');
        output.push_str("# Date format: \"yyyy-mm-dd\", \"dd-mm-yyyy\" or \"mm-dd-yyyy\"\n");
        output.push_str(&format!("date_format = \"{}\"\n", self.output.date_format));
        output.push('\n');

        section(&mut output, "DISPLAY SETTINGS");
        output.push_str("[display]\n");
        output.push_str("# Timezone for every displayed timestamp\n");
        output.push_str("# Examples: \"UTC\", \"Europe/Madrid\", \"America/New_York\"\n");
        output.push_str(&format!("timezone = \"{}\"\n", self.display.timezone));
        output.push('\n');

        section(&mut output, "EXPORT SETTINGS");
        output.push_str("[export]\n");
        output.push_str("# Directory where report snapshots are written\n");
        output.push_str(&format!("directory = \"{}\"\n", self.export.directory));
        output.push('\n');
        output.push_str("# Default export format:\n");
        output.push_str("#   \"report\"   - Paginated plain-text document\n");
        output.push_str("#   \"workbook\" - Two CSV sheets (rooms.csv, alerts.csv)\n");
        output.push_str("#   \"json\"     - Full snapshot as JSON\n");
        output.push_str(&format!("default_format = \"{}\"\n", self.export.default_format));
        output.push('\n');

        section(&mut output, "DASHBOARD SETTINGS");
        output.push_str("[dashboard]\n");
        output.push_str("# Redraw interval of the interactive dashboard (milliseconds)\n");
        output.push_str(&format!("tick_rate_ms = {}\n", self.dashboard.tick_rate_ms));
        output.push('\n');

        section(&mut output, "USAGE NOTES");
        output.push_str("#\n");
        output.push_str("# To reset to defaults: airwatch config init\n");
        output.push_str("# To modify values:     airwatch config set display.timezone Europe/Madrid\n");
        output.push_str("# To view current:      airwatch config show\n");

        output
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(".config").join("airwatch"))
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "general.refresh_interval_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid interval value: {}", value))?;
                if secs == 0 {
                    anyhow::bail!("Refresh interval must be at least 1 second");
                }
                self.general.refresh_interval_secs = secs;
            }
            "general.fixture_seed" => {
                self.general.fixture_seed = value
                    .parse()
                    .with_context(|| format!("Invalid seed value: {}", value))?;
            }
            "output.format" => {
                if !["table", "json"].contains(&value) {
                    anyhow::bail!("Invalid output format: {}. Must be 'table' or 'json'", value);
                }
                self.output.format = value.to_string();
            }
            "output.colored" => {
                self.output.colored = value
                    .parse()
                    .with_context(|| format!("Invalid boolean value: {}", value))?;
            }
            "output.decimal_places" => {
                let places: u8 = value
                    .parse()
                    .with_context(|| format!("Invalid decimal places value: {}", value))?;
                if places > 6 {
                    anyhow::bail!("Decimal places must be between 0 and 6");
                }
                self.output.decimal_places = places;
            }
            "output.date_format" => {
                DateFormat::from_config_str(value)?;
                self.output.date_format = value.to_lowercase();
            }
            "display.timezone" => {
                parse_timezone(value)?;
                self.display.timezone = value.to_string();
            }
            "export.directory" => self.export.directory = value.to_string(),
            "export.default_format" => {
                if !["report", "workbook", "json"].contains(&value) {
                    anyhow::bail!(
                        "Invalid export format: {}. Must be 'report', 'workbook', or 'json'",
                        value
                    );
                }
                self.export.default_format = value.to_string();
            }
            "dashboard.tick_rate_ms" => {
                let ms: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid tick rate value: {}", value))?;
                if !(50..=5000).contains(&ms) {
                    anyhow::bail!("Tick rate must be between 50 and 5000 ms");
                }
                self.dashboard.tick_rate_ms = ms;
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }
        Ok(())
    }
}

fn section(output: &mut String, title: &str) {
    output.push_str("# =============================================================================\n");
    output.push_str(&format!("# {}\n", title));
    output.push_str("# =============================================================================\n");
    output.push('\n');
}

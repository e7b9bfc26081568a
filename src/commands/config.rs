use std::path::Path;

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn handle_config_action(action: ConfigAction, config_path: &Path, json_output: bool) {
    match action {
        ConfigAction::Init => match Config::default().save_to(config_path) {
            Ok(()) => {
                if json_output {
                    println!(
                        r#"{{"status": "success", "message": "Configuration initialized successfully"}}"#
                    );
                } else {
                    println!("Configuration initialized at: {}", config_path.display());
                }
            }
            Err(e) => fail(json_output, "Failed to initialize config", &e),
        },
        ConfigAction::Show => match show_config(config_path, json_output) {
            Ok(text) => println!("{}", text),
            Err(e) => fail(json_output, "Failed to show config", &e),
        },
        ConfigAction::Set { key, value } => match Config::load_from(config_path) {
            Ok(mut config) => match config.set_value(&key, &value) {
                Ok(()) => match config.save_to(config_path) {
                    Ok(()) => {
                        tracing::info!(key = %key, value = %value, "configuration updated");
                        if json_output {
                            println!(
                                r#"{{"status": "success", "message": "Configuration updated: {} = {}"}}"#,
                                key, value
                            );
                        } else {
                            println!("Configuration updated: {} = {}", key, value);
                        }
                    }
                    Err(e) => fail(json_output, "Failed to save config", &e),
                },
                Err(e) => fail(json_output, "Invalid configuration", &e),
            },
            Err(e) => fail(json_output, "Failed to load config", &e),
        },
    }
}

/// The configuration at `config_path` as pretty JSON, or as TOML under a path header
pub fn show_config(config_path: &Path, json_output: bool) -> anyhow::Result<String> {
    let config = Config::load_from(config_path)?;
    if json_output {
        Ok(serde_json::to_string_pretty(&config)?)
    } else {
        let toml_str = toml::to_string_pretty(&config)?;
        Ok(format!("Configuration ({})\n{}", config_path.display(), toml_str))
    }
}

fn error_envelope(context: &str, error: &anyhow::Error) -> String {
    serde_json::json!({ "status": "error", "message": format!("{}: {}", context, error) }).to_string()
}

fn fail(json_output: bool, context: &str, error: &anyhow::Error) -> ! {
    if json_output {
        println!("{}", error_envelope(context, error));
    } else {
        eprintln!("Error: {}: {}", context, error);
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_show_config_as_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let json = show_config(&path, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["dashboard"]["tick_rate_ms"], Config::default().dashboard.tick_rate_ms);
    }

    #[test]
    fn test_show_config_as_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let text = show_config(&path, false).unwrap();
        assert!(text.starts_with("Configuration ("));
        assert!(text.contains("[general]"));
    }

    #[test]
    fn test_broken_config_reports_json_envelope() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let error = show_config(&path, true).unwrap_err();
        let value: serde_json::Value =
            serde_json::from_str(&error_envelope("Failed to show config", &error)).unwrap();
        assert_eq!(value["status"], "error");
        assert!(value["message"].as_str().unwrap().starts_with("Failed to show config: "));
    }
}

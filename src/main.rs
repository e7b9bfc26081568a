// airwatch: Indoor Air Quality Dashboard
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;

use airwatch::auth::{authenticate, StubAccessGate};
use airwatch::cli::{Cli, Commands};
use airwatch::commands::dashboard::dashboard_settings;
use airwatch::commands::{
    handle_alerts_command, handle_analysis_command, handle_classify_command, handle_config_action,
    handle_dashboard_command, handle_export_command, handle_room_command, handle_rooms_command,
    handle_sensors_command, handle_thresholds_command, OutputContext,
};
use airwatch::config::Config;
use airwatch::output::TableOptions;
use airwatch::store::DashboardStore;
use airwatch::utils::{logging, DateFormatter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => PathBuf::from(path),
        None => match Config::default_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    };

    // Config management never needs data or credentials
    if let Some(Commands::Config { action }) = cli.command {
        logging::init_stderr(cli.verbose);
        handle_config_action(action, &config_path, cli.json);
        return Ok(());
    }

    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if matches!(cli.command, Some(Commands::Dashboard { .. })) {
        let log_path = Config::config_dir()?.join("dashboard.log");
        logging::init_file(cli.verbose, &log_path)?;
    } else {
        logging::init_stderr(cli.verbose);
    }

    // CLI overrides take precedence over config
    let colored = cli.colored || config.output.colored;
    let json = cli.json || config.output.format == "json";
    let timezone = cli.timezone.as_deref().unwrap_or(&config.display.timezone);
    let seed = cli.seed.unwrap_or(config.general.fixture_seed);

    let dates = match DateFormatter::new(&config.output.date_format, timezone) {
        Ok(dates) => dates,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let output = OutputContext {
        table: TableOptions {
            colored,
            decimal_places: config.output.decimal_places,
            dates: dates.clone(),
        },
        json,
    };

    if let Some(Commands::Classify { metric, value }) = &cli.command {
        return handle_classify_command(metric, *value, json, colored);
    }

    let mut store = DashboardStore::with_fixtures(Utc::now(), seed);

    if let Some(Commands::Dashboard { refresh_secs }) = cli.command {
        let settings = dashboard_settings(&config, refresh_secs, dates);
        return handle_dashboard_command(store, settings, cli.user, cli.password).await;
    }

    let gate = StubAccessGate::new();
    if let Err(e) = authenticate(&gate, cli.user.as_deref(), cli.password.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    match cli.command {
        Some(Commands::Rooms { building, tier }) => {
            handle_rooms_command(&store, building, tier, &output)?;
        }
        Some(Commands::Room { id }) => {
            handle_room_command(&store, &id, &output)?;
        }
        Some(Commands::Alerts { status, resolve }) => {
            handle_alerts_command(&mut store, status, resolve, &output)?;
        }
        Some(Commands::Sensors { room, status }) => {
            handle_sensors_command(&store, room, status, &output)?;
        }
        Some(Commands::Thresholds) => {
            handle_thresholds_command(&store, &output)?;
        }
        Some(Commands::Analysis { metric }) => {
            handle_analysis_command(&store, metric, &output)?;
        }
        Some(Commands::Export { format, output: target }) => {
            handle_export_command(&store, format, target, &config, &dates, json)?;
        }
        // Handled before authentication
        Some(Commands::Classify { .. } | Commands::Dashboard { .. } | Commands::Config { .. }) => {}
        None => {
            // Default behavior: show the room overview
            handle_rooms_command(&store, None, None, &output)?;
        }
    }
    Ok(())
}

// Classify command handler
use anyhow::Result;
use serde::Serialize;

use crate::models::{classify_key, QualityTier};
use crate::output::paint;

#[derive(Debug, Serialize)]
pub struct Classification {
    pub metric: String,
    pub value: f64,
    pub tier: QualityTier,
}

/// Classify through the string-keyed entry point, so an unknown metric
/// yields `good` (with a logged warning) rather than an error
pub fn classify_reading(metric: &str, value: f64) -> Classification {
    Classification {
        metric: metric.to_lowercase(),
        value,
        tier: classify_key(&metric.to_lowercase(), value),
    }
}

pub fn handle_classify_command(metric: &str, value: f64, json_output: bool, colored: bool) -> Result<()> {
    let result = classify_reading(metric, value);
    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{} {} -> {}",
            result.metric,
            result.value,
            paint(result.tier.label(), result.tier, colored)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_reading() {
        assert_eq!(classify_reading("co2", 799.0).tier, QualityTier::Moderate);
        assert_eq!(classify_reading("CO2", 1000.0).tier, QualityTier::Critical);
        assert_eq!(classify_reading("temperature", 14.9).tier, QualityTier::Critical);
    }

    #[test]
    fn test_nan_from_command_line_is_critical() {
        use crate::cli::{Cli, Commands};
        use clap::Parser;

        let cli = Cli::try_parse_from(["airwatch", "classify", "pm25", "NaN"]).unwrap();
        let Some(Commands::Classify { metric, value }) = cli.command else {
            panic!("expected classify command");
        };
        assert!(value.is_nan());
        assert_eq!(classify_reading(&metric, value).tier, QualityTier::Critical);
    }

    #[test]
    fn test_unknown_metric_is_good() {
        assert_eq!(classify_reading("ozone", 9999.0).tier, QualityTier::Good);
    }
}

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Supported date format options for table and report output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateFormat {
    YearMonthDay, // yyyy-mm-dd (ISO)
    DayMonthYear, // dd-mm-yyyy (European)
    MonthDayYear, // mm-dd-yyyy (American)
}

impl DateFormat {
    /// Parse a date format string from config
    pub fn from_config_str(format_str: &str) -> Result<Self> {
        match format_str.to_lowercase().as_str() {
            "yyyy-mm-dd" => Ok(DateFormat::YearMonthDay),
            "dd-mm-yyyy" => Ok(DateFormat::DayMonthYear),
            "mm-dd-yyyy" => Ok(DateFormat::MonthDayYear),
            _ => Err(anyhow!(
                "Invalid date format '{}'. Supported formats: yyyy-mm-dd, dd-mm-yyyy, mm-dd-yyyy",
                format_str
            )),
        }
    }

    pub fn to_chrono_format(&self) -> &'static str {
        match self {
            DateFormat::YearMonthDay => "%Y-%m-%d",
            DateFormat::DayMonthYear => "%d-%m-%Y",
            DateFormat::MonthDayYear => "%m-%d-%Y",
        }
    }

    fn to_chrono_format_with_time(&self) -> &'static str {
        match self {
            DateFormat::YearMonthDay => "%Y-%m-%d %H:%M",
            DateFormat::DayMonthYear => "%d-%m-%Y %H:%M",
            DateFormat::MonthDayYear => "%m-%d-%Y %H:%M",
        }
    }
}

/// Renders timestamps in the configured format and timezone
#[derive(Debug, Clone)]
pub struct DateFormatter {
    format: DateFormat,
    timezone: Tz,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            format: DateFormat::YearMonthDay,
            timezone: Tz::UTC,
        }
    }
}

impl DateFormatter {
    pub fn new(config_format: &str, timezone: &str) -> Result<Self> {
        let format = DateFormat::from_config_str(config_format)?;
        let timezone = parse_timezone(timezone)?;
        Ok(Self { format, timezone })
    }

    pub fn date(&self, datetime: &DateTime<Utc>) -> String {
        datetime
            .with_timezone(&self.timezone)
            .format(self.format.to_chrono_format())
            .to_string()
    }

    pub fn date_time(&self, datetime: &DateTime<Utc>) -> String {
        datetime
            .with_timezone(&self.timezone)
            .format(self.format.to_chrono_format_with_time())
            .to_string()
    }

    /// Clock display, e.g. `14:30:05`
    pub fn time(&self, datetime: &DateTime<Utc>) -> String {
        datetime
            .with_timezone(&self.timezone)
            .format("%H:%M:%S")
            .to_string()
    }
}

pub fn parse_timezone(timezone: &str) -> Result<Tz> {
    Tz::from_str(timezone).map_err(|e| anyhow!("Invalid timezone '{}': {}", timezone, e))
}

/// Human readable age, e.g. `10 min ago`
pub fn format_age(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let minutes = (*now - *then).num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{} min ago", minutes)
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (60 * 24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_date_format_from_config() {
        assert_eq!(
            DateFormat::from_config_str("yyyy-mm-dd").unwrap(),
            DateFormat::YearMonthDay
        );
        assert_eq!(
            DateFormat::from_config_str("DD-MM-YYYY").unwrap(),
            DateFormat::DayMonthYear
        );
        assert!(DateFormat::from_config_str("invalid").is_err());
    }

    #[test]
    fn test_formatting_in_timezone() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap();

        let utc = DateFormatter::new("yyyy-mm-dd", "UTC").unwrap();
        assert_eq!(utc.date_time(&dt), "2024-03-15 14:30");

        let madrid = DateFormatter::new("dd-mm-yyyy", "Europe/Madrid").unwrap();
        assert_eq!(madrid.date_time(&dt), "15-03-2024 15:30");
        assert_eq!(madrid.time(&dt), "15:30:00");

        let tokyo = DateFormatter::new("mm-dd-yyyy", "Asia/Tokyo").unwrap();
        assert_eq!(tokyo.date(&dt), "03-15-2024");
        assert_eq!(tokyo.date_time(&dt), "03-15-2024 23:30");
    }

    #[test]
    fn test_invalid_timezone() {
        assert!(DateFormatter::new("yyyy-mm-dd", "Mars/Olympus").is_err());
    }

    #[test]
    fn test_format_age() {
        let now = Utc::now();
        assert_eq!(format_age(&now, &now), "just now");
        assert_eq!(format_age(&(now - Duration::minutes(10)), &now), "10 min ago");
        assert_eq!(format_age(&(now - Duration::hours(2)), &now), "2h ago");
        assert_eq!(format_age(&(now - Duration::days(3)), &now), "3d ago");
    }
}

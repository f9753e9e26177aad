//! Configuration management
//!
//! Settings live in `settings.json` inside the chapel directory, shared with
//! the dashboard:
//! ```json
//! {
//!   "reports": { "weekLabelIncludesYear": false, "utcOffsetMinutes": 60, "invalidTimestamps": "bucket" },
//!   "sms": { "maxSegments": 3 }
//! }
//! ```
//! Keys this crate does not manage are kept as-is when saving.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::services::grouping::{GroupingOptions, InvalidTimestampPolicy};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    reports: ReportSettings,
    #[serde(default)]
    sms: SmsSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportSettings {
    #[serde(default)]
    week_label_includes_year: bool,
    #[serde(default)]
    utc_offset_minutes: i32,
    #[serde(default)]
    invalid_timestamps: InvalidTimestampPolicy,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmsSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_segments: Option<u32>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Effective configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub week_label_includes_year: bool,
    pub utc_offset_minutes: i32,
    pub invalid_timestamps: InvalidTimestampPolicy,
    /// Broadcasts longer than this many segments are flagged
    pub max_sms_segments: Option<u32>,
}

const MAX_OFFSET_MINUTES: i32 = 14 * 60;

impl Config {
    /// Load config from the chapel directory
    ///
    /// Environment overrides (for CI and one-off runs):
    /// `CHAPEL_WEEK_LABEL_YEAR`, `CHAPEL_UTC_OFFSET_MINUTES`.
    pub fn load(chapel_dir: &Path) -> Result<Self> {
        let raw = read_settings(chapel_dir)?;

        let week_label_includes_year = match std::env::var("CHAPEL_WEEK_LABEL_YEAR").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.reports.week_label_includes_year,
        };

        let utc_offset_minutes = match std::env::var("CHAPEL_UTC_OFFSET_MINUTES") {
            Ok(value) => value
                .trim()
                .parse::<i32>()
                .with_context(|| format!("CHAPEL_UTC_OFFSET_MINUTES is not a number: {:?}", value))?,
            Err(_) => raw.reports.utc_offset_minutes,
        };
        if utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            anyhow::bail!(
                "UTC offset of {} minutes is out of range (at most +/-{})",
                utc_offset_minutes,
                MAX_OFFSET_MINUTES
            );
        }

        Ok(Self {
            week_label_includes_year,
            utc_offset_minutes,
            invalid_timestamps: raw.reports.invalid_timestamps,
            max_sms_segments: raw.sms.max_segments,
        })
    }

    /// Save config, preserving settings owned by other clients
    pub fn save(&self, chapel_dir: &Path) -> Result<()> {
        let settings_path = chapel_dir.join("settings.json");
        let mut settings = read_settings(chapel_dir)?;

        settings.reports.week_label_includes_year = self.week_label_includes_year;
        settings.reports.utc_offset_minutes = self.utc_offset_minutes;
        settings.reports.invalid_timestamps = self.invalid_timestamps;
        settings.sms.max_segments = self.max_sms_segments;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {:?}", settings_path))?;
        Ok(())
    }

    /// Bucketing options derived from this configuration
    pub fn grouping_options(&self) -> GroupingOptions {
        GroupingOptions {
            include_year_in_week_label: self.week_label_includes_year,
            utc_offset_minutes: self.utc_offset_minutes,
            invalid_timestamps: self.invalid_timestamps,
        }
    }
}

/// A missing or unreadable settings file yields defaults
fn read_settings(chapel_dir: &Path) -> Result<SettingsFile> {
    let settings_path = chapel_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {:?}", settings_path))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(!config.week_label_includes_year);
        assert_eq!(config.invalid_timestamps, InvalidTimestampPolicy::Bucket);
        assert_eq!(config.max_sms_segments, None);
    }

    #[test]
    fn test_reads_camel_case_settings() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"reports": {"utcOffsetMinutes": 60, "invalidTimestamps": "skip"}, "sms": {"maxSegments": 3}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.utc_offset_minutes, 60);
        assert_eq!(config.invalid_timestamps, InvalidTimestampPolicy::Skip);
        assert_eq!(config.max_sms_segments, Some(3));
        assert_eq!(config.grouping_options().utc_offset_minutes, 60);
    }

    #[test]
    fn test_save_preserves_unmanaged_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"theme": "dark", "reports": {"currency": "NGN"}}"#,
        )
        .unwrap();

        let config = Config {
            max_sms_segments: Some(2),
            ..Default::default()
        };
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("settings.json")).unwrap())
                .unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["reports"]["currency"], "NGN");
        assert_eq!(saved["sms"]["maxSegments"], 2);
    }
}

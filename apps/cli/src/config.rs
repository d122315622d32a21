// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use massing_lite_viewer::DisplayToggles;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory relative export paths are written into.
    pub output_dir: PathBuf,
    /// Timeout for URL sources in seconds.
    pub fetch_timeout_secs: u64,
    pub log_format: LogFormat,
    /// Display toggles before command-line overrides.
    pub toggles: DisplayToggles,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = DisplayToggles::default();
        let flag = |key: &str, default: bool| {
            var(key)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(default)
        };

        Self {
            output_dir: var("MASSING_OUTPUT_DIR")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "./out".into())
                .into(),
            fetch_timeout_secs: var("MASSING_FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".into())
                .parse()
                .unwrap_or(30),
            log_format: var("MASSING_LOG_FORMAT")
                .unwrap_or_else(|| "pretty".into())
                .parse()
                .unwrap_or(LogFormat::Pretty),
            toggles: DisplayToggles {
                show_envelope: flag("MASSING_SHOW_ENVELOPE", defaults.show_envelope),
                show_lot: flag("MASSING_SHOW_LOT", defaults.show_lot),
                show_setbacks: flag("MASSING_SHOW_SETBACKS", defaults.show_setbacks),
                show_labels: flag("MASSING_SHOW_LABELS", defaults.show_labels),
            },
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Resolve an export path: absolute paths are kept, relative ones land
    /// in the output directory
    pub fn output_path(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.output_dir.join(path)
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.output_dir, PathBuf::from("./out"));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.toggles, DisplayToggles::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("MASSING_OUTPUT_DIR", "/tmp/massing"),
            ("MASSING_FETCH_TIMEOUT_SECS", "5"),
            ("MASSING_LOG_FORMAT", "JSON"),
            ("MASSING_SHOW_ENVELOPE", "off"),
            ("MASSING_SHOW_LABELS", "1"),
        ]);
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.toggles.show_envelope);
        assert!(config.toggles.show_labels);
        assert!(config.toggles.show_lot);
        assert_eq!(
            config.output_path(std::path::Path::new("scene.json")),
            PathBuf::from("/tmp/massing/scene.json")
        );
    }

    #[test]
    fn test_garbage_falls_back() {
        let config = config(&[
            ("MASSING_FETCH_TIMEOUT_SECS", "soon"),
            ("MASSING_LOG_FORMAT", "xml"),
            ("MASSING_SHOW_LOT", "maybe"),
        ]);
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.toggles.show_lot);
    }
}

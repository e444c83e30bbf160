//! Engine configuration from the environment.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `MAPKEEP_STRICT` | `1`/`true`: every load warning is fatal | off |
//! | `MAPKEEP_PROGRESS_INTERVAL` | Records between progress reports; `0` disables | 1000 |
//!
//! Unparsable values fall back to the default with a logged warning.

use mapkeep_domain::WarningPolicy;

pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub warning_policy: WarningPolicy,
    pub progress_interval: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            warning_policy: WarningPolicy::Collect,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(value) = lookup("MAPKEEP_STRICT") {
            match parse_flag(&value) {
                Some(true) => settings.warning_policy = WarningPolicy::Strict,
                Some(false) => {}
                None => tracing::warn!(%value, "Ignoring unparsable MAPKEEP_STRICT"),
            }
        }

        if let Some(value) = lookup("MAPKEEP_PROGRESS_INTERVAL") {
            match value.trim().parse() {
                Ok(interval) => settings.progress_interval = interval,
                Err(_) => tracing::warn!(%value, "Ignoring unparsable MAPKEEP_PROGRESS_INTERVAL"),
            }
        }

        settings
    }
}

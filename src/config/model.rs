// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::supervisor::deadline::Deadline;
use crate::supervisor::presets::{
    DEFAULT_MESSAGE, DEFAULT_TIMEOUT_MS, PROGRESS_INTERVAL_MS, Presets, SLOW_WARNING_MS,
};
use crate::types::{Category, WarnPolicy};

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [supervisor]
/// default_timeout_ms = 10000
/// default_message = "Operation timed out"
/// slow_warning_ms = 5000
/// warn_policy = "every"
///
/// [preset.query]
/// timeout_ms = 15000
/// message = "Database query timed out"
/// ```
///
/// Every section and key is optional. Preset names are kept as raw strings
/// here and checked during validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub supervisor: SupervisorSection,

    /// `[preset.<category>]` overrides, keyed by category name.
    #[serde(default)]
    pub preset: BTreeMap<String, PresetSection>,
}

/// `[supervisor]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SupervisorSection {
    /// Deadline used when the caller does not pick one.
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,

    /// Message carried by a timeout under the default deadline.
    #[serde(default = "default_message")]
    pub default_message: String,

    /// Progress trackers warn once elapsed time exceeds this.
    #[serde(default = "default_slow_warning_ms")]
    pub slow_warning_ms: u64,

    #[serde(default)]
    pub warn_policy: WarnPolicy,

    /// How often tracked operations are checked for slowness.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Time a cancelled operation gets to clean up after its deadline.
    #[serde(default)]
    pub cancel_grace_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

fn default_slow_warning_ms() -> u64 {
    SLOW_WARNING_MS
}

fn default_progress_interval_ms() -> u64 {
    PROGRESS_INTERVAL_MS
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_timeout_ms(),
            default_message: default_message(),
            slow_warning_ms: default_slow_warning_ms(),
            warn_policy: WarnPolicy::default(),
            progress_interval_ms: default_progress_interval_ms(),
            cancel_grace_ms: 0,
        }
    }
}

/// `[preset.<category>]` section. Missing keys keep the built-in value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresetSection {
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    #[serde(default)]
    pub message: Option<String>,
}

/// Validated configuration.
///
/// Built from [`RawConfigFile`] via `TryFrom` (see `validate.rs`), so every
/// deadline here is positive and every preset name was a known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    default_deadline: Deadline,
    presets: Presets,
    slow_warning: Duration,
    warn_policy: WarnPolicy,
    progress_interval: Duration,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        supervisor: &SupervisorSection,
        overrides: BTreeMap<Category, PresetSection>,
    ) -> Self {
        let grace = Duration::from_millis(supervisor.cancel_grace_ms);

        let default_deadline =
            Deadline::new(supervisor.default_timeout_ms, supervisor.default_message.clone())
                .with_grace(grace);

        let mut presets = Presets::default();
        for category in Category::ALL {
            let builtin = presets.get(category).clone();
            let merged = match overrides.get(&category) {
                Some(section) => Deadline::new(
                    section.timeout_ms.unwrap_or(builtin.timeout_ms()),
                    section
                        .message
                        .clone()
                        .unwrap_or_else(|| builtin.message().to_string()),
                ),
                None => builtin,
            };
            presets.set(category, merged.with_grace(grace));
        }

        Self {
            default_deadline,
            presets,
            slow_warning: Duration::from_millis(supervisor.slow_warning_ms),
            warn_policy: supervisor.warn_policy,
            progress_interval: Duration::from_millis(supervisor.progress_interval_ms),
        }
    }

    pub fn default_deadline(&self) -> &Deadline {
        &self.default_deadline
    }

    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    pub fn preset(&self, category: Category) -> &Deadline {
        self.presets.get(category)
    }

    pub fn slow_warning(&self) -> Duration {
        self.slow_warning
    }

    pub fn warn_policy(&self) -> WarnPolicy {
        self.warn_policy
    }

    pub fn progress_interval(&self) -> Duration {
        self.progress_interval
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile::new_unchecked(&SupervisorSection::default(), BTreeMap::new())
    }
}

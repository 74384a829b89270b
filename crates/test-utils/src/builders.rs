#![allow(dead_code)]

use timebox::config::{ConfigFile, PresetSection, RawConfigFile};
use timebox::errors::Result;
use timebox::supervisor::Supervisor;
use timebox::types::WarnPolicy;

/// Builder for `ConfigFile` so tests can inject tiny deadlines.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn default_timeout_ms(mut self, ms: u64) -> Self {
        self.config.supervisor.default_timeout_ms = ms;
        self
    }

    pub fn default_message(mut self, msg: &str) -> Self {
        self.config.supervisor.default_message = msg.to_string();
        self
    }

    pub fn slow_warning_ms(mut self, ms: u64) -> Self {
        self.config.supervisor.slow_warning_ms = ms;
        self
    }

    pub fn warn_policy(mut self, policy: WarnPolicy) -> Self {
        self.config.supervisor.warn_policy = policy;
        self
    }

    pub fn progress_interval_ms(mut self, ms: u64) -> Self {
        self.config.supervisor.progress_interval_ms = ms;
        self
    }

    pub fn cancel_grace_ms(mut self, ms: u64) -> Self {
        self.config.supervisor.cancel_grace_ms = ms;
        self
    }

    /// Override one preset; `name` is a category name or alias.
    pub fn preset(mut self, name: &str, timeout_ms: Option<u64>, message: Option<&str>) -> Self {
        self.config.preset.insert(
            name.to_string(),
            PresetSection {
                timeout_ms,
                message: message.map(str::to_string),
            },
        );
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }

    pub fn supervisor(self) -> Supervisor {
        Supervisor::new(self.build())
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// src/config/validate.rs

use std::collections::BTreeMap;

use crate::config::model::{ConfigFile, PresetSection, RawConfigFile};
use crate::errors::{Result, TimeboxError};
use crate::types::Category;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TimeboxError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_supervisor_section(&raw)?;
        let overrides = validate_presets(&raw)?;
        Ok(ConfigFile::new_unchecked(&raw.supervisor, overrides))
    }
}

fn validate_supervisor_section(cfg: &RawConfigFile) -> Result<()> {
    let sup = &cfg.supervisor;

    if sup.default_timeout_ms == 0 {
        return Err(TimeboxError::ConfigError(
            "[supervisor].default_timeout_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    if sup.progress_interval_ms == 0 {
        return Err(TimeboxError::ConfigError(
            "[supervisor].progress_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    if sup.default_message.trim().is_empty() {
        return Err(TimeboxError::ConfigError(
            "[supervisor].default_message must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Resolve preset names into categories and check their values.
fn validate_presets(cfg: &RawConfigFile) -> Result<BTreeMap<Category, PresetSection>> {
    let mut out = BTreeMap::new();

    for (name, section) in cfg.preset.iter() {
        let category: Category = name
            .parse()
            .map_err(|_| TimeboxError::UnknownCategory(name.clone()))?;

        if section.timeout_ms == Some(0) {
            return Err(TimeboxError::ConfigError(format!(
                "[preset.{name}].timeout_ms must be >= 1 (got 0)"
            )));
        }

        if let Some(msg) = &section.message {
            if msg.trim().is_empty() {
                return Err(TimeboxError::ConfigError(format!(
                    "[preset.{name}].message must not be empty"
                )));
            }
        }

        if out.insert(category, section.clone()).is_some() {
            return Err(TimeboxError::ConfigError(format!(
                "preset for category '{category}' is defined more than once (via '{name}')"
            )));
        }
    }

    Ok(out)
}

/// Validate an already-parsed raw config without building it.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_supervisor_section(cfg)?;
    validate_presets(cfg)?;
    Ok(())
}

//! Preference loading using Figment for layered config merging.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults (`SchedulerPreferences::default()`)
//! 2. The TOML file passed with `--config`, if any
//! 3. `FOCUS_ENGINE_*` environment variables

use std::path::Path;

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use focus_engine::SchedulerPreferences;

/// Load preferences, optionally layering a TOML file over the defaults.
pub fn load_preferences(path: Option<&Path>) -> Result<SchedulerPreferences> {
    let mut figment = Figment::new().merge(Serialized::defaults(SchedulerPreferences::default()));

    if let Some(path) = path {
        if !path.is_file() {
            bail!("Config file not found: {}", path.display());
        }
        figment = figment.merge(Toml::file(path));
    }

    let preferences: SchedulerPreferences = figment.merge(env_provider()).extract()?;
    preferences.validate()?;
    Ok(preferences)
}

/// Parse preferences from a TOML string over the defaults (no env overrides).
#[cfg(test)]
fn load_preferences_from_str(toml: &str) -> Result<SchedulerPreferences> {
    Ok(Figment::new()
        .merge(Serialized::defaults(SchedulerPreferences::default()))
        .merge(Toml::string(toml))
        .extract()?)
}

/// Sections whose fields can be set from the environment.
const ENV_SECTIONS: &[&str] = &["working_hours", "tuning"];

/// Env provider with explicit section mapping.
///
/// `__` is the nesting separator: `FOCUS_ENGINE_WORKING_HOURS__START` maps to
/// `working_hours.start`. The single-underscore form
/// `FOCUS_ENGINE_WORKING_HOURS_START` is accepted too. Flat keys such as
/// `FOCUS_ENGINE_BUFFER_MINUTES` pass through unchanged.
fn env_provider() -> Env {
    Env::prefixed("FOCUS_ENGINE_").map(|key| env_key(key.as_str()).into())
}

fn env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase().replace("__", ".");
    for section in ENV_SECTIONS {
        if let Some(field) = key
            .strip_prefix(*section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{field}");
        }
    }
    key
}

use std::{env, path::PathBuf};

use super::schema::Settings;

impl Settings {
    /// Load settings, layering three sources (highest wins): `FERMATA__`
    /// environment variables, the optional TOML config file, struct
    /// defaults.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(file) = resolve_config_path() {
            builder = builder.add_source(::config::File::from(file.as_path()).required(false));
        }

        builder
            .add_source(
                ::config::Environment::with_prefix("FERMATA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject settings no run could work with; the caller falls back to
    /// defaults.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.audio.initial_volume) {
            return Err("audio.initial_volume must be within [0.0, 1.0]".to_string());
        }
        if self
            .library
            .extension
            .trim()
            .trim_start_matches('.')
            .is_empty()
        {
            return Err("library.extension must not be empty".to_string());
        }
        if self.controls.volume_step <= 0.0 {
            return Err("controls.volume_step must be > 0".to_string());
        }
        Ok(())
    }
}

/// `$FERMATA_CONFIG_PATH` wins; otherwise the XDG location.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os("FERMATA_CONFIG_PATH")
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/fermata/config.toml`, or `~/.config/fermata/config.toml`
/// when `XDG_CONFIG_HOME` is unset.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config_home.join("fermata").join("config.toml"))
}

use bevy::prelude::*;
use std::fs;

use crate::shared::SimConfig;

/// Environment variable naming a RON file that replaces the built-in tunables.
pub const CONFIG_ENV: &str = "AETERNA_CONFIG";

const DEFAULT_CONFIG: &str = include_str!("../../assets/config.ron");

pub fn parse_config(text: &str) -> Result<SimConfig, String> {
    ron::from_str(text).map_err(|e| format!("Failed to parse config: {}", e))
}

pub fn read_config_file(path: &str) -> Result<SimConfig, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config {}: {}", path, e))?;
    parse_config(&text)
}

fn builtin_config() -> SimConfig {
    parse_config(DEFAULT_CONFIG).unwrap_or_else(|e| {
        warn!("[Config] Built-in config is invalid ({}); using code defaults", e);
        SimConfig::default()
    })
}

/// Built-in tunables, or the file named by `AETERNA_CONFIG` when it parses.
pub fn load_config() -> SimConfig {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return builtin_config();
    };
    match read_config_file(&path) {
        Ok(config) => {
            info!("[Config] Loaded overrides from {}", path);
            config
        }
        Err(e) => {
            warn!("[Config] {}; falling back to built-in config", e);
            builtin_config()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_matches_code_defaults() {
        assert_eq!(parse_config(DEFAULT_CONFIG).unwrap(), SimConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = parse_config("(cell_size: 32.0, rng_seed: Some(7))").unwrap();
        assert_eq!(config.cell_size, 32.0);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.pickup_radius, SimConfig::default().pickup_radius);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(parse_config("(cell_size: \"wide\")").is_err());
        assert!(read_config_file("/definitely/not/here.ron").is_err());
    }
}

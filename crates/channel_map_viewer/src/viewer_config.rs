use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use bevy::prelude::*;
use channel_map::{GeoPoint, DEFAULT_CENTER, DEFAULT_SCALE};

use crate::i18n::UiLocale;

pub(super) const CONFIG_FILE_NAME: &str = "channel_map.toml";

pub(super) const ENV_CONFIG_PATH: &str = "CHANNEL_MAP_CONFIG";
pub(super) const ENV_BOUNDARY_PATH: &str = "CHANNEL_MAP_BOUNDARY_PATH";
pub(super) const ENV_CHANNELS_PATH: &str = "CHANNEL_MAP_CHANNELS_PATH";
pub(super) const ENV_CENTER_LON: &str = "CHANNEL_MAP_CENTER_LON";
pub(super) const ENV_CENTER_LAT: &str = "CHANNEL_MAP_CENTER_LAT";
pub(super) const ENV_SCALE: &str = "CHANNEL_MAP_SCALE";
pub(super) const ENV_SEED: &str = "CHANNEL_MAP_SEED";
pub(super) const ENV_TICKS_PER_FRAME: &str = "CHANNEL_MAP_TICKS_PER_FRAME";
pub(super) const ENV_LOCALE: &str = "CHANNEL_MAP_LOCALE";
pub(super) const ENV_SPACED_PLACEMENT: &str = "CHANNEL_MAP_SPACED_PLACEMENT";
pub(super) const ENV_HEADLESS: &str = "CHANNEL_MAP_HEADLESS";

pub(super) const DEFAULT_BOUNDARY_PATH: &str = "data/boundary.json";
pub(super) const DEFAULT_CHANNELS_PATH: &str = "data/channels.json";
pub(super) const DEFAULT_SEED: u64 = 0x5eed;
pub(super) const DEFAULT_TICKS_PER_FRAME: usize = 1;
const MAX_TICKS_PER_FRAME: usize = 64;

#[derive(Resource, Clone, Debug, PartialEq)]
pub(super) struct MapViewerConfig {
    pub boundary_path: PathBuf,
    pub channels_path: PathBuf,
    pub center: GeoPoint,
    pub scale: f64,
    pub seed: u64,
    pub ticks_per_frame: usize,
    pub locale: UiLocale,
    pub spaced_placement: bool,
    pub headless: bool,
}

impl Default for MapViewerConfig {
    fn default() -> Self {
        Self {
            boundary_path: PathBuf::from(DEFAULT_BOUNDARY_PATH),
            channels_path: PathBuf::from(DEFAULT_CHANNELS_PATH),
            center: DEFAULT_CENTER,
            scale: DEFAULT_SCALE,
            seed: DEFAULT_SEED,
            ticks_per_frame: DEFAULT_TICKS_PER_FRAME,
            locale: UiLocale::RuRu,
            spaced_placement: false,
            headless: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ConfigError {
    ReadConfigFile { path: String, message: String },
    ParseConfigFile { path: String, message: String },
    InvalidValue { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadConfigFile { path, message } => {
                write!(f, "failed to read config file {path}: {message}")
            }
            ConfigError::ParseConfigFile { path, message } => {
                write!(f, "failed to parse config file {path}: {message}")
            }
            ConfigError::InvalidValue { key, message } => {
                write!(f, "invalid config value for {key}: {message}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Reads `channel_map.toml` (or the file named by `CHANNEL_MAP_CONFIG`), with
/// the environment filling in keys the file leaves out. A missing default file
/// is skipped; a missing explicitly named file is an error.
pub(super) fn resolve_map_viewer_config() -> Result<MapViewerConfig, ConfigError> {
    resolve_map_viewer_config_with(|key| std::env::var(key).ok())
}

pub(super) fn resolve_map_viewer_config_with<F>(lookup: F) -> Result<MapViewerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    #[cfg(not(target_arch = "wasm32"))]
    {
        let explicit = lookup(ENV_CONFIG_PATH)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty());
        let path = explicit
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        if explicit.is_some() || path.exists() {
            return load_map_viewer_config_from_file(&path, lookup);
        }
    }
    Ok(load_map_viewer_config_from(lookup))
}

/// File keys match the environment variable names; `env` fills in whatever
/// the file leaves out.
#[cfg(not(target_arch = "wasm32"))]
pub(super) fn load_map_viewer_config_from_file<F>(
    path: &std::path::Path,
    env: F,
) -> Result<MapViewerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let content = std::fs::read_to_string(path).map_err(|err| ConfigError::ReadConfigFile {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    load_map_viewer_config_from_toml_str(&content, &path.display().to_string(), env)
}

#[cfg(not(target_arch = "wasm32"))]
pub(super) fn load_map_viewer_config_from_toml_str<F>(
    content: &str,
    source: &str,
    env: F,
) -> Result<MapViewerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value: toml::Value = toml::from_str(content).map_err(|err| ConfigError::ParseConfigFile {
        path: source.to_string(),
        message: err.to_string(),
    })?;
    let table = value.as_table().ok_or_else(|| ConfigError::ParseConfigFile {
        path: source.to_string(),
        message: "root is not a TOML table".to_string(),
    })?;
    for (key, value) in table {
        if matches!(value, toml::Value::Array(_) | toml::Value::Table(_)) {
            return Err(ConfigError::InvalidValue {
                key: key.clone(),
                message: "expected a scalar".to_string(),
            });
        }
    }

    Ok(load_map_viewer_config_from(|key| {
        table
            .get(key)
            .and_then(toml_value_to_string)
            .or_else(|| env(key))
    }))
}

#[cfg(not(target_arch = "wasm32"))]
fn toml_value_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(value) => Some(value.clone()),
        toml::Value::Integer(value) => Some(value.to_string()),
        toml::Value::Float(value) => Some(value.to_string()),
        toml::Value::Boolean(value) => Some(value.to_string()),
        _ => None,
    }
}

pub(super) fn load_map_viewer_config_from<F>(lookup: F) -> MapViewerConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = MapViewerConfig::default();
    if let Some(value) = parse_path(&lookup, ENV_BOUNDARY_PATH) {
        config.boundary_path = value;
    }
    if let Some(value) = parse_path(&lookup, ENV_CHANNELS_PATH) {
        config.channels_path = value;
    }
    if let Some(value) = parse_f64(&lookup, ENV_CENTER_LON) {
        if value.is_finite() && (-180.0..=180.0).contains(&value) {
            config.center.lon = value;
        }
    }
    if let Some(value) = parse_f64(&lookup, ENV_CENTER_LAT) {
        if value.is_finite() && (-85.0..=85.0).contains(&value) {
            config.center.lat = value;
        }
    }
    if let Some(value) = parse_f64(&lookup, ENV_SCALE) {
        if value.is_finite() && value > 0.0 {
            config.scale = value;
        }
    }
    if let Some(value) = parse_u64(&lookup, ENV_SEED) {
        config.seed = value;
    }
    if let Some(value) = parse_usize(&lookup, ENV_TICKS_PER_FRAME) {
        if value > 0 {
            config.ticks_per_frame = value.min(MAX_TICKS_PER_FRAME);
        }
    }
    if let Some(value) = lookup(ENV_LOCALE).and_then(|raw| UiLocale::parse(&raw)) {
        config.locale = value;
    }
    if let Some(value) = parse_bool(&lookup, ENV_SPACED_PLACEMENT) {
        config.spaced_placement = value;
    }
    // Any non-false value turns headless on, matching a bare `CHANNEL_MAP_HEADLESS=`.
    if let Some(raw) = lookup(ENV_HEADLESS) {
        config.headless = parse_bool_value(&raw).unwrap_or(true);
    }
    config
}

fn parse_path<F>(lookup: &F, key: &str) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}

fn parse_bool<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| parse_bool_value(&raw))
}

fn parse_bool_value(raw: &str) -> Option<bool> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_f64<F>(lookup: &F, key: &str) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| raw.trim().parse::<f64>().ok())
}

fn parse_usize<F>(lookup: &F, key: &str) -> Option<usize>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| raw.trim().parse::<usize>().ok())
}

/// Decimal or `0x`-prefixed hex.
fn parse_u64<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| {
        let raw = raw.trim();
        match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u64>().ok(),
        }
    })
}

#[cfg(test)]
#[path = "viewer_config_tests.rs"]
mod tests;

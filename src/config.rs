//! Run configuration: a plain `key = value` text file. Unset fields keep a
//! `-1` sentinel; `or_defaults()` flags them with a warning, substitutes a
//! usable default so a partial file still renders, and rejects values that
//! remain out of range.

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad value '{value}' for config key '{key}'")]
    BadValue { key: String, value: String },
    #[error("config value {key} = {value} is out of range")]
    OutOfRange { key: &'static str, value: f32 },
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub width: i32,
    pub height: i32,
    pub fov_degrees: f32,
    pub rays_per_pixel: i32,
    pub max_bounce: i32,
    pub focus_distance: f32,
    pub aa_stddev: f32,
    pub lens_stddev: f32,
}

const UNSET: f32 = -1.0;

impl Default for Config {
    fn default() -> Self {
        Config {
            width: -1,
            height: -1,
            fov_degrees: UNSET,
            rays_per_pixel: -1,
            max_bounce: -1,
            focus_distance: UNSET,
            aa_stddev: UNSET,
            lens_stddev: UNSET,
        }
    }
}

impl Config {
    /// Values used for any field the config file leaves unset.
    pub fn presets() -> Self {
        Config {
            width: 512,
            height: 512,
            fov_degrees: 60.0,
            rays_per_pixel: 128,
            max_bounce: 5,
            focus_distance: 55.0,
            aa_stddev: 0.5,
            lens_stddev: 1.0,
        }
    }

    /// Replaces every sentinel field with its preset value, warning once per
    /// substitution, then rejects any remaining out-of-range value so a typo
    /// like `width = -5` can't reach the renderer.
    pub fn or_defaults(mut self) -> Result<Self, ConfigError> {
        let presets = Self::presets();
        macro_rules! fill {
            ($field:ident, $unset:expr) => {
                if self.$field == $unset {
                    log::warn!(
                        "config: {} has not been set, using {}",
                        stringify!($field),
                        presets.$field
                    );
                    self.$field = presets.$field;
                }
            };
        }
        fill!(width, -1);
        fill!(height, -1);
        fill!(fov_degrees, UNSET);
        fill!(rays_per_pixel, -1);
        fill!(max_bounce, -1);
        fill!(focus_distance, UNSET);
        fill!(aa_stddev, UNSET);
        fill!(lens_stddev, UNSET);
        self.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        macro_rules! check {
            ($field:ident, $bad:expr) => {
                if $bad(self.$field as f32) {
                    return Err(ConfigError::OutOfRange {
                        key: stringify!($field),
                        value: self.$field as f32,
                    });
                }
            };
        }
        let non_positive = |v: f32| v <= 0.0;
        check!(width, non_positive);
        check!(height, non_positive);
        check!(fov_degrees, non_positive);
        check!(rays_per_pixel, non_positive);
        check!(max_bounce, non_positive);
        check!(focus_distance, non_positive);
        // A jitter width of zero is legal: it disables that blur.
        let negative = |v: f32| v < 0.0;
        check!(aa_stddev, negative);
        check!(lens_stddev, negative);
        Ok(self)
    }
}

pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Parses `key = value` lines. Whitespace is insignificant, lines without an
/// `=` are skipped, unknown keys warn and are skipped.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    for line in text.lines() {
        let line: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        let (key, value) = match line.split_once('=') {
            None => continue,
            Some(pair) => pair,
        };
        let bad_value = || ConfigError::BadValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "width" => config.width = value.parse().map_err(|_| bad_value())?,
            "height" => config.height = value.parse().map_err(|_| bad_value())?,
            "fov_degrees" => config.fov_degrees = value.parse().map_err(|_| bad_value())?,
            "rays_per_pixel" => {
                config.rays_per_pixel = value.parse().map_err(|_| bad_value())?
            }
            "max_bounce" => config.max_bounce = value.parse().map_err(|_| bad_value())?,
            "focus_distance" => {
                config.focus_distance = value.parse().map_err(|_| bad_value())?
            }
            "aa_stddev" => config.aa_stddev = value.parse().map_err(|_| bad_value())?,
            "lens_stddev" => config.lens_stddev = value.parse().map_err(|_| bad_value())?,
            _ => log::warn!("config: unknown key '{}'", key),
        }
    }
    Ok(config)
}

// Configuration: the draw range (DrawConfig), per-field operator input, and
// loading of config/lottery.toml.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use thiserror::Error;

use crate::error::LotteryError;

/// Largest number of integers a single range may span.
pub const MAX_POOL_SPAN: i64 = 100_000;

/// Largest value the operator may type into any of the three fields.
pub const MAX_FIELD_VALUE: i64 = 1_000_000;

pub const DEFAULT_MIN: i64 = 1;
pub const DEFAULT_MAX: i64 = 1000;
pub const DEFAULT_DRAW_COUNT: i64 = 6;

pub const DEFAULT_DRAW_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

// ---------------------------------------------------------------------------
// DrawConfig
// ---------------------------------------------------------------------------

/// The range numbers are drawn from and how many are drawn per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawConfig {
    pub min: i64,
    pub max: i64,
    pub draw_count: i64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            draw_count: DEFAULT_DRAW_COUNT,
        }
    }
}

impl DrawConfig {
    pub fn new(min: i64, max: i64, draw_count: i64) -> Self {
        DrawConfig {
            min,
            max,
            draw_count,
        }
    }

    /// Check the cross-field rules: `min < max`, `draw_count > 0`, and a span
    /// no wider than `MAX_POOL_SPAN`.
    pub fn validate(&self) -> Result<(), LotteryError> {
        if self.min >= self.max {
            return Err(LotteryError::invalid_config(
                "max",
                format!("must be greater than min ({}), got {}", self.min, self.max),
            ));
        }
        if self.draw_count <= 0 {
            return Err(LotteryError::invalid_config(
                "count",
                format!("must be greater than 0, got {}", self.draw_count),
            ));
        }
        if self.span() > MAX_POOL_SPAN as u64 {
            return Err(LotteryError::invalid_config(
                "max",
                format!(
                    "range {}..={} spans {} numbers, limit is {}",
                    self.min,
                    self.max,
                    self.span(),
                    MAX_POOL_SPAN
                ),
            ));
        }
        Ok(())
    }

    /// Number of integers in `[min, max]`, or 0 when the range is empty.
    pub fn span(&self) -> u64 {
        if self.max < self.min {
            return 0;
        }
        u64::try_from(self.max as i128 - self.min as i128 + 1).unwrap_or(u64::MAX)
    }

    pub fn contains(&self, n: i64) -> bool {
        (self.min..=self.max).contains(&n)
    }

    pub fn get(&self, field: ConfigField) -> i64 {
        match field {
            ConfigField::Min => self.min,
            ConfigField::Max => self.max,
            ConfigField::DrawCount => self.draw_count,
        }
    }

    fn set(&mut self, field: ConfigField, value: i64) {
        match field {
            ConfigField::Min => self.min = value,
            ConfigField::Max => self.max = value,
            ConfigField::DrawCount => self.draw_count = value,
        }
    }

    /// Apply operator input for a single field.
    ///
    /// Empty input falls back to the field's default. Input that is not an
    /// integer in `1..=MAX_FIELD_VALUE` is rejected and the field keeps its
    /// last valid value. Cross-field rules are not checked here; a draw
    /// checks them when it starts.
    pub fn apply_input(&mut self, field: ConfigField, input: &str) -> Result<i64, LotteryError> {
        let trimmed = input.trim();
        let value = if trimmed.is_empty() {
            field.default_value()
        } else {
            match trimmed.parse::<i64>() {
                Ok(v) if (1..=MAX_FIELD_VALUE).contains(&v) => v,
                _ => {
                    return Err(LotteryError::InvalidNumericInput {
                        field: field.label().to_string(),
                        input: input.to_string(),
                    })
                }
            }
        };
        self.set(field, value);
        Ok(value)
    }
}

/// One of the three operator-editable settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Min,
    Max,
    DrawCount,
}

impl ConfigField {
    pub const ALL: [ConfigField; 3] = [ConfigField::Min, ConfigField::Max, ConfigField::DrawCount];

    pub fn label(&self) -> &'static str {
        match self {
            ConfigField::Min => "Min number",
            ConfigField::Max => "Max number",
            ConfigField::DrawCount => "Draw count",
        }
    }

    pub fn default_value(&self) -> i64 {
        match self {
            ConfigField::Min => DEFAULT_MIN,
            ConfigField::Max => DEFAULT_MAX,
            ConfigField::DrawCount => DEFAULT_DRAW_COUNT,
        }
    }

    pub fn next(&self) -> ConfigField {
        match self {
            ConfigField::Min => ConfigField::Max,
            ConfigField::Max => ConfigField::DrawCount,
            ConfigField::DrawCount => ConfigField::Min,
        }
    }

    pub fn prev(&self) -> ConfigField {
        match self {
            ConfigField::Min => ConfigField::DrawCount,
            ConfigField::Max => ConfigField::Min,
            ConfigField::DrawCount => ConfigField::Max,
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub draw: DrawConfig,
    /// Fixed RNG seed, if the operator wants a repeatable rehearsal.
    pub seed: Option<u64>,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Cosmetic pause between pressing draw and seeing the numbers.
    #[serde(default = "default_draw_delay_ms")]
    pub draw_delay_ms: u64,
    /// chrono format string for history timestamps.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            draw_delay_ms: DEFAULT_DRAW_DELAY_MS,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

fn default_draw_delay_ms() -> u64 {
    DEFAULT_DRAW_DELAY_MS
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

// ---------------------------------------------------------------------------
// lottery.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire lottery.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LotteryFile {
    draw: DrawSection,
    #[serde(default)]
    ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct DrawSection {
    min: i64,
    max: i64,
    count: i64,
    #[serde(default)]
    seed: Option<u64>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/lottery.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("lottery.toml");
    let text = read_file(&path)?;
    let file: LotteryFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        draw: DrawConfig::new(file.draw.min, file.draw.max, file.draw.count),
        seed: file.draw.seed,
        ui: file.ui,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// into `config/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if let Err(LotteryError::InvalidConfiguration { field, message }) = config.draw.validate() {
        return Err(ConfigError::ValidationError {
            field: format!("draw.{field}"),
            message,
        });
    }

    let fmt = &config.ui.timestamp_format;
    if fmt.is_empty() || StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::ValidationError {
            field: "ui.timestamp_format".into(),
            message: format!("not a valid strftime format: {fmt:?}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

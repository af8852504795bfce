//! Operator tables and limits loaded from files, flags and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use opparen_ast::validate::ValidationLimits;
use opparen_ast::{Operator, OperatorTable};
use opparen_render::{PipelineOptions, DEFAULT_CACHE_CAPACITY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "opparen.toml";

pub const ENV_MAX_DEPTH: &str = "OPPAREN_MAX_DEPTH";
pub const ENV_MAX_PRECEDENCE: &str = "OPPAREN_MAX_PRECEDENCE";
pub const ENV_CACHE_CAPACITY: &str = "OPPAREN_CACHE_CAPACITY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in '{}': {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("don't know how to read '{}' (expected a .toml or .json file)", path.display())]
    UnknownFormat { path: PathBuf },

    #[error("{0}")]
    Operator(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Limits {
    pub max_depth: usize,
    pub max_precedence: u32,
    pub cache_capacity: usize,
}

impl Default for Limits {
    fn default() -> Self {
        let pipeline = PipelineOptions::default();
        Self {
            max_depth: pipeline.max_depth,
            max_precedence: ValidationLimits::default().max_precedence,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub limits: Limits,
    pub operators: Vec<Operator>,
}

/// A JSON table file: a bare operator array or a full config object.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonTable {
    Operators(Vec<Operator>),
    Config(Config),
}

impl Config {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let table = serde_json::from_str::<JsonTable>(text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(match table {
            JsonTable::Operators(operators) => Config {
                operators,
                ..Config::default()
            },
            JsonTable::Config(config) => config,
        })
    }

    /// Reads a `.toml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text, path)?,
            Some("json") => Self::from_json_str(&text, path)?,
            _ => {
                return Err(ConfigError::UnknownFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        log::debug!(
            "loaded {} operators from '{}'",
            config.operators.len(),
            path.display()
        );
        Ok(config)
    }

    /// Appends the operators of another file, keeping this config's limits.
    pub fn merge_operators(&mut self, other: Config) {
        self.operators.extend(other.operators);
    }

    /// Adds an operator given as `SYMBOL:PRECEDENCE[:ASSOC]`.
    pub fn push_flag(&mut self, flag: &str) -> Result<(), ConfigError> {
        let operator = flag.parse::<Operator>().map_err(ConfigError::Operator)?;
        self.operators.push(operator);
        Ok(())
    }

    /// Applies `OPPAREN_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`; unparsable values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(n) = env_number(&lookup, ENV_MAX_DEPTH) {
            self.limits.max_depth = n;
        }
        if let Some(n) = env_number(&lookup, ENV_MAX_PRECEDENCE) {
            self.limits.max_precedence = n;
        }
        if let Some(n) = env_number(&lookup, ENV_CACHE_CAPACITY) {
            self.limits.cache_capacity = n;
        }
    }

    pub fn table(&self) -> OperatorTable {
        OperatorTable::new(self.operators.clone())
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            max_depth: self.limits.max_depth,
            cache_capacity: self.limits.cache_capacity,
        }
    }

    pub fn validation_limits(&self) -> ValidationLimits {
        ValidationLimits {
            max_precedence: self.limits.max_precedence,
        }
    }
}

fn env_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse::<T>() {
        Ok(n) => Some(n),
        Err(_) => {
            log::warn!("ignoring {key}={value:?}: not a non-negative integer");
            None
        }
    }
}

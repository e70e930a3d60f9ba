//! Configuration file discovery and loading.
//!
//! The discovery order is:
//! 1. An explicit `--config` path (must exist).
//! 2. `SIFT_CONFIG` environment variable.
//! 3. `~/.sift/config.json`
//! 4. If none found, built-in defaults.
//!
//! JSON keys are normalized from camelCase to snake_case before
//! deserializing. After the file is applied, a few environment variables
//! override individual settings:
//!
//! | Variable       | Setting                    |
//! |----------------|----------------------------|
//! | `GROQ_API_KEY` | `provider.api_key`         |
//! | `MODEL_NAME`   | `provider.model`           |
//! | `MAX_RETRIES`  | `pipeline.max_retries`     |
//! | `PORT`         | `gateway.port`             |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use sift_types::{Config, SecretString};

/// Read access to environment variables.
pub trait Environment {
    fn get_var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn get_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn get_var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Discover the config file path using the fallback chain.
///
/// Returns `None` if neither `SIFT_CONFIG` is set nor
/// `~/.sift/config.json` exists.
pub fn discover_config_path(env: &dyn Environment, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(env_path) = env.get_var("SIFT_CONFIG").filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(env_path));
    }

    let candidate = home_dir?.join(".sift").join("config.json");
    candidate.exists().then_some(candidate)
}

/// Load the configuration from `config_override` or via discovery, then
/// apply environment overrides.
pub fn load_config(
    config_override: Option<&Path>,
    env: &dyn Environment,
    home_dir: Option<PathBuf>,
) -> anyhow::Result<Config> {
    let raw = match config_override {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            read_config_file(path)?
        }
        None => match discover_config_path(env, home_dir) {
            Some(path) if path.exists() => read_config_file(&path)?,
            Some(path) => {
                tracing::warn!(
                    path = %path.display(),
                    "config path does not exist, using defaults"
                );
                Value::Object(serde_json::Map::new())
            }
            None => {
                tracing::info!("no config file found, using defaults");
                Value::Object(serde_json::Map::new())
            }
        },
    };

    let mut config: Config =
        serde_json::from_value(raw).context("failed to deserialize config")?;
    apply_env_overrides(&mut config, env);
    Ok(config)
}

fn read_config_file(path: &Path) -> anyhow::Result<Value> {
    tracing::debug!(path = %path.display(), "loading config file");
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(normalize_keys(value))
}

/// Apply `GROQ_API_KEY`, `MODEL_NAME`, `MAX_RETRIES` and `PORT`.
///
/// Empty values are ignored. Values that do not parse are logged and
/// ignored.
pub fn apply_env_overrides(config: &mut Config, env: &dyn Environment) {
    let get = |name: &str| env.get_var(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = get("GROQ_API_KEY") {
        config.provider.api_key = SecretString::new(key.trim());
    }
    if let Some(model) = get("MODEL_NAME") {
        config.provider.model = model.trim().to_string();
    }
    if let Some(raw) = get("MAX_RETRIES") {
        match raw.trim().parse() {
            Ok(n) => config.pipeline.max_retries = n,
            Err(_) => tracing::warn!(value = %raw, "ignoring invalid MAX_RETRIES"),
        }
    }
    if let Some(raw) = get("PORT") {
        match raw.trim().parse() {
            Ok(port) => config.gateway.port = port,
            Err(_) => tracing::warn!(value = %raw, "ignoring invalid PORT"),
        }
    }
}

/// Convert camelCase JSON keys to snake_case recursively.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (camel_to_snake(&key), normalize_keys(val)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Convert a single camelCase string to snake_case.
///
/// Runs of capitals are kept together, so `"baseURL"` becomes `"base_url"`.
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            if prev.is_lowercase()
                || (prev.is_uppercase() && next.is_some_and(|c| c.is_lowercase()))
            {
                result.push('_');
            }
        }
        result.push(ch.to_ascii_lowercase());
    }
    result
}

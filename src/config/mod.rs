#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::codec;
use crate::core::value::{ConstraintType, RiskLevel};
use crate::error::PlaneditError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub currency: CurrencyConfig,
    pub undo: UndoConfig,
    pub defaults: DefaultsConfig,
}

/// Locale used to parse and render money properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurrencyConfig {
    pub symbol: String,
    pub decimal_point: String,
    pub group_separator: String,
    pub decimals: u8,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: "$".to_owned(),
            decimal_point: ".".to_owned(),
            group_separator: ",".to_owned(),
            decimals: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UndoConfig {
    pub history_limit: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self { history_limit: 200 }
    }
}

/// Start-out values for new tasks, fed into the property registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DefaultsConfig {
    pub estimate: String,
    pub constraint: String,
    pub risk: String,
    pub optimistic_ratio: i32,
    pub pessimistic_ratio: i32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            estimate: "1.0d".to_owned(),
            constraint: "ASAP".to_owned(),
            risk: "Low".to_owned(),
            optimistic_ratio: -10,
            pessimistic_ratio: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
}

pub fn default_paths() -> anyhow::Result<ConfigPaths> {
    let unix = home_config_path_unix();
    if !cfg!(windows) {
        return Ok(ConfigPaths { config_file: unix });
    }

    // Windows: prefer the Unix-style path if present for portability.
    if unix.exists() {
        return Ok(ConfigPaths { config_file: unix });
    }

    let proj = ProjectDirs::from("com", "planedit", "planedit")
        .context("failed to determine platform config directory")?;
    Ok(ConfigPaths {
        config_file: proj.config_dir().join("config.toml"),
    })
}

fn home_config_path_unix() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("planedit").join("config.toml")
}

fn home_dir() -> Option<PathBuf> {
    if let Some(v) = std::env::var_os("HOME") {
        return Some(PathBuf::from(v));
    }
    if let Some(v) = std::env::var_os("USERPROFILE") {
        return Some(PathBuf::from(v));
    }
    let drive = std::env::var_os("HOMEDRIVE");
    let path = std::env::var_os("HOMEPATH");
    match (drive, path) {
        (Some(d), Some(p)) => Some(PathBuf::from(d).join(PathBuf::from(p))),
        _ => None,
    }
}

pub fn load() -> anyhow::Result<(Config, toml_edit::DocumentMut, ConfigPaths)> {
    let paths = default_paths()?;
    let (doc, cfg) = load_from_file(&paths.config_file)?;
    cfg.validate()?;
    Ok((cfg, doc, paths))
}

pub fn list_resolved_toml() -> anyhow::Result<String> {
    let (cfg, _doc, _paths) = load()?;
    Ok(toml::to_string_pretty(&cfg)?)
}

pub fn get_value_string(key: &str) -> anyhow::Result<Option<String>> {
    let paths = default_paths()?;
    get_value_string_at_path(&paths.config_file, key)
}

pub fn set_value_string(key: &str, value: &str) -> anyhow::Result<()> {
    let paths = default_paths()?;
    set_value_string_at_path(&paths.config_file, key, value)
}

fn load_from_file(path: &Path) -> anyhow::Result<(toml_edit::DocumentMut, Config)> {
    if !path.exists() {
        return Ok((toml_edit::DocumentMut::new(), Config::default()));
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let doc = raw
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("failed to parse TOML in {}", path.display()))?;

    let cfg: Config = toml::from_str(&raw)
        .with_context(|| format!("failed to deserialize TOML in {}", path.display()))?;
    Ok((doc, cfg))
}

pub fn get_value_string_at_path(path: &Path, key: &str) -> anyhow::Result<Option<String>> {
    let (_doc, cfg) = load_from_file(path)?;
    cfg.validate()?;

    let value = lookup_value(&cfg, key);
    Ok(value.map(format_value_for_stdout))
}

pub fn set_value_string_at_path(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let (mut doc, cfg) = load_from_file(path)?;
    cfg.validate()?;

    let value_item = parse_value_for_key(key, value)?;
    apply_set(&mut doc, key, value_item)?;

    // Validate by re-parsing the updated doc into a Config.
    let new_raw = doc.to_string();
    let new_cfg: Config = toml::from_str(&new_raw)
        .with_context(|| format!("config update produced invalid TOML for {}", path.display()))?;
    new_cfg.validate()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, new_raw.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(())
}

impl Config {
    pub fn validate(&self) -> Result<(), PlaneditError> {
        if self.currency.decimal_point.is_empty() {
            return Err(PlaneditError::Config(
                "currency.decimal_point must not be empty".to_owned(),
            ));
        }
        if self.currency.decimal_point == self.currency.group_separator {
            return Err(PlaneditError::Config(
                "currency.decimal_point and currency.group_separator must differ".to_owned(),
            ));
        }
        if self.currency.decimals > 4 {
            return Err(PlaneditError::Config(
                "currency.decimals must be <= 4".to_owned(),
            ));
        }
        if self.undo.history_limit == 0 {
            return Err(PlaneditError::Config(
                "undo.history_limit must be >= 1".to_owned(),
            ));
        }
        codec::parse_duration(&self.defaults.estimate)
            .map_err(|msg| PlaneditError::Config(format!("defaults.estimate: {msg}")))?;
        if ConstraintType::from_label(&self.defaults.constraint).is_none() {
            return Err(PlaneditError::Config(format!(
                "defaults.constraint must be one of: {}",
                ConstraintType::LABELS.join(", ")
            )));
        }
        if RiskLevel::from_label(&self.defaults.risk).is_none() {
            return Err(PlaneditError::Config(format!(
                "defaults.risk must be one of: {}",
                RiskLevel::LABELS.join(", ")
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyType {
    Int,
    String,
    Enum(&'static [&'static str]),
}

fn key_type(key: &str) -> Option<KeyType> {
    Some(match key {
        "currency.symbol"
        | "currency.decimal_point"
        | "currency.group_separator"
        | "defaults.estimate" => KeyType::String,

        "currency.decimals"
        | "undo.history_limit"
        | "defaults.optimistic_ratio"
        | "defaults.pessimistic_ratio" => KeyType::Int,

        "defaults.constraint" => KeyType::Enum(ConstraintType::LABELS),
        "defaults.risk" => KeyType::Enum(RiskLevel::LABELS),

        _ => return None,
    })
}

fn parse_value_for_key(key: &str, value: &str) -> anyhow::Result<toml_edit::Item> {
    let key_type = key_type(key).ok_or_else(|| PlaneditError::InvalidConfigKey(key.to_owned()))?;
    let item = match key_type {
        KeyType::Int => toml_edit::value(parse_int(value).map_err(|msg| {
            PlaneditError::InvalidConfigValue {
                key: key.to_owned(),
                msg,
            }
        })?),
        KeyType::String => toml_edit::value(value),
        KeyType::Enum(allowed) => {
            let v = value.trim();
            if !allowed.contains(&v) {
                return Err(PlaneditError::InvalidConfigValue {
                    key: key.to_owned(),
                    msg: format!("must be one of: {}", allowed.join(", ")),
                }
                .into());
            }
            toml_edit::value(v)
        }
    };
    Ok(item)
}

fn parse_int(s: &str) -> Result<i64, String> {
    s.trim()
        .parse::<i64>()
        .map_err(|e| format!("expected integer, got '{s}': {e}"))
}

fn apply_set(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    value: toml_edit::Item,
) -> anyhow::Result<()> {
    let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        return Err(PlaneditError::InvalidConfigKey(key.to_owned()).into());
    }

    let mut cur = doc.as_table_mut();
    for seg in &parts[..parts.len().saturating_sub(1)] {
        if !cur.contains_key(seg) {
            let mut t = toml_edit::Table::new();
            t.set_implicit(true);
            cur.insert(seg, toml_edit::Item::Table(t));
        }
        cur = cur[seg].as_table_mut().ok_or_else(|| {
            PlaneditError::Config(format!("cannot set {key}: '{seg}' is not a table"))
        })?;
    }

    let leaf = parts[parts.len() - 1];
    cur.insert(leaf, value);
    Ok(())
}

fn lookup_value(cfg: &Config, key: &str) -> Option<serde_json::Value> {
    let mut v = serde_json::to_value(cfg).ok()?;
    for seg in key.split('.').filter(|s| !s.is_empty()) {
        match v {
            serde_json::Value::Object(mut map) => {
                v = map.remove(seg)?;
            }
            _ => return None,
        }
    }
    Some(v)
}

fn format_value_for_stdout(v: serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "null".to_owned(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s,
        other => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn config_validation_catches_invalid_values() {
        let mut cfg = Config::default();
        cfg.undo.history_limit = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.defaults.constraint = "Whenever".to_owned();
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.currency.group_separator = ".".to_owned();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_set_and_get_dot_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        set_value_string_at_path(&path, "currency.symbol", "kr").unwrap();
        assert_eq!(
            get_value_string_at_path(&path, "currency.symbol")
                .unwrap()
                .as_deref(),
            Some("kr")
        );

        set_value_string_at_path(&path, "undo.history_limit", "50").unwrap();
        assert_eq!(
            get_value_string_at_path(&path, "undo.history_limit")
                .unwrap()
                .as_deref(),
            Some("50")
        );

        set_value_string_at_path(&path, "defaults.constraint", "ALAP").unwrap();

        let (_doc, cfg) = load_from_file(&path).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.currency.symbol, "kr");
        assert_eq!(cfg.undo.history_limit, 50);
        assert_eq!(cfg.defaults.constraint, "ALAP");
    }

    #[test]
    fn bad_keys_and_values_leave_the_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        assert!(set_value_string_at_path(&path, "currency.emoji", "x").is_err());
        assert!(set_value_string_at_path(&path, "undo.history_limit", "many").is_err());
        assert!(set_value_string_at_path(&path, "defaults.risk", "Scary").is_err());
        // A value the key table accepts but validation rejects.
        assert!(set_value_string_at_path(&path, "defaults.estimate", "3.0w").is_err());
        assert!(!path.exists());
    }
}

use super::{parse_config, PluginConfig};
use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Config file used when `RAP_PLUGIN_CONFIG` is not set (optional)
pub const DEFAULT_CONFIG_PATH: &str = "rap-plugin.toml";

/// Environment variable → config key it overrides
const ENV_OVERRIDES: [(&str, &str); 5] = [
    ("RAP_BROKER_URL", "broker.url"),
    ("RAP_BROKER_USERNAME", "broker.username"),
    ("RAP_BROKER_PASSWORD", "broker.password"),
    ("RAP_PLUGIN_ID", "plugin.id"),
    ("RAP_WAIT_FOR_SERVICES", "startup.wait_for_services"),
];

/// Where a resolved configuration value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    File(String),
    Env(String),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File(path) => write!(f, "file:{}", path),
            ConfigSource::Env(var) => write!(f, "env:{}", var),
        }
    }
}

/// Resolved configuration plus the provenance of every key
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: PluginConfig,
    path: Option<String>,
    file_keys: BTreeSet<String>,
    env_keys: BTreeMap<String, String>,
}

impl LoadedConfig {
    /// All defaults, nothing read from file or environment
    pub fn defaults() -> Self {
        Self {
            config: PluginConfig::default(),
            path: None,
            file_keys: BTreeSet::new(),
            env_keys: BTreeMap::new(),
        }
    }

    /// Load from `RAP_PLUGIN_CONFIG` (or the default path) and apply process
    /// environment overrides.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var("RAP_PLUGIN_CONFIG").ok();
        Self::load(path.as_deref(), |var| std::env::var(var).ok())
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist; without one, [`DEFAULT_CONFIG_PATH`] is
    /// read if present. Overrides are looked up through `env`.
    pub fn load<F>(path: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let mut loaded = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file '{}'", path))?;
            Self::from_toml(&contents, path)?
        } else if required {
            bail!("Config file '{}' does not exist", path);
        } else {
            info!(path = %path, "No config file found, using defaults");
            Self::defaults()
        };

        loaded.apply_env(env);
        Ok(loaded)
    }

    /// Parse TOML text, remembering which keys it set
    pub fn from_toml(contents: &str, path: &str) -> Result<Self> {
        let config = parse_config(contents)?;
        let table: toml::Table = contents
            .parse()
            .context("Failed to parse plugin configuration")?;

        let mut file_keys = BTreeSet::new();
        for (section, value) in &table {
            match value.as_table() {
                Some(inner) => {
                    for key in inner.keys() {
                        file_keys.insert(format!("{}.{}", section, key));
                    }
                }
                None => {
                    file_keys.insert(section.clone());
                }
            }
        }

        Ok(Self {
            config,
            path: Some(path.to_string()),
            file_keys,
            env_keys: BTreeMap::new(),
        })
    }

    /// Apply environment overrides; later sources win over the file
    pub fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in ENV_OVERRIDES {
            let Some(value) = env(var) else {
                continue;
            };

            match key {
                "broker.url" => self.config.broker.url = value,
                "broker.username" => self.config.broker.username = Some(value),
                "broker.password" => self.config.broker.password = Some(value),
                "plugin.id" => self.config.plugin.id = value,
                "startup.wait_for_services" => {
                    self.config.startup.wait_for_services = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                _ => continue,
            }

            self.env_keys.insert(key.to_string(), var.to_string());
        }
    }

    /// Config file the values were read from, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Provenance of a dotted key such as `broker.url`
    pub fn source_of(&self, key: &str) -> ConfigSource {
        if let Some(var) = self.env_keys.get(key) {
            return ConfigSource::Env(var.clone());
        }
        match &self.path {
            Some(path) if self.file_keys.contains(key) => ConfigSource::File(path.clone()),
            _ => ConfigSource::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_sources_from_file() {
        let loaded = LoadedConfig::from_toml(
            "[broker]\nurl = \"nats://file:4222\"\n",
            "/etc/rap-plugin.toml",
        )
        .unwrap();

        assert_eq!(loaded.config.broker.url, "nats://file:4222");
        assert_eq!(
            loaded.source_of("broker.url"),
            ConfigSource::File("/etc/rap-plugin.toml".to_string())
        );
        assert_eq!(loaded.source_of("plugin.id"), ConfigSource::Default);
        assert_eq!(
            loaded.source_of("broker.url").to_string(),
            "file:/etc/rap-plugin.toml"
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let mut loaded =
            LoadedConfig::from_toml("[plugin]\nid = \"from-file\"\n", "rap.toml").unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            ("RAP_PLUGIN_ID", "from-env"),
            ("RAP_WAIT_FOR_SERVICES", "broker:4222, rap:8103 ,,"),
        ]);
        loaded.apply_env(|var| env.get(var).map(|v| v.to_string()));

        assert_eq!(loaded.config.plugin.id, "from-env");
        assert_eq!(
            loaded.source_of("plugin.id"),
            ConfigSource::Env("RAP_PLUGIN_ID".to_string())
        );
        assert_eq!(
            loaded.config.startup.wait_for_services,
            vec!["broker:4222".to_string(), "rap:8103".to_string()]
        );
    }

    #[test]
    fn test_load_from_temp_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[subscription]\npush_interval_seconds = 2").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let loaded = LoadedConfig::load(Some(&path), no_env).unwrap();
        assert_eq!(loaded.config.subscription.push_interval_seconds, 2);
        assert_eq!(loaded.path(), Some(path.as_str()));
        assert_eq!(
            loaded.source_of("subscription.push_interval_seconds"),
            ConfigSource::File(path.clone())
        );
    }

    #[test]
    fn test_load_rejects_zero_push_interval() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[subscription]\npush_interval_seconds = 0").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        assert!(LoadedConfig::load(Some(&path), no_env).is_err());
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let result = LoadedConfig::load(missing.to_str(), no_env);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_have_default_sources() {
        let loaded = LoadedConfig::defaults();
        assert!(loaded.path().is_none());
        assert_eq!(loaded.source_of("broker.url"), ConfigSource::Default);
    }
}

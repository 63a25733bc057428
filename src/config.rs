use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DEFAULT_BRANCH_ENV: &str = "CI_COMMIT_BRANCH";

/// How the branch scope selects variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopePolicy {
    /// `<SCOPE>_<NAME>` is re-exported as `<NAME>` before lookup.
    #[default]
    Strip,
    /// `<SCOPE><NAME>` is looked up directly.
    Concat,
}

/// What a JSON leaf becomes when its variable is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Leave the template value untouched (empty counts as unset).
    #[default]
    Skip,
    /// Overwrite with `0`, `false` or `""`.
    Default,
}

impl FromStr for ScopePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strip" => Ok(Self::Strip),
            "concat" => Ok(Self::Concat),
            _ => Err(Error::InvalidSetting {
                name: "scope policy",
                value: s.to_string(),
                expected: "strip, concat",
            }),
        }
    }
}

impl FromStr for MissingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "default" => Ok(Self::Default),
            _ => Err(Error::InvalidSetting {
                name: "missing policy",
                value: s.to_string(),
                expected: "skip, default",
            }),
        }
    }
}

impl fmt::Display for ScopePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strip => "strip",
            Self::Concat => "concat",
        })
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skip => "skip",
            Self::Default => "default",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_branch_env")]
    pub branch_env: String,
    #[serde(default)]
    pub scope_policy: ScopePolicy,
    #[serde(default)]
    pub missing: MissingPolicy,
}

fn default_branch_env() -> String {
    DEFAULT_BRANCH_ENV.into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            branch_env: default_branch_env(),
            scope_policy: ScopePolicy::default(),
            missing: MissingPolicy::default(),
        }
    }
}

/// Map of REPLACE_ENV_ env var suffix → settings field
const ENV_FIELD_MAP: &[(&str, &str)] = &[
    ("BRANCH_ENV", "branch_env"),
    ("SCOPE_POLICY", "scope_policy"),
    ("MISSING", "missing"),
];

impl Settings {
    /// Load settings with layered resolution: defaults → global TOML → env vars.
    /// CLI flags are applied on top by the caller.
    pub fn load() -> Result<Self> {
        Self::load_except(&[])
    }

    /// Like [`Settings::load`], but the env vars for the listed suffixes
    /// (e.g. `"MISSING"`) are ignored, since a flag replaces them anyway.
    pub fn load_except(overridden: &[&str]) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(path) = global_config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|source| Error::Read {
                    path: path.clone(),
                    source,
                })?;
                let file_cfg: Settings = toml::from_str(&content).map_err(|e| Error::Config {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                cfg.merge_from(&file_cfg);
            }
        }

        let mut env_map = HashMap::new();
        for (suffix, _) in ENV_FIELD_MAP {
            if overridden.contains(suffix) {
                continue;
            }
            let key = format!("REPLACE_ENV_{suffix}");
            if let Ok(val) = std::env::var(&key) {
                env_map.insert(key, val);
            }
        }
        cfg.apply_env_map(&env_map)?;

        Ok(cfg)
    }

    fn merge_from(&mut self, other: &Settings) {
        if !other.branch_env.is_empty() {
            self.branch_env = other.branch_env.clone();
        }
        self.scope_policy = other.scope_policy;
        self.missing = other.missing;
    }

    pub fn apply_env_map(&mut self, map: &HashMap<String, String>) -> Result<()> {
        for (suffix, _field) in ENV_FIELD_MAP {
            let key = format!("REPLACE_ENV_{suffix}");
            if let Some(val) = map.get(&key) {
                match *suffix {
                    "BRANCH_ENV" if !val.trim().is_empty() => {
                        self.branch_env = val.trim().to_string()
                    }
                    "SCOPE_POLICY" => self.scope_policy = val.parse()?,
                    "MISSING" => self.missing = val.parse()?,
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

/// Global config file path
pub fn global_config_path() -> Option<PathBuf> {
    if let Some(override_dir) = std::env::var_os("REPLACE_ENV_CONFIG_HOME") {
        let override_path = PathBuf::from(override_dir);
        if !override_path.as_os_str().is_empty() {
            return Some(override_path.join("replace-env").join("config.toml"));
        }
    }
    dirs::config_dir().map(|d| d.join("replace-env").join("config.toml"))
}

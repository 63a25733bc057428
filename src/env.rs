use std::collections::BTreeMap;
use std::path::Path;

use crate::config::{MissingPolicy, ScopePolicy, Settings};
use crate::error::{Error, Result};
use crate::naming;

/// Environment variables captured once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    vars: BTreeMap<String, String>,
}

impl Snapshot {
    /// Capture the process environment. Non-UTF-8 entries are converted lossily.
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect();
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Add variables from a dotenv file. Variables already present win.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let iter = dotenvy::from_path_iter(path).map_err(|source| Error::EnvFile {
            path: path.to_path_buf(),
            source,
        })?;

        let mut added = 0;
        for item in iter {
            let (key, value) = item.map_err(|source| Error::EnvFile {
                path: path.to_path_buf(),
                source,
            })?;
            if !self.vars.contains_key(&key) {
                self.vars.insert(key, value);
                added += 1;
            }
        }
        Ok(added)
    }

    /// Branch scope read from `branch_env`, upper-cased. Blank means no scope.
    pub fn branch_scope(&self, branch_env: &str) -> Option<String> {
        self.get(branch_env)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_uppercase)
    }

    /// Copy every `<SCOPE>_<NAME>` variable to `<NAME>`, overriding any unscoped value.
    pub fn strip_scope(mut self, scope: &str) -> Self {
        let prefix = format!("{scope}_");
        let scoped: Vec<(String, String)> = self
            .vars
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(&prefix)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_string(), v.clone()))
            })
            .collect();
        self.vars.extend(scoped);
        self
    }
}

impl<K, V> FromIterator<(K, V)> for Snapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A variable name consulted during substitution, for `--verbose` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub name: String,
    pub found: bool,
}

/// Everything a substitution pass needs to resolve a key.
#[derive(Debug, Clone)]
pub struct Lookup {
    snapshot: Snapshot,
    scope: Option<String>,
    pub scope_policy: ScopePolicy,
    pub missing: MissingPolicy,
}

impl Lookup {
    /// Derive the branch scope and run the prefix-strip pre-pass when enabled.
    pub fn new(snapshot: Snapshot, settings: &Settings) -> Self {
        let scope = snapshot.branch_scope(&settings.branch_env);
        let snapshot = match (&scope, settings.scope_policy) {
            (Some(scope), ScopePolicy::Strip) => snapshot.strip_scope(scope),
            _ => snapshot,
        };
        Self {
            snapshot,
            scope,
            scope_policy: settings.scope_policy,
            missing: settings.missing,
        }
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Final lookup name for a converted variable name.
    pub fn resolve_name(&self, name: &str) -> String {
        naming::scoped_name(name, self.scope(), self.scope_policy)
    }

    pub fn get(&self, resolved: &str) -> Option<&str> {
        self.snapshot.get(resolved)
    }
}

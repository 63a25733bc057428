#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

pub struct EnvGuard {
    previous: HashMap<String, Option<String>>,
}

impl EnvGuard {
    pub fn set(pairs: &[(&str, &str)]) -> Self {
        let mut previous = HashMap::new();
        for (key, value) in pairs {
            previous.insert((*key).to_string(), std::env::var(key).ok());
            std::env::set_var(key, value);
        }
        Self { previous }
    }

    pub fn clear(keys: &[&str]) -> Self {
        let mut previous = HashMap::new();
        for key in keys {
            previous.insert((*key).to_string(), std::env::var(key).ok());
            std::env::remove_var(key);
        }
        Self { previous }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            if let Some(value) = value {
                std::env::set_var(key, value);
            } else {
                std::env::remove_var(key);
            }
        }
    }
}

/// Settings variables that would leak from the developer's shell into a run.
pub const SETTINGS_KEYS: [&str; 4] = [
    "REPLACE_ENV_CONFIG_HOME",
    "REPLACE_ENV_BRANCH_ENV",
    "REPLACE_ENV_SCOPE_POLICY",
    "REPLACE_ENV_MISSING",
];

pub fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).expect("failed to write file");
}

pub fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path).expect("failed to read file")
}

/// A scratch directory that also serves as an empty config home.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        write_file(&path, content);
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// The built binary with a clean branch/config environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_replace-env"));
        for key in SETTINGS_KEYS {
            cmd.env_remove(key);
        }
        cmd.env_remove("CI_COMMIT_BRANCH");
        cmd.env("REPLACE_ENV_CONFIG_HOME", self.dir.path());
        cmd
    }

    pub fn run(&self, args: &[&str], vars: &[(&str, &str)]) -> Output {
        let mut cmd = self.command();
        cmd.args(args);
        for (key, value) in vars {
            cmd.env(key, value);
        }
        cmd.output().expect("failed to run replace-env")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

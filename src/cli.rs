use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::{MissingPolicy, ScopePolicy, Settings};
use crate::dotenv;
use crate::env::{Lookup, Resolution, Snapshot};
use crate::error::Error;
use crate::json;

#[derive(Parser, Debug)]
#[command(
    name = "replace-env",
    about = "A tiny tool for replacing .env and .env.json values in CI/CD",
    version,
    after_help = "Settings are read from the global config file, then REPLACE_ENV_* variables, then flags."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace leaf values of a JSON template
    #[command(alias = "j")]
    Json(SubstituteArgs),
    /// Replace values of a KEY=VALUE template
    #[command(alias = "e")]
    Env(SubstituteArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct SubstituteArgs {
    /// Variable holding the branch name used as scope [default: CI_COMMIT_BRANCH]
    #[arg(long, value_name = "NAME")]
    pub branch_env: Option<String>,

    /// How the branch scope selects variables: strip or concat
    #[arg(long, value_name = "POLICY")]
    pub scope_policy: Option<ScopePolicy>,

    /// What unset variables do to JSON values: skip or default
    #[arg(long, value_name = "POLICY")]
    pub missing: Option<MissingPolicy>,

    /// Extra variables for lookup; the process environment wins on conflicts
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Report every variable name looked up (values are never printed)
    #[arg(short, long)]
    pub verbose: bool,

    /// Template to read
    #[arg(value_name = "SOURCE_FILE")]
    pub source: Option<PathBuf>,

    /// Where to write the result; stdout when omitted
    #[arg(value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,
}

impl SubstituteArgs {
    /// `REPLACE_ENV_*` suffixes replaced by a flag on this invocation.
    pub fn overridden(&self) -> Vec<&'static str> {
        let mut suffixes = Vec::new();
        if self.branch_env.as_deref().is_some_and(|v| !v.is_empty()) {
            suffixes.push("BRANCH_ENV");
        }
        if self.scope_policy.is_some() {
            suffixes.push("SCOPE_POLICY");
        }
        if self.missing.is_some() {
            suffixes.push("MISSING");
        }
        suffixes
    }

    /// Flags override whatever the config layers produced.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(branch_env) = self.branch_env.as_deref().filter(|v| !v.is_empty()) {
            settings.branch_env = branch_env.to_string();
        }
        if let Some(policy) = self.scope_policy {
            settings.scope_policy = policy;
        }
        if let Some(missing) = self.missing {
            settings.missing = missing;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Env,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Json(args) => substitute_file(Format::Json, &args),
        Command::Env(args) => substitute_file(Format::Env, &args),
    }
}

pub fn substitute_file(format: Format, args: &SubstituteArgs) -> Result<()> {
    let source = args
        .source
        .as_deref()
        .ok_or(Error::MissingArgument("source file"))?;

    let mut settings = Settings::load_except(&args.overridden())?;
    args.apply(&mut settings);

    let mut snapshot = Snapshot::capture();
    if let Some(path) = &args.env_file {
        let added = snapshot.extend_from_file(path)?;
        if args.verbose {
            eprintln!(
                "{} {} variables from {}",
                "note:".yellow().bold(),
                added,
                path.display().to_string().dimmed()
            );
        }
    }
    let lookup = Lookup::new(snapshot, &settings);

    if args.verbose {
        eprintln!(
            "{} scope {} ({} from ${})",
            "note:".yellow().bold(),
            lookup.scope().unwrap_or("(none)"),
            settings.scope_policy,
            settings.branch_env
        );
    }

    let content = std::fs::read_to_string(source).map_err(|e| Error::Read {
        path: source.to_path_buf(),
        source: e,
    })?;

    let (rendered, resolved) = render(format, &content, source, &lookup)?;

    if args.verbose {
        report(&resolved);
    }

    write_output(args.output.as_deref(), &rendered)?;
    Ok(())
}

/// Substitute a template held in memory and render it back to text.
pub fn render(
    format: Format,
    content: &str,
    source: &Path,
    lookup: &Lookup,
) -> Result<(String, Vec<Resolution>), Error> {
    match format {
        Format::Json => {
            let mut tree = json::parse(content, source)?;
            let resolved = json::substitute(&mut tree, lookup)?;
            Ok((json::render(&tree)?, resolved))
        }
        Format::Env => {
            let mut lines = dotenv::parse(content);
            let resolved = dotenv::substitute(&mut lines, lookup);
            Ok((dotenv::render(&lines), resolved))
        }
    }
}

fn report(resolved: &[Resolution]) {
    for r in resolved {
        let state = if r.found {
            "set".green()
        } else {
            "unset".dimmed()
        };
        eprintln!("{} ${} {}", "note:".yellow().bold(), r.name, state);
    }
}

fn write_output(output: Option<&Path>, rendered: &str) -> Result<(), Error> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|source| Error::Write {
                path: path.to_path_buf(),
                source,
            })?;
            eprintln!(
                "{} Saved to {}",
                "done!".green().bold(),
                path.display().to_string().dimmed()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| Error::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
    }
    Ok(())
}

use std::path::Path;

use clap::Parser;
use replace_env::cli::{Cli, Command};
use replace_env::config::{MissingPolicy, ScopePolicy, Settings};

#[test]
fn parses_json_subcommand_and_alias() {
    for name in ["json", "j"] {
        let cli = Cli::try_parse_from(["replace-env", name, "in.json", "out.json"])
            .expect("json should parse");
        let Command::Json(args) = cli.command else {
            panic!("expected json command for {name}");
        };
        assert_eq!(args.source.as_deref(), Some(Path::new("in.json")));
        assert_eq!(args.output.as_deref(), Some(Path::new("out.json")));
    }
}

#[test]
fn parses_env_alias_with_branch_env_flag() {
    let cli = Cli::try_parse_from(["replace-env", "e", "--branch-env", "GITHUB_REF_NAME", ".env"])
        .expect("env should parse");
    let Command::Env(args) = cli.command else {
        panic!("expected env command");
    };
    assert_eq!(args.branch_env.as_deref(), Some("GITHUB_REF_NAME"));
    assert_eq!(args.source.as_deref(), Some(Path::new(".env")));
    assert!(args.output.is_none());
}

#[test]
fn source_file_is_optional_at_parse_time() {
    let cli = Cli::try_parse_from(["replace-env", "json"]).expect("json should parse");
    let Command::Json(args) = cli.command else {
        panic!("expected json command");
    };
    assert!(args.source.is_none());
}

#[test]
fn parses_policy_flags() {
    let cli = Cli::try_parse_from([
        "replace-env",
        "json",
        "--scope-policy",
        "concat",
        "--missing",
        "default",
        "in.json",
    ])
    .expect("flags should parse");
    let Command::Json(args) = cli.command else {
        panic!("expected json command");
    };
    assert_eq!(args.scope_policy, Some(ScopePolicy::Concat));
    assert_eq!(args.missing, Some(MissingPolicy::Default));
}

#[test]
fn rejects_unknown_policy() {
    let err = Cli::try_parse_from(["replace-env", "json", "--scope-policy", "prefix", "a.json"])
        .expect_err("should fail");
    assert!(
        err.to_string().contains("prefix"),
        "expected clap to mention the bad value, got: {err}"
    );
}

#[test]
fn flags_override_settings() {
    let cli = Cli::try_parse_from([
        "replace-env",
        "env",
        "--branch-env",
        "BRANCH",
        "--missing",
        "default",
        ".env",
    ])
    .expect("env should parse");
    let Command::Env(args) = cli.command else {
        panic!("expected env command");
    };

    let mut settings = Settings::default();
    args.apply(&mut settings);
    assert_eq!(settings.branch_env, "BRANCH");
    assert_eq!(settings.missing, MissingPolicy::Default);
    assert_eq!(settings.scope_policy, ScopePolicy::Strip);
}

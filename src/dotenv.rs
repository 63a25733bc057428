use crate::env::{Lookup, Resolution};
use crate::naming;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLine {
    pub key: String,
    pub value: String,
}

/// Parse `KEY=VALUE` lines. Blank lines are dropped; a line without `=` is all key.
pub fn parse(source: &str) -> Vec<EnvLine> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once('=') {
            Some((key, value)) => EnvLine {
                key: key.to_string(),
                value: value.to_string(),
            },
            None => EnvLine {
                key: line.to_string(),
                value: String::new(),
            },
        })
        .collect()
}

/// Replace every value with its variable. The template value is discarded and
/// an unset variable gives an empty value.
pub fn substitute(lines: &mut [EnvLine], lookup: &Lookup) -> Vec<Resolution> {
    lines
        .iter_mut()
        .map(|line| {
            let var = lookup.resolve_name(&naming::line_key_name(line.key.trim()));
            let found = lookup.get(&var);
            line.value = found.unwrap_or_default().to_string();
            Resolution {
                found: found.is_some(),
                name: var,
            }
        })
        .collect()
}

pub fn to_lines(lines: &[EnvLine]) -> Vec<String> {
    lines
        .iter()
        .map(|line| format!("{}={}", line.key, line.value))
        .collect()
}

/// One line per entry, each newline-terminated.
pub fn render(lines: &[EnvLine]) -> String {
    to_lines(lines)
        .into_iter()
        .map(|line| line + "\n")
        .collect()
}

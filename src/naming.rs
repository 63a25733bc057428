use crate::config::ScopePolicy;

/// Convert a template key to its environment-variable form.
///
/// An `_` goes before every upper-case character except the first, then the
/// whole key is upper-cased: `apiUrl` becomes `API_URL`, `URL` becomes `U_R_L`.
pub fn underscore_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_uppercase() && i != 0 {
            name.push('_');
        }
        name.extend(c.to_uppercase());
    }
    name
}

/// Variable name for a `.env` line key.
///
/// Keys with no lower-case letter are already variable names and are only
/// upper-cased, so `DB_HOST=` looks up `DB_HOST`. Anything else goes through
/// [`underscore_name`].
pub fn line_key_name(key: &str) -> String {
    if key.chars().any(char::is_lowercase) {
        underscore_name(key)
    } else {
        key.to_uppercase()
    }
}

/// Join a nested key onto its parent's variable name.
pub fn join_name(parent: Option<&str>, key: &str) -> String {
    let name = underscore_name(key);
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}_{name}"),
        _ => name,
    }
}

/// The name actually looked up in the snapshot for an already converted name.
///
/// Under [`ScopePolicy::Strip`] the snapshot has been rewritten up front, so
/// the bare name is used.
pub fn scoped_name(name: &str, scope: Option<&str>, policy: ScopePolicy) -> String {
    match (scope, policy) {
        (Some(scope), ScopePolicy::Concat) => format!("{scope}{name}"),
        _ => name.to_string(),
    }
}

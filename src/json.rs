use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::coerce::{coerce, ValueKind};
use crate::config::MissingPolicy;
use crate::env::{Lookup, Resolution};
use crate::error::{Error, Result};
use crate::naming;

/// Parse a JSON template. The root has to be an object.
pub fn parse(source: &str, path: &Path) -> Result<Value> {
    let tree: Value = serde_json::from_str(source).map_err(|source| Error::MalformedJson {
        path: path.to_path_buf(),
        source,
    })?;
    if !tree.is_object() {
        return Err(Error::NotAnObject {
            path: path.to_path_buf(),
        });
    }
    Ok(tree)
}

/// Replace every scalar leaf of `tree` from the environment, in document order.
pub fn substitute(tree: &mut Value, lookup: &Lookup) -> Result<Vec<Resolution>> {
    let mut resolved = Vec::new();
    if let Value::Object(map) = tree {
        walk(map, None, lookup, &mut resolved)?;
    }
    Ok(resolved)
}

fn walk(
    map: &mut Map<String, Value>,
    parent: Option<&str>,
    lookup: &Lookup,
    resolved: &mut Vec<Resolution>,
) -> Result<()> {
    for (key, value) in map.iter_mut() {
        let name = naming::join_name(parent, key);

        if let Some(child) = value.as_object_mut() {
            walk(child, Some(&name), lookup, resolved)?;
            continue;
        }

        let var = lookup.resolve_name(&name);
        let raw = lookup.get(&var);
        let found = raw.is_some_and(|v| !v.is_empty());
        resolved.push(Resolution {
            name: var.clone(),
            found,
        });

        if !found && lookup.missing == MissingPolicy::Skip {
            continue;
        }
        *value = coerce(&var, raw, ValueKind::of(value))?;
    }
    Ok(())
}

/// Tab-indented output with a trailing newline.
pub fn render(tree: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    tree.serialize(&mut ser).map_err(Error::Serialize)?;
    let mut out = String::from_utf8_lossy(&buf).into_owned();
    out.push('\n');
    Ok(out)
}

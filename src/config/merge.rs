// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ssa-noise-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration tree merging
//!
//! The defaults tree is the accepted schema: persisted values and
//! overrides can only replace leaves that already exist in it. Unknown
//! keys are dropped silently.

use log::debug;
use serde_json::{Map, Value};

/// Merge `persisted` then `overrides` into a copy of `defaults`.
///
/// Overrides take precedence over persisted values, which take precedence
/// over defaults. Keys absent from `defaults` never reach the result.
pub fn merge(defaults: &Value, persisted: Option<&Value>, overrides: &Value) -> Value {
    let mut merged = defaults.clone();
    if let Some(persisted) = persisted {
        apply_allowed(&mut merged, persisted, "");
    }
    apply_allowed(&mut merged, overrides, "");
    merged
}

fn apply_allowed(target: &mut Value, incoming: &Value, prefix: &str) {
    let (Value::Object(target), Value::Object(incoming)) = (target, incoming) else {
        return;
    };

    for key in incoming.keys().filter(|key| !target.contains_key(*key)) {
        debug!("Ignoring unknown configuration key {}{}", prefix, key);
    }

    for (key, slot) in target.iter_mut() {
        let Some(value) = incoming.get(key) else {
            continue;
        };
        if slot.is_object() {
            // A scalar cannot replace a whole section
            apply_allowed(slot, value, &format!("{}{}.", prefix, key));
        } else {
            *slot = value.clone();
        }
    }
}

/// Set the leaf at `path` in `tree`, creating intermediate objects.
///
/// Used to build override trees from command line flags.
pub fn set_leaf(tree: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut node = tree;
    for key in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = match node {
            Value::Object(map) => map
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new())),
            _ => return,
        };
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        map.insert(last.to_string(), value);
    }
}

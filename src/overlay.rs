//! Overlay merging
//!
//! An overlay is a partial bundle applied on top of a base bundle:
//! - an application or machine set to `null` is removed, and so is every
//!   relation naming a removed application
//! - an existing application is merged field by field; `options`,
//!   `bindings` and `annotations` merge key by key, everything else is
//!   replaced
//! - new applications and machines are added
//! - relations are appended unless already present in either orientation
//! - other top-level keys replace the base value
//!
//! Merging works on raw YAML values so that overlays may omit fields the
//! typed model requires.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{Result, overlay};
use crate::model::Relation;

const APPLICATION_KEYS: [&str; 2] = ["applications", "services"];
const KEYWISE_FIELDS: [&str; 3] = ["options", "bindings", "annotations"];

/// Apply `overlay_doc` to `base`, in place
///
/// `origin` names the overlay in error messages.
pub fn apply(base: &mut Value, overlay_doc: Value, origin: &str) -> Result<()> {
    let overlay_root = match overlay_doc {
        Value::Null => return Ok(()),
        Value::Mapping(mapping) => mapping,
        _ => return Err(overlay::invalid(origin, "overlay is not a mapping")),
    };
    let base_root = base
        .as_mapping_mut()
        .ok_or_else(|| overlay::invalid(origin, "base bundle is not a mapping"))?;

    let application_key = application_key(base_root);

    for (key, value) in overlay_root {
        let Some(name) = key.as_str() else {
            return Err(overlay::invalid(origin, "top-level keys must be strings"));
        };
        match name {
            "applications" | "services" => {
                let removed = merge_applications(base_root, application_key, value, origin)?;
                for application in removed {
                    remove_relations_of(base_root, &application);
                }
            }
            "machines" => merge_machines(base_root, value, origin)?,
            "relations" => append_relations(base_root, value, origin)?,
            _ => {
                debug!(key = name, "overlay replaces top-level key");
                base_root.insert(key, value);
            }
        }
    }

    Ok(())
}

fn application_key(root: &Mapping) -> &'static str {
    APPLICATION_KEYS
        .into_iter()
        .find(|key| root.contains_key(*key))
        .unwrap_or("applications")
}

fn section_mut<'a>(root: &'a mut Mapping, key: &str) -> Option<&'a mut Mapping> {
    let section = root
        .entry(Value::from(key))
        .or_insert(Value::Mapping(Mapping::new()));
    if section.is_null() {
        *section = Value::Mapping(Mapping::new());
    }
    section.as_mapping_mut()
}

/// Merge the overlay's applications, returning the names it removed
fn merge_applications(
    root: &mut Mapping,
    application_key: &str,
    overlay_apps: Value,
    origin: &str,
) -> Result<Vec<String>> {
    let overlay_apps = match overlay_apps {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(apps) => apps,
        _ => return Err(overlay::invalid(origin, "applications must be a mapping")),
    };

    let base_apps = section_mut(root, application_key)
        .ok_or_else(|| overlay::invalid(origin, "base applications must be a mapping"))?;
    let mut removed = Vec::new();

    for (key, overlay_app) in overlay_apps {
        let name = key
            .as_str()
            .ok_or_else(|| overlay::invalid(origin, "application names must be strings"))?
            .to_string();

        match overlay_app {
            Value::Null => {
                if base_apps.remove(&key).is_some() {
                    debug!(application = %name, "overlay removes application");
                }
                removed.push(name);
            }
            Value::Mapping(fields) => {
                if let Some(Value::Mapping(base_app)) = base_apps.get_mut(&key) {
                    debug!(application = %name, "overlay merges application");
                    merge_fields(base_app, fields);
                } else {
                    if !fields.contains_key("charm") {
                        return Err(overlay::missing_charm(name));
                    }
                    debug!(application = %name, "overlay adds application");
                    base_apps.insert(key, Value::Mapping(fields));
                }
            }
            _ => {
                return Err(overlay::invalid(
                    origin,
                    format!("application '{name}' must be a mapping or null"),
                ));
            }
        }
    }

    Ok(removed)
}

fn merge_fields(base: &mut Mapping, fields: Mapping) {
    for (field, value) in fields {
        let keywise = field.as_str().is_some_and(|f| KEYWISE_FIELDS.contains(&f));
        if let (true, Some(Value::Mapping(existing)), Value::Mapping(incoming)) =
            (keywise, base.get_mut(&field), &value)
        {
            for (key, value) in incoming {
                if value.is_null() {
                    existing.remove(key);
                } else {
                    existing.insert(key.clone(), value.clone());
                }
            }
            continue;
        }
        base.insert(field, value);
    }
}

fn merge_machines(root: &mut Mapping, overlay_machines: Value, origin: &str) -> Result<()> {
    let overlay_machines = match overlay_machines {
        Value::Null => return Ok(()),
        Value::Mapping(machines) => machines,
        _ => return Err(overlay::invalid(origin, "machines must be a mapping")),
    };

    let base_machines = section_mut(root, "machines")
        .ok_or_else(|| overlay::invalid(origin, "base machines must be a mapping"))?;
    for (id, machine) in overlay_machines {
        // `0` and `'0'` name the same machine
        let existing = base_machines
            .keys()
            .find(|key| same_machine_id(key, &id))
            .cloned()
            .unwrap_or_else(|| id.clone());

        match machine {
            Value::Null => {
                debug!(machine = ?id, "overlay removes machine");
                base_machines.remove(&existing);
            }
            Value::Mapping(fields) => {
                if let Some(Value::Mapping(base)) = base_machines.get_mut(&existing) {
                    merge_fields(base, fields);
                } else {
                    base_machines.insert(existing, Value::Mapping(fields));
                }
            }
            machine => {
                base_machines.insert(existing, machine);
            }
        }
    }
    Ok(())
}

fn same_machine_id(a: &Value, b: &Value) -> bool {
    scalar_text(a).is_some_and(|a| scalar_text(b).is_some_and(|b| a == b))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn append_relations(root: &mut Mapping, overlay_relations: Value, origin: &str) -> Result<()> {
    let overlay_relations: Vec<Relation> = match overlay_relations {
        Value::Null => return Ok(()),
        value => serde_yaml::from_value(value)
            .map_err(|e| overlay::invalid(origin, format!("relations: {e}")))?,
    };

    let existing: Vec<Relation> = match root.get("relations") {
        Some(value) if !value.is_null() => serde_yaml::from_value(value.clone())
            .map_err(|e| overlay::invalid(origin, format!("base relations: {e}")))?,
        _ => Vec::new(),
    };

    let mut merged = existing;
    for relation in overlay_relations {
        if merged.iter().any(|known| known.same_as(&relation)) {
            debug!(%relation, "overlay relation already present");
            continue;
        }
        merged.push(relation);
    }

    let merged = serde_yaml::to_value(merged)
        .map_err(|e| overlay::invalid(origin, format!("relations: {e}")))?;
    root.insert(Value::from("relations"), merged);
    Ok(())
}

fn remove_relations_of(root: &mut Mapping, application: &str) {
    let Some(Value::Sequence(relations)) = root.get_mut("relations") else {
        return;
    };
    relations.retain(|relation| {
        let Ok(relation) = serde_yaml::from_value::<Relation>(relation.clone()) else {
            return true;
        };
        !relation.involves(application)
    });
}

//! The document served at `actions`.

use crate::framework::Action;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct ActionDescriptor<'a> {
    method: &'a str,
    invoke: String,
    description: String,
}

/// Describes every action of a type, keyed by name.
///
/// Links are relative to the `actions` segment:
///
/// ```json
/// { "publish": { "method": "POST", "invoke": "publish/invoke", "description": "publish/description" } }
/// ```
pub fn describe_actions<C>(actions: &BTreeMap<String, Action<C>>) -> Value {
    let entries: Map<String, Value> = actions
        .iter()
        .map(|(name, action)| {
            let descriptor = ActionDescriptor {
                method: action.method.as_str(),
                invoke: format!("{name}/invoke"),
                description: format!("{name}/description"),
            };
            // Serializing plain strings cannot fail.
            let value = serde_json::to_value(descriptor).unwrap_or(Value::Null);
            (name.clone(), value)
        })
        .collect();
    Value::Object(entries)
}

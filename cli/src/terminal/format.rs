use colored::*;
use nxpipe_core::Finding;
use serde_json::Value;

use crate::terminal::colors;

type Detail = (String, ColoredString);

const SECRET_KEYS: &[&str] = &["password", "hash"];
const ORIGIN_KEYS: &[&str] = &["address", "hostname", "inventory_id"];

/// Key/value rows of a finding: record fields first, then its origin.
pub fn finding_to_details(finding: &Finding) -> Vec<Detail> {
    let Ok(Value::Object(map)) = serde_json::to_value(finding) else {
        return Vec::new();
    };

    let mut record = Vec::new();
    let mut origin = Vec::new();

    for (key, value) in map {
        let text = value_to_text(&value);
        if ORIGIN_KEYS.contains(&key.as_str()) {
            origin.push((key, text.color(colors::ADDRESS)));
        } else if SECRET_KEYS.contains(&key.as_str()) {
            record.push((key, text.color(colors::SECRET).bold()));
        } else {
            record.push((key, text.normal()));
        }
    }

    record.extend(origin);
    record
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<String>>()
            .join(","),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

//! Template loading and management

use provisioning_generator_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Templates compiled into the binary, by registered name
const TEMPLATES: [(&str, &str); 4] = [
    ("resource.java", include_str!("../templates/resource.java.tera")),
    ("model.java", include_str!("../templates/model.java.tera")),
    ("enum.java", include_str!("../templates/enum.java.tera")),
    ("pom.xml", include_str!("../templates/pom.xml.tera")),
];

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();
    // Generated sources are not HTML
    tera.autoescape_on(vec![]);

    tera.register_filter("java_string", java_string_filter);
    tera.register_filter("javadoc", javadoc_filter);

    for (name, source) in TEMPLATES {
        tera.add_raw_template(name, source).map_err(|e| {
            GeneratorError::Generation(format!("Failed to load {} template: {}", name, e))
        })?;
    }

    Ok(tera)
}

/// Escape a value for use inside a Java string literal
fn java_string_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("java_string filter expects a string"))?;

    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }

    Ok(Value::String(escaped))
}

/// Fit free text into a `/** ... */` block
fn javadoc_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("javadoc filter expects a string"))?;

    let body = s
        .replace("*/", "*&#47;")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n * ");

    Ok(Value::String(body))
}

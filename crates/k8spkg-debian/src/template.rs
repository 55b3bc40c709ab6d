//! Minimal text templates for debian packaging files
//!
//! Two kinds of actions are recognised:
//!
//! - `{{ .Key }}` substitutes a value of the [`TemplateContext`]
//! - `{{ name }}` calls a helper from the [`HelperRegistry`]
//!
//! Referencing a key the context lacks is an error, never an empty string.

use k8spkg_core::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::TemplateError;
use crate::helpers::HelperRegistry;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field { key: String, line: usize },
    Helper { name: String, line: usize },
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

/// Values available to `{{ .Key }}` actions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    values: Map<String, Value>,
}

impl TemplateContext {
    /// Build a context from any value serializing to a map
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value) {
            Ok(Value::Object(values)) => Ok(Self { values }),
            Ok(other) => Err(Error::template("<context>", format!("expected a map, got {other}"))),
            Err(e) => Err(Error::template("<context>", e)),
        }
    }

    /// Add or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Rendered form of `key`, `None` when absent
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }
}

impl Template {
    /// Parse template source
    pub fn parse(source: &str) -> std::result::Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut line = 1;

        while let Some(start) = rest.find(OPEN) {
            let (text, after_open) = rest.split_at(start);
            if !text.is_empty() {
                segments.push(Segment::Text(text.to_string()));
            }
            line += text.matches('\n').count();

            let body_start = &after_open[OPEN.len()..];
            let end = body_start
                .find(CLOSE)
                .ok_or_else(|| TemplateError::syntax(line, "unclosed action"))?;
            let body = &body_start[..end];
            if body.contains(OPEN) {
                return Err(TemplateError::syntax(line, "unclosed action"));
            }

            segments.push(parse_action(body, line)?);
            line += body.matches('\n').count();
            rest = &body_start[end + CLOSE.len()..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Render against `context`, calling helpers from `helpers`
    pub fn render(
        &self,
        context: &TemplateContext,
        helpers: &HelperRegistry,
    ) -> std::result::Result<String, TemplateError> {
        let mut output = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Field { key, line } => {
                    let value = context
                        .lookup(key)
                        .ok_or_else(|| TemplateError::MissingKey { key: key.clone(), line: *line })?;
                    output.push_str(&value);
                }
                Segment::Helper { name, line } => {
                    let value = helpers.call(name).ok_or_else(|| TemplateError::UnknownHelper {
                        name: name.clone(),
                        line: *line,
                    })?;
                    output.push_str(&value);
                }
            }
        }

        Ok(output)
    }
}

fn parse_action(body: &str, line: usize) -> std::result::Result<Segment, TemplateError> {
    let action = body.trim();
    if action.is_empty() {
        return Err(TemplateError::syntax(line, "missing value for command"));
    }

    if let Some(key) = action.strip_prefix('.') {
        if !is_identifier(key) {
            return Err(TemplateError::syntax(line, format!("bad field reference {action:?}")));
        }
        return Ok(Segment::Field { key: key.to_string(), line });
    }

    if !is_identifier(action) {
        return Err(TemplateError::syntax(line, format!("unexpected {action:?} in command")));
    }
    Ok(Segment::Helper { name: action.to_string(), line })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

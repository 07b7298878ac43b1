//! Per-language string catalogs.
//!
//! Catalogs are YAML mappings of `key: "template"`. A line-based
//! `key = value` form is also accepted for hand-edited overrides.
//! Templates may contain `{name}` placeholders; `{{` and `}}` are literal braces.

use std::collections::HashMap;

use thiserror::Error;

use crate::label::{ArgValue, Message};

const MAX_CATALOG_ENTRIES: usize = 10_000;
const MAX_KEY_BYTES: usize = 128;
const MAX_VALUE_BYTES: usize = 16 * 1024;
const MAX_EXPANDED_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum CatalogParseError {
    #[error("yaml catalog error: {0}")]
    Yaml(String),

    #[error("catalog syntax error at line {line}: {msg}")]
    Syntax { line: usize, msg: String },
}

/// One language's `key -> template` table.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Whether `key` has a usable (non-empty) template.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some_and(|s| !s.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Parse a YAML mapping, or the `key = value` line format when the
    /// source does not look like YAML.
    pub fn parse(src: &str) -> Result<Self, CatalogParseError> {
        match serde_yaml::from_str::<serde_yaml::Value>(src) {
            Ok(serde_yaml::Value::Mapping(map)) => Self::from_yaml(map),
            Ok(_) => Self::parse_lines(src),
            Err(e) if looks_like_yaml(src) => {
                Err(CatalogParseError::Yaml(format!("yaml parse error: {e}")))
            }
            Err(_) => Self::parse_lines(src),
        }
    }

    fn from_yaml(map: serde_yaml::Mapping) -> Result<Self, CatalogParseError> {
        if map.len() > MAX_CATALOG_ENTRIES {
            return Err(CatalogParseError::Yaml(format!(
                "too many entries (max {MAX_CATALOG_ENTRIES})"
            )));
        }
        let mut cat = Self::new();
        for (k, v) in map {
            let Some(key) = k.as_str() else {
                return Err(CatalogParseError::Yaml("keys must be strings".to_string()));
            };
            check_key(key).map_err(CatalogParseError::Yaml)?;
            let Some(value) = v.as_str() else {
                return Err(CatalogParseError::Yaml(format!(
                    "value for key `{key}` must be a string"
                )));
            };
            check_value(key, value).map_err(CatalogParseError::Yaml)?;
            cat.insert(key, value);
        }
        Ok(cat)
    }

    fn parse_lines(src: &str) -> Result<Self, CatalogParseError> {
        let mut cat = Self::new();
        for (idx, raw) in src.lines().enumerate() {
            let syntax = |msg: String| CatalogParseError::Syntax {
                line: idx + 1,
                msg,
            };

            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(syntax("expected `key = value`".to_string()));
            };
            let key = key.trim();
            check_key(key).map_err(syntax)?;

            let mut value = value.trim();
            if let Some(pos) = value.find(" #") {
                value = value[..pos].trim_end();
            }
            let value = unquote(value).map_err(syntax)?;
            check_value(key, &value).map_err(syntax)?;

            if cat.len() >= MAX_CATALOG_ENTRIES && !cat.entries.contains_key(key) {
                return Err(syntax(format!(
                    "too many entries (max {MAX_CATALOG_ENTRIES})"
                )));
            }
            cat.insert(key, value);
        }
        Ok(cat)
    }

    /// Render `msg` from this catalog, or `None` when the key is absent or
    /// its template is empty.
    pub fn format_message(&self, msg: &Message) -> Option<String> {
        let template = self.get(&msg.id).filter(|s| !s.is_empty())?;
        Some(apply_placeholders(template, &msg.args))
    }
}

fn looks_like_yaml(src: &str) -> bool {
    let Some(first) = src
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))
    else {
        return false;
    };
    match (first.find(':'), first.find('=')) {
        (Some(colon), Some(eq)) => colon < eq,
        (Some(_), None) => true,
        _ => false,
    }
}

fn check_key(key: &str) -> Result<(), String> {
    let mut chars = key.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-');
    if !valid {
        return Err(format!(
            "invalid key `{key}` (allowed: [A-Za-z0-9][A-Za-z0-9_.-]*)"
        ));
    }
    if key.len() > MAX_KEY_BYTES {
        return Err(format!("key `{key}` is too long (max {MAX_KEY_BYTES} bytes)"));
    }
    Ok(())
}

fn check_value(key: &str, value: &str) -> Result<(), String> {
    if value.len() > MAX_VALUE_BYTES {
        return Err(format!(
            "value for key `{key}` is too long (max {MAX_VALUE_BYTES} bytes)"
        ));
    }
    Ok(())
}

fn unquote(s: &str) -> Result<String, String> {
    let quoted = s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')));
    if !quoted {
        return Ok(s.to_string());
    }

    let inner = &s[1..s.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => return Err("dangling escape".to_string()),
        }
    }
    Ok(out)
}

fn render_arg(value: &ArgValue) -> String {
    match value {
        ArgValue::Str(s) => s.clone(),
        ArgValue::Int(i) => i.to_string(),
        ArgValue::Float(f) => {
            let mut s = f.to_string();
            if s.contains('.') {
                let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
                s.truncate(trimmed);
            }
            s
        }
    }
}

/// Replace `{name}` tokens with argument values.
///
/// Unknown placeholders stay visible, an unclosed `{` is literal text, and
/// output is capped at `MAX_EXPANDED_BYTES`.
fn apply_placeholders<K: AsRef<str>>(template: &str, args: &[(K, ArgValue)]) -> String {
    if !template.contains(['{', '}']) {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len().min(MAX_EXPANDED_BYTES));
    let mut rest = template;
    while let Some(c) = rest.chars().next() {
        let piece: String;
        match c {
            '{' if rest.starts_with("{{") => {
                piece = "{".to_string();
                rest = &rest[2..];
            }
            '}' if rest.starts_with("}}") => {
                piece = "}".to_string();
                rest = &rest[2..];
            }
            '{' => match rest[1..].find('}') {
                Some(end) => {
                    let name = rest[1..1 + end].trim();
                    piece = args
                        .iter()
                        .find(|(k, _)| k.as_ref() == name)
                        .map(|(_, v)| render_arg(v))
                        .unwrap_or_else(|| format!("{{{name}}}"));
                    rest = &rest[end + 2..];
                }
                None => {
                    piece = rest.to_string();
                    rest = "";
                }
            },
            _ => {
                piece = c.to_string();
                rest = &rest[c.len_utf8()..];
            }
        }

        if push_limited(&mut out, &piece) {
            break;
        }
    }
    out
}

/// Append as much of `s` as fits; returns `true` once the cap is reached.
fn push_limited(out: &mut String, s: &str) -> bool {
    let remaining = MAX_EXPANDED_BYTES.saturating_sub(out.len());
    if s.len() <= remaining {
        out.push_str(s);
        return out.len() >= MAX_EXPANDED_BYTES;
    }
    let mut end = remaining;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    out.push_str(&s[..end]);
    true
}

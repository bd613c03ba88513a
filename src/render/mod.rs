//! Editor page rendering.
//!
//! The page is static markup plus [`EDITOR_SCRIPT`]. The only server-provided
//! data is the document itself, embedded as a JSON data block with every
//! character that could close the block escaped.

use serde_json::{Map, Number, Value};

/// Client-side editor. Reads the `config-data` block and posts to `/publish`.
pub const EDITOR_SCRIPT: &str = include_str!("editor.js");

const PAGE_TITLE: &str = "Config Editor";

/// Render the editor page for `document`.
pub fn render(document: &Map<String, Value>) -> String {
    let data = embed_json(document);
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{PAGE_TITLE}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
.row {{ display: flex; gap: 0.5rem; margin-bottom: 0.5rem; }}
.row .key, .row .value {{ flex: 1; }}
header {{ display: flex; justify-content: space-between; align-items: center; }}
</style>
</head>
<body>
<header><h1>{PAGE_TITLE}</h1><a href="/logout">Log out</a></header>
<div id="rows"></div>
<p>
<button type="button" id="add">Add row</button>
<button type="button" id="publish">Publish</button>
<span id="status" role="status"></span>
</p>
<script type="application/json" id="config-data">{data}</script>
<script>
{EDITOR_SCRIPT}</script>
</body>
</html>
"#
    )
}

/// Serialize `document` so it can sit inside a `<script>` element.
pub fn embed_json(document: &Map<String, Value>) -> String {
    let raw = Value::Object(document.clone()).to_string();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Number,
    Boolean,
}

/// One editor row as the client holds it: key, type tag and raw input text.
///
/// `rows_from_document` and `document_from_rows` restate the rules in
/// `editor.js` so they can be tested here. They do not run the script, and
/// changes to one must be made to the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorRow {
    pub key: String,
    pub value_type: ValueType,
    pub input: String,
}

impl EditorRow {
    pub fn new(key: impl Into<String>, value_type: ValueType, input: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value_type,
            input: input.into(),
        }
    }
}

/// Rows the client builds on load, one per top-level key.
pub fn rows_from_document(document: &Map<String, Value>) -> Vec<EditorRow> {
    document
        .iter()
        .map(|(key, value)| match value {
            Value::Bool(b) => EditorRow::new(key, ValueType::Boolean, b.to_string()),
            Value::Number(n) => EditorRow::new(key, ValueType::Number, n.to_string()),
            Value::String(s) => EditorRow::new(key, ValueType::String, s.as_str()),
            Value::Null => EditorRow::new(key, ValueType::String, ""),
            other => EditorRow::new(key, ValueType::String, other.to_string()),
        })
        .collect()
}

/// Document the client posts on publish.
///
/// Rows with an empty key are dropped; number rows with empty or
/// unparsable input become `null`; a repeated key keeps the last value.
pub fn document_from_rows(rows: &[EditorRow]) -> Map<String, Value> {
    let mut document = Map::new();
    for row in rows {
        let key = row.key.trim();
        if key.is_empty() {
            continue;
        }
        let value = match row.value_type {
            ValueType::Boolean => Value::Bool(row.input == "true"),
            ValueType::Number => parse_number(&row.input).map_or(Value::Null, Value::Number),
            ValueType::String => Value::String(row.input.clone()),
        };
        document.insert(key.to_string(), value);
    }
    document
}

fn parse_number(input: &str) -> Option<Number> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(i) = input.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = input.parse::<u64>() {
        return Some(Number::from(u));
    }
    input.parse::<f64>().ok().and_then(Number::from_f64)
}

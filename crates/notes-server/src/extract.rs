//! Request body extraction for JSON and URL-encoded form submissions.

use std::collections::BTreeMap;

use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Request body as a JSON object, whatever encoding the client used.
///
/// - `application/json`: must be an object; an array or an empty body counts
///   as an empty object.
/// - `application/x-www-form-urlencoded`: bracketed keys nest. `a[b]=x` gives
///   an object, `a[0]=x` and `a[]=x` give arrays, and a repeated key collects
///   its values into an array.
/// - Anything else, including no body: an empty object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteBody(pub Map<String, Value>);

impl NoteBody {
    /// Deserialize the body into a typed input.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| ApiError::MalformedBody(format!("Invalid request body: {}", e)))
    }
}

/// Kinds of body the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(content_type: Option<&str>) -> BodyKind {
    let Some(content_type) = content_type else {
        return BodyKind::Other;
    };
    let essence = content_type.split(';').next().unwrap_or("").trim();

    if essence.eq_ignore_ascii_case("application/json") {
        BodyKind::Json
    } else if essence.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

impl<S> FromRequest<S> for NoteBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = body_kind(
            req.headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );

        match kind {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;
                if bytes.is_empty() {
                    return Ok(Self::default());
                }
                let value = serde_json::from_slice::<Value>(&bytes).map_err(|e| {
                    ApiError::MalformedBody(format!(
                        "Failed to parse the request body as JSON: {}",
                        e
                    ))
                })?;
                json_body(value)
            }
            BodyKind::Form => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;
                Ok(form_body(pairs))
            }
            BodyKind::Other => Ok(Self::default()),
        }
    }
}

fn json_body(value: Value) -> Result<NoteBody, ApiError> {
    match value {
        Value::Object(map) => Ok(NoteBody(map)),
        Value::Array(_) => Ok(NoteBody::default()),
        _ => Err(ApiError::MalformedBody(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

// ============================================================================
// Form decoding
// ============================================================================

/// Bracket groups after this many are kept as one literal key.
const MAX_KEY_DEPTH: usize = 5;

/// Larger indices are object keys rather than array positions.
const MAX_ARRAY_INDEX: usize = 20;

/// One bracket group of a form key.
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeySegment {
    /// `[]`
    Push,
    /// `[3]`
    Index(usize),
    /// `[name]`
    Key(String),
}

/// Split `title[en][0]` into `title` and its bracket segments.
///
/// A key without a well-formed bracket group after its root is used as-is.
fn split_key(key: &str) -> (String, Vec<KeySegment>) {
    let root_end = match key.find('[') {
        Some(0) | None => return (key.to_string(), Vec::new()),
        Some(i) => i,
    };

    let mut segments = Vec::new();
    let mut rest = &key[root_end..];

    while segments.len() < MAX_KEY_DEPTH && rest.starts_with('[') {
        let Some(close) = rest.find(']') else {
            break;
        };
        let inner = &rest[1..close];
        if inner.contains('[') {
            break;
        }
        segments.push(key_segment(inner));
        rest = &rest[close + 1..];
    }

    if segments.is_empty() {
        return (key.to_string(), segments);
    }
    if !rest.is_empty() {
        segments.push(KeySegment::Key(rest.to_string()));
    }

    (key[..root_end].to_string(), segments)
}

fn key_segment(inner: &str) -> KeySegment {
    if inner.is_empty() {
        return KeySegment::Push;
    }
    match inner.parse::<usize>() {
        Ok(index) if index <= MAX_ARRAY_INDEX && index.to_string() == inner => {
            KeySegment::Index(index)
        }
        _ => KeySegment::Key(inner.to_string()),
    }
}

/// Decoded form value before it becomes JSON.
#[derive(Debug)]
enum FormNode {
    Text(String),
    List(Vec<FormNode>),
    Indexed(BTreeMap<usize, FormNode>),
    Object(Vec<(String, FormNode)>),
}

impl FormNode {
    fn from_segments(segments: &[KeySegment], value: String) -> Self {
        let Some((segment, rest)) = segments.split_first() else {
            return Self::Text(value);
        };
        let child = Self::from_segments(rest, value);
        match segment {
            KeySegment::Push => Self::List(vec![child]),
            KeySegment::Index(index) => Self::Indexed(BTreeMap::from([(*index, child)])),
            KeySegment::Key(name) => Self::Object(vec![(name.clone(), child)]),
        }
    }

    /// Fold a later value for the same key into this one.
    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Object(mut fields), Self::Object(incoming)) => {
                for (name, node) in incoming {
                    insert_field(&mut fields, name, node);
                }
                Self::Object(fields)
            }
            (Self::Indexed(mut slots), Self::Indexed(incoming)) => {
                for (index, node) in incoming {
                    let merged = match slots.remove(&index) {
                        Some(existing) => existing.merge(node),
                        None => node,
                    };
                    slots.insert(index, merged);
                }
                Self::Indexed(slots)
            }
            (current, incoming) => {
                let mut items = current.into_items();
                items.extend(incoming.into_items());
                Self::List(items)
            }
        }
    }

    fn into_items(self) -> Vec<FormNode> {
        match self {
            Self::List(items) => items,
            Self::Indexed(slots) => slots.into_values().collect(),
            other => vec![other],
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Text(text) => Value::String(text),
            Self::List(items) => Value::Array(items.into_iter().map(Self::into_value).collect()),
            Self::Indexed(slots) => {
                Value::Array(slots.into_values().map(Self::into_value).collect())
            }
            Self::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(name, node)| (name, node.into_value()))
                    .collect(),
            ),
        }
    }
}

fn insert_field(fields: &mut Vec<(String, FormNode)>, name: String, node: FormNode) {
    match fields.iter().position(|(existing, _)| *existing == name) {
        Some(pos) => {
            let (_, current) = fields.remove(pos);
            fields.insert(pos, (name, current.merge(node)));
        }
        None => fields.push((name, node)),
    }
}

fn form_body(pairs: Vec<(String, String)>) -> NoteBody {
    let mut fields = Vec::new();

    for (key, value) in pairs {
        let (root, segments) = split_key(&key);
        insert_field(&mut fields, root, FormNode::from_segments(&segments, value));
    }

    match FormNode::Object(fields).into_value() {
        Value::Object(map) => NoteBody(map),
        _ => NoteBody::default(),
    }
}

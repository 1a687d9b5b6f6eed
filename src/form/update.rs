// src/form/update.rs
//! Pure path operations over a form document.
//!
//! Every operation copies its input and returns the updated tree. Missing
//! intermediate containers are created on the way down; the kind of container
//! (array or object) is picked from the segment that follows. When a path
//! implies an array where an object (or scalar) sits, or the reverse, the old
//! value is replaced by an empty container of the right kind. That loss is
//! intentional: no merge is attempted.

use serde_json::{Map, Value};
use tracing::debug;

use super::path::{FormPath, Segment, MAX_INDEX};

/// Write `value` at `path`, auto-vivifying intermediate containers.
///
/// An empty path replaces the whole document.
pub fn set_at_path(document: &Value, path: &FormPath, value: Value) -> Value {
    let Some((last, parents)) = path.segments().split_last() else {
        return value;
    };

    let mut root = working_copy(document);
    let cursor = descend(&mut root, parents, last);
    *slot_mut(cursor, last) = value;
    root
}

/// Remove the field at `path`.
///
/// Keys are removed from their object; array slots become `null` holes so
/// sibling indices do not shift. Nothing is created: a missing intermediate
/// leaves the document as it was.
pub fn clear_at_path(document: &Value, path: &FormPath) -> Value {
    let Some((last, parents)) = path.segments().split_last() else {
        return Value::Object(Map::new());
    };

    let mut root = document.clone();
    remove_in_place(&mut root, parents, last);
    root
}

/// Look up the node at `path`, if every step exists with the right kind.
pub fn read_at_path<'a>(document: &'a Value, path: &FormPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(document, |cursor, segment| match segment {
            Segment::Index(index) => cursor.as_array()?.get(*index),
            Segment::Key(key) => cursor.as_object()?.get(key),
        })
}

/// Add `value` to the array at `path` if absent, otherwise remove its first
/// occurrence. A non-array field is replaced by an empty array first.
///
/// An empty path names no field; the document comes back unchanged.
pub fn toggle_array_member(document: &Value, path: &FormPath, value: Value) -> Value {
    let segments = path.segments();
    if segments.is_empty() {
        debug!("Ignoring toggle of {} on the document root", value);
        return document.clone();
    }

    let mut root = working_copy(document);

    let mut cursor = &mut root;
    for (i, segment) in segments.iter().enumerate() {
        cursor = match segments.get(i + 1) {
            Some(next) => step_into(cursor, segment, next),
            None => slot_mut(cursor, segment),
        };
    }

    let members = ensure_array(cursor);
    match members.iter().position(|member| *member == value) {
        Some(position) => {
            members.remove(position);
        }
        None => members.push(value),
    }
    root
}

fn working_copy(document: &Value) -> Value {
    match document {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    }
}

fn descend<'a>(root: &'a mut Value, parents: &[Segment], last: &Segment) -> &'a mut Value {
    let mut cursor = root;
    for (i, segment) in parents.iter().enumerate() {
        let next = parents.get(i + 1).unwrap_or(last);
        cursor = step_into(cursor, segment, next);
    }
    cursor
}

/// Move into `segment`, filling an empty slot with the container `next` needs.
fn step_into<'a>(cursor: &'a mut Value, segment: &Segment, next: &Segment) -> &'a mut Value {
    let slot = slot_mut(cursor, segment);
    if slot.is_null() {
        *slot = empty_container_for(next);
    }
    slot
}

/// The slot addressed by `segment`, coercing `cursor` to the matching
/// container kind and padding arrays with `null` up to the index.
fn slot_mut<'a>(cursor: &'a mut Value, segment: &Segment) -> &'a mut Value {
    match segment {
        Segment::Index(index) if *index <= MAX_INDEX => {
            let items = ensure_array(cursor);
            if items.len() <= *index {
                items.resize(*index + 1, Value::Null);
            }
            &mut items[*index]
        }
        Segment::Index(index) => object_slot(cursor, index.to_string()),
        Segment::Key(key) => object_slot(cursor, key.clone()),
    }
}

fn object_slot(cursor: &mut Value, key: String) -> &mut Value {
    ensure_object(cursor).entry(key).or_insert(Value::Null)
}

fn empty_container_for(next: &Segment) -> Value {
    if next.is_index() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn ensure_array(value: &mut Value) -> &mut Vec<Value> {
    if !value.is_array() {
        if !value.is_null() {
            debug!("Replacing {} with an empty array", kind_name(value));
        }
        *value = Value::Array(Vec::new());
    }
    match value {
        Value::Array(items) => items,
        _ => unreachable!("value was just coerced to an array"),
    }
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        if !value.is_null() {
            debug!("Replacing {} with an empty object", kind_name(value));
        }
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just coerced to an object"),
    }
}

fn remove_in_place(root: &mut Value, parents: &[Segment], last: &Segment) {
    let mut cursor = root;
    for segment in parents {
        let next = match segment {
            Segment::Index(index) => cursor.as_array_mut().and_then(|items| items.get_mut(*index)),
            Segment::Key(key) => cursor.as_object_mut().and_then(|map| map.get_mut(key)),
        };
        cursor = match next {
            Some(next) => next,
            None => return,
        };
    }

    match last {
        Segment::Key(key) => {
            if let Some(map) = cursor.as_object_mut() {
                map.remove(key);
            }
        }
        Segment::Index(index) => {
            if let Some(slot) = cursor.as_array_mut().and_then(|items| items.get_mut(*index)) {
                *slot = Value::Null;
            }
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

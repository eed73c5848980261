//! Dotted-path edits over theme documents
//!
//! Every edit returns a new document. Containers on the path from the root to
//! the edited leaf are shallow-copied; everything else is shared with the
//! input by reference.

use std::sync::Arc;

use crate::constants::path::SEPARATOR;
use crate::tree::{Fields, Node, array_index};

/// Split a dotted path into segments. The empty path has no segments.
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split(SEPARATOR).collect()
    }
}

/// Value at `path`, if every segment resolves
pub fn get_at_path<'a>(document: &'a Node, path: &str) -> Option<&'a Node> {
    split_path(path)
        .into_iter()
        .try_fold(document, |node, segment| node.child(segment))
}

/// Return a copy of `document` with the value at `path` replaced by `value`.
///
/// Missing intermediate containers (and scalars sitting where a container is
/// needed) are replaced by empty objects. Arrays take decimal indices; the
/// index one past the end appends. The empty path returns `document` as is.
pub fn set_at_path(document: &Node, path: &str, value: Node) -> Node {
    let segments = split_path(path);
    if segments.is_empty() {
        return document.clone();
    }
    set_segments(document, &segments, value)
}

fn set_segments(node: &Node, segments: &[&str], value: Node) -> Node {
    let Some((head, rest)) = segments.split_first() else {
        return value;
    };

    let child = if rest.is_empty() {
        value
    } else {
        match node.child(head) {
            Some(existing) if existing.is_container() => set_segments(existing, rest, value),
            _ => set_segments(&Node::object(), rest, value),
        }
    };

    with_child(node, head, child)
}

/// Shallow copy of `node` with `segment` bound to `child`
fn with_child(node: &Node, segment: &str, child: Node) -> Node {
    match node {
        Node::Object(fields) => {
            let mut fields = Fields::clone(fields);
            fields.insert(segment.to_string(), child);
            Node::Object(Arc::new(fields))
        }
        Node::Array(items) => match array_index(segment) {
            Some(index) if index < items.len() => {
                let mut items = Vec::clone(items);
                items[index] = child;
                Node::Array(Arc::new(items))
            }
            Some(index) if index == items.len() => {
                let mut items = Vec::clone(items);
                items.push(child);
                Node::Array(Arc::new(items))
            }
            // Not addressable as an index: re-key the list as an object.
            _ => {
                let mut fields: Fields = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), item.clone()))
                    .collect();
                fields.insert(segment.to_string(), child);
                Node::Object(Arc::new(fields))
            }
        },
        _ => Node::from_fields([(segment, child)]),
    }
}

/// Return a copy of `document` without the value at `path`.
///
/// Removing from an array shifts later items down. If the path does not
/// resolve, `document` is returned unchanged (same allocation).
pub fn remove_at_path(document: &Node, path: &str) -> Node {
    let segments = split_path(path);
    if segments.is_empty() {
        return document.clone();
    }
    remove_segments(document, &segments).unwrap_or_else(|| document.clone())
}

fn remove_segments(node: &Node, segments: &[&str]) -> Option<Node> {
    let (head, rest) = segments.split_first()?;

    if rest.is_empty() {
        return match node {
            Node::Object(fields) if fields.contains_key(*head) => {
                let mut fields = Fields::clone(fields);
                fields.remove(*head);
                Some(Node::Object(Arc::new(fields)))
            }
            Node::Array(items) => {
                let index = array_index(head).filter(|i| *i < items.len())?;
                let mut items = Vec::clone(items);
                items.remove(index);
                Some(Node::Array(Arc::new(items)))
            }
            _ => None,
        };
    }

    let updated = remove_segments(node.child(head)?, rest)?;
    Some(with_child(node, head, updated))
}

//! Deep merge of a raw document over a default instance

use std::sync::Arc;

use crate::tree::Node;

/// Merge `raw` over `defaults`.
///
/// Objects merge key by key, arrays in `raw` replace the default list, `null`
/// in `raw` keeps the default, and any other value in `raw` wins. A
/// non-object `raw` where the default is an object keeps the default.
pub fn merge_defaults(defaults: &Node, raw: &Node) -> Node {
    match (defaults, raw) {
        (_, Node::Null) => defaults.clone(),
        (Node::Object(base), Node::Object(overlay)) => {
            if overlay.is_empty() {
                return defaults.clone();
            }
            let mut fields = base.as_ref().clone();
            for (key, value) in overlay.iter() {
                let merged = match fields.get(key) {
                    Some(default) => merge_defaults(default, value),
                    None => value.clone(),
                };
                fields.insert(key.clone(), merged);
            }
            Node::Object(Arc::new(fields))
        }
        (Node::Object(_), _) => defaults.clone(),
        _ => raw.clone(),
    }
}

//! Identifier extraction from syntax trees.

use crate::parser::{NodeKind, SyntaxTree};

use super::types::{Identifier, IdentifierKind};

/// Collect identifiers of `kind` from `tree` in pre-order.
///
/// Names are lower-cased and dunder names (`__init__`, `____`) dropped.
/// A missing tree (the file failed to parse) yields nothing.
pub fn extract(tree: Option<&SyntaxTree>, kind: IdentifierKind) -> Vec<Identifier> {
    let Some(tree) = tree else {
        return Vec::new();
    };

    tree.walk()
        .filter_map(|node| match (&node.kind, kind) {
            (NodeKind::FunctionDef { name }, IdentifierKind::Functions) => Some(name),
            (NodeKind::NameRef { id }, IdentifierKind::Variables) => Some(id),
            _ => None,
        })
        .map(|name| name.to_lowercase())
        .filter(|name| !is_dunder(name))
        .map(|name| Identifier::new(name, kind))
        .collect()
}

fn is_dunder(name: &str) -> bool {
    name.starts_with("__") && name.ends_with("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> SyntaxTree {
        let mut tree = SyntaxTree::new();
        let class = tree.push(None, NodeKind::Other);
        let init = tree.push(
            Some(class),
            NodeKind::FunctionDef {
                name: "__init__".to_string(),
            },
        );
        tree.push(
            Some(init),
            NodeKind::NameRef {
                id: "Self".to_string(),
            },
        );
        tree.push(
            Some(class),
            NodeKind::FunctionDef {
                name: "Get_User_Name".to_string(),
            },
        );
        tree.push(
            None,
            NodeKind::NameRef {
                id: "__name__".to_string(),
            },
        );
        tree.push(
            None,
            NodeKind::NameRef {
                id: "user_id".to_string(),
            },
        );
        tree
    }

    fn names(ids: Vec<Identifier>) -> Vec<String> {
        ids.into_iter().map(|i| i.name).collect()
    }

    #[test]
    fn test_extract_functions() {
        let tree = sample_tree();
        let ids = extract(Some(&tree), IdentifierKind::Functions);
        assert!(ids.iter().all(|i| i.kind == IdentifierKind::Functions));
        assert_eq!(names(ids), vec!["get_user_name"]);
    }

    #[test]
    fn test_extract_variables() {
        let tree = sample_tree();
        let ids = extract(Some(&tree), IdentifierKind::Variables);
        assert_eq!(names(ids), vec!["self", "user_id"]);
    }

    #[test]
    fn test_extract_none_tree() {
        assert!(extract(None, IdentifierKind::Functions).is_empty());
        assert!(extract(None, IdentifierKind::Variables).is_empty());
    }

    #[test]
    fn test_is_dunder() {
        assert!(is_dunder("__init__"));
        assert!(is_dunder("____"));
        assert!(is_dunder("___"));
        assert!(!is_dunder("__private"));
        assert!(!is_dunder("trailing__"));
    }
}

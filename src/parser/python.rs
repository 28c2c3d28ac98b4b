//! Python syntax trees via tree-sitter.
//!
//! The concrete tree-sitter tree is lowered into a `SyntaxTree` where every
//! plain `def` becomes `NodeKind::FunctionDef` and every identifier that
//! stands for a bare name value becomes `NodeKind::NameRef`. Coroutines
//! (`async def`) are not function definitions here.

use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use super::{NodeId, NodeKind, ParseFailure, SyntaxTree, SyntaxTreeBuilder};

/// Parents under which an `identifier` names a parameter, not a value.
const PARAMETER_KINDS: &[&str] = &["parameters", "lambda_parameters", "typed_parameter"];

/// Handler clauses whose `as` target is a bound name, not a value.
const EXCEPT_KINDS: &[&str] = &["except_clause", "except_group_clause"];

/// Tree-sitter backed builder for `.py` files.
pub struct PythonTreeBuilder {
    language: Language,
}

impl Default for PythonTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonTreeBuilder {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Result<Parser, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| format!("loading python grammar: {}", e))?;
        Ok(parser)
    }
}

impl SyntaxTreeBuilder for PythonTreeBuilder {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn parse(&self, path: &Path, source: &str) -> Result<SyntaxTree, ParseFailure> {
        let mut parser = self
            .create_parser()
            .map_err(|msg| ParseFailure::new(path, msg, 0, 0))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseFailure::new(path, "parser produced no tree", 0, 0))?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, column) = first_error(root)
                .map(|n| {
                    let pos = n.start_position();
                    (pos.row + 1, pos.column + 1)
                })
                .unwrap_or((0, 0));
            return Err(ParseFailure::new(path, "invalid syntax", line, column));
        }

        Ok(lower(&tree, source.as_bytes()))
    }
}

/// Find the first `ERROR` or `MISSING` node in pre-order.
fn first_error(root: Node) -> Option<Node> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Lower a tree-sitter tree into a `SyntaxTree`, keeping named nodes only.
///
/// Walks with a `TreeCursor` instead of recursion.
fn lower(tree: &Tree, source: &[u8]) -> SyntaxTree {
    let mut out = SyntaxTree::new();
    let mut cursor = tree.walk();
    // One entry per cursor depth; `None` for anonymous tokens.
    let mut ancestors: Vec<Option<NodeId>> = Vec::new();

    'walk: loop {
        let node = cursor.node();
        let id = if node.is_named() {
            let parent = ancestors.iter().rev().find_map(|a| *a);
            let kind = node_kind(node, cursor.field_name(), source);
            Some(out.push(parent, kind))
        } else {
            None
        };

        if cursor.goto_first_child() {
            ancestors.push(id);
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                continue 'walk;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
            ancestors.pop();
        }
    }

    out
}

/// Decide the typed kind of a named tree-sitter node.
fn node_kind(node: Node, field: Option<&str>, source: &[u8]) -> NodeKind {
    match node.kind() {
        "function_definition" if is_async(node) => NodeKind::Other,
        "function_definition" => match node.child_by_field_name("name") {
            Some(name) => NodeKind::FunctionDef {
                name: text(name, source),
            },
            None => NodeKind::Other,
        },
        "identifier" if is_name_reference(node, field) => NodeKind::NameRef {
            id: text(node, source),
        },
        _ => NodeKind::Other,
    }
}

/// Whether an `identifier` node is a bare name used as a value.
///
/// Excludes definition names, attribute names, keyword argument names,
/// parameters, import paths, `except ... as` targets and `global`/`nonlocal`
/// declarations.
fn is_name_reference(node: Node, field: Option<&str>) -> bool {
    let parent = match node.parent() {
        Some(p) => p,
        None => return true,
    };

    match (parent.kind(), field) {
        ("function_definition", Some("name")) | ("class_definition", Some("name")) => false,
        ("attribute", Some("attribute")) => false,
        ("keyword_argument", Some("name")) => false,
        ("default_parameter", Some("name")) | ("typed_default_parameter", Some("name")) => false,
        ("aliased_import", Some("alias")) => false,
        ("dotted_name", _) => false,
        ("global_statement", _) | ("nonlocal_statement", _) => false,
        ("as_pattern_target", _) => !parent
            .parent()
            .and_then(|pattern| pattern.parent())
            .map(|clause| EXCEPT_KINDS.contains(&clause.kind()))
            .unwrap_or(false),
        (kind, _) if EXCEPT_KINDS.contains(&kind) => !node
            .prev_sibling()
            .map(|prev| matches!(prev.kind(), "as" | ","))
            .unwrap_or(false),
        (kind, _) if PARAMETER_KINDS.contains(&kind) => false,
        ("list_splat_pattern", _) | ("dictionary_splat_pattern", _) => !parent
            .parent()
            .map(|gp| PARAMETER_KINDS.contains(&gp.kind()))
            .unwrap_or(false),
        _ => true,
    }
}

/// Whether a `function_definition` starts with the `async` keyword.
fn is_async(node: Node) -> bool {
    node.child(0).map(|first| first.kind() == "async").unwrap_or(false)
}

fn text(node: Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SyntaxTree {
        PythonTreeBuilder::new()
            .parse(Path::new("test.py"), source)
            .expect("should parse")
    }

    fn function_names(tree: &SyntaxTree) -> Vec<String> {
        tree.walk()
            .filter_map(|n| match &n.kind {
                NodeKind::FunctionDef { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    fn name_refs(tree: &SyntaxTree) -> Vec<String> {
        tree.walk()
            .filter_map(|n| match &n.kind {
                NodeKind::NameRef { id } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_python_function_definitions() {
        let tree = parse(
            r#"
def get_user():
    pass

class Repo:
    def __init__(self):
        pass

    async def fetch_all(self):
        def inner():
            pass
        return inner
"#,
        );

        // The coroutine itself is skipped, the plain def nested in it is not
        assert_eq!(function_names(&tree), vec!["get_user", "__init__", "inner"]);
    }

    #[test]
    fn test_python_async_def_is_not_a_definition() {
        let tree = parse("async def fetch_all():\n    pass\n\ndef get_x():\n    pass\n");
        assert_eq!(function_names(&tree), vec!["get_x"]);
    }

    #[test]
    fn test_python_lambda_is_not_a_definition() {
        let tree = parse("handler = lambda event: event\n");
        assert!(function_names(&tree).is_empty());
    }

    #[test]
    fn test_python_name_references() {
        let tree = parse(
            r#"
user_name = load(path)
show(user_name)
del user_name
"#,
        );

        assert_eq!(
            name_refs(&tree),
            vec!["user_name", "load", "path", "show", "user_name", "user_name"]
        );
    }

    #[test]
    fn test_python_non_reference_identifiers() {
        let tree = parse(
            r#"
import os.path
from collections import OrderedDict as od

def run(first, second=1, *args, third: int = 2, **kwargs):
    global counter
    obj.attr = first
    call(key=second)

class Widget:
    pass
"#,
        );

        let refs = name_refs(&tree);
        // Imports, parameters, definition names, attribute and keyword names are not references
        for absent in ["os", "path", "collections", "od", "run", "args", "third", "kwargs", "counter", "attr", "key", "Widget"] {
            assert!(!refs.contains(&absent.to_string()), "unexpected reference {}", absent);
        }
        // Values used in the body are
        for present in ["obj", "first", "call", "second", "int"] {
            assert!(refs.contains(&present.to_string()), "missing reference {}", present);
        }
    }

    #[test]
    fn test_python_except_target_is_not_reference() {
        let tree = parse(
            r#"
try:
    pass
except ValueError as err:
    pass
"#,
        );
        assert_eq!(name_refs(&tree), vec!["ValueError"]);
    }

    #[test]
    fn test_python_legacy_except_target_is_not_reference() {
        let tree = parse("try:\n    pass\nexcept KeyError, err:\n    pass\n");
        assert_eq!(name_refs(&tree), vec!["KeyError"]);
    }

    #[test]
    fn test_python_with_target_is_reference() {
        let tree = parse("with open(path) as handle:\n    pass\n");
        assert_eq!(name_refs(&tree), vec!["open", "path", "handle"]);
    }

    #[test]
    fn test_python_star_target_is_reference() {
        let tree = parse("first, *rest = items\n");
        assert_eq!(name_refs(&tree), vec!["first", "rest", "items"]);
    }

    #[test]
    fn test_python_syntax_error() {
        let failure = PythonTreeBuilder::new()
            .parse(Path::new("broken.py"), "def broken(:\n    pass\n")
            .unwrap_err();

        assert_eq!(failure.path, "broken.py");
        assert_eq!(failure.message, "invalid syntax");
        assert_eq!(failure.line, 1);
    }

    #[test]
    fn test_python2_statements_parse() {
        let builder = PythonTreeBuilder::new();
        assert!(builder.parse(Path::new("legacy.py"), "print 'hello'\n").is_ok());
        assert!(builder.parse(Path::new("legacy.py"), "exec code\n").is_ok());
    }

    #[test]
    fn test_python_empty_source() {
        let tree = parse("");
        assert!(function_names(&tree).is_empty());
        assert!(name_refs(&tree).is_empty());
    }
}

//! Source parsing into a typed syntax tree.
//!
//! This module provides:
//! - `SyntaxTree`: an owned tree of typed nodes (function definitions, name
//!   references, everything else)
//! - `SyntaxTreeBuilder` trait: reads a file and parses it into a `SyntaxTree`
//! - `python`: the tree-sitter backed builder for Python sources

use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod python;

pub use python::PythonTreeBuilder;

/// Index of a node inside its `SyntaxTree`.
pub type NodeId = usize;

/// What a syntax node is, as far as identifier extraction cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A function definition and its declared name.
    FunctionDef { name: String },
    /// A bare name used as a value: read, assigned or deleted.
    NameRef { id: String },
    /// Any other node.
    Other,
}

/// A node in a `SyntaxTree`.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    children: Vec<NodeId>,
}

impl SyntaxNode {
    /// Child node ids in source order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// An owned syntax tree stored as an arena of nodes.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    roots: Vec<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node under `parent` (or as a root) and return its id.
    pub fn push(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SyntaxNode {
            kind,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node in pre-order.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }
}

/// Pre-order iterator over a `SyntaxTree`.
///
/// Uses an explicit stack so deeply nested expressions cannot overflow.
pub struct Walk<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id];
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}

/// A file whose content could not be turned into a syntax tree.
///
/// Recovered per file: the scan logs it and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} ({path}, line {line}, column {column})")]
pub struct ParseFailure {
    pub path: String,
    pub message: String,
    /// Line number (1-indexed), 0 when unknown
    pub line: usize,
    /// Column number (1-indexed), 0 when unknown
    pub column: usize,
}

impl ParseFailure {
    pub fn new(path: &Path, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            path: path.to_string_lossy().to_string(),
            message: message.into(),
            line,
            column,
        }
    }
}

/// Errors from building a syntax tree for a file.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The file could not be read. Not recoverable per file.
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file was read but did not parse.
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

/// Parses source files of one language into `SyntaxTree`s.
pub trait SyntaxTreeBuilder: Send + Sync {
    /// File extensions this builder handles, without the dot.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse source text into a tree.
    fn parse(&self, path: &Path, source: &str) -> Result<SyntaxTree, ParseFailure>;

    /// Read a file fully and parse it.
    ///
    /// Content that is not valid UTF-8 is reported as a `ParseFailure`.
    fn build(&self, path: &Path) -> Result<SyntaxTree, BuildError> {
        let bytes = std::fs::read(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = String::from_utf8(bytes).map_err(|e| {
            ParseFailure::new(
                path,
                format!("file is not valid UTF-8 (byte {})", e.utf8_error().valid_up_to()),
                0,
                0,
            )
        })?;
        Ok(self.parse(path, &source)?)
    }
}

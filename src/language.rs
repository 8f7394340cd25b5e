//! Source-language knowledge, kept behind two narrow seams:
//!
//! - [`SourceKind`] classifies paths (source file or test file).
//! - [`DeclarationParser`] turns source text into top-level declaration spans.
//!
//! The correlation core only sees line spans, so another language needs a
//! new `SourceKind` and parser and nothing else.

use tree_sitter::{Language as TsLanguage, Node, Parser};

/// Path rules for one source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceKind {
    /// Extension of source files, including the dot.
    pub extension: &'static str,
    /// Suffix that marks a test file.
    pub test_suffix: &'static str,
}

/// Go: `.go` sources, `_test.go` tests.
pub const GO: SourceKind = SourceKind {
    extension: ".go",
    test_suffix: "_test.go",
};

impl SourceKind {
    #[must_use]
    pub fn is_source_file(&self, path: &str) -> bool {
        path.ends_with(self.extension)
    }

    /// Test code is not part of the new-code coverage goal.
    #[must_use]
    pub fn is_test_file(&self, path: &str) -> bool {
        path.ends_with(self.test_suffix)
    }
}

/// 1-indexed line span of a declaration, as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationSpan {
    pub start_line: u32,
    pub end_line: u32,
}

/// The source could not be parsed into reliable declaration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error near line {line}")]
pub struct SyntaxError {
    pub line: u32,
}

/// Source text in, top-level function/method spans out.
pub trait DeclarationParser: Sync {
    fn declaration_spans(&self, source: &str) -> Result<Vec<DeclarationSpan>, SyntaxError>;
}

/// Go declaration parser backed by tree-sitter-go.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoParser;

const GO_FUNCTION_KINDS: &[&str] = &["function_declaration", "method_declaration"];

impl DeclarationParser for GoParser {
    fn declaration_spans(&self, source: &str) -> Result<Vec<DeclarationSpan>, SyntaxError> {
        // `Parser` is not `Sync`; one per call.
        let mut parser = Parser::new();
        let language: TsLanguage = tree_sitter_go::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|_| SyntaxError { line: 0 })?;

        let tree = parser
            .parse(source, None)
            .ok_or(SyntaxError { line: 0 })?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(SyntaxError {
                line: first_error_line(root),
            });
        }

        let mut cursor = root.walk();
        let spans = root
            .named_children(&mut cursor)
            .filter(|node| GO_FUNCTION_KINDS.contains(&node.kind()))
            .map(|node| DeclarationSpan {
                start_line: node_line(node.start_position().row),
                end_line: node_line(node.end_position().row),
            })
            .collect();
        Ok(spans)
    }
}

fn node_line(row: usize) -> u32 {
    u32::try_from(row + 1).unwrap_or(u32::MAX)
}

/// Line of the first error or missing node, depth first.
fn first_error_line(node: Node<'_>) -> u32 {
    if node.is_error() || node.is_missing() {
        return node_line(node.start_position().row);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .find(|child| child.has_error())
        .map_or_else(|| node_line(node.start_position().row), first_error_line)
}

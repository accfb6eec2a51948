//! Parse tree produced by [`crate::parser::parse`].
//!
//! Nodes live in a flat [`Arena`] and reference each other by index rather
//! than by pointer, so the tree can be built with the two-stack
//! shunting-yard construction described in [`crate::parser`] without
//! introducing an owned pointer graph.

use std::ops::Index;

/// Index of a node inside an [`Arena`].
pub type AstRef = usize;

/// A single parse-tree node. Composite variants reference their children by
/// [`AstRef`] into the same [`Arena`] they were built in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    /// The empty match.
    Epsilon,
    /// A literal byte, including the target of a `\<byte>` escape.
    Character { ch: u8 },
    /// `.` — any byte except NUL.
    AnyCharacter,
    /// `[...]`. `from`/`to` is a half-open slice into the original pattern
    /// string naming the (not yet expanded) class body, exclusive of the
    /// enclosing brackets.
    CharacterClass { from: usize, to: usize },
    /// `[^...]`, same slicing convention as `CharacterClass`.
    CharacterClassNegated { from: usize, to: usize },
    /// Two sub-expressions in sequence.
    Concatenation { left: AstRef, right: AstRef },
    /// Two alternatives.
    Alternation { left: AstRef, right: AstRef },
    /// A bounded or unbounded repetition. `nmax == -1` means unbounded.
    Quantifier {
        quantified: AstRef,
        nmin: u32,
        nmax: i64,
        greedy: bool,
    },
    /// `^` — zero-width assertion for the start of input.
    AnchorBegin,
    /// `$` — zero-width assertion for the end of input.
    AnchorEnd,
    /// `(...)`. Capture numbering is assigned later, by the compiler, in
    /// left-to-right order of appearance.
    Capture { captured: AstRef },
}

/// Flat storage for an [`AstNode`] tree, plus the node considered the root
/// of the parsed expression.
///
/// The arena is a plain `Vec`; nodes are never freed individually and the
/// whole tree is dropped together once [`crate::compiler::compile`] is done
/// with it (Rust's ownership model makes the C original's explicit
/// `parse_free` unnecessary — see `DESIGN.md`).
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<AstNode>,
    root: AstRef,
}

impl Ast {
    pub(crate) fn new(nodes: Vec<AstNode>, root: AstRef) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> AstRef {
        self.root
    }

    pub fn get(&self, r: AstRef) -> &AstNode {
        &self.nodes[r]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A one-line, fully parenthesized textual dump of the tree rooted at
    /// `r`, in the style of `original_source/tests/cli.c`'s `printNode`.
    /// This is a read-only diagnostic collaborator: it never feeds back
    /// into parsing or compilation.
    pub fn debug_tree(&self, pattern: &str, r: AstRef) -> String {
        let mut out = String::new();
        self.write_tree(pattern, r, &mut out);
        out
    }

    fn write_tree(&self, pattern: &str, r: AstRef, out: &mut String) {
        use std::fmt::Write;
        match *self.get(r) {
            AstNode::Epsilon => out.push_str("epsilon"),
            AstNode::Character { ch } => {
                if ch.is_ascii_graphic() || ch == b' ' {
                    let _ = write!(out, "character('{}')", ch as char);
                } else {
                    let _ = write!(out, "character({:02x})", ch);
                }
            }
            AstNode::AnyCharacter => out.push_str("any_character"),
            AstNode::CharacterClass { from, to } => {
                let _ = write!(out, "character_class(\"{}\")", &pattern[from..to]);
            }
            AstNode::CharacterClassNegated { from, to } => {
                let _ = write!(
                    out,
                    "character_class_negated(\"{}\")",
                    &pattern[from..to]
                );
            }
            AstNode::Concatenation { left, right } => {
                out.push_str("concatenation(");
                self.write_tree(pattern, left, out);
                out.push_str(", ");
                self.write_tree(pattern, right, out);
                out.push(')');
            }
            AstNode::Alternation { left, right } => {
                out.push_str("alternation(");
                self.write_tree(pattern, left, out);
                out.push_str(", ");
                self.write_tree(pattern, right, out);
                out.push(')');
            }
            AstNode::Quantifier {
                quantified,
                nmin,
                nmax,
                greedy,
            } => {
                out.push_str("quantifier(");
                self.write_tree(pattern, quantified, out);
                let _ = write!(
                    out,
                    ", {}, {}, {})",
                    nmin,
                    nmax,
                    if greedy { "greedy" } else { "non_greedy" }
                );
            }
            AstNode::AnchorBegin => out.push_str("anchor_begin"),
            AstNode::AnchorEnd => out.push_str("anchor_end"),
            AstNode::Capture { captured } => {
                out.push_str("capture(");
                self.write_tree(pattern, captured, out);
                out.push(')');
            }
        }
    }

    /// Whether the node rooted at `r` is anchored at its left edge: every
    /// leftmost path through the tree must pass through `AnchorBegin`
    /// before consuming a byte. Used by the compiler to decide whether the
    /// implicit `.*?` prefix is needed.
    pub(crate) fn is_anchored(&self, r: AstRef) -> bool {
        match *self.get(r) {
            AstNode::AnchorBegin => true,
            AstNode::Concatenation { left, .. } => self.is_anchored(left),
            AstNode::Alternation { left, right } => {
                self.is_anchored(left) && self.is_anchored(right)
            }
            AstNode::Quantifier { quantified, .. } => self.is_anchored(quantified),
            AstNode::Capture { captured } => self.is_anchored(captured),
            _ => false,
        }
    }
}

impl Index<AstRef> for Ast {
    type Output = AstNode;

    fn index(&self, index: AstRef) -> &Self::Output {
        &self.nodes[index]
    }
}

/// Upper bound on the number of nodes a parse of `pattern` can require:
/// every byte of the pattern can push at most one working-stack node and
/// every reduction consumes into the output stack, so `2 * len` slots
/// always suffice (mirrors `cregex_parse`'s `parse_estimate_nodes`).
pub(crate) fn estimate_nodes(pattern: &str) -> usize {
    2 * pattern.len()
}

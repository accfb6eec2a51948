//! Graphviz DOT export, for both the parse tree and the compiled program.
//!
//! The AST half is grounded directly in `original_source/tests/re2dot.c`'s
//! `printNode`/`printDot`: same node shapes and styles per variant, with
//! `node<id>` labels built from this crate's [`AstRef`] arena indices
//! instead of the C original's raw pointer addresses (there are no pointers
//! here to print). The program half has no counterpart in `re2dot.c` (which
//! only dots the AST) — it's a natural extension once a [`Program`]'s edges
//! are already modeled as plain instruction indices, and it is the view
//! most useful when a quantifier or alternation has been miscompiled.

use std::fmt::Write;

use crate::ast::{Ast, AstNode, AstRef};
use crate::program::{Instruction, Program};

/// Dumps the tree rooted at `r` as a Graphviz digraph.
pub fn ast_to_dot(ast: &Ast, pattern: &str, r: AstRef) -> String {
    let mut out = String::new();
    out.push_str("digraph threx_ast {\n");
    write_ast_node(ast, pattern, r, &mut out);
    out.push_str("}\n");
    out
}

fn write_ast_node(ast: &Ast, pattern: &str, r: AstRef, out: &mut String) {
    match *ast.get(r) {
        AstNode::Epsilon => {
            let _ = writeln!(
                out,
                "node{r}[label=\"\u{3b5}\",shape=box,fontname=\"times-italic\"];"
            );
        }
        AstNode::Character { ch } => {
            let label = if ch.is_ascii_graphic() || ch == b' ' {
                format!("'{}'", ch as char)
            } else {
                format!("'\\x{ch:02x}'")
            };
            let _ = writeln!(
                out,
                "node{r}[color=lightblue2,style=filled,label=\"{label}\",shape=box,fontname=\"courier\"];"
            );
        }
        AstNode::AnyCharacter => {
            let _ = writeln!(
                out,
                "node{r}[label=\"any\",shape=box,fontname=\"times-italic\"];"
            );
        }
        AstNode::CharacterClass { from, to } => {
            let _ = writeln!(
                out,
                "node{r}[label=\"[{}]\",shape=box,fontname=\"courier\"];",
                &pattern[from..to]
            );
        }
        AstNode::CharacterClassNegated { from, to } => {
            let _ = writeln!(
                out,
                "node{r}[label=\"[^{}]\",shape=box,fontname=\"courier\"];",
                &pattern[from..to]
            );
        }
        AstNode::Concatenation { left, right } => {
            let _ = writeln!(
                out,
                "node{r}[label=\"concatenation\",shape=box,style=\"rounded\",fontname=\"times-italic\"];"
            );
            write_ast_node(ast, pattern, left, out);
            let _ = writeln!(out, "node{r}->node{left};");
            write_ast_node(ast, pattern, right, out);
            let _ = writeln!(out, "node{r}->node{right};");
        }
        AstNode::Alternation { left, right } => {
            let _ = writeln!(
                out,
                "node{r}[label=\"alternation\",shape=diamond,style=\"rounded\",fontname=\"times-italic\"];"
            );
            write_ast_node(ast, pattern, left, out);
            let _ = writeln!(out, "node{r}->node{left};");
            write_ast_node(ast, pattern, right, out);
            let _ = writeln!(out, "node{r}->node{right};");
        }
        AstNode::Quantifier {
            quantified,
            nmin,
            nmax,
            greedy,
        } => {
            let max_label = if nmax == -1 {
                "INF".to_string()
            } else {
                nmax.to_string()
            };
            let style = if greedy { "" } else { ",style=\"dotted\"" };
            let _ = writeln!(
                out,
                "node{r}[label=\"{nmin}..{max_label}\",shape=ellipse{style}];"
            );
            write_ast_node(ast, pattern, quantified, out);
            let _ = writeln!(out, "node{r}->node{quantified};");
        }
        AstNode::AnchorBegin => {
            let _ = writeln!(out, "node{r}[label=\"^\",shape=circle];");
        }
        AstNode::AnchorEnd => {
            let _ = writeln!(out, "node{r}[label=\"$\",shape=circle];");
        }
        AstNode::Capture { captured } => {
            let _ = writeln!(
                out,
                "node{r}[label=\"capture\",shape=parallelogram,style=\"rounded\",fontname=\"times-italic\"];"
            );
            write_ast_node(ast, pattern, captured, out);
            let _ = writeln!(out, "node{r}->node{captured};");
        }
    }
}

/// Dumps the compiled program as an explicit state graph: one node per
/// instruction, edges for `pc+1` fallthrough, `Jump`, and `Split`.
pub fn program_to_dot(program: &Program) -> String {
    let mut out = String::new();
    out.push_str("digraph threx_program {\n");
    for (pc, instruction) in program.instructions().iter().enumerate() {
        let label = instruction_label(instruction);
        let shape = match instruction {
            Instruction::Match => "doublecircle",
            Instruction::Split { .. } => "diamond",
            Instruction::Jump { .. } => "box",
            _ => "ellipse",
        };
        let _ = writeln!(out, "pc{pc}[label=\"{label}\",shape={shape}];");
        match instruction {
            Instruction::Jump { target } => {
                let _ = writeln!(out, "pc{pc}->pc{target};");
            }
            Instruction::Split { first, second } => {
                let _ = writeln!(out, "pc{pc}->pc{first}[label=\"first\"];");
                let _ = writeln!(out, "pc{pc}->pc{second}[label=\"second\"];");
            }
            Instruction::Match => {}
            _ => {
                let _ = writeln!(out, "pc{pc}->pc{};", pc + 1);
            }
        }
    }
    out.push_str("}\n");
    out
}

fn instruction_label(instruction: &Instruction) -> String {
    match instruction {
        Instruction::Match => "match".to_string(),
        Instruction::Char(ch) if ch.is_ascii_graphic() || *ch == b' ' => {
            format!("'{}'", *ch as char)
        }
        Instruction::Char(ch) => format!("\\\\x{ch:02x}"),
        Instruction::AnyChar => "any".to_string(),
        Instruction::Class(_) => "class".to_string(),
        Instruction::ClassNegated(_) => "class_negated".to_string(),
        Instruction::Jump { .. } => "jump".to_string(),
        Instruction::Split { .. } => "split".to_string(),
        Instruction::AssertBegin => "^".to_string(),
        Instruction::AssertEnd => "$".to_string(),
        Instruction::Save { slot } => format!("save {slot}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::parser::parse;

    #[test]
    fn ast_dot_wraps_in_a_digraph() {
        let pattern = "a|b";
        let ast = parse(pattern).unwrap();
        let dot = ast_to_dot(&ast, pattern, ast.root());
        assert!(dot.starts_with("digraph threx_ast {\n"));
        assert!(dot.trim_end().ends_with('}'));
        assert!(dot.contains("alternation"));
    }

    #[test]
    fn program_dot_has_one_node_per_instruction() {
        let pattern = "ab";
        let ast = parse(pattern).unwrap();
        let program = compile(&ast, pattern).unwrap();
        let dot = program_to_dot(&program);
        for pc in 0..program.len() {
            assert!(dot.contains(&format!("pc{pc}[")));
        }
    }
}

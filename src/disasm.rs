//! Textual disassembly of a compiled [`Program`].
//!
//! One instruction per line, `[pc] OPCODE operands`, with jump/split targets
//! resolved to their own `[pc]` and character classes rendered as a
//! `printable-or-hex` run list. Grounded directly in
//! `original_source/tests/cli.c`'s `printProgram`/`printInstruction`/
//! `printCharacterClass` — this crate's only addition is returning a
//! `String` instead of writing to a `FILE*`.

use std::fmt::Write;

use crate::charclass::CharClass;
use crate::program::{Instruction, Program};

impl Program {
    /// A disassembly listing of every instruction, one per line.
    pub fn disassemble(&self) -> String {
        disassemble(self)
    }
}

pub fn disassemble(program: &Program) -> String {
    let mut out = String::new();
    for (pc, instruction) in program.instructions().iter().enumerate() {
        write_instruction(&mut out, pc, instruction);
    }
    out
}

fn write_instruction(out: &mut String, pc: usize, instruction: &Instruction) {
    let _ = write!(out, "[{pc:04x}] ");
    match instruction {
        Instruction::Match => {
            out.push_str("MATCH\n");
        }
        Instruction::Char(ch) => {
            if ch.is_ascii_graphic() || *ch == b' ' {
                let _ = writeln!(out, "CHAR {}", *ch as char);
            } else {
                let _ = writeln!(out, "CHAR {ch:02x}");
            }
        }
        Instruction::AnyChar => {
            out.push_str("ANY_CHAR\n");
        }
        Instruction::Class(class) => {
            out.push_str("CHARACTER_CLASS [");
            write_class_ranges(out, class);
            out.push_str("]\n");
        }
        Instruction::ClassNegated(class) => {
            out.push_str("CHARACTER_CLASS_NEGATED [^");
            write_class_ranges(out, class);
            out.push_str("]\n");
        }
        Instruction::Jump { target } => {
            let _ = writeln!(out, "JUMP {target:04x}");
        }
        Instruction::Split { first, second } => {
            let _ = writeln!(out, "SPLIT {first:04x} {second:04x}");
        }
        Instruction::AssertBegin => {
            out.push_str("ASSERT_BEGIN\n");
        }
        Instruction::AssertEnd => {
            out.push_str("ASSERT_END\n");
        }
        Instruction::Save { slot } => {
            let _ = writeln!(out, "SAVE {slot}");
        }
    }
}

/// Renders a class's members as a run-length list (`a-z0-9_`-style),
/// matching `printCharacterClass`'s behavior of only collapsing a run into
/// a `from-to` range once it spans at least 3 bytes.
fn write_class_ranges(out: &mut String, class: &CharClass) {
    let mut ch: u16 = 0;
    while ch <= u8::MAX as u16 {
        let byte = ch as u8;
        if class.contains(byte) {
            push_printable_or_hex(out, byte);
            let mut to = ch + 1;
            while to <= u8::MAX as u16 && class.contains(to as u8) {
                to += 1;
            }
            if to > ch + 2 {
                out.push('-');
                push_printable_or_hex(out, (to - 1) as u8);
                ch = to;
                continue;
            }
        }
        ch += 1;
    }
}

fn push_printable_or_hex(out: &mut String, ch: u8) {
    if ch.is_ascii_graphic() || ch == b' ' {
        out.push(ch as char);
    } else {
        let _ = write!(out, "{ch:02x}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::parser::parse;

    #[test]
    fn alternation_disassembly_has_one_line_per_instruction() {
        let ast = parse("^(a|b)").unwrap();
        let program = compile(&ast, "^(a|b)").unwrap();
        let listing = program.disassemble();
        assert_eq!(listing.lines().count(), program.len());
        assert!(listing.contains("SPLIT"));
        assert!(listing.contains("MATCH"));
    }

    #[test]
    fn character_class_renders_as_bracketed_run_list() {
        let ast = parse("[a-z]").unwrap();
        let program = compile(&ast, "[a-z]").unwrap();
        let listing = program.disassemble();
        assert!(listing.contains("CHARACTER_CLASS [a-z]"));
    }

    #[test]
    fn negated_class_keeps_its_caret() {
        let ast = parse("[^0-9]").unwrap();
        let program = compile(&ast, "[^0-9]").unwrap();
        let listing = program.disassemble();
        assert!(listing.contains("CHARACTER_CLASS_NEGATED [^0-9]"));
    }

    #[test]
    fn non_printable_byte_is_rendered_as_hex() {
        let ast = parse("\x01").unwrap();
        let program = compile(&ast, "\x01").unwrap();
        let listing = program.disassemble();
        assert!(listing.contains("CHAR 01"));
    }
}

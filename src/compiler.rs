//! Lowers an [`Ast`] to a flat [`Program`].
//!
//! Two passes: [`estimate_instructions`] computes a static upper bound on
//! program size by recursion over the tree (so the instruction buffer is
//! allocated exactly once, up front), then [`Compiler::emit_node`] performs
//! the actual emission, using an emit-now/patch-later strategy for forward
//! references (`Split`/`Jump` targets that don't exist yet). Both mirror
//! `original_source/src/compile.c`'s `cregex_compileCountInstructions` and
//! `compile_context` respectively.

use crate::ast::{Ast, AstNode, AstRef};
use crate::charclass::expand_class;
use crate::error::CompileError;
use crate::parser::class_body;
use crate::program::{Instruction, Program};

/// Compile a parsed pattern to a [`Program`].
///
/// `pattern` must be the exact string `ast` was parsed from — the compiler
/// re-slices it to expand character-class bodies that the parser left
/// uncompiled (see [`crate::ast::AstNode::CharacterClass`]).
pub fn compile(ast: &Ast, pattern: &str) -> Result<Program, CompileError> {
    let root = ast.root();
    let anchored = ast.is_anchored(root);
    let budget = estimate_instructions(ast, root) + if anchored { 0 } else { 3 } + 2 + 1;

    let mut compiler = Compiler {
        pattern,
        instructions: Vec::with_capacity(budget),
        ncaptures: 0,
    };

    if !anchored {
        compiler.emit_unanchored_prefix();
    }

    let slot = compiler.ncaptures;
    compiler.ncaptures += 1;
    compiler.emit(Instruction::Save { slot: slot * 2 });
    compiler.emit_node(ast, root);
    compiler.emit(Instruction::Save { slot: slot * 2 + 1 });
    compiler.emit(Instruction::Match);

    if compiler.instructions.len() > budget {
        return Err(CompileError::InstructionBudgetExceeded);
    }

    Ok(Program {
        instructions: compiler.instructions.into_boxed_slice(),
        ncaptures: compiler.ncaptures,
    })
}

/// Parse then compile in one step.
pub fn compile_pattern(pattern: &str) -> Result<Program, crate::error::EngineError> {
    let ast = crate::parser::parse(pattern)?;
    Ok(compile(&ast, pattern)?)
}

/// Upper bound on the number of instructions needed to compile the subtree
/// rooted at `r`, per spec section 4.2's recursion. Does not include the
/// fixed `.*?`/save/match overhead added by [`compile`].
fn estimate_instructions(ast: &Ast, r: AstRef) -> usize {
    match *ast.get(r) {
        AstNode::Epsilon => 0,
        AstNode::Character { .. }
        | AstNode::AnyCharacter
        | AstNode::CharacterClass { .. }
        | AstNode::CharacterClassNegated { .. } => 1,
        AstNode::Concatenation { left, right } => {
            estimate_instructions(ast, left) + estimate_instructions(ast, right)
        }
        AstNode::Alternation { left, right } => {
            2 + estimate_instructions(ast, left) + estimate_instructions(ast, right)
        }
        AstNode::Quantifier {
            quantified,
            nmin,
            nmax,
            ..
        } => {
            let child = estimate_instructions(ast, quantified) as i64;
            let nmin = nmin as i64;
            if nmax >= nmin {
                (nmin * child + (nmax - nmin) * (child + 1)) as usize
            } else {
                // unbounded (`nmax == -1`)
                (1 + if nmin > 0 { nmin * child } else { child + 1 }) as usize
            }
        }
        AstNode::AnchorBegin | AstNode::AnchorEnd => 1,
        AstNode::Capture { captured } => 2 + estimate_instructions(ast, captured),
    }
}

struct Compiler<'p> {
    pattern: &'p str,
    instructions: Vec<Instruction>,
    ncaptures: usize,
}

impl<'p> Compiler<'p> {
    fn current_pc(&self) -> usize {
        self.instructions.len()
    }

    fn emit(&mut self, instruction: Instruction) -> usize {
        self.instructions.push(instruction);
        self.instructions.len() - 1
    }

    /// Prepends a non-greedy `.*?` loop, reducing unanchored submatch search
    /// to anchored matching at a single starting position (spec section
    /// 4.2, "Implicit wrapping").
    fn emit_unanchored_prefix(&mut self) {
        let split_pc = self.emit(Instruction::Split { first: 0, second: 0 });
        let body_entry = self.current_pc();
        self.emit(Instruction::AnyChar);
        self.emit(Instruction::Jump { target: split_pc });
        let after = self.current_pc();
        // non-greedy: prefer leaving the loop over consuming another byte.
        self.instructions[split_pc] = Instruction::Split {
            first: after,
            second: body_entry,
        };
    }

    fn emit_node(&mut self, ast: &Ast, r: AstRef) {
        match *ast.get(r) {
            AstNode::Epsilon => {}
            AstNode::Character { ch } => {
                self.emit(Instruction::Char(ch));
            }
            AstNode::AnyCharacter => {
                self.emit(Instruction::AnyChar);
            }
            AstNode::CharacterClass { from, to } => {
                let class = expand_class(class_body(self.pattern, from, to));
                self.emit(Instruction::Class(class));
            }
            AstNode::CharacterClassNegated { from, to } => {
                let class = expand_class(class_body(self.pattern, from, to));
                self.emit(Instruction::ClassNegated(class));
            }
            AstNode::Concatenation { left, right } => {
                self.emit_node(ast, left);
                self.emit_node(ast, right);
            }
            AstNode::Alternation { left, right } => {
                let split_pc = self.emit(Instruction::Split { first: 0, second: 0 });
                let left_entry = self.current_pc();
                self.emit_node(ast, left);
                let jump_pc = self.emit(Instruction::Jump { target: 0 });
                let right_entry = self.current_pc();
                self.emit_node(ast, right);
                let after = self.current_pc();
                self.instructions[split_pc] = Instruction::Split {
                    first: left_entry,
                    second: right_entry,
                };
                self.instructions[jump_pc] = Instruction::Jump { target: after };
            }
            AstNode::Quantifier {
                quantified,
                nmin,
                nmax,
                greedy,
            } => self.emit_quantifier(ast, quantified, nmin, nmax, greedy),
            AstNode::AnchorBegin => {
                self.emit(Instruction::AssertBegin);
            }
            AstNode::AnchorEnd => {
                self.emit(Instruction::AssertEnd);
            }
            AstNode::Capture { captured } => {
                let slot = self.ncaptures;
                self.ncaptures += 1;
                self.emit(Instruction::Save { slot: slot * 2 });
                self.emit_node(ast, captured);
                self.emit(Instruction::Save { slot: slot * 2 + 1 });
            }
        }
    }

    fn emit_quantifier(
        &mut self,
        ast: &Ast,
        quantified: AstRef,
        nmin: u32,
        nmax: i64,
        greedy: bool,
    ) {
        let ncaptures_start = self.ncaptures;
        let mut last_iter_entry = None;

        for i in 0..nmin {
            self.ncaptures = ncaptures_start;
            if i == nmin - 1 {
                last_iter_entry = Some(self.current_pc());
            }
            self.emit_node(ast, quantified);
        }

        if nmax > nmin as i64 {
            for _ in 0..(nmax - nmin as i64) {
                self.ncaptures = ncaptures_start;
                let split_pc = self.emit(Instruction::Split { first: 0, second: 0 });
                let child_entry = self.current_pc();
                self.emit_node(ast, quantified);
                let after = self.current_pc();
                self.instructions[split_pc] = Self::split(child_entry, after, greedy);
            }
        } else if nmax == -1 {
            if nmin == 0 {
                let split_pc = self.emit(Instruction::Split { first: 0, second: 0 });
                let body_entry = self.current_pc();
                self.emit_node(ast, quantified);
                self.emit(Instruction::Jump { target: split_pc });
                let after = self.current_pc();
                self.instructions[split_pc] = Self::split(body_entry, after, greedy);
            } else {
                let last = last_iter_entry.expect("nmin > 0 emits at least one copy");
                let after = self.current_pc();
                self.emit(Self::split(last, after, greedy));
            }
        }
    }

    /// `Split{first, second}` in greedy order, swapped for non-greedy so
    /// the preferred (tried-first) branch is the one that leaves the loop.
    fn split(enter: usize, exit: usize, greedy: bool) -> Instruction {
        if greedy {
            Instruction::Split {
                first: enter,
                second: exit,
            }
        } else {
            Instruction::Split {
                first: exit,
                second: enter,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn compile_str(pattern: &str) -> Program {
        let ast = parse(pattern).unwrap();
        compile(&ast, pattern).unwrap()
    }

    #[test]
    fn anchored_alternation_skips_the_unanchored_prefix() {
        // `^(a|b)` is anchored, so no implicit `.*?` prefix is added: just
        // Save0, AssertBegin, Split, Char a, Jump, Char b, Save1, Match.
        let program = compile_str("^(a|b)");
        let kinds: Vec<&str> = program
            .instructions()
            .iter()
            .map(|i| match i {
                Instruction::Save { .. } => "Save",
                Instruction::Split { .. } => "Split",
                Instruction::Char(_) => "Char",
                Instruction::Jump { .. } => "Jump",
                Instruction::Match => "Match",
                Instruction::AssertBegin => "AssertBegin",
                _ => "Other",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "Save",
                "AssertBegin",
                "Split",
                "Char",
                "Jump",
                "Char",
                "Save",
                "Match"
            ]
        );
    }

    #[test]
    fn unanchored_pattern_gets_lazy_star_prefix() {
        let program = compile_str("a");
        assert!(matches!(
            program.instructions()[0],
            Instruction::Split { .. }
        ));
        assert!(matches!(
            program.instructions()[1],
            Instruction::AnyChar
        ));
    }

    #[test]
    fn every_jump_and_split_target_is_in_bounds() {
        let program = compile_str("(a|bb){0,3}c*x+[a-z]{2,4}");
        let len = program.len();
        for instr in program.instructions() {
            match instr {
                Instruction::Jump { target } => assert!(*target <= len),
                Instruction::Split { first, second } => {
                    assert!(*first <= len);
                    assert!(*second <= len);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn exactly_one_match_at_the_end() {
        let program = compile_str("a(b|c)*d?");
        let match_count = program
            .instructions()
            .iter()
            .filter(|i| matches!(i, Instruction::Match))
            .count();
        assert_eq!(match_count, 1);
        assert!(matches!(
            program.instructions().last().unwrap(),
            Instruction::Match
        ));
    }

    #[test]
    fn repeated_capture_reuses_the_same_slot() {
        // `(a|b)+` should allocate exactly one capture slot pair for group 1,
        // used by every loop iteration (spec: "last iteration wins").
        let program = compile_str("(a|b)+");
        assert_eq!(program.ncaptures(), 2); // group 0 (whole match) + group 1
        let save_slots: Vec<usize> = program
            .instructions()
            .iter()
            .filter_map(|i| match i {
                Instruction::Save { slot } => Some(*slot),
                _ => None,
            })
            .collect();
        assert!(save_slots.contains(&2));
        assert!(save_slots.contains(&3));
    }

    #[test]
    fn instruction_count_never_exceeds_estimate() {
        for pattern in [
            "a", "a*", "a+", "a?", "a{2,5}", "a{3}", "(a|b|c)", "^abc$", "[a-z]+",
        ] {
            let ast = parse(pattern).unwrap();
            let root = ast.root();
            let anchored = ast.is_anchored(root);
            let budget =
                estimate_instructions(&ast, root) + if anchored { 0 } else { 3 } + 2 + 1;
            let program = compile(&ast, pattern).unwrap();
            assert!(program.len() <= budget, "pattern {pattern:?} exceeded budget");
        }
    }
}

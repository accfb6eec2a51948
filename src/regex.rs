//! Types and the public API for matching compiled patterns against input.
//!
//! Where the teacher's own `regex.rs` dispatches across several engine
//! backends through a `RegexImpl` trait and an engine-selection enum, this
//! crate ships exactly one engine (the Pike VM in [`crate::vm`]), so
//! `Regex` owns its [`Program`] directly instead of going through that
//! dispatch layer.

use crate::compiler::compile_pattern;
use crate::error::EngineError;
use crate::program::Program;
use crate::util::{Captures, Input, Match, Span};
use crate::vm::{run, run_with_state, RunResult, VmState};

/// A compiled regular expression.
pub struct Regex {
    program: Program,
}

impl Regex {
    /// Parses and compiles `pattern`.
    pub fn compile(pattern: &str) -> Result<Self, EngineError> {
        Ok(Self {
            program: compile_pattern(pattern)?,
        })
    }

    /// Number of capture groups, including the implicit whole-match group 0.
    pub fn capture_count(&self) -> usize {
        self.program.ncaptures()
    }

    /// The disassembly of the compiled program, one instruction per line.
    pub fn disassemble(&self) -> String {
        self.program.disassemble()
    }

    /// Returns true whenever the input matches the regex, without computing
    /// the bounds of the match. Equivalent to `find(input).is_some()`, but
    /// skips allocating a capture buffer.
    pub fn is_match<'s>(&self, input: impl Into<Input<'s>>) -> bool {
        let input = input.into();
        if !input.valid() {
            return false;
        }
        let subject = &input.subject[input.span.from..input.span.to];
        matches!(run(&self.program, subject, &mut []), RunResult::Match)
    }

    /// Matches the regex against the input and returns the bounds of the
    /// match, or `None`.
    pub fn find<'s>(&self, input: impl Into<Input<'s>>) -> Option<Match<'s>> {
        let input = input.into();
        let subject = input.subject;
        let mut spans = [Span::invalid(); 1];
        if !self.search(&input, &mut spans) {
            return None;
        }
        Some(Match::new(subject, spans[0]))
    }

    /// Matches the regex against the input and returns a match with every
    /// capture group's bounds, or `None`. If only the overall match is
    /// needed, prefer [`Regex::find`] — it skips the capture buffer.
    pub fn find_captures<'s>(&self, input: impl Into<Input<'s>>) -> Option<Captures<'s>> {
        let input = input.into();
        let subject = input.subject;
        let mut spans = vec![Span::invalid(); self.capture_count()].into_boxed_slice();
        if !self.search(&input, &mut spans) {
            return None;
        }
        Some(Captures::new(subject, spans))
    }

    /// Returns an iterator over all non-overlapping matches in the input.
    pub fn find_all<'r, 's>(&'r self, input: impl Into<Input<'s>>) -> FindAll<'r, 's> {
        FindAll {
            regex: self,
            input: input.into(),
            state: VmState::new(&self.program),
        }
    }

    /// Returns an iterator over all non-overlapping matches in the input,
    /// with their capture group bounds. If only the overall match is
    /// needed, prefer [`Regex::find_all`] — it can be faster.
    pub fn find_all_captures<'r, 's>(
        &'r self,
        input: impl Into<Input<'s>>,
    ) -> FindAllCaptures<'r, 's> {
        FindAllCaptures {
            regex: self,
            input: input.into(),
            state: VmState::new(&self.program),
        }
    }

    /// Matches within `input.span`, then rebases any resulting spans back
    /// onto `input.subject` (the VM only ever sees the sliced bytes).
    fn search(&self, input: &Input<'_>, spans: &mut [Span]) -> bool {
        if !input.valid() {
            return false;
        }
        let sliced = &input.subject[input.span.from..input.span.to];
        let matched = matches!(run(&self.program, sliced, spans), RunResult::Match);
        if matched {
            rebase(spans, input.span.from);
        }
        matched
    }

    fn search_with_state(&self, input: &Input<'_>, spans: &mut [Span], state: &mut VmState) -> bool {
        if !input.valid() {
            return false;
        }
        let sliced = &input.subject[input.span.from..input.span.to];
        let matched = matches!(
            run_with_state(&self.program, sliced, spans, state),
            RunResult::Match
        );
        if matched {
            rebase(spans, input.span.from);
        }
        matched
    }
}

fn rebase(spans: &mut [Span], offset: usize) {
    for span in spans.iter_mut() {
        if !span.is_invalid() {
            span.from += offset;
            span.to += offset;
        }
    }
}

/// Iterator over all matches in a regex. Built by [`Regex::find_all`].
pub struct FindAll<'r, 's> {
    regex: &'r Regex,
    input: Input<'s>,
    state: VmState,
}

impl<'r, 's> Iterator for FindAll<'r, 's> {
    type Item = Match<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.input.valid() {
            return None;
        }
        let subject = self.input.subject;
        let mut spans = [Span::invalid(); 1];
        if !self
            .regex
            .search_with_state(&self.input, &mut spans, &mut self.state)
        {
            return None;
        }
        let result = Match::new(subject, spans[0]);
        self.input.span.from = result.next_match_start();
        Some(result)
    }
}

/// Iterator over all matches and their capture groups. Built by
/// [`Regex::find_all_captures`].
pub struct FindAllCaptures<'r, 's> {
    regex: &'r Regex,
    input: Input<'s>,
    state: VmState,
}

impl<'r, 's> Iterator for FindAllCaptures<'r, 's> {
    type Item = Captures<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.input.valid() {
            return None;
        }
        let subject = self.input.subject;
        let mut spans = vec![Span::invalid(); self.regex.capture_count()].into_boxed_slice();
        if !self
            .regex
            .search_with_state(&self.input, &mut spans, &mut self.state)
        {
            return None;
        }
        let result = Captures::new(subject, spans);
        self.input.span.from = result.group0().next_match_start();
        Some(result)
    }
}

//! # threx
//!
//! **threx** is a Thompson-construction regular expression engine: a
//! hand-written recursive-descent parser, a bytecode compiler, and a Pike
//! VM executor that runs the compiled program in lockstep over the threads
//! it spawns, guaranteeing linear-time matching with no backtracking.
//!
//! ## Usage
//!
//! ```rust
//! use threx::Regex;
//!
//! let re = Regex::compile(r"a(b+)c").unwrap();
//! assert!(re.is_match("xabbbcy"));
//! let m = re.find("xabbbcy").unwrap();
//! assert_eq!(m.as_bytes(), b"abbbc");
//! ```
//!
//! ## Crate organization
//!
//! - `parser`/`ast`: turns a pattern string into a parse tree.
//! - `charclass`: the bitset representation for `[...]` classes.
//! - `compiler`/`program`: lowers the tree to a flat bytecode program.
//! - `vm`: the Pike VM that executes a program against input bytes.
//! - `regex`: the user-facing `Regex` API wrapping the three stages above.
//! - `disasm`/`dot`: diagnostics — textual disassembly and Graphviz export.
//! - `util`: shared value types (`Span`, `Input`, `Match`, `Captures`).
//! - `error`: the error types returned by each stage.
//!
//! ## License
//!
//! Licensed under MIT or Apache-2.0.

pub mod ast;
pub mod charclass;
pub mod compiler;
pub mod disasm;
pub mod dot;
pub mod error;
pub mod parser;
pub mod program;
pub mod regex;
pub mod util;
pub mod vm;

pub use regex::Regex;

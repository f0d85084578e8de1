// Parsing
mod lexer;
mod parser;
pub use parser::AsmParser;
mod air;
pub use air::{Air, AirStmt, Operand};
pub mod ops;

// Running
mod memory;
pub use memory::Memory;
mod runtime;
pub use runtime::RunState;
pub mod device;
pub mod loader;
pub mod output;

pub mod error;
mod span;
pub use span::Span;
mod symbol;
pub use symbol::{Label, SymbolTable, Word, MEMORY_SIZE};


/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 8;

/// Assemble source text straight into a memory image.
pub fn assemble(src: &str) -> miette::Result<Vec<Word>> {
    AsmParser::new(src)?.parse()?.emit()
}

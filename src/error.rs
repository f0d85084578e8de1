use std::path::Path;

use miette::{miette, LabeledSpan, Report, Severity};

use crate::span::Span;

// Assembler errors

pub fn asm_duplicate_label(src: &str, span: Span, first: Span) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::duplicate_label",
        help = "labels may only be defined once per file",
        labels = vec![
            LabeledSpan::at(first, "first defined here"),
            LabeledSpan::at(span, "duplicate label"),
        ],
        "Duplicate label",
    )
    .with_source_code(src.to_string())
}

pub fn asm_unknown_label(src: &str, span: Span) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::unknown_label",
        help = "labels are defined by placing them at the start of a line",
        labels = vec![LabeledSpan::at(span, "not defined")],
        "Reference to an undefined label",
    )
    .with_source_code(src.to_string())
}

pub fn asm_invalid_token(src: &str, span: Span) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::invalid_token",
        help = "operands must be labels or unsigned decimal literals",
        labels = vec![LabeledSpan::at(span, "invalid token")],
        "Encountered an invalid token",
    )
    .with_source_code(src.to_string())
}

pub fn asm_malformed_line(src: &str, span: Span, reason: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::malformed_line",
        help = "lines have the form `[label] MNEMONIC [operand]`",
        labels = vec![LabeledSpan::at(span, reason.to_string())],
        "Malformed line: {reason}",
    )
    .with_source_code(src.to_string())
}

pub fn asm_operand_range(src: &str, span: Span, max: u16) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::operand_range",
        help = format!("this instruction expects an operand from 0 to {max}"),
        labels = vec![LabeledSpan::at(span, "out-of-range operand")],
        "Operand does not fit in the instruction",
    )
    .with_source_code(src.to_string())
}

pub fn asm_too_large(src: &str, span: Span) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::too_large",
        help = "LMC memory only holds 100 words",
        labels = vec![LabeledSpan::at(span, "no address left for this line")],
        "Program is too large to fit in memory",
    )
    .with_source_code(src.to_string())
}

// Loader errors

pub fn load_invalid_word(src: &str, span: Span) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::invalid_word",
        help = "images contain decimal words from 000 to 999",
        labels = vec![LabeledSpan::at(span, "not a word")],
        "Encountered an invalid word in program image",
    )
    .with_source_code(src.to_string())
}

pub fn load_too_large(len: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::too_large",
        help = "LMC memory only holds 100 words",
        "Program of {len} words is too large to fit in memory",
    )
}

// Runtime errors

pub fn mem_out_of_range(addr: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "memory::out_of_range",
        help = "valid addresses range from 00 to 99",
        "Memory access out of range at address {addr}",
    )
}

pub fn run_invalid_opcode(pc: usize, opcode: u8) -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::invalid_opcode",
        help = "opcode 4 is not assigned to any instruction",
        "Invalid opcode {opcode} at address {pc:02}",
    )
}

pub fn run_invalid_input(input: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::invalid_input",
        help = "input must be a whole number from 0 to 999",
        "Invalid input `{input}`",
    )
}

pub fn run_input_eof() -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::invalid_input",
        help = "the program requested more input than was provided",
        "Unexpected end of input",
    )
}

// File errors

pub fn file_not_found(path: &Path) -> Report {
    miette!(
        severity = Severity::Error,
        code = "io::file_not_found",
        help = "check the path and that the file exists",
        "File `{}` not found",
        path.display(),
    )
}

/// Diagnostic code of a report, for asserting on error kinds.
#[cfg(test)]
pub(crate) fn code_of(report: &Report) -> String {
    report
        .code()
        .map(|code| code.to_string())
        .unwrap_or_default()
}

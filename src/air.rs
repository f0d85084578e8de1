use miette::Result;

use crate::{
    error,
    ops::{Mnemonic, OperandRule},
    span::Span,
    symbol::{SymbolTable, Word, MEMORY_SIZE},
};

/// Assembly intermediate representation: one statement per memory address, plus the
/// labels used to build it.
pub struct Air {
    /// Source the statements were parsed from, kept for diagnostics
    src: String,
    ast: Vec<AirStmt>,
    symbols: SymbolTable,
}

impl Air {
    pub fn new(src: &str, symbols: SymbolTable) -> Self {
        Air {
            src: src.to_string(),
            ast: Vec::new(),
            symbols,
        }
    }

    pub fn add_stmt(&mut self, stmt: AirStmt) {
        self.ast.push(stmt)
    }

    pub fn get(&self, idx: usize) -> &AirStmt {
        &self.ast[idx]
    }

    pub fn len(&self) -> usize {
        self.ast.len()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Encode every statement into the memory image, starting at address 0.
    pub fn emit(&self) -> Result<Vec<Word>> {
        debug_assert!(self.ast.len() <= MEMORY_SIZE);
        self.ast.iter().map(|stmt| stmt.emit(&self.src)).collect()
    }
}

impl<'a> IntoIterator for &'a Air {
    type Item = &'a AirStmt;
    type IntoIter = std::slice::Iter<'a, AirStmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.ast.iter()
    }
}

/// Single LMC statement with its resolved operand.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AirStmt {
    /// Label defined on this line
    pub label: Option<String>,
    pub mnemonic: Mnemonic,
    pub operand: Option<Operand>,
    /// Covers the whole line
    pub span: Span,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    Literal { value: u16, span: Span },
    Label { name: String, addr: u8, span: Span },
}

impl Operand {
    pub fn value(&self) -> u16 {
        match self {
            Operand::Literal { value, .. } => *value,
            Operand::Label { addr, .. } => *addr as u16,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Operand::Literal { span, .. } | Operand::Label { span, .. } => *span,
        }
    }
}

impl AirStmt {
    /// Encode statement as a machine word.
    pub fn emit(&self, src: &str) -> Result<Word> {
        if let Some(word) = self.mnemonic.preset() {
            return Ok(word);
        }
        let Some(operand) = &self.operand else {
            return match self.mnemonic.operand_rule() {
                OperandRule::Required => Err(error::asm_malformed_line(
                    src,
                    self.span,
                    "missing operand",
                )),
                _ => Ok(Word::ZERO),
            };
        };
        match self.mnemonic.opcode() {
            // DAT
            None => Word::new(operand.value())
                .ok_or_else(|| error::asm_operand_range(src, operand.span(), Word::MAX)),
            Some(opcode) => match u8::try_from(operand.value()) {
                Ok(addr) if (addr as usize) < MEMORY_SIZE => Ok(Word::pack(opcode, addr)),
                _ => Err(error::asm_operand_range(
                    src,
                    operand.span(),
                    MEMORY_SIZE as u16 - 1,
                )),
            },
        }
    }
}

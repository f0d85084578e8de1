use miette::Result;

use crate::{
    air::{Air, AirStmt, Operand},
    error,
    lexer::{split_lines, Token},
    ops::Mnemonic,
    span::Span,
    symbol::{SymbolTable, Word, MEMORY_SIZE},
};

/// Two-pass assembler over LMC source.
///
/// The first pass records every line label against its address so that the second pass
/// can resolve references regardless of where the label is defined.
pub struct AsmParser<'a> {
    /// Reference to the source file
    src: &'a str,
    /// Non-blank lines, one per memory address
    lines: Vec<Line>,
}

struct Line {
    toks: Vec<Token>,
    span: Span,
}

/// A line holds at most a label, a mnemonic and an operand.
const MAX_LINE_TOKENS: usize = 3;

impl<'a> AsmParser<'a> {
    /// Split the source into lines, checking line shape and program size.
    pub fn new(src: &'a str) -> Result<Self> {
        let mut lines = Vec::new();
        for toks in split_lines(src) {
            let (Some(first), Some(last)) = (toks.first(), toks.last()) else {
                // Blank lines take no address
                continue;
            };
            let span = first.span.join(last.span);
            if toks.len() > MAX_LINE_TOKENS {
                let extra = toks[MAX_LINE_TOKENS].span.join(last.span);
                return Err(error::asm_malformed_line(src, extra, "too many tokens"));
            }
            if lines.len() == MEMORY_SIZE {
                return Err(error::asm_too_large(src, span));
            }
            lines.push(Line { toks, span });
        }
        Ok(AsmParser { src, lines })
    }

    fn text(&self, tok: &Token) -> &'a str {
        tok.text(self.src)
    }

    /// First pass: any line not starting with a mnemonic starts with a label.
    pub fn collect_labels(&self) -> Result<SymbolTable> {
        let mut symbols = SymbolTable::new();
        for (addr, line) in self.lines.iter().enumerate() {
            let first = &line.toks[0];
            let name = self.text(first);
            if name.parse::<Mnemonic>().is_ok() {
                continue;
            }
            // Line count is bounded by memory size
            if let Err(prev) = symbols.insert(name, addr as u8, first.span) {
                return Err(error::asm_duplicate_label(self.src, first.span, prev));
            }
        }
        Ok(symbols)
    }

    /// Run both passes and produce AIR with every label resolved.
    pub fn parse(self) -> Result<Air> {
        let symbols = self.collect_labels()?;
        let mut stmts = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            stmts.push(self.parse_line(line, &symbols)?);
        }

        let mut air = Air::new(self.src, symbols);
        for stmt in stmts {
            air.add_stmt(stmt);
        }
        Ok(air)
    }

    /// Second pass over a single line. Known labels take priority over literals, which
    /// take priority over mnemonics.
    fn parse_line(&self, line: &Line, symbols: &SymbolTable) -> Result<AirStmt> {
        let mut label = None;
        let mut mnemonic = None;
        let mut operand = None;

        for (idx, tok) in line.toks.iter().enumerate() {
            let text = self.text(tok);
            let value = if let Some(addr) = symbols.get(text) {
                if idx == 0 {
                    label = Some(text.to_string());
                    continue;
                }
                Operand::Label {
                    name: text.to_string(),
                    addr,
                    span: tok.span,
                }
            } else if text.chars().all(|c| c.is_ascii_digit()) {
                let value = text
                    .parse::<u16>()
                    .map_err(|_| error::asm_operand_range(self.src, tok.span, Word::MAX))?;
                Operand::Literal {
                    value,
                    span: tok.span,
                }
            } else if let Ok(found) = text.parse::<Mnemonic>() {
                if mnemonic.is_some() {
                    return Err(self.malformed(tok, "second mnemonic"));
                }
                mnemonic = Some(found);
                continue;
            } else if mnemonic.is_some() && is_identifier(text) {
                // Only an operand can refer to a label
                return Err(error::asm_unknown_label(self.src, tok.span));
            } else {
                return Err(error::asm_invalid_token(self.src, tok.span));
            };

            if mnemonic.is_none() {
                return Err(self.malformed(tok, "operand before mnemonic"));
            }
            if operand.is_some() {
                return Err(self.malformed(tok, "second operand"));
            }
            operand = Some(value);
        }

        let Some(mnemonic) = mnemonic else {
            return Err(error::asm_malformed_line(
                self.src,
                line.span,
                "missing mnemonic",
            ));
        };
        Ok(AirStmt {
            label,
            mnemonic,
            operand,
            span: line.span,
        })
    }

    fn malformed(&self, tok: &Token, reason: &str) -> miette::Report {
        error::asm_malformed_line(self.src, tok.span, reason)
    }
}

fn is_identifier(text: &str) -> bool {
    text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code_of;

    fn assemble(src: &str) -> Result<Vec<u16>> {
        let air = AsmParser::new(src)?.parse()?;
        Ok(air.emit()?.into_iter().map(Word::value).collect())
    }

    fn assemble_err(src: &str) -> String {
        match assemble(src) {
            Ok(words) => panic!("expected error, assembled {words:?}"),
            Err(report) => code_of(&report),
        }
    }

    #[test]
    fn assembles_with_trailing_data() {
        let words = assemble("LDA NUM\nOUT\nHLT\nNUM DAT 7\n").unwrap();
        assert_eq!(words, [503, 902, 0, 7]);
    }

    #[test]
    fn label_order_does_not_matter() {
        let words = assemble("five DAT 5\nstart LDA five\nOUT\nHLT").unwrap();
        assert_eq!(words, [5, 500, 902, 0]);
    }

    #[test]
    fn forward_reference() {
        let src = "BRA end\nDAT\nDAT\nDAT\nDAT\nend HLT";
        assert_eq!(assemble(src).unwrap()[0], 605);
    }

    #[test]
    fn blank_lines_take_no_address() {
        let words = assemble("\n  LDA x\n\n\nx DAT 3\n").unwrap();
        assert_eq!(words, [501, 3]);
    }

    #[test]
    fn mnemonics_ignore_case() {
        assert_eq!(assemble("inp\nsto 10\nout\nhlt").unwrap(), [901, 310, 902, 0]);
    }

    #[test]
    fn numeric_label_takes_priority() {
        // `10` is defined as a label on line 1, so `BRA 10` jumps there
        let words = assemble("BRA 10\n10 HLT").unwrap();
        assert_eq!(words, [601, 0]);
    }

    #[test]
    fn preset_ignores_operand() {
        assert_eq!(assemble("OUT 55").unwrap(), [902]);
    }

    #[test]
    fn comments_are_skipped() {
        let words = assemble("; counter\nLDA one // load\none DAT 1").unwrap();
        assert_eq!(words, [501, 1]);
    }

    #[test]
    fn collects_labels() {
        let parser = AsmParser::new("a LDA b\n\nb DAT\nOUT\nc HLT").unwrap();
        let symbols = parser.collect_labels().unwrap();
        assert_eq!(symbols.get("a"), Some(0));
        assert_eq!(symbols.get("b"), Some(1));
        assert_eq!(symbols.get("c"), Some(3));
        assert_eq!(symbols.len(), 3);
    }

    #[test]
    fn records_statement_fields() {
        let air = AsmParser::new("top INP\n    BRZ top\n    DAT 12").unwrap().parse().unwrap();
        assert_eq!(air.len(), 3);
        assert_eq!(air.get(0).label.as_deref(), Some("top"));
        assert_eq!(air.get(0).mnemonic, Mnemonic::Inp);
        match &air.get(1).operand {
            Some(Operand::Label { name, addr, .. }) => assert_eq!((name.as_str(), *addr), ("top", 0)),
            other => panic!("expected label operand, found {other:?}"),
        }
        let mnemonics: Vec<_> = (&air).into_iter().map(|stmt| stmt.mnemonic).collect();
        assert_eq!(mnemonics, [Mnemonic::Inp, Mnemonic::Brz, Mnemonic::Dat]);
        assert_eq!(air.symbols().get("top"), Some(0));
    }

    #[test]
    fn duplicate_label() {
        assert_eq!(assemble_err("X DAT 1\nX DAT 2"), "asm::duplicate_label");
    }

    #[test]
    fn unknown_label() {
        assert_eq!(assemble_err("BRA nowhere"), "asm::unknown_label");
    }

    #[test]
    fn invalid_token() {
        assert_eq!(assemble_err("LDA #5"), "asm::invalid_token");
        assert_eq!(assemble_err("ADD -1"), "asm::invalid_token");
        assert_eq!(assemble_err("start LDX 5"), "asm::invalid_token");
        assert_eq!(assemble_err("a b HLT"), "asm::invalid_token");
    }

    #[test]
    fn unknown_word_depends_on_position() {
        // Where the mnemonic belongs, a stray word is a bad token
        assert_eq!(assemble_err("start ldx"), "asm::invalid_token");
        // After the mnemonic it must be a label
        assert_eq!(assemble_err("start LDA ldx"), "asm::unknown_label");
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(assemble_err("a LDA b c\nb DAT"), "asm::malformed_line");
        assert_eq!(assemble_err("lonely"), "asm::malformed_line");
        assert_eq!(assemble_err("LDA"), "asm::malformed_line");
        assert_eq!(assemble_err("LDA OUT"), "asm::malformed_line");
        assert_eq!(assemble_err("LDA 1 2"), "asm::malformed_line");
        assert_eq!(assemble_err("x 5 LDA"), "asm::malformed_line");
    }

    #[test]
    fn operand_range() {
        assert_eq!(assemble_err("LDA 100"), "asm::operand_range");
        assert_eq!(assemble_err("DAT 1000"), "asm::operand_range");
        assert_eq!(assemble_err("DAT 99999999"), "asm::operand_range");
    }

    #[test]
    fn program_too_large() {
        let fits = "DAT\n".repeat(100);
        assert_eq!(assemble(&fits).unwrap().len(), 100);

        let src = "DAT\n".repeat(101);
        assert_eq!(assemble_err(&src), "asm::too_large");
    }
}

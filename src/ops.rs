use std::{fmt, str::FromStr};

use crate::symbol::Word;

/// Assembly mnemonics understood by the assembler.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mnemonic {
    Hlt,
    Add,
    Sub,
    /// `STA` and `STO` both map here.
    Sta,
    Lda,
    Bra,
    Brz,
    Brp,
    Inp,
    Out,
    /// Reserve a data word.
    Dat,
}

/// What a mnemonic expects after it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperandRule {
    /// Preset code, operand ignored
    Ignored,
    /// Data value, defaults to zero
    Optional,
    /// Memory address
    Required,
}

impl Mnemonic {
    pub fn operand_rule(self) -> OperandRule {
        match self {
            Mnemonic::Hlt | Mnemonic::Inp | Mnemonic::Out => OperandRule::Ignored,
            Mnemonic::Dat => OperandRule::Optional,
            _ => OperandRule::Required,
        }
    }

    /// Opcode digit for mnemonics that pack an address operand.
    pub fn opcode(self) -> Option<u8> {
        match self {
            Mnemonic::Add => Some(1),
            Mnemonic::Sub => Some(2),
            Mnemonic::Sta => Some(3),
            Mnemonic::Lda => Some(5),
            Mnemonic::Bra => Some(6),
            Mnemonic::Brz => Some(7),
            Mnemonic::Brp => Some(8),
            _ => None,
        }
    }

    /// Full word for mnemonics with a fixed encoding.
    pub fn preset(self) -> Option<Word> {
        match self {
            Mnemonic::Hlt => Some(Word::ZERO),
            Mnemonic::Inp => Some(Word::pack(9, 1)),
            Mnemonic::Out => Some(Word::pack(9, 2)),
            _ => None,
        }
    }
}

impl FromStr for Mnemonic {
    type Err = ();

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mnemonic = match s.to_ascii_uppercase().as_str() {
            "HLT" => Mnemonic::Hlt,
            "ADD" => Mnemonic::Add,
            "SUB" => Mnemonic::Sub,
            "STA" | "STO" => Mnemonic::Sta,
            "LDA" => Mnemonic::Lda,
            "BRA" => Mnemonic::Bra,
            "BRZ" => Mnemonic::Brz,
            "BRP" => Mnemonic::Brp,
            "INP" => Mnemonic::Inp,
            "OUT" => Mnemonic::Out,
            "DAT" => Mnemonic::Dat,
            _ => return Err(()),
        };
        Ok(mnemonic)
    }
}

/// Decoded machine instruction. Operands are memory addresses.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Instr {
    Hlt,
    Add(u8),
    Sub(u8),
    Sta(u8),
    Lda(u8),
    Bra(u8),
    Brz(u8),
    Brp(u8),
    Inp,
    Out,
    /// `9xx` with an unassigned device number; does nothing
    Io(u8),
}

impl Instr {
    /// Decode from instruction and address registers. `None` for the unused opcode.
    pub fn decode(opcode: u8, addr: u8) -> Option<Instr> {
        let instr = match opcode {
            0 => Instr::Hlt,
            1 => Instr::Add(addr),
            2 => Instr::Sub(addr),
            3 => Instr::Sta(addr),
            5 => Instr::Lda(addr),
            6 => Instr::Bra(addr),
            7 => Instr::Brz(addr),
            8 => Instr::Brp(addr),
            9 => match addr {
                1 => Instr::Inp,
                2 => Instr::Out,
                dev => Instr::Io(dev),
            },
            _ => return None,
        };
        Some(instr)
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Hlt => write!(f, "HLT"),
            Instr::Add(addr) => write!(f, "ADD {addr:02}"),
            Instr::Sub(addr) => write!(f, "SUB {addr:02}"),
            Instr::Sta(addr) => write!(f, "STA {addr:02}"),
            Instr::Lda(addr) => write!(f, "LDA {addr:02}"),
            Instr::Bra(addr) => write!(f, "BRA {addr:02}"),
            Instr::Brz(addr) => write!(f, "BRZ {addr:02}"),
            Instr::Brp(addr) => write!(f, "BRP {addr:02}"),
            Instr::Inp => write!(f, "INP"),
            Instr::Out => write!(f, "OUT"),
            Instr::Io(dev) => write!(f, "I/O {dev:02}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonics_ignore_case() {
        assert_eq!("lda".parse::<Mnemonic>(), Ok(Mnemonic::Lda));
        assert_eq!("Out".parse::<Mnemonic>(), Ok(Mnemonic::Out));
        assert_eq!("foo".parse::<Mnemonic>(), Err(()));
    }

    #[test]
    fn sto_is_sta() {
        assert_eq!("STO".parse::<Mnemonic>(), Ok(Mnemonic::Sta));
        assert_eq!(Mnemonic::Sta.opcode(), Some(3));
    }

    #[test]
    fn presets() {
        assert_eq!(Mnemonic::Inp.preset().map(Word::value), Some(901));
        assert_eq!(Mnemonic::Out.preset().map(Word::value), Some(902));
        assert_eq!(Mnemonic::Hlt.preset().map(Word::value), Some(0));
        assert_eq!(Mnemonic::Lda.preset(), None);
    }

    #[test]
    fn decode() {
        assert_eq!(Instr::decode(0, 42), Some(Instr::Hlt));
        assert_eq!(Instr::decode(5, 65), Some(Instr::Lda(65)));
        assert_eq!(Instr::decode(9, 1), Some(Instr::Inp));
        assert_eq!(Instr::decode(9, 2), Some(Instr::Out));
        assert_eq!(Instr::decode(9, 22), Some(Instr::Io(22)));
        assert_eq!(Instr::decode(4, 0), None);
    }
}

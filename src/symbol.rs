use std::fmt;

use fxhash::FxBuildHasher;
use indexmap::IndexMap;

use crate::span::Span;

type FxMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Number of addressable words in LMC memory.
pub const MEMORY_SIZE: usize = 100;

/// A single three-digit LMC word, either data or a packed instruction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Word(u16);

impl Word {
    pub const MAX: u16 = 999;
    pub const ZERO: Word = Word(0);

    /// Returns `None` if the value does not fit in three decimal digits.
    pub fn new(value: u16) -> Option<Word> {
        (value <= Self::MAX).then_some(Word(value))
    }

    /// Build a word from an opcode digit and a two-digit operand.
    pub(crate) fn pack(opcode: u8, operand: u8) -> Word {
        debug_assert!(opcode <= 9 && operand <= 99);
        Word(opcode as u16 * 100 + operand as u16)
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Leading digit.
    pub fn opcode(self) -> u8 {
        (self.0 / 100) as u8
    }

    /// Trailing two digits.
    pub fn operand(self) -> u8 {
        (self.0 % 100) as u8
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Label bound to a memory address, as written in source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Label {
    pub name: String,
    pub addr: u8,
}

/// Map of label name to memory address, owned by a single assembly.
#[derive(Default, Debug)]
pub struct SymbolTable {
    table: FxMap<String, Entry>,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    addr: u8,
    span: Span,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            table: IndexMap::with_hasher(FxBuildHasher::default()),
        }
    }

    /// Insert a new label. On redefinition the span of the first definition is returned.
    pub fn insert(&mut self, name: &str, addr: u8, span: Span) -> Result<(), Span> {
        if let Some(existing) = self.table.get(name) {
            return Err(existing.span);
        }
        self.table.insert(name.to_string(), Entry { addr, span });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        self.table.get(name).map(|entry| entry.addr)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Labels in definition order.
    pub fn iter(&self) -> impl Iterator<Item = Label> + '_ {
        self.table.iter().map(|(name, entry)| Label {
            name: name.clone(),
            addr: entry.addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Idx;

    #[test]
    fn word_range() {
        assert_eq!(Word::new(999).map(Word::value), Some(999));
        assert_eq!(Word::new(1000), None);
    }

    #[test]
    fn word_split() {
        let word = Word::new(507).unwrap();
        assert_eq!(word.opcode(), 5);
        assert_eq!(word.operand(), 7);
        assert_eq!(Word::pack(5, 7), word);
        assert_eq!(word.to_string(), "507");
        assert_eq!(Word::new(7).unwrap().to_string(), "007");
    }

    #[test]
    fn symbol_table_rejects_redefinition() {
        let mut table = SymbolTable::new();
        let first = Span::new(Idx(0), 4);
        assert!(table.insert("loop", 0, first).is_ok());
        assert_eq!(table.insert("loop", 3, Span::new(Idx(20), 4)), Err(first));
        assert_eq!(table.get("loop"), Some(0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn symbol_table_keeps_order() {
        let mut table = SymbolTable::new();
        table.insert("b", 4, Span::default()).unwrap();
        table.insert("a", 1, Span::default()).unwrap();
        let names: Vec<_> = table.iter().map(|label| label.name).collect();
        assert_eq!(names, ["b", "a"]);
    }
}

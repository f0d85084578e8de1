use miette::Result;

use crate::{
    error,
    symbol::{Word, MEMORY_SIZE},
};

/// The 100 mailboxes of the machine.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Memory {
    cells: [Word; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            cells: [Word::ZERO; MEMORY_SIZE],
        }
    }

    /// Copy a program image into memory starting at address 0.
    pub fn from_image(image: &[Word]) -> Result<Self> {
        if image.len() > MEMORY_SIZE {
            return Err(error::load_too_large(image.len()));
        }
        let mut mem = Memory::new();
        mem.cells[..image.len()].copy_from_slice(image);
        Ok(mem)
    }

    pub fn read(&self, addr: usize) -> Result<Word> {
        self.cells
            .get(addr)
            .copied()
            .ok_or_else(|| error::mem_out_of_range(addr))
    }

    pub fn write(&mut self, addr: usize, word: Word) -> Result<()> {
        let cell = self
            .cells
            .get_mut(addr)
            .ok_or_else(|| error::mem_out_of_range(addr))?;
        *cell = word;
        Ok(())
    }

    pub fn cells(&self) -> &[Word] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code_of;

    #[test]
    fn unwritten_reads_zero() {
        let mem = Memory::new();
        assert!(mem.cells().iter().all(|word| *word == Word::ZERO));
        assert_eq!(mem.read(50).unwrap(), Word::ZERO);
    }

    #[test]
    fn write_then_read() {
        let mut mem = Memory::new();
        for addr in 0..MEMORY_SIZE {
            for value in [0, 1, 42, 500, 999] {
                let word = Word::new(value).unwrap();
                mem.write(addr, word).unwrap();
                assert_eq!(mem.read(addr).unwrap(), word);
            }
        }
    }

    #[test]
    fn out_of_range() {
        let mut mem = Memory::new();
        for addr in [100, 101, 1000, usize::MAX] {
            assert_eq!(code_of(&mem.read(addr).unwrap_err()), "memory::out_of_range");
            assert_eq!(
                code_of(&mem.write(addr, Word::ZERO).unwrap_err()),
                "memory::out_of_range"
            );
        }
    }

    #[test]
    fn image_fills_from_zero() {
        let image: Vec<Word> = [503, 902, 0, 7].into_iter().filter_map(Word::new).collect();
        let mem = Memory::from_image(&image).unwrap();
        assert_eq!(&mem.cells()[..4], image.as_slice());
        assert_eq!(mem.read(4).unwrap(), Word::ZERO);
    }

    #[test]
    fn image_too_large() {
        let image = vec![Word::ZERO; MEMORY_SIZE + 1];
        let err = Memory::from_image(&image).unwrap_err();
        assert_eq!(code_of(&err), "load::too_large");
    }
}

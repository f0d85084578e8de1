use miette::Result;

use crate::{
    device::{InputDevice, OutputDevice},
    dprintln, error,
    memory::Memory,
    ops::Instr,
    symbol::Word,
    Air,
};

/// Arithmetic wraps modulo this value.
const WORD_MODULUS: i32 = Word::MAX as i32 + 1;

/// Represents complete machine state during runtime.
pub struct RunState {
    mem: Memory,
    /// Program counter
    pc: usize,
    /// Opcode digit of the last fetched word
    ir: u8,
    /// Operand digits of the last fetched word
    ar: u8,
    /// Accumulator, always within 000-999
    acc: Word,
    /// Set when the last subtraction went below zero
    negative: bool,
    halted: bool,
    /// Completed fetches
    cycles: usize,
    trace: bool,
}

impl RunState {
    pub fn try_from(air: Air) -> Result<RunState> {
        RunState::from_raw(&air.emit()?)
    }

    /// Start with `raw` loaded from address 0.
    pub fn from_raw(raw: &[Word]) -> Result<RunState> {
        Ok(RunState::from_memory(Memory::from_image(raw)?))
    }

    pub fn from_memory(mem: Memory) -> RunState {
        RunState {
            mem,
            pc: 0,
            ir: 0,
            ar: 0,
            acc: Word::ZERO,
            negative: false,
            halted: false,
            cycles: 0,
            trace: false,
        }
    }

    /// Log every executed instruction to stderr.
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn acc(&self) -> Word {
        self.acc
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn mem(&self) -> &Memory {
        &self.mem
    }

    /// Run until `HLT`, returning the number of fetch cycles performed.
    pub fn run(
        &mut self,
        input: &mut impl InputDevice,
        output: &mut impl OutputDevice,
    ) -> Result<usize> {
        while self.fetch()? {
            self.execute(input, output)?;
        }
        Ok(self.cycles)
    }

    /// One fetch followed by one execute. Returns false once halted.
    pub fn step(
        &mut self,
        input: &mut impl InputDevice,
        output: &mut impl OutputDevice,
    ) -> Result<bool> {
        if !self.fetch()? {
            return Ok(false);
        }
        self.execute(input, output)?;
        Ok(true)
    }

    /// Load the word at the program counter into the instruction and address registers.
    pub fn fetch(&mut self) -> Result<bool> {
        if self.halted {
            return Ok(false);
        }
        // Running off the end of memory is an error rather than a wrap to 00
        let instr = self.mem.read(self.pc)?;
        self.pc += 1;
        self.ir = instr.opcode();
        self.ar = instr.operand();
        self.cycles += 1;
        Ok(true)
    }

    pub fn execute(
        &mut self,
        input: &mut impl InputDevice,
        output: &mut impl OutputDevice,
    ) -> Result<()> {
        if self.halted {
            return Ok(());
        }
        // Address the instruction was fetched from
        let at = self.pc.saturating_sub(1);
        let Some(instr) = Instr::decode(self.ir, self.ar) else {
            return Err(error::run_invalid_opcode(at, self.ir));
        };

        match instr {
            Instr::Hlt => self.halted = true,
            Instr::Add(addr) => {
                let val = self.mem.read(addr as usize)?;
                self.set_acc(self.acc.value() as i32 + val.value() as i32);
            }
            Instr::Sub(addr) => {
                let val = self.mem.read(addr as usize)?;
                self.set_acc(self.acc.value() as i32 - val.value() as i32);
            }
            Instr::Sta(addr) => self.mem.write(addr as usize, self.acc)?,
            Instr::Lda(addr) => {
                self.acc = self.mem.read(addr as usize)?;
                self.negative = false;
            }
            Instr::Bra(addr) => self.pc = addr as usize,
            Instr::Brz(addr) => {
                if !self.negative && self.acc == Word::ZERO {
                    self.pc = addr as usize;
                }
            }
            Instr::Brp(addr) => {
                if !self.negative {
                    self.pc = addr as usize;
                }
            }
            Instr::Inp => {
                self.acc = input.read_value()?;
                self.negative = false;
            }
            Instr::Out => output.write_value(self.acc)?,
            Instr::Io(_) => {}
        }

        if self.trace {
            dprintln!(
                "[{:02}] {:<7} acc={}{}",
                at,
                instr.to_string(),
                self.acc,
                if self.negative { " (neg)" } else { "" }
            );
        }
        Ok(())
    }

    /// Store an arithmetic result, wrapping into 000-999. Results below zero set the
    /// negative flag, anything else clears it.
    fn set_acc(&mut self, result: i32) {
        self.negative = result < 0;
        let wrapped = result.rem_euclid(WORD_MODULUS) as u16;
        // rem_euclid keeps the value within 0..=999
        self.acc = Word::new(wrapped).unwrap_or(Word::ZERO);
    }
}

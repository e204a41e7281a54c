mod alu;
mod cb;
mod exec;
mod helpers;
pub mod opcodes;
mod regs;

pub use regs::{Clock, Cycles, Flags, Registers};

use opcodes::OPCODE_TABLE;
use thiserror::Error;

/// Abstraction over the address space as seen by the processor.
///
/// The processor never owns memory; every fetch, load and store goes
/// through this trait so the same core can run against the full system
/// bus or a flat test memory.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Little-endian word read: low byte at `addr`, high byte at `addr + 1`.
    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr) as u16;
        let hi = self.read8(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Little-endian word write, decomposed into two byte writes.
    fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo);
        self.write8(addr.wrapping_add(1), hi);
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// The fetched byte has no handler. Execution state past this point is
    /// undefined, so the processor locks.
    #[error("illegal opcode {opcode:#04x} at {addr:#06x}")]
    IllegalOpcode { opcode: u8, addr: u16 },
    #[error("processor is locked after an illegal opcode; reset required")]
    Locked,
}

/// The instruction processor.
///
/// Owns the register file and the running clock. `step` executes exactly
/// one instruction and returns what it cost.
#[derive(Clone, Debug, Default)]
pub struct Cpu {
    pub regs: Registers,
    pub clock: Clock,
    /// Interrupt master enable latch, driven by DI/EI/RETI.
    pub ime: bool,
    pub halted: bool,
    /// Set after an illegal opcode; cleared only by `reset`.
    locked: bool,
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to the power-on state: every register and both clock
    /// counters are zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[inline]
    pub fn get_flag(&self, flag: Flags) -> bool {
        self.regs.f.contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        self.regs.f.set(flag, value);
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f = Flags::empty();
    }

    /// Execute a single instruction and return its cost.
    ///
    /// The cost is also added to `clock`. A halted processor idles for one
    /// machine cycle per call.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<Cycles, CpuError> {
        if self.locked {
            return Err(CpuError::Locked);
        }

        let m = if self.halted {
            1
        } else {
            let opcode = self.fetch8(bus);
            self.execute(bus, opcode)?
        };

        let cycles = Cycles::from_m(m);
        self.clock.advance(cycles);
        Ok(cycles)
    }

    /// Dispatch an already-fetched opcode through the table.
    ///
    /// Returns the cost in machine cycles.
    fn execute<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, CpuError> {
        match self.exec_instruction(bus, OPCODE_TABLE[opcode as usize]) {
            Some(m) => Ok(m),
            None => {
                let addr = self.regs.pc.wrapping_sub(1);
                log::error!(
                    "CPU locked: illegal opcode 0x{opcode:02X} at PC=0x{addr:04X} (SP=0x{sp:04X} AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
                    sp = self.regs.sp,
                    af = self.regs.af(),
                    bc = self.regs.bc(),
                    de = self.regs.de(),
                    hl = self.regs.hl(),
                );
                self.locked = true;
                Err(CpuError::IllegalOpcode { opcode, addr })
            }
        }
    }
}

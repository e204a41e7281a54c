use crate::cpu::Cpu;

impl Cpu {
    /// HALT. There is no interrupt source to wake the processor, so it
    /// idles until reset.
    pub(super) fn exec_halt(&mut self) -> u32 {
        log::debug!("CPU halted at PC=0x{:04X}", self.regs.pc.wrapping_sub(1));
        self.halted = true;
        1
    }

    pub(super) fn exec_di(&mut self) -> u32 {
        self.ime = false;
        1
    }

    pub(super) fn exec_ei(&mut self) -> u32 {
        self.ime = true;
        1
    }
}

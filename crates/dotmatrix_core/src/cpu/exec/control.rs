use crate::cpu::Cpu;

impl Cpu {
    pub(super) fn exec_jp_hl(&mut self) -> u32 {
        self.regs.pc = self.regs.hl();
        1
    }
}

use crate::cpu::opcodes::StackPair;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_push<B: Bus>(&mut self, bus: &mut B, pair: StackPair) -> u32 {
        let value = self.read_stack_pair(pair);
        self.push_u16(bus, value);
        4
    }

    pub(super) fn exec_pop<B: Bus>(&mut self, bus: &mut B, pair: StackPair) -> u32 {
        let value = self.pop_u16(bus);
        self.write_stack_pair(pair, value);
        3
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, vector: u8) -> u32 {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = vector as u16;
        4
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.regs.pc = self.pop_u16(bus);
        4
    }

    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.regs.pc = self.pop_u16(bus);
        self.ime = true;
        4
    }
}

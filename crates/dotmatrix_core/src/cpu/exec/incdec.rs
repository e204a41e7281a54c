use crate::cpu::opcodes::{Pair, Reg8};
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_inc8<B: Bus>(&mut self, bus: &mut B, reg: Reg8) -> u32 {
        let value = self.read_reg8(bus, reg);
        let result = self.alu_inc8(value);
        self.write_reg8(bus, reg, result);

        if reg.is_memory() { 3 } else { 1 }
    }

    pub(super) fn exec_dec8<B: Bus>(&mut self, bus: &mut B, reg: Reg8) -> u32 {
        let value = self.read_reg8(bus, reg);
        let result = self.alu_dec8(value);
        self.write_reg8(bus, reg, result);

        if reg.is_memory() { 3 } else { 1 }
    }

    pub(super) fn exec_inc16(&mut self, pair: Pair) -> u32 {
        let value = self.read_pair(pair).wrapping_add(1);
        self.write_pair(pair, value);
        2
    }

    pub(super) fn exec_dec16(&mut self, pair: Pair) -> u32 {
        let value = self.read_pair(pair).wrapping_sub(1);
        self.write_pair(pair, value);
        2
    }
}

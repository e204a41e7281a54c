use crate::cpu::opcodes::{Indirect, Pair, Reg8};
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_ld_r_r<B: Bus>(&mut self, bus: &mut B, dst: Reg8, src: Reg8) -> u32 {
        let value = self.read_reg8(bus, src);
        self.write_reg8(bus, dst, value);

        if dst.is_memory() || src.is_memory() { 2 } else { 1 }
    }

    pub(super) fn exec_ld_r_d8<B: Bus>(&mut self, bus: &mut B, dst: Reg8) -> u32 {
        let value = self.fetch8(bus);
        self.write_reg8(bus, dst, value);

        if dst.is_memory() { 3 } else { 2 }
    }

    pub(super) fn exec_ld_rr_d16<B: Bus>(&mut self, bus: &mut B, pair: Pair) -> u32 {
        let value = self.fetch16(bus);
        self.write_pair(pair, value);
        3
    }

    /// Resolve the pointer of `LD (rr),A` / `LD A,(rr)`, applying the
    /// HL post-increment or post-decrement.
    fn indirect_addr(&mut self, ptr: Indirect) -> u16 {
        match ptr {
            Indirect::Bc => self.regs.bc(),
            Indirect::De => self.regs.de(),
            Indirect::HlIncrement => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Indirect::HlDecrement => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, ptr: Indirect) -> u32 {
        let addr = self.indirect_addr(ptr);
        bus.write8(addr, self.regs.a);
        2
    }

    pub(super) fn exec_ld_a_indirect<B: Bus>(&mut self, bus: &mut B, ptr: Indirect) -> u32 {
        let addr = self.indirect_addr(ptr);
        self.regs.a = bus.read8(addr);
        2
    }

    pub(super) fn exec_ld_a16_a<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        bus.write8(addr, self.regs.a);
        4
    }

    /// LD A,(a16): the operand is the two bytes after the opcode.
    pub(super) fn exec_ld_a_a16<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        self.regs.a = bus.read8(addr);
        4
    }

    pub(super) fn exec_ldh_a8_a<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = 0xFF00 | self.fetch8(bus) as u16;
        bus.write8(addr, self.regs.a);
        3
    }

    pub(super) fn exec_ldh_a_a8<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = 0xFF00 | self.fetch8(bus) as u16;
        self.regs.a = bus.read8(addr);
        3
    }

    pub(super) fn exec_ldh_c_a<B: Bus>(&mut self, bus: &mut B) -> u32 {
        bus.write8(0xFF00 | self.regs.c as u16, self.regs.a);
        2
    }

    pub(super) fn exec_ldh_a_c<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.regs.a = bus.read8(0xFF00 | self.regs.c as u16);
        2
    }

    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        bus.write16(addr, self.regs.sp);
        5
    }

    pub(super) fn exec_ld_sp_hl(&mut self) -> u32 {
        self.regs.sp = self.regs.hl();
        2
    }

    pub(super) fn exec_ld_hl_sp_r8<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let imm = self.fetch8(bus);
        let result = self.alu_add16_signed(self.regs.sp, imm);
        self.regs.set_hl(result);
        3
    }
}
